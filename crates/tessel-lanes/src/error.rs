// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Errors aborting the preparation or the replay of a pass.

use tessel_core::renderer::{AttributeDimension, ResourceError, Semantic};
use thiserror::Error;

/// A broken invariant of the pass engine.
///
/// None of these is recoverable for the pass at hand: no partial pass cache is
/// ever returned alongside one. Per-part misses (no technique for the pass, an
/// attribute without data) are not errors and never show up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PassError {
    /// A resource id map ran out of the ids its bit width can represent.
    #[error("{resource} id budget exhausted: {bits} bits cannot hold more than {capacity} ids")]
    IdBudgetExceeded {
        /// The mapped resource type.
        resource: &'static str,
        /// Bit width of the ids.
        bits: u32,
        /// Number of representable ids, the null handle included.
        capacity: u32,
    },

    /// A reverse lookup was asked for an id the map never handed out.
    #[error("id {id} is not present in the {resource} id map")]
    UnknownId {
        /// The mapped resource type.
        resource: &'static str,
        /// The looked up id.
        id: u16,
    },

    /// A shader attribute would be fed data with a different number of rows.
    #[error(
        "program '{program}' attribute '{attribute}' ({semantic}) of dimension {expected} \
         cannot be attached to vertex data of dimension {provided}: row counts are not allowed to differ"
    )]
    RowCountMismatch {
        /// Program name.
        program: String,
        /// Attribute name.
        attribute: String,
        /// Attribute semantic.
        semantic: Semantic,
        /// Dimension expected by the shader.
        expected: AttributeDimension,
        /// Dimension of the vertex data.
        provided: AttributeDimension,
    },

    /// The index view of a stream does not start on an index boundary.
    #[error("index buffer view offset {offset} is not a multiple of the index size {index_size}")]
    MisalignedIndexBuffer {
        /// Byte offset of the index view.
        offset: u64,
        /// Size of one index.
        index_size: u64,
    },

    /// A part drawn with indexed draws comes from a stream without indices.
    #[error("part '{part}' is drawn from a vertex stream without index buffer")]
    MissingIndexBuffer {
        /// The part name.
        part: String,
    },

    /// The first index of a part does not fit the 32 bits of an indirect command.
    #[error(
        "part '{part}' index range overflows: view offset {view_offset} bytes \
         ({index_size}-byte indices) plus first index {index_first}"
    )]
    IndexRangeOverflow {
        /// The part name.
        part: String,
        /// Byte offset of the index view.
        view_offset: u64,
        /// Size of one index.
        index_size: u64,
        /// First index of the part, relative to the view.
        index_first: u32,
    },

    /// The parallel arrays of a part list do not have the same length.
    #[error(
        "inconsistent part list: {parts} parts, {materials} materials, \
         {transforms} transform indices, {palettes} palette offsets"
    )]
    InconsistentPartList {
        /// Length of `parts`.
        parts: usize,
        /// Length of `materials`.
        materials: usize,
        /// Length of `transform_idx`.
        transforms: usize,
        /// Length of `palette_offset`.
        palettes: usize,
    },

    /// A handle did not resolve in the storage.
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

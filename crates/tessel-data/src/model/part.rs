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

use super::material::Material;
use super::vertex_stream::VertexStream;
use crate::storage::Handle;
use tessel_core::math::Aabb;
use tessel_core::renderer::PrimitiveTopology;

/// A drawable range of a vertex stream, with its material.
///
/// Distinct parts may share one vertex stream and address disjoint ranges of it
/// through the `*_first`/`*_count` members. Such parts also share their VAO.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    /// Debug name.
    pub name: String,
    /// Material used unless the instance overrides it.
    pub material: Material,
    /// The stream vertices and indices are pulled from.
    pub vertex_stream: Handle<VertexStream>,
    /// How vertices are assembled.
    pub topology: PrimitiveTopology,
    /// Offset, as a count of vertices, into the stream's views (the base vertex).
    pub vertex_first: u32,
    /// Number of vertices.
    pub vertex_count: u32,
    /// Offset, as a count of indices, into the stream's index view.
    pub index_first: u32,
    /// Number of indices.
    pub index_count: u32,
    /// Local bounds.
    pub aabb: Aabb,
}

/// An ordered list of parts, the unit a scene instance points to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    /// Parts in draw order.
    pub parts: Vec<Handle<Part>>,
    /// Union of the parts bounds.
    pub aabb: Aabb,
}

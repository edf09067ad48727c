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

//! GPU-consumed draw records.
//!
//! Both structures are `#[repr(C)]` and `Pod`: they are uploaded as-is into the
//! draw indirect buffer and into the per-instance vertex buffer.

/// Sentinel for "no entry" in index-typed fields (e.g. an unskinned part's palette offset).
pub const INVALID_INDEX: u32 = u32::MAX;

/// One entry of the draw indirect buffer used with indexed geometry.
///
/// The field order matches the layout expected by `MultiDrawElementsIndirect`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct DrawElementsIndirectCommand {
    /// Number of indices to draw.
    pub count: u32,
    /// Number of instances to draw.
    pub instance_count: u32,
    /// Offset, as a count of indices, into the bound index buffer.
    pub first_index: u32,
    /// Value added to each index before fetching vertices.
    pub base_vertex: u32,
    /// First instance, used to fetch per-instance attributes.
    pub base_instance: u32,
}

impl DrawElementsIndirectCommand {
    /// The byte stride between two consecutive commands in the indirect buffer.
    pub const STRIDE: u32 = std::mem::size_of::<Self>() as u32;
}

/// Per-instance indices, fetched through an instanced vertex attribute.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct DrawInstance {
    /// Index into the world transforms array.
    pub instance_transform_idx: u32,
    /// Index into the material parameters array.
    pub material_idx: u32,
    /// Offset of this instance's joint palette, or [`INVALID_INDEX`].
    pub matrix_palette_offset: u32,
}

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

use crate::renderer::api::*;
use crate::renderer::error::ResourceError;
use std::fmt::Debug;

/// The binding layer a pass is replayed against.
///
/// Resource creation can fail and returns a `Result`. Binding and drawing
/// primitives are treated as infallible side effects: any failure there is
/// a backend bug or a lost device, reported by the backend itself.
pub trait GraphicsDevice: Debug {
    /// Creates a new GPU buffer.
    /// ## Arguments
    /// * `descriptor` - A reference to a `BufferDescriptor` containing the buffer configuration.
    /// ## Returns
    /// A `Result` containing the ID of the created buffer or an error if the creation fails.
    fn create_buffer(&mut self, descriptor: &BufferDescriptor) -> Result<BufferId, ResourceError>;

    /// Writes data to a GPU buffer.
    /// ## Arguments
    /// * `id` - The ID of the buffer to write to.
    /// * `offset` - The offset in the buffer where the data will be written.
    /// * `data` - A slice of bytes containing the data to be written.
    /// ## Returns
    /// A `Result` indicating success or failure of the operation.
    /// ## Errors
    /// * `ResourceError::OutOfBounds` - If the write exceeds the buffer size.
    fn write_buffer(&mut self, id: BufferId, offset: u64, data: &[u8])
        -> Result<(), ResourceError>;

    /// Creates an empty vertex array object.
    /// ## Returns
    /// The ID of the new vertex array.
    fn create_vertex_array(&mut self) -> VertexArrayId;

    /// Attaches an element (index) buffer to a vertex array.
    /// ## Arguments
    /// * `vao` - The vertex array to configure.
    /// * `buffer` - The index buffer.
    fn attach_index_buffer(&mut self, vao: VertexArrayId, buffer: BufferId);

    /// Records one attribute binding into a vertex array.
    /// ## Arguments
    /// * `vao` - The vertex array to configure.
    /// * `binding` - The location, client layout and source buffer of the attribute.
    fn attach_vertex_attribute(&mut self, vao: VertexArrayId, binding: &VertexAttributeBinding);

    /// Binds a vertex array for subsequent draws.
    fn bind_vertex_array(&mut self, vao: VertexArrayId);

    /// Binds a uniform buffer to an indexed uniform block binding point.
    /// ## Arguments
    /// * `binding_index` - The uniform block binding point.
    /// * `buffer` - The buffer backing the block.
    fn bind_uniform_buffer(&mut self, binding_index: u32, buffer: BufferId);

    /// Binds a texture to a texture image unit.
    fn bind_texture(&mut self, unit: u32, texture: TextureId);

    /// Sets the value of a sampler uniform to a texture image unit.
    /// ## Arguments
    /// * `program` - The program owning the uniform.
    /// * `location` - The uniform location.
    /// * `unit` - The texture image unit to sample from.
    fn set_sampler_unit(&mut self, program: ProgramId, location: u32, unit: u32);

    /// Makes a program current.
    fn use_program(&mut self, program: ProgramId);

    /// Binds the buffer indirect draw commands are read from.
    fn bind_draw_indirect_buffer(&mut self, buffer: BufferId);

    /// Issues `draw_count` indexed draws whose parameters are read from the bound
    /// indirect buffer.
    /// ## Arguments
    /// * `mode` - How vertices are assembled into primitives.
    /// * `index_format` - The type of the indices in the bound element buffer.
    /// * `indirect_offset` - Byte offset of the first command in the indirect buffer.
    /// * `draw_count` - Number of consecutive commands to execute.
    /// * `stride` - Byte distance between two commands.
    fn multi_draw_elements_indirect(
        &mut self,
        mode: PrimitiveTopology,
        index_format: IndexFormat,
        indirect_offset: u64,
        draw_count: u32,
        stride: u32,
    );
}

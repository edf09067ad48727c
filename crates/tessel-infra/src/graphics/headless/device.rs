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

use std::collections::HashMap;

use tessel_core::renderer::{
    BufferDescriptor, BufferId, BufferUsage, DrawElementsIndirectCommand, GraphicsDevice,
    IndexFormat, PrimitiveTopology, ProgramId, ResourceError, TextureId, VertexArrayId,
    VertexAttributeBinding,
};

/// One primitive call received by a [`HeadlessDevice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCommand {
    /// `create_buffer`.
    CreateBuffer {
        /// The allocated id.
        id: BufferId,
        /// Requested size.
        size: u64,
        /// Requested update frequency.
        usage: BufferUsage,
    },
    /// `write_buffer`.
    WriteBuffer {
        /// Target buffer.
        id: BufferId,
        /// Byte offset of the write.
        offset: u64,
        /// Number of bytes written.
        len: u64,
    },
    /// `create_vertex_array`.
    CreateVertexArray(VertexArrayId),
    /// `attach_index_buffer`.
    AttachIndexBuffer {
        /// Configured VAO.
        vao: VertexArrayId,
        /// Element buffer.
        buffer: BufferId,
    },
    /// `attach_vertex_attribute`.
    AttachVertexAttribute {
        /// Configured VAO.
        vao: VertexArrayId,
        /// The recorded binding.
        binding: VertexAttributeBinding,
    },
    /// `bind_vertex_array`.
    BindVertexArray(VertexArrayId),
    /// `bind_uniform_buffer`.
    BindUniformBuffer {
        /// Binding point.
        binding_index: u32,
        /// Bound buffer.
        buffer: BufferId,
    },
    /// `bind_texture`.
    BindTexture {
        /// Texture image unit.
        unit: u32,
        /// Bound texture.
        texture: TextureId,
    },
    /// `set_sampler_unit`.
    SetSamplerUnit {
        /// Program owning the sampler.
        program: ProgramId,
        /// Uniform location.
        location: u32,
        /// Texture image unit.
        unit: u32,
    },
    /// `use_program`.
    UseProgram(ProgramId),
    /// `bind_draw_indirect_buffer`.
    BindDrawIndirectBuffer(BufferId),
    /// `multi_draw_elements_indirect`.
    MultiDrawElementsIndirect {
        /// Primitive assembly.
        mode: PrimitiveTopology,
        /// Index type.
        index_format: IndexFormat,
        /// Byte offset into the indirect buffer.
        indirect_offset: u64,
        /// Number of commands.
        draw_count: u32,
        /// Byte stride between commands.
        stride: u32,
    },
}

#[derive(Debug)]
struct HeadlessBufferEntry {
    data: Vec<u8>,
}

/// A [`GraphicsDevice`] without a GPU.
///
/// It allocates ids, keeps a CPU copy of buffer contents, and records every
/// call in order. Tests inspect the recording; the sandbox uses it to replay
/// passes without a window.
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    buffers: HashMap<BufferId, HeadlessBufferEntry>,
    commands: Vec<DeviceCommand>,
    bound_indirect_buffer: Option<BufferId>,

    next_buffer_id: u32,
    next_texture_id: u32,
    next_program_id: u32,
    next_vertex_array_id: u32,
}

impl HeadlessDevice {
    /// Creates a device with nothing allocated.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call received so far, in order.
    pub fn commands(&self) -> &[DeviceCommand] {
        &self.commands
    }

    /// Returns the recording and starts a new one.
    pub fn take_commands(&mut self) -> Vec<DeviceCommand> {
        std::mem::take(&mut self.commands)
    }

    /// The received multi-draw calls.
    pub fn multi_draws(&self) -> impl Iterator<Item = &DeviceCommand> {
        self.commands
            .iter()
            .filter(|command| matches!(command, DeviceCommand::MultiDrawElementsIndirect { .. }))
    }

    /// The number of vertex arrays created so far.
    pub fn vertex_array_count(&self) -> u32 {
        self.next_vertex_array_id
    }

    /// The CPU copy of a buffer.
    pub fn buffer_data(&self, id: BufferId) -> Option<&[u8]> {
        self.buffers.get(&id).map(|entry| entry.data.as_slice())
    }

    /// Allocates a texture id. Textures carry no data on this device.
    pub fn create_texture(&mut self) -> TextureId {
        let id = TextureId(self.next_texture_id);
        self.next_texture_id += 1;
        id
    }

    /// Allocates a program id, standing for an externally linked program.
    pub fn create_program(&mut self) -> ProgramId {
        let id = ProgramId(self.next_program_id);
        self.next_program_id += 1;
        id
    }

    /// Reads `draw_count` commands from the bound indirect buffer.
    ///
    /// ## Errors
    /// * `ResourceError::NotFound` - If no indirect buffer is bound.
    /// * `ResourceError::OutOfBounds` - If the commands exceed the buffer.
    pub fn read_indirect_commands(
        &self,
        indirect_offset: u64,
        draw_count: u32,
    ) -> Result<Vec<DrawElementsIndirectCommand>, ResourceError> {
        let id = self.bound_indirect_buffer.ok_or(ResourceError::NotFound)?;
        let data = self.buffer_data(id).ok_or(ResourceError::NotFound)?;
        let stride = DrawElementsIndirectCommand::STRIDE as u64;
        let size = stride * draw_count as u64;
        let end = indirect_offset + size;
        if end > data.len() as u64 {
            return Err(ResourceError::OutOfBounds {
                offset: indirect_offset,
                size,
                capacity: data.len() as u64,
            });
        }
        Ok(data[indirect_offset as usize..end as usize]
            .chunks_exact(stride as usize)
            .map(bytemuck::pod_read_unaligned)
            .collect())
    }
}

impl GraphicsDevice for HeadlessDevice {
    fn create_buffer(&mut self, descriptor: &BufferDescriptor) -> Result<BufferId, ResourceError> {
        let size = usize::try_from(descriptor.size).map_err(|_| {
            ResourceError::BackendError(format!(
                "buffer of {} bytes does not fit in host memory",
                descriptor.size
            ))
        })?;
        let id = BufferId(self.next_buffer_id);
        self.next_buffer_id += 1;
        self.buffers.insert(
            id,
            HeadlessBufferEntry {
                data: vec![0; size],
            },
        );
        self.commands.push(DeviceCommand::CreateBuffer {
            id,
            size: descriptor.size,
            usage: descriptor.usage,
        });
        log::trace!(
            "HeadlessDevice: Created buffer {:?} ({} bytes, label: {:?})",
            id,
            descriptor.size,
            descriptor.label
        );
        Ok(id)
    }

    fn write_buffer(&mut self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), ResourceError> {
        let entry = self.buffers.get_mut(&id).ok_or(ResourceError::NotFound)?;

        let capacity = entry.data.len() as u64;
        let size = data.len() as u64;
        let end = offset + size;
        if end > capacity {
            return Err(ResourceError::OutOfBounds {
                offset,
                size,
                capacity,
            });
        }
        entry.data[offset as usize..end as usize].copy_from_slice(data);

        self.commands.push(DeviceCommand::WriteBuffer {
            id,
            offset,
            len: size,
        });
        log::trace!(
            "HeadlessDevice: Wrote {} bytes to buffer {:?} at offset {}",
            size,
            id,
            offset
        );
        Ok(())
    }

    fn create_vertex_array(&mut self) -> VertexArrayId {
        let id = VertexArrayId(self.next_vertex_array_id);
        self.next_vertex_array_id += 1;
        self.commands.push(DeviceCommand::CreateVertexArray(id));
        id
    }

    fn attach_index_buffer(&mut self, vao: VertexArrayId, buffer: BufferId) {
        self.commands
            .push(DeviceCommand::AttachIndexBuffer { vao, buffer });
    }

    fn attach_vertex_attribute(&mut self, vao: VertexArrayId, binding: &VertexAttributeBinding) {
        self.commands.push(DeviceCommand::AttachVertexAttribute {
            vao,
            binding: *binding,
        });
    }

    fn bind_vertex_array(&mut self, vao: VertexArrayId) {
        self.commands.push(DeviceCommand::BindVertexArray(vao));
    }

    fn bind_uniform_buffer(&mut self, binding_index: u32, buffer: BufferId) {
        self.commands.push(DeviceCommand::BindUniformBuffer {
            binding_index,
            buffer,
        });
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureId) {
        self.commands
            .push(DeviceCommand::BindTexture { unit, texture });
    }

    fn set_sampler_unit(&mut self, program: ProgramId, location: u32, unit: u32) {
        self.commands.push(DeviceCommand::SetSamplerUnit {
            program,
            location,
            unit,
        });
    }

    fn use_program(&mut self, program: ProgramId) {
        self.commands.push(DeviceCommand::UseProgram(program));
    }

    fn bind_draw_indirect_buffer(&mut self, buffer: BufferId) {
        self.bound_indirect_buffer = Some(buffer);
        self.commands
            .push(DeviceCommand::BindDrawIndirectBuffer(buffer));
    }

    fn multi_draw_elements_indirect(
        &mut self,
        mode: PrimitiveTopology,
        index_format: IndexFormat,
        indirect_offset: u64,
        draw_count: u32,
        stride: u32,
    ) {
        self.commands.push(DeviceCommand::MultiDrawElementsIndirect {
            mode,
            index_format,
            indirect_offset,
            draw_count,
            stride,
        });
    }
}

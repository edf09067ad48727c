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

//! Helpers to allocate buffers and assemble vertex streams in a [`Storage`].

use crate::model::{
    Buffer, BufferView, ConfiguredProgram, GenericStream, IndexBufferView, IntrospectProgram,
    ProgramConfig, VertexStream,
};
use crate::storage::{Arena, Handle, Storage};
use tessel_core::renderer::{
    AttributeDimension, BufferDescriptor, BufferUsage, ClientAttribute, ComponentType,
    DrawInstance, GraphicsDevice, IndexFormat, ResourceError, Semantic,
};

/// The semantic and client layout of one attribute to be stored in a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDescription {
    /// The attribute semantic.
    pub semantic: Semantic,
    /// Shape of one value.
    pub dimension: AttributeDimension,
    /// Scalar type of each component.
    pub component_type: ComponentType,
}

impl AttributeDescription {
    /// Creates a description.
    pub fn new(
        semantic: Semantic,
        dimension: AttributeDimension,
        component_type: ComponentType,
    ) -> Self {
        Self {
            semantic,
            dimension,
            component_type,
        }
    }

    /// The size in bytes of one value.
    pub fn byte_size(&self) -> u32 {
        self.dimension.count_components() * self.component_type.byte_size()
    }

    fn client_attribute(&self, offset: u64) -> ClientAttribute {
        ClientAttribute {
            dimension: self.dimension,
            offset,
            component_type: self.component_type,
        }
    }
}

/// The per-instance stream carrying [`DrawInstance`] records, and its buffer.
#[derive(Debug, Clone)]
pub struct InstanceStream {
    /// Views and attributes, to be merged into vertex streams.
    pub stream: GenericStream,
    /// The buffer instance records are uploaded to.
    pub buffer: Handle<Buffer>,
    /// How many records the buffer can hold.
    pub capacity: u64,
}

/// Allocates a buffer of `element_size * element_count` bytes, without data.
pub fn make_buffer(
    device: &mut dyn GraphicsDevice,
    storage: &mut Storage,
    element_size: u32,
    element_count: u64,
    usage: BufferUsage,
) -> Result<Handle<Buffer>, ResourceError> {
    let size = element_size as u64 * element_count;
    let id = device.create_buffer(&BufferDescriptor {
        label: None,
        size,
        usage,
    })?;
    Ok(storage.buffers.push(Buffer { id, size, usage }))
}

/// Creates a view over `element_count` elements of `buffer`, starting at `offset`.
///
/// ## Errors
/// * `ResourceError::OutOfBounds` - If the elements do not fit in the buffer.
pub fn make_buffer_view(
    storage: &Storage,
    buffer: Handle<Buffer>,
    element_size: u32,
    element_count: u64,
    instance_divisor: u32,
    offset: u64,
) -> Result<BufferView, ResourceError> {
    view_into(
        &storage.buffers,
        buffer,
        element_size,
        element_count,
        instance_divisor,
        offset,
    )
}

/// Allocates a buffer and returns a view covering all of it.
pub fn make_buffer_get_view(
    device: &mut dyn GraphicsDevice,
    storage: &mut Storage,
    element_size: u32,
    element_count: u64,
    instance_divisor: u32,
    usage: BufferUsage,
) -> Result<BufferView, ResourceError> {
    let buffer = make_buffer(device, storage, element_size, element_count, usage)?;
    make_buffer_view(storage, buffer, element_size, element_count, instance_divisor, 0)
}

/// Stores a new vertex stream holding a copy of `generic`'s views and attributes.
/// The stream has no index buffer yet.
pub fn prime_vertex_stream(storage: &mut Storage, generic: &GenericStream) -> Handle<VertexStream> {
    storage.vertex_streams.push(VertexStream {
        vertices: generic.clone(),
        index: None,
    })
}

/// Points the index buffer of `stream` to `indices_count` indices in `buffer` at `offset`.
pub fn set_index_buffer(
    storage: &mut Storage,
    stream: Handle<VertexStream>,
    format: IndexFormat,
    buffer: Handle<Buffer>,
    indices_count: u64,
    offset: u64,
) -> Result<(), ResourceError> {
    let view = view_into(
        &storage.buffers,
        buffer,
        format.byte_size() as u32,
        indices_count,
        0,
        offset,
    )?;
    let stream = storage
        .vertex_streams
        .get_mut(stream)
        .ok_or(ResourceError::InvalidHandle)?;
    stream.index = Some(IndexBufferView { view, format });
    Ok(())
}

/// Adds a tightly packed per-vertex attribute, stored in `buffer` at `offset`.
pub fn add_vertex_attribute(
    storage: &mut Storage,
    stream: Handle<VertexStream>,
    attribute: &AttributeDescription,
    buffer: Handle<Buffer>,
    vertices_count: u64,
    offset: u64,
) -> Result<(), ResourceError> {
    add_interleaved_attributes(
        storage,
        stream,
        std::slice::from_ref(attribute),
        buffer,
        vertices_count,
        offset,
    )
}

/// Adds attributes interleaved in a single view of `buffer` starting at `offset`.
///
/// Attributes are laid out in slice order without padding; the view stride is
/// the sum of their sizes.
pub fn add_interleaved_attributes(
    storage: &mut Storage,
    stream: Handle<VertexStream>,
    attributes: &[AttributeDescription],
    buffer: Handle<Buffer>,
    vertices_count: u64,
    offset: u64,
) -> Result<(), ResourceError> {
    let Storage {
        buffers,
        vertex_streams,
        ..
    } = storage;
    let stream = vertex_streams
        .get_mut(stream)
        .ok_or(ResourceError::InvalidHandle)?;
    interleave_into(
        buffers,
        &mut stream.vertices,
        attributes,
        buffer,
        vertices_count,
        0,
        offset,
    )
}

/// Allocates the buffer of the per-instance stream and describes its attributes.
///
/// Each [`DrawInstance`] field is exposed as a one-component `u32` attribute:
/// `ModelTransformIdx`, `MaterialIdx` and `MatrixPaletteOffset`.
pub fn make_instance_stream(
    device: &mut dyn GraphicsDevice,
    storage: &mut Storage,
    max_instances: u64,
    instance_divisor: u32,
) -> Result<InstanceStream, ResourceError> {
    let attributes = [
        AttributeDescription::new(
            Semantic::MODEL_TRANSFORM_IDX,
            AttributeDimension::vector(1),
            ComponentType::Uint32,
        ),
        AttributeDescription::new(
            Semantic::MATERIAL_IDX,
            AttributeDimension::vector(1),
            ComponentType::Uint32,
        ),
        AttributeDescription::new(
            Semantic::MATRIX_PALETTE_OFFSET,
            AttributeDimension::vector(1),
            ComponentType::Uint32,
        ),
    ];
    let record_size = std::mem::size_of::<DrawInstance>() as u32;
    let buffer = make_buffer(
        device,
        storage,
        record_size,
        max_instances,
        BufferUsage::StreamDraw,
    )?;

    let mut stream = GenericStream::default();
    interleave_into(
        &storage.buffers,
        &mut stream,
        &attributes,
        buffer,
        max_instances,
        instance_divisor,
        0,
    )?;
    Ok(InstanceStream {
        stream,
        buffer,
        capacity: max_instances,
    })
}

/// Creates a vertex stream with its own index buffer and one buffer per attribute.
///
/// The views and attributes of `extra` (e.g. the instance stream) are copied into
/// the new stream first.
pub fn make_vertex_stream(
    device: &mut dyn GraphicsDevice,
    storage: &mut Storage,
    vertices_count: u64,
    indices_count: u64,
    index_format: IndexFormat,
    attributes: &[AttributeDescription],
    extra: &GenericStream,
) -> Result<Handle<VertexStream>, ResourceError> {
    let index_view = make_buffer_get_view(
        device,
        storage,
        index_format.byte_size() as u32,
        indices_count,
        0,
        BufferUsage::StaticDraw,
    )?;

    let mut vertices = extra.clone();
    for attribute in attributes {
        let view = make_buffer_get_view(
            device,
            storage,
            attribute.byte_size(),
            vertices_count,
            0,
            BufferUsage::StaticDraw,
        )?;
        let view_index = vertices.push_view(view);
        vertices.insert_attribute(
            attribute.semantic.clone(),
            view_index,
            attribute.client_attribute(0),
        );
    }

    Ok(storage.vertex_streams.push(VertexStream {
        vertices,
        index: Some(IndexBufferView {
            view: index_view,
            format: index_format,
        }),
    }))
}

/// Stores `program` with a fresh, empty VAO cache of its own.
pub fn store_configured_program(
    storage: &mut Storage,
    program: IntrospectProgram,
) -> Handle<ConfiguredProgram> {
    let config = storage.program_configs.push(ProgramConfig::default());
    storage.programs.push(ConfiguredProgram { program, config })
}

fn view_into(
    buffers: &Arena<Buffer>,
    buffer: Handle<Buffer>,
    element_size: u32,
    element_count: u64,
    instance_divisor: u32,
    offset: u64,
) -> Result<BufferView, ResourceError> {
    BufferView::new(
        buffers,
        buffer,
        element_size,
        instance_divisor,
        offset,
        element_size as u64 * element_count,
    )
}

fn interleave_into(
    buffers: &Arena<Buffer>,
    stream: &mut GenericStream,
    attributes: &[AttributeDescription],
    buffer: Handle<Buffer>,
    element_count: u64,
    instance_divisor: u32,
    offset: u64,
) -> Result<(), ResourceError> {
    let stride: u32 = attributes.iter().map(AttributeDescription::byte_size).sum();
    let view = view_into(buffers, buffer, stride, element_count, instance_divisor, offset)?;
    let view_index = stream.push_view(view);

    let mut attribute_offset = 0u64;
    for attribute in attributes {
        stream.insert_attribute(
            attribute.semantic.clone(),
            view_index,
            attribute.client_attribute(attribute_offset),
        );
        attribute_offset += attribute.byte_size() as u64;
    }
    Ok(())
}

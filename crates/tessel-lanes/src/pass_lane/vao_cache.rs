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

//! Per-program cache of vertex array objects.

use crate::error::PassError;
use tessel_core::renderer::{
    GraphicsDevice, ResourceError, VertexArrayId, VertexAttributeBinding,
};
use tessel_data::model::{
    AttributeAccessor, BufferView, ConfiguredProgram, IntrospectProgram, Part, ProgramAttribute,
    ProgramConfigEntry, VertexArray, VertexStream,
};
use tessel_data::{Handle, Storage};

/// Returns the VAO drawing `part` with `program`, configuring it on first use.
///
/// The lookup key is the identity of the part's vertex stream: two streams with
/// identical layouts still get distinct VAOs. A new VAO is appended to
/// `storage.vaos` and to the program's config, entries are never evicted.
pub fn get_vao(
    device: &mut dyn GraphicsDevice,
    storage: &mut Storage,
    program: Handle<ConfiguredProgram>,
    part: Handle<Part>,
) -> Result<Handle<VertexArray>, PassError> {
    let vertex_stream = storage
        .parts
        .get(part)
        .ok_or(ResourceError::InvalidHandle)?
        .vertex_stream;
    let configured = storage
        .programs
        .get(program)
        .ok_or(ResourceError::InvalidHandle)?;
    let config_handle = configured.config;
    let config = storage
        .program_configs
        .get(config_handle)
        .ok_or(ResourceError::InvalidHandle)?;

    if let Some(vao) = config.find(vertex_stream) {
        return Ok(vao);
    }

    let stream = storage
        .vertex_streams
        .get(vertex_stream)
        .ok_or(ResourceError::InvalidHandle)?;
    let id = prepare_vao(device, storage, &configured.program, stream)?;

    let vao = storage.vaos.push(VertexArray { id });
    storage.program_configs[config_handle]
        .entries
        .push(ProgramConfigEntry { vertex_stream, vao });
    Ok(vao)
}

/// Creates a VAO feeding every attribute of `program` from `stream`.
///
/// The index buffer of the stream, if any, is attached first. Attributes are
/// matched by semantic; an attribute without data is skipped with a warning.
/// Every attribute is validated before the device VAO is created, so a failure
/// leaves no VAO behind.
///
/// ## Errors
/// * `PassError::RowCountMismatch` - If an attribute's data has a different row count.
pub fn prepare_vao(
    device: &mut dyn GraphicsDevice,
    storage: &Storage,
    program: &IntrospectProgram,
    stream: &VertexStream,
) -> Result<VertexArrayId, PassError> {
    let index_buffer = match &stream.index {
        Some(index) => Some(
            storage
                .buffers
                .get(index.view.buffer)
                .ok_or(ResourceError::InvalidHandle)?
                .id,
        ),
        None => None,
    };

    let mut bindings = Vec::with_capacity(program.attributes.len());
    for attribute in &program.attributes {
        match stream.vertices.accessor(&attribute.semantic) {
            Some(accessor) => {
                let view = stream
                    .vertices
                    .vertex_buffer_views
                    .get(accessor.buffer_view_index)
                    .ok_or(ResourceError::OutOfBounds {
                        offset: accessor.buffer_view_index as u64,
                        size: 1,
                        capacity: stream.vertices.vertex_buffer_views.len() as u64,
                    })?;
                bindings.push(attribute_binding(storage, program, attribute, accessor, view)?);
            }
            None => {
                log::warn!(
                    "prepare_vao: Could not find a vertex buffer for semantic '{}' in program '{}'.",
                    attribute.semantic,
                    program.name
                );
            }
        }
    }

    let vao = device.create_vertex_array();
    if let Some(buffer) = index_buffer {
        device.attach_index_buffer(vao, buffer);
    }
    for binding in &bindings {
        device.attach_vertex_attribute(vao, binding);
    }

    log::info!("Configured a new VAO.");
    Ok(vao)
}

fn attribute_binding(
    storage: &Storage,
    program: &IntrospectProgram,
    attribute: &ProgramAttribute,
    accessor: &AttributeAccessor,
    view: &BufferView,
) -> Result<VertexAttributeBinding, PassError> {
    let mut client = accessor.client_data_format;

    if client.dimension.rows != attribute.dimension.rows {
        log::error!(
            "attribute_binding: Program '{}' attribute '{}' ({}) of dimension {} is to be attached to vertex data of dimension {}. Row counts are not allowed to differ.",
            program.name,
            attribute.name,
            attribute.semantic,
            attribute.dimension,
            client.dimension
        );
        return Err(PassError::RowCountMismatch {
            program: program.name.clone(),
            attribute: attribute.name.clone(),
            semantic: attribute.semantic.clone(),
            expected: attribute.dimension,
            provided: client.dimension,
        });
    } else if client.dimension.components != attribute.dimension.components {
        log::warn!(
            "attribute_binding: Program '{}' attribute '{}' ({}) of dimension {} is to be attached to vertex data of dimension {}.",
            program.name,
            attribute.name,
            attribute.semantic,
            attribute.dimension,
            client.dimension
        );
    }

    let buffer = storage
        .buffers
        .get(view.buffer)
        .ok_or(ResourceError::InvalidHandle)?;

    // The accessor offset is relative to the view, the device expects it relative to the buffer.
    client.offset += view.offset;
    Ok(VertexAttributeBinding {
        location: attribute.location,
        normalized: attribute.normalized,
        client,
        buffer: buffer.id,
        stride: view.stride,
        instance_divisor: view.instance_divisor,
    })
}

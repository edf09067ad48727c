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

//! Semantic-keyed collections of buffer views.

use super::buffer_view::BufferView;
use std::collections::BTreeMap;
use tessel_core::renderer::{ClientAttribute, IndexFormat, Semantic};

/// Locates one attribute: which view of the stream, and how its data is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeAccessor {
    /// Index into the owning stream's `vertex_buffer_views`.
    pub buffer_view_index: usize,
    /// Client layout, `offset` being relative to the start of the view element.
    pub client_data_format: ClientAttribute,
}

/// Buffer views with their semantic-to-attribute mapping.
///
/// Also used on its own for streams that are not drawn from directly, like the
/// per-instance stream merged into every vertex stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenericStream {
    /// The views the accessors point into.
    pub vertex_buffer_views: Vec<BufferView>,
    /// Attribute lookup by semantic.
    pub semantic_to_attribute: BTreeMap<Semantic, AttributeAccessor>,
}

impl GenericStream {
    /// Appends a view and returns its index.
    pub fn push_view(&mut self, view: BufferView) -> usize {
        self.vertex_buffer_views.push(view);
        self.vertex_buffer_views.len() - 1
    }

    /// Maps `semantic` to an attribute of the view at `buffer_view_index`.
    /// A previous mapping for the same semantic is replaced.
    pub fn insert_attribute(
        &mut self,
        semantic: Semantic,
        buffer_view_index: usize,
        client_data_format: ClientAttribute,
    ) {
        self.semantic_to_attribute.insert(
            semantic,
            AttributeAccessor {
                buffer_view_index,
                client_data_format,
            },
        );
    }

    /// The accessor registered for `semantic`.
    pub fn accessor(&self, semantic: &Semantic) -> Option<&AttributeAccessor> {
        self.semantic_to_attribute.get(semantic)
    }

    /// The view holding the data for `semantic`.
    pub fn buffer_view(&self, semantic: &Semantic) -> Option<&BufferView> {
        self.accessor(semantic)
            .and_then(|accessor| self.vertex_buffer_views.get(accessor.buffer_view_index))
    }

    /// Appends every view and attribute of `other`, re-indexing its accessors.
    pub fn merge(&mut self, other: &GenericStream) {
        let base = self.vertex_buffer_views.len();
        self.vertex_buffer_views
            .extend(other.vertex_buffer_views.iter().copied());
        for (semantic, accessor) in &other.semantic_to_attribute {
            self.semantic_to_attribute.insert(
                semantic.clone(),
                AttributeAccessor {
                    buffer_view_index: base + accessor.buffer_view_index,
                    client_data_format: accessor.client_data_format,
                },
            );
        }
    }
}

/// The index buffer of a vertex stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexBufferView {
    /// The view into the index buffer.
    pub view: BufferView,
    /// The type of each index.
    pub format: IndexFormat,
}

/// Everything a part draws from: its attributes and (optionally) its indices.
///
/// A vertex stream's handle is the lookup key of the per-program VAO caches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexStream {
    /// Views and attributes.
    pub vertices: GenericStream,
    /// The index buffer, `None` for non-indexed streams.
    pub index: Option<IndexBufferView>,
}

impl VertexStream {
    /// The view holding the data for `semantic`.
    pub fn buffer_view(&self, semantic: &Semantic) -> Option<&BufferView> {
        self.vertices.buffer_view(semantic)
    }

    /// The type of the indices, if the stream is indexed.
    pub fn index_format(&self) -> Option<IndexFormat> {
        self.index.map(|index| index.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Handle;
    use tessel_core::renderer::{AttributeDimension, ComponentType};

    fn view(offset: u64) -> BufferView {
        BufferView {
            buffer: Handle::from_raw(0),
            stride: 12,
            instance_divisor: 0,
            offset,
            size: 120,
        }
    }

    fn vec3_format() -> ClientAttribute {
        ClientAttribute {
            dimension: AttributeDimension::vector(3),
            offset: 0,
            component_type: ComponentType::Float32,
        }
    }

    #[test]
    fn lookup_by_semantic() {
        let mut stream = GenericStream::default();
        let idx = stream.push_view(view(0));
        stream.insert_attribute(Semantic::POSITION, idx, vec3_format());

        assert_eq!(stream.buffer_view(&Semantic::POSITION), Some(&view(0)));
        assert!(stream.buffer_view(&Semantic::NORMAL).is_none());
    }

    #[test]
    fn merge_reindexes_accessors() {
        let mut base = GenericStream::default();
        let idx = base.push_view(view(0));
        base.insert_attribute(Semantic::POSITION, idx, vec3_format());

        let mut instances = GenericStream::default();
        let idx = instances.push_view(view(240));
        instances.insert_attribute(Semantic::MATERIAL_IDX, idx, vec3_format());

        base.merge(&instances);
        assert_eq!(base.vertex_buffer_views.len(), 2);
        assert_eq!(base.accessor(&Semantic::MATERIAL_IDX).unwrap().buffer_view_index, 1);
        assert_eq!(base.buffer_view(&Semantic::MATERIAL_IDX), Some(&view(240)));
    }
}

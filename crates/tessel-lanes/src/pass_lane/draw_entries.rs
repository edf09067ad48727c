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

//! Turns a part list into sortable draw entries.

use super::pass_cache::DrawCall;
use super::resource_id_map::ResourceIdMap;
use super::sort_key::{SortKey, MATERIAL_CONTEXT_ID_BITS, PROGRAM_ID_BITS, VAO_ID_BITS};
use super::technique::get_program;
use super::vao_cache::get_vao;
use crate::error::PassError;
use tessel_core::renderer::{CpuProfiler, GraphicsDevice, ResourceError};
use tessel_data::model::{
    Annotation, ConfiguredProgram, MaterialContext, Part, VertexArray, VertexStream,
};
use tessel_data::{PartList, Storage};

/// Associates a sort key to the index of an entry in a [`PartList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartDrawEntry {
    /// The packed (program, material context, VAO) ids.
    pub key: SortKey,
    /// Index into the part list arrays.
    pub part_list_idx: usize,
}

/// Generates draw entries, and turns their keys back into draw calls.
///
/// The id maps backing the keys live here: a key can only be decoded by the
/// helper that generated it.
#[derive(Debug, Default)]
pub struct DrawEntryHelper {
    program_to_id: ResourceIdMap<ConfiguredProgram, PROGRAM_ID_BITS>,
    vao_to_id: ResourceIdMap<VertexArray, VAO_ID_BITS>,
    material_context_to_id: ResourceIdMap<MaterialContext, MATERIAL_CONTEXT_ID_BITS>,
}

impl DrawEntryHelper {
    /// Creates a helper with empty id maps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns one entry per part list entry whose effect has a technique
    /// satisfying `annotations`, in part list order (unsorted).
    ///
    /// VAOs missing from the program caches are configured on the way.
    pub fn generate_draw_entries(
        &mut self,
        device: &mut dyn GraphicsDevice,
        annotations: &[Annotation],
        part_list: &PartList,
        storage: &mut Storage,
        profiler: &mut dyn CpuProfiler,
    ) -> Result<Vec<PartDrawEntry>, PassError> {
        profiler.begin_section("generate_draw_entries");
        let result = self.generate_entries_impl(device, annotations, part_list, storage);
        profiler.end_section();
        result
    }

    fn generate_entries_impl(
        &mut self,
        device: &mut dyn GraphicsDevice,
        annotations: &[Annotation],
        part_list: &PartList,
        storage: &mut Storage,
    ) -> Result<Vec<PartDrawEntry>, PassError> {
        let mut entries = Vec::with_capacity(part_list.len());

        for (part_list_idx, (&part, material)) in part_list
            .parts
            .iter()
            .zip(&part_list.materials)
            .enumerate()
        {
            let effect = storage
                .effects
                .get(material.effect)
                .ok_or(ResourceError::InvalidHandle)?;

            let Some(program) = get_program(effect, annotations) else {
                continue;
            };
            let vao = get_vao(device, storage, program, part)?;

            let key = SortKey::pack(
                self.program_to_id.get(Some(program))?,
                self.material_context_to_id.get(material.context)?,
                self.vao_to_id.get(Some(vao))?,
            );
            entries.push(PartDrawEntry { key, part_list_idx });
        }

        Ok(entries)
    }

    /// Decodes the key of `entry` into the header of a draw call.
    ///
    /// The primitive mode comes from `part`, the index format from `vertex_stream`.
    /// The returned call has a `draw_count` of zero.
    pub fn generate_draw_call(
        &self,
        entry: &PartDrawEntry,
        part: &Part,
        vertex_stream: &VertexStream,
    ) -> Result<DrawCall, PassError> {
        let index_format = vertex_stream
            .index_format()
            .ok_or_else(|| PassError::MissingIndexBuffer {
                part: part.name.clone(),
            })?;
        let (program_id, material_context_id, vao_id) = entry.key.decode();

        Ok(DrawCall {
            topology: part.topology,
            index_format,
            program: self.program_to_id.reverse_lookup_some(program_id)?,
            vao: self.vao_to_id.reverse_lookup_some(vao_id)?,
            material_context: self
                .material_context_to_id
                .reverse_lookup(material_context_id)?,
            draw_count: 0,
        })
    }
}

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

//! Consolidation of draw entries into draw calls and indirect commands.

use super::draw_entries::DrawEntryHelper;
use super::sort_key::SortKey;
use crate::error::PassError;
use std::collections::BTreeSet;
use std::fmt;
use tessel_core::renderer::{
    CpuProfiler, DrawElementsIndirectCommand, DrawInstance, GraphicsDevice, IndexFormat,
    PrimitiveTopology, ResourceError,
};
use tessel_data::model::{Annotation, ConfiguredProgram, MaterialContext, VertexArray};
use tessel_data::{Handle, PartList, Storage};

/// The state shared by consecutive indirect commands, issued as one multi-draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    /// How vertices are assembled.
    pub topology: PrimitiveTopology,
    /// Type of the indices in the bound element buffer.
    pub index_format: IndexFormat,
    /// The program to draw with.
    pub program: Handle<ConfiguredProgram>,
    /// The VAO to draw from.
    pub vao: Handle<VertexArray>,
    /// Repositories overriding the pass-global ones, if any.
    pub material_context: Option<Handle<MaterialContext>>,
    /// Number of consecutive commands in the indirect buffer for this call.
    /// The first one is at the sum of the preceding calls' counts.
    pub draw_count: u32,
}

/// Everything needed to replay a pass.
///
/// `draw_commands` and `draw_instances` are parallel: command `i` reads
/// instance `i` through its `base_instance`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassCache {
    /// Draw calls in ascending key order.
    pub calls: Vec<DrawCall>,
    /// Indirect commands, to upload into the draw indirect buffer.
    pub draw_commands: Vec<DrawElementsIndirectCommand>,
    /// Per-instance data, to upload into the instance stream buffer.
    pub draw_instances: Vec<DrawInstance>,
}

/// Counters describing a prepared pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Number of multi-draw calls.
    pub draw_calls: usize,
    /// Number of indirect commands.
    pub commands: usize,
    /// Distinct programs.
    pub programs: usize,
    /// Distinct material contexts, the null context included.
    pub material_contexts: usize,
    /// Distinct VAOs.
    pub vaos: usize,
}

impl fmt::Display for PassStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} draw calls, {} commands ({} programs, {} material contexts, {} VAOs)",
            self.draw_calls, self.commands, self.programs, self.material_contexts, self.vaos
        )
    }
}

impl PassCache {
    /// The indirect commands as bytes, for upload.
    pub fn command_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.draw_commands)
    }

    /// The instance records as bytes, for upload.
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.draw_instances)
    }

    /// Returns `true` if the pass draws nothing.
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Counts the calls, commands and distinct bound states.
    pub fn stats(&self) -> PassStats {
        let programs: BTreeSet<_> = self.calls.iter().map(|call| call.program).collect();
        let contexts: BTreeSet<_> = self.calls.iter().map(|call| call.material_context).collect();
        let vaos: BTreeSet<_> = self.calls.iter().map(|call| call.vao).collect();
        PassStats {
            draw_calls: self.calls.len(),
            commands: self.draw_commands.len(),
            programs: programs.len(),
            material_contexts: contexts.len(),
            vaos: vaos.len(),
        }
    }
}

/// Builds the pass cache drawing every part of `part_list` that has a technique
/// satisfying `annotations`.
///
/// Entries are sorted by key, then split into runs of equal key and primitive
/// topology. Each run becomes one [`DrawCall`]; each entry one indirect command
/// and one instance record. On error nothing is returned: the storage may have
/// gained VAOs, but no partial cache escapes.
pub fn prepare_pass(
    device: &mut dyn GraphicsDevice,
    annotations: &[Annotation],
    part_list: &PartList,
    storage: &mut Storage,
    profiler: &mut dyn CpuProfiler,
) -> Result<PassCache, PassError> {
    profiler.begin_section("prepare_pass");
    let result = prepare_pass_impl(device, annotations, part_list, storage, profiler);
    profiler.end_section();
    result
}

fn prepare_pass_impl(
    device: &mut dyn GraphicsDevice,
    annotations: &[Annotation],
    part_list: &PartList,
    storage: &mut Storage,
    profiler: &mut dyn CpuProfiler,
) -> Result<PassCache, PassError> {
    check_part_list(part_list)?;

    let mut helper = DrawEntryHelper::new();
    let entries =
        helper.generate_draw_entries(device, annotations, part_list, storage, profiler)?;

    // The topology is not a key dimension but must be uniform within a call.
    let mut sorted = entries
        .into_iter()
        .map(|entry| {
            storage
                .parts
                .get(part_list.parts[entry.part_list_idx])
                .map(|part| (entry, part.topology))
                .ok_or(ResourceError::InvalidHandle)
        })
        .collect::<Result<Vec<_>, _>>()?;

    profiler.begin_section("sort_draw_entries");
    sorted.sort_unstable_by_key(|(entry, topology)| (entry.key, *topology));
    profiler.end_section();

    let storage = &*storage;
    let mut result = PassCache {
        calls: Vec::new(),
        draw_commands: Vec::with_capacity(sorted.len()),
        draw_instances: Vec::with_capacity(sorted.len()),
    };
    let mut current: Option<(SortKey, PrimitiveTopology)> = None;

    for (entry, topology) in &sorted {
        let part = storage
            .parts
            .get(part_list.parts[entry.part_list_idx])
            .ok_or(ResourceError::InvalidHandle)?;
        let vertex_stream = storage
            .vertex_streams
            .get(part.vertex_stream)
            .ok_or(ResourceError::InvalidHandle)?;

        // A new call starts on every change of key or topology.
        if current != Some((entry.key, *topology)) {
            current = Some((entry.key, *topology));
            result
                .calls
                .push(helper.generate_draw_call(entry, part, vertex_stream)?);
        }
        if let Some(call) = result.calls.last_mut() {
            call.draw_count += 1;
        }

        let index = vertex_stream
            .index
            .ok_or_else(|| PassError::MissingIndexBuffer {
                part: part.name.clone(),
            })?;
        let index_size = index.format.byte_size();
        // Indirect commands address indices by count, not by byte offset.
        if index.view.offset % index_size != 0 {
            return Err(PassError::MisalignedIndexBuffer {
                offset: index.view.offset,
                index_size,
            });
        }

        let first_index = u32::try_from(index.view.offset / index_size)
            .ok()
            .and_then(|view_first| view_first.checked_add(part.index_first))
            .ok_or_else(|| PassError::IndexRangeOverflow {
                part: part.name.clone(),
                view_offset: index.view.offset,
                index_size,
                index_first: part.index_first,
            })?;

        result.draw_commands.push(DrawElementsIndirectCommand {
            count: part.index_count,
            instance_count: 1,
            first_index,
            base_vertex: part.vertex_first,
            base_instance: result.draw_instances.len() as u32,
        });

        let material = &part_list.materials[entry.part_list_idx];
        result.draw_instances.push(DrawInstance {
            instance_transform_idx: part_list.transform_idx[entry.part_list_idx],
            material_idx: material.parameter_index,
            matrix_palette_offset: part_list.palette_offset[entry.part_list_idx],
        });
    }

    log::debug!(
        "Prepared pass {:?}: {}",
        annotations
            .iter()
            .map(|annotation| format!("{}={}", annotation.category, annotation.value))
            .collect::<Vec<_>>(),
        result.stats()
    );
    Ok(result)
}

fn check_part_list(part_list: &PartList) -> Result<(), PassError> {
    let parts = part_list.parts.len();
    if part_list.materials.len() != parts
        || part_list.transform_idx.len() != parts
        || part_list.palette_offset.len() != parts
    {
        return Err(PassError::InconsistentPartList {
            parts,
            materials: part_list.materials.len(),
            transforms: part_list.transform_idx.len(),
            palettes: part_list.palette_offset.len(),
        });
    }
    Ok(())
}

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

//! Replays a [`PassCache`] against a [`GraphicsDevice`].
//!
//! Nothing is sorted or filtered here. The executor expects the indirect
//! commands and the instance records of the cache to be uploaded already, and
//! the draw indirect buffer to be bound.

use super::pass_cache::PassCache;
use crate::error::PassError;
use tessel_core::renderer::{
    CpuProfiler, DrawElementsIndirectCommand, GraphicsDevice, ResourceError,
};
use tessel_data::model::{
    IntrospectProgram, MaterialContext, RepositoryTexture, RepositoryUbo, UniformKind,
};
use tessel_data::{Handle, Storage};

/// Issues one indirect multi-draw per draw call of `pass_cache`.
///
/// `ubo_repo` and `texture_repo` are the pass-global repositories, extended for
/// each call by the entries of its material context.
pub fn draw(
    device: &mut dyn GraphicsDevice,
    pass_cache: &PassCache,
    storage: &Storage,
    ubo_repo: &RepositoryUbo,
    texture_repo: &RepositoryTexture,
    profiler: &mut dyn CpuProfiler,
) -> Result<(), PassError> {
    profiler.begin_section("draw_pass");
    let result = draw_impl(device, pass_cache, storage, ubo_repo, texture_repo);
    profiler.end_section();
    result
}

fn draw_impl(
    device: &mut dyn GraphicsDevice,
    pass_cache: &PassCache,
    storage: &Storage,
    ubo_repo: &RepositoryUbo,
    texture_repo: &RepositoryTexture,
) -> Result<(), PassError> {
    let mut first_instance: u64 = 0;

    for call in &pass_cache.calls {
        let vao = storage
            .vaos
            .get(call.vao)
            .ok_or(ResourceError::InvalidHandle)?;
        let configured = storage
            .programs
            .get(call.program)
            .ok_or(ResourceError::InvalidHandle)?;

        device.bind_vertex_array(vao.id);
        setup_program_repositories(
            device,
            storage,
            call.material_context,
            ubo_repo.clone(),
            texture_repo.clone(),
            &configured.program,
        )?;
        device.use_program(configured.program.program);

        device.multi_draw_elements_indirect(
            call.topology,
            call.index_format,
            first_instance * DrawElementsIndirectCommand::STRIDE as u64,
            call.draw_count,
            DrawElementsIndirectCommand::STRIDE,
        );
        first_instance += u64::from(call.draw_count);
    }

    Ok(())
}

/// Binds the uniform blocks and the textures `program` reads.
///
/// The entries of `context`, when present, replace the ones of the same
/// semantic in `ubo_repo` and `texture_repo`. Uniform blocks are bound at their
/// binding index. Sampler uniforms get consecutive texture units, starting at
/// zero, in declaration order.
pub fn setup_program_repositories(
    device: &mut dyn GraphicsDevice,
    storage: &Storage,
    context: Option<Handle<MaterialContext>>,
    mut ubo_repo: RepositoryUbo,
    mut texture_repo: RepositoryTexture,
    program: &IntrospectProgram,
) -> Result<(), PassError> {
    if let Some(context) = context {
        let context = storage
            .material_contexts
            .get(context)
            .ok_or(ResourceError::InvalidHandle)?;
        ubo_repo.extend(context.ubo_repo.iter().map(|(k, v)| (k.clone(), *v)));
        texture_repo.extend(context.texture_repo.iter().map(|(k, v)| (k.clone(), *v)));
    }

    for block in &program.uniform_blocks {
        match ubo_repo.get(&block.semantic) {
            Some(&ubo) => {
                let ubo = storage.ubos.get(ubo).ok_or(ResourceError::InvalidHandle)?;
                device.bind_uniform_buffer(block.binding_index, ubo.id);
            }
            None => log::warn!(
                "setup_program_repositories: Could not find an uniform buffer for block '{}' ({}) in program '{}'.",
                block.name,
                block.semantic,
                program.name
            ),
        }
    }

    let mut texture_unit: u32 = 0;
    for uniform in program
        .uniforms
        .iter()
        .filter(|uniform| uniform.kind == UniformKind::Sampler)
    {
        if uniform.array_size != 1 {
            log::error!(
                "setup_program_repositories: Program '{}' sampler '{}' is an array of size {}, only its first element is bound.",
                program.name,
                uniform.name,
                uniform.array_size
            );
        }

        match texture_repo.get(&uniform.semantic) {
            Some(&texture) => {
                let texture = storage
                    .textures
                    .get(texture)
                    .ok_or(ResourceError::InvalidHandle)?;
                device.bind_texture(texture_unit, texture.id);
                device.set_sampler_unit(program.program, uniform.location, texture_unit);
                texture_unit += 1;
            }
            None => log::error!(
                "setup_program_repositories: Could not find a texture for sampler '{}' ({}) in program '{}'.",
                uniform.name,
                uniform.semantic,
                program.name
            ),
        }
    }

    Ok(())
}

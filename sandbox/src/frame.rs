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

//! One frame: every configured pass is prepared, uploaded and replayed.

use crate::scene::Scene;
use anyhow::{ensure, Result};
use tessel_core::renderer::{CpuProfiler, GraphicsDevice, PassSettings};
use tessel_data::PartList;
use tessel_lanes::pass_lane::{draw, prepare_pass, select_pass, PassCache, PassStats};

/// Renders `frame` with the passes of `settings`, in order.
pub fn render_frame(
    scene: &mut Scene,
    settings: &PassSettings,
    frame: u32,
    profiler: &mut dyn CpuProfiler,
) -> Result<()> {
    let part_list = scene.part_list(frame)?;
    scene.upload_part_list(&part_list)?;
    let bounds = scene.world_bounds(frame);
    log::debug!(
        "Frame {frame}: {} parts within {:?} .. {:?}",
        part_list.len(),
        bounds.min,
        bounds.max
    );

    for pass_name in &settings.pass_names {
        let stats = render_pass(scene, &part_list, pass_name, profiler)?;
        if settings.log_pass_stats {
            log::info!("Frame {frame}, pass '{pass_name}': {stats}");
        }
    }
    Ok(())
}

fn render_pass(
    scene: &mut Scene,
    part_list: &PartList,
    pass_name: &str,
    profiler: &mut dyn CpuProfiler,
) -> Result<PassStats> {
    let cache = prepare_pass(
        &mut scene.device,
        &select_pass(pass_name),
        part_list,
        &mut scene.storage,
        profiler,
    )?;
    if cache.is_empty() {
        log::warn!("Pass '{pass_name}' has nothing to draw.");
        return Ok(cache.stats());
    }

    profiler.begin_section("upload_pass");
    let uploaded = upload_pass(scene, &cache);
    profiler.end_section();
    uploaded?;

    draw(
        &mut scene.device,
        &cache,
        &scene.storage,
        &scene.ubo_repo,
        &scene.texture_repo,
        profiler,
    )?;

    let replayed = scene
        .device
        .read_indirect_commands(0, cache.draw_commands.len() as u32)?;
    ensure!(
        replayed == cache.draw_commands,
        "pass '{pass_name}': the indirect buffer does not hold the prepared commands"
    );
    Ok(cache.stats())
}

fn upload_pass(scene: &mut Scene, cache: &PassCache) -> Result<()> {
    ensure!(
        cache.draw_instances.len() as u64 <= scene.instances.capacity,
        "{} instances exceed the instance stream capacity of {}",
        cache.draw_instances.len(),
        scene.instances.capacity
    );
    let instances = scene.storage.buffers[scene.instances.buffer].id;
    scene.device.write_buffer(instances, 0, cache.instance_bytes())?;

    let indirect = scene.indirect_buffer(cache.draw_commands.len() as u64)?;
    let indirect = scene.storage.buffers[indirect].id;
    scene.device.write_buffer(indirect, 0, cache.command_bytes())?;
    scene.device.bind_draw_indirect_buffer(indirect);
    Ok(())
}

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

//! Sandbox: builds a scene from a RON config, then prepares and replays its
//! passes on a headless device for a few frames.
//!
//! Usage: `sandbox [config.ron] [profile.json]`. The shipped `config/scene.ron`
//! is used when no config is given. When a second path is given, the section
//! timings are written there as JSON. `RUST_LOG=debug` shows per-pass
//! preparation details.

mod config;
mod frame;
mod programs;
mod scene;

use anyhow::{Context, Result};
use config::{SandboxConfig, DEFAULT_CONFIG};
use scene::Scene;
use tessel_core::renderer::CpuProfiler;
use tessel_telemetry::{init_logging, SectionProfiler};

fn main() -> Result<()> {
    init_logging();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SandboxConfig::load(path)?,
        None => SandboxConfig::from_ron(DEFAULT_CONFIG)?,
    };
    log::debug!("{config:#?}");

    let mut scene = Scene::build(&config)?;
    let mut profiler = SectionProfiler::new();

    for frame in 0..config.frames {
        profiler.begin_section("frame");
        let rendered = frame::render_frame(&mut scene, &config.passes, frame, &mut profiler);
        profiler.end_section();
        rendered?;
    }

    profiler.report();
    if let Some(path) = args.next() {
        let json = profiler.to_json()?;
        std::fs::write(&path, json).with_context(|| format!("cannot write the profile to '{path}'"))?;
        log::info!("Section timings written to '{path}'.");
    }
    log::info!(
        "{} frames rendered, {} VAOs configured for {} programs.",
        config.frames,
        scene.storage.vaos.len(),
        scene.storage.programs.len()
    );
    Ok(())
}

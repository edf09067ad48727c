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

//! Scene description read from a RON file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tessel_core::renderer::PassSettings;

/// The configuration shipped with the sandbox.
pub const DEFAULT_CONFIG: &str = include_str!("../config/scene.ron");

/// What the sandbox builds and how many frames it renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Number of objects in the scene.
    pub objects: u32,
    /// Number of parts of each object.
    pub parts_per_object: u32,
    /// Number of static effects loaded, each with its own programs.
    /// The embedded effect descriptions are cycled through.
    pub effects: u32,
    /// Number of material contexts shared by the parts.
    pub material_contexts: u32,
    /// Fraction of the objects drawn with skinning, in `[0, 1]`.
    pub skinned_ratio: f32,
    /// Number of frames to render.
    pub frames: u32,
    /// Passes rendered each frame.
    pub passes: PassSettings,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            objects: 64,
            parts_per_object: 2,
            effects: 2,
            material_contexts: 4,
            skinned_ratio: 0.0,
            frames: 1,
            passes: PassSettings::default(),
        }
    }
}

impl SandboxConfig {
    /// Parses a configuration from RON.
    pub fn from_ron(source: &str) -> Result<Self> {
        let config: Self = ron::from_str(source).context("invalid sandbox configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_ron(&source)
    }

    /// Number of objects drawn with skinning.
    pub fn skinned_objects(&self) -> u32 {
        (self.objects as f32 * self.skinned_ratio).round() as u32
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.skinned_ratio),
            "skinned_ratio must be within [0, 1], got {}",
            self.skinned_ratio
        );
        anyhow::ensure!(self.effects > 0, "at least one effect is required");
        anyhow::ensure!(
            self.parts_per_object > 0,
            "objects need at least one part"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_config_parses() {
        let config = SandboxConfig::from_ron(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.passes.pass_names, vec!["depth", "forward"]);
        assert_eq!(config.skinned_objects(), 60);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config = SandboxConfig::from_ron("(objects: 10)").unwrap();
        assert_eq!(config.objects, 10);
        assert_eq!(config.parts_per_object, 2);
        assert_eq!(config.passes, PassSettings::default());
    }

    #[test]
    fn out_of_range_ratio_is_rejected() {
        assert!(SandboxConfig::from_ron("(skinned_ratio: 1.5)").is_err());
    }
}

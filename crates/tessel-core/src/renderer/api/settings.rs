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

//! Settings driving how a frame is split into passes.

use serde::{Deserialize, Serialize};

/// A collection of settings that affect frame-level pass preparation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassSettings {
    /// The render passes to prepare and replay each frame, in submission order.
    /// Each name is matched against the `"pass"` annotation of techniques.
    pub pass_names: Vec<String>,
    /// The instance divisor of the per-instance stream carrying `DrawInstance` records.
    pub instance_divisor: u32,
    /// If `true`, per-pass statistics are logged once the pass cache is built.
    pub log_pass_stats: bool,
}

impl Default for PassSettings {
    fn default() -> Self {
        Self {
            pass_names: vec!["depth".to_owned(), "forward".to_owned()],
            instance_divisor: 1,
            log_pass_stats: true,
        }
    }
}

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

//! A [`CpuProfiler`] measuring wall-clock time per named section.

use serde::Serialize;
use std::collections::BTreeMap;
use tessel_core::renderer::CpuProfiler;
use tessel_core::Stopwatch;

/// Accumulated timings of one section name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SectionStats {
    /// Number of closed sections.
    pub calls: u64,
    /// Sum of their durations, in milliseconds.
    pub total_ms: f64,
    /// Longest duration, in milliseconds.
    pub max_ms: f64,
}

impl SectionStats {
    /// Mean duration in milliseconds, zero if never called.
    pub fn mean_ms(&self) -> f64 {
        if self.calls == 0 {
            0.0
        } else {
            self.total_ms / self.calls as f64
        }
    }

    fn record(&mut self, elapsed_ms: f64) {
        self.calls += 1;
        self.total_ms += elapsed_ms;
        self.max_ms = self.max_ms.max(elapsed_ms);
    }
}

/// Records the duration of every section, keyed by section name.
///
/// Nested sections are timed independently: a parent's time includes its
/// children's.
#[derive(Debug, Default)]
pub struct SectionProfiler {
    open: Vec<(&'static str, Stopwatch)>,
    sections: BTreeMap<&'static str, SectionStats>,
}

impl SectionProfiler {
    /// Creates a profiler with no recorded section.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stats of `name`, if it was closed at least once.
    pub fn stats(&self, name: &str) -> Option<&SectionStats> {
        self.sections.get(name)
    }

    /// Every recorded section, by name.
    pub fn sections(&self) -> &BTreeMap<&'static str, SectionStats> {
        &self.sections
    }

    /// Number of sections currently open.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Forgets the recorded stats. Open sections stay open.
    pub fn reset(&mut self) {
        self.sections.clear();
    }

    /// Logs one line per section at `info` level.
    pub fn report(&self) {
        for (name, stats) in &self.sections {
            log::info!(
                "{name}: {} calls, {:.3} ms total, {:.3} ms mean, {:.3} ms max",
                stats.calls,
                stats.total_ms,
                stats.mean_ms(),
                stats.max_ms
            );
        }
    }

    /// The recorded stats as a JSON object keyed by section name.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.sections)
    }
}

impl CpuProfiler for SectionProfiler {
    fn begin_section(&mut self, name: &'static str) {
        self.open.push((name, Stopwatch::new()));
    }

    fn end_section(&mut self) {
        let Some((name, stopwatch)) = self.open.pop() else {
            log::warn!("SectionProfiler: end_section called without an open section.");
            return;
        };
        let elapsed_ms = stopwatch.elapsed_ms().unwrap_or_default();
        self.sections.entry(name).or_default().record(elapsed_ms);
    }
}

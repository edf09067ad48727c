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

/// A CPU section profiler, passed explicitly to the code it instruments.
///
/// Sections nest: every `begin_section` is closed by the matching `end_section`.
pub trait CpuProfiler {
    /// Opens a named section.
    fn begin_section(&mut self, name: &'static str);

    /// Closes the most recently opened section.
    fn end_section(&mut self);
}

/// A profiler that records nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProfiler;

impl CpuProfiler for NoopProfiler {
    #[inline]
    fn begin_section(&mut self, _name: &'static str) {}

    #[inline]
    fn end_section(&mut self) {}
}

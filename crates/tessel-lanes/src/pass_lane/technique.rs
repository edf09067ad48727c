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

//! Selection of the technique an effect draws a pass with.

use tessel_data::model::{Annotation, ConfiguredProgram, Effect};
use tessel_data::Handle;

/// The annotation category naming a pass.
pub const PASS_CATEGORY: &str = "pass";

/// The conventional selector of a named pass: `[("pass", name)]`.
pub fn select_pass(name: &str) -> [Annotation; 1] {
    [Annotation::new(PASS_CATEGORY, name)]
}

/// Returns the program of the first technique satisfying every annotation.
///
/// `None` means the effect does not take part in the selected pass.
pub fn get_program(effect: &Effect, annotations: &[Annotation]) -> Option<Handle<ConfiguredProgram>> {
    effect
        .techniques
        .iter()
        .find(|technique| technique.satisfies(annotations))
        .map(|technique| technique.configured_program)
}

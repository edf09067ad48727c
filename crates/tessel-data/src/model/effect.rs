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

use super::program::ConfiguredProgram;
use crate::storage::Handle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A required `(category, value)` pair, e.g. `("pass", "forward")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Annotation {
    /// The annotation category.
    pub category: String,
    /// The expected value.
    pub value: String,
}

impl Annotation {
    /// Creates an annotation.
    pub fn new(category: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            value: value.into(),
        }
    }
}

/// An annotated variant of an effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Technique {
    /// At most one value per category.
    pub annotations: BTreeMap<String, String>,
    /// The program drawing with this technique.
    pub configured_program: Handle<ConfiguredProgram>,
}

impl Technique {
    /// Returns `true` if every required annotation is present with an equal value.
    pub fn satisfies(&self, required: &[Annotation]) -> bool {
        required.iter().all(|annotation| {
            self.annotations
                .get(&annotation.category)
                .is_some_and(|value| *value == annotation.value)
        })
    }
}

/// A named, ordered set of techniques.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Effect {
    /// Techniques in declaration order.
    pub techniques: Vec<Technique>,
    /// Name used in diagnostics.
    pub name: String,
}

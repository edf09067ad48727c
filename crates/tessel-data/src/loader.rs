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

//! Loading of effect descriptions.
//!
//! An effect description lists techniques, each naming the program it draws with and
//! the annotations that select it:
//!
//! ```json
//! {
//!     "techniques": [
//!         { "program": "forward_phong", "annotations": { "pass": "forward" } },
//!         { "program": "depth_only", "annotations": { "pass": "depth" }, "defines": ["SKINNING"] }
//!     ]
//! }
//! ```
//!
//! Compiling programs is not this module's business: the caller resolves each
//! technique description into an [`IntrospectProgram`].

use crate::model::{Effect, IntrospectProgram, Technique};
use crate::storage::{Handle, Storage};
use crate::vertex_stream_utilities::store_configured_program;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while loading an effect.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The description is not valid JSON, or does not match the expected layout.
    #[error("invalid effect description: {0}")]
    Parse(#[from] serde_json::Error),
    /// The resolver could not provide a program for a technique.
    #[error("effect '{effect}': no program could be resolved for '{program}'")]
    UnresolvedProgram {
        /// Name of the effect being loaded.
        effect: String,
        /// The program named by the technique.
        program: String,
    },
}

/// One technique of an effect file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechniqueDescription {
    /// Name of the program, interpreted by the resolver.
    pub program: String,
    /// Selection annotations.
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    /// Preprocessor defines the program must be built with.
    #[serde(default)]
    pub defines: Vec<String>,
}

/// The content of an effect file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectDescription {
    /// Techniques in declaration order.
    pub techniques: Vec<TechniqueDescription>,
}

impl EffectDescription {
    /// Parses an effect description from JSON.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Builds and stores an effect from its description.
///
/// Every technique gets its own configured program, returned by `resolve`.
/// Techniques keep their declaration order, which is their selection priority.
pub fn load_effect<F>(
    description: &EffectDescription,
    name: impl Into<String>,
    storage: &mut Storage,
    mut resolve: F,
) -> Result<Handle<Effect>, LoadError>
where
    F: FnMut(&TechniqueDescription) -> Option<IntrospectProgram>,
{
    let name = name.into();
    let mut techniques = Vec::with_capacity(description.techniques.len());
    for technique in &description.techniques {
        let program = resolve(technique).ok_or_else(|| LoadError::UnresolvedProgram {
            effect: name.clone(),
            program: technique.program.clone(),
        })?;
        let configured_program = store_configured_program(storage, program);
        techniques.push(Technique {
            annotations: technique.annotations.clone(),
            configured_program,
        });
    }

    log::debug!(
        "Loaded effect '{}' with {} technique(s).",
        name,
        techniques.len()
    );
    Ok(storage.effects.push(Effect { techniques, name }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_core::renderer::ProgramId;

    const PHONG: &str = r#"{
        "techniques": [
            { "program": "phong", "annotations": { "pass": "forward" } },
            { "program": "depth", "annotations": { "pass": "depth" }, "defines": ["SKINNING"] }
        ]
    }"#;

    #[test]
    fn description_parses_defaults() {
        let description = EffectDescription::from_json(PHONG).unwrap();
        assert_eq!(description.techniques.len(), 2);
        assert!(description.techniques[0].defines.is_empty());
        assert_eq!(description.techniques[1].defines, vec!["SKINNING".to_owned()]);
    }

    #[test]
    fn load_effect_stores_one_program_per_technique() {
        let description = EffectDescription::from_json(PHONG).unwrap();
        let mut storage = Storage::new();
        let mut next_id = 0;

        let effect = load_effect(&description, "phong", &mut storage, |technique| {
            next_id += 1;
            Some(IntrospectProgram::new(ProgramId(next_id), &technique.program))
        })
        .unwrap();

        let effect = &storage.effects[effect];
        assert_eq!(effect.name, "phong");
        assert_eq!(storage.programs.len(), 2);
        assert_eq!(
            effect.techniques[1].annotations.get("pass").map(String::as_str),
            Some("depth")
        );
        let depth_program = &storage.programs[effect.techniques[1].configured_program];
        assert_eq!(depth_program.program.name, "depth");
    }

    #[test]
    fn techniques_keep_their_declaration_order() {
        let description = EffectDescription::from_json(
            r#"{ "techniques": [
                { "program": "z_last", "annotations": { "pass": "forward", "lod": "0" } },
                { "program": "a_first", "annotations": { "pass": "forward" } }
            ] }"#,
        )
        .unwrap();
        let programs: Vec<_> = description
            .techniques
            .iter()
            .map(|technique| technique.program.as_str())
            .collect();
        assert_eq!(programs, ["z_last", "a_first"]);
        assert_eq!(description.techniques[0].annotations.len(), 2);
    }

    #[test]
    fn unresolved_program_is_reported() {
        let description = EffectDescription::from_json(PHONG).unwrap();
        let mut storage = Storage::new();

        let err = load_effect(&description, "phong", &mut storage, |_| None).unwrap_err();
        assert!(matches!(err, LoadError::UnresolvedProgram { ref program, .. } if program == "phong"));
        assert!(storage.effects.is_empty());
    }

    #[test]
    fn malformed_description_is_a_parse_error() {
        let err = EffectDescription::from_json(r#"{ "techniques": 3 }"#).unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }
}

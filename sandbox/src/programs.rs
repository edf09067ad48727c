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

//! Stand-ins for the shader programs named by the effect files.
//!
//! There is no shader compiler behind the headless device: each program name
//! maps to the inputs its shaders would declare, and a fresh program id.

use tessel_core::renderer::{AttributeDimension, BlockSemantic, Semantic};
use tessel_data::loader::TechniqueDescription;
use tessel_data::model::IntrospectProgram;
use tessel_infra::HeadlessDevice;

/// Uniform block binding points shared by every program.
pub mod binding {
    /// Per-frame values.
    pub const FRAME: u32 = 0;
    /// Material parameters, indexed by `MaterialIdx`.
    pub const MATERIALS: u32 = 1;
    /// Instance transforms, indexed by `ModelTransformIdx`.
    pub const LOCAL_TO_WORLD: u32 = 2;
    /// Skinning palettes, indexed from `MatrixPaletteOffset`.
    pub const JOINT_MATRICES: u32 = 3;
}

const SKINNING: &str = "SKINNING";

/// Describes the program `technique` names, `None` if it is unknown.
pub fn resolve_program(
    device: &mut HeadlessDevice,
    technique: &TechniqueDescription,
) -> Option<IntrospectProgram> {
    let skinned = technique.defines.iter().any(|define| define == SKINNING);
    let name = if skinned {
        format!("{}+{SKINNING}", technique.program)
    } else {
        technique.program.clone()
    };

    let program = IntrospectProgram::new(device.create_program(), name)
        .with_attribute(0, Semantic::POSITION, AttributeDimension::vector(3))
        .with_integer_attribute(8, Semantic::MODEL_TRANSFORM_IDX, AttributeDimension::vector(1))
        .with_uniform_block(binding::FRAME, BlockSemantic::FRAME)
        .with_uniform_block(binding::LOCAL_TO_WORLD, BlockSemantic::LOCAL_TO_WORLD);

    let program = match technique.program.as_str() {
        "depth_only" => program,
        "forward_phong" => program
            .with_attribute(1, Semantic::NORMAL, AttributeDimension::vector(3))
            .with_attribute(2, Semantic::UV, AttributeDimension::vector(2))
            .with_integer_attribute(9, Semantic::MATERIAL_IDX, AttributeDimension::vector(1))
            .with_uniform_block(binding::MATERIALS, BlockSemantic::MATERIALS)
            .with_sampler(0, Semantic::DIFFUSE_TEXTURE),
        "forward_unlit" => program
            .with_attribute(2, Semantic::UV, AttributeDimension::vector(2))
            .with_integer_attribute(9, Semantic::MATERIAL_IDX, AttributeDimension::vector(1))
            .with_uniform_block(binding::MATERIALS, BlockSemantic::MATERIALS)
            .with_sampler(0, Semantic::DIFFUSE_TEXTURE),
        _ => return None,
    };

    Some(if skinned {
        program
            .with_attribute(3, Semantic::JOINTS0, AttributeDimension::vector(4))
            .with_attribute(4, Semantic::WEIGHTS0, AttributeDimension::vector(4))
            .with_integer_attribute(
                10,
                Semantic::MATRIX_PALETTE_OFFSET,
                AttributeDimension::vector(1),
            )
            .with_uniform_block(binding::JOINT_MATRICES, BlockSemantic::JOINT_MATRICES)
    } else {
        program
    })
}

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

//! Semantic identifiers used to match shader inputs with engine-side data.
//!
//! A shader attribute is matched against a vertex stream accessor by its
//! [`Semantic`], a uniform block against a uniform buffer by its [`BlockSemantic`].
//! Both are ordered string keys, so they can be used in `BTreeMap` repositories.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

macro_rules! semantic_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Cow<'static, str>);

        impl $name {
            /// Creates a semantic from a static string, usable in constants.
            pub const fn from_static(name: &'static str) -> Self {
                Self(Cow::Borrowed(name))
            }

            /// Creates a semantic from any string.
            pub fn new(name: impl Into<String>) -> Self {
                Self(Cow::Owned(name.into()))
            }

            /// The semantic name.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&'static str> for $name {
            fn from(name: &'static str) -> Self {
                Self::from_static(name)
            }
        }
    };
}

semantic_type!(
    /// The meaning of a vertex attribute or of a sampler uniform.
    Semantic
);

semantic_type!(
    /// The meaning of a uniform block.
    BlockSemantic
);

/// Well-known attribute and sampler semantics.
impl Semantic {
    /// Vertex position.
    pub const POSITION: Self = Self::from_static("Position");
    /// Vertex normal.
    pub const NORMAL: Self = Self::from_static("Normal");
    /// Vertex tangent.
    pub const TANGENT: Self = Self::from_static("Tangent");
    /// Vertex bitangent.
    pub const BITANGENT: Self = Self::from_static("Bitangent");
    /// Vertex color.
    pub const COLOR: Self = Self::from_static("Color");
    /// First texture coordinate set.
    pub const UV: Self = Self::from_static("Uv");
    /// Skinning joint indices.
    pub const JOINTS0: Self = Self::from_static("Joints0");
    /// Skinning joint weights.
    pub const WEIGHTS0: Self = Self::from_static("Weights0");
    /// Per-instance index into the world transforms.
    pub const MODEL_TRANSFORM_IDX: Self = Self::from_static("ModelTransformIdx");
    /// Per-instance index into the material parameters.
    pub const MATERIAL_IDX: Self = Self::from_static("MaterialIdx");
    /// Per-instance offset into the joint matrix palettes.
    pub const MATRIX_PALETTE_OFFSET: Self = Self::from_static("MatrixPaletteOffset");
    /// Diffuse texture sampler.
    pub const DIFFUSE_TEXTURE: Self = Self::from_static("DiffuseTexture");
    /// Normal map sampler.
    pub const NORMAL_TEXTURE: Self = Self::from_static("NormalTexture");
    /// Packed metallic/roughness/occlusion sampler.
    pub const METALLIC_ROUGHNESS_AO_TEXTURE: Self = Self::from_static("MetallicRoughnessAoTexture");
}

/// Well-known uniform block semantics.
impl BlockSemantic {
    /// Per-frame data (time, ...).
    pub const FRAME: Self = Self::from_static("Frame");
    /// Camera view and projection.
    pub const VIEW_PROJECTION: Self = Self::from_static("ViewProjection");
    /// Material parameters array.
    pub const MATERIALS: Self = Self::from_static("Materials");
    /// World transforms array.
    pub const LOCAL_TO_WORLD: Self = Self::from_static("LocalToWorld");
    /// Joint matrix palettes.
    pub const JOINT_MATRICES: Self = Self::from_static("JointMatrices");
    /// Scene lights.
    pub const LIGHTS: Self = Self::from_static("Lights");
}

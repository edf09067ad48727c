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

use super::effect::Effect;
use super::gpu_objects::{Texture, UniformBuffer};
use crate::storage::Handle;
use std::collections::BTreeMap;
use tessel_core::renderer::{BlockSemantic, Semantic};

/// Uniform buffers available to programs, by block semantic.
pub type RepositoryUbo = BTreeMap<BlockSemantic, Handle<UniformBuffer>>;

/// Textures available to programs, by sampler semantic.
pub type RepositoryTexture = BTreeMap<Semantic, Handle<Texture>>;

/// Uniform buffers and textures bound together for every part using it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialContext {
    /// Context uniform buffers.
    pub ubo_repo: RepositoryUbo,
    /// Context textures.
    pub texture_repo: RepositoryTexture,
}

/// How a part is shaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Material {
    /// Index into the material parameters array, forwarded per instance.
    pub parameter_index: u32,
    /// Shared bindings, `None` when the pass-global repositories suffice.
    pub context: Option<Handle<MaterialContext>>,
    /// The effect providing one technique per pass.
    pub effect: Handle<Effect>,
}

impl Material {
    /// A material without context.
    pub fn new(effect: Handle<Effect>, parameter_index: u32) -> Self {
        Self {
            parameter_index,
            context: None,
            effect,
        }
    }

    /// Sets the material context.
    pub fn with_context(mut self, context: Handle<MaterialContext>) -> Self {
        self.context = Some(context);
        self
    }
}

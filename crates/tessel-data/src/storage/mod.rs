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

//! Ownership of every device object and model value.

mod arena;

pub use self::arena::{Arena, Handle};

use crate::model::{
    Buffer, ConfiguredProgram, Effect, MaterialContext, Object, Part, ProgramConfig, Texture,
    UniformBuffer, VertexArray, VertexStream,
};

/// One arena per stored type.
///
/// Values are only ever appended, so a handle stays valid for the lifetime of
/// the storage. Passes mutate it only to record new VAOs and cache entries.
#[derive(Debug, Default)]
pub struct Storage {
    /// Vertex, index and instance buffers.
    pub buffers: Arena<Buffer>,
    /// Textures referenced from repositories.
    pub textures: Arena<Texture>,
    /// Uniform buffers referenced from repositories.
    pub ubos: Arena<UniformBuffer>,
    /// Vertex streams, the VAO cache keys.
    pub vertex_streams: Arena<VertexStream>,
    /// Programs with their config handles.
    pub programs: Arena<ConfiguredProgram>,
    /// Per-program VAO caches.
    pub program_configs: Arena<ProgramConfig>,
    /// VAOs built by the caches.
    pub vaos: Arena<VertexArray>,
    /// Material contexts.
    pub material_contexts: Arena<MaterialContext>,
    /// Effects.
    pub effects: Arena<Effect>,
    /// Objects.
    pub objects: Arena<Object>,
    /// Parts, referenced by objects and part lists.
    pub parts: Arena<Part>,
}

impl Storage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }
}

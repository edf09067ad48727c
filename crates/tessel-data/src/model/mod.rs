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

//! The renderer data model.
//!
//! Everything here is owned by [`Storage`](crate::storage::Storage) and refers to
//! other stored values through [`Handle`](crate::storage::Handle)s.

mod buffer_view;
mod effect;
mod gpu_objects;
mod material;
mod part;
mod program;
mod vertex_stream;

pub use self::buffer_view::BufferView;
pub use self::effect::{Annotation, Effect, Technique};
pub use self::gpu_objects::{Buffer, Texture, UniformBuffer, VertexArray};
pub use self::material::{Material, MaterialContext, RepositoryTexture, RepositoryUbo};
pub use self::part::{Object, Part};
pub use self::program::{
    ConfiguredProgram, IntrospectProgram, ProgramAttribute, ProgramConfig, ProgramConfigEntry,
    ProgramUniform, UniformBlock, UniformKind,
};
pub use self::vertex_stream::{AttributeAccessor, GenericStream, IndexBufferView, VertexStream};

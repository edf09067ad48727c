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

//! Introspected programs and their VAO caches.

use super::gpu_objects::VertexArray;
use super::vertex_stream::VertexStream;
use crate::storage::Handle;
use tessel_core::renderer::{
    AttributeDimension, BlockSemantic, ComponentType, ProgramId, Semantic,
};

/// An active vertex attribute of a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramAttribute {
    /// The attribute location (first location for matrix attributes).
    pub location: u32,
    /// What the attribute is matched against in vertex streams.
    pub semantic: Semantic,
    /// Shape expected by the shader.
    pub dimension: AttributeDimension,
    /// Component type expected by the shader.
    pub component_type: ComponentType,
    /// Whether integer data should be normalized.
    pub normalized: bool,
    /// Name in the shader source.
    pub name: String,
}

/// The category of a (non-block) uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformKind {
    /// A sampler, fed from a texture repository.
    Sampler,
    /// Any other default-block uniform.
    Value,
}

/// An active default-block uniform of a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramUniform {
    /// The uniform location.
    pub location: u32,
    /// What the uniform is matched against in repositories.
    pub semantic: Semantic,
    /// Whether this is a sampler.
    pub kind: UniformKind,
    /// Number of array elements, 1 for non-arrays.
    pub array_size: u32,
    /// Name in the shader source.
    pub name: String,
}

/// An active uniform block of a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformBlock {
    /// The block index in the program.
    pub block_index: u32,
    /// The binding point the block reads from.
    pub binding_index: u32,
    /// What the block is matched against in uniform buffer repositories.
    pub semantic: BlockSemantic,
    /// Name in the shader source.
    pub name: String,
}

/// A linked program, with the list of its active inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntrospectProgram {
    /// The device program.
    pub program: ProgramId,
    /// Name used in diagnostics.
    pub name: String,
    /// Active vertex attributes.
    pub attributes: Vec<ProgramAttribute>,
    /// Active default-block uniforms.
    pub uniforms: Vec<ProgramUniform>,
    /// Active uniform blocks.
    pub uniform_blocks: Vec<UniformBlock>,
}

impl IntrospectProgram {
    /// A program without any active input.
    pub fn new(program: ProgramId, name: impl Into<String>) -> Self {
        Self {
            program,
            name: name.into(),
            attributes: Vec::new(),
            uniforms: Vec::new(),
            uniform_blocks: Vec::new(),
        }
    }

    /// Adds a float vertex attribute, named after its semantic.
    pub fn with_attribute(
        mut self,
        location: u32,
        semantic: Semantic,
        dimension: AttributeDimension,
    ) -> Self {
        self.attributes.push(ProgramAttribute {
            location,
            name: format!("v_{semantic}"),
            semantic,
            dimension,
            component_type: ComponentType::Float32,
            normalized: false,
        });
        self
    }

    /// Adds an integer vertex attribute (e.g. per-instance indices).
    pub fn with_integer_attribute(
        mut self,
        location: u32,
        semantic: Semantic,
        dimension: AttributeDimension,
    ) -> Self {
        self.attributes.push(ProgramAttribute {
            location,
            name: format!("v_{semantic}"),
            semantic,
            dimension,
            component_type: ComponentType::Uint32,
            normalized: false,
        });
        self
    }

    /// Adds a single sampler uniform.
    pub fn with_sampler(self, location: u32, semantic: Semantic) -> Self {
        self.with_sampler_array(location, semantic, 1)
    }

    /// Adds a sampler uniform of `array_size` elements.
    pub fn with_sampler_array(mut self, location: u32, semantic: Semantic, array_size: u32) -> Self {
        self.uniforms.push(ProgramUniform {
            location,
            name: format!("u_{semantic}"),
            semantic,
            kind: UniformKind::Sampler,
            array_size,
        });
        self
    }

    /// Adds a uniform block reading from `binding_index`.
    pub fn with_uniform_block(mut self, binding_index: u32, semantic: BlockSemantic) -> Self {
        self.uniform_blocks.push(UniformBlock {
            block_index: self.uniform_blocks.len() as u32,
            binding_index,
            name: format!("{semantic}Block"),
            semantic,
        });
        self
    }
}

/// One cached VAO, keyed by the vertex stream it was configured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramConfigEntry {
    /// The lookup key.
    pub vertex_stream: Handle<VertexStream>,
    /// The cached VAO.
    pub vao: Handle<VertexArray>,
}

/// Cache of the vertex array objects configured for a program.
///
/// Entries are looked up by vertex stream identity and are never evicted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramConfig {
    /// Cached entries, in creation order.
    pub entries: Vec<ProgramConfigEntry>,
}

impl ProgramConfig {
    /// The VAO cached for `vertex_stream`, first match wins.
    pub fn find(&self, vertex_stream: Handle<VertexStream>) -> Option<Handle<VertexArray>> {
        self.entries
            .iter()
            .find(|entry| entry.vertex_stream == vertex_stream)
            .map(|entry| entry.vao)
    }
}

/// A program together with the handle of its VAO cache.
///
/// Programs with compatible attribute layouts may share a config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredProgram {
    /// The introspected program.
    pub program: IntrospectProgram,
    /// Its VAO cache.
    pub config: Handle<ProgramConfig>,
}

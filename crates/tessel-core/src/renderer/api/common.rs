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

//! Generic rendering enums and vertex-format descriptions.

use serde::{Deserialize, Serialize};

/// Specifies the data type of indices in an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexFormat {
    /// Indices are 8-bit unsigned integers.
    Uint8,
    /// Indices are 16-bit unsigned integers.
    Uint16,
    /// Indices are 32-bit unsigned integers.
    Uint32,
}

impl IndexFormat {
    /// The size in bytes of a single index.
    pub const fn byte_size(&self) -> u64 {
        match self {
            IndexFormat::Uint8 => 1,
            IndexFormat::Uint16 => 2,
            IndexFormat::Uint32 => 4,
        }
    }
}

/// Defines how vertices are interpreted to assemble primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrimitiveTopology {
    /// Vertices are rendered as a list of isolated points.
    PointList,
    /// Vertices are rendered as a list of isolated lines (every two vertices form a line).
    LineList,
    /// Vertices are rendered as a connected line strip.
    LineStrip,
    /// Vertices are rendered as a list of isolated triangles (every three vertices form a triangle).
    TriangleList,
    /// Vertices are rendered as a connected triangle strip.
    TriangleStrip,
}

/// The scalar type of each component of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentType {
    /// 8-bit signed integer.
    Int8,
    /// 8-bit unsigned integer.
    Uint8,
    /// 16-bit signed integer.
    Int16,
    /// 16-bit unsigned integer.
    Uint16,
    /// 32-bit signed integer.
    Int32,
    /// 32-bit unsigned integer.
    Uint32,
    /// 16-bit float.
    Float16,
    /// 32-bit float.
    Float32,
}

impl ComponentType {
    /// The size in bytes of a single component.
    pub const fn byte_size(&self) -> u32 {
        match self {
            ComponentType::Int8 | ComponentType::Uint8 => 1,
            ComponentType::Int16 | ComponentType::Uint16 | ComponentType::Float16 => 2,
            ComponentType::Int32 | ComponentType::Uint32 | ComponentType::Float32 => 4,
        }
    }

    /// Returns `true` for the integral component types.
    pub const fn is_integer(&self) -> bool {
        !matches!(self, ComponentType::Float16 | ComponentType::Float32)
    }
}

/// The shape of a vertex attribute: `components` per row, times `rows`.
///
/// A `vec3` is `3x1`, a `mat4` is `4x4`. Matrix attributes occupy `rows`
/// consecutive attribute locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeDimension {
    /// Number of components in one row (1 to 4).
    pub components: u8,
    /// Number of rows (1 for vectors and scalars).
    pub rows: u8,
}

impl AttributeDimension {
    /// A single-row attribute.
    pub const fn vector(components: u8) -> Self {
        Self {
            components,
            rows: 1,
        }
    }

    /// A `components x rows` matrix attribute.
    pub const fn matrix(components: u8, rows: u8) -> Self {
        Self { components, rows }
    }

    /// Total number of scalar components.
    pub const fn count_components(&self) -> u32 {
        self.components as u32 * self.rows as u32
    }
}

impl std::fmt::Display for AttributeDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.components, self.rows)
    }
}

/// How client data for one attribute is laid out inside a buffer view element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientAttribute {
    /// Shape of the data.
    pub dimension: AttributeDimension,
    /// Byte offset of the attribute within one element (i.e. within the view stride).
    pub offset: u64,
    /// Scalar type of each component.
    pub component_type: ComponentType,
}

impl ClientAttribute {
    /// The size in bytes of one attribute value.
    pub const fn byte_size(&self) -> u32 {
        self.dimension.count_components() * self.component_type.byte_size()
    }
}

/// A fully resolved attribute binding, as recorded into a vertex array object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttributeBinding {
    /// The shader attribute location (first location for matrix attributes).
    pub location: u32,
    /// Whether integer data is normalized when fetched as floats.
    pub normalized: bool,
    /// The client layout, `offset` being relative to the start of the buffer.
    pub client: ClientAttribute,
    /// The buffer the data is pulled from.
    pub buffer: super::resource::BufferId,
    /// Distance in bytes between two consecutive elements.
    pub stride: u32,
    /// 0 for per-vertex data, N to advance once every N instances.
    pub instance_divisor: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_sizes() {
        assert_eq!(IndexFormat::Uint16.byte_size(), 2);
        assert_eq!(IndexFormat::Uint32.byte_size(), 4);
        let mat4 = ClientAttribute {
            dimension: AttributeDimension::matrix(4, 4),
            offset: 0,
            component_type: ComponentType::Float32,
        };
        assert_eq!(mat4.byte_size(), 64);
        assert_eq!(AttributeDimension::vector(3).count_components(), 3);
    }

    #[test]
    fn dimension_display() {
        assert_eq!(AttributeDimension::matrix(4, 3).to_string(), "[4, 3]");
    }
}

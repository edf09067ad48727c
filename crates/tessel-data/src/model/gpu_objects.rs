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

//! Storage-side records of device objects.
//!
//! Each record wraps the opaque id returned by the device together with the
//! little metadata the engine needs (sizes for bounds checks, labels for logs).

use tessel_core::renderer::{BufferId, BufferUsage, TextureId, VertexArrayId};

/// A device buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    /// The device id.
    pub id: BufferId,
    /// Size in bytes, as allocated on the device.
    pub size: u64,
    /// The usage hint the buffer was created with.
    pub usage: BufferUsage,
}

/// A device buffer bound as a uniform block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformBuffer {
    /// The device id.
    pub id: BufferId,
    /// Size in bytes.
    pub size: u64,
}

/// A device texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    /// The device id.
    pub id: TextureId,
    /// Debug name.
    pub name: String,
}

/// A configured vertex array object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexArray {
    /// The device id.
    pub id: VertexArrayId,
}

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

//! Provides the public, backend-agnostic rendering contracts for Tessel.
//!
//! This module defines the "common language" of rendering: the abstract `traits`
//! (like [`GraphicsDevice`]), the plain data the GPU consumes (like
//! [`DrawElementsIndirectCommand`]), and the error types.
//!
//! The 'how' is handled by a concrete device in the `tessel-infra` crate, while
//! `tessel-lanes` uses these contracts to build and replay passes.

pub mod api;
pub mod error;
pub mod traits;

pub use self::api::*;
pub use self::error::{RenderError, ResourceError};
pub use self::traits::{CpuProfiler, GraphicsDevice, NoopProfiler};

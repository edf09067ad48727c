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

//! Backend-agnostic rendering API.
//!
//! Organized into several logical sub-modules:
//!
//! - **[`resource`]**: Opaque GPU object ids and their descriptors.
//! - **[`common`]**: Index formats, topologies, component types and attribute layouts.
//! - **[`semantic`]**: Keys matching shader inputs with engine data.
//! - **[`draw`]**: The indirect command and per-instance records consumed by the GPU.
//! - **[`settings`]**: Pass-level configuration.

pub mod common;
pub mod draw;
pub mod resource;
pub mod semantic;
pub mod settings;

pub use self::common::*;
pub use self::draw::*;
pub use self::resource::*;
pub use self::semantic::*;
pub use self::settings::*;

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

//! # Tessel Data
//!
//! Data layouts of the renderer: the arena [`Storage`](storage::Storage) owning
//! every resource, the scene [`model`], the per-frame [`PartList`](part_list::PartList),
//! and the helpers assembling vertex streams and effects.

#![warn(missing_docs)]

pub mod loader;
pub mod model;
pub mod part_list;
pub mod storage;
pub mod vertex_stream_utilities;

pub use part_list::PartList;
pub use storage::{Arena, Handle, Storage};

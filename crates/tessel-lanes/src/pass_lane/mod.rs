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

//! Pass lane - sorts, batches and replays the draws of a render pass.
//!
//! A pass is prepared from a [`PartList`](tessel_data::PartList) in three steps:
//! the [`DrawEntryHelper`] keeps the parts with a technique for the pass and
//! gives each one a [`SortKey`], [`prepare_pass`] sorts the entries and groups
//! runs of equal state into [`DrawCall`]s, and [`draw`] replays the resulting
//! [`PassCache`] with one indirect multi-draw per call.

mod draw_entries;
mod draw_executor;
mod pass_cache;
mod resource_id_map;
mod sort_key;
mod technique;
mod vao_cache;

pub use draw_entries::*;
pub use draw_executor::*;
pub use pass_cache::*;
pub use resource_id_map::*;
pub use sort_key::*;
pub use technique::*;
pub use vao_cache::*;

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

//! Dense small-integer ids for resource handles.

use crate::error::PassError;
use std::collections::HashMap;
use tessel_data::Handle;

/// Associates each handle with a small integer, suitable for packing into a sort key.
///
/// Ids are handed out sequentially and never change for the lifetime of the
/// map. The null handle (`None`) is registered first, so it is always id 0.
/// `BITS` is the width of the ids: at most `2^BITS - 1` is handed out.
#[derive(Debug, Clone)]
pub struct ResourceIdMap<T, const BITS: u32> {
    resource_to_id: HashMap<Option<Handle<T>>, u16>,
    id_to_resource: Vec<Option<Handle<T>>>,
}

impl<T, const BITS: u32> ResourceIdMap<T, BITS> {
    const VALID_WIDTH: () = assert!(BITS >= 1 && BITS <= 16, "ids must fit in 16 bits");

    /// The largest id this map can hand out.
    pub const MAX_ID: u16 = ((1u32 << BITS) - 1) as u16;

    /// Creates a map holding only the null handle.
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_WIDTH;

        let mut map = Self {
            resource_to_id: HashMap::new(),
            id_to_resource: Vec::new(),
        };
        map.resource_to_id.insert(None, 0);
        map.id_to_resource.push(None);
        map
    }

    /// Returns the id of `resource`, assigning the next one on first sight.
    ///
    /// ## Errors
    /// * `PassError::IdBudgetExceeded` - If a new id would not fit in `BITS` bits.
    pub fn get(&mut self, resource: Option<Handle<T>>) -> Result<u16, PassError> {
        if let Some(&id) = self.resource_to_id.get(&resource) {
            return Ok(id);
        }

        let next = self.id_to_resource.len();
        if next > Self::MAX_ID as usize {
            return Err(PassError::IdBudgetExceeded {
                resource: short_type_name::<T>(),
                bits: BITS,
                capacity: Self::MAX_ID as u32 + 1,
            });
        }
        let id = next as u16;
        self.resource_to_id.insert(resource, id);
        self.id_to_resource.push(resource);
        Ok(id)
    }

    /// Returns the handle that was given `id`.
    ///
    /// ## Errors
    /// * `PassError::UnknownId` - If this map never handed out `id`.
    pub fn reverse_lookup(&self, id: u16) -> Result<Option<Handle<T>>, PassError> {
        self.id_to_resource
            .get(id as usize)
            .copied()
            .ok_or(PassError::UnknownId {
                resource: short_type_name::<T>(),
                id,
            })
    }

    /// Like [`reverse_lookup`](Self::reverse_lookup), for resources that are never null.
    pub fn reverse_lookup_some(&self, id: u16) -> Result<Handle<T>, PassError> {
        self.reverse_lookup(id)?.ok_or(PassError::UnknownId {
            resource: short_type_name::<T>(),
            id,
        })
    }

    /// The number of registered handles, the null handle included.
    pub fn len(&self) -> usize {
        self.id_to_resource.len()
    }

    /// Always `false`: the null handle is registered on creation.
    pub fn is_empty(&self) -> bool {
        self.id_to_resource.is_empty()
    }
}

impl<T, const BITS: u32> Default for ResourceIdMap<T, BITS> {
    fn default() -> Self {
        Self::new()
    }
}

fn short_type_name<T>() -> &'static str {
    let name = std::any::type_name::<T>();
    name.rsplit("::").next().unwrap_or(name)
}

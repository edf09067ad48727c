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

//! The packed key draw entries are sorted by.
//!
//! ```text
//!  63        36 35         20 19            10 9        0
//! +------------+-------------+----------------+----------+
//! |   unused   |  program id | mat. context id|  VAO id  |
//! +------------+-------------+----------------+----------+
//! ```
//!
//! Sorting ascending groups entries by program first, then by material context,
//! then by VAO.

/// Width of the program id.
pub const PROGRAM_ID_BITS: u32 = 16;
/// Width of the material context id.
pub const MATERIAL_CONTEXT_ID_BITS: u32 = 10;
/// Width of the VAO id.
pub const VAO_ID_BITS: u32 = 10;

const fn make_mask(bits: u32) -> u64 {
    (1u64 << bits) - 1
}

const PROGRAM_ID_MASK: u64 = make_mask(PROGRAM_ID_BITS);
const MATERIAL_CONTEXT_ID_MASK: u64 = make_mask(MATERIAL_CONTEXT_ID_BITS);
const VAO_ID_MASK: u64 = make_mask(VAO_ID_BITS);

const MATERIAL_CONTEXT_SHIFT: u32 = VAO_ID_BITS;
const PROGRAM_SHIFT: u32 = VAO_ID_BITS + MATERIAL_CONTEXT_ID_BITS;

const _: () = assert!(PROGRAM_SHIFT + PROGRAM_ID_BITS <= 64);

/// A (program, material context, VAO) id triple packed in 64 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SortKey(pub u64);

impl SortKey {
    /// Sentinel that no packed triple can produce.
    pub const INVALID: SortKey = SortKey(u64::MAX);

    /// Packs the three ids. Bits beyond each id's width are dropped.
    pub fn pack(program_id: u16, material_context_id: u16, vao_id: u16) -> Self {
        debug_assert!(program_id as u64 <= PROGRAM_ID_MASK);
        debug_assert!(material_context_id as u64 <= MATERIAL_CONTEXT_ID_MASK);
        debug_assert!(vao_id as u64 <= VAO_ID_MASK);

        let mut key = vao_id as u64 & VAO_ID_MASK;
        key |= (material_context_id as u64 & MATERIAL_CONTEXT_ID_MASK) << MATERIAL_CONTEXT_SHIFT;
        key |= (program_id as u64 & PROGRAM_ID_MASK) << PROGRAM_SHIFT;
        SortKey(key)
    }

    /// The program id.
    pub fn program_id(self) -> u16 {
        ((self.0 >> PROGRAM_SHIFT) & PROGRAM_ID_MASK) as u16
    }

    /// The material context id.
    pub fn material_context_id(self) -> u16 {
        ((self.0 >> MATERIAL_CONTEXT_SHIFT) & MATERIAL_CONTEXT_ID_MASK) as u16
    }

    /// The VAO id.
    pub fn vao_id(self) -> u16 {
        (self.0 & VAO_ID_MASK) as u16
    }

    /// The `(program, material context, VAO)` ids.
    pub fn decode(self) -> (u16, u16, u16) {
        (self.program_id(), self.material_context_id(), self.vao_id())
    }
}

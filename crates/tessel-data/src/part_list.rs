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

//! The flat list of parts to draw in a frame.

use crate::model::{Material, Object, Part};
use crate::storage::{Handle, Storage};
use tessel_core::math::Mat4;
use tessel_core::renderer::{ResourceError, INVALID_INDEX};

/// All instantiated parts to draw, each associated to a material.
///
/// A struct of arrays: `parts`, `materials`, `transform_idx` and `palette_offset`
/// always have the same length, one entry per (instance, part) pair. The
/// transforms and palettes they index are stored alongside, ready for upload.
///
/// A list is meant to be reused by every pass of a frame, and across frames
/// for static geometry.
#[derive(Debug, Clone, Default)]
pub struct PartList {
    /// The part of each entry.
    pub parts: Vec<Handle<Part>>,
    /// The material of each entry (the part's own, or an instance override).
    pub materials: Vec<Material>,
    /// Index into `instance_transforms` for each entry.
    pub transform_idx: Vec<u32>,
    /// Offset into `rigging_palettes` for each entry, [`INVALID_INDEX`] if unskinned.
    pub palette_offset: Vec<u32>,

    /// World transforms, indexed by `transform_idx`.
    pub instance_transforms: Vec<Mat4>,
    /// Joint matrices of every skinned instance, concatenated.
    pub rigging_palettes: Vec<Mat4>,
}

impl PartList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Returns `true` if there is no entry.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Removes every entry, transform and palette, keeping the allocations.
    pub fn clear(&mut self) {
        self.parts.clear();
        self.materials.clear();
        self.transform_idx.clear();
        self.palette_offset.clear();
        self.instance_transforms.clear();
        self.rigging_palettes.clear();
    }

    /// Appends a world transform and returns its index.
    pub fn push_transform(&mut self, transform: Mat4) -> u32 {
        self.instance_transforms.push(transform);
        (self.instance_transforms.len() - 1) as u32
    }

    /// Appends the joint matrices of one instance and returns the palette offset.
    pub fn push_palette(&mut self, joints: &[Mat4]) -> u32 {
        let offset = self.rigging_palettes.len() as u32;
        self.rigging_palettes.extend_from_slice(joints);
        offset
    }

    /// Appends a single entry.
    pub fn push_part(
        &mut self,
        part: Handle<Part>,
        material: Material,
        transform_idx: u32,
        palette_offset: u32,
    ) {
        self.parts.push(part);
        self.materials.push(material);
        self.transform_idx.push(transform_idx);
        self.palette_offset.push(palette_offset);
    }

    /// Appends one entry per part of `object`, all sharing the pushed `transform`.
    ///
    /// `material_override` replaces the parts' own material when provided.
    /// `palette_offset` is `None` for unskinned instances.
    ///
    /// ## Errors
    /// * `ResourceError::InvalidHandle` - If the object or one of its parts is not stored.
    pub fn push_object(
        &mut self,
        storage: &Storage,
        object: Handle<Object>,
        transform: Mat4,
        material_override: Option<Material>,
        palette_offset: Option<u32>,
    ) -> Result<(), ResourceError> {
        let object = storage
            .objects
            .get(object)
            .ok_or(ResourceError::InvalidHandle)?;

        // Resolve every part first, the list is left untouched on error.
        let materials = object
            .parts
            .iter()
            .map(|&handle| {
                storage
                    .parts
                    .get(handle)
                    .map(|part| (handle, material_override.unwrap_or(part.material)))
                    .ok_or(ResourceError::InvalidHandle)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let transform_idx = self.push_transform(transform);
        let palette_offset = palette_offset.unwrap_or(INVALID_INDEX);
        for (part, material) in materials {
            self.push_part(part, material, transform_idx, palette_offset);
        }
        Ok(())
    }

    /// The transforms as bytes, for upload.
    pub fn transform_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instance_transforms)
    }

    /// The palettes as bytes, for upload.
    pub fn palette_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.rigging_palettes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Effect, Part};
    use tessel_core::math::{Aabb, Vec3};
    use tessel_core::renderer::PrimitiveTopology;

    fn storage_with_object(part_count: usize) -> (Storage, Handle<Object>, Material) {
        let mut storage = Storage::new();
        let effect = storage.effects.push(Effect::default());
        let material = Material::new(effect, 3);
        let mut object = Object::default();
        for i in 0..part_count {
            object.parts.push(storage.parts.push(Part {
                name: format!("part_{i}"),
                material,
                vertex_stream: Handle::from_raw(0),
                topology: PrimitiveTopology::TriangleList,
                vertex_first: 0,
                vertex_count: 3,
                index_first: 0,
                index_count: 3,
                aabb: Aabb::INVALID,
            }));
        }
        let object = storage.objects.push(object);
        (storage, object, material)
    }

    #[test]
    fn push_object_adds_one_entry_per_part() {
        let (storage, object, material) = storage_with_object(3);
        let mut list = PartList::new();

        list.push_object(&storage, object, Mat4::IDENTITY, None, None)
            .unwrap();
        list.push_object(
            &storage,
            object,
            Mat4::from_translation(Vec3::ONE),
            None,
            Some(12),
        )
        .unwrap();

        assert_eq!(list.len(), 6);
        assert_eq!(list.instance_transforms.len(), 2);
        assert_eq!(&list.transform_idx, &[0, 0, 0, 1, 1, 1]);
        assert_eq!(list.palette_offset[0], INVALID_INDEX);
        assert_eq!(list.palette_offset[5], 12);
        assert!(list.materials.iter().all(|m| *m == material));
    }

    #[test]
    fn material_override_replaces_part_material() {
        let (mut storage, object, _) = storage_with_object(2);
        let other_effect = storage.effects.push(Effect::default());
        let replacement = Material::new(other_effect, 9);
        let mut list = PartList::new();

        list.push_object(&storage, object, Mat4::IDENTITY, Some(replacement), None)
            .unwrap();
        assert_eq!(list.materials, vec![replacement, replacement]);
    }

    #[test]
    fn unknown_object_is_an_error() {
        let storage = Storage::new();
        let mut list = PartList::new();
        let err = list
            .push_object(&storage, Handle::from_raw(0), Mat4::IDENTITY, None, None)
            .unwrap_err();
        assert_eq!(err, ResourceError::InvalidHandle);
        assert!(list.is_empty());
    }

    #[test]
    fn byte_views_cover_the_matrices() {
        let mut list = PartList::new();
        list.push_transform(Mat4::IDENTITY);
        list.push_transform(Mat4::IDENTITY);
        assert_eq!(list.push_palette(&[Mat4::IDENTITY; 4]), 0);
        assert_eq!(list.push_palette(&[Mat4::IDENTITY; 2]), 4);
        assert_eq!(list.transform_bytes().len(), 2 * 64);
        assert_eq!(list.palette_bytes().len(), 6 * 64);
    }
}

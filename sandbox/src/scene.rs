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

//! Scene assembly: meshes, effects, repositories and objects.

use crate::config::SandboxConfig;
use crate::programs::resolve_program;
use anyhow::{Context, Result};
use std::borrow::Cow;
use tessel_core::math::{Aabb, Mat4, Vec3};
use tessel_core::renderer::{
    AttributeDimension, BlockSemantic, BufferDescriptor, BufferUsage, ComponentType,
    GraphicsDevice, IndexFormat, PrimitiveTopology, Semantic,
};
use tessel_data::loader::{load_effect, EffectDescription};
use tessel_data::model::{
    Buffer, Effect, Material, MaterialContext, Object, Part, RepositoryTexture, RepositoryUbo,
    Texture, UniformBuffer, VertexStream,
};
use tessel_data::vertex_stream_utilities::{
    make_buffer, make_instance_stream, make_vertex_stream, AttributeDescription, InstanceStream,
};
use tessel_data::{Handle, PartList, Storage};
use tessel_infra::HeadlessDevice;

const STATIC_EFFECTS: [(&str, &str); 2] = [
    ("phong", include_str!("../assets/effects/phong.json")),
    ("unlit", include_str!("../assets/effects/unlit.json")),
];
const SKINNED_EFFECT: &str = include_str!("../assets/effects/skinned_phong.json");

const MESHES: usize = 4;
const VERTICES: u64 = 24;
const INDICES: u64 = 36;
const JOINTS: usize = 4;
const MATERIAL_SLOTS: u32 = 16;
const MATRIX_SIZE: u64 = std::mem::size_of::<Mat4>() as u64;

/// An object and how it is instanced every frame.
#[derive(Debug, Clone, Copy)]
pub struct SceneObject {
    /// The stored object.
    pub object: Handle<Object>,
    /// Whether a skinning palette is pushed with it.
    pub skinned: bool,
}

/// Everything the passes draw from.
#[derive(Debug)]
pub struct Scene {
    /// The device every resource lives on.
    pub device: HeadlessDevice,
    /// Resources and model.
    pub storage: Storage,
    /// The per-instance stream shared by every vertex stream.
    pub instances: InstanceStream,
    /// The objects, in submission order.
    pub objects: Vec<SceneObject>,
    /// Pass-global uniform buffers.
    pub ubo_repo: RepositoryUbo,
    /// Pass-global textures.
    pub texture_repo: RepositoryTexture,
    transforms: Handle<UniformBuffer>,
    palettes: Handle<UniformBuffer>,
    indirect: Option<Handle<Buffer>>,
}

impl Scene {
    /// Builds the scene described by `config`.
    pub fn build(config: &SandboxConfig) -> Result<Self> {
        let mut device = HeadlessDevice::new();
        let mut storage = Storage::new();

        let max_instances = u64::from(config.objects * config.parts_per_object).max(1);
        let instances = make_instance_stream(
            &mut device,
            &mut storage,
            max_instances,
            config.passes.instance_divisor,
        )?;

        let mut static_attributes = vec![
            AttributeDescription::new(
                Semantic::POSITION,
                AttributeDimension::vector(3),
                ComponentType::Float32,
            ),
            AttributeDescription::new(
                Semantic::NORMAL,
                AttributeDimension::vector(3),
                ComponentType::Float32,
            ),
            AttributeDescription::new(Semantic::UV, AttributeDimension::vector(2), ComponentType::Float32),
        ];
        let meshes = (0..MESHES)
            .map(|_| make_mesh(&mut device, &mut storage, &static_attributes, &instances))
            .collect::<Result<Vec<_>>>()?;

        static_attributes.extend([
            AttributeDescription::new(
                Semantic::JOINTS0,
                AttributeDimension::vector(4),
                ComponentType::Float32,
            ),
            AttributeDescription::new(
                Semantic::WEIGHTS0,
                AttributeDimension::vector(4),
                ComponentType::Float32,
            ),
        ]);
        let skinned_mesh = make_mesh(&mut device, &mut storage, &static_attributes, &instances)?;

        let static_effects = (0..config.effects as usize)
            .map(|i| -> Result<Handle<Effect>> {
                let (name, json) = STATIC_EFFECTS[i % STATIC_EFFECTS.len()];
                let description = EffectDescription::from_json(json)?;
                Ok(load_effect(&description, format!("{name}#{i}"), &mut storage, |technique| {
                    resolve_program(&mut device, technique)
                })?)
            })
            .collect::<Result<Vec<_>>>()?;
        let skinned_effect = load_effect(
            &EffectDescription::from_json(SKINNED_EFFECT)?,
            "skinned_phong",
            &mut storage,
            |technique| resolve_program(&mut device, technique),
        )?;

        let frame = make_ubo(&mut device, &mut storage, "frame", 256)?;
        let materials = make_ubo(
            &mut device,
            &mut storage,
            "materials",
            u64::from(MATERIAL_SLOTS) * 64,
        )?;
        let transforms = make_ubo(
            &mut device,
            &mut storage,
            "local_to_world",
            u64::from(config.objects).max(1) * MATRIX_SIZE,
        )?;
        let palettes = make_ubo(
            &mut device,
            &mut storage,
            "joint_matrices",
            u64::from(config.skinned_objects()).max(1) * JOINTS as u64 * MATRIX_SIZE,
        )?;
        let white = make_texture(&mut device, &mut storage, "white");

        let ubo_repo = RepositoryUbo::from([
            (BlockSemantic::FRAME, frame),
            (BlockSemantic::MATERIALS, materials),
            (BlockSemantic::LOCAL_TO_WORLD, transforms),
            (BlockSemantic::JOINT_MATRICES, palettes),
        ]);
        let texture_repo = RepositoryTexture::from([(Semantic::DIFFUSE_TEXTURE, white)]);

        let contexts = (0..config.material_contexts)
            .map(|i| -> Result<Handle<MaterialContext>> {
                let materials = make_ubo(
                    &mut device,
                    &mut storage,
                    "context_materials",
                    u64::from(MATERIAL_SLOTS) * 64,
                )?;
                let diffuse = make_texture(&mut device, &mut storage, &format!("diffuse #{i}"));
                Ok(storage.material_contexts.push(MaterialContext {
                    ubo_repo: RepositoryUbo::from([(BlockSemantic::MATERIALS, materials)]),
                    texture_repo: RepositoryTexture::from([(Semantic::DIFFUSE_TEXTURE, diffuse)]),
                }))
            })
            .collect::<Result<Vec<_>>>()?;

        let part_aabb = Aabb::from_min_max(Vec3::new(-1.0, -1.0, -1.0), Vec3::ONE);
        let skinned_objects = config.skinned_objects() as usize;
        let mut objects = Vec::with_capacity(config.objects as usize);
        for i in 0..config.objects as usize {
            let skinned = i < skinned_objects;
            let mut object = Object {
                parts: Vec::with_capacity(config.parts_per_object as usize),
                aabb: Aabb::INVALID,
            };
            for p in 0..config.parts_per_object as usize {
                let (effect, vertex_stream) = if skinned {
                    (skinned_effect, skinned_mesh)
                } else {
                    (
                        static_effects[(i + p) % static_effects.len()],
                        meshes[(i + p) % meshes.len()],
                    )
                };
                let slot = ((i * config.parts_per_object as usize + p) as u32) % MATERIAL_SLOTS;
                let mut material = Material::new(effect, slot);
                // First parts read the global repositories only.
                if p != 0 && !contexts.is_empty() {
                    material = material.with_context(contexts[(i + p) % contexts.len()]);
                }
                object.aabb = object.aabb.union(&part_aabb);
                object.parts.push(storage.parts.push(Part {
                    name: format!("object {i} / part {p}"),
                    material,
                    vertex_stream,
                    topology: PrimitiveTopology::TriangleList,
                    vertex_first: 0,
                    vertex_count: VERTICES as u32,
                    index_first: 0,
                    index_count: INDICES as u32,
                    aabb: part_aabb,
                }));
            }
            objects.push(SceneObject {
                object: storage.objects.push(object),
                skinned,
            });
        }

        log::info!(
            "Scene built: {} objects, {} parts, {} programs, {} material contexts.",
            objects.len(),
            storage.parts.len(),
            storage.programs.len(),
            storage.material_contexts.len()
        );

        Ok(Self {
            device,
            storage,
            instances,
            objects,
            ubo_repo,
            texture_repo,
            transforms,
            palettes,
            indirect: None,
        })
    }

    /// Collects every object of the scene for `frame`.
    pub fn part_list(&self, frame: u32) -> Result<PartList> {
        let mut list = PartList::new();
        for (i, object) in self.objects.iter().enumerate() {
            let transform = object_transform(i, frame);
            let palette = object
                .skinned
                .then(|| list.push_palette(&[Mat4::IDENTITY; JOINTS]));
            list.push_object(&self.storage, object.object, transform, None, palette)?;
        }
        Ok(list)
    }

    /// The world space box enclosing every object at `frame`.
    pub fn world_bounds(&self, frame: u32) -> Aabb {
        self.objects
            .iter()
            .enumerate()
            .filter_map(|(i, object)| {
                let aabb = self.storage.objects.get(object.object)?.aabb;
                Some(aabb.transform(&object_transform(i, frame)))
            })
            .fold(Aabb::INVALID, |bounds, aabb| bounds.union(&aabb))
    }

    /// Uploads the transforms and the skinning palettes of `part_list`.
    pub fn upload_part_list(&mut self, part_list: &PartList) -> Result<()> {
        let transforms = self.storage.ubos[self.transforms].id;
        self.device
            .write_buffer(transforms, 0, part_list.transform_bytes())
            .context("instance transforms do not fit their uniform buffer")?;
        if !part_list.rigging_palettes.is_empty() {
            let palettes = self.storage.ubos[self.palettes].id;
            self.device
                .write_buffer(palettes, 0, part_list.palette_bytes())
                .context("skinning palettes do not fit their uniform buffer")?;
        }
        Ok(())
    }

    /// A draw indirect buffer holding at least `commands` commands.
    pub fn indirect_buffer(&mut self, commands: u64) -> Result<Handle<Buffer>> {
        let stride = tessel_core::renderer::DrawElementsIndirectCommand::STRIDE;
        let needed = commands * u64::from(stride);
        if let Some(buffer) = self.indirect {
            if self.storage.buffers[buffer].size >= needed {
                return Ok(buffer);
            }
        }
        let capacity = commands.max(1).next_power_of_two();
        let buffer = make_buffer(
            &mut self.device,
            &mut self.storage,
            stride,
            capacity,
            BufferUsage::StreamDraw,
        )?;
        log::debug!("Allocated a draw indirect buffer for {capacity} commands.");
        self.indirect = Some(buffer);
        Ok(buffer)
    }
}

/// Objects are laid out along x, bobbing and pulsing with the frame.
fn object_transform(index: usize, frame: u32) -> Mat4 {
    let phase = (frame as f32 * 0.25).sin();
    Mat4::from_translation(Vec3::new(index as f32 * 3.0, phase, 0.0))
        * Mat4::from_scale(Vec3::ONE * (1.0 + 0.1 * phase))
}

fn make_mesh(
    device: &mut HeadlessDevice,
    storage: &mut Storage,
    attributes: &[AttributeDescription],
    instances: &InstanceStream,
) -> Result<Handle<VertexStream>> {
    let stream = make_vertex_stream(
        device,
        storage,
        VERTICES,
        INDICES,
        IndexFormat::Uint32,
        attributes,
        &instances.stream,
    )?;
    let index_view = storage.vertex_streams[stream]
        .index
        .context("vertex stream without index buffer")?
        .view;
    let indices: Vec<u32> = (0..INDICES as u32).map(|i| i % VERTICES as u32).collect();
    device.write_buffer(
        storage.buffers[index_view.buffer].id,
        index_view.offset,
        bytemuck::cast_slice(&indices),
    )?;
    Ok(stream)
}

fn make_ubo(
    device: &mut HeadlessDevice,
    storage: &mut Storage,
    label: &'static str,
    size: u64,
) -> Result<Handle<UniformBuffer>> {
    let id = device.create_buffer(&BufferDescriptor {
        label: Some(Cow::Borrowed(label)),
        size,
        usage: BufferUsage::DynamicDraw,
    })?;
    Ok(storage.ubos.push(UniformBuffer { id, size }))
}

fn make_texture(device: &mut HeadlessDevice, storage: &mut Storage, name: &str) -> Handle<Texture> {
    let id = device.create_texture();
    storage.textures.push(Texture {
        id,
        name: name.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SandboxConfig {
        SandboxConfig {
            objects: 8,
            parts_per_object: 2,
            effects: 2,
            material_contexts: 2,
            skinned_ratio: 0.25,
            ..SandboxConfig::default()
        }
    }

    #[test]
    fn scene_holds_every_part() {
        let scene = Scene::build(&config()).unwrap();
        assert_eq!(scene.objects.len(), 8);
        assert_eq!(scene.storage.parts.len(), 16);
        // Two static effects of two and one techniques, one skinned effect of two.
        assert_eq!(scene.storage.programs.len(), 5);
    }

    #[test]
    fn part_list_references_palettes_of_skinned_objects_only() {
        let scene = Scene::build(&config()).unwrap();
        let list = scene.part_list(0).unwrap();

        assert_eq!(list.len(), 16);
        assert_eq!(list.instance_transforms.len(), 8);
        assert_eq!(list.rigging_palettes.len(), 2 * JOINTS);
        let skinned_parts = list
            .palette_offset
            .iter()
            .filter(|&&offset| offset != tessel_core::renderer::INVALID_INDEX)
            .count();
        assert_eq!(skinned_parts, 4);
    }

    #[test]
    fn world_bounds_span_the_object_row() {
        let config = config();
        let scene = Scene::build(&config).unwrap();
        let bounds = scene.world_bounds(0);
        let last = (config.objects - 1) as f32 * 3.0;
        assert_eq!(bounds.min, Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(bounds.max, Vec3::new(last + 1.0, 1.0, 1.0));

        // The objects pulse, the row does not move along x.
        let later = scene.world_bounds(6);
        assert!(later.is_valid());
        assert!(later.min.x < 0.0 && later.max.x > last);
    }

    #[test]
    fn indirect_buffer_grows_on_demand() {
        let mut scene = Scene::build(&config()).unwrap();
        let small = scene.indirect_buffer(3).unwrap();
        assert_eq!(scene.indirect_buffer(4).unwrap(), small);
        assert_ne!(scene.indirect_buffer(5).unwrap(), small);
    }
}

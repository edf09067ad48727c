#![allow(dead_code)]

use std::collections::BTreeMap;

use tessel_core::math::{Aabb, Mat4};
use tessel_core::renderer::{
    AttributeDimension, BlockSemantic, BufferDescriptor, BufferUsage, ComponentType,
    GraphicsDevice, IndexFormat, PrimitiveTopology, Semantic,
};
use tessel_data::model::{
    ConfiguredProgram, Effect, IntrospectProgram, Material, MaterialContext, Part, Technique,
    Texture, UniformBuffer, VertexStream,
};
use tessel_data::vertex_stream_utilities::{
    make_instance_stream, make_vertex_stream, store_configured_program, AttributeDescription,
    InstanceStream,
};
use tessel_data::{Handle, PartList, Storage};
use tessel_infra::HeadlessDevice;
use tessel_lanes::pass_lane::PASS_CATEGORY;

pub const POSITION_LOCATION: u32 = 0;
pub const NORMAL_LOCATION: u32 = 1;
pub const TRANSFORM_IDX_LOCATION: u32 = 2;
pub const MATERIAL_IDX_LOCATION: u32 = 3;
pub const PALETTE_OFFSET_LOCATION: u32 = 4;

pub const VERTICES: u64 = 24;
pub const INDICES: u64 = 36;

/// A headless device and a storage sharing one per-instance stream.
pub struct Scene {
    pub device: HeadlessDevice,
    pub storage: Storage,
    pub instances: InstanceStream,
}

impl Scene {
    pub fn new() -> Self {
        tessel_telemetry::try_init_logging();
        let mut device = HeadlessDevice::new();
        let mut storage = Storage::new();
        let instances = make_instance_stream(&mut device, &mut storage, 256, 1).unwrap();
        Self {
            device,
            storage,
            instances,
        }
    }

    pub fn position_normal() -> [AttributeDescription; 2] {
        [
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
        ]
    }

    /// A program reading positions, normals and the three instance indices.
    pub fn introspect(&mut self, name: &str) -> IntrospectProgram {
        IntrospectProgram::new(self.device.create_program(), name)
            .with_attribute(POSITION_LOCATION, Semantic::POSITION, AttributeDimension::vector(3))
            .with_attribute(NORMAL_LOCATION, Semantic::NORMAL, AttributeDimension::vector(3))
            .with_integer_attribute(
                TRANSFORM_IDX_LOCATION,
                Semantic::MODEL_TRANSFORM_IDX,
                AttributeDimension::vector(1),
            )
            .with_integer_attribute(
                MATERIAL_IDX_LOCATION,
                Semantic::MATERIAL_IDX,
                AttributeDimension::vector(1),
            )
            .with_integer_attribute(
                PALETTE_OFFSET_LOCATION,
                Semantic::MATRIX_PALETTE_OFFSET,
                AttributeDimension::vector(1),
            )
    }

    pub fn program(&mut self, name: &str) -> Handle<ConfiguredProgram> {
        let program = self.introspect(name);
        self.store_program(program)
    }

    pub fn store_program(&mut self, program: IntrospectProgram) -> Handle<ConfiguredProgram> {
        store_configured_program(&mut self.storage, program)
    }

    /// An effect with one technique per `(pass, program)`, in order.
    pub fn effect(
        &mut self,
        name: &str,
        techniques: &[(&str, Handle<ConfiguredProgram>)],
    ) -> Handle<Effect> {
        let techniques = techniques
            .iter()
            .map(|&(pass, configured_program)| Technique {
                annotations: BTreeMap::from([(PASS_CATEGORY.to_owned(), pass.to_owned())]),
                configured_program,
            })
            .collect();
        self.storage.effects.push(Effect {
            techniques,
            name: name.to_owned(),
        })
    }

    /// An effect drawn in the forward pass only.
    pub fn forward_effect(&mut self, program: Handle<ConfiguredProgram>) -> Handle<Effect> {
        self.effect("forward_only", &[("forward", program)])
    }

    pub fn stream_with(&mut self, attributes: &[AttributeDescription]) -> Handle<VertexStream> {
        make_vertex_stream(
            &mut self.device,
            &mut self.storage,
            VERTICES,
            INDICES,
            IndexFormat::Uint32,
            attributes,
            &self.instances.stream,
        )
        .unwrap()
    }

    pub fn stream(&mut self) -> Handle<VertexStream> {
        self.stream_with(&Self::position_normal())
    }

    pub fn part(
        &mut self,
        name: &str,
        material: Material,
        vertex_stream: Handle<VertexStream>,
        topology: PrimitiveTopology,
    ) -> Handle<Part> {
        self.storage.parts.push(Part {
            name: name.to_owned(),
            material,
            vertex_stream,
            topology,
            vertex_first: 0,
            vertex_count: VERTICES as u32,
            index_first: 0,
            index_count: INDICES as u32,
            aabb: Aabb::INVALID,
        })
    }

    pub fn triangles(
        &mut self,
        name: &str,
        material: Material,
        vertex_stream: Handle<VertexStream>,
    ) -> Handle<Part> {
        self.part(name, material, vertex_stream, PrimitiveTopology::TriangleList)
    }

    pub fn ubo(&mut self) -> Handle<UniformBuffer> {
        let id = self
            .device
            .create_buffer(&BufferDescriptor {
                label: None,
                size: 256,
                usage: BufferUsage::DynamicDraw,
            })
            .unwrap();
        self.storage.ubos.push(UniformBuffer { id, size: 256 })
    }

    pub fn texture(&mut self, name: &str) -> Handle<Texture> {
        let id = self.device.create_texture();
        self.storage.textures.push(Texture {
            id,
            name: name.to_owned(),
        })
    }

    pub fn context(
        &mut self,
        ubos: &[(BlockSemantic, Handle<UniformBuffer>)],
        textures: &[(Semantic, Handle<Texture>)],
    ) -> Handle<MaterialContext> {
        self.storage.material_contexts.push(MaterialContext {
            ubo_repo: ubos.iter().cloned().collect(),
            texture_repo: textures.iter().cloned().collect(),
        })
    }

    pub fn empty_context(&mut self) -> Handle<MaterialContext> {
        self.context(&[], &[])
    }
}

/// Appends each part with its own material and a fresh identity transform.
pub fn part_list(scene: &Scene, parts: &[Handle<Part>]) -> PartList {
    let mut list = PartList::new();
    for &part in parts {
        let material = scene.storage.parts[part].material;
        let transform_idx = list.push_transform(Mat4::IDENTITY);
        list.push_part(part, material, transform_idx, tessel_core::renderer::INVALID_INDEX);
    }
    list
}

mod common;

use common::{Scene, NORMAL_LOCATION, POSITION_LOCATION, TRANSFORM_IDX_LOCATION};
use tessel_core::renderer::{AttributeDimension, ComponentType, Semantic};
use tessel_data::model::Material;
use tessel_data::vertex_stream_utilities::AttributeDescription;
use tessel_infra::DeviceCommand;
use tessel_lanes::pass_lane::get_vao;

fn attached_locations(commands: &[DeviceCommand]) -> Vec<u32> {
    commands
        .iter()
        .filter_map(|command| match command {
            DeviceCommand::AttachVertexAttribute { binding, .. } => Some(binding.location),
            _ => None,
        })
        .collect()
}

#[test]
fn same_stream_reuses_the_cached_vao() {
    let mut scene = Scene::new();
    let program = scene.program("phong");
    let effect = scene.forward_effect(program);
    let stream = scene.stream();
    let a = scene.triangles("a", Material::new(effect, 0), stream);
    let b = scene.triangles("b", Material::new(effect, 0), stream);

    let first = get_vao(&mut scene.device, &mut scene.storage, program, a).unwrap();
    let created = scene.device.vertex_array_count();
    let second = get_vao(&mut scene.device, &mut scene.storage, program, a).unwrap();
    let third = get_vao(&mut scene.device, &mut scene.storage, program, b).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, third);
    assert_eq!(scene.device.vertex_array_count(), created);
    assert_eq!(scene.storage.vaos.len(), 1);
    let config = scene.storage.programs[program].config;
    assert_eq!(scene.storage.program_configs[config].entries.len(), 1);
}

#[test]
fn identical_layouts_in_distinct_streams_get_distinct_vaos() {
    let mut scene = Scene::new();
    let program = scene.program("phong");
    let effect = scene.forward_effect(program);
    let first_stream = scene.stream();
    let second_stream = scene.stream();
    let a = scene.triangles("a", Material::new(effect, 0), first_stream);
    let b = scene.triangles("b", Material::new(effect, 0), second_stream);

    let first = get_vao(&mut scene.device, &mut scene.storage, program, a).unwrap();
    let second = get_vao(&mut scene.device, &mut scene.storage, program, b).unwrap();

    assert_ne!(first, second);
    let config = scene.storage.programs[program].config;
    assert_eq!(scene.storage.program_configs[config].entries.len(), 2);
}

#[test]
fn each_program_keeps_its_own_cache() {
    let mut scene = Scene::new();
    let first_program = scene.program("first");
    let second_program = scene.program("second");
    let effect = scene.forward_effect(first_program);
    let stream = scene.stream();
    let part = scene.triangles("a", Material::new(effect, 0), stream);

    let first = get_vao(&mut scene.device, &mut scene.storage, first_program, part).unwrap();
    let second = get_vao(&mut scene.device, &mut scene.storage, second_program, part).unwrap();

    assert_ne!(first, second);
    assert_eq!(scene.device.vertex_array_count(), 2);
}

#[test]
fn missing_position_is_skipped_and_the_rest_is_bound() {
    let mut scene = Scene::new();
    let program = scene.program("phong");
    let effect = scene.forward_effect(program);
    let stream = scene.stream_with(&[AttributeDescription::new(
        Semantic::NORMAL,
        AttributeDimension::vector(3),
        ComponentType::Float32,
    )]);
    let part = scene.triangles("normals only", Material::new(effect, 0), stream);
    scene.device.take_commands();

    let vao = get_vao(&mut scene.device, &mut scene.storage, program, part).unwrap();

    let commands = scene.device.take_commands();
    let locations = attached_locations(&commands);
    assert!(!locations.contains(&POSITION_LOCATION));
    assert!(locations.contains(&NORMAL_LOCATION));
    assert!(locations.contains(&TRANSFORM_IDX_LOCATION));
    assert_eq!(locations.len(), 4);

    let vao_id = scene.storage.vaos[vao].id;
    let index_buffer = scene.storage.buffers[scene.storage.vertex_streams[stream]
        .index
        .unwrap()
        .view
        .buffer]
        .id;
    assert_eq!(commands[0], DeviceCommand::CreateVertexArray(vao_id));
    assert_eq!(
        commands[1],
        DeviceCommand::AttachIndexBuffer {
            vao: vao_id,
            buffer: index_buffer
        }
    );
}

#[test]
fn bindings_carry_view_offsets_and_instance_divisors() {
    let mut scene = Scene::new();
    let program = scene.program("phong");
    let effect = scene.forward_effect(program);
    let stream = scene.stream();
    let part = scene.triangles("a", Material::new(effect, 0), stream);
    scene.device.take_commands();

    get_vao(&mut scene.device, &mut scene.storage, program, part).unwrap();

    for command in scene.device.take_commands() {
        if let DeviceCommand::AttachVertexAttribute { binding, .. } = command {
            match binding.location {
                // The instance record is three tightly packed u32 indices.
                TRANSFORM_IDX_LOCATION => {
                    assert_eq!(binding.instance_divisor, 1);
                    assert_eq!(binding.stride, 12);
                    assert_eq!(binding.client.offset, 0);
                    assert_eq!(binding.client.component_type, ComponentType::Uint32);
                }
                common::MATERIAL_IDX_LOCATION => assert_eq!(binding.client.offset, 4),
                common::PALETTE_OFFSET_LOCATION => assert_eq!(binding.client.offset, 8),
                POSITION_LOCATION | NORMAL_LOCATION => {
                    assert_eq!(binding.instance_divisor, 0);
                    assert_eq!(binding.stride, 12);
                }
                other => panic!("unexpected location {other}"),
            }
        }
    }
}

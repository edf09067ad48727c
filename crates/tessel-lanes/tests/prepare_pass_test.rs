mod common;

use std::collections::BTreeSet;

use common::{part_list, Scene};
use tessel_core::renderer::{
    AttributeDimension, BufferUsage, ComponentType, IndexFormat, NoopProfiler, PrimitiveTopology,
    Semantic,
};
use tessel_data::model::Material;
use tessel_data::vertex_stream_utilities::{
    add_interleaved_attributes, make_buffer, prime_vertex_stream, set_index_buffer,
    AttributeDescription,
};
use tessel_lanes::pass_lane::{prepare_pass, select_pass, DrawEntryHelper};
use tessel_lanes::PassError;

#[test]
fn two_parts_sharing_program_vao_and_context_form_one_call() {
    let mut scene = Scene::new();
    let program = scene.program("phong");
    let effect = scene.forward_effect(program);
    let context = scene.empty_context();
    let stream = scene.stream();
    let material = Material::new(effect, 0).with_context(context);
    let a = scene.triangles("a", material, stream);
    let b = scene.triangles("b", material, stream);
    let list = part_list(&scene, &[a, b]);

    let cache = prepare_pass(
        &mut scene.device,
        &select_pass("forward"),
        &list,
        &mut scene.storage,
        &mut NoopProfiler,
    )
    .unwrap();

    assert_eq!(cache.calls.len(), 1);
    let call = cache.calls[0];
    assert_eq!(call.draw_count, 2);
    assert_eq!(call.program, program);
    assert_eq!(call.material_context, Some(context));
    assert_eq!(call.index_format, IndexFormat::Uint32);
    assert_eq!(call.topology, PrimitiveTopology::TriangleList);

    assert_eq!(cache.draw_commands.len(), 2);
    let base_instances: Vec<u32> = cache
        .draw_commands
        .iter()
        .map(|command| command.base_instance)
        .collect();
    assert_eq!(base_instances, vec![0, 1]);
    assert!(cache
        .draw_commands
        .iter()
        .all(|command| command.instance_count == 1 && command.count == common::INDICES as u32));

    // Equal keys may be reordered, but both transforms are referenced once.
    let transforms: BTreeSet<u32> = cache
        .draw_instances
        .iter()
        .map(|instance| instance.instance_transform_idx)
        .collect();
    assert_eq!(transforms, BTreeSet::from([0, 1]));
}

#[test]
fn two_programs_give_two_calls_in_first_seen_order() {
    let mut scene = Scene::new();
    let first = scene.program("first");
    let second = scene.program("second");
    let first_effect = scene.forward_effect(first);
    let second_effect = scene.forward_effect(second);
    let stream = scene.stream();
    // Program ids follow the part list traversal, not the storage order.
    let a = scene.triangles("a", Material::new(second_effect, 0), stream);
    let b = scene.triangles("b", Material::new(first_effect, 1), stream);
    let list = part_list(&scene, &[a, b]);

    let cache = prepare_pass(
        &mut scene.device,
        &select_pass("forward"),
        &list,
        &mut scene.storage,
        &mut NoopProfiler,
    )
    .unwrap();

    assert_eq!(cache.calls.len(), 2);
    assert_eq!(cache.calls[0].program, second);
    assert_eq!(cache.calls[1].program, first);
    assert!(cache.calls.iter().all(|call| call.draw_count == 1));
    assert_ne!(cache.calls[0].vao, cache.calls[1].vao);
    assert_eq!(cache.draw_instances[0].material_idx, 0);
    assert_eq!(cache.draw_instances[1].material_idx, 1);
}

#[test]
fn calls_are_ordered_by_program_then_context_then_vao() {
    let mut scene = Scene::new();
    let p0 = scene.program("p0");
    let p1 = scene.program("p1");
    let e0 = scene.forward_effect(p0);
    let e1 = scene.forward_effect(p1);
    let ctx_a = scene.empty_context();
    let ctx_b = scene.empty_context();
    let v0 = scene.stream();
    let v1 = scene.stream();

    let parts = [
        scene.triangles("p1 b v1", Material::new(e1, 0).with_context(ctx_b), v1),
        scene.triangles("p0 a v0", Material::new(e0, 1).with_context(ctx_a), v0),
        scene.triangles("p1 a v0", Material::new(e1, 2).with_context(ctx_a), v0),
        scene.triangles("p0 b v1", Material::new(e0, 3).with_context(ctx_b), v1),
        scene.triangles("p0 a v1", Material::new(e0, 4).with_context(ctx_a), v1),
    ];
    let list = part_list(&scene, &parts);

    let cache = prepare_pass(
        &mut scene.device,
        &select_pass("forward"),
        &list,
        &mut scene.storage,
        &mut NoopProfiler,
    )
    .unwrap();

    let order: Vec<_> = cache
        .calls
        .iter()
        .map(|call| (call.program, call.material_context))
        .collect();
    assert_eq!(
        order,
        vec![
            (p1, Some(ctx_b)),
            (p1, Some(ctx_a)),
            (p0, Some(ctx_b)),
            (p0, Some(ctx_a)),
            (p0, Some(ctx_a)),
        ]
    );
    // Within a program and context, VAOs follow their first-seen order.
    assert_eq!(
        cache.calls[3].vao,
        scene.storage.program_configs[scene.storage.programs[p0].config]
            .find(v0)
            .unwrap()
    );
    assert_eq!(
        cache.calls[4].vao,
        scene.storage.program_configs[scene.storage.programs[p0].config]
            .find(v1)
            .unwrap()
    );

    let materials: Vec<u32> = cache
        .draw_instances
        .iter()
        .map(|instance| instance.material_idx)
        .collect();
    assert_eq!(materials, vec![0, 2, 3, 1, 4]);
}

#[test]
fn every_compatible_part_is_drawn_exactly_once() {
    let mut scene = Scene::new();
    let programs = [scene.program("p0"), scene.program("p1"), scene.program("p2")];
    let effects: Vec<_> = programs.iter().map(|&p| scene.forward_effect(p)).collect();
    let depth_program = scene.program("depth");
    let depth_only = scene.effect("depth_only", &[("depth", depth_program)]);
    let contexts = [scene.empty_context(), scene.empty_context()];
    let streams = [scene.stream(), scene.stream(), scene.stream()];

    let mut parts = Vec::new();
    for i in 0..30usize {
        let mut material = Material::new(effects[i % 3], i as u32);
        if i % 4 != 0 {
            material = material.with_context(contexts[i % 2]);
        }
        parts.push(scene.triangles(&format!("part {i}"), material, streams[i % 5 % 3]));
    }
    for i in 0..4 {
        parts.push(scene.triangles(&format!("depth {i}"), Material::new(depth_only, 99), streams[0]));
    }
    let list = part_list(&scene, &parts);

    let cache = prepare_pass(
        &mut scene.device,
        &select_pass("forward"),
        &list,
        &mut scene.storage,
        &mut NoopProfiler,
    )
    .unwrap();

    let drawn: u32 = cache.calls.iter().map(|call| call.draw_count).sum();
    assert_eq!(drawn, 30);
    assert_eq!(cache.draw_commands.len(), 30);
    assert_eq!(cache.draw_instances.len(), 30);
    assert!(cache.draw_instances.iter().all(|instance| instance.material_idx != 99));

    // Same topology everywhere: each (program, context, VAO) has exactly one call.
    let identities: BTreeSet<_> = cache
        .calls
        .iter()
        .map(|call| (call.program, call.material_context, call.vao))
        .collect();
    assert_eq!(identities.len(), cache.calls.len());

    // Base instances run through the whole cache.
    for (i, command) in cache.draw_commands.iter().enumerate() {
        assert_eq!(command.base_instance, i as u32);
    }

    let stats = cache.stats();
    assert_eq!(stats.draw_calls, cache.calls.len());
    assert_eq!(stats.commands, 30);
    assert_eq!(stats.programs, 3);
    assert_eq!(stats.material_contexts, 3);
}

#[test]
fn parts_without_a_technique_for_the_pass_are_excluded() {
    let mut scene = Scene::new();
    let forward = scene.program("forward");
    let depth = scene.program("depth");
    let both = scene.effect("both", &[("depth", depth), ("forward", forward)]);
    let forward_only = scene.forward_effect(forward);
    let stream = scene.stream();
    let a = scene.triangles("a", Material::new(forward_only, 0), stream);
    let b = scene.triangles("b", Material::new(both, 1), stream);
    let list = part_list(&scene, &[a, b]);

    let mut helper = DrawEntryHelper::new();
    let entries = helper
        .generate_draw_entries(
            &mut scene.device,
            &select_pass("depth"),
            &list,
            &mut scene.storage,
            &mut NoopProfiler,
        )
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].part_list_idx, 1);

    let cache = prepare_pass(
        &mut scene.device,
        &select_pass("shadow"),
        &list,
        &mut scene.storage,
        &mut NoopProfiler,
    )
    .unwrap();
    assert!(cache.is_empty());
    assert!(cache.draw_commands.is_empty());
}

#[test]
fn topology_change_splits_a_run() {
    let mut scene = Scene::new();
    let program = scene.program("lines_and_triangles");
    let effect = scene.forward_effect(program);
    let stream = scene.stream();
    let material = Material::new(effect, 0);
    let a = scene.part("a", material, stream, PrimitiveTopology::LineList);
    let b = scene.part("b", material, stream, PrimitiveTopology::TriangleList);
    let c = scene.part("c", material, stream, PrimitiveTopology::LineList);
    let list = part_list(&scene, &[a, b, c]);

    let cache = prepare_pass(
        &mut scene.device,
        &select_pass("forward"),
        &list,
        &mut scene.storage,
        &mut NoopProfiler,
    )
    .unwrap();

    assert_eq!(cache.calls.len(), 2);
    assert_eq!(cache.calls[0].topology, PrimitiveTopology::LineList);
    assert_eq!(cache.calls[0].draw_count, 2);
    assert_eq!(cache.calls[1].topology, PrimitiveTopology::TriangleList);
    assert_eq!(cache.calls[1].draw_count, 1);
    assert_eq!(cache.calls[0].vao, cache.calls[1].vao);
}

/// A stream whose positions and indices live in one shared buffer.
fn shared_buffer_stream(
    scene: &mut Scene,
    index_offset: u64,
) -> tessel_data::Handle<tessel_data::model::VertexStream> {
    let buffer = make_buffer(
        &mut scene.device,
        &mut scene.storage,
        1,
        4096,
        BufferUsage::StaticDraw,
    )
    .unwrap();
    let stream = prime_vertex_stream(&mut scene.storage, &scene.instances.stream);
    add_interleaved_attributes(
        &mut scene.storage,
        stream,
        &Scene::position_normal(),
        buffer,
        common::VERTICES,
        1024,
    )
    .unwrap();
    set_index_buffer(
        &mut scene.storage,
        stream,
        IndexFormat::Uint16,
        buffer,
        common::INDICES,
        index_offset,
    )
    .unwrap();
    stream
}

#[test]
fn first_index_accounts_for_the_index_view_offset() {
    let mut scene = Scene::new();
    let program = scene.program("offset");
    let effect = scene.forward_effect(program);
    let stream = shared_buffer_stream(&mut scene, 8);
    let part = scene.triangles("offset", Material::new(effect, 0), stream);
    scene.storage.parts[part].index_first = 6;
    scene.storage.parts[part].index_count = 12;
    scene.storage.parts[part].vertex_first = 3;
    let list = part_list(&scene, &[part]);

    let cache = prepare_pass(
        &mut scene.device,
        &select_pass("forward"),
        &list,
        &mut scene.storage,
        &mut NoopProfiler,
    )
    .unwrap();

    let command = cache.draw_commands[0];
    assert_eq!(command.first_index, 8 / 2 + 6);
    assert_eq!(command.count, 12);
    assert_eq!(command.base_vertex, 3);
    assert_eq!(cache.calls[0].index_format, IndexFormat::Uint16);
}

#[test]
fn misaligned_index_view_aborts_the_pass() {
    let mut scene = Scene::new();
    let program = scene.program("misaligned");
    let effect = scene.forward_effect(program);
    let stream = shared_buffer_stream(&mut scene, 3);
    let part = scene.triangles("misaligned", Material::new(effect, 0), stream);
    let list = part_list(&scene, &[part]);

    let err = prepare_pass(
        &mut scene.device,
        &select_pass("forward"),
        &list,
        &mut scene.storage,
        &mut NoopProfiler,
    )
    .unwrap_err();
    assert_eq!(
        err,
        PassError::MisalignedIndexBuffer {
            offset: 3,
            index_size: 2
        }
    );
}

#[test]
fn first_index_overflow_aborts_the_pass() {
    let mut scene = Scene::new();
    let program = scene.program("overflow");
    let effect = scene.forward_effect(program);
    let stream = shared_buffer_stream(&mut scene, 4);
    let part = scene.triangles("overflow", Material::new(effect, 0), stream);
    scene.storage.parts[part].index_first = u32::MAX;
    let list = part_list(&scene, &[part]);

    let err = prepare_pass(
        &mut scene.device,
        &select_pass("forward"),
        &list,
        &mut scene.storage,
        &mut NoopProfiler,
    )
    .unwrap_err();
    assert_eq!(
        err,
        PassError::IndexRangeOverflow {
            part: "overflow".to_owned(),
            view_offset: 4,
            index_size: 2,
            index_first: u32::MAX,
        }
    );
}

#[test]
fn stream_without_index_buffer_aborts_the_pass() {
    let mut scene = Scene::new();
    let program = scene.program("unindexed");
    let effect = scene.forward_effect(program);
    let stream = prime_vertex_stream(&mut scene.storage, &scene.instances.stream);
    let part = scene.triangles("unindexed", Material::new(effect, 0), stream);
    let list = part_list(&scene, &[part]);

    let err = prepare_pass(
        &mut scene.device,
        &select_pass("forward"),
        &list,
        &mut scene.storage,
        &mut NoopProfiler,
    )
    .unwrap_err();
    assert_eq!(
        err,
        PassError::MissingIndexBuffer {
            part: "unindexed".to_owned()
        }
    );
}

#[test]
fn row_count_mismatch_aborts_the_pass() {
    let mut scene = Scene::new();
    let skinning = Semantic::new("BindShapeMatrix");
    let introspect = scene.introspect("skinned").with_attribute(
        5,
        skinning.clone(),
        AttributeDimension::matrix(4, 4),
    );
    let program = scene.store_program(introspect);
    let effect = scene.forward_effect(program);
    let mut attributes = Scene::position_normal().to_vec();
    attributes.push(AttributeDescription::new(
        skinning.clone(),
        AttributeDimension::matrix(4, 3),
        ComponentType::Float32,
    ));
    let stream = scene.stream_with(&attributes);
    let part = scene.triangles("skinned", Material::new(effect, 0), stream);
    let list = part_list(&scene, &[part]);

    let err = prepare_pass(
        &mut scene.device,
        &select_pass("forward"),
        &list,
        &mut scene.storage,
        &mut NoopProfiler,
    )
    .unwrap_err();
    match err {
        PassError::RowCountMismatch {
            semantic,
            expected,
            provided,
            ..
        } => {
            assert_eq!(semantic, skinning);
            assert_eq!(expected, AttributeDimension::matrix(4, 4));
            assert_eq!(provided, AttributeDimension::matrix(4, 3));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn failed_vao_configuration_creates_no_device_vao() {
    let mut scene = Scene::new();
    let skinning = Semantic::new("BindShapeMatrix");
    let introspect = scene.introspect("skinned").with_attribute(
        5,
        skinning.clone(),
        AttributeDimension::matrix(4, 4),
    );
    let program = scene.store_program(introspect);
    let effect = scene.forward_effect(program);
    let mut attributes = Scene::position_normal().to_vec();
    attributes.push(AttributeDescription::new(
        skinning,
        AttributeDimension::matrix(4, 3),
        ComponentType::Float32,
    ));
    let stream = scene.stream_with(&attributes);
    let part = scene.triangles("skinned", Material::new(effect, 0), stream);
    let list = part_list(&scene, &[part]);
    let created = scene.device.vertex_array_count();

    for _ in 0..3 {
        let err = prepare_pass(
            &mut scene.device,
            &select_pass("forward"),
            &list,
            &mut scene.storage,
            &mut NoopProfiler,
        )
        .unwrap_err();
        assert!(matches!(err, PassError::RowCountMismatch { .. }));
    }

    assert_eq!(scene.device.vertex_array_count(), created);
    assert!(scene.storage.vaos.is_empty());
}

#[test]
fn material_context_budget_is_enforced() {
    let mut scene = Scene::new();
    let program = scene.program("crowded");
    let effect = scene.forward_effect(program);
    let stream = scene.stream();

    // Id 0 is the null context: 1023 contexts fit in 10 bits, the 1024th does not.
    let parts: Vec<_> = (0..1024)
        .map(|i| {
            let context = scene.empty_context();
            scene.triangles(
                &format!("part {i}"),
                Material::new(effect, i).with_context(context),
                stream,
            )
        })
        .collect();
    let list = part_list(&scene, &parts);

    let err = prepare_pass(
        &mut scene.device,
        &select_pass("forward"),
        &list,
        &mut scene.storage,
        &mut NoopProfiler,
    )
    .unwrap_err();
    assert_eq!(
        err,
        PassError::IdBudgetExceeded {
            resource: "MaterialContext",
            bits: 10,
            capacity: 1024
        }
    );

    let fitting = part_list(&scene, &parts[..1023]);
    let cache = prepare_pass(
        &mut scene.device,
        &select_pass("forward"),
        &fitting,
        &mut scene.storage,
        &mut NoopProfiler,
    )
    .unwrap();
    assert_eq!(cache.calls.len(), 1023);
}

#[test]
fn inconsistent_part_list_aborts_the_pass() {
    let mut scene = Scene::new();
    let program = scene.program("phong");
    let effect = scene.forward_effect(program);
    let stream = scene.stream();
    let part = scene.triangles("a", Material::new(effect, 0), stream);
    let mut list = part_list(&scene, &[part]);
    list.palette_offset.clear();

    let err = prepare_pass(
        &mut scene.device,
        &select_pass("forward"),
        &list,
        &mut scene.storage,
        &mut NoopProfiler,
    )
    .unwrap_err();
    assert_eq!(
        err,
        PassError::InconsistentPartList {
            parts: 1,
            materials: 1,
            transforms: 1,
            palettes: 0
        }
    );
}

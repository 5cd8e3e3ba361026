// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::time::Instant;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use floorplan_model::seed_walls;
use floorplan_scene::Scene;
use serde_json::{Value, json};

fn furnished_scene(count: usize) -> (Scene, Vec<String>) {
    let mut scene = Scene::default();
    scene.load_wall_records(seed_walls());
    let mut meshes = Vec::with_capacity(count);
    for i in 0..count {
        let r = scene
            .exec(
                "furniture.place",
                json!({ "catalogId": "chair", "x": (i % 20) as f64, "z": (i / 20) as f64 }),
            )
            .unwrap();
        meshes.push(r["meshId"].as_str().unwrap().to_owned());
    }
    (scene, meshes)
}

fn bench_mutations(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    group.bench_function("move_burst_200", |b| {
        b.iter_batched(
            || furnished_scene(50),
            |(mut scene, meshes)| {
                let t0 = Instant::now();
                for (i, mesh) in meshes.iter().cycle().take(200).enumerate() {
                    let p = json!({ "meshId": mesh, "x": i as f64 * 0.01, "z": 1.0 });
                    black_box(scene.exec_at("furniture.move", p, t0).is_ok());
                }
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("undo_redo_full_stack", |b| {
        b.iter_batched(
            || furnished_scene(50),
            |(mut scene, _)| {
                let now = Instant::now();
                while scene.undo_at(now).is_some() {}
                while scene.redo_at(now).is_some() {}
                black_box(scene.design().furniture.len());
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("query_point_after_edit", |b| {
        let (mut scene, meshes) = furnished_scene(200);
        let mut i = 0_usize;
        b.iter(|| {
            i += 1;
            let mesh = &meshes[i % meshes.len()];
            let _ = scene.exec("furniture.rotate", json!({ "meshId": mesh, "rotY": 0.5 }));
            black_box(scene.exec("scene.query_point", json!({ "x": 3.5, "z": 2.5 })).ok());
        });
    });
    group.bench_function("info", |b| {
        let (mut scene, _) = furnished_scene(200);
        b.iter(|| black_box(scene.exec("scene.info", Value::Null).ok()));
    });
    group.finish();
}

criterion_group!(benches, bench_mutations);
criterion_main!(benches);

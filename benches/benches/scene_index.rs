// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use floorplan_index::{Bounds, SpatialHash};
use floorplan_model::{
    Design, FloorTile, KindMask, PlacedFurniture, SceneIndex, Sources, Stair, StairDirection,
    WallSegment, default_catalog, default_rooms, seed_walls,
};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_grid_bounds(n: usize, cell: f64) -> Vec<Bounds> {
    let mut out = Vec::with_capacity(n * n);
    for z in 0..n {
        for x in 0..n {
            out.push(Bounds::from_xzwd(x as f64 * cell, z as f64 * cell, cell, cell));
        }
    }
    out
}

/// A plan of `rooms x rooms` boxes, each walled, tiled, and furnished,
/// repeated on `floors` floors with a stair between each pair.
fn gen_design(rooms: usize, floors: i32) -> Design {
    let catalog = default_catalog();
    let ids: Vec<_> = catalog.filter(None).map(|e| e.id.clone()).collect();
    let mut rng = Rng::new(0xF100_4B1A_7E55_0001);
    let mut design = Design::default();
    let size = 4.0;
    for floor in 0..floors {
        for rz in 0..rooms {
            for rx in 0..rooms {
                let (x0, z0) = (rx as f64 * size, rz as f64 * size);
                let tag = format!("{floor}_{rx}_{rz}");
                for wall in [
                    WallSegment::horizontal(format!("wh_{tag}"), z0, x0, x0 + size, floor),
                    WallSegment::vertical(format!("wv_{tag}"), x0, z0, z0 + size, floor),
                ]
                .into_iter()
                .flatten()
                {
                    design.walls.insert(wall.id.clone(), wall);
                }
                if let Ok(tile) = FloorTile::new(format!("ft_{tag}"), x0, z0, size, size, floor) {
                    design.floor_tiles.insert(tile.id.clone(), tile);
                }
                for i in 0..3 {
                    let cat = &ids[(rng.next_u64() as usize) % ids.len()];
                    design.furniture.push(PlacedFurniture::new(
                        format!("f_{tag}_{i}"),
                        cat.as_str(),
                        x0 + 0.5 + rng.next_f64() * (size - 1.0),
                        z0 + 0.5 + rng.next_f64() * (size - 1.0),
                        0.0,
                        floor,
                    ));
                }
            }
        }
        if floor + 1 < floors {
            let stair = Stair::new(format!("st_{floor}"), 0.5, 0.5, StairDirection::North, floor);
            design.stairs.insert(stair.id.clone(), stair);
        }
    }
    design
}

fn bench_spatial_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("spatial_hash");
    for &n in &[16usize, 32, 64] {
        let bounds = gen_grid_bounds(n, 1.5);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("insert_query_box_n{n}"), |b| {
            b.iter_batched(
                SpatialHash::<u32, u32>::default,
                |mut idx| {
                    for (i, r) in bounds.iter().copied().enumerate() {
                        let _ = idx.insert(i as u32, r, 0, i as u32);
                    }
                    let hits = idx.query_box(4.0, 0, 4.0, 12.0, 12.0).count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            );
        });
    }

    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    let mut idx = SpatialHash::<u32, ()>::default();
    for i in 0..4096_u32 {
        let (x, z) = (rng.next_f64() * 60.0, rng.next_f64() * 60.0);
        idx.insert(i, Bounds::from_xzwd(x, z, 0.8, 0.8), (i % 3) as i32, ());
    }
    group.bench_function("query_point_random", |b| {
        let mut rng = Rng::new(7);
        b.iter(|| {
            let (x, z) = (rng.next_f64() * 60.0, rng.next_f64() * 60.0);
            black_box(idx.query_point(x, 1, z).count());
        });
    });
    group.finish();
}

fn bench_scene_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_index");
    let rooms = default_rooms();
    let catalog = default_catalog();

    let mut seed = Design::default();
    for wall in seed_walls() {
        seed.walls.insert(wall.id.clone(), wall);
    }
    group.bench_function("rebuild_seed", |b| {
        let mut index = SceneIndex::default();
        b.iter(|| {
            index.rebuild(&Sources { design: &seed, rooms: &rooms, catalog: &catalog });
            black_box(index.len());
        });
    });

    for &(n, floors) in &[(4usize, 1), (8, 2), (16, 3)] {
        let design = gen_design(n, floors);
        let sources = Sources { design: &design, rooms: &rooms, catalog: &catalog };
        group.throughput(Throughput::Elements(design.record_count() as u64));
        group.bench_function(format!("rebuild_then_query_box_n{n}_f{floors}"), |b| {
            let mut index = SceneIndex::default();
            b.iter(|| {
                index.rebuild(&sources);
                let hits = index.query_box(2.0, 0, 2.0, 10.0, 10.0, KindMask::all());
                black_box(hits.len());
            });
        });
        group.bench_function(format!("rebuild_then_query_point_n{n}_f{floors}"), |b| {
            let mut index = SceneIndex::default();
            b.iter(|| {
                index.rebuild(&sources);
                let hits = index.query_point(6.5, 0, 6.5, KindMask::WALL | KindMask::FURNITURE);
                black_box(hits.len());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_spatial_hash, bench_scene_index);
criterion_main!(benches);

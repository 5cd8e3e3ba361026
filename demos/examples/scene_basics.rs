// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene basics.
//!
//! Loads the reference wall layout, places and moves a sofa, adds a wall that
//! meets an existing one, and walks the history back and forth. Every step
//! goes through the same `exec` call a remote client would use.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p floorplan_demos --example scene_basics`

use floorplan_model::{KindMask, seed_walls};
use floorplan_scene::{CommandError, Scene};
use serde_json::{Value, json};

fn main() -> Result<(), CommandError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut scene = Scene::default();
    let loaded = scene.load_wall_records(seed_walls());
    println!("== Loaded {loaded} walls, {} junctions ==", scene.junctions().len());

    let sofa = scene.exec(
        "furniture.place",
        json!({ "catalogId": "sofa", "x": 5.0, "z": 5.0 }),
    )?;
    let mesh = sofa["meshId"].clone();
    println!("placed: {sofa}");

    scene.exec("furniture.move", json!({ "meshId": mesh, "x": 6.0, "z": 5.0 }))?;
    scene.exec("furniture.rotate", json!({ "meshId": mesh, "rotY": 1.5 }))?;

    let h = scene.exec("wall.add", json!({ "type": "h", "z": 0, "x1": 0, "x2": 5 }))?;
    let v = scene.exec("wall.add", json!({ "type": "v", "x": 2, "z1": -1, "z2": 1 }))?;
    println!("walls: {} + {}", h["wallId"], v["wallId"]);
    for f in scene.junctions().iter().filter(|f| f.horizontal == h["wallId"]) {
        println!("  junction at ({}, {}) joins {} and {}", f.x, f.z, f.horizontal, f.vertical);
    }

    println!("\n== Under (2, 0) on floor 0 ==");
    for hit in scene.query_point(2.0, 0, 0.0, KindMask::all()) {
        println!("  {:?} {}", hit.kind, hit.id);
    }

    println!("\n== History ==");
    println!("  undo stack: {}", scene.history().undo_len());
    while let Some(label) = scene.exec("history.undo", Value::Null)?["label"].as_str() {
        println!("  undo {label}");
    }
    let redo = scene.exec("history.redo", Value::Null)?;
    println!("  redo {}", redo["label"]);

    // Rejected commands report why and change nothing.
    let err = scene.exec_payload("wall.add", json!({ "type": "h", "z": 0, "x1": 0, "x2": 0.04 }));
    println!("\nrejected: {err}");

    println!("\n== Info ==\n{:#}", scene.exec("scene.info", Value::Null)?);
    Ok(())
}

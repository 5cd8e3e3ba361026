// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debounced autosave.
//!
//! Drives a scene with a simulated clock: a burst of five edits 50ms apart
//! produces a single save once the quiet period has elapsed, and that save
//! carries the state after the last edit. The saved JSON is then loaded into
//! a fresh scene.
//!
//! Run:
//! - `cargo run -p floorplan_demos --example autosave_debounce`

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use floorplan_scene::{Scene, SceneConfig, Snapshot};
use serde_json::json;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let stored: Rc<RefCell<Option<String>>> = Rc::default();
    let sink = stored.clone();
    let mut scene = Scene::new(SceneConfig::default()).with_sink(move |s: &Snapshot| {
        match serde_json::to_string(s) {
            Ok(text) => *sink.borrow_mut() = Some(text),
            Err(err) => log::error!("could not encode snapshot: {err}"),
        }
    });

    let t0 = Instant::now();
    let step = Duration::from_millis(50);
    let mut clock = t0;
    let Ok(placed) = scene.exec_at(
        "furniture.place",
        json!({ "catalogId": "armchair", "x": 1.0, "z": 1.0 }),
        clock,
    ) else {
        return;
    };
    for x in 2..6 {
        clock += step;
        let _ = scene.exec_at(
            "furniture.move",
            json!({ "meshId": placed["meshId"], "x": f64::from(x), "z": 1.0 }),
            clock,
        );
    }

    let debounce = scene.config().autosave_debounce();
    let mut saves = 0;
    for ms in (0..=2000).step_by(100) {
        let now = t0 + Duration::from_millis(ms);
        if scene.poll_autosave(now) {
            saves += 1;
            println!("saved at +{ms}ms (last edit at +200ms, debounce {debounce:?})");
        }
    }
    println!("saves: {saves}");

    let Some(text) = stored.borrow().clone() else {
        return;
    };
    let Ok(snapshot) = serde_json::from_str::<Snapshot>(&text) else {
        return;
    };
    let mut restored = Scene::default();
    restored.load_snapshot(snapshot);
    let f = &restored.design().furniture[0];
    println!("restored {} at ({}, {})", f.catalog_id, f.x, f.z);
}

// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Relay round trip.
//!
//! Plays both ends of the remote bridge in one process: a caller issues
//! requests through `PendingRequests`, frames travel as JSON text, the editor
//! side answers through `RelayBridge`, and the caller matches responses back
//! to its waiters. A reconnect shows stale frames being dropped, and a
//! request that is never answered times out.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p floorplan_demos --example relay_roundtrip`

use std::time::{Duration, Instant};

use floorplan_scene::{PendingRequests, RelayBridge, RelayResponse, Scene, SceneConfig};
use serde_json::json;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SceneConfig::default();
    let mut scene = Scene::new(config.clone());
    let mut bridge = RelayBridge::new();
    let mut calls: PendingRequests<&'static str> = PendingRequests::new(config.relay_timeout());
    let t0 = Instant::now();

    if let Err(err) = calls.issue("scene.info", json!({}), "early", t0) {
        println!("before connect: {err}");
    }

    let stale = bridge.connect();
    let session = bridge.connect();
    calls.connect();

    let requests = [
        ("scene.get_room_at", json!({ "x": 1.0, "z": 7.0 }), "room"),
        ("furniture.place", json!({ "catalogId": "desk", "x": 2.0, "z": 8.0 }), "desk"),
        ("furniture.place", json!({ "catalogId": "hovercraft", "x": 0, "z": 0 }), "bad"),
    ];
    for (method, params, waiter) in requests {
        let Ok(req) = calls.issue(method, params, waiter, t0) else {
            continue;
        };
        let frame = serde_json::to_string(&req).unwrap_or_default();

        // A frame on the superseded session is dropped without a reply.
        assert!(bridge.handle_frame(&mut scene, stale, &frame).is_none());

        let Some(reply) = bridge.handle_frame(&mut scene, session, &frame) else {
            continue;
        };
        let Ok(response) = serde_json::from_str::<RelayResponse>(&reply) else {
            continue;
        };
        if let Some((who, outcome)) = calls.resolve(response) {
            match outcome {
                Ok(v) => println!("{who}: {v}"),
                Err(e) => println!("{who}: error: {e}"),
            }
        }
    }

    // Nobody answers this one.
    let _ = calls.issue("scene.list_furniture", json!({}), "slow", t0);
    for (who, outcome) in calls.expire(t0 + Duration::from_millis(config.relay_timeout_ms)) {
        println!("{who}: {}", outcome.map_or_else(|e| e.to_string(), |v| v.to_string()));
    }

    let _ = calls.issue("scene.info", json!({}), "orphan", t0);
    bridge.disconnect(session);
    for (who, outcome) in calls.disconnect() {
        println!("{who}: {outcome:?}");
    }
    println!("frames dropped by the bridge: {}", bridge.dropped());
}

// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Floorplan Scene: the command layer over a floorplan design.
//!
//! A [`Scene`] owns the records, the spatial index, the undo/redo history,
//! and the autosave timer. Everything that changes the design goes through
//! one entry point, [`Scene::exec`], which takes a method name and a JSON
//! parameter object and returns a JSON payload or a [`CommandError`]. The
//! same entry point serves local callers and the [`relay`] bridge.
//!
//! - Every successful mutation pushes one labeled history entry and restarts
//!   the autosave window. Rejected commands change nothing.
//! - Spatial queries rebuild the index first, so a read always sees the
//!   writes before it.
//! - Visual side effects and persistence are delegated to a
//!   [`SceneObserver`] and a [`SaveSink`].
//!
//! # Example
//!
//! ```rust
//! use floorplan_scene::Scene;
//! use serde_json::json;
//!
//! let mut scene = Scene::default();
//! let placed = scene
//!     .exec("furniture.place", json!({ "catalogId": "sofa", "x": 5.0, "z": 5.0 }))
//!     .unwrap();
//! let id = placed["meshId"].as_str().unwrap().to_owned();
//!
//! scene
//!     .exec("furniture.move", json!({ "meshId": id, "x": 6.0, "z": 5.0 }))
//!     .unwrap();
//! assert_eq!(scene.design().furniture[0].x, 6.0);
//!
//! scene.exec("history.undo", json!({})).unwrap();
//! assert_eq!(scene.design().furniture[0].x, 5.0);
//!
//! let err = scene.exec_payload("scene.teleport", json!({}));
//! assert_eq!(err, json!({ "error": "Unknown method: scene.teleport" }));
//! ```

pub mod autosave;
pub mod command;
pub mod config;
pub mod error;
pub mod observer;
pub mod relay;
pub mod scene;
pub mod workspace;

pub use autosave::Autosave;
pub use command::Command;
pub use config::SceneConfig;
pub use error::CommandError;
pub use observer::{NoopObserver, SaveSink, SceneObserver, Snapshot};
pub use relay::{PendingRequests, RelayBridge, RelayError, RelayRequest, RelayResponse, SessionId};
pub use scene::Scene;
pub use workspace::Workspace;

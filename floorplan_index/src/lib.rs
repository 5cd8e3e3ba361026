// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Floorplan Index: a uniform spatial hash for multi-floor plans.
//!
//! The plan is the ground plane `(x, z)`; every placement also carries an integer
//! floor level. Space is cut into square cells (1.0 unit by default) and each cell,
//! per floor, keeps the list of placements whose bounds touch it.
//!
//! - Insert and remove placements keyed by any ordered key (for example `(kind, id)`).
//! - Query the single cell under a point, or every placement touching a box.
//! - Box queries deduplicate, so an entity spanning many cells is reported once.
//!
//! The index is meant to be cheap to throw away: callers that own the
//! authoritative records usually [`clear`](SpatialHash::clear) and re-insert
//! everything before a batch of queries rather than tracking each edit.
//!
//! # Example
//!
//! ```rust
//! use floorplan_index::{Bounds, SpatialHash};
//!
//! let mut idx: SpatialHash<&str, u32> = SpatialHash::default();
//! idx.insert("rug", Bounds::new(0.0, 0.0, 3.0, 2.0), 0, 1);
//! idx.insert("lamp", Bounds::new(2.2, 1.2, 2.6, 1.6), 0, 2);
//!
//! // One cell lookup.
//! let here: Vec<_> = idx.query_point(2.5, 0, 1.5).map(|(k, _)| *k).collect();
//! assert_eq!(here, ["rug", "lamp"]);
//!
//! // The rug covers six cells but is reported once.
//! assert_eq!(idx.query_box(0.0, 0, 0.0, 3.0, 3.0).count(), 2);
//!
//! // Other floors are separate layers.
//! assert_eq!(idx.query_point(2.5, 1, 1.5).count(), 0);
//! ```
//!
//! ### Float semantics
//!
//! Cells are computed by floor division, so negative coordinates land in
//! negative cells. Coordinates outside the `i64` cell range saturate to the
//! outermost cell, and no call does work proportional to the area it names:
//! box queries stop at the occupied cells, and placements wider than
//! [`MAX_GRID_CELLS`] are kept off the grid.

#![no_std]

extern crate alloc;

pub mod hash;
pub mod types;

pub use hash::{DEFAULT_CELL_SIZE, MAX_GRID_CELLS, SpatialHash, Stats};
pub use types::{Bounds, CellKey};

// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Floorplan Model: geometry records for a multi-floor interior design.
//!
//! ## Records
//!
//! - [`WallSegment`]: a horizontal (`h`) or vertical (`v`) wall with height,
//!   thickness, floor, and sorted [`Opening`]s.
//! - [`FloorTile`]: an axis-aligned rectangle with a material.
//! - [`Stair`]: a fixed fifteen-step flight from one floor to the next.
//! - [`PlacedFurniture`]: an instance of a [`CatalogEntry`].
//! - [`Room`]: static ground-floor metadata.
//!
//! Constructors normalize their inputs and reject degenerate geometry with a
//! [`RecordError`]. Records deserialized from storage should be checked with
//! their `validate` method.
//!
//! ## Derived data
//!
//! - [`junctions`] computes filler blocks where walls meet.
//! - [`walls_in_room`] assigns walls to rooms by an approximate, tolerance
//!   based overlap test.
//! - [`SceneIndex`] is a spatial hash over everything, rebuilt from a
//!   [`Design`] plus the static rooms and catalog.
//!
//! # Example
//!
//! ```rust
//! use floorplan_model::{
//!     Design, KindMask, SceneIndex, Sources, WallSegment, default_catalog, junctions,
//! };
//!
//! let mut design = Design::default();
//! for wall in [
//!     WallSegment::horizontal("h", 0.0, 0.0, 5.0, 0).unwrap(),
//!     WallSegment::vertical("v", 2.0, -1.0, 1.0, 0).unwrap(),
//! ] {
//!     design.walls.insert(wall.id.clone(), wall);
//! }
//!
//! let fillers = junctions(design.walls.values());
//! assert_eq!((fillers[0].x, fillers[0].z), (2.0, 0.0));
//!
//! let catalog = default_catalog();
//! let mut index = SceneIndex::default();
//! index.rebuild(&Sources { design: &design, rooms: &[], catalog: &catalog });
//! assert_eq!(index.query_point(2.0, 0, 0.0, KindMask::WALL).len(), 2);
//!
//! // Walls under the minimum length are never created.
//! assert!(WallSegment::horizontal("tiny", 0.0, 0.0, 0.04, 0).is_err());
//! ```

pub mod consts;
pub mod design;
pub mod error;
pub mod furniture;
pub mod index;
pub mod junction;
pub mod room;
pub mod seed;
pub mod stair;
pub mod tile;
pub mod wall;

pub use design::{Design, Keyed};
pub use error::RecordError;
pub use furniture::{Catalog, CatalogEntry, PlacedFurniture, default_catalog};
pub use index::{
    Descriptor, EntityData, EntityKey, EntityKind, FurnitureInfo, KindMask, SceneIndex, Sources,
};
pub use junction::{JunctionFiller, junction, junctions};
pub use room::{Room, default_rooms, room_at, tiles_in_room, wall_in_room, walls_in_room};
pub use seed::{seed_floor_tiles, seed_walls};
pub use stair::{Stair, StairDirection};
pub use tile::FloorTile;
pub use wall::{Opening, OpeningKind, WallAxis, WallSegment};

// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry constants shared by records, the index, and the command layer.

/// Vertical distance between consecutive floor levels, in meters.
pub const FLOOR_HEIGHT: f64 = 3.0;

/// Default wall height, in meters.
pub const WALL_HEIGHT: f64 = 3.0;

/// Default wall thickness, in meters.
pub const WALL_THICKNESS: f64 = 0.35;

/// Walls shorter than this along their axis are rejected.
pub const MIN_WALL_LENGTH: f64 = 0.05;

/// Openings must sit strictly farther than this from either wall end.
pub const OPENING_EDGE_MARGIN: f64 = 0.1;

/// A placement gesture whose bounding box is smaller than this in every
/// direction is treated as a stray click.
pub const MIN_GESTURE_EXTENT: f64 = 0.5;

/// Tiles placed by gesture are at least this wide and deep.
pub const MIN_TILE_EXTENT: f64 = 1.0;

/// Every stair has this many steps.
pub const STAIR_STEPS: u32 = 15;

/// Default stair width, in meters.
pub const STAIR_WIDTH: f64 = 1.0;

/// Default stair run length, in meters.
pub const STAIR_LENGTH: f64 = 3.0;

/// Default material for new floor tiles.
pub const DEFAULT_TILE_TEXTURE: &str = "concrete_smooth";

/// Plan coordinates must be finite and no larger than this in magnitude.
pub const PLAN_EXTENT: f64 = 1.0e4;

/// How far a wall may sit outside a room's edge and still count as the room's wall.
pub const WALL_ROOM_TOLERANCE: f64 = 0.3;

// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wall and floor layout of the reference apartment, used when storage is empty.

use std::collections::BTreeMap;

use crate::consts::{DEFAULT_TILE_TEXTURE, WALL_HEIGHT, WALL_THICKNESS};
use crate::room::Room;
use crate::tile::FloorTile;
use crate::wall::{WallAxis, WallSegment};

/// `(id, horizontal, fixed, start, end)`
const SEED: &[(&str, bool, f64, f64, f64)] = &[
    // Exterior perimeter.
    ("s1", true, 1.41, 0.83, 12.29),
    ("s2", false, 12.29, 1.41, 2.49),
    ("s3", true, 2.49, 12.29, 44.13),
    ("s4", false, 0.83, 1.41, 31.13),
    ("s5", true, 31.13, 0.83, 47.12),
    // Apartment east wall, facing the courtyard.
    ("s6", false, 31.83, 2.49, 13.28),
    ("s7", true, 13.28, 30.15, 31.83),
    ("s8", false, 30.15, 13.28, 19.60),
    ("s9", false, 30.15, 22.49, 31.13),
    // Courtyard east wall.
    ("s10", false, 44.13, 2.49, 23.17),
    ("s11", true, 23.17, 44.13, 47.12),
    ("s12", false, 47.12, 23.17, 31.13),
    // Top row interior.
    ("s13", false, 5.51, 1.41, 13.24),
    ("s14", false, 5.93, 1.41, 12.97),
    ("s15", false, 11.89, 1.41, 13.24),
    ("s16", false, 25.59, 2.49, 8.67),
    ("s17", true, 8.67, 25.59, 31.83),
    // Top row to living room, split around doorways.
    ("s18", true, 13.06, 2.94, 3.59),
    ("s19", true, 13.24, 12.38, 14.02),
    ("s20", true, 13.24, 15.94, 30.15),
    // Left column.
    ("s21", true, 20.30, 0.83, 11.89),
    ("s22", false, 11.89, 20.30, 21.53),
    ("s23", false, 11.89, 23.28, 25.25),
    ("s24", false, 3.03, 20.30, 25.04),
    // Bottom rooms, split around doorways.
    ("s25", true, 25.04, 2.94, 15.10),
    ("s26", true, 25.04, 17.00, 19.50),
    ("s27", true, 25.04, 22.20, 30.15),
    ("s28", false, 9.0, 25.04, 31.13),
    ("s29", false, 18.50, 25.04, 31.13),
    ("s30", false, 22.80, 25.04, 31.13),
];

/// The thirty ground-floor walls of the reference apartment, all marked original.
pub fn seed_walls() -> Vec<WallSegment> {
    SEED.iter()
        .map(|&(id, horizontal, fixed, a, b)| WallSegment {
            id: id.into(),
            axis: if horizontal {
                WallAxis::Horizontal { z: fixed, x1: a, x2: b }
            } else {
                WallAxis::Vertical { x: fixed, z1: a, z2: b }
            },
            height: WALL_HEIGHT,
            thickness: WALL_THICKNESS,
            floor: 0,
            height_floors: 1,
            is_original: true,
            openings: Vec::new(),
        })
        .collect()
}

/// One ground-floor tile per room, covering the room's rectangle.
///
/// Tiles are named `ft_<room id>` and take the room's entry in `materials`,
/// or the default material. Rooms with an empty rectangle get no tile.
pub fn seed_floor_tiles(rooms: &[Room], materials: &BTreeMap<String, String>) -> Vec<FloorTile> {
    rooms
        .iter()
        .filter_map(|room| {
            let id = format!("ft_{}", room.id);
            let tile = FloorTile::new(id, room.x, room.z, room.w, room.d, 0).ok()?;
            let tex = materials
                .get(&room.id)
                .map_or(DEFAULT_TILE_TEXTURE, String::as_str);
            Some(tile.with_texture(tex))
        })
        .collect()
}

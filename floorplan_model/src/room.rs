// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static room metadata and the wall-to-room membership test.

use kurbo::Rect;
use serde::{Deserialize, Serialize};

use crate::tile::FloorTile;
use crate::wall::{WallAxis, WallSegment};

/// A named ground-floor area. Rooms are reference data, not part of the editable design.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Stable id, e.g. `"kitchen"`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Minimum x corner.
    pub x: f64,
    /// Minimum z corner.
    pub z: f64,
    /// Extent along x.
    pub w: f64,
    /// Extent along z.
    pub d: f64,
    /// Default floor color, `0xRRGGBB`.
    pub floor_color: u32,
    /// Default wall color, `0xRRGGBB`.
    pub wall_color: u32,
}

impl Room {
    /// Plan rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.z, self.x + self.w, self.z + self.d)
    }

    /// Inclusive containment of a plan point.
    pub fn contains(&self, x: f64, z: f64) -> bool {
        x >= self.x && x <= self.x + self.w && z >= self.z && z <= self.z + self.d
    }
}

/// Whether `wall` counts as one of `room`'s walls.
///
/// This is an approximate test, not exact containment. A wall belongs to the
/// room when its fixed coordinate lies within the room's extent on that axis
/// (edges included, padded by `tolerance`) and its span overlaps the room's
/// perpendicular extent padded by the same tolerance. A partition shared by
/// two rooms therefore belongs to both, and a wall just past a corner can be
/// picked up by its neighbor. Painting relies on exactly this behavior.
///
/// Rooms describe the ground floor, so walls on other floors never match.
pub fn wall_in_room(wall: &WallSegment, room: &Room, tolerance: f64) -> bool {
    if wall.floor != 0 {
        return false;
    }
    let (fixed_lo, fixed_hi, span_lo, span_hi) = match wall.axis {
        WallAxis::Horizontal { .. } => (room.z, room.z + room.d, room.x, room.x + room.w),
        WallAxis::Vertical { .. } => (room.x, room.x + room.w, room.z, room.z + room.d),
    };
    let fixed = wall.axis.fixed();
    let (a, b) = wall.axis.span();
    fixed >= fixed_lo - tolerance
        && fixed <= fixed_hi + tolerance
        && a < span_hi + tolerance
        && b > span_lo - tolerance
}

/// Ids of every wall that [`wall_in_room`] assigns to `room`.
pub fn walls_in_room<'a>(
    walls: impl IntoIterator<Item = &'a WallSegment>,
    room: &Room,
    tolerance: f64,
) -> Vec<&'a str> {
    walls
        .into_iter()
        .filter(|w| wall_in_room(w, room, tolerance))
        .map(|w| w.id.as_str())
        .collect()
}

/// Ground-floor tiles lying inside `room`, its rectangle padded by `tolerance`.
pub fn tiles_in_room<'a>(
    tiles: impl IntoIterator<Item = &'a FloorTile>,
    room: &Room,
    tolerance: f64,
) -> Vec<&'a FloorTile> {
    let area = room.rect().inflate(tolerance, tolerance);
    tiles
        .into_iter()
        .filter(|t| {
            let r = t.footprint();
            t.floor == 0
                && r.x0 >= area.x0
                && r.y0 >= area.y0
                && r.x1 <= area.x1
                && r.y1 <= area.y1
        })
        .collect()
}

type RoomRow = (&'static str, &'static str, [f64; 4], u32, u32);

const ROOMS: [RoomRow; 9] = [
    ("staircase", "Staircase", [0.0, 0.0, 2.75, 4.50], 0xa8_9888, 0xeb_e0d0),
    ("bedroom", "Bedroom", [3.00, 0.0, 4.35, 4.50], 0xc4_b099, 0xeb_e0d0),
    ("wc", "WC", [7.60, 0.0, 1.50, 2.00], 0xd0_d0d5, 0xe5_e0e0),
    ("foyer", "Foyer", [7.60, 2.25, 1.50, 2.25], 0xb8_a898, 0xeb_e0d0),
    ("corridor", "Corridor", [0.0, 4.75, 9.10, 0.96], 0xb0_a090, 0xeb_e0d0),
    ("living", "Living Room", [0.0, 5.96, 4.00, 5.24], 0xc8_b898, 0xeb_e0d0),
    ("kitchen", "Kitchen", [4.25, 5.96, 3.43, 2.40], 0xc0_b8a8, 0xeb_e0d0),
    ("bathroom", "Bathroom", [4.25, 8.61, 3.43, 2.59], 0xd0_d0d5, 0xe5_e0e0),
    ("utility", "Utility", [7.93, 5.96, 1.17, 5.24], 0xb0_a898, 0xeb_e0d0),
];

/// The nine rooms of the reference apartment.
pub fn default_rooms() -> Vec<Room> {
    ROOMS
        .iter()
        .map(|&(id, name, [x, z, w, d], floor_color, wall_color)| Room {
            id: id.into(),
            name: name.into(),
            x,
            z,
            w,
            d,
            floor_color,
            wall_color,
        })
        .collect()
}

/// First room containing the point, in list order.
pub fn room_at(rooms: &[Room], x: f64, z: f64) -> Option<&Room> {
    rooms.iter().find(|r| r.contains(x, z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::WALL_ROOM_TOLERANCE;

    fn square() -> Room {
        Room {
            id: "sq".into(),
            name: "Square".into(),
            x: 0.0,
            z: 0.0,
            w: 4.0,
            d: 4.0,
            floor_color: 0,
            wall_color: 0,
        }
    }

    #[test]
    fn edge_walls_belong() {
        let r = square();
        let north = WallSegment::horizontal("n", 0.0, 0.0, 4.0, 0).unwrap();
        let east = WallSegment::vertical("e", 4.2, 0.0, 4.0, 0).unwrap();
        assert!(wall_in_room(&north, &r, WALL_ROOM_TOLERANCE));
        assert!(wall_in_room(&east, &r, WALL_ROOM_TOLERANCE));
    }

    #[test]
    fn far_or_upper_walls_do_not() {
        let r = square();
        let far = WallSegment::horizontal("f", 4.5, 0.0, 4.0, 0).unwrap();
        let beside = WallSegment::horizontal("b", 2.0, 5.0, 8.0, 0).unwrap();
        let upper = WallSegment::horizontal("u", 0.0, 0.0, 4.0, 1).unwrap();
        for w in [&far, &beside, &upper] {
            assert!(!wall_in_room(w, &r, WALL_ROOM_TOLERANCE), "{}", w.id);
        }
    }

    #[test]
    fn shared_partition_matches_both_neighbors() {
        let rooms = default_rooms();
        let kitchen = rooms.iter().find(|r| r.id == "kitchen").unwrap();
        let bathroom = rooms.iter().find(|r| r.id == "bathroom").unwrap();
        // Between kitchen (ends at z=8.36) and bathroom (starts at z=8.61).
        let wall = WallSegment::horizontal("p", 8.5, 4.25, 7.68, 0).unwrap();
        assert!(wall_in_room(&wall, kitchen, WALL_ROOM_TOLERANCE));
        assert!(wall_in_room(&wall, bathroom, WALL_ROOM_TOLERANCE));
    }

    #[test]
    fn walls_in_room_collects_ids() {
        let r = square();
        let walls = [
            WallSegment::horizontal("a", 0.0, 0.0, 4.0, 0).unwrap(),
            WallSegment::horizontal("b", 9.0, 0.0, 4.0, 0).unwrap(),
            WallSegment::vertical("c", 0.0, 0.0, 4.0, 0).unwrap(),
        ];
        assert_eq!(walls_in_room(&walls, &r, WALL_ROOM_TOLERANCE), ["a", "c"]);
    }

    #[test]
    fn room_lookup_is_first_match() {
        let rooms = default_rooms();
        assert_eq!(rooms.len(), 9);
        assert_eq!(room_at(&rooms, 1.0, 1.0).map(|r| r.id.as_str()), Some("staircase"));
        assert_eq!(room_at(&rooms, 5.0, 9.0).map(|r| r.id.as_str()), Some("bathroom"));
        assert!(room_at(&rooms, 50.0, 50.0).is_none());
    }

    #[test]
    fn tiles_in_room_need_full_cover_on_ground_floor() {
        let r = square();
        let inside = FloorTile::new("a", 0.0, 0.0, 4.0, 4.0, 0).unwrap();
        let nudged = FloorTile::new("b", -0.2, 1.0, 1.0, 1.0, 0).unwrap();
        let straddling = FloorTile::new("c", 3.0, 3.0, 2.0, 2.0, 0).unwrap();
        let upstairs = FloorTile::new("d", 1.0, 1.0, 1.0, 1.0, 1).unwrap();
        let tiles = [inside, nudged, straddling, upstairs];
        let ids: Vec<_> = tiles_in_room(&tiles, &r, WALL_ROOM_TOLERANCE)
            .into_iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, ["a", "b"]);
    }
}

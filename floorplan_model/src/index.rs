// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial index over a whole scene, rebuilt from the records.

use floorplan_index::{Bounds, DEFAULT_CELL_SIZE, SpatialHash, Stats};
use kurbo::Rect;
use serde::{Deserialize, Serialize};

use crate::design::Design;
use crate::furniture::Catalog;
use crate::room::Room;
use crate::stair::Stair;
use crate::tile::FloorTile;
use crate::wall::WallSegment;

/// What an index entry refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A wall segment.
    Wall,
    /// A placed furniture instance.
    Furniture,
    /// A floor tile.
    Floor,
    /// A stair.
    Stair,
    /// A static room.
    Room,
}

impl EntityKind {
    /// The single-kind mask for this kind.
    pub fn mask(self) -> KindMask {
        match self {
            Self::Wall => KindMask::WALL,
            Self::Furniture => KindMask::FURNITURE,
            Self::Floor => KindMask::FLOOR,
            Self::Stair => KindMask::STAIR,
            Self::Room => KindMask::ROOM,
        }
    }
}

bitflags::bitflags! {
    /// Kinds to keep in a query result.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KindMask: u8 {
        /// Walls.
        const WALL      = 0b0000_0001;
        /// Furniture.
        const FURNITURE = 0b0000_0010;
        /// Floor tiles.
        const FLOOR     = 0b0000_0100;
        /// Stairs.
        const STAIR     = 0b0000_1000;
        /// Rooms.
        const ROOM      = 0b0001_0000;
    }
}

impl Default for KindMask {
    fn default() -> Self {
        Self::all()
    }
}

/// Index key: kind plus record id.
pub type EntityKey = (EntityKind, String);

/// Summary of a furniture instance as seen by the index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FurnitureInfo {
    /// Instance id.
    pub mesh_id: String,
    /// Catalog id.
    pub catalog_id: String,
    /// Display name from the catalog.
    pub name: String,
    /// Center x.
    pub x: f64,
    /// Center z.
    pub z: f64,
    /// Yaw.
    pub rot_y: f64,
    /// Catalog width.
    pub w: f64,
    /// Catalog height.
    pub h: f64,
    /// Catalog depth.
    pub d: f64,
}

/// Per-entity payload carried by an index entry.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EntityData {
    /// Copy of the wall record.
    Wall(WallSegment),
    /// Furniture summary.
    Furniture(FurnitureInfo),
    /// Copy of the tile record.
    Floor(FloorTile),
    /// Copy of the stair record.
    Stair(Stair),
    /// Copy of the room.
    Room(Room),
}

/// One query hit: `{type, id, data}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Descriptor {
    /// Entity kind.
    #[serde(rename = "type")]
    pub kind: EntityKind,
    /// Record id.
    pub id: String,
    /// Payload.
    pub data: EntityData,
}

/// Everything a rebuild reads.
#[derive(Clone, Copy, Debug)]
pub struct Sources<'a> {
    /// Editable records.
    pub design: &'a Design,
    /// Static rooms, indexed on floor 0.
    pub rooms: &'a [Room],
    /// Catalog used to size furniture.
    pub catalog: &'a Catalog,
}

fn rect_to_bounds(r: Rect) -> Bounds {
    Bounds::new(r.x0, r.y0, r.x1, r.y1)
}

/// A [`SpatialHash`] of scene entities.
///
/// The index is derived state. Call [`rebuild`](Self::rebuild) after any
/// batch of record edits and before querying; nothing is updated in place.
#[derive(Debug)]
pub struct SceneIndex {
    hash: SpatialHash<EntityKey, EntityData>,
}

impl Default for SceneIndex {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

impl SceneIndex {
    /// An empty index with the given cell size.
    pub fn new(cell_size: f64) -> Self {
        Self {
            hash: SpatialHash::new(cell_size),
        }
    }

    /// Discard the grid and re-insert every entity from `src`.
    ///
    /// - Walls: span padded by half the thickness.
    /// - Furniture: center plus/minus half the catalog size, ignoring yaw.
    ///   Instances whose catalog item is unknown are skipped.
    /// - Floor tiles: their rectangle.
    /// - Stairs: footprint by direction, on both floors they connect.
    /// - Rooms: their rectangle, always on floor 0.
    pub fn rebuild(&mut self, src: &Sources<'_>) {
        self.hash.clear();
        let design = src.design;
        for wall in design.walls.values() {
            self.put(
                EntityKind::Wall,
                &wall.id,
                wall.footprint(),
                wall.floor,
                EntityData::Wall(wall.clone()),
            );
        }
        for f in &design.furniture {
            let Some(item) = src.catalog.get(&f.catalog_id) else {
                continue;
            };
            let info = FurnitureInfo {
                mesh_id: f.mesh_id.clone(),
                catalog_id: f.catalog_id.clone(),
                name: item.name.clone(),
                x: f.x,
                z: f.z,
                rot_y: f.rot_y,
                w: item.w,
                h: item.h,
                d: item.d,
            };
            self.put(
                EntityKind::Furniture,
                &f.mesh_id,
                f.footprint(item),
                f.floor,
                EntityData::Furniture(info),
            );
        }
        for tile in design.floor_tiles.values() {
            self.put(
                EntityKind::Floor,
                &tile.id,
                tile.footprint(),
                tile.floor,
                EntityData::Floor(tile.clone()),
            );
        }
        for stair in design.stairs.values() {
            for floor in stair.floors() {
                self.put(
                    EntityKind::Stair,
                    &stair.id,
                    stair.footprint(),
                    floor,
                    EntityData::Stair(stair.clone()),
                );
            }
        }
        for room in src.rooms {
            self.put(
                EntityKind::Room,
                &room.id,
                room.rect(),
                0,
                EntityData::Room(room.clone()),
            );
        }
    }

    fn put(&mut self, kind: EntityKind, id: &str, rect: Rect, floor: i32, data: EntityData) {
        self.hash
            .insert((kind, id.to_owned()), rect_to_bounds(rect), floor, data);
    }

    /// Entities registered in the cell under `(x, z)`, filtered by kind.
    pub fn query_point(&self, x: f64, floor: i32, z: f64, kinds: KindMask) -> Vec<Descriptor> {
        collect(self.hash.query_point(x, floor, z), kinds)
    }

    /// Entities touching any cell of the box, each reported once, filtered by kind.
    pub fn query_box(
        &self,
        x1: f64,
        floor: i32,
        z1: f64,
        x2: f64,
        z2: f64,
        kinds: KindMask,
    ) -> Vec<Descriptor> {
        collect(self.hash.query_box(x1, floor, z1, x2, z2), kinds)
    }

    /// Cell and item counts.
    pub fn stats(&self) -> Stats {
        self.hash.stats()
    }

    /// Number of indexed placements (a stair counts once per floor).
    pub fn len(&self) -> usize {
        self.hash.len()
    }

    /// True if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.hash.is_empty()
    }

    /// The underlying hash.
    pub fn hash(&self) -> &SpatialHash<EntityKey, EntityData> {
        &self.hash
    }
}

fn collect<'a>(
    hits: impl Iterator<Item = (&'a EntityKey, &'a EntityData)>,
    kinds: KindMask,
) -> Vec<Descriptor> {
    hits.filter(|((kind, _), _)| kinds.contains(kind.mask()))
        .map(|((kind, id), data)| Descriptor {
            kind: *kind,
            id: id.clone(),
            data: data.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::furniture::{PlacedFurniture, default_catalog};
    use crate::room::default_rooms;
    use crate::stair::StairDirection;

    fn ids(hits: &[Descriptor]) -> Vec<(EntityKind, &str)> {
        hits.iter().map(|d| (d.kind, d.id.as_str())).collect()
    }

    fn build(design: &Design) -> SceneIndex {
        let catalog = default_catalog();
        let mut idx = SceneIndex::default();
        idx.rebuild(&Sources {
            design,
            rooms: &[],
            catalog: &catalog,
        });
        idx
    }

    #[test]
    fn tile_box_query_tracks_rebuilds() {
        let mut d = Design::default();
        let t = FloorTile::new("ft_1", 0.0, 0.0, 3.0, 3.0, 0).unwrap();
        d.floor_tiles.insert(t.id.clone(), t);
        let idx = build(&d);
        let hits = idx.query_box(0.0, 0, 0.0, 3.0, 3.0, KindMask::all());
        assert_eq!(ids(&hits), [(EntityKind::Floor, "ft_1")]);

        d.floor_tiles.clear();
        let idx = build(&d);
        assert!(idx.query_box(0.0, 0, 0.0, 3.0, 3.0, KindMask::all()).is_empty());
    }

    #[test]
    fn stairs_live_on_both_floors() {
        let mut d = Design::default();
        let s = Stair::new("st_1", 2.0, 2.0, StairDirection::North, 1);
        d.stairs.insert(s.id.clone(), s);
        let idx = build(&d);
        for floor in [1, 2] {
            let hits = idx.query_point(2.5, floor, 3.5, KindMask::STAIR);
            assert_eq!(ids(&hits), [(EntityKind::Stair, "st_1")], "floor {floor}");
        }
        assert!(idx.query_point(2.5, 0, 3.5, KindMask::all()).is_empty());
        assert!(idx.query_point(2.5, 3, 3.5, KindMask::all()).is_empty());
    }

    #[test]
    fn furniture_uses_catalog_size_and_skips_unknown_items() {
        let mut d = Design::default();
        d.furniture
            .push(PlacedFurniture::new("f_1", "sofa", 5.0, 5.0, 0.8, 0));
        d.furniture
            .push(PlacedFurniture::new("f_2", "spaceship", 5.0, 5.0, 0.0, 0));
        let idx = build(&d);
        // Sofa is 2.2 wide: 3.9..6.1 on x.
        let hits = idx.query_point(3.95, 0, 5.0, KindMask::FURNITURE);
        assert_eq!(ids(&hits), [(EntityKind::Furniture, "f_1")]);
        assert_eq!(idx.query_point(6.5, 0, 5.0, KindMask::all()).len(), 1);
        assert_eq!(idx.query_point(7.0, 0, 5.0, KindMask::all()).len(), 0);
        let EntityData::Furniture(info) = &hits[0].data else {
            panic!("expected furniture data");
        };
        assert_eq!(info.name, "Sofa");
    }

    #[test]
    fn rooms_are_ground_floor_and_filterable() {
        let design = Design::default();
        let rooms = default_rooms();
        let catalog = default_catalog();
        let mut idx = SceneIndex::default();
        idx.rebuild(&Sources {
            design: &design,
            rooms: &rooms,
            catalog: &catalog,
        });
        let hits = idx.query_point(1.0, 0, 1.0, KindMask::ROOM);
        assert_eq!(ids(&hits), [(EntityKind::Room, "staircase")]);
        assert!(idx.query_point(1.0, 1, 1.0, KindMask::all()).is_empty());
        assert!(idx.query_point(1.0, 0, 1.0, KindMask::WALL).is_empty());
        assert_eq!(idx.len(), 9);
    }

    #[test]
    fn wall_spanning_many_cells_is_reported_once() {
        let mut d = Design::default();
        let w = WallSegment::horizontal("w_1", 0.5, 0.0, 10.0, 0).unwrap();
        d.walls.insert(w.id.clone(), w);
        let idx = build(&d);
        let hits = idx.query_box(-1.0, 0, -1.0, 11.0, 2.0, KindMask::all());
        assert_eq!(hits.len(), 1);
        let json = serde_json::to_value(&hits[0]).unwrap();
        assert_eq!(json["type"], "wall");
        assert_eq!(json["data"]["x2"], 10.0);
    }
}

// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The editable design: every user-mutable record collection in one place.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::furniture::PlacedFurniture;
use crate::stair::Stair;
use crate::tile::FloorTile;
use crate::wall::WallSegment;

/// Walls, furniture, floor tiles, stairs, and per-room color and material overrides.
///
/// On the wire the keyed collections are plain arrays of records; the map
/// keys are taken from each record's `id`. Furniture keeps its placement
/// order because undo restores instances at their original position.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Design {
    /// Walls by id.
    #[serde(default, with = "by_id")]
    pub walls: BTreeMap<String, WallSegment>,
    /// Furniture in placement order.
    #[serde(default)]
    pub furniture: Vec<PlacedFurniture>,
    /// Floor tiles by id.
    #[serde(default, with = "by_id")]
    pub floor_tiles: BTreeMap<String, FloorTile>,
    /// Stairs by id.
    #[serde(default, with = "by_id")]
    pub stairs: BTreeMap<String, Stair>,
    /// Room id to wall color (`"#rrggbb"`).
    #[serde(default)]
    pub wall_colors: BTreeMap<String, String>,
    /// Room id to floor material, applied to the room's tiles.
    #[serde(default)]
    pub floor_materials: BTreeMap<String, String>,
}

impl Design {
    /// Position of a furniture instance in placement order.
    pub fn furniture_position(&self, mesh_id: &str) -> Option<usize> {
        self.furniture.iter().position(|f| f.mesh_id == mesh_id)
    }

    /// A furniture instance by id.
    pub fn furniture_mut(&mut self, mesh_id: &str) -> Option<&mut PlacedFurniture> {
        self.furniture.iter_mut().find(|f| f.mesh_id == mesh_id)
    }

    /// Whether any collection already uses `id`.
    pub fn contains_id(&self, id: &str) -> bool {
        self.walls.contains_key(id)
            || self.floor_tiles.contains_key(id)
            || self.stairs.contains_key(id)
            || self.furniture_position(id).is_some()
    }

    /// Total record count across the four collections.
    pub fn record_count(&self) -> usize {
        self.walls.len() + self.furniture.len() + self.floor_tiles.len() + self.stairs.len()
    }
}

/// Records that carry their own map key.
pub trait Keyed {
    /// The record's id.
    fn key(&self) -> &str;
}

impl Keyed for WallSegment {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for FloorTile {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Stair {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Serialize an id-keyed map as a list of its values.
mod by_id {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Keyed;

    pub(super) fn serialize<T, S>(map: &BTreeMap<String, T>, s: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        s.collect_seq(map.values())
    }

    pub(super) fn deserialize<'de, T, D>(d: D) -> Result<BTreeMap<String, T>, D::Error>
    where
        T: Deserialize<'de> + Keyed,
        D: Deserializer<'de>,
    {
        let list = Vec::<T>::deserialize(d)?;
        Ok(list.into_iter().map(|r| (r.key().to_owned(), r)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stair::StairDirection;

    fn sample() -> Design {
        let mut d = Design::default();
        let w = WallSegment::horizontal("w_1", 0.0, 0.0, 4.0, 0).unwrap();
        d.walls.insert(w.id.clone(), w);
        let t = FloorTile::new("ft_1", 0.0, 0.0, 2.0, 2.0, 1)
            .unwrap()
            .with_texture("oak");
        d.floor_tiles.insert(t.id.clone(), t);
        let s = Stair::new("st_1", 1.0, 1.0, StairDirection::East, 0);
        d.stairs.insert(s.id.clone(), s);
        d.furniture
            .push(PlacedFurniture::new("f_1", "sofa", 5.0, 5.0, 0.0, 0));
        d.wall_colors.insert("kitchen".into(), "#ffeedd".into());
        d.floor_materials.insert("bathroom".into(), "tile_white".into());
        d
    }

    #[test]
    fn keyed_collections_travel_as_arrays() {
        let v = serde_json::to_value(sample()).unwrap();
        assert!(v["walls"].is_array());
        assert_eq!(v["floorTiles"][0]["texType"], "oak");
        assert_eq!(v["stairs"][0]["toFloor"], 1);
        assert_eq!(v["wallColors"]["kitchen"], "#ffeedd");
        assert_eq!(v["floorMaterials"]["bathroom"], "tile_white");
    }

    #[test]
    fn json_round_trip_is_lossless() {
        let d = sample();
        let text = serde_json::to_string(&d).unwrap();
        let back: Design = serde_json::from_str(&text).unwrap();
        assert_eq!(back, d);
        assert_eq!(back.record_count(), 4);
        assert!(back.contains_id("f_1") && back.contains_id("st_1"));
        assert!(!back.contains_id("nope"));
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let d: Design = serde_json::from_str("{}").unwrap();
        assert_eq!(d, Design::default());
    }
}

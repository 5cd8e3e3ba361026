// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The closed set of scene methods and their parameters.
//!
//! Commands arrive as `{ "method": "...", "params": { ... } }`. Parameter
//! names are camelCase; optional ones default as noted per field.

use floorplan_model::{EntityKind, KindMask, Opening, StairDirection};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::CommandError;

/// Parameters for methods that take none.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct NoParams {}

/// Optional kind filter shared by the spatial queries.
fn kinds_mask(kinds: Option<&[EntityKind]>) -> KindMask {
    kinds.map_or(KindMask::all(), |ks| {
        ks.iter().fold(KindMask::empty(), |m, k| m | k.mask())
    })
}

/// `scene.query_point`
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct QueryPoint {
    /// Plan x.
    pub x: f64,
    /// Floor level, default 0.
    #[serde(default)]
    pub floor: i32,
    /// Plan z.
    pub z: f64,
    /// Keep only these kinds; all kinds when absent.
    #[serde(default)]
    pub kinds: Option<Vec<EntityKind>>,
}

impl QueryPoint {
    /// The kind filter as a mask.
    pub fn mask(&self) -> KindMask {
        kinds_mask(self.kinds.as_deref())
    }
}

/// `scene.query_box`
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct QueryBox {
    /// First corner x.
    pub x1: f64,
    /// Floor level, default 0.
    #[serde(default)]
    pub floor: i32,
    /// First corner z.
    pub z1: f64,
    /// Second corner x.
    pub x2: f64,
    /// Second corner z.
    pub z2: f64,
    /// Keep only these kinds; all kinds when absent.
    #[serde(default)]
    pub kinds: Option<Vec<EntityKind>>,
}

impl QueryBox {
    /// The kind filter as a mask.
    pub fn mask(&self) -> KindMask {
        kinds_mask(self.kinds.as_deref())
    }
}

/// `scene.get_room_at`
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RoomAt {
    /// Plan x.
    pub x: f64,
    /// Plan z.
    pub z: f64,
}

/// Optional floor filter for listings.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct FloorFilter {
    /// Only records on this floor.
    #[serde(default)]
    pub floor: Option<i32>,
}

/// `scene.list_furniture`
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct FurnitureFilter {
    /// Only instances on this floor.
    #[serde(default)]
    pub floor: Option<i32>,
    /// Only instances of items in this catalog category.
    #[serde(default)]
    pub category: Option<String>,
}

/// `scene.get_catalog`
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CatalogFilter {
    /// Only items in this category.
    #[serde(default)]
    pub category: Option<String>,
}

/// `furniture.place`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceFurniture {
    /// Catalog item.
    pub catalog_id: String,
    /// Center x.
    pub x: f64,
    /// Center z.
    pub z: f64,
    /// Yaw, default 0.
    #[serde(default)]
    pub rot_y: f64,
    /// Floor level, default 0.
    #[serde(default)]
    pub floor: i32,
}

/// `furniture.move`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveFurniture {
    /// Instance id.
    pub mesh_id: String,
    /// New center x.
    pub x: f64,
    /// New center z.
    pub z: f64,
}

/// `furniture.rotate`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotateFurniture {
    /// Instance id.
    pub mesh_id: String,
    /// New yaw.
    pub rot_y: f64,
}

/// `furniture.scale`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleFurniture {
    /// Instance id.
    pub mesh_id: String,
    /// Per-axis scale; `null` restores the catalog size.
    pub scale: Option<[f64; 3]>,
}

/// `furniture.set_color`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorFurniture {
    /// Instance id.
    pub mesh_id: String,
    /// Color such as `"#aa8855"`; `null` restores the default.
    pub hex: Option<String>,
}

/// `furniture.remove`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FurnitureRef {
    /// Instance id.
    pub mesh_id: String,
}

/// Wall orientation as written in `wall.add`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
pub enum WallType {
    /// Horizontal: needs `z`, `x1`, `x2`.
    #[serde(rename = "h")]
    Horizontal,
    /// Vertical: needs `x`, `z1`, `z2`.
    #[serde(rename = "v")]
    Vertical,
}

/// `wall.add`
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AddWall {
    /// Orientation.
    #[serde(rename = "type")]
    pub kind: WallType,
    /// Fixed x for vertical walls.
    pub x: Option<f64>,
    /// Fixed z for horizontal walls.
    pub z: Option<f64>,
    /// Horizontal span start.
    pub x1: Option<f64>,
    /// Horizontal span end.
    pub x2: Option<f64>,
    /// Vertical span start.
    pub z1: Option<f64>,
    /// Vertical span end.
    pub z2: Option<f64>,
    /// Floor level, default 0.
    #[serde(default)]
    pub floor: i32,
}

impl AddWall {
    /// `(fixed, start, end)` for the chosen orientation, or the name of the first missing field.
    pub fn coordinates(&self) -> Result<(f64, f64, f64), &'static str> {
        let need = |v: Option<f64>, name: &'static str| v.ok_or(name);
        match self.kind {
            WallType::Horizontal => Ok((
                need(self.z, "z")?,
                need(self.x1, "x1")?,
                need(self.x2, "x2")?,
            )),
            WallType::Vertical => Ok((
                need(self.x, "x")?,
                need(self.z1, "z1")?,
                need(self.z2, "z2")?,
            )),
        }
    }
}

/// `wall.remove`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallRef {
    /// Wall id.
    pub wall_id: String,
}

/// `wall.extend_height`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendHeight {
    /// Wall id.
    pub wall_id: String,
    /// New height in floors, at least 1.
    pub floors: u32,
}

/// `wall.add_opening`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOpening {
    /// Wall id.
    pub wall_id: String,
    /// The opening, inline.
    #[serde(flatten)]
    pub opening: Opening,
}

/// `wall.set_color`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallColor {
    /// Room whose walls are painted.
    pub room_id: String,
    /// Color such as `"#e0d0c0"`.
    pub hex: String,
}

/// `floor.add_tile`: a two-corner drag.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTile {
    /// First corner x.
    pub x1: f64,
    /// First corner z.
    pub z1: f64,
    /// Second corner x.
    pub x2: f64,
    /// Second corner z.
    pub z2: f64,
    /// Floor level, default 0.
    #[serde(default)]
    pub floor: i32,
    /// Material; the default tile material when absent.
    #[serde(default)]
    pub tex_type: Option<String>,
}

/// `floor.remove_tile`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileRef {
    /// Tile id.
    pub tile_id: String,
}

/// `floor.set_texture`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileTexture {
    /// Tile id.
    pub tile_id: String,
    /// New material.
    pub tex_type: String,
}

/// `floor.set_room_material`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomMaterial {
    /// Room whose floor is retextured.
    pub room_id: String,
    /// New material.
    pub tex_type: String,
}

/// `stair.add`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStair {
    /// Anchor x.
    pub x: f64,
    /// Anchor z.
    pub z: f64,
    /// Climb direction, default north.
    #[serde(default = "north")]
    pub direction: StairDirection,
    /// Width, default 1.0.
    #[serde(default = "stair_width")]
    pub width: f64,
    /// Run length, default 3.0.
    #[serde(default = "stair_length")]
    pub length: f64,
    /// Lower floor, default 0.
    #[serde(default, alias = "fromFloor")]
    pub floor: i32,
}

fn north() -> StairDirection {
    StairDirection::North
}

fn stair_width() -> f64 {
    floorplan_model::consts::STAIR_WIDTH
}

fn stair_length() -> f64 {
    floorplan_model::consts::STAIR_LENGTH
}

/// `stair.remove`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StairRef {
    /// Stair id.
    pub stair_id: String,
}

/// One scene method with its parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum Command {
    /// Counts and plan extent.
    #[serde(rename = "scene.info")]
    Info(NoParams),
    /// Rebuild the index and return the cell under a point.
    #[serde(rename = "scene.query_point")]
    QueryPoint(QueryPoint),
    /// Rebuild the index and return everything touching a box.
    #[serde(rename = "scene.query_box")]
    QueryBox(QueryBox),
    /// First room containing a point, or `null`.
    #[serde(rename = "scene.get_room_at")]
    GetRoomAt(RoomAt),
    /// All rooms.
    #[serde(rename = "scene.list_rooms")]
    ListRooms(NoParams),
    /// Placed furniture.
    #[serde(rename = "scene.list_furniture")]
    ListFurniture(FurnitureFilter),
    /// Wall records.
    #[serde(rename = "scene.list_walls")]
    ListWalls(FloorFilter),
    /// Floor tile records.
    #[serde(rename = "scene.list_floor_tiles")]
    ListFloorTiles(FloorFilter),
    /// Stair records.
    #[serde(rename = "scene.list_stairs")]
    ListStairs(FloorFilter),
    /// Catalog items.
    #[serde(rename = "scene.get_catalog")]
    GetCatalog(CatalogFilter),
    /// Place a catalog item.
    #[serde(rename = "furniture.place")]
    PlaceFurniture(PlaceFurniture),
    /// Move an instance.
    #[serde(rename = "furniture.move")]
    MoveFurniture(MoveFurniture),
    /// Rotate an instance.
    #[serde(rename = "furniture.rotate")]
    RotateFurniture(RotateFurniture),
    /// Scale an instance.
    #[serde(rename = "furniture.scale")]
    ScaleFurniture(ScaleFurniture),
    /// Recolor an instance.
    #[serde(rename = "furniture.set_color")]
    ColorFurniture(ColorFurniture),
    /// Delete an instance.
    #[serde(rename = "furniture.remove")]
    RemoveFurniture(FurnitureRef),
    /// Create a wall.
    #[serde(rename = "wall.add")]
    AddWall(AddWall),
    /// Delete a wall.
    #[serde(rename = "wall.remove")]
    RemoveWall(WallRef),
    /// Change how many floors a wall spans.
    #[serde(rename = "wall.extend_height")]
    ExtendWallHeight(ExtendHeight),
    /// Cut a door or window.
    #[serde(rename = "wall.add_opening")]
    AddOpening(AddOpening),
    /// Paint a room's walls.
    #[serde(rename = "wall.set_color")]
    SetWallColor(WallColor),
    /// Create a floor tile.
    #[serde(rename = "floor.add_tile")]
    AddTile(AddTile),
    /// Delete a floor tile.
    #[serde(rename = "floor.remove_tile")]
    RemoveTile(TileRef),
    /// Change a tile's material.
    #[serde(rename = "floor.set_texture")]
    SetTexture(TileTexture),
    /// Set a room's floor material and retexture its tiles.
    #[serde(rename = "floor.set_room_material")]
    SetRoomMaterial(RoomMaterial),
    /// Create a stair.
    #[serde(rename = "stair.add")]
    AddStair(AddStair),
    /// Delete a stair.
    #[serde(rename = "stair.remove")]
    RemoveStair(StairRef),
    /// Revert the last edit.
    #[serde(rename = "history.undo")]
    Undo(NoParams),
    /// Reapply the last reverted edit.
    #[serde(rename = "history.redo")]
    Redo(NoParams),
    /// Replace the design with the seeded apartment.
    #[serde(rename = "scene.reset")]
    Reset(NoParams),
}

impl Command {
    /// Every method name, in table order.
    pub const METHODS: &'static [&'static str] = &[
        "scene.info",
        "scene.query_point",
        "scene.query_box",
        "scene.get_room_at",
        "scene.list_rooms",
        "scene.list_furniture",
        "scene.list_walls",
        "scene.list_floor_tiles",
        "scene.list_stairs",
        "scene.get_catalog",
        "furniture.place",
        "furniture.move",
        "furniture.rotate",
        "furniture.scale",
        "furniture.set_color",
        "furniture.remove",
        "wall.add",
        "wall.remove",
        "wall.extend_height",
        "wall.add_opening",
        "wall.set_color",
        "floor.add_tile",
        "floor.remove_tile",
        "floor.set_texture",
        "floor.set_room_material",
        "stair.add",
        "stair.remove",
        "history.undo",
        "history.redo",
        "scene.reset",
    ];

    /// Parse a method name and parameter object.
    ///
    /// Unknown names are reported before parameters are looked at. A `null`
    /// parameter value is treated as `{}`.
    pub fn parse(method: &str, params: Value) -> Result<Self, CommandError> {
        if !Self::METHODS.contains(&method) {
            return Err(CommandError::UnknownMethod(method.to_owned()));
        }
        let params = if params.is_null() { json!({}) } else { params };
        serde_json::from_value(json!({ "method": method, "params": params })).map_err(|e| {
            CommandError::InvalidParams {
                method: method.to_owned(),
                reason: e.to_string(),
            }
        })
    }

    /// Whether the command may change the design.
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Self::Info(_)
                | Self::QueryPoint(_)
                | Self::QueryBox(_)
                | Self::GetRoomAt(_)
                | Self::ListRooms(_)
                | Self::ListFurniture(_)
                | Self::ListWalls(_)
                | Self::ListFloorTiles(_)
                | Self::ListStairs(_)
                | Self::GetCatalog(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_methods_with_defaults() {
        let cmd = Command::parse(
            "furniture.place",
            json!({ "catalogId": "sofa", "x": 5.0, "z": 5.0 }),
        )
        .unwrap();
        let Command::PlaceFurniture(p) = cmd else {
            panic!("wrong variant");
        };
        assert_eq!((p.rot_y, p.floor), (0.0, 0));

        assert_eq!(
            Command::parse("scene.info", Value::Null).unwrap(),
            Command::Info(NoParams {})
        );
        assert!(matches!(
            Command::parse("history.undo", json!({})).unwrap(),
            Command::Undo(_)
        ));
        assert!(!Command::Info(NoParams {}).is_mutation());
        assert!(Command::Redo(NoParams {}).is_mutation());
        assert!(Command::Reset(NoParams {}).is_mutation());
        assert_eq!(Command::METHODS.len(), 30);
    }

    #[test]
    fn unknown_method_wins_over_bad_params() {
        let err = Command::parse("scene.set_sun", json!({ "t": 1 })).unwrap_err();
        assert_eq!(err.to_string(), "Unknown method: scene.set_sun");
    }

    #[test]
    fn bad_params_name_the_method() {
        let err = Command::parse("furniture.move", json!({ "meshId": "m1" })).unwrap_err();
        assert!(matches!(err, CommandError::InvalidParams { ref method, .. } if method == "furniture.move"));
    }

    #[test]
    fn every_listed_method_parses_with_minimal_params() {
        let minimal = |m: &str| match m {
            "scene.query_point" | "scene.get_room_at" => json!({ "x": 0, "z": 0 }),
            "scene.query_box" => json!({ "x1": 0, "z1": 0, "x2": 1, "z2": 1 }),
            "furniture.place" => json!({ "catalogId": "sofa", "x": 0, "z": 0 }),
            "furniture.move" => json!({ "meshId": "m", "x": 0, "z": 0 }),
            "furniture.rotate" => json!({ "meshId": "m", "rotY": 1 }),
            "furniture.scale" => json!({ "meshId": "m", "scale": [1, 2, 1] }),
            "furniture.set_color" => json!({ "meshId": "m", "hex": "#fff" }),
            "furniture.remove" => json!({ "meshId": "m" }),
            "wall.add" => json!({ "type": "h", "z": 0, "x1": 0, "x2": 1 }),
            "wall.remove" => json!({ "wallId": "w" }),
            "wall.extend_height" => json!({ "wallId": "w", "floors": 2 }),
            "wall.add_opening" => {
                json!({ "wallId": "w", "kind": "door", "position": 1, "width": 1, "height": 2 })
            }
            "wall.set_color" => json!({ "roomId": "r", "hex": "#fff" }),
            "floor.add_tile" => json!({ "x1": 0, "z1": 0, "x2": 1, "z2": 1 }),
            "floor.remove_tile" => json!({ "tileId": "t" }),
            "floor.set_texture" => json!({ "tileId": "t", "texType": "oak" }),
            "floor.set_room_material" => json!({ "roomId": "r", "texType": "oak" }),
            "stair.add" => json!({ "x": 0, "z": 0 }),
            "stair.remove" => json!({ "stairId": "s" }),
            _ => Value::Null,
        };
        for &m in Command::METHODS {
            assert!(Command::parse(m, minimal(m)).is_ok(), "{m}");
        }
    }

    #[test]
    fn add_wall_reports_missing_coordinates() {
        let Command::AddWall(w) =
            Command::parse("wall.add", json!({ "type": "v", "x": 1, "z1": 0 })).unwrap()
        else {
            panic!("wrong variant");
        };
        assert_eq!(w.coordinates(), Err("z2"));
    }

    #[test]
    fn kind_filter_builds_mask() {
        let Command::QueryPoint(q) = Command::parse(
            "scene.query_point",
            json!({ "x": 0, "z": 0, "kinds": ["wall", "stair"] }),
        )
        .unwrap() else {
            panic!("wrong variant");
        };
        assert_eq!(q.mask(), KindMask::WALL | KindMask::STAIR);
    }
}

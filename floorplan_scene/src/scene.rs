// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene: records, index, history, and autosave behind one dispatch call.

use std::collections::BTreeMap;
use std::time::Instant;

use floorplan_history::{Entry, History};
use floorplan_model::{
    Catalog, Descriptor, FloorTile, JunctionFiller, Keyed, KindMask, OpeningKind, PlacedFurniture,
    RecordError, Room, SceneIndex, Sources, Stair, WallSegment, default_catalog, default_rooms,
    room_at, seed_floor_tiles, seed_walls, tiles_in_room, walls_in_room,
};
use kurbo::Rect;
use serde_json::{Value, json};

use crate::autosave::Autosave;
use crate::command::{
    AddOpening, AddStair, AddTile, AddWall, CatalogFilter, ColorFurniture, Command, ExtendHeight,
    FloorFilter, FurnitureFilter, FurnitureRef, MoveFurniture, PlaceFurniture, RoomMaterial,
    RotateFurniture, ScaleFurniture, StairRef, TileRef, TileTexture, WallColor, WallRef, WallType,
};
use crate::config::SceneConfig;
use crate::error::CommandError;
use crate::observer::{SaveSink, SceneObserver, Snapshot};
use crate::workspace::Workspace;

type CommandResult = Result<Value, CommandError>;

fn to_value<T: serde::Serialize>(v: &T) -> Value {
    // Records have string keys only, so serialization cannot fail.
    serde_json::to_value(v).unwrap_or(Value::Null)
}

fn room_json(r: &Room) -> Value {
    json!({ "id": r.id, "name": r.name, "x": r.x, "z": r.z, "w": r.w, "d": r.d })
}

/// An editable multi-floor design.
///
/// `Scene` is the single writer: every mutation goes through [`exec`](Self::exec)
/// (or one of the bulk loads) with `&mut self`, so records, index, and history
/// always change together. A host that adds threads should wrap the whole
/// scene in one lock.
///
/// Time is passed in explicitly through the `_at` variants so that the
/// debounced autosave can be driven by any clock.
pub struct Scene {
    config: SceneConfig,
    workspace: Workspace,
    index: SceneIndex,
    history: History<Workspace>,
    autosave: Autosave,
    sink: Box<dyn SaveSink>,
    rooms: Vec<Room>,
    catalog: Catalog,
    next_id: u64,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scene")
            .field("config", &self.config)
            .field("workspace", &self.workspace)
            .field("index", &self.index)
            .field("history", &self.history)
            .field("autosave", &self.autosave)
            .field("rooms", &self.rooms.len())
            .field("catalog", &self.catalog.len())
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

impl Scene {
    /// An empty design with the built-in rooms and catalog and a sink that discards saves.
    ///
    /// Unusable config values are replaced with defaults first, see
    /// [`SceneConfig::normalized`].
    pub fn new(config: SceneConfig) -> Self {
        let config = config.normalized();
        Self {
            index: SceneIndex::new(config.cell_size),
            history: History::with_capacity(config.history_capacity),
            autosave: Autosave::new(config.autosave_debounce()),
            workspace: Workspace::default(),
            sink: Box::new(|_: &Snapshot| {}),
            rooms: default_rooms(),
            catalog: default_catalog(),
            next_id: 0,
            config,
        }
    }

    /// Send autosaves to `sink`.
    pub fn with_sink(mut self, sink: impl SaveSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Report visual side effects to `observer`.
    pub fn with_observer(mut self, observer: impl SceneObserver + 'static) -> Self {
        self.workspace.set_observer(Box::new(observer));
        self
    }

    /// Replace the static room list.
    pub fn with_rooms(mut self, rooms: Vec<Room>) -> Self {
        self.rooms = rooms;
        self
    }

    /// Replace the furniture catalog.
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Current records.
    pub fn design(&self) -> &Snapshot {
        self.workspace.design()
    }

    /// Current junction fillers.
    pub fn junctions(&self) -> &[JunctionFiller] {
        self.workspace.junctions()
    }

    /// Static rooms.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Furniture catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Undo/redo stacks.
    pub fn history(&self) -> &History<Workspace> {
        &self.history
    }

    /// Autosave timer state.
    pub fn autosave(&self) -> &Autosave {
        &self.autosave
    }

    /// The index as of the last rebuild.
    pub fn index(&self) -> &SceneIndex {
        &self.index
    }

    /// A copy of everything that gets persisted.
    pub fn snapshot(&self) -> Snapshot {
        self.workspace.design().clone()
    }

    // ── Dispatch ──

    /// Run a method by name, using the current time for autosave.
    pub fn exec(&mut self, method: &str, params: Value) -> CommandResult {
        self.exec_at(method, params, Instant::now())
    }

    /// Run a method by name at time `now`.
    ///
    /// Never panics on bad input: unknown methods, malformed parameters, and
    /// missing ids all come back as a [`CommandError`] with no state changed.
    pub fn exec_at(&mut self, method: &str, params: Value, now: Instant) -> CommandResult {
        let result = Command::parse(method, params).and_then(|cmd| self.apply(cmd, now));
        if let Err(err) = &result {
            log::warn!("{method} rejected: {err}");
        }
        result
    }

    /// Like [`exec`](Self::exec), but folds errors into the `{ "error": ... }` payload.
    pub fn exec_payload(&mut self, method: &str, params: Value) -> Value {
        self.exec(method, params)
            .unwrap_or_else(|err| err.to_payload())
    }

    /// Run an already parsed command.
    pub fn apply(&mut self, cmd: Command, now: Instant) -> CommandResult {
        log::debug!("apply {cmd:?}");
        match cmd {
            Command::Info(_) => Ok(self.info()),
            Command::QueryPoint(q) => Ok(to_value(&self.query_point(q.x, q.floor, q.z, q.mask()))),
            Command::QueryBox(q) => Ok(to_value(
                &self.query_box(q.x1, q.floor, q.z1, q.x2, q.z2, q.mask()),
            )),
            Command::GetRoomAt(p) => Ok(room_at(&self.rooms, p.x, p.z).map_or(Value::Null, room_json)),
            Command::ListRooms(_) => Ok(self.rooms.iter().map(room_json).collect()),
            Command::ListFurniture(f) => Ok(self.list_furniture(&f)),
            Command::ListWalls(FloorFilter { floor }) => Ok(self
                .design()
                .walls
                .values()
                .filter(|w| floor.is_none_or(|fl| w.floor == fl))
                .map(to_value)
                .collect()),
            Command::ListFloorTiles(FloorFilter { floor }) => Ok(self
                .design()
                .floor_tiles
                .values()
                .filter(|t| floor.is_none_or(|fl| t.floor == fl))
                .map(to_value)
                .collect()),
            Command::ListStairs(FloorFilter { floor }) => Ok(self
                .design()
                .stairs
                .values()
                .filter(|s| floor.is_none_or(|fl| s.floors().contains(&fl)))
                .map(to_value)
                .collect()),
            Command::GetCatalog(CatalogFilter { category }) => Ok(self
                .catalog
                .filter(category.as_deref())
                .map(to_value)
                .collect()),
            Command::PlaceFurniture(p) => self.place_furniture(p, now),
            Command::MoveFurniture(p) => self.move_furniture(p, now),
            Command::RotateFurniture(p) => self.rotate_furniture(p, now),
            Command::ScaleFurniture(p) => self.scale_furniture(p, now),
            Command::ColorFurniture(p) => self.color_furniture(p, now),
            Command::RemoveFurniture(p) => self.remove_furniture(p, now),
            Command::AddWall(p) => self.add_wall(p, now),
            Command::RemoveWall(p) => self.remove_wall(p, now),
            Command::ExtendWallHeight(p) => self.extend_wall_height(p, now),
            Command::AddOpening(p) => self.add_opening(p, now),
            Command::SetWallColor(p) => self.set_wall_color(p, now),
            Command::AddTile(p) => self.add_tile(p, now),
            Command::RemoveTile(p) => self.remove_tile(p, now),
            Command::SetTexture(p) => self.set_texture(p, now),
            Command::SetRoomMaterial(p) => self.set_room_material(p, now),
            Command::AddStair(p) => self.add_stair(p, now),
            Command::RemoveStair(p) => self.remove_stair(p, now),
            Command::Undo(_) => Ok(json!({ "ok": true, "label": self.undo_at(now) })),
            Command::Redo(_) => Ok(json!({ "ok": true, "label": self.redo_at(now) })),
            Command::Reset(_) => {
                let records = self.reset_to_seed();
                Ok(json!({ "ok": true, "recordCount": records }))
            }
        }
    }

    /// Record an applied edit and restart the autosave window.
    fn commit(&mut self, entry: Entry<Workspace>, now: Instant) {
        log::debug!("commit {:?}", entry.label());
        self.history.push(entry);
        self.autosave.schedule(now);
    }

    fn fresh_id(&mut self, prefix: &str) -> String {
        loop {
            self.next_id += 1;
            let id = format!("{prefix}_{}", self.next_id);
            if !self.workspace.design().contains_id(&id) {
                return id;
            }
        }
    }

    // ── Undo / redo ──

    /// Revert the last edit. Returns its label, or `None` if there was nothing to undo.
    pub fn undo_at(&mut self, now: Instant) -> Option<String> {
        let label = self.history.undo(&mut self.workspace).map(str::to_owned);
        if label.is_some() {
            self.autosave.schedule(now);
        }
        label
    }

    /// Reapply the last reverted edit. Returns its label, or `None` if there was nothing to redo.
    pub fn redo_at(&mut self, now: Instant) -> Option<String> {
        let label = self.history.redo(&mut self.workspace).map(str::to_owned);
        if label.is_some() {
            self.autosave.schedule(now);
        }
        label
    }

    // ── Autosave ──

    /// Run the pending save if its quiet period has elapsed. Returns whether a save ran.
    pub fn poll_autosave(&mut self, now: Instant) -> bool {
        if !self.autosave.take_due(now) {
            return false;
        }
        self.save();
        true
    }

    /// Run the pending save immediately, if there is one.
    pub fn flush_autosave(&mut self) -> bool {
        if !self.autosave.take_pending() {
            return false;
        }
        self.save();
        true
    }

    fn save(&mut self) {
        let design = self.workspace.design();
        log::info!(
            "autosave #{}: {} walls, {} furniture, {} tiles, {} stairs",
            self.autosave.save_count(),
            design.walls.len(),
            design.furniture.len(),
            design.floor_tiles.len(),
            design.stairs.len(),
        );
        self.sink.save(design);
    }

    // ── Index ──

    /// Rebuild the spatial index from the current records.
    pub fn rebuild_index(&mut self) {
        self.index.rebuild(&Sources {
            design: self.workspace.design(),
            rooms: &self.rooms,
            catalog: &self.catalog,
        });
        log::trace!("index rebuilt: {:?}", self.index.stats());
    }

    /// Rebuild, then return the entities in the cell under `(x, z)`.
    pub fn query_point(&mut self, x: f64, floor: i32, z: f64, kinds: KindMask) -> Vec<Descriptor> {
        self.rebuild_index();
        self.index.query_point(x, floor, z, kinds)
    }

    /// Rebuild, then return every entity touching the box, each once.
    pub fn query_box(
        &mut self,
        x1: f64,
        floor: i32,
        z1: f64,
        x2: f64,
        z2: f64,
        kinds: KindMask,
    ) -> Vec<Descriptor> {
        self.rebuild_index();
        self.index.query_box(x1, floor, z1, x2, z2, kinds)
    }

    // ── Reads ──

    fn info(&self) -> Value {
        let design = self.design();
        let rects = self
            .rooms
            .iter()
            .map(Room::rect)
            .chain(design.walls.values().map(WallSegment::footprint))
            .chain(design.floor_tiles.values().map(FloorTile::footprint))
            .chain(design.stairs.values().map(Stair::footprint))
            .chain(design.furniture.iter().filter_map(|f| {
                self.catalog.get(&f.catalog_id).map(|item| f.footprint(item))
            }));
        let bounds = rects.reduce(|a, b| a.union(b)).unwrap_or(Rect::ZERO);
        json!({
            "roomCount": self.rooms.len(),
            "wallCount": design.walls.len(),
            "furnitureCount": design.furniture.len(),
            "floorTileCount": design.floor_tiles.len(),
            "stairCount": design.stairs.len(),
            "junctionCount": self.junctions().len(),
            "bounds": { "xMin": bounds.x0, "zMin": bounds.y0, "xMax": bounds.x1, "zMax": bounds.y1 },
            "canUndo": self.history.can_undo(),
            "canRedo": self.history.can_redo(),
        })
    }

    fn list_furniture(&self, filter: &FurnitureFilter) -> Value {
        self.design()
            .furniture
            .iter()
            .filter(|f| filter.floor.is_none_or(|fl| f.floor == fl))
            .filter_map(|f| {
                let item = self.catalog.get(&f.catalog_id);
                if let Some(cat) = &filter.category {
                    if item.is_none_or(|i| &i.category != cat) {
                        return None;
                    }
                }
                Some(json!({
                    "meshId": f.mesh_id,
                    "catalogId": f.catalog_id,
                    "name": item.map(|i| &i.name),
                    "category": item.map(|i| &i.category),
                    "x": f.x,
                    "y": f.y,
                    "z": f.z,
                    "rotY": f.rot_y,
                    "floor": f.floor,
                    "w": item.map(|i| i.w),
                    "h": item.map(|i| i.h),
                    "d": item.map(|i| i.d),
                    "customScale": f.custom_scale,
                    "customColor": f.custom_color,
                }))
            })
            .collect()
    }

    // ── Furniture ──

    fn item_name(&self, catalog_id: &str) -> String {
        self.catalog
            .get(catalog_id)
            .map_or_else(|| "furniture".to_owned(), |i| i.name.clone())
    }

    fn place_furniture(&mut self, p: PlaceFurniture, now: Instant) -> CommandResult {
        let name = self
            .catalog
            .get(&p.catalog_id)
            .map(|i| i.name.clone())
            .ok_or_else(|| CommandError::UnknownCatalogItem(p.catalog_id.clone()))?;
        let mut item = PlacedFurniture::new("", &*p.catalog_id, p.x, p.z, p.rot_y, p.floor);
        item.validate()?;
        let mesh_id = self.fresh_id("f");
        item.mesh_id = mesh_id.clone();
        let at = self.design().furniture.len();
        self.workspace.put_furniture(at, item.clone());

        let id = mesh_id.clone();
        self.commit(
            Entry::new(
                format!("Place {name}"),
                move |ws: &mut Workspace| {
                    ws.take_furniture(&id);
                },
                move |ws: &mut Workspace| ws.put_furniture(at, item.clone()),
            ),
            now,
        );
        Ok(json!({
            "ok": true, "meshId": mesh_id, "catalogId": p.catalog_id,
            "x": p.x, "z": p.z, "rotY": p.rot_y, "floor": p.floor,
        }))
    }

    /// Apply `edit` to one instance and record the before/after pair.
    fn edit_furniture(
        &mut self,
        mesh_id: &str,
        verb: &str,
        now: Instant,
        edit: impl FnOnce(&mut PlacedFurniture),
    ) -> Result<PlacedFurniture, CommandError> {
        let at = self
            .design()
            .furniture_position(mesh_id)
            .ok_or_else(|| CommandError::FurnitureNotFound(mesh_id.to_owned()))?;
        let before = self.design().furniture[at].clone();
        let mut after = before.clone();
        edit(&mut after);
        after.validate()?;
        self.workspace.replace_furniture(after.clone());

        let label = format!("{verb} {}", self.item_name(&before.catalog_id));
        let redo = after.clone();
        self.commit(
            Entry::new(
                label,
                move |ws: &mut Workspace| ws.replace_furniture(before.clone()),
                move |ws: &mut Workspace| ws.replace_furniture(redo.clone()),
            ),
            now,
        );
        Ok(after)
    }

    fn move_furniture(&mut self, p: MoveFurniture, now: Instant) -> CommandResult {
        let (x, z) = (p.x, p.z);
        self.edit_furniture(&p.mesh_id, "Move", now, |f| {
            f.x = x;
            f.z = z;
        })?;
        Ok(json!({ "ok": true, "meshId": p.mesh_id, "x": x, "z": z }))
    }

    fn rotate_furniture(&mut self, p: RotateFurniture, now: Instant) -> CommandResult {
        let rot_y = p.rot_y;
        self.edit_furniture(&p.mesh_id, "Rotate", now, |f| f.rot_y = rot_y)?;
        Ok(json!({ "ok": true, "meshId": p.mesh_id, "rotY": rot_y }))
    }

    fn scale_furniture(&mut self, p: ScaleFurniture, now: Instant) -> CommandResult {
        let scale = p.scale;
        self.edit_furniture(&p.mesh_id, "Scale", now, |f| f.custom_scale = scale)?;
        Ok(json!({ "ok": true, "meshId": p.mesh_id, "scale": scale }))
    }

    fn color_furniture(&mut self, p: ColorFurniture, now: Instant) -> CommandResult {
        let hex = p.hex.clone();
        self.edit_furniture(&p.mesh_id, "Recolor", now, |f| f.custom_color = hex)?;
        Ok(json!({ "ok": true, "meshId": p.mesh_id, "hex": p.hex }))
    }

    fn remove_furniture(&mut self, p: FurnitureRef, now: Instant) -> CommandResult {
        let (at, item) = self
            .workspace
            .take_furniture(&p.mesh_id)
            .ok_or_else(|| CommandError::FurnitureNotFound(p.mesh_id.clone()))?;
        let result = json!({
            "ok": true, "meshId": item.mesh_id, "catalogId": item.catalog_id,
            "x": item.x, "z": item.z,
        });
        let label = format!("Remove {}", self.item_name(&item.catalog_id));
        let id = p.mesh_id;
        self.commit(
            Entry::new(
                label,
                move |ws: &mut Workspace| ws.put_furniture(at, item.clone()),
                move |ws: &mut Workspace| {
                    ws.take_furniture(&id);
                },
            ),
            now,
        );
        Ok(result)
    }

    // ── Walls ──

    fn add_wall(&mut self, p: AddWall, now: Instant) -> CommandResult {
        let (fixed, a, b) = p.coordinates().map_err(|field| CommandError::InvalidParams {
            method: "wall.add".into(),
            reason: format!("missing field `{field}`"),
        })?;
        let mut wall = match p.kind {
            WallType::Horizontal => WallSegment::horizontal("", fixed, a, b, p.floor)?,
            WallType::Vertical => WallSegment::vertical("", fixed, a, b, p.floor)?,
        };
        let id = self.fresh_id("w");
        wall.id = id.clone();
        self.workspace.put_wall(wall.clone());

        let key = id.clone();
        self.commit(
            Entry::new(
                "Add wall",
                move |ws: &mut Workspace| {
                    ws.take_wall(&key);
                },
                move |ws: &mut Workspace| ws.put_wall(wall.clone()),
            ),
            now,
        );
        Ok(json!({ "ok": true, "wallId": id }))
    }

    fn remove_wall(&mut self, p: WallRef, now: Instant) -> CommandResult {
        let wall = self
            .workspace
            .take_wall(&p.wall_id)
            .ok_or_else(|| CommandError::WallNotFound(p.wall_id.clone()))?;
        let key = p.wall_id.clone();
        self.commit(
            Entry::new(
                "Remove wall",
                move |ws: &mut Workspace| ws.put_wall(wall.clone()),
                move |ws: &mut Workspace| {
                    ws.take_wall(&key);
                },
            ),
            now,
        );
        Ok(json!({ "ok": true, "wallId": p.wall_id }))
    }

    fn edit_wall(
        &mut self,
        wall_id: &str,
        label: &str,
        now: Instant,
        edit: impl FnOnce(&mut WallSegment) -> Result<(), RecordError>,
    ) -> Result<WallSegment, CommandError> {
        let before = self
            .design()
            .walls
            .get(wall_id)
            .cloned()
            .ok_or_else(|| CommandError::WallNotFound(wall_id.to_owned()))?;
        let mut after = before.clone();
        edit(&mut after)?;
        self.workspace.replace_wall(after.clone());

        let redo = after.clone();
        self.commit(
            Entry::new(
                label,
                move |ws: &mut Workspace| ws.replace_wall(before.clone()),
                move |ws: &mut Workspace| ws.replace_wall(redo.clone()),
            ),
            now,
        );
        Ok(after)
    }

    fn extend_wall_height(&mut self, p: ExtendHeight, now: Instant) -> CommandResult {
        let floors = p.floors;
        let wall = self.edit_wall(&p.wall_id, "Extend wall height", now, |w| {
            w.extend_height(floors)
        })?;
        Ok(json!({ "ok": true, "wallId": wall.id, "heightFloors": wall.height_floors }))
    }

    fn add_opening(&mut self, p: AddOpening, now: Instant) -> CommandResult {
        let label = match p.opening.kind {
            OpeningKind::Door => "Add door",
            OpeningKind::Window => "Add window",
        };
        let opening = p.opening;
        let wall = self.edit_wall(&p.wall_id, label, now, |w| w.add_opening(opening))?;
        Ok(json!({ "ok": true, "wallId": wall.id, "openings": wall.openings }))
    }

    fn set_wall_color(&mut self, p: WallColor, now: Instant) -> CommandResult {
        let Some(room) = self.rooms.iter().find(|r| r.id == p.room_id) else {
            // Unknown rooms match no walls; that is a valid, empty result.
            return Ok(json!({ "ok": true, "roomId": p.room_id, "hex": p.hex, "walls": [] }));
        };
        let walls: Vec<String> = walls_in_room(
            self.workspace.design().walls.values(),
            room,
            self.config.wall_room_tolerance,
        )
        .into_iter()
        .map(str::to_owned)
        .collect();
        let old = self.design().wall_colors.get(&p.room_id).cloned();
        self.workspace
            .set_wall_color(&p.room_id, Some(p.hex.as_str()), &walls);

        let result = json!({ "ok": true, "roomId": p.room_id, "hex": p.hex, "walls": walls });
        let (room_id, hex) = (p.room_id, p.hex);
        let label = format!("Wall color {room_id}");
        let undo_walls = walls.clone();
        let undo_room = room_id.clone();
        self.commit(
            Entry::new(
                label,
                move |ws: &mut Workspace| {
                    ws.set_wall_color(&undo_room, old.as_deref(), &undo_walls);
                },
                move |ws: &mut Workspace| ws.set_wall_color(&room_id, Some(hex.as_str()), &walls),
            ),
            now,
        );
        Ok(result)
    }

    // ── Floor tiles ──

    fn add_tile(&mut self, p: AddTile, now: Instant) -> CommandResult {
        let mut tile = FloorTile::from_corners("", (p.x1, p.z1), (p.x2, p.z2), p.floor)?;
        let id = self.fresh_id("ft");
        tile.id = id.clone();
        if let Some(tex) = p.tex_type {
            tile = tile.with_texture(tex);
        }
        let result = json!({
            "ok": true, "tileId": id, "x": tile.x, "z": tile.z, "w": tile.w, "d": tile.d,
            "floor": tile.floor, "texType": tile.tex_type,
        });
        self.workspace.put_tile(tile.clone());
        self.commit(
            Entry::new(
                "Place floor tile",
                move |ws: &mut Workspace| {
                    ws.take_tile(&id);
                },
                move |ws: &mut Workspace| ws.put_tile(tile.clone()),
            ),
            now,
        );
        Ok(result)
    }

    fn remove_tile(&mut self, p: TileRef, now: Instant) -> CommandResult {
        let tile = self
            .workspace
            .take_tile(&p.tile_id)
            .ok_or_else(|| CommandError::TileNotFound(p.tile_id.clone()))?;
        let key = p.tile_id.clone();
        self.commit(
            Entry::new(
                "Remove floor tile",
                move |ws: &mut Workspace| ws.put_tile(tile.clone()),
                move |ws: &mut Workspace| {
                    ws.take_tile(&key);
                },
            ),
            now,
        );
        Ok(json!({ "ok": true, "tileId": p.tile_id }))
    }

    fn set_texture(&mut self, p: TileTexture, now: Instant) -> CommandResult {
        let result = json!({ "ok": true, "tileId": p.tile_id, "texType": p.tex_type });
        let Some(before) = self.design().floor_tiles.get(&p.tile_id).cloned() else {
            return Ok(result);
        };
        if before.tex_type == p.tex_type {
            return Ok(result);
        }
        let after = before.clone().with_texture(p.tex_type);
        self.workspace.replace_tile(after.clone());
        self.commit(
            Entry::new(
                "Floor texture",
                move |ws: &mut Workspace| ws.replace_tile(before.clone()),
                move |ws: &mut Workspace| ws.replace_tile(after.clone()),
            ),
            now,
        );
        Ok(result)
    }

    fn set_room_material(&mut self, p: RoomMaterial, now: Instant) -> CommandResult {
        let Some(room) = self.rooms.iter().find(|r| r.id == p.room_id) else {
            return Ok(json!({
                "ok": true, "roomId": p.room_id, "texType": p.tex_type, "tiles": [],
            }));
        };
        let before: Vec<FloorTile> = tiles_in_room(
            self.workspace.design().floor_tiles.values(),
            room,
            self.config.wall_room_tolerance,
        )
        .into_iter()
        .cloned()
        .collect();
        let tiles: Vec<&str> = before.iter().map(|t| t.id.as_str()).collect();
        let result =
            json!({ "ok": true, "roomId": p.room_id, "texType": p.tex_type, "tiles": tiles });
        let old = self.design().floor_materials.get(&p.room_id).cloned();
        if old.as_deref() == Some(p.tex_type.as_str())
            && before.iter().all(|t| t.tex_type == p.tex_type)
        {
            return Ok(result);
        }
        let after: Vec<FloorTile> = before
            .iter()
            .map(|t| t.clone().with_texture(p.tex_type.as_str()))
            .collect();
        let (room_id, tex) = (p.room_id, p.tex_type);
        self.workspace.set_floor_material(&room_id, Some(tex.as_str()));
        for tile in &after {
            self.workspace.replace_tile(tile.clone());
        }

        let label = format!("Floor material {room_id}");
        let undo_room = room_id.clone();
        self.commit(
            Entry::new(
                label,
                move |ws: &mut Workspace| {
                    ws.set_floor_material(&undo_room, old.as_deref());
                    for tile in &before {
                        ws.replace_tile(tile.clone());
                    }
                },
                move |ws: &mut Workspace| {
                    ws.set_floor_material(&room_id, Some(tex.as_str()));
                    for tile in &after {
                        ws.replace_tile(tile.clone());
                    }
                },
            ),
            now,
        );
        Ok(result)
    }

    // ── Stairs ──

    fn add_stair(&mut self, p: AddStair, now: Instant) -> CommandResult {
        let mut stair = Stair::from_gesture("", p.x, p.z, p.direction, p.width, p.length, p.floor)?;
        let id = self.fresh_id("st");
        stair.id = id.clone();
        let result = json!({
            "ok": true, "stairId": id, "direction": stair.direction,
            "fromFloor": stair.from_floor, "toFloor": stair.to_floor,
        });
        self.workspace.put_stair(stair.clone());
        self.commit(
            Entry::new(
                "Place stairs",
                move |ws: &mut Workspace| {
                    ws.take_stair(&id);
                },
                move |ws: &mut Workspace| ws.put_stair(stair.clone()),
            ),
            now,
        );
        Ok(result)
    }

    fn remove_stair(&mut self, p: StairRef, now: Instant) -> CommandResult {
        let stair = self
            .workspace
            .take_stair(&p.stair_id)
            .ok_or_else(|| CommandError::StairNotFound(p.stair_id.clone()))?;
        let key = p.stair_id.clone();
        self.commit(
            Entry::new(
                "Remove stairs",
                move |ws: &mut Workspace| ws.put_stair(stair.clone()),
                move |ws: &mut Workspace| {
                    ws.take_stair(&key);
                },
            ),
            now,
        );
        Ok(json!({ "ok": true, "stairId": p.stair_id }))
    }

    // ── Bulk load ──

    /// Replace all walls. Invalid records are skipped with a warning.
    /// Returns how many were loaded.
    pub fn load_wall_records(&mut self, records: impl IntoIterator<Item = WallSegment>) -> usize {
        let mut design = self.snapshot();
        design.walls = keep_valid("wall", records, WallSegment::validate);
        let n = design.walls.len();
        self.finish_load(design);
        n
    }

    /// Replace all floor tiles. Invalid records are skipped with a warning.
    pub fn load_floor_tiles(&mut self, records: impl IntoIterator<Item = FloorTile>) -> usize {
        let mut design = self.snapshot();
        design.floor_tiles = keep_valid("floor tile", records, FloorTile::validate);
        let n = design.floor_tiles.len();
        self.finish_load(design);
        n
    }

    /// Replace all stairs. Invalid records are skipped with a warning.
    pub fn load_stairs(&mut self, records: impl IntoIterator<Item = Stair>) -> usize {
        let mut design = self.snapshot();
        design.stairs = keep_valid("stair", records, Stair::validate);
        let n = design.stairs.len();
        self.finish_load(design);
        n
    }

    /// Replace all furniture. Instances of unknown catalog items and repeated
    /// mesh ids are skipped with a warning.
    pub fn load_furniture(&mut self, records: impl IntoIterator<Item = PlacedFurniture>) -> usize {
        let mut design = self.snapshot();
        design.furniture = self.keep_known_furniture(records);
        let n = design.furniture.len();
        self.finish_load(design);
        n
    }

    /// Replace the whole design, validating every record.
    pub fn load_snapshot(&mut self, snapshot: Snapshot) -> usize {
        let design = Snapshot {
            walls: keep_valid("wall", snapshot.walls.into_values(), WallSegment::validate),
            furniture: self.keep_known_furniture(snapshot.furniture),
            floor_tiles: keep_valid(
                "floor tile",
                snapshot.floor_tiles.into_values(),
                FloorTile::validate,
            ),
            stairs: keep_valid("stair", snapshot.stairs.into_values(), Stair::validate),
            wall_colors: snapshot.wall_colors,
            floor_materials: snapshot.floor_materials,
        };
        let n = design.record_count();
        self.finish_load(design);
        n
    }

    /// Replace the design with the seeded apartment: the original walls and
    /// one floor tile per room, with no furniture or stairs.
    ///
    /// Room wall colors and floor materials are kept, and each seed tile takes
    /// its room's material. History is cleared and the result is saved at once.
    pub fn reset_to_seed(&mut self) -> usize {
        let current = self.workspace.design();
        let design = Snapshot {
            walls: seed_walls().into_iter().map(|w| (w.id.clone(), w)).collect(),
            floor_tiles: seed_floor_tiles(&self.rooms, &current.floor_materials)
                .into_iter()
                .map(|t| (t.id.clone(), t))
                .collect(),
            wall_colors: current.wall_colors.clone(),
            floor_materials: current.floor_materials.clone(),
            ..Snapshot::default()
        };
        let n = design.record_count();
        self.finish_load(design);
        self.autosave.schedule(Instant::now());
        self.flush_autosave();
        n
    }

    fn keep_known_furniture(
        &self,
        records: impl IntoIterator<Item = PlacedFurniture>,
    ) -> Vec<PlacedFurniture> {
        let mut out: Vec<PlacedFurniture> = Vec::new();
        for f in records {
            if self.catalog.get(&f.catalog_id).is_none() {
                log::warn!("skipping furniture {}: unknown catalog item {}", f.mesh_id, f.catalog_id);
            } else if let Err(err) = f.validate() {
                log::warn!("skipping furniture {}: {err}", f.mesh_id);
            } else if out.iter().any(|o| o.mesh_id == f.mesh_id) {
                log::warn!("skipping furniture {}: duplicate mesh id", f.mesh_id);
            } else {
                out.push(f);
            }
        }
        out
    }

    /// Install a loaded design: junctions and index are rebuilt once, history
    /// is cleared, and no autosave is pending afterwards.
    fn finish_load(&mut self, design: Snapshot) {
        self.workspace.replace_design(design);
        self.history.clear();
        self.autosave.cancel();
        self.rebuild_index();
        let design = self.workspace.design();
        log::info!(
            "loaded {} walls, {} furniture, {} tiles, {} stairs ({} junctions)",
            design.walls.len(),
            design.furniture.len(),
            design.floor_tiles.len(),
            design.stairs.len(),
            self.workspace.junctions().len(),
        );
    }
}

fn keep_valid<T: Keyed>(
    kind: &str,
    records: impl IntoIterator<Item = T>,
    validate: impl Fn(&T) -> Result<(), RecordError>,
) -> BTreeMap<String, T> {
    let mut out = BTreeMap::new();
    for rec in records {
        if let Err(err) = validate(&rec) {
            log::warn!("skipping {kind} {}: {err}", rec.key());
            continue;
        }
        if let Some(prev) = out.insert(rec.key().to_owned(), rec) {
            log::warn!("duplicate {kind} {}, keeping the later record", prev.key());
        }
    }
    out
}

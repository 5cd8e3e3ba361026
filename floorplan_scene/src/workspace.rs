// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The mutable state that commands and history entries act on.

use core::fmt;

use floorplan_model::{
    Design, FloorTile, JunctionFiller, PlacedFurniture, Stair, WallSegment, junctions,
};

use crate::observer::{NoopObserver, SceneObserver};

/// Design records, derived junction fillers, and the render observer.
///
/// All writes go through the `put_*`/`take_*` methods so that junctions and
/// observer hooks stay in step with the records. Those methods are
/// idempotent: putting a record that is already present replaces it, and
/// taking a missing one does nothing. History entries depend on this.
pub struct Workspace {
    design: Design,
    junctions: Vec<JunctionFiller>,
    observer: Box<dyn SceneObserver>,
}

impl fmt::Debug for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workspace")
            .field("design", &self.design)
            .field("junctions", &self.junctions.len())
            .finish_non_exhaustive()
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(Box::new(NoopObserver))
    }
}

impl Workspace {
    pub(crate) fn new(observer: Box<dyn SceneObserver>) -> Self {
        Self {
            design: Design::default(),
            junctions: Vec::new(),
            observer,
        }
    }

    /// Current records.
    pub fn design(&self) -> &Design {
        &self.design
    }

    /// Current junction fillers.
    pub fn junctions(&self) -> &[JunctionFiller] {
        &self.junctions
    }

    pub(crate) fn set_observer(&mut self, observer: Box<dyn SceneObserver>) {
        self.observer = observer;
    }

    pub(crate) fn replace_design(&mut self, design: Design) {
        self.design = design;
        self.observer.design_loaded(&self.design);
        self.refresh_junctions();
    }

    fn refresh_junctions(&mut self) {
        self.junctions = junctions(self.design.walls.values());
        self.observer.junctions_changed(&self.junctions);
    }

    pub(crate) fn put_wall(&mut self, wall: WallSegment) {
        let existed = self.design.walls.contains_key(&wall.id);
        let id = wall.id.clone();
        self.design.walls.insert(id.clone(), wall);
        if let Some(wall) = self.design.walls.get(&id) {
            if existed {
                self.observer.wall_changed(wall);
            } else {
                self.observer.wall_added(wall);
            }
        }
        self.refresh_junctions();
    }

    /// Overwrite an existing wall; no-op if it is gone.
    pub(crate) fn replace_wall(&mut self, wall: WallSegment) {
        if self.design.walls.contains_key(&wall.id) {
            self.put_wall(wall);
        }
    }

    pub(crate) fn take_wall(&mut self, id: &str) -> Option<WallSegment> {
        let wall = self.design.walls.remove(id)?;
        self.observer.wall_removed(id);
        self.refresh_junctions();
        Some(wall)
    }

    /// Insert at `at` (clamped), or replace in place if the mesh id is already present.
    pub(crate) fn put_furniture(&mut self, at: usize, item: PlacedFurniture) {
        match self.design.furniture_position(&item.mesh_id) {
            Some(i) => {
                self.design.furniture[i] = item;
                self.observer.furniture_changed(&self.design.furniture[i]);
            }
            None => {
                let at = at.min(self.design.furniture.len());
                self.design.furniture.insert(at, item);
                self.observer.furniture_added(&self.design.furniture[at]);
            }
        }
    }

    /// Overwrite an existing instance in place; no-op if it is gone.
    pub(crate) fn replace_furniture(&mut self, item: PlacedFurniture) {
        if let Some(i) = self.design.furniture_position(&item.mesh_id) {
            self.design.furniture[i] = item;
            self.observer.furniture_changed(&self.design.furniture[i]);
        }
    }

    pub(crate) fn take_furniture(&mut self, mesh_id: &str) -> Option<(usize, PlacedFurniture)> {
        let at = self.design.furniture_position(mesh_id)?;
        let item = self.design.furniture.remove(at);
        self.observer.furniture_removed(mesh_id);
        Some((at, item))
    }

    pub(crate) fn put_tile(&mut self, tile: FloorTile) {
        let existed = self.design.floor_tiles.contains_key(&tile.id);
        let id = tile.id.clone();
        self.design.floor_tiles.insert(id.clone(), tile);
        if let Some(tile) = self.design.floor_tiles.get(&id) {
            if existed {
                self.observer.tile_changed(tile);
            } else {
                self.observer.tile_added(tile);
            }
        }
    }

    /// Overwrite an existing tile; no-op if it is gone.
    pub(crate) fn replace_tile(&mut self, tile: FloorTile) {
        if self.design.floor_tiles.contains_key(&tile.id) {
            self.put_tile(tile);
        }
    }

    pub(crate) fn take_tile(&mut self, id: &str) -> Option<FloorTile> {
        let tile = self.design.floor_tiles.remove(id)?;
        self.observer.tile_removed(id);
        Some(tile)
    }

    pub(crate) fn put_stair(&mut self, stair: Stair) {
        let id = stair.id.clone();
        self.design.stairs.insert(id.clone(), stair);
        if let Some(stair) = self.design.stairs.get(&id) {
            self.observer.stair_added(stair);
        }
    }

    pub(crate) fn take_stair(&mut self, id: &str) -> Option<Stair> {
        let stair = self.design.stairs.remove(id)?;
        self.observer.stair_removed(id);
        Some(stair)
    }

    /// Set or clear a room's wall color override.
    pub(crate) fn set_wall_color(&mut self, room_id: &str, hex: Option<&str>, walls: &[String]) {
        match hex {
            Some(hex) => {
                self.design
                    .wall_colors
                    .insert(room_id.to_owned(), hex.to_owned());
            }
            None => {
                self.design.wall_colors.remove(room_id);
            }
        }
        self.observer.wall_color_changed(room_id, hex, walls);
    }

    /// Set or clear a room's floor material. Tiles are retextured separately.
    pub(crate) fn set_floor_material(&mut self, room_id: &str, tex: Option<&str>) {
        match tex {
            Some(tex) => {
                self.design
                    .floor_materials
                    .insert(room_id.to_owned(), tex.to_owned());
            }
            None => {
                self.design.floor_materials.remove(room_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_edits_keep_junctions_current() {
        let mut ws = Workspace::default();
        ws.put_wall(WallSegment::horizontal("h", 0.0, 0.0, 5.0, 0).unwrap());
        assert!(ws.junctions().is_empty());
        ws.put_wall(WallSegment::vertical("v", 2.0, -1.0, 1.0, 0).unwrap());
        assert_eq!(ws.junctions().len(), 1);
        assert!(ws.take_wall("v").is_some());
        assert!(ws.junctions().is_empty());
        assert!(ws.take_wall("v").is_none());
    }

    #[test]
    fn furniture_put_is_positional_and_idempotent() {
        let mut ws = Workspace::default();
        for id in ["a", "b", "c"] {
            ws.put_furniture(usize::MAX, PlacedFurniture::new(id, "chair", 0.0, 0.0, 0.0, 0));
        }
        let (at, item) = ws.take_furniture("b").unwrap();
        assert_eq!(at, 1);
        ws.put_furniture(at, item.clone());
        ws.put_furniture(at, item);
        let order: Vec<_> = ws.design().furniture.iter().map(|f| f.mesh_id.as_str()).collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn clearing_a_color_removes_the_override() {
        let mut ws = Workspace::default();
        ws.set_wall_color("kitchen", Some("#112233"), &[]);
        assert_eq!(ws.design().wall_colors["kitchen"], "#112233");
        ws.set_wall_color("kitchen", None, &[]);
        assert!(ws.design().wall_colors.is_empty());
    }
}

// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hooks for the collaborators a scene drives but does not implement.

use floorplan_model::{
    Design, FloorTile, JunctionFiller, PlacedFurniture, Stair, WallSegment,
};

/// Everything that gets persisted: the editable records plus wall color overrides.
pub type Snapshot = Design;

/// Receives a full snapshot whenever a debounced autosave fires.
///
/// Saving is fire-and-forget from the scene's side. Any closure taking
/// `&Snapshot` is a sink:
///
/// ```
/// use floorplan_scene::{Scene, SceneConfig, Snapshot};
///
/// let scene = Scene::new(SceneConfig::default())
///     .with_sink(|s: &Snapshot| println!("saving {} walls", s.walls.len()));
/// # let _ = scene;
/// ```
pub trait SaveSink {
    /// Persist `snapshot`.
    fn save(&mut self, snapshot: &Snapshot);
}

impl<F: FnMut(&Snapshot)> SaveSink for F {
    fn save(&mut self, snapshot: &Snapshot) {
        self(snapshot);
    }
}

/// Visual side effects of record changes.
///
/// Every hook defaults to doing nothing, so a renderer implements only the
/// ones it cares about. Hooks fire after the record collections have been
/// updated, including when an edit is undone or redone.
pub trait SceneObserver {
    /// A wall was created or restored.
    fn wall_added(&mut self, _wall: &WallSegment) {}
    /// A wall's height or openings changed.
    fn wall_changed(&mut self, _wall: &WallSegment) {}
    /// A wall was deleted.
    fn wall_removed(&mut self, _id: &str) {}
    /// The derived junction fillers were recomputed.
    fn junctions_changed(&mut self, _fillers: &[JunctionFiller]) {}
    /// Walls belonging to a room were repainted; `hex` is `None` when the override was cleared.
    fn wall_color_changed(&mut self, _room_id: &str, _hex: Option<&str>, _walls: &[String]) {}
    /// A furniture instance was placed or restored.
    fn furniture_added(&mut self, _item: &PlacedFurniture) {}
    /// A furniture instance was moved, rotated, scaled, or recolored.
    fn furniture_changed(&mut self, _item: &PlacedFurniture) {}
    /// A furniture instance was deleted.
    fn furniture_removed(&mut self, _mesh_id: &str) {}
    /// A floor tile was created or restored.
    fn tile_added(&mut self, _tile: &FloorTile) {}
    /// A floor tile's material changed.
    fn tile_changed(&mut self, _tile: &FloorTile) {}
    /// A floor tile was deleted.
    fn tile_removed(&mut self, _id: &str) {}
    /// A stair was created or restored.
    fn stair_added(&mut self, _stair: &Stair) {}
    /// A stair was deleted.
    fn stair_removed(&mut self, _id: &str) {}
    /// The whole design was replaced by a bulk load.
    fn design_loaded(&mut self, _design: &Design) {}
}

/// Observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl SceneObserver for NoopObserver {}

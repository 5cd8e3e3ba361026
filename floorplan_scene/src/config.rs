// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tunables for a [`Scene`](crate::Scene).

use std::time::Duration;

use floorplan_history::DEFAULT_CAPACITY;
use floorplan_index::DEFAULT_CELL_SIZE;
use floorplan_model::consts::WALL_ROOM_TOLERANCE;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Scene configuration.
///
/// Every field has a default, so a partial JSON object is enough:
///
/// ```
/// use floorplan_scene::SceneConfig;
///
/// let cfg = SceneConfig::from_json_str(r#"{ "autosaveDebounceMs": 500 }"#).unwrap();
/// assert_eq!(cfg.autosave_debounce_ms, 500);
/// assert_eq!(cfg.history_capacity, 50);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneConfig {
    /// Spatial hash cell edge.
    pub cell_size: f64,
    /// Undo depth.
    pub history_capacity: usize,
    /// Quiet period before an autosave runs.
    pub autosave_debounce_ms: u64,
    /// How long a relayed request may wait for its response.
    pub relay_timeout_ms: u64,
    /// Padding used when matching walls to rooms.
    pub wall_room_tolerance: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            history_capacity: DEFAULT_CAPACITY,
            autosave_debounce_ms: 1500,
            relay_timeout_ms: 8000,
            wall_room_tolerance: WALL_ROOM_TOLERANCE,
        }
    }
}

impl SceneConfig {
    /// Parse a JSON object, filling missing fields with defaults.
    ///
    /// Anything but an object is rejected. Out-of-range values are replaced as
    /// described in [`normalized`](Self::normalized).
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(serde::de::Error::custom("scene config must be a JSON object"));
        }
        let cfg: Self = serde_json::from_value(value)?;
        Ok(cfg.normalized())
    }

    /// Replace unusable values with their defaults: a cell size that is not a
    /// finite positive number, a zero history capacity, and a negative or
    /// non-finite wall tolerance.
    pub fn normalized(mut self) -> Self {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            log::warn!("cell size {} is not positive, using {DEFAULT_CELL_SIZE}", self.cell_size);
            self.cell_size = DEFAULT_CELL_SIZE;
        }
        if self.history_capacity == 0 {
            log::warn!("history capacity 0, using {DEFAULT_CAPACITY}");
            self.history_capacity = DEFAULT_CAPACITY;
        }
        if !(self.wall_room_tolerance.is_finite() && self.wall_room_tolerance >= 0.0) {
            log::warn!(
                "wall tolerance {} is unusable, using {WALL_ROOM_TOLERANCE}",
                self.wall_room_tolerance
            );
            self.wall_room_tolerance = WALL_ROOM_TOLERANCE;
        }
        self
    }

    /// Autosave debounce as a [`Duration`].
    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }

    /// Relay timeout as a [`Duration`].
    pub fn relay_timeout(&self) -> Duration {
        Duration::from_millis(self.relay_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let cfg = SceneConfig::default();
        assert_eq!(cfg.cell_size, 1.0);
        assert_eq!(cfg.history_capacity, 50);
        assert_eq!(cfg.autosave_debounce(), Duration::from_millis(1500));
        assert_eq!(cfg.relay_timeout(), Duration::from_secs(8));
        assert_eq!(cfg.wall_room_tolerance, 0.3);
    }

    #[test]
    fn bad_cell_size_falls_back() {
        let cfg = SceneConfig::from_json_str(r#"{"cellSize": 0}"#).unwrap();
        assert_eq!(cfg.cell_size, DEFAULT_CELL_SIZE);
        let cfg = SceneConfig::from_json_str(r#"{"cellSize": -3.5, "historyCapacity": 0}"#).unwrap();
        assert_eq!(cfg.cell_size, DEFAULT_CELL_SIZE);
        assert_eq!(cfg.history_capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn only_objects_are_configs() {
        for text in ["[1, 2]", "[]", "3", "null", "\"cellSize\""] {
            assert!(SceneConfig::from_json_str(text).is_err(), "{text}");
        }
        assert_eq!(SceneConfig::from_json_str("{}").unwrap(), SceneConfig::default());
    }

    #[test]
    fn normalized_repairs_directly_built_configs() {
        let cfg = SceneConfig {
            cell_size: f64::NAN,
            history_capacity: 0,
            wall_room_tolerance: -1.0,
            ..SceneConfig::default()
        }
        .normalized();
        assert_eq!(cfg, SceneConfig::default());
    }
}

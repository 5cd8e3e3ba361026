// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangular floor tiles.

use kurbo::Rect;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_TILE_TEXTURE, MIN_GESTURE_EXTENT, MIN_TILE_EXTENT};
use crate::error::{RecordError, check_in_plan};

/// An axis-aligned floor patch with its own material.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorTile {
    /// Unique id.
    pub id: String,
    /// Minimum x corner.
    pub x: f64,
    /// Minimum z corner.
    pub z: f64,
    /// Extent along x.
    pub w: f64,
    /// Extent along z.
    pub d: f64,
    /// Floor level.
    #[serde(default)]
    pub floor: i32,
    /// Small vertical nudge so overlapping tiles do not z-fight.
    #[serde(default)]
    pub y_offset: f64,
    /// Material identifier.
    #[serde(default = "default_texture")]
    pub tex_type: String,
}

fn default_texture() -> String {
    DEFAULT_TILE_TEXTURE.into()
}

impl FloorTile {
    /// A tile with an explicit rectangle. Both sizes must be positive.
    pub fn new(
        id: impl Into<String>,
        x: f64,
        z: f64,
        w: f64,
        d: f64,
        floor: i32,
    ) -> Result<Self, RecordError> {
        let tile = Self {
            id: id.into(),
            x,
            z,
            w,
            d,
            floor,
            y_offset: 0.0,
            tex_type: default_texture(),
        };
        tile.validate()?;
        Ok(tile)
    }

    /// A tile from a two-corner drag.
    ///
    /// A drag under [`MIN_GESTURE_EXTENT`] in both directions is rejected as a
    /// stray click; otherwise each side is widened to at least
    /// [`MIN_TILE_EXTENT`].
    pub fn from_corners(
        id: impl Into<String>,
        a: (f64, f64),
        b: (f64, f64),
        floor: i32,
    ) -> Result<Self, RecordError> {
        let (x, z) = (a.0.min(b.0), a.1.min(b.1));
        let w = (a.0 - b.0).abs();
        let d = (a.1 - b.1).abs();
        if w < MIN_GESTURE_EXTENT && d < MIN_GESTURE_EXTENT {
            return Err(RecordError::GestureTooSmall { what: "tile", w, d });
        }
        Self::new(
            id,
            x,
            z,
            w.max(MIN_TILE_EXTENT),
            d.max(MIN_TILE_EXTENT),
            floor,
        )
    }

    /// Set the material.
    pub fn with_texture(mut self, tex_type: impl Into<String>) -> Self {
        self.tex_type = tex_type.into();
        self
    }

    /// Plan rectangle.
    pub fn footprint(&self) -> Rect {
        Rect::new(self.x, self.z, self.x + self.w, self.z + self.d)
    }

    /// Check the size invariant and that the rectangle lies inside the plan.
    pub fn validate(&self) -> Result<(), RecordError> {
        if !(self.w > 0.0 && self.d > 0.0) {
            return Err(RecordError::NonPositiveSize {
                what: "tile",
                w: self.w,
                d: self.d,
            });
        }
        check_in_plan("tile", &[self.x, self.z, self.x + self.w, self.z + self.d])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_empty_rectangles() {
        assert!(FloorTile::new("t", 0.0, 0.0, 2.0, 3.0, 0).is_ok());
        for (w, d) in [(0.0, 1.0), (1.0, -1.0)] {
            assert!(matches!(
                FloorTile::new("t", 0.0, 0.0, w, d, 0),
                Err(RecordError::NonPositiveSize { .. })
            ));
        }
    }

    #[test]
    fn gesture_threshold_and_minimum_size() {
        let err = FloorTile::from_corners("t", (1.0, 1.0), (1.4, 1.3), 0).unwrap_err();
        assert!(matches!(err, RecordError::GestureTooSmall { .. }));

        // A thin strip is widened to one meter.
        let t = FloorTile::from_corners("t", (3.0, 1.0), (0.0, 1.2), 1).unwrap();
        assert_eq!((t.x, t.z, t.w, t.d), (0.0, 1.0, 3.0, 1.0));
        assert_eq!(t.floor, 1);
        assert_eq!(t.tex_type, DEFAULT_TILE_TEXTURE);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let t: FloorTile =
            serde_json::from_str(r#"{"id":"ft","x":0,"z":0,"w":2,"d":2}"#).unwrap();
        assert_eq!(t.floor, 0);
        assert_eq!(t.y_offset, 0.0);
        assert_eq!(t.tex_type, "concrete_smooth");
        let r = t.footprint();
        assert_eq!((r.x1, r.y1), (2.0, 2.0));
    }

    #[test]
    fn tiles_must_stay_in_plan() {
        let err = FloorTile::new("t", 0.0, 0.0, 1e5, 1e5, 0).unwrap_err();
        assert!(matches!(err, RecordError::OutOfPlan { what: "tile", .. }));
        assert!(FloorTile::from_corners("t", (f64::NEG_INFINITY, 0.0), (1.0, 1.0), 0).is_err());
        assert!(FloorTile::new("t", -9000.0, -9000.0, 2.0, 2.0, 0).is_ok());
    }
}

// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Filler blocks where horizontal and vertical walls meet.

use kurbo::Rect;
use serde::{Deserialize, Serialize};

use crate::wall::{WallAxis, WallSegment};

/// Derived block that closes the gap at a wall crossing or corner.
///
/// Fillers are recomputed from the wall set; they are never stored or edited directly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JunctionFiller {
    /// Center x (the vertical wall's `x`).
    pub x: f64,
    /// Center z (the horizontal wall's `z`).
    pub z: f64,
    /// Extent along x (the vertical wall's thickness).
    pub w: f64,
    /// Extent along z (the horizontal wall's thickness).
    pub d: f64,
    /// Height of the taller wall.
    pub height: f64,
    /// Floor level.
    pub floor: i32,
    /// Id of the horizontal wall.
    pub horizontal: String,
    /// Id of the vertical wall.
    pub vertical: String,
}

impl JunctionFiller {
    /// Plan rectangle.
    pub fn footprint(&self) -> Rect {
        Rect::from_center_size((self.x, self.z), (self.w, self.d))
    }
}

/// The filler for one wall pair, if their padded extents cross.
///
/// `h` must be horizontal and `v` vertical on the same floor. The vertical
/// wall's `x` must fall within the horizontal span padded by half the
/// vertical wall's thickness, and the horizontal wall's `z` within the
/// vertical span padded by half the horizontal wall's thickness.
pub fn junction(h: &WallSegment, v: &WallSegment) -> Option<JunctionFiller> {
    if h.floor != v.floor {
        return None;
    }
    let WallAxis::Horizontal { z, x1, x2 } = h.axis else {
        return None;
    };
    let WallAxis::Vertical { x, z1, z2 } = v.axis else {
        return None;
    };
    let pad_x = v.thickness / 2.0;
    let pad_z = h.thickness / 2.0;
    let hits = x >= x1 - pad_x && x <= x2 + pad_x && z >= z1 - pad_z && z <= z2 + pad_z;
    hits.then(|| JunctionFiller {
        x,
        z,
        w: v.thickness,
        d: h.thickness,
        height: h.total_height().max(v.total_height()),
        floor: h.floor,
        horizontal: h.id.clone(),
        vertical: v.id.clone(),
    })
}

/// Every filler for a wall set, in `(horizontal, vertical)` iteration order.
pub fn junctions<'a>(walls: impl IntoIterator<Item = &'a WallSegment>) -> Vec<JunctionFiller> {
    let (horizontal, vertical): (Vec<_>, Vec<_>) =
        walls.into_iter().partition(|w| w.axis.is_horizontal());
    let mut out = Vec::new();
    for h in &horizontal {
        out.extend(vertical.iter().filter_map(|v| junction(h, v)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::WALL_THICKNESS;

    #[test]
    fn crossing_walls_make_one_filler() {
        let h = WallSegment::horizontal("h", 0.0, 0.0, 5.0, 0).unwrap();
        let v = WallSegment::vertical("v", 2.0, -1.0, 1.0, 0).unwrap();
        let fillers = junctions([&h, &v]);
        assert_eq!(fillers.len(), 1);
        let f = &fillers[0];
        assert_eq!((f.x, f.z), (2.0, 0.0));
        assert_eq!((f.w, f.d), (WALL_THICKNESS, WALL_THICKNESS));
        assert_eq!((f.horizontal.as_str(), f.vertical.as_str()), ("h", "v"));
        let r = f.footprint();
        assert!(r.contains(kurbo::Point::new(2.0, 0.0)));
    }

    #[test]
    fn corners_within_padding_still_join() {
        let h = WallSegment::horizontal("h", 0.0, 0.0, 5.0, 0).unwrap();
        // Starts just below the horizontal wall's centerline.
        let v = WallSegment::vertical("v", 5.1, 0.1, 3.0, 0).unwrap();
        assert!(junction(&h, &v).is_some());
    }

    #[test]
    fn separated_or_cross_floor_walls_do_not_join() {
        let h = WallSegment::horizontal("h", 0.0, 0.0, 5.0, 0).unwrap();
        let far = WallSegment::vertical("far", 6.0, -1.0, 1.0, 0).unwrap();
        let up = WallSegment::vertical("up", 2.0, -1.0, 1.0, 1).unwrap();
        assert!(junctions([&h, &far, &up]).is_empty());
        // Argument order matters: the first wall must be horizontal.
        let v = WallSegment::vertical("v", 2.0, -1.0, 1.0, 0).unwrap();
        assert!(junction(&v, &h).is_none());
    }
}

// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned wall segments and their door/window openings.

use kurbo::Rect;
use serde::{Deserialize, Serialize};

use crate::consts::{MIN_WALL_LENGTH, OPENING_EDGE_MARGIN, WALL_HEIGHT, WALL_THICKNESS};
use crate::error::{RecordError, check_in_plan};

/// Which way a wall runs, plus its placement on that axis.
///
/// Serialized inline with the wall as `type: "h"` or `type: "v"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WallAxis {
    /// Runs along x at a fixed `z`; `x1 < x2`.
    #[serde(rename = "h")]
    Horizontal {
        /// Fixed coordinate.
        z: f64,
        /// Span start.
        x1: f64,
        /// Span end.
        x2: f64,
    },
    /// Runs along z at a fixed `x`; `z1 < z2`.
    #[serde(rename = "v")]
    Vertical {
        /// Fixed coordinate.
        x: f64,
        /// Span start.
        z1: f64,
        /// Span end.
        z2: f64,
    },
}

impl WallAxis {
    /// `(start, end)` along the axis the wall runs on.
    pub fn span(&self) -> (f64, f64) {
        match *self {
            Self::Horizontal { x1, x2, .. } => (x1, x2),
            Self::Vertical { z1, z2, .. } => (z1, z2),
        }
    }

    /// Coordinate on the perpendicular axis.
    pub fn fixed(&self) -> f64 {
        match *self {
            Self::Horizontal { z, .. } => z,
            Self::Vertical { x, .. } => x,
        }
    }

    /// Whether this is a horizontal (`h`) wall.
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Self::Horizontal { .. })
    }
}

/// Door or window.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpeningKind {
    /// Floor-level doorway.
    Door,
    /// Window with a sill.
    Window,
}

/// A cut-out in a wall, positioned by its center along the wall's axis.
///
/// `position` is measured from the wall's span start (`x1` or `z1`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opening {
    /// Door or window.
    pub kind: OpeningKind,
    /// Distance from the span start.
    #[serde(alias = "positionAlongAxis")]
    pub position: f64,
    /// Width along the wall.
    pub width: f64,
    /// Height of the cut-out.
    pub height: f64,
    /// Height of the bottom edge above the floor.
    #[serde(default)]
    pub sill_height: f64,
}

impl Opening {
    /// A doorway starting at floor level.
    pub fn door(position: f64, width: f64, height: f64) -> Self {
        Self {
            kind: OpeningKind::Door,
            position,
            width,
            height,
            sill_height: 0.0,
        }
    }

    /// A window with the given sill height.
    pub fn window(position: f64, width: f64, height: f64, sill_height: f64) -> Self {
        Self {
            kind: OpeningKind::Window,
            position,
            width,
            height,
            sill_height,
        }
    }

    fn check(&self, wall_length: f64) -> Result<(), RecordError> {
        if !(self.width > 0.0 && self.height > 0.0 && self.sill_height >= 0.0) {
            return Err(RecordError::InvalidOpening {
                width: self.width,
                height: self.height,
                sill_height: self.sill_height,
            });
        }
        let min = OPENING_EDGE_MARGIN;
        let max = wall_length - OPENING_EDGE_MARGIN;
        if !(self.position > min && self.position < max) {
            return Err(RecordError::OpeningOutOfRange {
                position: self.position,
                min,
                max,
            });
        }
        Ok(())
    }
}

fn default_height() -> f64 {
    WALL_HEIGHT
}

fn default_thickness() -> f64 {
    WALL_THICKNESS
}

fn default_height_floors() -> u32 {
    1
}

/// One straight wall.
///
/// Walls are created through [`horizontal`](Self::horizontal),
/// [`vertical`](Self::vertical), or [`from_endpoints`](Self::from_endpoints),
/// all of which normalize the span and reject anything shorter than
/// [`MIN_WALL_LENGTH`]. Records read from storage should be checked with
/// [`validate`](Self::validate).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallSegment {
    /// Unique id.
    pub id: String,
    /// Orientation and placement.
    #[serde(flatten)]
    pub axis: WallAxis,
    /// Height in meters.
    #[serde(rename = "H", default = "default_height")]
    pub height: f64,
    /// Thickness in meters.
    #[serde(rename = "T", default = "default_thickness")]
    pub thickness: f64,
    /// Floor level the wall stands on.
    #[serde(default)]
    pub floor: i32,
    /// How many floor-heights tall the wall is.
    #[serde(default = "default_height_floors")]
    pub height_floors: u32,
    /// Part of the seeded apartment rather than user-drawn.
    #[serde(default)]
    pub is_original: bool,
    /// Openings sorted by position.
    #[serde(default)]
    pub openings: Vec<Opening>,
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

impl WallSegment {
    fn build(id: impl Into<String>, axis: WallAxis, floor: i32) -> Result<Self, RecordError> {
        let (a, b) = axis.span();
        check_in_plan("wall", &[a, b, axis.fixed()])?;
        let length = b - a;
        if !(length >= MIN_WALL_LENGTH) {
            return Err(RecordError::WallTooShort {
                length,
                min: MIN_WALL_LENGTH,
            });
        }
        Ok(Self {
            id: id.into(),
            axis,
            height: WALL_HEIGHT,
            thickness: WALL_THICKNESS,
            floor,
            height_floors: 1,
            is_original: false,
            openings: Vec::new(),
        })
    }

    /// A wall along x at `z`, spanning `x1..x2` in either order.
    pub fn horizontal(
        id: impl Into<String>,
        z: f64,
        x1: f64,
        x2: f64,
        floor: i32,
    ) -> Result<Self, RecordError> {
        let (x1, x2) = ordered(x1, x2);
        Self::build(id, WallAxis::Horizontal { z, x1, x2 }, floor)
    }

    /// A wall along z at `x`, spanning `z1..z2` in either order.
    pub fn vertical(
        id: impl Into<String>,
        x: f64,
        z1: f64,
        z2: f64,
        floor: i32,
    ) -> Result<Self, RecordError> {
        let (z1, z2) = ordered(z1, z2);
        Self::build(id, WallAxis::Vertical { x, z1, z2 }, floor)
    }

    /// A wall from a two-click gesture.
    ///
    /// The dominant direction picks the axis (ties go horizontal) and the
    /// first point fixes the perpendicular coordinate.
    pub fn from_endpoints(
        id: impl Into<String>,
        start: (f64, f64),
        end: (f64, f64),
        floor: i32,
    ) -> Result<Self, RecordError> {
        let dx = (end.0 - start.0).abs();
        let dz = (end.1 - start.1).abs();
        if dx >= dz {
            Self::horizontal(id, start.1, start.0, end.0, floor)
        } else {
            Self::vertical(id, start.0, start.1, end.1, floor)
        }
    }

    /// Mark as part of the seeded layout.
    pub fn original(mut self) -> Self {
        self.is_original = true;
        self
    }

    /// Span length along the wall's axis.
    pub fn length(&self) -> f64 {
        let (a, b) = self.axis.span();
        b - a
    }

    /// Plan footprint: the span padded by half the thickness on the perpendicular axis.
    pub fn footprint(&self) -> Rect {
        let half = self.thickness / 2.0;
        match self.axis {
            WallAxis::Horizontal { z, x1, x2 } => Rect::new(x1, z - half, x2, z + half),
            WallAxis::Vertical { x, z1, z2 } => Rect::new(x - half, z1, x + half, z2),
        }
    }

    /// Total rendered height: one wall height per floor spanned.
    pub fn total_height(&self) -> f64 {
        self.height * f64::from(self.height_floors)
    }

    /// Make the wall `floors` floor-heights tall.
    pub fn extend_height(&mut self, floors: u32) -> Result<(), RecordError> {
        if floors == 0 {
            return Err(RecordError::InvalidHeightFloors(floors));
        }
        self.height_floors = floors;
        Ok(())
    }

    /// Cut an opening, keeping the list sorted by position.
    pub fn add_opening(&mut self, opening: Opening) -> Result<(), RecordError> {
        opening.check(self.length())?;
        let at = self
            .openings
            .partition_point(|o| o.position <= opening.position);
        self.openings.insert(at, opening);
        Ok(())
    }

    /// Re-check every invariant, for records that did not come through a constructor.
    pub fn validate(&self) -> Result<(), RecordError> {
        let (a, b) = self.axis.span();
        check_in_plan("wall", &[a, b, self.axis.fixed()])?;
        let length = b - a;
        if !(length >= MIN_WALL_LENGTH) {
            return Err(RecordError::WallTooShort {
                length,
                min: MIN_WALL_LENGTH,
            });
        }
        for (what, value) in [("height", self.height), ("thickness", self.thickness)] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(RecordError::InvalidWallDimension { what, value });
            }
        }
        if self.height_floors == 0 {
            return Err(RecordError::InvalidHeightFloors(0));
        }
        self.openings.iter().try_for_each(|o| o.check(length))
    }
}

// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Straight stairs climbing exactly one floor.

use kurbo::Rect;
use serde::{Deserialize, Serialize};

use crate::consts::{FLOOR_HEIGHT, MIN_GESTURE_EXTENT, STAIR_LENGTH, STAIR_STEPS, STAIR_WIDTH};
use crate::error::{RecordError, check_in_plan};

/// The direction a stair climbs toward.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StairDirection {
    /// Toward -z.
    North,
    /// Toward +x.
    East,
    /// Toward +z.
    South,
    /// Toward -x.
    West,
}

impl StairDirection {
    /// Next direction clockwise.
    pub fn rotated(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// Whether the run lies along z.
    pub fn runs_along_z(self) -> bool {
        matches!(self, Self::North | Self::South)
    }
}

fn default_width() -> f64 {
    STAIR_WIDTH
}

fn default_length() -> f64 {
    STAIR_LENGTH
}

/// A flight of stairs anchored at its minimum plan corner.
///
/// The footprint is `width x length` when climbing north/south and
/// `length x width` when climbing east/west.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stair {
    /// Unique id.
    pub id: String,
    /// Anchor x.
    pub x: f64,
    /// Anchor z.
    pub z: f64,
    /// Climb direction.
    pub direction: StairDirection,
    /// Width across the run.
    #[serde(default = "default_width")]
    pub width: f64,
    /// Run length.
    #[serde(default = "default_length")]
    pub length: f64,
    /// Lower floor.
    #[serde(default)]
    pub from_floor: i32,
    /// Upper floor, always `from_floor + 1`.
    pub to_floor: i32,
}

impl Stair {
    /// A default-sized stair from `from_floor` up to the next floor.
    pub fn new(
        id: impl Into<String>,
        x: f64,
        z: f64,
        direction: StairDirection,
        from_floor: i32,
    ) -> Self {
        Self {
            id: id.into(),
            x,
            z,
            direction,
            width: STAIR_WIDTH,
            length: STAIR_LENGTH,
            from_floor,
            to_floor: from_floor.saturating_add(1),
        }
    }

    /// A stair with a custom size, for placement gestures.
    ///
    /// Both sides must be at least [`MIN_GESTURE_EXTENT`].
    pub fn from_gesture(
        id: impl Into<String>,
        x: f64,
        z: f64,
        direction: StairDirection,
        width: f64,
        length: f64,
        from_floor: i32,
    ) -> Result<Self, RecordError> {
        if width < MIN_GESTURE_EXTENT || length < MIN_GESTURE_EXTENT {
            return Err(RecordError::GestureTooSmall {
                what: "stair",
                w: width,
                d: length,
            });
        }
        let mut stair = Self::new(id, x, z, direction, from_floor);
        stair.width = width;
        stair.length = length;
        stair.validate()?;
        Ok(stair)
    }

    /// Number of steps.
    pub fn step_count(&self) -> u32 {
        STAIR_STEPS
    }

    /// Height of one step; `step_rise * step_count == FLOOR_HEIGHT`.
    pub fn step_rise(&self) -> f64 {
        FLOOR_HEIGHT / f64::from(STAIR_STEPS)
    }

    /// Depth of one step along the run.
    pub fn step_run(&self) -> f64 {
        self.length / f64::from(STAIR_STEPS)
    }

    /// Both floors the stair is visible on.
    pub fn floors(&self) -> [i32; 2] {
        [self.from_floor, self.to_floor]
    }

    /// Plan rectangle oriented by direction.
    pub fn footprint(&self) -> Rect {
        let (w, d) = if self.direction.runs_along_z() {
            (self.width, self.length)
        } else {
            (self.length, self.width)
        };
        Rect::new(self.x, self.z, self.x + w, self.z + d)
    }

    /// Check the size and floor-span invariants.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.to_floor.checked_sub(self.from_floor) != Some(1) {
            return Err(RecordError::StairSpan {
                from_floor: self.from_floor,
                to_floor: self.to_floor,
            });
        }
        if !(self.width > 0.0 && self.length > 0.0) {
            return Err(RecordError::NonPositiveSize {
                what: "stair",
                w: self.width,
                d: self.length,
            });
        }
        let r = self.footprint();
        check_in_plan("stair", &[r.x0, r.y0, r.x1, r.y1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_climbs_one_floor() {
        let s = Stair::new("st", 0.0, 0.0, StairDirection::North, 2);
        assert_eq!(s.floors(), [2, 3]);
        assert!(s.validate().is_ok());

        let mut bad = s.clone();
        bad.to_floor = 4;
        assert!(matches!(bad.validate(), Err(RecordError::StairSpan { .. })));
    }

    #[test]
    fn steps_divide_rise_and_run() {
        let s = Stair::new("st", 0.0, 0.0, StairDirection::East, 0);
        assert_eq!(s.step_count(), 15);
        let rise = s.step_rise() * f64::from(s.step_count());
        assert!((rise - FLOOR_HEIGHT).abs() < 1e-12);
        assert!((s.step_run() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn footprint_follows_direction() {
        let ns = Stair::new("a", 1.0, 2.0, StairDirection::South, 0).footprint();
        assert_eq!((ns.width(), ns.height()), (STAIR_WIDTH, STAIR_LENGTH));
        let ew = Stair::new("b", 1.0, 2.0, StairDirection::West, 0).footprint();
        assert_eq!((ew.width(), ew.height()), (STAIR_LENGTH, STAIR_WIDTH));
        assert_eq!((ew.x0, ew.y0), (1.0, 2.0));
    }

    #[test]
    fn gesture_rejects_tiny_sizes() {
        let s = Stair::from_gesture("a", 0.0, 0.0, StairDirection::North, 0.4, 3.0, 0);
        assert!(matches!(s, Err(RecordError::GestureTooSmall { .. })));
        let s = Stair::from_gesture("a", 0.0, 0.0, StairDirection::North, 1.2, 2.5, 0).unwrap();
        assert_eq!((s.width, s.length, s.to_floor), (1.2, 2.5, 1));
    }

    #[test]
    fn direction_rotates_clockwise() {
        let mut d = StairDirection::North;
        for _ in 0..4 {
            d = d.rotated();
        }
        assert_eq!(d, StairDirection::North);
        assert_eq!(StairDirection::East.rotated(), StairDirection::South);
    }

    #[test]
    fn stairs_must_stay_in_plan() {
        let s = Stair::from_gesture("s", 9999.5, 0.0, StairDirection::East, 1.0, 3.0, 0);
        assert!(matches!(s, Err(RecordError::OutOfPlan { what: "stair", .. })));
        let far = Stair::new("s", f64::NAN, 0.0, StairDirection::North, 0);
        assert!(far.validate().is_err());
    }
}

// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Record construction and validation errors.

use thiserror::Error;

use crate::consts::PLAN_EXTENT;

/// Why a record could not be created, mutated, or loaded.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum RecordError {
    /// The wall's span is below [`MIN_WALL_LENGTH`](crate::consts::MIN_WALL_LENGTH).
    #[error("wall too short: {length:.3} < {min}")]
    WallTooShort {
        /// Requested span.
        length: f64,
        /// Minimum accepted span.
        min: f64,
    },
    /// An opening's position is not strictly inside the wall's usable span.
    #[error("opening at {position:.3} must lie strictly within ({min:.3}, {max:.3})")]
    OpeningOutOfRange {
        /// Requested position along the wall axis.
        position: f64,
        /// Exclusive lower bound.
        min: f64,
        /// Exclusive upper bound.
        max: f64,
    },
    /// An opening has a non-positive width/height or a negative sill.
    #[error("opening dimensions must be positive (width {width}, height {height}, sill {sill_height})")]
    InvalidOpening {
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
        /// Requested sill height.
        sill_height: f64,
    },
    /// A wall must be at least one floor tall.
    #[error("wall must span at least one floor, got {0}")]
    InvalidHeightFloors(u32),
    /// Thickness or height is not positive.
    #[error("wall {what} must be positive, got {value}")]
    InvalidWallDimension {
        /// Which dimension.
        what: &'static str,
        /// Offending value.
        value: f64,
    },
    /// A tile or stair has a non-positive dimension.
    #[error("{what} size must be positive, got {w} x {d}")]
    NonPositiveSize {
        /// Record kind.
        what: &'static str,
        /// Width.
        w: f64,
        /// Depth or length.
        d: f64,
    },
    /// A placement gesture covered too little area to mean anything.
    #[error("{what} gesture too small: {w:.3} x {d:.3}")]
    GestureTooSmall {
        /// Record kind.
        what: &'static str,
        /// Gesture width.
        w: f64,
        /// Gesture depth.
        d: f64,
    },
    /// A coordinate or extent is not finite or lies outside the plan.
    #[error("{what} coordinate {value} is outside the plan (limit {limit})", limit = PLAN_EXTENT)]
    OutOfPlan {
        /// Record kind.
        what: &'static str,
        /// Offending value.
        value: f64,
    },
    /// A stair must climb exactly one floor.
    #[error("stair must climb exactly one floor, got {from_floor} -> {to_floor}")]
    StairSpan {
        /// Lower floor.
        from_floor: i32,
        /// Upper floor.
        to_floor: i32,
    },
}

/// Fail with [`RecordError::OutOfPlan`] on the first value that is not finite
/// or exceeds [`PLAN_EXTENT`] in magnitude.
pub(crate) fn check_in_plan(what: &'static str, values: &[f64]) -> Result<(), RecordError> {
    match values.iter().find(|v| !(v.abs() <= PLAN_EXTENT)) {
        Some(&value) => Err(RecordError::OutOfPlan { what, value }),
        None => Ok(()),
    }
}

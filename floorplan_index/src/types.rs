// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive types: plan-space bounds and grid cell keys.

/// Axis-aligned bounds on the ground plane (`x` east, `z` south).
///
/// Constructors normalize their inputs so `min_* <= max_*` always holds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    /// Minimum x.
    pub min_x: f64,
    /// Minimum z.
    pub min_z: f64,
    /// Maximum x.
    pub max_x: f64,
    /// Maximum z.
    pub max_z: f64,
}

impl Bounds {
    /// Create bounds from two opposite corners, in any order.
    pub fn new(x1: f64, z1: f64, x2: f64, z2: f64) -> Self {
        Self {
            min_x: x1.min(x2),
            min_z: z1.min(z2),
            max_x: x1.max(x2),
            max_z: z1.max(z2),
        }
    }

    /// Create bounds from an origin corner and a size.
    pub fn from_xzwd(x: f64, z: f64, w: f64, d: f64) -> Self {
        Self::new(x, z, x + w, z + d)
    }

    /// Bounds of a single point.
    pub const fn point(x: f64, z: f64) -> Self {
        Self {
            min_x: x,
            min_z: z,
            max_x: x,
            max_z: z,
        }
    }

    /// Whether the point lies inside or on the edge of these bounds.
    pub fn contains(&self, x: f64, z: f64) -> bool {
        self.min_x <= x && x <= self.max_x && self.min_z <= z && z <= self.max_z
    }

    /// Whether two bounds share any area or edge.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_z <= other.max_z
            && other.min_z <= self.max_z
    }

    /// Width along x.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Depth along z.
    pub fn depth(&self) -> f64 {
        self.max_z - self.min_z
    }
}

/// Key of one grid cell: `(floor(x / cell), floor level, floor(z / cell))`.
///
/// Ordering is lexicographic on `(cx, floor, cz)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellKey {
    /// Cell column along x.
    pub cx: i64,
    /// Floor level.
    pub floor: i32,
    /// Cell row along z.
    pub cz: i64,
}

impl CellKey {
    /// Create a cell key.
    pub const fn new(cx: i64, floor: i32, cz: i64) -> Self {
        Self { cx, floor, cz }
    }
}

/// Floor division of a plan coordinate into a cell index.
///
/// `core` has no `f64::floor`, so truncate and step down for negatives.
#[inline]
pub(crate) fn cell_index(v: f64, cell: f64) -> i64 {
    debug_assert!(cell > 0.0, "cell size must be positive");
    let q = v / cell;
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Out-of-range quotients saturate, which only widens the covered range."
    )]
    let i = q as i64;
    if (i as f64) > q { i.saturating_sub(1) } else { i }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_normalize_corners() {
        let b = Bounds::new(3.0, 4.0, 1.0, -2.0);
        assert_eq!(b, Bounds::new(1.0, -2.0, 3.0, 4.0));
        assert_eq!(b.width(), 2.0);
        assert_eq!(b.depth(), 6.0);
    }

    #[test]
    fn cell_index_floors_toward_negative_infinity() {
        assert_eq!(cell_index(0.0, 1.0), 0);
        assert_eq!(cell_index(0.99, 1.0), 0);
        assert_eq!(cell_index(1.0, 1.0), 1);
        assert_eq!(cell_index(-0.01, 1.0), -1);
        assert_eq!(cell_index(-1.0, 1.0), -1);
        assert_eq!(cell_index(-1.5, 1.0), -2);
        assert_eq!(cell_index(5.0, 2.0), 2);
    }

    #[test]
    fn cell_index_saturates_on_extreme_input() {
        assert_eq!(cell_index(1e300, 1.0), i64::MAX);
        assert_eq!(cell_index(-1e300, 1.0), i64::MIN);
        assert_eq!(cell_index(f64::NEG_INFINITY, 1.0), i64::MIN);
        assert_eq!(cell_index(f64::NAN, 1.0), 0);
    }

    #[test]
    fn overlap_includes_shared_edges() {
        let a = Bounds::new(0.0, 0.0, 1.0, 1.0);
        assert!(a.overlaps(&Bounds::new(1.0, 0.0, 2.0, 1.0)));
        assert!(!a.overlaps(&Bounds::new(1.01, 0.0, 2.0, 1.0)));
        assert!(a.contains(1.0, 1.0));
        assert!(!a.contains(1.0, 1.01));
    }
}

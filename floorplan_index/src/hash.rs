// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform spatial hash keyed by `(cell x, floor, cell z)`.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::types::{Bounds, CellKey, cell_index};

/// Default cell edge length in plan units.
pub const DEFAULT_CELL_SIZE: f64 = 1.0;

/// Placements covering more cells than this are kept in an overflow list
/// instead of being written into every cell.
pub const MAX_GRID_CELLS: u64 = 4096;

#[derive(Clone, Debug)]
struct Entry<K, D> {
    key: K,
    floor: i32,
    bounds: Bounds,
    cells: CellRange,
    data: D,
}

/// Inclusive cell range on one floor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct CellRange {
    min: CellKey,
    max: CellKey,
}

impl CellRange {
    /// Number of cells covered, saturating.
    fn count(&self) -> u64 {
        let w = self.max.cx.abs_diff(self.min.cx).saturating_add(1);
        let d = self.max.cz.abs_diff(self.min.cz).saturating_add(1);
        w.saturating_mul(d)
    }

    fn contains(&self, cell: &CellKey) -> bool {
        cell.floor == self.min.floor
            && (self.min.cx..=self.max.cx).contains(&cell.cx)
            && (self.min.cz..=self.max.cz).contains(&cell.cz)
    }

    fn intersects(&self, other: &Self) -> bool {
        self.min.floor == other.min.floor
            && self.min.cx <= other.max.cx
            && other.min.cx <= self.max.cx
            && self.min.cz <= other.max.cz
            && other.min.cz <= self.max.cz
    }

    /// Every cell in the range, produced lazily.
    fn iter(self) -> impl Iterator<Item = CellKey> {
        let floor = self.min.floor;
        (self.min.cx..=self.max.cx)
            .flat_map(move |cx| (self.min.cz..=self.max.cz).map(move |cz| CellKey::new(cx, floor, cz)))
    }
}

/// Occupancy summary returned by [`SpatialHash::stats`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// Number of non-empty cells.
    pub cells: usize,
    /// Sum of list lengths over all cells (an entity spanning N cells counts N times).
    pub total_items: usize,
    /// Placements too large for the grid, held in the overflow list.
    pub oversize: usize,
}

/// Uniform grid over the plan, one layer per floor.
///
/// Each placement is identified by `(key, floor)` and stored once; cells hold
/// slot indices into that storage. The placement's bounds are kept with it, so
/// [`remove`](Self::remove) clears exactly the cells that
/// [`insert`](Self::insert) touched without the caller repeating the bounds.
///
/// Work per call is bounded by the occupied cells, never by the area of the
/// bounds passed in. Placements spanning more than [`MAX_GRID_CELLS`] cells
/// are matched by range against each query instead of being written out.
///
/// Coordinates may be negative; cells are found by floor division.
pub struct SpatialHash<K, D> {
    cell_size: f64,
    entries: Vec<Option<Entry<K, D>>>,
    free_list: Vec<usize>,
    slots: BTreeMap<(K, i32), usize>,
    cells: BTreeMap<CellKey, Vec<usize>>,
    oversize: BTreeSet<usize>,
}

impl<K: Ord + Clone, D> Default for SpatialHash<K, D> {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

impl<K, D> Debug for SpatialHash<K, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let alive = self.entries.iter().filter(|e| e.is_some()).count();
        f.debug_struct("SpatialHash")
            .field("cell_size", &self.cell_size)
            .field("total_slots", &self.entries.len())
            .field("alive", &alive)
            .field("cells", &self.cells.len())
            .field("oversize", &self.oversize.len())
            .finish_non_exhaustive()
    }
}

impl<K: Ord + Clone, D> SpatialHash<K, D> {
    /// Create an empty hash with the given cell size.
    ///
    /// A cell size that is not a finite positive number is replaced by
    /// [`DEFAULT_CELL_SIZE`].
    pub fn new(cell_size: f64) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            DEFAULT_CELL_SIZE
        };
        Self {
            cell_size,
            entries: Vec::new(),
            free_list: Vec::new(),
            slots: BTreeMap::new(),
            cells: BTreeMap::new(),
            oversize: BTreeSet::new(),
        }
    }

    /// Cell edge length.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// The cell containing a point on a floor.
    pub fn cell_of(&self, x: f64, floor: i32, z: f64) -> CellKey {
        CellKey::new(
            cell_index(x, self.cell_size),
            floor,
            cell_index(z, self.cell_size),
        )
    }

    fn range_of(&self, bounds: &Bounds, floor: i32) -> CellRange {
        CellRange {
            min: self.cell_of(bounds.min_x, floor, bounds.min_z),
            max: self.cell_of(bounds.max_x, floor, bounds.max_z),
        }
    }

    /// Insert a placement of `key` on `floor`, appending it to every cell its
    /// bounds touch. Re-inserting the same `(key, floor)` replaces the prior
    /// placement and returns its data.
    pub fn insert(&mut self, key: K, bounds: Bounds, floor: i32, data: D) -> Option<D> {
        let previous = self.remove(&key, floor);
        let cells = self.range_of(&bounds, floor);
        let entry = Entry {
            key: key.clone(),
            floor,
            bounds,
            cells,
            data,
        };
        let slot = if let Some(slot) = self.free_list.pop() {
            self.entries[slot] = Some(entry);
            slot
        } else {
            self.entries.push(Some(entry));
            self.entries.len() - 1
        };
        self.slots.insert((key, floor), slot);
        if cells.count() > MAX_GRID_CELLS {
            self.oversize.insert(slot);
        } else {
            for cell in cells.iter() {
                self.cells.entry(cell).or_default().push(slot);
            }
        }
        previous
    }

    /// Remove the placement of `key` on `floor`, deleting any cell left empty.
    pub fn remove(&mut self, key: &K, floor: i32) -> Option<D> {
        let slot = self.slots.remove(&(key.clone(), floor))?;
        let entry = self.entries.get_mut(slot)?.take()?;
        if !self.oversize.remove(&slot) {
            for cell in entry.cells.iter() {
                if let Some(list) = self.cells.get_mut(&cell) {
                    list.retain(|&s| s != slot);
                    if list.is_empty() {
                        self.cells.remove(&cell);
                    }
                }
            }
        }
        self.free_list.push(slot);
        Some(entry.data)
    }

    /// Bounds and data of a placement, if present.
    pub fn get(&self, key: &K, floor: i32) -> Option<(&Bounds, &D)> {
        let slot = *self.slots.get(&(key.clone(), floor))?;
        self.entry(slot).map(|e| (&e.bounds, &e.data))
    }

    /// Drop every placement and cell.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.free_list.clear();
        self.slots.clear();
        self.cells.clear();
        self.oversize.clear();
    }

    /// Number of live placements.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Cell and item counts.
    pub fn stats(&self) -> Stats {
        Stats {
            cells: self.cells.len(),
            total_items: self.cells.values().map(Vec::len).sum(),
            oversize: self.oversize.len(),
        }
    }

    /// Everything registered in the cell containing `(x, z)` on `floor`.
    ///
    /// This is a cell lookup, not an exact containment test: entities whose
    /// bounds touch the cell are returned even if they miss the point itself.
    pub fn query_point(&self, x: f64, floor: i32, z: f64) -> impl Iterator<Item = (&K, &D)> + '_ {
        let key = self.cell_of(x, floor, z);
        let gridded = self
            .cells
            .get(&key)
            .into_iter()
            .flatten()
            .filter_map(move |&slot| self.entry(slot));
        let large = self
            .oversize
            .iter()
            .filter_map(move |&slot| self.entry(slot))
            .filter(move |e| e.cells.contains(&key));
        gridded.chain(large).map(|e| (&e.key, &e.data))
    }

    /// Everything registered in any cell the box covers on `floor`.
    ///
    /// Each placement appears once no matter how many cells it spans. Results
    /// come back in slot order, which after a fresh rebuild is insertion order.
    pub fn query_box(
        &self,
        x1: f64,
        floor: i32,
        z1: f64,
        x2: f64,
        z2: f64,
    ) -> impl Iterator<Item = (&K, &D)> + '_ {
        let range = self.range_of(&Bounds::new(x1, z1, x2, z2), floor);
        let mut seen = BTreeSet::new();
        if range.count() <= self.cells.len() as u64 {
            for cell in range.iter() {
                if let Some(list) = self.cells.get(&cell) {
                    seen.extend(list.iter().copied());
                }
            }
        } else {
            // Cheaper to walk the occupied cells in the column band.
            let lo = CellKey::new(range.min.cx, i32::MIN, i64::MIN);
            let hi = CellKey::new(range.max.cx, i32::MAX, i64::MAX);
            for (cell, list) in self.cells.range(lo..=hi) {
                if range.contains(cell) {
                    seen.extend(list.iter().copied());
                }
            }
        }
        for &slot in &self.oversize {
            if self.entry(slot).is_some_and(|e| e.cells.intersects(&range)) {
                seen.insert(slot);
            }
        }
        seen.into_iter()
            .filter_map(move |slot| self.entry(slot))
            .map(|e| (&e.key, &e.data))
    }

    /// Iterate all live placements as `(key, floor, bounds, data)`.
    pub fn iter(&self) -> impl Iterator<Item = (&K, i32, &Bounds, &D)> + '_ {
        self.entries
            .iter()
            .flatten()
            .map(|e| (&e.key, e.floor, &e.bounds, &e.data))
    }

    fn entry(&self, slot: usize) -> Option<&Entry<K, D>> {
        self.entries.get(slot).and_then(Option::as_ref)
    }
}

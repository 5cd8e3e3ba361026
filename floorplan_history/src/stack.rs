// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Undo/redo stacks over an explicit context.
//!
//! ## Usage
//!
//! 1) Perform the mutation on your context.
//! 2) [`History::push`] an [`Entry`] whose closures reapply or revert it.
//! 3) Call [`History::undo`] / [`History::redo`] with the same context.
//!
//! ## Minimal example
//!
//! ```
//! use floorplan_history::{Entry, History};
//!
//! let mut doc: Vec<&str> = Vec::new();
//! let mut history: History<Vec<&str>> = History::new();
//!
//! doc.push("sofa");
//! history.push(Entry::new(
//!     "Place sofa",
//!     |d: &mut Vec<&str>| { d.retain(|x| *x != "sofa"); },
//!     |d: &mut Vec<&str>| { if !d.contains(&"sofa") { d.push("sofa"); } },
//! ));
//!
//! assert_eq!(history.undo(&mut doc), Some("Place sofa"));
//! assert!(doc.is_empty());
//! assert_eq!(history.redo(&mut doc), Some("Place sofa"));
//! assert_eq!(doc, ["sofa"]);
//! ```

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::string::String;

/// Default number of entries kept on the undo stack.
pub const DEFAULT_CAPACITY: usize = 50;

type Action<C> = Box<dyn Fn(&mut C)>;

/// One reversible step.
///
/// The closures receive the context mutably instead of capturing it, so an
/// entry can own copies of the before/after state it needs.
///
/// Closures must not panic and should be no-ops when their preconditions no
/// longer hold (for example the record they restore was already re-added by
/// another path). The stack does not check this.
pub struct Entry<C> {
    label: String,
    undo: Action<C>,
    redo: Action<C>,
}

impl<C> Entry<C> {
    /// Create an entry from a label and its undo/redo closures.
    pub fn new(
        label: impl Into<String>,
        undo: impl Fn(&mut C) + 'static,
        redo: impl Fn(&mut C) + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            undo: Box::new(undo),
            redo: Box::new(redo),
        }
    }

    /// Human-readable label, e.g. `"Move Sofa"`.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<C> core::fmt::Debug for Entry<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Entry")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Bounded undo stack plus redo stack.
///
/// - Pushing clears the redo stack.
/// - Past capacity the oldest undo entry is silently dropped.
/// - Undo/redo on an empty stack returns `None` and does nothing.
pub struct History<C> {
    undo: VecDeque<Entry<C>>,
    redo: VecDeque<Entry<C>>,
    capacity: usize,
}

impl<C> Default for History<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> core::fmt::Debug for History<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("History")
            .field("undo", &self.undo.len())
            .field("redo", &self.redo.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl<C> History<C> {
    /// Create a history holding up to [`DEFAULT_CAPACITY`] undo entries.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a history with an explicit undo depth (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Maximum undo depth.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record a step that has already been applied.
    pub fn push(&mut self, entry: Entry<C>) {
        self.undo.push_back(entry);
        while self.undo.len() > self.capacity {
            self.undo.pop_front();
        }
        self.redo.clear();
    }

    /// Revert the most recent step. Returns its label, or `None` if there is nothing to undo.
    pub fn undo(&mut self, ctx: &mut C) -> Option<&str> {
        let entry = self.undo.pop_back()?;
        (entry.undo)(ctx);
        self.redo.push_back(entry);
        self.redo.back().map(Entry::label)
    }

    /// Reapply the most recently undone step. Returns its label, or `None` if there is nothing to redo.
    pub fn redo(&mut self, ctx: &mut C) -> Option<&str> {
        let entry = self.redo.pop_back()?;
        (entry.redo)(ctx);
        self.undo.push_back(entry);
        self.undo.back().map(Entry::label)
    }

    /// Whether [`undo`](Self::undo) would do anything.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether [`redo`](Self::redo) would do anything.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of undoable entries.
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Number of redoable entries.
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Label of the entry [`undo`](Self::undo) would revert.
    pub fn peek_undo(&self) -> Option<&str> {
        self.undo.back().map(Entry::label)
    }

    /// Drop both stacks.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::vec::Vec;

    fn set(value: i32, prev: i32) -> Entry<i32> {
        Entry::new(
            format!("set {value}"),
            move |c: &mut i32| *c = prev,
            move |c: &mut i32| *c = value,
        )
    }

    #[test]
    fn undo_then_redo_restores_both_ends() {
        let mut h = History::new();
        let mut v = 0;
        for n in 1..=3 {
            let prev = v;
            v = n;
            h.push(set(n, prev));
        }
        for _ in 0..3 {
            assert!(h.undo(&mut v).is_some());
        }
        assert_eq!(v, 0);
        assert_eq!(h.undo(&mut v), None);
        for _ in 0..3 {
            assert!(h.redo(&mut v).is_some());
        }
        assert_eq!(v, 3);
        assert_eq!(h.redo(&mut v), None);
    }

    #[test]
    fn push_clears_redo() {
        let mut h = History::new();
        let mut v = 1;
        h.push(set(1, 0));
        assert_eq!(h.undo(&mut v), Some("set 1"));
        assert!(h.can_redo());
        v = 5;
        h.push(set(5, 0));
        assert!(!h.can_redo());
        assert_eq!(h.redo(&mut v), None);
        assert_eq!(v, 5);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut h = History::new();
        let mut v = 0;
        for n in 1..=51 {
            let prev = v;
            v = n;
            h.push(set(n, prev));
        }
        assert_eq!(h.undo_len(), 50);
        let mut labels = Vec::new();
        for _ in 0..51 {
            labels.push(h.undo(&mut v).map(alloc::string::String::from));
        }
        assert_eq!(labels[49].as_deref(), Some("set 2"));
        assert_eq!(labels[50], None);
        // The first step can no longer be reverted.
        assert_eq!(v, 1);
    }

    #[test]
    fn empty_stacks_are_no_ops() {
        let mut h: History<i32> = History::with_capacity(0);
        let mut v = 7;
        assert_eq!(h.capacity(), 1);
        assert_eq!(h.undo(&mut v), None);
        assert_eq!(h.redo(&mut v), None);
        assert_eq!(v, 7);
        assert_eq!(h.peek_undo(), None);
    }
}

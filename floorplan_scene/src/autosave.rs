// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debounced save timer.

use std::time::{Duration, Instant};

/// A single resettable deadline.
///
/// Each [`schedule`](Self::schedule) pushes the deadline out to
/// `now + debounce`; timers are never stacked. The owner polls
/// [`take_due`](Self::take_due) and saves when it returns true, so a burst of
/// edits produces exactly one save after the burst goes quiet.
#[derive(Clone, Debug)]
pub struct Autosave {
    debounce: Duration,
    deadline: Option<Instant>,
    saves: u64,
}

impl Autosave {
    /// A timer with the given quiet period.
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            deadline: None,
            saves: 0,
        }
    }

    /// Quiet period.
    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Request a save, restarting the quiet period.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.debounce);
    }

    /// When the pending save will run, if one is pending.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether a save is pending.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Disarm without saving.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// If the deadline has passed, disarm and return true.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(at) if at <= now => {
                self.deadline = None;
                self.saves += 1;
                true
            }
            _ => false,
        }
    }

    /// Disarm a pending save regardless of time and return whether there was one.
    pub fn take_pending(&mut self) -> bool {
        let pending = self.deadline.take().is_some();
        if pending {
            self.saves += 1;
        }
        pending
    }

    /// Number of saves handed out so far.
    pub fn save_count(&self) -> u64 {
        self.saves
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn burst_coalesces_into_one_save() {
        let t0 = Instant::now();
        let mut a = Autosave::new(1500 * MS);
        for i in 0..5 {
            a.schedule(t0 + i * 50 * MS);
        }
        // The window restarts at the last call (t0 + 200ms).
        assert!(!a.take_due(t0 + 1600 * MS));
        assert!(a.take_due(t0 + 1700 * MS));
        assert!(!a.take_due(t0 + 5000 * MS));
        assert_eq!(a.save_count(), 1);
    }

    #[test]
    fn flush_and_cancel() {
        let t0 = Instant::now();
        let mut a = Autosave::new(1500 * MS);
        assert!(!a.take_pending());
        a.schedule(t0);
        assert!(a.is_pending());
        a.cancel();
        assert!(!a.take_due(t0 + 10_000 * MS));
        a.schedule(t0);
        assert!(a.take_pending());
        assert_eq!(a.save_count(), 1);
        assert_eq!(a.deadline(), None);
    }
}

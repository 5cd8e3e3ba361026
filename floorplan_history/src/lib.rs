// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Floorplan History: a bounded undo/redo stack.
//!
//! ## Overview
//!
//! Each [`Entry`] pairs an undo closure with a redo closure and a label.
//! Closures act on a context `C` handed in at call time, so the stack itself
//! holds no references into the document it edits.
//!
//! ## Rules
//!
//! - [`History::push`] appends to the undo stack and clears the redo stack.
//! - The undo stack is capped (50 by default); the oldest entry falls off first.
//! - [`History::undo`] moves an entry to the redo stack after running its undo closure;
//!   [`History::redo`] is symmetric.
//! - Both return `None` without side effects when their stack is empty.
//!
//! The stack is single-threaded: entries are pushed and popped from the same
//! control flow that applied the original edit.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod stack;

pub use stack::{DEFAULT_CAPACITY, Entry, History};

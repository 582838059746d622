//! Infrastructure implementations for Confab.
//!
//! All state is volatile: the store lives in process memory and is
//! reinitialized (with seed data) on every start.

pub mod memory;

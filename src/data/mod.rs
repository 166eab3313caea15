//! Row loading
//!
//! Handles:
//! - Query result files (`{"rows": [...], ...}` wrapper with metadata)
//! - Bare JSON arrays of rows

pub mod loader;

pub use loader::*;

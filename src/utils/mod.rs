//! # Utilities Module
//!
//! Shared numeric helpers and grid reachability checks.

pub mod math;
pub mod reachability;

pub use math::*;
pub use reachability::*;

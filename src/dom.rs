//! Live DOM model
//!
//! This module provides access to grappelli-dom: the arena document hydration
//! mutates, the markup parser for server output and node snapshots.

// Re-export all grappelli-dom functionality
pub use grappelli_dom::*;

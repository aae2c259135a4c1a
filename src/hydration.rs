//! Hydration walker, repair policy and diagnostics
//!
//! This module provides access to grappelli-hydration.

// Re-export all grappelli-hydration functionality
pub use grappelli_hydration::*;

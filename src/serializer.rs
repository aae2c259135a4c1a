//! Attribute, style and text canonicalization
//!
//! This module provides access to grappelli-serializer, the single source of
//! truth for how values are rendered and compared on both render targets.

// Re-export all grappelli-serializer functionality
pub use grappelli_serializer::*;

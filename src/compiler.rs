//! Template compiler and renderers
//!
//! This module provides access to grappelli-compiler: lowering to server and
//! client programs, the server markup renderer and the client node tree.

// Re-export all grappelli-compiler functionality
pub use grappelli_compiler::*;

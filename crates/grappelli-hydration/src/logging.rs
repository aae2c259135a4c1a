//! Logging layer for hydration.
//!
//! Hydration logs through these macros instead of calling `tracing` directly,
//! so every event lands on the same target and a subscriber can filter the
//! whole engine with one directive (`grappelli::hydration=warn`).
//!
//! ## Macro Overview
//!
//! | Macro | Feature Required | Level |
//! |-------|------------------|-------|
//! | `debug_log!` | `debug-hooks` | `DEBUG` |
//! | `info_log!` | None | `INFO` |
//! | `warn_log!` | None | `WARN` |
//! | `error_log!` | None | `ERROR` |
//!
//! ## Example
//!
//! ```
//! use grappelli_hydration::{info_log, warn_log};
//!
//! info_log!(nodes = 3, "hydration started");
//! warn_log!("{}", "Hydration completed with errors.");
//! ```

#[doc(hidden)]
pub use tracing as __tracing;

/// Target of every event logged by this crate.
pub const LOG_TARGET: &str = "grappelli::hydration";

/// Logs a debug message (requires the `debug-hooks` feature).
///
/// Used for per-node tracing of a pass, which is too noisy to leave compiled
/// in by default.
#[macro_export]
#[cfg(feature = "debug-hooks")]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		$crate::logging::__tracing::debug!(target: $crate::logging::LOG_TARGET, $($arg)*);
	}};
}

/// No-op debug_log when `debug-hooks` is disabled
#[macro_export]
#[cfg(not(feature = "debug-hooks"))]
macro_rules! debug_log {
	($($arg:tt)*) => {{}};
}

/// Logs an info message.
#[macro_export]
macro_rules! info_log {
	($($arg:tt)*) => {{
		$crate::logging::__tracing::info!(target: $crate::logging::LOG_TARGET, $($arg)*);
	}};
}

/// Logs a warning message.
///
/// Every `warn` diagnostic is logged through this macro.
#[macro_export]
macro_rules! warn_log {
	($($arg:tt)*) => {{
		$crate::logging::__tracing::warn!(target: $crate::logging::LOG_TARGET, $($arg)*);
	}};
}

/// Logs an error message.
///
/// Every `error` diagnostic is logged through this macro.
#[macro_export]
macro_rules! error_log {
	($($arg:tt)*) => {{
		$crate::logging::__tracing::error!(target: $crate::logging::LOG_TARGET, $($arg)*);
	}};
}

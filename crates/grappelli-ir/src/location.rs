//! Source locations attached to IR nodes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of an IR node in its template source.
///
/// Lines and columns are 1-based. `Location::default()` (`0:0`) marks a node
/// built programmatically without a source position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
	/// 1-based line number.
	pub line: u32,
	/// 1-based column number.
	pub column: u32,
}

impl Location {
	/// Creates a location.
	pub const fn new(line: u32, column: u32) -> Self {
		Self { line, column }
	}

	/// Returns `true` if this location points into template source.
	pub fn is_known(&self) -> bool {
		self.line > 0
	}
}

impl fmt::Display for Location {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.line, self.column)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_display() {
		assert_eq!(Location::new(3, 14).to_string(), "3:14");
	}

	#[rstest]
	fn test_default_is_unknown() {
		assert!(!Location::default().is_known());
		assert!(Location::new(1, 1).is_known());
	}
}

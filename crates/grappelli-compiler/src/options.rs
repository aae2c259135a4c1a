//! Compiler options.
//!
//! Options deserialize from TOML the same way every other grappelli options
//! type does: missing keys take their defaults.
//!
//! ```toml
//! coalesce_text = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Options for compiling a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
	/// Whether adjacent text siblings share one buffer and one flush.
	///
	/// When disabled every text node flushes on its own. The rendered markup
	/// is identical after parsing, but the server emits one chunk per node.
	pub coalesce_text: bool,
}

impl Default for CompileOptions {
	fn default() -> Self {
		Self {
			coalesce_text: true,
		}
	}
}

impl CompileOptions {
	/// Creates new default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets text coalescing.
	pub fn coalesce_text(mut self, enable: bool) -> Self {
		self.coalesce_text = enable;
		self
	}

	/// Parses options from a TOML string.
	pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(source)?)
	}

	/// Loads options from a TOML file.
	pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&source)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::io::Write;

	#[rstest]
	#[case("", true)]
	#[case("coalesce_text = false", false)]
	fn test_from_toml_str(#[case] source: &str, #[case] expected: bool) {
		let options = CompileOptions::from_toml_str(source).unwrap();
		assert_eq!(options.coalesce_text, expected);
	}

	#[rstest]
	fn test_unknown_type_is_rejected() {
		let err = CompileOptions::from_toml_str("coalesce_text = \"yes\"").unwrap_err();
		assert!(matches!(err, ConfigError::Toml(_)));
	}

	#[rstest]
	fn test_from_toml_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "coalesce_text = false").unwrap();

		let options = CompileOptions::from_toml_file(file.path()).unwrap();
		assert_eq!(options, CompileOptions::new().coalesce_text(false));
	}

	#[rstest]
	fn test_missing_file() {
		let err = CompileOptions::from_toml_file("/nonexistent/grappelli.toml").unwrap_err();
		assert!(matches!(err, ConfigError::Io { .. }));
	}
}

//! Compile, render and configuration errors.

use grappelli_ir::{IrError, IrErrorKind, Location};
use std::path::PathBuf;
use thiserror::Error;

use crate::instruction::Target;

/// A template that cannot be compiled.
///
/// Compilation is all-or-nothing: no instructions are produced when this is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("compile error at {location}: {kind}")]
pub struct CompileError {
	/// Location of the offending IR node.
	pub location: Location,
	/// What is wrong with it.
	pub kind: CompileErrorKind,
}

impl CompileError {
	/// Creates a new compile error.
	pub fn new(location: Location, kind: CompileErrorKind) -> Self {
		Self { location, kind }
	}
}

/// The kind of compile error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CompileErrorKind {
	/// The IR failed structural validation.
	#[error(transparent)]
	Invalid(IrErrorKind),
}

impl From<IrError> for CompileError {
	fn from(err: IrError) -> Self {
		Self::new(err.location, CompileErrorKind::Invalid(err.kind))
	}
}

/// A compiled program that cannot be executed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RenderError {
	/// The program was compiled for the other target.
	#[error("program compiled for {found} cannot run on the {expected} renderer")]
	WrongTarget { expected: Target, found: Target },
	/// `for:each` over something that is not an array.
	#[error("cannot iterate over {expression}: value is {found}")]
	NotIterable {
		expression: String,
		found: &'static str,
	},
	/// A control-flow instruction claims more instructions than remain.
	#[error("instruction {index} spans past the end of its block")]
	MalformedProgram { index: usize },
	/// A close instruction without a matching open.
	#[error("unbalanced </{tag}>")]
	UnbalancedClose { tag: String },
	/// A DOM operation failed while mounting client output.
	#[error(transparent)]
	Dom(#[from] grappelli_dom::DomError),
}

/// Options that cannot be loaded.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
	/// The options file could not be read.
	#[error("failed to read {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	/// The options are not valid TOML for this type.
	#[error("invalid options: {0}")]
	Toml(#[from] toml::de::Error),
}

/// Result type for compilation.
pub type Result<T> = std::result::Result<T, CompileError>;

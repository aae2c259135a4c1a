//! IR validation errors.

use crate::location::Location;
use thiserror::Error;

/// An IR node that cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}: {kind}")]
pub struct IrError {
	/// Location of the offending node.
	pub location: Location,
	/// What is wrong with it.
	pub kind: IrErrorKind,
}

impl IrError {
	/// Creates a new IR error.
	pub fn new(location: Location, kind: IrErrorKind) -> Self {
		Self { location, kind }
	}
}

/// The kind of IR error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum IrErrorKind {
	/// Tag name is empty or contains invalid characters.
	#[error("invalid tag name: {0:?}")]
	InvalidTagName(String),
	/// Attribute name is empty or contains invalid characters.
	#[error("invalid attribute {name:?} on <{element}>")]
	InvalidAttributeName { element: String, name: String },
	/// Same attribute given twice (case-insensitive).
	#[error("duplicate attribute {name:?} on <{element}>")]
	DuplicateAttribute { element: String, name: String },
	/// Void element with child nodes.
	#[error("void element <{0}> cannot have children")]
	VoidElementWithChildren(String),
	/// Slot name given as an expression or boolean.
	#[error("slot name must be a literal string")]
	NonLiteralSlotName,
	/// `for:item` / `for:index` binding is not a plain identifier.
	#[error("invalid {binding} binding {name:?}: expected an identifier")]
	InvalidBinding { binding: &'static str, name: String },
	/// `for:item` and `for:index` bind the same name.
	#[error("for:item and for:index both bind {0:?}")]
	DuplicateBinding(String),
	/// An `if` chain with no branches.
	#[error("conditional chain has no branches")]
	EmptyChain,
	/// An `else` branch that is not the last branch of its chain.
	#[error("branch {position} has no condition but is not the last branch")]
	MisplacedElse { position: usize },
}

/// Result type for IR validation.
pub type Result<T> = std::result::Result<T, IrError>;

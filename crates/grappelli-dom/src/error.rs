//! DOM and markup parsing errors.

use crate::document::NodeId;
use thiserror::Error;

/// A DOM operation that cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DomError {
	/// The id does not belong to this document.
	#[error("unknown node {0}")]
	UnknownNode(NodeId),
	/// The node cannot have children.
	#[error("node {0} cannot have children")]
	NotAContainer(NodeId),
	/// The operation requires an element.
	#[error("node {0} is not an element")]
	NotAnElement(NodeId),
	/// The operation requires a text or comment node.
	#[error("node {0} has no character data")]
	NotCharacterData(NodeId),
	/// The node already has a parent.
	#[error("node {0} is already attached")]
	AlreadyAttached(NodeId),
	/// The node is not a child of the given parent.
	#[error("node {child} is not a child of {parent}")]
	NotAChild { parent: NodeId, child: NodeId },
	/// Inserting the node would make it its own ancestor.
	#[error("inserting {child} under {parent} would create a cycle")]
	Cycle { parent: NodeId, child: NodeId },
}

/// Markup the HTML tree builder had to recover from.
///
/// Only [`parse_fragment_strict`](crate::parse_fragment_strict) returns this;
/// the lenient parser recovers the way a browser does.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
	"markup needed {} recoveries, first: {}",
	.errors.len(),
	.errors.first().map_or("none", String::as_str)
)]
pub struct ParseError {
	/// Parse errors in the order the tree builder reported them.
	pub errors: Vec<String>,
}

/// Result type for DOM operations.
pub type Result<T> = std::result::Result<T, DomError>;

//! Mismatch records.
//!
//! A [`Mismatch`] is created by the walker, classified by the policy and
//! turned into a diagnostic in the same step. Records are kept in the pass
//! report and never outlive it.

use std::fmt;

/// What diverged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MismatchKind {
	/// A non-style attribute has a different canonical value.
	AttributeValue,
	/// The `style` attribute has a different declaration list.
	StyleValue,
	/// A node is expected but a different node, or none, was found.
	MissingNode,
	/// A node was found where none is expected.
	ExtraNode,
	/// A text node has different canonical content.
	TextValue,
}

impl MismatchKind {
	/// Returns `true` for node-presence and node-kind divergences.
	pub fn is_structural(self) -> bool {
		matches!(self, Self::MissingNode | Self::ExtraNode)
	}
}

impl fmt::Display for MismatchKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::AttributeValue => "attribute-value",
			Self::StyleValue => "style-value",
			Self::MissingNode => "missing-node",
			Self::ExtraNode => "extra-node",
			Self::TextValue => "text-value",
		})
	}
}

/// Position of a node in the expected tree, as child indices from the
/// hydration root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodeLocator {
	path: Vec<usize>,
}

impl NodeLocator {
	/// Creates a locator from child indices.
	pub fn new(path: impl Into<Vec<usize>>) -> Self {
		Self { path: path.into() }
	}

	/// Child indices from the root.
	pub fn path(&self) -> &[usize] {
		&self.path
	}

	/// Nesting depth. The root's children are at depth 1.
	pub fn depth(&self) -> usize {
		self.path.len()
	}
}

/// `/0/2/1`; the root itself is `/`.
impl fmt::Display for NodeLocator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.path.is_empty() {
			return f.write_str("/");
		}
		for index in &self.path {
			write!(f, "/{index}")?;
		}
		Ok(())
	}
}

/// One divergence between the live tree and the expected tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
	/// Where in the expected tree.
	pub locator: NodeLocator,
	/// What diverged.
	pub kind: MismatchKind,
	/// The element the message is about: the element itself for attribute
	/// mismatches, the parent for text and structural mismatches.
	pub subject: String,
	/// Attribute name, for attribute and style mismatches.
	pub name: Option<String>,
	/// Expected canonical value or node descriptor. `None` means absent.
	pub expected: Option<String>,
	/// Value or node descriptor found in the live tree. `None` means absent.
	pub found: Option<String>,
}

impl Mismatch {
	/// An attribute (or style) value mismatch on `subject`.
	pub fn attribute(
		locator: NodeLocator,
		subject: impl Into<String>,
		name: impl Into<String>,
		expected: Option<String>,
		found: Option<String>,
	) -> Self {
		let name = name.into();
		let kind = if name.eq_ignore_ascii_case("style") {
			MismatchKind::StyleValue
		} else {
			MismatchKind::AttributeValue
		};
		Self {
			locator,
			kind,
			subject: subject.into(),
			name: Some(name),
			expected,
			found,
		}
	}

	/// A text mismatch inside `subject`.
	pub fn text(
		locator: NodeLocator,
		subject: impl Into<String>,
		expected: impl Into<String>,
		found: impl Into<String>,
	) -> Self {
		Self {
			locator,
			kind: MismatchKind::TextValue,
			subject: subject.into(),
			name: None,
			expected: Some(expected.into()),
			found: Some(found.into()),
		}
	}

	/// An expected node that is absent or of the wrong kind inside `subject`.
	pub fn missing(
		locator: NodeLocator,
		subject: impl Into<String>,
		expected: impl Into<String>,
		found: Option<String>,
	) -> Self {
		Self {
			locator,
			kind: MismatchKind::MissingNode,
			subject: subject.into(),
			name: None,
			expected: Some(expected.into()),
			found,
		}
	}

	/// An unexpected live node inside `subject`.
	pub fn extra(locator: NodeLocator, subject: impl Into<String>, found: impl Into<String>) -> Self {
		Self {
			locator,
			kind: MismatchKind::ExtraNode,
			subject: subject.into(),
			name: None,
			expected: None,
			found: Some(found.into()),
		}
	}
}

//! Point-in-time captures of live nodes.
//!
//! A [`Snapshot`] records a node's identity and its observable values before
//! hydration mutates anything, so tests can assert afterwards whether a node
//! was patched in place or replaced.

use std::fmt;

use indexmap::IndexMap;

use crate::document::{Document, NodeId, NodeKind};
use crate::error::{DomError, Result};

/// Immutable capture of a node and its subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
	id: NodeId,
	tag: Option<String>,
	text: Option<String>,
	attributes: IndexMap<String, String>,
	children: Vec<Snapshot>,
}

impl Snapshot {
	/// Captures `id` and its descendants.
	pub fn capture(doc: &Document, id: NodeId) -> Result<Self> {
		let kind = doc.kind(id).ok_or(DomError::UnknownNode(id))?;
		let (tag, text, attributes) = match kind {
			NodeKind::Element(data) => (Some(data.tag.clone()), None, data.attributes.clone()),
			NodeKind::Text(text) | NodeKind::Comment(text) => (None, Some(text.clone()), IndexMap::new()),
			NodeKind::Document => (None, None, IndexMap::new()),
		};
		let children = doc
			.children(id)
			.iter()
			.map(|&child| Self::capture(doc, child))
			.collect::<Result<Vec<_>>>()?;
		Ok(Self {
			id,
			tag,
			text,
			attributes,
			children,
		})
	}

	/// The captured node's id.
	pub fn id(&self) -> NodeId {
		self.id
	}

	/// The captured tag, for elements.
	pub fn tag(&self) -> Option<&str> {
		self.tag.as_deref()
	}

	/// The captured character data, for text and comments.
	pub fn text(&self) -> Option<&str> {
		self.text.as_deref()
	}

	/// A captured attribute value.
	pub fn attribute(&self, name: &str) -> Option<&str> {
		self.attributes
			.get(&name.to_ascii_lowercase())
			.map(String::as_str)
	}

	/// Captured children.
	pub fn children(&self) -> &[Snapshot] {
		&self.children
	}

	/// First captured descendant element with the given tag, in document order.
	pub fn find(&self, tag: &str) -> Option<&Snapshot> {
		self.children.iter().find_map(|child| {
			if child.tag().is_some_and(|t| t.eq_ignore_ascii_case(tag)) {
				Some(child)
			} else {
				child.find(tag)
			}
		})
	}

	/// Returns `true` if `current` is still the captured node and is still
	/// attached to the document.
	pub fn is_same_node(&self, doc: &Document, current: NodeId) -> bool {
		self.id == current && doc.is_attached(current)
	}

	/// Returns `true` if the live node still exists at the same id with the
	/// same observable values (attributes, text and child structure).
	pub fn matches(&self, doc: &Document) -> bool {
		Self::capture(doc, self.id).is_ok_and(|now| now == *self) && doc.is_attached(self.id)
	}

	fn render_into(&self, depth: usize, out: &mut Vec<String>) {
		let indent = "  ".repeat(depth);
		let line = match (&self.tag, &self.text) {
			(Some(tag), _) => {
				let attrs: String = self
					.attributes
					.iter()
					.map(|(name, value)| format!(" {name}={value:?}"))
					.collect();
				format!("{indent}<{tag}{attrs}>")
			}
			(None, Some(text)) => format!("{indent}{text:?}"),
			(None, None) => format!("{indent}#document"),
		};
		out.push(line);
		for child in &self.children {
			child.render_into(depth + 1, out);
		}
	}
}

impl fmt::Display for Snapshot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut lines = Vec::new();
		self.render_into(0, &mut lines);
		f.write_str(&lines.join("\n"))
	}
}

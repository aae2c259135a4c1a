//! Arena-backed live DOM.
//!
//! Nodes live in a single arena owned by the [`Document`] and are addressed by
//! [`NodeId`]. Ids are never reused: a removed or replaced node keeps its slot
//! but is no longer attached, so a handle held across a replacement is
//! detectably stale.

use std::fmt;

use indexmap::IndexMap;

use crate::error::{DomError, Result};

/// Handle to a node in a [`Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
	fn index(self) -> usize {
		self.0 as usize
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Node payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
	/// The document root.
	Document,
	/// An element.
	Element(ElementData),
	/// A text node.
	Text(String),
	/// A comment.
	Comment(String),
}

/// Tag and attributes of an element.
///
/// Tag and attribute names are stored lowercased. Attribute order is kept for
/// serialization but never matters for comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
	/// Lowercased tag name.
	pub tag: String,
	/// Attributes keyed by lowercased name.
	pub attributes: IndexMap<String, String>,
}

#[derive(Debug, Clone)]
struct NodeSlot {
	kind: NodeKind,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
}

/// A live DOM tree.
#[derive(Debug, Clone)]
pub struct Document {
	nodes: Vec<NodeSlot>,
	mutations: u64,
}

impl Default for Document {
	fn default() -> Self {
		Self::new()
	}
}

impl Document {
	/// Creates a document containing only its root node.
	pub fn new() -> Self {
		Self {
			nodes: vec![NodeSlot {
				kind: NodeKind::Document,
				parent: None,
				children: Vec::new(),
			}],
			mutations: 0,
		}
	}

	/// The document root.
	pub fn root(&self) -> NodeId {
		NodeId(0)
	}

	/// Number of mutations applied since creation.
	///
	/// Node creation does not count; attaching, detaching and changing
	/// attributes or text does.
	pub fn mutation_count(&self) -> u64 {
		self.mutations
	}

	fn alloc(&mut self, kind: NodeKind) -> NodeId {
		let id = NodeId(self.nodes.len() as u32);
		self.nodes.push(NodeSlot {
			kind,
			parent: None,
			children: Vec::new(),
		});
		id
	}

	/// Allocates a node and appends it under `parent` while a parser builds
	/// the document. Not counted as a mutation.
	pub(crate) fn push_parsed(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
		let id = self.alloc(kind);
		if let Some(slot) = self.nodes.get_mut(id.index()) {
			slot.parent = Some(parent);
		}
		if let Some(slot) = self.nodes.get_mut(parent.index()) {
			slot.children.push(id);
		}
		id
	}

	fn slot(&self, id: NodeId) -> Result<&NodeSlot> {
		self.nodes.get(id.index()).ok_or(DomError::UnknownNode(id))
	}

	fn slot_mut(&mut self, id: NodeId) -> Result<&mut NodeSlot> {
		self.nodes.get_mut(id.index()).ok_or(DomError::UnknownNode(id))
	}

	/// Creates a detached element.
	pub fn create_element(&mut self, tag: &str) -> NodeId {
		self.alloc(NodeKind::Element(ElementData {
			tag: tag.to_ascii_lowercase(),
			attributes: IndexMap::new(),
		}))
	}

	/// Creates a detached text node.
	pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
		self.alloc(NodeKind::Text(text.into()))
	}

	/// Creates a detached comment node.
	pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
		self.alloc(NodeKind::Comment(text.into()))
	}

	/// Returns a node's payload.
	pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
		self.nodes.get(id.index()).map(|slot| &slot.kind)
	}

	/// Returns an element's data.
	pub fn element(&self, id: NodeId) -> Option<&ElementData> {
		match self.kind(id)? {
			NodeKind::Element(data) => Some(data),
			_ => None,
		}
	}

	/// Returns an element's tag name.
	pub fn tag(&self, id: NodeId) -> Option<&str> {
		self.element(id).map(|data| data.tag.as_str())
	}

	/// Returns `true` if `id` is an element.
	pub fn is_element(&self, id: NodeId) -> bool {
		self.element(id).is_some()
	}

	/// Returns an attribute value (name is case-insensitive).
	pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
		let data = self.element(id)?;
		match data.attributes.get(name) {
			Some(value) => Some(value.as_str()),
			None => data
				.attributes
				.get(&name.to_ascii_lowercase())
				.map(String::as_str),
		}
	}

	/// Returns all attributes of an element.
	pub fn attributes(&self, id: NodeId) -> Option<&IndexMap<String, String>> {
		self.element(id).map(|data| &data.attributes)
	}

	/// Sets an attribute, replacing any previous value.
	pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> Result<()> {
		match &mut self.slot_mut(id)?.kind {
			NodeKind::Element(data) => {
				data.attributes.insert(name.to_ascii_lowercase(), value.into());
			}
			_ => return Err(DomError::NotAnElement(id)),
		}
		self.mutations += 1;
		Ok(())
	}

	/// Removes an attribute. Returns the previous value, if any.
	pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<Option<String>> {
		let removed = match &mut self.slot_mut(id)?.kind {
			NodeKind::Element(data) => data.attributes.shift_remove(&name.to_ascii_lowercase()),
			_ => return Err(DomError::NotAnElement(id)),
		};
		if removed.is_some() {
			self.mutations += 1;
		}
		Ok(removed)
	}

	/// Returns the character data of a text or comment node.
	pub fn text(&self, id: NodeId) -> Option<&str> {
		match self.kind(id)? {
			NodeKind::Text(text) | NodeKind::Comment(text) => Some(text),
			_ => None,
		}
	}

	/// Returns `true` if `id` is a text node.
	pub fn is_text(&self, id: NodeId) -> bool {
		matches!(self.kind(id), Some(NodeKind::Text(_)))
	}

	/// Returns `true` if `id` is a comment.
	pub fn is_comment(&self, id: NodeId) -> bool {
		matches!(self.kind(id), Some(NodeKind::Comment(_)))
	}

	/// Replaces the character data of a text or comment node.
	pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<()> {
		match &mut self.slot_mut(id)?.kind {
			NodeKind::Text(data) | NodeKind::Comment(data) => *data = text.into(),
			_ => return Err(DomError::NotCharacterData(id)),
		}
		self.mutations += 1;
		Ok(())
	}

	/// Returns a node's children (empty for unknown ids and leaves).
	pub fn children(&self, id: NodeId) -> &[NodeId] {
		self.nodes
			.get(id.index())
			.map(|slot| slot.children.as_slice())
			.unwrap_or(&[])
	}

	/// Returns a node's parent.
	pub fn parent(&self, id: NodeId) -> Option<NodeId> {
		self.nodes.get(id.index())?.parent
	}

	/// Returns `true` if `id` is connected to the document root.
	pub fn is_attached(&self, id: NodeId) -> bool {
		let mut current = id;
		loop {
			if current == self.root() {
				return true;
			}
			match self.parent(current) {
				Some(parent) => current = parent,
				None => return false,
			}
		}
	}

	fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<()> {
		match self.slot(parent)?.kind {
			NodeKind::Document | NodeKind::Element(_) => {}
			_ => return Err(DomError::NotAContainer(parent)),
		}
		if self.slot(child)?.parent.is_some() {
			return Err(DomError::AlreadyAttached(child));
		}
		let mut ancestor = Some(parent);
		while let Some(current) = ancestor {
			if current == child {
				return Err(DomError::Cycle { parent, child });
			}
			ancestor = self.parent(current);
		}
		Ok(())
	}

	fn position_of(&self, parent: NodeId, child: NodeId) -> Result<usize> {
		self.slot(parent)?
			.children
			.iter()
			.position(|&c| c == child)
			.ok_or(DomError::NotAChild { parent, child })
	}

	/// Appends a detached node to `parent`.
	pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
		self.check_insert(parent, child)?;
		self.slot_mut(parent)?.children.push(child);
		self.slot_mut(child)?.parent = Some(parent);
		self.mutations += 1;
		Ok(())
	}

	/// Inserts a detached node before `reference`, a child of `parent`.
	pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> Result<()> {
		self.check_insert(parent, child)?;
		let index = self.position_of(parent, reference)?;
		self.slot_mut(parent)?.children.insert(index, child);
		self.slot_mut(child)?.parent = Some(parent);
		self.mutations += 1;
		Ok(())
	}

	/// Detaches `child` from `parent`. The node and its subtree stay in the
	/// arena but are no longer attached.
	pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
		let index = self.position_of(parent, child)?;
		self.slot_mut(parent)?.children.remove(index);
		self.slot_mut(child)?.parent = None;
		self.mutations += 1;
		Ok(())
	}

	/// Replaces `old` (a child of `parent`) with the detached node `new`.
	pub fn replace_child(&mut self, parent: NodeId, new: NodeId, old: NodeId) -> Result<()> {
		self.check_insert(parent, new)?;
		let index = self.position_of(parent, old)?;
		self.slot_mut(parent)?.children[index] = new;
		self.slot_mut(new)?.parent = Some(parent);
		self.slot_mut(old)?.parent = None;
		self.mutations += 1;
		Ok(())
	}

	/// Returns the first descendant element of `id` with the given tag, in
	/// document order.
	pub fn first_element_by_tag(&self, id: NodeId, tag: &str) -> Option<NodeId> {
		self.descendants(id)
			.find(|&node| self.tag(node).is_some_and(|t| t.eq_ignore_ascii_case(tag)))
	}

	/// Returns all descendant elements of `id` with the given tag.
	pub fn elements_by_tag(&self, id: NodeId, tag: &str) -> Vec<NodeId> {
		self.descendants(id)
			.filter(|&node| self.tag(node).is_some_and(|t| t.eq_ignore_ascii_case(tag)))
			.collect()
	}

	/// Iterates the descendants of `id` in document order (excluding `id`).
	pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
		let mut stack: Vec<NodeId> = self.children(id).to_vec();
		stack.reverse();
		Descendants { doc: self, stack }
	}

	/// Concatenated text of all descendant text nodes.
	pub fn text_content(&self, id: NodeId) -> String {
		if let Some(NodeKind::Text(text)) = self.kind(id) {
			return text.clone();
		}
		self.descendants(id)
			.filter_map(|node| match self.kind(node) {
				Some(NodeKind::Text(text)) => Some(text.as_str()),
				_ => None,
			})
			.collect()
	}
}

/// Depth-first iterator over descendants.
pub struct Descendants<'a> {
	doc: &'a Document,
	stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
	type Item = NodeId;

	fn next(&mut self) -> Option<NodeId> {
		let next = self.stack.pop()?;
		self.stack
			.extend(self.doc.children(next).iter().rev().copied());
		Some(next)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn sample() -> (Document, NodeId, NodeId, NodeId) {
		let mut doc = Document::new();
		let div = doc.create_element("DIV");
		let p = doc.create_element("p");
		let text = doc.create_text("hi");
		doc.append_child(doc.root(), div).unwrap();
		doc.append_child(div, p).unwrap();
		doc.append_child(p, text).unwrap();
		(doc, div, p, text)
	}

	#[rstest]
	fn test_tag_is_lowercased() {
		let (doc, div, _, _) = sample();
		assert_eq!(doc.tag(div), Some("div"));
	}

	#[rstest]
	fn test_attributes_are_case_insensitive() {
		let (mut doc, div, _, _) = sample();
		doc.set_attribute(div, "Data-Id", "7").unwrap();
		assert_eq!(doc.attribute(div, "data-id"), Some("7"));
		assert_eq!(doc.attribute(div, "DATA-ID"), Some("7"));
		assert_eq!(doc.remove_attribute(div, "DATA-id").unwrap(), Some("7".into()));
		assert_eq!(doc.attribute(div, "data-id"), None);
	}

	#[rstest]
	fn test_replace_child_detaches_old_node() {
		let (mut doc, div, p, text) = sample();
		let span = doc.create_element("span");
		doc.replace_child(div, span, p).unwrap();

		assert_eq!(doc.children(div), &[span]);
		assert!(!doc.is_attached(p));
		assert!(!doc.is_attached(text));
		assert!(doc.is_attached(span));
		// Ids are never reused.
		assert_ne!(doc.create_element("p"), p);
	}

	#[rstest]
	fn test_append_rejects_attached_node_and_cycles() {
		let (mut doc, div, p, text) = sample();
		assert_eq!(doc.append_child(div, p), Err(DomError::AlreadyAttached(p)));
		assert_eq!(doc.append_child(text, div), Err(DomError::NotAContainer(text)));

		doc.remove_child(doc.root(), div).unwrap();
		assert_eq!(doc.append_child(p, div), Err(DomError::Cycle { parent: p, child: div }));
	}

	#[rstest]
	fn test_insert_before() {
		let (mut doc, div, p, _) = sample();
		let first = doc.create_text("first");
		doc.insert_before(div, first, p).unwrap();
		assert_eq!(doc.children(div), &[first, p]);
	}

	#[rstest]
	fn test_descendants_in_document_order() {
		let (mut doc, div, p, text) = sample();
		let em = doc.create_element("em");
		doc.append_child(div, em).unwrap();

		let order: Vec<_> = doc.descendants(doc.root()).collect();
		assert_eq!(order, vec![div, p, text, em]);
		assert_eq!(doc.first_element_by_tag(doc.root(), "EM"), Some(em));
		assert_eq!(doc.text_content(div), "hi");
	}

	#[rstest]
	fn test_mutation_count() {
		let (mut doc, div, _, text) = sample();
		let before = doc.mutation_count();
		doc.set_text(text, "yo").unwrap();
		doc.set_attribute(div, "id", "x").unwrap();
		assert_eq!(doc.remove_attribute(div, "missing").unwrap(), None);
		assert_eq!(doc.mutation_count(), before + 2);
	}

	#[rstest]
	fn test_unknown_node() {
		let mut doc = Document::new();
		let other = {
			let mut bigger = Document::new();
			bigger.create_element("a");
			bigger.create_element("b")
		};
		assert_eq!(doc.set_text(other, "x"), Err(DomError::UnknownNode(other)));
		assert!(doc.children(other).is_empty());
	}
}

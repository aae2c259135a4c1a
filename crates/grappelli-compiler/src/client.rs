//! Client renderer: executes a client program into an expected node tree.
//!
//! The tree holds canonical attribute values and merges adjacent text the way
//! an HTML parser merges adjacent character data, so it can be compared node
//! for node against a document parsed from server markup.

use std::fmt;

use grappelli_dom::{Document, DomError, NodeId, to_markup};
use indexmap::IndexMap;

use crate::error::RenderError;
use crate::instruction::{CompiledTemplate, Target};
use crate::render::{RenderVisitor, execute};
use crate::scope::RenderScope;

/// An expected element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VElement {
	/// Lowercase tag name.
	pub tag: String,
	/// Canonical attribute values in set order.
	pub attributes: IndexMap<String, String>,
	/// Child nodes.
	pub children: Vec<VNode>,
}

impl VElement {
	/// Creates an element with no attributes or children.
	pub fn new(tag: impl Into<String>) -> Self {
		Self {
			tag: tag.into(),
			..Self::default()
		}
	}

	/// Canonical value of an attribute.
	pub fn attribute(&self, name: &str) -> Option<&str> {
		self.attributes.get(name).map(String::as_str)
	}
}

/// A node the client expects to find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VNode {
	/// An element.
	Element(VElement),
	/// A text node. May be empty.
	Text(String),
}

impl VNode {
	/// The element, if this is one.
	pub fn as_element(&self) -> Option<&VElement> {
		match self {
			Self::Element(element) => Some(element),
			Self::Text(_) => None,
		}
	}

	/// The text, if this is a text node.
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(text) => Some(text),
			Self::Element(_) => None,
		}
	}

	/// Creates this node (and its subtree) in `doc`, detached.
	pub fn mount(&self, doc: &mut Document) -> Result<NodeId, DomError> {
		match self {
			Self::Text(text) => Ok(doc.create_text(text.as_str())),
			Self::Element(element) => {
				let id = doc.create_element(&element.tag);
				for (name, value) in &element.attributes {
					doc.set_attribute(id, name, value.as_str())?;
				}
				for child in &element.children {
					let child = child.mount(doc)?;
					doc.append_child(id, child)?;
				}
				Ok(id)
			}
		}
	}

	/// Serializes this node as markup.
	pub fn render_to_string(&self) -> Result<String, DomError> {
		let mut doc = Document::new();
		let id = self.mount(&mut doc)?;
		Ok(to_markup(&doc, id))
	}
}

/// Short form used in messages: `<tag>` or `text "content"`.
impl fmt::Display for VNode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Element(element) => write!(f, "<{}>", element.tag),
			Self::Text(text) => write!(f, "text {text:?}"),
		}
	}
}

fn push_child(children: &mut Vec<VNode>, node: VNode) {
	match (children.last_mut(), node) {
		(Some(VNode::Text(previous)), VNode::Text(text)) => previous.push_str(&text),
		(_, node) => children.push(node),
	}
}

#[derive(Default)]
struct TreeBuilder {
	roots: Vec<VNode>,
	open: Vec<VElement>,
}

impl TreeBuilder {
	fn children(&mut self) -> &mut Vec<VNode> {
		match self.open.last_mut() {
			Some(element) => &mut element.children,
			None => &mut self.roots,
		}
	}
}

impl RenderVisitor for TreeBuilder {
	const TARGET: Target = Target::Client;

	fn open_element(&mut self, tag: &str) -> Result<(), RenderError> {
		self.open.push(VElement::new(tag));
		Ok(())
	}

	fn set_attribute(&mut self, name: &str, value: Option<String>) -> Result<(), RenderError> {
		if let (Some(element), Some(value)) = (self.open.last_mut(), value) {
			element.attributes.insert(name.to_string(), value);
		}
		Ok(())
	}

	fn close_element(&mut self, tag: &str) -> Result<(), RenderError> {
		match self.open.pop() {
			Some(element) if element.tag == tag => {
				push_child(self.children(), VNode::Element(element));
				Ok(())
			}
			_ => Err(RenderError::UnbalancedClose { tag: tag.to_string() }),
		}
	}

	fn flush_text(&mut self, text: String) -> Result<(), RenderError> {
		push_child(self.children(), VNode::Text(text));
		Ok(())
	}
}

/// Renders a client program into the nodes it expects at the top level.
///
/// # Examples
///
/// ```
/// use grappelli_compiler::{CompileOptions, RenderScope, Target, VNode, compile, render_client};
/// use grappelli_ir::{Element, Expression, Template};
/// use serde_json::json;
///
/// let template = Template::new("card")
/// 	.node(Element::new("div").attr_expr("style", Expression::ident("style")));
/// let program = compile(&template, Target::Client, &CompileOptions::default()).unwrap();
/// let nodes = render_client(&program, &RenderScope::new(json!({ "style": "color:red" }))).unwrap();
///
/// let div = nodes[0].as_element().unwrap();
/// assert_eq!(div.attribute("style"), Some("color: red;"));
/// ```
pub fn render_client(
	program: &CompiledTemplate,
	scope: &RenderScope,
) -> Result<Vec<VNode>, RenderError> {
	let mut builder = TreeBuilder::default();
	execute(program, scope, &mut builder)?;
	if let Some(element) = builder.open.pop() {
		return Err(RenderError::UnbalancedClose { tag: element.tag });
	}
	Ok(builder.roots)
}

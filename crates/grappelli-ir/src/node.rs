//! IR node types and their builder API.
//!
//! A template is a forest of [`Node`]s. The tree is owned top-down, so it can
//! never contain a cycle and every node has exactly one parent.
//!
//! ```
//! use grappelli_ir::{Element, Expression, Node};
//!
//! let node: Node = Element::new("p")
//!     .attr("class", "greeting")
//!     .attr_expr("title", Expression::path("user.name"))
//!     .child(Node::text("Hello, "))
//!     .child(Node::expr(Expression::path("user.name")))
//!     .into();
//!
//! assert_eq!(node.as_element().map(|e| e.tag.as_str()), Some("p"));
//! ```

use crate::expression::Expression;
use crate::location::Location;
use serde::{Deserialize, Serialize};

/// A compiled template: a name for diagnostics and its root nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
	/// Template name, used in logs.
	pub name: String,
	/// Root nodes in document order.
	pub nodes: Vec<Node>,
}

impl Template {
	/// Creates an empty template.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			nodes: Vec::new(),
		}
	}

	/// Appends a root node.
	pub fn node(mut self, node: impl Into<Node>) -> Self {
		self.nodes.push(node.into());
		self
	}

	/// Appends several root nodes.
	pub fn nodes(mut self, nodes: impl IntoIterator<Item = impl Into<Node>>) -> Self {
		self.nodes.extend(nodes.into_iter().map(Into::into));
		self
	}
}

/// A template IR node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
	/// An HTML element.
	Element(Element),
	/// A text node.
	Text(Text),
	/// A standalone expression rendered as text (`{value}`).
	Expression(ExpressionNode),
	/// A slot receiving projected content.
	Slot(Slot),
	/// A control-flow block.
	Directive(Directive),
}

impl Node {
	/// Creates a literal text node.
	pub fn text(value: impl Into<String>) -> Self {
		Self::Text(Text {
			value: TextValue::Literal(value.into()),
			location: Location::default(),
		})
	}

	/// Creates an expression node.
	pub fn expr(expression: Expression) -> Self {
		Self::Expression(ExpressionNode {
			expression,
			location: Location::default(),
		})
	}

	/// Returns the node's source location.
	pub fn location(&self) -> Location {
		match self {
			Self::Element(e) => e.location,
			Self::Text(t) => t.location,
			Self::Expression(e) => e.location,
			Self::Slot(s) => s.location,
			Self::Directive(d) => d.location(),
		}
	}

	/// Sets the node's source location.
	pub fn at(mut self, line: u32, column: u32) -> Self {
		let location = Location::new(line, column);
		match &mut self {
			Self::Element(e) => e.location = location,
			Self::Text(t) => t.location = location,
			Self::Expression(e) => e.location = location,
			Self::Slot(s) => s.location = location,
			Self::Directive(Directive::If(d)) => d.location = location,
			Self::Directive(Directive::IfChain(d)) => d.location = location,
			Self::Directive(Directive::ForEach(d)) => d.location = location,
		}
		self
	}

	/// Returns the element if this node is one.
	pub fn as_element(&self) -> Option<&Element> {
		match self {
			Self::Element(e) => Some(e),
			_ => None,
		}
	}

	/// Returns `true` for nodes that render as text (text and expression nodes).
	pub fn is_text_like(&self) -> bool {
		matches!(self, Self::Text(_) | Self::Expression(_))
	}
}

/// An HTML element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
	/// Tag name.
	pub tag: String,
	/// Attributes in source order.
	#[serde(default)]
	pub attributes: Vec<Attribute>,
	/// Child nodes in document order.
	#[serde(default)]
	pub children: Vec<Node>,
	/// Source location.
	#[serde(default)]
	pub location: Location,
}

impl Element {
	/// Creates an element with no attributes or children.
	pub fn new(tag: impl Into<String>) -> Self {
		Self {
			tag: tag.into(),
			attributes: Vec::new(),
			children: Vec::new(),
			location: Location::default(),
		}
	}

	/// Adds a literal attribute.
	pub fn attr(self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attribute(Attribute::new(name, AttributeValue::Literal(value.into())))
	}

	/// Adds an attribute bound to an expression.
	pub fn attr_expr(self, name: impl Into<String>, expression: Expression) -> Self {
		self.attribute(Attribute::new(name, AttributeValue::Expression(expression)))
	}

	/// Adds a bare boolean attribute (`<input disabled>`).
	pub fn bool_attr(self, name: impl Into<String>) -> Self {
		self.attribute(Attribute::new(name, AttributeValue::Boolean))
	}

	/// Adds a prepared attribute.
	pub fn attribute(mut self, attribute: Attribute) -> Self {
		self.attributes.push(attribute);
		self
	}

	/// Appends a child node.
	pub fn child(mut self, child: impl Into<Node>) -> Self {
		self.children.push(child.into());
		self
	}

	/// Appends several child nodes.
	pub fn children(mut self, children: impl IntoIterator<Item = impl Into<Node>>) -> Self {
		self.children.extend(children.into_iter().map(Into::into));
		self
	}

	/// Sets the source location.
	pub fn at(mut self, line: u32, column: u32) -> Self {
		self.location = Location::new(line, column);
		self
	}
}

impl From<Element> for Node {
	fn from(element: Element) -> Self {
		Self::Element(element)
	}
}

/// An element attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
	/// Attribute name as written.
	pub name: String,
	/// Attribute value.
	pub value: AttributeValue,
	/// Source location.
	#[serde(default)]
	pub location: Location,
}

impl Attribute {
	/// Creates an attribute without a source location.
	pub fn new(name: impl Into<String>, value: AttributeValue) -> Self {
		Self {
			name: name.into(),
			value,
			location: Location::default(),
		}
	}

	/// Returns `true` if this is the `style` attribute.
	pub fn is_style(&self) -> bool {
		self.name.eq_ignore_ascii_case("style")
	}
}

/// The value side of an attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
	/// A literal string value.
	Literal(String),
	/// A value computed at render time.
	Expression(Expression),
	/// A bare attribute with no value.
	Boolean,
}

/// A text node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
	/// Text content.
	pub value: TextValue,
	/// Source location.
	#[serde(default)]
	pub location: Location,
}

/// Content of a text node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TextValue {
	/// Literal text.
	Literal(String),
	/// Text computed at render time.
	Expression(Expression),
}

/// A standalone expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionNode {
	/// The expression.
	pub expression: Expression,
	/// Source location.
	#[serde(default)]
	pub location: Location,
}

/// A light-DOM slot.
///
/// Projected content replaces the slot in place. When nothing is projected
/// for the slot's name, `fallback` renders instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
	/// Slot name. `None` is the default slot. Must be a literal.
	#[serde(default)]
	pub name: Option<AttributeValue>,
	/// Fallback content.
	#[serde(default)]
	pub fallback: Vec<Node>,
	/// Source location.
	#[serde(default)]
	pub location: Location,
}

impl Slot {
	/// Creates the default slot.
	pub fn default_slot() -> Self {
		Self {
			name: None,
			fallback: Vec::new(),
			location: Location::default(),
		}
	}

	/// Creates a named slot.
	pub fn named(name: impl Into<String>) -> Self {
		Self {
			name: Some(AttributeValue::Literal(name.into())),
			..Self::default_slot()
		}
	}

	/// Appends a fallback node.
	pub fn fallback(mut self, node: impl Into<Node>) -> Self {
		self.fallback.push(node.into());
		self
	}
}

impl From<Slot> for Node {
	fn from(slot: Slot) -> Self {
		Self::Slot(slot)
	}
}

/// A control-flow block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Directive {
	/// `if:true` / `if:false`.
	If(IfBlock),
	/// `lwc:if` / `lwc:elseif` / `lwc:else`.
	IfChain(IfChain),
	/// `for:each`.
	ForEach(ForEach),
}

impl Directive {
	/// Returns the directive's source location.
	pub fn location(&self) -> Location {
		match self {
			Self::If(d) => d.location,
			Self::IfChain(d) => d.location,
			Self::ForEach(d) => d.location,
		}
	}
}

impl From<Directive> for Node {
	fn from(directive: Directive) -> Self {
		Self::Directive(directive)
	}
}

/// Renders `children` when `condition` is truthy (or falsy when `negated`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfBlock {
	/// Condition expression.
	pub condition: Expression,
	/// Renders on a falsy condition instead.
	#[serde(default)]
	pub negated: bool,
	/// Conditional content.
	#[serde(default)]
	pub children: Vec<Node>,
	/// Source location.
	#[serde(default)]
	pub location: Location,
}

impl IfBlock {
	/// Creates an `if:true` block.
	pub fn new(condition: Expression) -> Self {
		Self {
			condition,
			negated: false,
			children: Vec::new(),
			location: Location::default(),
		}
	}

	/// Creates an `if:false` block.
	pub fn negated(condition: Expression) -> Self {
		Self {
			negated: true,
			..Self::new(condition)
		}
	}

	/// Appends a child node.
	pub fn child(mut self, child: impl Into<Node>) -> Self {
		self.children.push(child.into());
		self
	}
}

impl From<IfBlock> for Node {
	fn from(block: IfBlock) -> Self {
		Self::Directive(Directive::If(block))
	}
}

/// An `if`/`elseif`/`else` chain. The first truthy branch renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfChain {
	/// Branches in source order.
	pub branches: Vec<Branch>,
	/// Source location.
	#[serde(default)]
	pub location: Location,
}

impl IfChain {
	/// Creates an empty chain.
	pub fn new() -> Self {
		Self {
			branches: Vec::new(),
			location: Location::default(),
		}
	}

	/// Appends a branch.
	pub fn branch(mut self, branch: Branch) -> Self {
		self.branches.push(branch);
		self
	}
}

impl Default for IfChain {
	fn default() -> Self {
		Self::new()
	}
}

impl From<IfChain> for Node {
	fn from(chain: IfChain) -> Self {
		Self::Directive(Directive::IfChain(chain))
	}
}

/// One branch of an [`IfChain`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
	/// Branch condition. `None` is the trailing `else`.
	#[serde(default)]
	pub condition: Option<Expression>,
	/// Branch content.
	#[serde(default)]
	pub children: Vec<Node>,
}

impl Branch {
	/// Creates a conditional branch.
	pub fn when(condition: Expression) -> Self {
		Self {
			condition: Some(condition),
			children: Vec::new(),
		}
	}

	/// Creates the `else` branch.
	pub fn otherwise() -> Self {
		Self {
			condition: None,
			children: Vec::new(),
		}
	}

	/// Appends a child node.
	pub fn child(mut self, child: impl Into<Node>) -> Self {
		self.children.push(child.into());
		self
	}
}

/// Renders `children` once per element of `collection`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForEach {
	/// Collection expression.
	pub collection: Expression,
	/// Binding for the current element.
	pub item: String,
	/// Optional binding for the current index.
	#[serde(default)]
	pub index: Option<String>,
	/// Repeated content.
	#[serde(default)]
	pub children: Vec<Node>,
	/// Source location.
	#[serde(default)]
	pub location: Location,
}

impl ForEach {
	/// Creates a loop binding each element to `item`.
	pub fn new(collection: Expression, item: impl Into<String>) -> Self {
		Self {
			collection,
			item: item.into(),
			index: None,
			children: Vec::new(),
			location: Location::default(),
		}
	}

	/// Binds the current index to `index`.
	pub fn index(mut self, index: impl Into<String>) -> Self {
		self.index = Some(index.into());
		self
	}

	/// Appends a child node.
	pub fn child(mut self, child: impl Into<Node>) -> Self {
		self.children.push(child.into());
		self
	}
}

impl From<ForEach> for Node {
	fn from(each: ForEach) -> Self {
		Self::Directive(Directive::ForEach(each))
	}
}

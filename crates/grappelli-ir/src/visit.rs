//! Visitor trait and walking helpers for IR trees.

use crate::node::{
	Attribute, Directive, Element, ExpressionNode, ForEach, IfBlock, IfChain, Node, Slot, Text,
};

/// Trait for visiting IR nodes.
///
/// `visit_node` and `visit_directive` dispatch by variant; implementors
/// provide the per-variant methods.
pub trait IrVisitor {
	/// The output type produced by visiting nodes.
	type Output;

	/// Visits a node.
	fn visit_node(&mut self, node: &Node) -> Self::Output {
		match node {
			Node::Element(e) => self.visit_element(e),
			Node::Text(t) => self.visit_text(t),
			Node::Expression(e) => self.visit_expression(e),
			Node::Slot(s) => self.visit_slot(s),
			Node::Directive(d) => self.visit_directive(d),
		}
	}

	/// Visits an element.
	fn visit_element(&mut self, element: &Element) -> Self::Output;

	/// Visits an attribute of `element`.
	fn visit_attribute(&mut self, element: &Element, attribute: &Attribute) -> Self::Output;

	/// Visits a text node.
	fn visit_text(&mut self, text: &Text) -> Self::Output;

	/// Visits an expression node.
	fn visit_expression(&mut self, node: &ExpressionNode) -> Self::Output;

	/// Visits a slot.
	fn visit_slot(&mut self, slot: &Slot) -> Self::Output;

	/// Visits a directive.
	fn visit_directive(&mut self, directive: &Directive) -> Self::Output {
		match directive {
			Directive::If(d) => self.visit_if(d),
			Directive::IfChain(d) => self.visit_if_chain(d),
			Directive::ForEach(d) => self.visit_for_each(d),
		}
	}

	/// Visits an `if:true` / `if:false` block.
	fn visit_if(&mut self, block: &IfBlock) -> Self::Output;

	/// Visits an `if`/`elseif`/`else` chain.
	fn visit_if_chain(&mut self, chain: &IfChain) -> Self::Output;

	/// Visits a `for:each` block.
	fn visit_for_each(&mut self, each: &ForEach) -> Self::Output;
}

/// Walks a node list and collects outputs.
pub fn walk_nodes<V: IrVisitor>(visitor: &mut V, nodes: &[Node]) -> Vec<V::Output> {
	nodes.iter().map(|n| visitor.visit_node(n)).collect()
}

/// Walks all attributes of an element and collects outputs.
pub fn walk_element_attributes<V: IrVisitor>(
	visitor: &mut V,
	element: &Element,
) -> Vec<V::Output> {
	element
		.attributes
		.iter()
		.map(|a| visitor.visit_attribute(element, a))
		.collect()
}

/// Walks all children of an element and collects outputs.
pub fn walk_element_children<V: IrVisitor>(visitor: &mut V, element: &Element) -> Vec<V::Output> {
	walk_nodes(visitor, &element.children)
}

/// Walks the children of every branch of a chain, in order.
pub fn walk_chain_branches<V: IrVisitor>(visitor: &mut V, chain: &IfChain) -> Vec<V::Output> {
	chain
		.branches
		.iter()
		.flat_map(|b| b.children.iter())
		.map(|n| visitor.visit_node(n))
		.collect()
}

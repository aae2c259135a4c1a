//! Structural validation of IR trees.
//!
//! Validation runs before lowering. It is fail-fast: the first offending node
//! in document order is reported.

use std::collections::HashSet;

use grappelli_serializer::is_void_element;

use crate::error::{IrError, IrErrorKind, Result};
use crate::expression::is_identifier;
use crate::node::{
	Attribute, AttributeValue, Element, ExpressionNode, ForEach, IfBlock, IfChain, Node, Slot,
	Template, Text,
};
use crate::visit::{
	IrVisitor, walk_chain_branches, walk_element_attributes, walk_element_children, walk_nodes,
};

/// Validates every node of a template.
///
/// # Examples
///
/// ```
/// use grappelli_ir::{Element, Node, Template, validate};
///
/// let ok = Template::new("ok").node(Element::new("p").child(Node::text("hi")));
/// assert!(validate(&ok).is_ok());
///
/// let bad = Template::new("bad").node(Element::new("br").child(Node::text("x")));
/// assert!(validate(&bad).is_err());
/// ```
pub fn validate(template: &Template) -> Result<()> {
	validate_nodes(&template.nodes)
}

/// Validates a node list.
pub fn validate_nodes(nodes: &[Node]) -> Result<()> {
	let mut validator = Validator;
	walk_nodes(&mut validator, nodes).into_iter().collect()
}

/// Returns whether `tag` is a valid element name.
///
/// Tag names start with an ASCII letter and contain ASCII alphanumerics or
/// `-` (custom elements).
pub fn is_valid_tag_name(tag: &str) -> bool {
	let mut chars = tag.chars();
	match chars.next() {
		Some(c) if c.is_ascii_alphabetic() => {}
		_ => return false,
	}
	chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Returns whether `name` is a valid attribute name.
pub fn is_valid_attribute_name(name: &str) -> bool {
	!name.is_empty()
		&& !name.chars().any(|c| {
			c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '>' | '/' | '=' | '<')
		})
}

struct Validator;

impl IrVisitor for Validator {
	type Output = Result<()>;

	fn visit_element(&mut self, element: &Element) -> Result<()> {
		if !is_valid_tag_name(&element.tag) {
			return Err(IrError::new(
				element.location,
				IrErrorKind::InvalidTagName(element.tag.clone()),
			));
		}

		let mut seen = HashSet::new();
		for attribute in &element.attributes {
			if !seen.insert(attribute.name.to_ascii_lowercase()) {
				return Err(IrError::new(
					attribute.location,
					IrErrorKind::DuplicateAttribute {
						element: element.tag.clone(),
						name: attribute.name.clone(),
					},
				));
			}
		}
		walk_element_attributes(self, element)
			.into_iter()
			.collect::<Result<()>>()?;

		if is_void_element(&element.tag) && !element.children.is_empty() {
			return Err(IrError::new(
				element.location,
				IrErrorKind::VoidElementWithChildren(element.tag.clone()),
			));
		}
		walk_element_children(self, element).into_iter().collect()
	}

	fn visit_attribute(&mut self, element: &Element, attribute: &Attribute) -> Result<()> {
		if is_valid_attribute_name(&attribute.name) {
			Ok(())
		} else {
			Err(IrError::new(
				attribute.location,
				IrErrorKind::InvalidAttributeName {
					element: element.tag.clone(),
					name: attribute.name.clone(),
				},
			))
		}
	}

	fn visit_text(&mut self, _text: &Text) -> Result<()> {
		Ok(())
	}

	fn visit_expression(&mut self, _node: &ExpressionNode) -> Result<()> {
		Ok(())
	}

	fn visit_slot(&mut self, slot: &Slot) -> Result<()> {
		match &slot.name {
			None | Some(AttributeValue::Literal(_)) => {}
			Some(_) => {
				return Err(IrError::new(slot.location, IrErrorKind::NonLiteralSlotName));
			}
		}
		walk_nodes(self, &slot.fallback).into_iter().collect()
	}

	fn visit_if(&mut self, block: &IfBlock) -> Result<()> {
		walk_nodes(self, &block.children).into_iter().collect()
	}

	fn visit_if_chain(&mut self, chain: &IfChain) -> Result<()> {
		if chain.branches.is_empty() {
			return Err(IrError::new(chain.location, IrErrorKind::EmptyChain));
		}
		let last = chain.branches.len() - 1;
		if let Some(position) = chain
			.branches
			.iter()
			.position(|b| b.condition.is_none())
			.filter(|&p| p != last)
		{
			return Err(IrError::new(
				chain.location,
				IrErrorKind::MisplacedElse { position },
			));
		}
		walk_chain_branches(self, chain).into_iter().collect()
	}

	fn visit_for_each(&mut self, each: &ForEach) -> Result<()> {
		let bindings = std::iter::once(("for:item", &each.item))
			.chain(each.index.iter().map(|index| ("for:index", index)));
		for (binding, name) in bindings {
			if !is_identifier(name) {
				return Err(IrError::new(
					each.location,
					IrErrorKind::InvalidBinding {
						binding,
						name: name.clone(),
					},
				));
			}
		}
		if each.index.as_deref() == Some(each.item.as_str()) {
			return Err(IrError::new(
				each.location,
				IrErrorKind::DuplicateBinding(each.item.clone()),
			));
		}
		walk_nodes(self, &each.children).into_iter().collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::expression::Expression;
	use crate::location::Location;
	use crate::node::{Branch, Slot};
	use rstest::rstest;

	fn kind_of(node: impl Into<Node>) -> IrErrorKind {
		validate_nodes(&[node.into()]).unwrap_err().kind
	}

	#[rstest]
	#[case("div", true)]
	#[case("my-widget", true)]
	#[case("h1", true)]
	#[case("", false)]
	#[case("1div", false)]
	#[case("di v", false)]
	fn test_is_valid_tag_name(#[case] tag: &str, #[case] expected: bool) {
		assert_eq!(is_valid_tag_name(tag), expected);
	}

	#[rstest]
	#[case("data-id", true)]
	#[case("aria-label", true)]
	#[case("", false)]
	#[case("a b", false)]
	#[case("a=b", false)]
	#[case("\"q", false)]
	fn test_is_valid_attribute_name(#[case] name: &str, #[case] expected: bool) {
		assert_eq!(is_valid_attribute_name(name), expected);
	}

	#[rstest]
	fn test_duplicate_attribute_is_case_insensitive() {
		assert_eq!(
			kind_of(Element::new("p").attr("class", "a").attr("CLASS", "b")),
			IrErrorKind::DuplicateAttribute {
				element: "p".into(),
				name: "CLASS".into()
			}
		);
	}

	#[rstest]
	fn test_void_element_with_children() {
		assert_eq!(
			kind_of(Element::new("img").child(Node::text("x"))),
			IrErrorKind::VoidElementWithChildren("img".into())
		);
	}

	#[rstest]
	fn test_expression_slot_name_reports_location() {
		let slot = Slot {
			name: Some(AttributeValue::Expression(Expression::ident("name"))),
			fallback: Vec::new(),
			location: Location::new(7, 3),
		};
		let err = validate_nodes(&[Element::new("div").child(slot).into()]).unwrap_err();

		assert_eq!(err.kind, IrErrorKind::NonLiteralSlotName);
		assert_eq!(err.location, Location::new(7, 3));
		assert_eq!(err.to_string(), "7:3: slot name must be a literal string");
	}

	#[rstest]
	fn test_else_must_be_last() {
		let chain = IfChain::new()
			.branch(Branch::otherwise())
			.branch(Branch::when(Expression::ident("a")));
		assert_eq!(kind_of(chain), IrErrorKind::MisplacedElse { position: 0 });
		assert_eq!(kind_of(IfChain::new()), IrErrorKind::EmptyChain);
	}

	#[rstest]
	fn test_chain_with_trailing_else_is_valid() {
		let chain = IfChain::new()
			.branch(Branch::when(Expression::ident("a")).child(Node::text("a")))
			.branch(Branch::otherwise().child(Node::text("b")));
		assert!(validate_nodes(&[chain.into()]).is_ok());
	}

	#[rstest]
	#[case("row.x", None, IrErrorKind::InvalidBinding { binding: "for:item", name: "row.x".into() })]
	#[case("row", Some("2i"), IrErrorKind::InvalidBinding { binding: "for:index", name: "2i".into() })]
	#[case("row", Some("row"), IrErrorKind::DuplicateBinding("row".into()))]
	fn test_for_each_bindings(
		#[case] item: &str,
		#[case] index: Option<&str>,
		#[case] expected: IrErrorKind,
	) {
		let mut each = ForEach::new(Expression::ident("rows"), item);
		each.index = index.map(str::to_string);
		assert_eq!(kind_of(each), expected);
	}

	#[rstest]
	fn test_nested_error_is_found() {
		let tree = Element::new("ul").child(
			ForEach::new(Expression::ident("rows"), "row")
				.child(Element::new("li").child(Element::new("bad tag"))),
		);
		assert_eq!(kind_of(tree), IrErrorKind::InvalidTagName("bad tag".into()));
	}
}

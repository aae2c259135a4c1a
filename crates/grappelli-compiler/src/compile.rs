//! Lowering of template IR into instructions.
//!
//! Every lowering function is pure: it takes a node and an immutable
//! [`CompileContext`] and returns a [`Lowered`] fragment. Fragments are
//! concatenated by the caller, so there is no shared state between unrelated
//! compilations.

use grappelli_ir::{
	Attribute, AttributeValue, Directive, Element, Expression, ForEach, IfBlock, IfChain, Node,
	Slot, Template, Text, TextValue, validate,
};
use grappelli_serializer::{
	attribute_from_value, canonical_attribute, is_raw_text_element, is_void_element,
	massage_text_content,
};
use indexmap::IndexSet;

use crate::context::CompileContext;
use crate::error::{CompileError, CompileErrorKind, Result};
use crate::instruction::{
	AttributeSource, CompiledTemplate, Instruction, RuntimeHelper, Target, TextSource,
};
use crate::options::CompileOptions;

/// A lowered fragment: instructions plus the helpers they need.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lowered {
	/// Instructions in document order.
	pub instructions: Vec<Instruction>,
	/// Helpers used by the instructions.
	pub imports: IndexSet<RuntimeHelper>,
}

impl Lowered {
	fn push(&mut self, instruction: Instruction) {
		self.instructions.push(instruction);
	}

	fn import(&mut self, helper: RuntimeHelper) {
		self.imports.insert(helper);
	}

	fn append(&mut self, other: Lowered) {
		self.instructions.extend(other.instructions);
		self.imports.extend(other.imports);
	}

	fn len(&self) -> usize {
		self.instructions.len()
	}
}

/// Compiles a template for one target.
///
/// The template is validated first; an invalid template produces no
/// instructions.
///
/// # Examples
///
/// ```
/// use grappelli_compiler::{CompileOptions, Target, compile};
/// use grappelli_ir::{Element, Node, Template};
///
/// let template = Template::new("hello").node(Element::new("p").child(Node::text("hi")));
/// let program = compile(&template, Target::Server, &CompileOptions::default()).unwrap();
/// assert_eq!(program.instructions.len(), 4);
/// ```
pub fn compile(
	template: &Template,
	target: Target,
	options: &CompileOptions,
) -> Result<CompiledTemplate> {
	validate(template)?;
	let ctx = CompileContext::new(target, options);
	let lowered = lower_nodes(&template.nodes, ctx)?;
	tracing::debug!(
		template = %template.name,
		%target,
		instructions = lowered.len(),
		"compiled template"
	);
	Ok(CompiledTemplate {
		name: template.name.clone(),
		target,
		instructions: lowered.instructions,
		imports: lowered.imports,
	})
}

/// Compiles a template for both targets: `(server, client)`.
pub fn compile_both(
	template: &Template,
	options: &CompileOptions,
) -> Result<(CompiledTemplate, CompiledTemplate)> {
	Ok((
		compile(template, Target::Server, options)?,
		compile(template, Target::Client, options)?,
	))
}

/// Lowers a sibling list, marking the last node of every text run.
pub fn lower_nodes(nodes: &[Node], ctx: CompileContext<'_>) -> Result<Lowered> {
	let mut lowered = Lowered::default();
	for (index, node) in nodes.iter().enumerate() {
		let last_in_run = !nodes.get(index + 1).is_some_and(Node::is_text_like);
		lowered.append(lower_node(node, ctx.text_position(last_in_run))?);
	}
	Ok(lowered)
}

/// Lowers a single node.
pub fn lower_node(node: &Node, ctx: CompileContext<'_>) -> Result<Lowered> {
	match node {
		Node::Element(element) => lower_element(element, ctx),
		Node::Text(text) => Ok(lower_text(text, ctx)),
		Node::Expression(node) => Ok(lower_text_value(
			&TextValue::Expression(node.expression.clone()),
			ctx,
		)),
		Node::Slot(slot) => lower_slot(slot, ctx),
		Node::Directive(directive) => lower_directive(directive, ctx),
	}
}

fn lower_element(element: &Element, ctx: CompileContext<'_>) -> Result<Lowered> {
	let tag = element.tag.to_ascii_lowercase();
	let mut lowered = Lowered::default();
	lowered.push(Instruction::OpenElement { tag: tag.clone() });

	for attribute in &element.attributes {
		lowered.append(lower_attribute(attribute, ctx));
	}

	if !is_void_element(&tag) {
		lowered.append(lower_nodes(&element.children, ctx.within(&element.tag))?);
	}

	lowered.push(Instruction::CloseElement { tag });
	Ok(lowered)
}

/// Lowers one attribute.
///
/// Literal values (and literal expressions) are canonicalized here, so the
/// renderers emit them verbatim. A value whose canonical form is absent, such
/// as an empty style, produces no instruction at all.
pub fn lower_attribute(attribute: &Attribute, ctx: CompileContext<'_>) -> Lowered {
	let name = attribute.name.to_ascii_lowercase();
	let is_style = attribute.is_style();
	let mut lowered = Lowered::default();

	let source = match &attribute.value {
		AttributeValue::Literal(raw) => {
			canonical_attribute(&name, Some(raw)).map(AttributeSource::Static)
		}
		AttributeValue::Boolean if is_style => None,
		AttributeValue::Boolean => Some(AttributeSource::Present),
		AttributeValue::Expression(Expression::Literal { value }) => {
			attribute_from_value(&name, &value.to_value())
				.and_then(|raw| canonical_attribute(&name, Some(&raw)))
				.map(AttributeSource::Static)
		}
		AttributeValue::Expression(expr) => {
			lowered.import(if is_style {
				RuntimeHelper::NormalizeStyle
			} else {
				RuntimeHelper::NormalizeAttribute
			});
			Some(AttributeSource::Dynamic(expr.clone()))
		}
	};

	let Some(value) = source else {
		return lowered;
	};
	if ctx.is_server() && !matches!(value, AttributeSource::Present) {
		lowered.import(RuntimeHelper::HtmlEscape);
	}
	lowered.push(if is_style {
		Instruction::SetStyle { value }
	} else {
		Instruction::SetAttribute { name, value }
	});
	lowered
}

fn lower_text(text: &Text, ctx: CompileContext<'_>) -> Lowered {
	lower_text_value(&text.value, ctx)
}

/// Lowers text content into a buffer append, plus a flush when the node ends
/// its text run.
pub fn lower_text_value(value: &TextValue, ctx: CompileContext<'_>) -> Lowered {
	let mut lowered = Lowered::default();
	let source = match value {
		TextValue::Literal(text) => TextSource::Static(text.clone()),
		TextValue::Expression(Expression::Literal { value }) => {
			TextSource::Static(massage_text_content(&value.to_value()))
		}
		TextValue::Expression(expr) => {
			lowered.import(RuntimeHelper::MassageTextContent);
			TextSource::Dynamic(expr.clone())
		}
	};
	lowered.push(Instruction::BufferText { value: source });

	if ctx.last_in_text_run {
		let raw_text_parent = ctx.parent.is_some_and(is_raw_text_element);
		if ctx.is_server() && !raw_text_parent {
			lowered.import(RuntimeHelper::HtmlEscape);
		}
		lowered.push(Instruction::YieldText);
	}
	lowered
}

fn lower_slot(slot: &Slot, ctx: CompileContext<'_>) -> Result<Lowered> {
	let name = match &slot.name {
		None => None,
		Some(AttributeValue::Literal(name)) => Some(name.clone()),
		Some(_) => {
			return Err(CompileError::new(
				slot.location,
				CompileErrorKind::Invalid(grappelli_ir::IrErrorKind::NonLiteralSlotName),
			));
		}
	};
	let fallback = lower_nodes(&slot.fallback, ctx)?;

	let mut lowered = Lowered::default();
	lowered.import(RuntimeHelper::ProjectSlot);
	lowered.push(Instruction::ProjectSlot {
		name,
		fallback: fallback.len(),
	});
	lowered.append(fallback);
	Ok(lowered)
}

fn lower_directive(directive: &Directive, ctx: CompileContext<'_>) -> Result<Lowered> {
	match directive {
		Directive::If(block) => lower_if(block, ctx),
		Directive::IfChain(chain) => lower_if_chain(chain, ctx),
		Directive::ForEach(each) => lower_for_each(each, ctx),
	}
}

fn lower_branch(
	condition: &Expression,
	negated: bool,
	consequent: Lowered,
	alternate: Lowered,
) -> Lowered {
	let mut lowered = Lowered::default();
	lowered.import(RuntimeHelper::RenderBranch);
	lowered.push(Instruction::Branch {
		condition: condition.clone(),
		negated,
		consequent: consequent.len(),
		alternate: alternate.len(),
	});
	lowered.append(consequent);
	lowered.append(alternate);
	lowered
}

fn lower_if(block: &IfBlock, ctx: CompileContext<'_>) -> Result<Lowered> {
	let body = lower_nodes(&block.children, ctx)?;
	Ok(lower_branch(
		&block.condition,
		block.negated,
		body,
		Lowered::default(),
	))
}

/// Lowers a chain into nested branches: each branch's alternate is the rest
/// of the chain, and a trailing `else` is the innermost alternate.
fn lower_if_chain(chain: &IfChain, ctx: CompileContext<'_>) -> Result<Lowered> {
	let mut lowered = Lowered::default();
	for branch in chain.branches.iter().rev() {
		let body = lower_nodes(&branch.children, ctx)?;
		lowered = match &branch.condition {
			Some(condition) => lower_branch(condition, false, body, lowered),
			None => body,
		};
	}
	Ok(lowered)
}

fn lower_for_each(each: &ForEach, ctx: CompileContext<'_>) -> Result<Lowered> {
	let body = lower_nodes(&each.children, ctx)?;
	let mut lowered = Lowered::default();
	lowered.import(RuntimeHelper::RenderEach);
	lowered.push(Instruction::Iterate {
		collection: each.collection.clone(),
		item: each.item.clone(),
		index: each.index.clone(),
		body: body.len(),
	});
	lowered.append(body);
	Ok(lowered)
}

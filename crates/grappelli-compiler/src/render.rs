//! Shared program interpreter.
//!
//! Both renderers run programs through [`execute`]. Evaluation (expressions,
//! canonicalization, text massaging, control flow) happens here exactly once;
//! a [`RenderVisitor`] only decides how the resulting elements, attributes and
//! text are materialized.

use grappelli_serializer::{attribute_from_value, canonical_attribute, is_truthy, massage_text_content};
use serde_json::Value;

use crate::error::RenderError;
use crate::instruction::{AttributeSource, CompiledTemplate, Instruction, Target, TextSource};
use crate::scope::{Bindings, RenderScope};

/// Receives evaluated output from the interpreter.
pub(crate) trait RenderVisitor {
	/// The target this visitor renders for.
	const TARGET: Target;

	/// An element opens.
	fn open_element(&mut self, tag: &str) -> Result<(), RenderError>;

	/// An attribute of the element just opened. `None` means absent.
	fn set_attribute(&mut self, name: &str, value: Option<String>) -> Result<(), RenderError>;

	/// The innermost element closes.
	fn close_element(&mut self, tag: &str) -> Result<(), RenderError>;

	/// A complete text run. May be empty.
	fn flush_text(&mut self, text: String) -> Result<(), RenderError>;
}

/// Runs `program` against `scope`, feeding output to `visitor`.
pub(crate) fn execute<V: RenderVisitor>(
	program: &CompiledTemplate,
	scope: &RenderScope,
	visitor: &mut V,
) -> Result<(), RenderError> {
	if program.target != V::TARGET {
		return Err(RenderError::WrongTarget {
			expected: V::TARGET,
			found: program.target,
		});
	}
	let mut interpreter = Interpreter {
		bindings: Bindings::new(scope),
		buffer: String::new(),
		slots_enabled: true,
	};
	interpreter.run(&program.instructions, 0, visitor)
}

struct Interpreter<'s> {
	bindings: Bindings<'s>,
	buffer: String,
	slots_enabled: bool,
}

/// Returns the `len` instructions after `index`, or an error if they overrun
/// the block.
fn body(
	instructions: &[Instruction],
	start: usize,
	len: usize,
	index: usize,
) -> Result<&[Instruction], RenderError> {
	start
		.checked_add(len)
		.and_then(|end| instructions.get(start..end))
		.ok_or(RenderError::MalformedProgram { index })
}

fn type_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}

impl Interpreter<'_> {
	/// Runs a block. `offset` is the absolute index of the block's first
	/// instruction, used in error reports.
	fn run<V: RenderVisitor>(
		&mut self,
		instructions: &[Instruction],
		offset: usize,
		visitor: &mut V,
	) -> Result<(), RenderError> {
		let mut cursor = 0;
		while let Some(instruction) = instructions.get(cursor) {
			let index = offset + cursor;
			cursor += 1;
			match instruction {
				Instruction::OpenElement { tag } => visitor.open_element(tag)?,
				Instruction::CloseElement { tag } => visitor.close_element(tag)?,
				Instruction::SetAttribute { name, value } => {
					let value = self.attribute(name, value);
					visitor.set_attribute(name, value)?;
				}
				Instruction::SetStyle { value } => {
					let value = self.attribute("style", value);
					visitor.set_attribute("style", value)?;
				}
				Instruction::BufferText { value } => {
					let text = match value {
						TextSource::Static(text) => text.clone(),
						TextSource::Dynamic(expr) => massage_text_content(&self.bindings.resolve(expr)),
					};
					self.buffer.push_str(&text);
				}
				Instruction::YieldText => visitor.flush_text(std::mem::take(&mut self.buffer))?,
				Instruction::ProjectSlot { name, fallback } => {
					let fallback_block = body(instructions, cursor, *fallback, index)?;
					let scope = self.bindings.scope();
					match scope.slot(name.as_deref()).filter(|_| self.slots_enabled) {
						Some(content) => {
							let projected = scope.without_slots();
							let mut nested = Interpreter {
								bindings: Bindings::new(&projected),
								buffer: String::new(),
								slots_enabled: false,
							};
							let program = content.program(V::TARGET);
							nested.run(&program.instructions, 0, visitor)?;
						}
						None => self.run(fallback_block, offset + cursor, visitor)?,
					}
					cursor += fallback_block.len();
				}
				Instruction::Branch {
					condition,
					negated,
					consequent,
					alternate,
				} => {
					let then_block = body(instructions, cursor, *consequent, index)?;
					let else_start = cursor + then_block.len();
					let else_block = body(instructions, else_start, *alternate, index)?;
					let taken = is_truthy(&self.bindings.resolve(condition)) != *negated;
					if taken {
						self.run(then_block, offset + cursor, visitor)?;
					} else {
						self.run(else_block, offset + else_start, visitor)?;
					}
					cursor = else_start + else_block.len();
				}
				Instruction::Iterate {
					collection,
					item,
					index: index_binding,
					body: len,
				} => {
					let block = body(instructions, cursor, *len, index)?;
					let items = match self.bindings.resolve(collection) {
						Value::Array(items) => items,
						Value::Null => Vec::new(),
						other => {
							return Err(RenderError::NotIterable {
								expression: collection.to_string(),
								found: type_name(&other),
							});
						}
					};
					for (position, value) in items.into_iter().enumerate() {
						let mut frame = vec![(item.clone(), value)];
						if let Some(binding) = index_binding {
							frame.push((binding.clone(), Value::from(position)));
						}
						self.bindings.push(frame);
						let result = self.run(block, offset + cursor, visitor);
						self.bindings.pop();
						result?;
					}
					cursor += block.len();
				}
			}
		}
		Ok(())
	}

	fn attribute(&self, name: &str, source: &AttributeSource) -> Option<String> {
		match source {
			AttributeSource::Static(value) => Some(value.clone()),
			AttributeSource::Present => Some(String::new()),
			AttributeSource::Dynamic(expr) => {
				let value = self.bindings.resolve(expr);
				let raw = attribute_from_value(name, &value)?;
				canonical_attribute(name, Some(&raw))
			}
		}
	}
}

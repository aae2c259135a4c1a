//! The instruction set produced by the compiler.
//!
//! A program is a flat sequence. Control-flow instructions own the next `n`
//! instructions as their body instead of nesting, so both renderers execute a
//! program with one cursor and the listing reads top to bottom.

use std::fmt;

use grappelli_ir::Expression;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Compilation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
	/// Streamed markup.
	Server,
	/// Expected node tree and DOM mounting.
	Client,
}

impl fmt::Display for Target {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Server => "server",
			Self::Client => "client",
		})
	}
}

/// Where an attribute value comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeSource {
	/// Canonical value computed at compile time.
	Static(String),
	/// Evaluated and canonicalized at render time.
	Dynamic(Expression),
	/// Present with an empty value.
	Present,
}

/// Where a piece of text comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum TextSource {
	/// Massaged text computed at compile time.
	Static(String),
	/// Evaluated and massaged at render time.
	Dynamic(Expression),
}

/// One compiled instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
	/// Opens an element. Attributes follow before any child.
	OpenElement { tag: String },
	/// Closes the innermost open element.
	CloseElement { tag: String },
	/// Sets an attribute on the element just opened.
	SetAttribute { name: String, value: AttributeSource },
	/// Sets the `style` attribute on the element just opened.
	SetStyle { value: AttributeSource },
	/// Appends to the pending text run.
	BufferText { value: TextSource },
	/// Flushes the pending text run as one text node.
	YieldText,
	/// Renders projected content for `name`, or the next `fallback`
	/// instructions when nothing is projected.
	ProjectSlot { name: Option<String>, fallback: usize },
	/// Renders the next `consequent` instructions when the condition holds
	/// (or fails, when `negated`), otherwise the `alternate` instructions
	/// after them.
	Branch {
		condition: Expression,
		negated: bool,
		consequent: usize,
		alternate: usize,
	},
	/// Renders the next `body` instructions once per collection element.
	Iterate {
		collection: Expression,
		item: String,
		index: Option<String>,
		body: usize,
	},
}

/// Runtime helpers a compiled program depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RuntimeHelper {
	/// Escapes text and attribute values in server markup.
	HtmlEscape,
	/// Converts expression values into text.
	MassageTextContent,
	/// Canonicalizes dynamic style values.
	NormalizeStyle,
	/// Canonicalizes dynamic attribute values.
	NormalizeAttribute,
	/// Projects slot content.
	ProjectSlot,
	/// Evaluates conditional blocks.
	RenderBranch,
	/// Evaluates iteration blocks.
	RenderEach,
}

impl RuntimeHelper {
	/// The helper's import name.
	pub fn name(self) -> &'static str {
		match self {
			Self::HtmlEscape => "htmlEscape",
			Self::MassageTextContent => "massageTextContent",
			Self::NormalizeStyle => "normalizeStyle",
			Self::NormalizeAttribute => "normalizeAttribute",
			Self::ProjectSlot => "projectSlot",
			Self::RenderBranch => "renderBranch",
			Self::RenderEach => "renderEach",
		}
	}
}

impl fmt::Display for RuntimeHelper {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// The output of compiling one template for one target.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledTemplate {
	/// Template name.
	pub name: String,
	/// Target the instructions were lowered for.
	pub target: Target,
	/// Instructions in document order.
	pub instructions: Vec<Instruction>,
	/// Runtime helpers used, in first-use order.
	pub imports: IndexSet<RuntimeHelper>,
}

impl CompiledTemplate {
	/// Returns `true` if the program uses `helper`.
	pub fn imports(&self, helper: RuntimeHelper) -> bool {
		self.imports.contains(&helper)
	}
}

fn quoted(value: &str) -> String {
	format!("{value:?}")
}

impl fmt::Display for AttributeSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Static(value) => f.write_str(&quoted(value)),
			Self::Dynamic(expr) => write!(f, "{{{expr}}}"),
			Self::Present => f.write_str("present"),
		}
	}
}

impl fmt::Display for TextSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Static(value) => f.write_str(&quoted(value)),
			Self::Dynamic(expr) => write!(f, "{{{expr}}}"),
		}
	}
}

impl fmt::Display for Instruction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::OpenElement { tag } => write!(f, "open <{tag}>"),
			Self::CloseElement { tag } => write!(f, "close </{tag}>"),
			Self::SetAttribute { name, value } => write!(f, "attr {name} = {value}"),
			Self::SetStyle { value } => write!(f, "style {value}"),
			Self::BufferText { value } => write!(f, "buffer {value}"),
			Self::YieldText => f.write_str("yield"),
			Self::ProjectSlot { name, fallback } => match name {
				Some(name) => write!(f, "slot {} (fallback +{fallback})", quoted(name)),
				None => write!(f, "slot default (fallback +{fallback})"),
			},
			Self::Branch {
				condition,
				negated,
				consequent,
				alternate,
			} => {
				let bang = if *negated { "!" } else { "" };
				write!(f, "branch {bang}{condition} (then +{consequent}, else +{alternate})")
			}
			Self::Iterate {
				collection,
				item,
				index,
				body,
			} => match index {
				Some(index) => write!(f, "each {collection} as {item}, {index} (+{body})"),
				None => write!(f, "each {collection} as {item} (+{body})"),
			},
		}
	}
}

impl fmt::Display for CompiledTemplate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "; {} ({})", self.name, self.target)?;
		let imports: Vec<_> = self.imports.iter().map(|h| h.name()).collect();
		writeln!(f, "; imports: {}", imports.join(", "))?;

		// Indent bodies of control-flow instructions by how many enclosing
		// blocks are still open.
		let mut open_blocks: Vec<usize> = Vec::new();
		for (index, instruction) in self.instructions.iter().enumerate() {
			open_blocks.retain(|&end| end > index);
			let indent = "  ".repeat(open_blocks.len());
			writeln!(f, "{index:04} {indent}{instruction}")?;
			let span = match instruction {
				Instruction::ProjectSlot { fallback, .. } => *fallback,
				Instruction::Branch {
					consequent,
					alternate,
					..
				} => consequent + alternate,
				Instruction::Iterate { body, .. } => *body,
				_ => 0,
			};
			if span > 0 {
				open_blocks.push(index + 1 + span);
			}
		}
		Ok(())
	}
}

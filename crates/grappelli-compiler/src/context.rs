//! Immutable compilation context.

use crate::instruction::Target;
use crate::options::CompileOptions;

/// Everything a lowering function needs besides the node itself.
///
/// The context is passed by value and never mutated; nested calls derive a
/// new context with [`CompileContext::within`] or
/// [`CompileContext::text_position`].
#[derive(Debug, Clone, Copy)]
pub struct CompileContext<'a> {
	/// Target being compiled for.
	pub target: Target,
	/// Compiler options.
	pub options: &'a CompileOptions,
	/// Tag of the enclosing element, if any.
	pub parent: Option<&'a str>,
	/// Whether the current text node ends its run of text siblings.
	pub last_in_text_run: bool,
}

impl<'a> CompileContext<'a> {
	/// Creates a root context.
	pub fn new(target: Target, options: &'a CompileOptions) -> Self {
		Self {
			target,
			options,
			parent: None,
			last_in_text_run: true,
		}
	}

	/// Context for the children of `tag`.
	pub fn within(self, tag: &'a str) -> Self {
		Self {
			parent: Some(tag),
			..self
		}
	}

	/// Context for a text node at the given run position.
	pub fn text_position(self, last_in_text_run: bool) -> Self {
		Self {
			last_in_text_run: last_in_text_run || !self.options.coalesce_text,
			..self
		}
	}

	/// Returns `true` when compiling for the server.
	pub fn is_server(&self) -> bool {
		self.target == Target::Server
	}
}

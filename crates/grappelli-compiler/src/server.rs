//! Server renderer: executes a server program into markup.
//!
//! Output goes to a [`MarkupSink`]. Every flushed text run ends a chunk, so a
//! sink that forwards chunks as they arrive streams the page.
//!
//! ## Example
//!
//! ```
//! use grappelli_compiler::{CompileOptions, RenderScope, Target, compile, render_to_string};
//! use grappelli_ir::{Element, Expression, Node, Template};
//! use serde_json::json;
//!
//! let template = Template::new("greeting")
//! 	.node(Element::new("p").child(Node::text("Hello, ")).child(Node::expr(Expression::ident("name"))));
//! let program = compile(&template, Target::Server, &CompileOptions::default()).unwrap();
//! let html = render_to_string(&program, &RenderScope::new(json!({ "name": "<Ada>" }))).unwrap();
//! assert_eq!(html, "<p>Hello, &lt;Ada&gt;</p>");
//! ```

use grappelli_serializer::{
	TEXT_PLACEHOLDER, drops_leading_newline, html_escape, is_boolean_attribute,
	is_raw_text_element, is_void_element,
};

use crate::error::RenderError;
use crate::instruction::{CompiledTemplate, Target};
use crate::render::{RenderVisitor, execute};
use crate::scope::RenderScope;

/// Destination for server markup.
pub trait MarkupSink {
	/// Appends markup.
	fn write(&mut self, markup: &str);

	/// Ends the current chunk. Called after every flushed text run.
	fn yield_chunk(&mut self) {}
}

impl MarkupSink for String {
	fn write(&mut self, markup: &str) {
		self.push_str(markup);
	}
}

/// A sink that keeps one string per chunk.
#[derive(Debug, Default, Clone)]
pub struct ChunkedSink {
	chunks: Vec<String>,
	current: String,
}

impl ChunkedSink {
	/// Creates an empty sink.
	pub fn new() -> Self {
		Self::default()
	}

	/// Chunks yielded so far, not counting unfinished output.
	pub fn chunks(&self) -> &[String] {
		&self.chunks
	}

	/// Ends output and returns every chunk.
	pub fn finish(mut self) -> Vec<String> {
		self.yield_chunk();
		self.chunks
	}
}

impl MarkupSink for ChunkedSink {
	fn write(&mut self, markup: &str) {
		self.current.push_str(markup);
	}

	fn yield_chunk(&mut self) {
		if !self.current.is_empty() {
			self.chunks.push(std::mem::take(&mut self.current));
		}
	}
}

struct MarkupWriter<'s, S: MarkupSink> {
	sink: &'s mut S,
	open: Vec<String>,
	start_tag_pending: bool,
	/// The current text run is empty so far and needs a placeholder when it
	/// ends.
	placeholder_pending: bool,
	/// The current text run has content.
	run_has_text: bool,
	/// The next text is the first content of a `<pre>`-like element.
	after_newline_sensitive_tag: bool,
}

impl<S: MarkupSink> MarkupWriter<'_, S> {
	fn finish_start_tag(&mut self) {
		if self.start_tag_pending {
			self.sink.write(">");
			self.start_tag_pending = false;
		}
	}

	/// Ends the current text run at an element boundary or the end of output.
	fn end_text_run(&mut self) {
		if self.placeholder_pending {
			let mut placeholder = [0u8; 4];
			self.sink.write(TEXT_PLACEHOLDER.encode_utf8(&mut placeholder));
		}
		self.placeholder_pending = false;
		self.run_has_text = false;
		self.after_newline_sensitive_tag = false;
	}

	fn in_raw_text(&self) -> bool {
		self.open.last().is_some_and(|tag| is_raw_text_element(tag))
	}
}

impl<S: MarkupSink> RenderVisitor for MarkupWriter<'_, S> {
	const TARGET: Target = Target::Server;

	fn open_element(&mut self, tag: &str) -> Result<(), RenderError> {
		self.finish_start_tag();
		self.end_text_run();
		self.sink.write("<");
		self.sink.write(tag);
		self.open.push(tag.to_string());
		self.start_tag_pending = true;
		self.after_newline_sensitive_tag = drops_leading_newline(tag);
		Ok(())
	}

	fn set_attribute(&mut self, name: &str, value: Option<String>) -> Result<(), RenderError> {
		let Some(value) = value else {
			return Ok(());
		};
		self.sink.write(" ");
		self.sink.write(name);
		if !(value.is_empty() || is_boolean_attribute(name)) {
			self.sink.write("=\"");
			self.sink.write(&html_escape(&value));
			self.sink.write("\"");
		}
		Ok(())
	}

	fn close_element(&mut self, tag: &str) -> Result<(), RenderError> {
		if self.open.pop().as_deref() != Some(tag) {
			return Err(RenderError::UnbalancedClose { tag: tag.to_string() });
		}
		self.finish_start_tag();
		self.end_text_run();
		if !is_void_element(tag) {
			self.sink.write("</");
			self.sink.write(tag);
			self.sink.write(">");
		}
		Ok(())
	}

	fn flush_text(&mut self, text: String) -> Result<(), RenderError> {
		self.finish_start_tag();
		if text.is_empty() {
			// Adjacent runs merge into one text node once parsed, so only a
			// run with no content at all needs the placeholder.
			self.placeholder_pending = !self.run_has_text;
		} else {
			self.placeholder_pending = false;
			self.run_has_text = true;
			if self.after_newline_sensitive_tag && text.starts_with('\n') {
				self.sink.write("\n");
			}
			self.after_newline_sensitive_tag = false;
			if self.in_raw_text() {
				self.sink.write(&text);
			} else {
				self.sink.write(&html_escape(&text));
			}
		}
		self.sink.yield_chunk();
		Ok(())
	}
}

/// Renders a server program into `sink`.
pub fn render_to_sink<S: MarkupSink>(
	program: &CompiledTemplate,
	scope: &RenderScope,
	sink: &mut S,
) -> Result<(), RenderError> {
	let mut writer = MarkupWriter {
		sink,
		open: Vec::new(),
		start_tag_pending: false,
		placeholder_pending: false,
		run_has_text: false,
		after_newline_sensitive_tag: false,
	};
	execute(program, scope, &mut writer)?;
	writer.finish_start_tag();
	writer.end_text_run();
	tracing::trace!(template = %program.name, "rendered server markup");
	Ok(())
}

/// Renders a server program into one string.
pub fn render_to_string(program: &CompiledTemplate, scope: &RenderScope) -> Result<String, RenderError> {
	let mut html = String::new();
	render_to_sink(program, scope, &mut html)?;
	Ok(html)
}

/// Renders a server program into chunks, one per flushed text run plus any
/// trailing markup.
pub fn render_chunks(
	program: &CompiledTemplate,
	scope: &RenderScope,
) -> Result<Vec<String>, RenderError> {
	let mut sink = ChunkedSink::new();
	render_to_sink(program, scope, &mut sink)?;
	Ok(sink.finish())
}

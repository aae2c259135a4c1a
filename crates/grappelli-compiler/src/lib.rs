//! Template compiler and renderers for grappelli.
//!
//! A template is compiled once per target. The server program renders markup;
//! the client program renders the node tree the client expects, which is what
//! hydration compares the server markup against. Both programs come from the
//! same IR and route every value through the same serializer, so for equal
//! data they describe the same document.
//!
//! ## Modules
//!
//! - [`compile`] - lowering of IR into instructions
//! - [`context`] - immutable per-call compile context
//! - [`instruction`] - the flat instruction set and its listing format
//! - [`options`] - compile options (TOML loadable)
//! - [`scope`] - render data and projected slot content
//! - [`server`] - markup output and streaming sinks
//! - [`client`] - expected node trees and DOM mounting
//!
//! ## Example
//!
//! ```
//! use grappelli_compiler::{CompileOptions, RenderScope, compile_both, render_client, render_to_string};
//! use grappelli_ir::{Element, Node, Template};
//!
//! let template = Template::new("hello").node(Element::new("h1").child(Node::text("Hi")));
//! let (server, client) = compile_both(&template, &CompileOptions::default()).unwrap();
//!
//! let scope = RenderScope::default();
//! assert_eq!(render_to_string(&server, &scope).unwrap(), "<h1>Hi</h1>");
//! assert_eq!(render_client(&client, &scope).unwrap()[0].to_string(), "<h1>");
//! ```

pub mod client;
pub mod compile;
pub mod context;
pub mod error;
pub mod instruction;
pub mod options;
mod render;
pub mod scope;
pub mod server;

pub use client::{VElement, VNode, render_client};
pub use compile::{Lowered, compile, compile_both, lower_attribute, lower_node, lower_nodes, lower_text_value};
pub use context::CompileContext;
pub use error::{CompileError, CompileErrorKind, ConfigError, RenderError, Result};
pub use instruction::{
	AttributeSource, CompiledTemplate, Instruction, RuntimeHelper, Target, TextSource,
};
pub use options::CompileOptions;
pub use scope::{RenderScope, SlotContent};
pub use server::{ChunkedSink, MarkupSink, render_chunks, render_to_sink, render_to_string};

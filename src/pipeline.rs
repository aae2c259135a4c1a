//! End-to-end page pipeline.
//!
//! A [`Pipeline`] holds one template compiled for both targets plus the
//! hydration options, and runs the three stages a page goes through: render on
//! the server, parse the markup into a live document, hydrate the document
//! against the client program.
//!
//! ## Example
//!
//! ```rust
//! use grappelli::ir::{Element, Expression, Template};
//! use grappelli::{Pipeline, PipelineConfig, RenderScope};
//! use serde_json::json;
//!
//! let template = Template::new("badge")
//!     .node(Element::new("span").attr_expr("class", Expression::ident("kind")));
//! let pipeline = Pipeline::compile(&template, &PipelineConfig::default()).unwrap();
//!
//! let markup = pipeline.render_server(&RenderScope::new(json!({ "kind": "new" }))).unwrap();
//! assert_eq!(markup, "<span class=\"new\"></span>");
//!
//! let (doc, report) = pipeline
//!     .hydrate_markup(&markup, &RenderScope::new(json!({ "kind": "new" })))
//!     .unwrap();
//! assert!(report.is_clean());
//! assert_eq!(doc.children(doc.root()).len(), 1);
//! ```

use std::path::Path;

use grappelli_compiler::{
	CompileError, CompileOptions, CompiledTemplate, ConfigError, RenderError, RenderScope,
	compile_both, render_chunks, render_to_string,
};
use grappelli_dom::{Document, NodeId, parse_fragment};
use grappelli_hydration::{HydrationError, HydrationOptions, HydrationReport, hydrate};
use grappelli_ir::Template;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Any failure of a pipeline stage.
///
/// Hydration mismatches are not errors; they are in the [`HydrationReport`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
	/// The template is invalid.
	#[error(transparent)]
	Compile(#[from] CompileError),
	/// A program could not be executed.
	#[error(transparent)]
	Render(#[from] RenderError),
	/// The hydration pass could not start.
	#[error(transparent)]
	Hydration(#[from] HydrationError),
	/// Configuration could not be loaded.
	#[error(transparent)]
	Config(#[from] ConfigError),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Compile and hydration options loaded together.
///
/// ```toml
/// [compile]
/// coalesce_text = true
///
/// [hydration]
/// style_action = "replace_node"
/// ignore_attributes = ["data-nonce"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
	/// Compiler options.
	pub compile: CompileOptions,
	/// Hydration options.
	pub hydration: HydrationOptions,
}

impl PipelineConfig {
	/// Creates new default configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the compiler options.
	pub fn compile(mut self, options: CompileOptions) -> Self {
		self.compile = options;
		self
	}

	/// Sets the hydration options.
	pub fn hydration(mut self, options: HydrationOptions) -> Self {
		self.hydration = options;
		self
	}

	/// Parses configuration from a TOML string.
	pub fn from_toml_str(source: &str) -> Result<Self> {
		toml::from_str(source).map_err(|err| Error::Config(ConfigError::Toml(err)))
	}

	/// Loads configuration from a TOML file.
	pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&source)
	}
}

/// A template compiled for both targets.
#[derive(Debug, Clone)]
pub struct Pipeline {
	server: CompiledTemplate,
	client: CompiledTemplate,
	hydration: HydrationOptions,
}

impl Pipeline {
	/// Compiles `template` for both targets.
	pub fn compile(template: &Template, config: &PipelineConfig) -> Result<Self> {
		let (server, client) = compile_both(template, &config.compile)?;
		tracing::debug!(template = %template.name, "pipeline ready");
		Ok(Self {
			server,
			client,
			hydration: config.hydration.clone(),
		})
	}

	/// The server program.
	pub fn server_program(&self) -> &CompiledTemplate {
		&self.server
	}

	/// The client program.
	pub fn client_program(&self) -> &CompiledTemplate {
		&self.client
	}

	/// Options used by [`hydrate`](Self::hydrate).
	pub fn hydration_options(&self) -> &HydrationOptions {
		&self.hydration
	}

	/// Renders server markup.
	pub fn render_server(&self, scope: &RenderScope) -> Result<String> {
		Ok(render_to_string(&self.server, scope)?)
	}

	/// Renders server markup as streamed chunks.
	pub fn render_server_chunks(&self, scope: &RenderScope) -> Result<Vec<String>> {
		Ok(render_chunks(&self.server, scope)?)
	}

	/// Parses server markup into a live document, as a browser would build
	/// it before the client boots.
	pub fn parse_server_output(markup: &str) -> Document {
		parse_fragment(markup)
	}

	/// Hydrates the children of `root`.
	pub fn hydrate(&self, doc: &mut Document, root: NodeId, scope: &RenderScope) -> Result<HydrationReport> {
		Ok(hydrate(doc, root, &self.client, scope, &self.hydration)?)
	}

	/// Parses `markup` and hydrates the whole document.
	pub fn hydrate_markup(&self, markup: &str, scope: &RenderScope) -> Result<(Document, HydrationReport)> {
		let mut doc = Self::parse_server_output(markup);
		let root = doc.root();
		let report = self.hydrate(&mut doc, root, scope)?;
		Ok((doc, report))
	}

	/// Renders with `server_scope`, then hydrates with `client_scope`.
	///
	/// Passing the same scope twice must produce a clean report; passing
	/// different scopes simulates state that changed between the server
	/// render and the client boot.
	pub fn round_trip(
		&self,
		server_scope: &RenderScope,
		client_scope: &RenderScope,
	) -> Result<(Document, HydrationReport)> {
		let markup = self.render_server(server_scope)?;
		self.hydrate_markup(&markup, client_scope)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use grappelli_hydration::RepairAction;
	use rstest::rstest;

	#[rstest]
	fn test_config_from_toml() {
		let config = PipelineConfig::from_toml_str(
			r#"
			[compile]
			coalesce_text = false

			[hydration]
			style_action = "patch_value"
			"#,
		)
		.unwrap();

		assert!(!config.compile.coalesce_text);
		assert_eq!(config.hydration.style_action, RepairAction::PatchValue);
		assert_eq!(config.hydration.text_action, RepairAction::PatchValue);
	}

	#[rstest]
	fn test_config_errors() {
		assert!(matches!(
			PipelineConfig::from_toml_str("[compile]\ncoalesce_text = 3"),
			Err(Error::Config(ConfigError::Toml(_)))
		));
		assert!(matches!(
			PipelineConfig::from_toml_file("/nonexistent/grappelli.toml"),
			Err(Error::Config(ConfigError::Io { .. }))
		));
	}

	#[rstest]
	fn test_server_output_is_parsed_like_a_browser() {
		let doc = Pipeline::parse_server_output("<p>a<div>b</div></p><pre>\nx</pre>");
		let tags: Vec<_> = doc.children(doc.root()).iter().filter_map(|&id| doc.tag(id)).collect();
		assert_eq!(tags, ["p", "div", "p", "pre"]);

		let pre = doc.first_element_by_tag(doc.root(), "pre").unwrap();
		assert_eq!(doc.text_content(pre), "x");
	}
}

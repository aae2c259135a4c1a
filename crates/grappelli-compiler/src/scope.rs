//! Data a compiled program renders against.
//!
//! A [`RenderScope`] is resolved before rendering starts and never changes
//! during a render: iteration bindings live in the renderer, not here. That
//! makes one scope shareable between the server render and the hydration pass
//! of the same page.

use std::sync::Arc;

use grappelli_ir::{Expression, Template};
use indexmap::IndexMap;
use serde_json::Value;

use crate::compile::compile_both;
use crate::error::Result;
use crate::instruction::{CompiledTemplate, Target};
use crate::options::CompileOptions;

/// Content projected into a slot, compiled for both targets.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotContent {
	server: CompiledTemplate,
	client: CompiledTemplate,
}

impl SlotContent {
	/// Compiles slot content for both targets.
	pub fn compile(template: &Template, options: &CompileOptions) -> Result<Self> {
		let (server, client) = compile_both(template, options)?;
		Ok(Self { server, client })
	}

	/// The program for `target`.
	pub fn program(&self, target: Target) -> &CompiledTemplate {
		match target {
			Target::Server => &self.server,
			Target::Client => &self.client,
		}
	}
}

/// Root data plus projected slot content.
#[derive(Debug, Clone, Default)]
pub struct RenderScope {
	data: Value,
	slots: IndexMap<String, Arc<SlotContent>>,
}

impl RenderScope {
	/// Creates a scope over `data`, usually a JSON object of component
	/// properties.
	pub fn new(data: Value) -> Self {
		Self {
			data,
			slots: IndexMap::new(),
		}
	}

	/// Projects compiled content into a slot. `None` is the default slot.
	pub fn with_slot(mut self, name: Option<&str>, content: SlotContent) -> Self {
		self.slots
			.insert(name.unwrap_or_default().to_string(), Arc::new(content));
		self
	}

	/// Compiles `template` and projects it into a slot.
	pub fn with_slot_template(
		self,
		name: Option<&str>,
		template: &Template,
		options: &CompileOptions,
	) -> Result<Self> {
		Ok(self.with_slot(name, SlotContent::compile(template, options)?))
	}

	/// Root data.
	pub fn data(&self) -> &Value {
		&self.data
	}

	/// Projected content for a slot, if any.
	pub fn slot(&self, name: Option<&str>) -> Option<&SlotContent> {
		self.slots.get(name.unwrap_or_default()).map(Arc::as_ref)
	}

	/// The same data with no projected content.
	///
	/// Projected content renders in this scope so it cannot project into
	/// itself.
	pub(crate) fn without_slots(&self) -> Self {
		Self {
			data: self.data.clone(),
			slots: IndexMap::new(),
		}
	}
}

/// Iteration bindings layered over a scope during one render.
#[derive(Debug)]
pub(crate) struct Bindings<'s> {
	scope: &'s RenderScope,
	frames: Vec<Vec<(String, Value)>>,
}

impl<'s> Bindings<'s> {
	pub(crate) fn new(scope: &'s RenderScope) -> Self {
		Self {
			scope,
			frames: Vec::new(),
		}
	}

	pub(crate) fn scope(&self) -> &'s RenderScope {
		self.scope
	}

	pub(crate) fn push(&mut self, frame: Vec<(String, Value)>) {
		self.frames.push(frame);
	}

	pub(crate) fn pop(&mut self) {
		self.frames.pop();
	}

	/// Resolves an expression. Missing identifiers and members are `null`.
	pub(crate) fn resolve(&self, expression: &Expression) -> Value {
		match expression {
			Expression::Identifier { name } => self.lookup(name),
			Expression::Member { object, property } => member(&self.resolve(object), property),
			Expression::Literal { value } => value.to_value(),
		}
	}

	fn lookup(&self, name: &str) -> Value {
		self.frames
			.iter()
			.rev()
			.flat_map(|frame| frame.iter())
			.find(|(bound, _)| bound == name)
			.map(|(_, value)| value.clone())
			.unwrap_or_else(|| self.scope.data.get(name).cloned().unwrap_or(Value::Null))
	}
}

fn member(object: &Value, property: &str) -> Value {
	match object {
		Value::Object(map) => map.get(property).cloned().unwrap_or(Value::Null),
		Value::Array(items) if property == "length" => Value::from(items.len()),
		Value::Array(items) => property
			.parse::<usize>()
			.ok()
			.and_then(|index| items.get(index))
			.cloned()
			.unwrap_or(Value::Null),
		Value::String(text) if property == "length" => Value::from(text.chars().count()),
		_ => Value::Null,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn scope() -> RenderScope {
		RenderScope::new(json!({
			"user": { "name": "Ada", "tags": ["a", "b"] },
			"count": 0
		}))
	}

	#[rstest]
	#[case("user.name", json!("Ada"))]
	#[case("user.tags.1", json!("b"))]
	#[case("user.tags.length", json!(2))]
	#[case("user.name.length", json!(3))]
	#[case("count", json!(0))]
	#[case("missing", json!(null))]
	#[case("user.missing.deeper", json!(null))]
	fn test_resolve(#[case] path: &str, #[case] expected: Value) {
		let scope = scope();
		assert_eq!(Bindings::new(&scope).resolve(&Expression::path(path)), expected);
	}

	#[rstest]
	fn test_frames_shadow_data_innermost_first() {
		let scope = scope();
		let mut bindings = Bindings::new(&scope);
		bindings.push(vec![("user".into(), json!({ "name": "Outer" }))]);
		bindings.push(vec![("user".into(), json!({ "name": "Inner" }))]);
		assert_eq!(bindings.resolve(&Expression::path("user.name")), json!("Inner"));

		bindings.pop();
		assert_eq!(bindings.resolve(&Expression::path("user.name")), json!("Outer"));
		bindings.pop();
		assert_eq!(bindings.resolve(&Expression::path("user.name")), json!("Ada"));
	}

	#[rstest]
	fn test_default_slot_key() {
		let content = SlotContent::compile(&Template::new("empty"), &CompileOptions::default()).unwrap();
		let scope = RenderScope::default().with_slot(None, content);
		assert!(scope.slot(None).is_some());
		assert!(scope.slot(Some("header")).is_none());
		assert!(scope.without_slots().slot(None).is_none());
	}
}

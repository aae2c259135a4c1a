//! Style attribute mismatches between server markup and the client program.

use grappelli_compiler::{CompileOptions, CompiledTemplate, RenderScope, Target, compile, render_to_string};
use grappelli_dom::{Document, NodeId, Snapshot, parse_fragment};
use grappelli_hydration::{
	HydrationOptions, HydrationReport, HydrationState, MismatchKind, RepairAction, hydrate,
};
use grappelli_ir::{Element, Expression, Template};
use rstest::rstest;
use serde_json::json;

fn computed_style() -> Template {
	Template::new("computed").node(Element::new("p").attr_expr("style", Expression::ident("style")))
}

fn static_style(style: &str) -> Template {
	Template::new("static").node(Element::new("p").attr("style", style))
}

fn program(template: &Template, target: Target) -> CompiledTemplate {
	compile(template, target, &CompileOptions::default()).unwrap()
}

struct Hydrated {
	doc: Document,
	before: Snapshot,
	report: HydrationReport,
}

impl Hydrated {
	fn p(&self) -> NodeId {
		self.doc.first_element_by_tag(self.doc.root(), "p").unwrap()
	}
}

fn hydrate_markup(
	markup: &str,
	client: &CompiledTemplate,
	scope: &RenderScope,
	options: &HydrationOptions,
) -> Hydrated {
	let mut doc = parse_fragment(markup);
	let root = doc.root();
	let p = doc.first_element_by_tag(root, "p").unwrap();
	let before = Snapshot::capture(&doc, p).unwrap();
	let report = hydrate(&mut doc, root, client, scope, options).unwrap();
	Hydrated { doc, before, report }
}

#[rstest]
fn test_different_priority() {
	let template = computed_style();
	let server_scope = RenderScope::new(json!({ "style": "background-color: red; border-color: red;" }));
	let client_scope =
		RenderScope::new(json!({ "style": "background-color: red; border-color: red !important;" }));
	let markup = render_to_string(&program(&template, Target::Server), &server_scope).unwrap();

	let hydrated = hydrate_markup(
		&markup,
		&program(&template, Target::Client),
		&client_scope,
		&HydrationOptions::default(),
	);
	let p = hydrated.p();

	assert!(!hydrated.before.is_same_node(&hydrated.doc, p));
	assert_eq!(
		hydrated.doc.attribute(p, "style"),
		Some("background-color: red; border-color: red !important;")
	);
	assert_eq!(
		hydrated.report.diagnostics.warnings(),
		vec![
			"Mismatch hydrating element <p>: attribute \"style\" has different values, expected \"background-color: red; border-color: red !important;\" but found \"background-color: red; border-color: red;\"",
			"Hydration completed with errors.",
		]
	);
	assert!(hydrated.report.diagnostics.errors().is_empty());
}

#[rstest]
fn test_extra_from_server() {
	let markup = "<p style=\"background-color: red; border-color: red; margin: 1px;\"></p>";
	let client = program(&static_style("background-color: red; border-color: red;"), Target::Client);

	let hydrated = hydrate_markup(markup, &client, &RenderScope::default(), &HydrationOptions::default());
	let p = hydrated.p();

	assert!(!hydrated.before.is_same_node(&hydrated.doc, p));
	assert_eq!(
		hydrated.doc.attribute(p, "style"),
		Some("background-color: red; border-color: red;")
	);
	assert_eq!(
		hydrated.report.diagnostics.warnings(),
		vec![
			"Mismatch hydrating element <p>: attribute \"style\" has different values, expected \"background-color: red; border-color: red;\" but found \"background-color: red; border-color: red; margin: 1px;\"",
			"Hydration completed with errors.",
		]
	);
	assert_eq!(hydrated.report.mismatches[0].mismatch.kind, MismatchKind::StyleValue);
	assert_eq!(hydrated.report.mismatches[0].action, RepairAction::ReplaceNode);
}

#[rstest]
fn test_style_patch_policy_keeps_identity() {
	let markup = "<p style=\"color: blue;\"></p>";
	let client = program(&static_style("color: red"), Target::Client);
	let options = HydrationOptions::new().style_action(RepairAction::PatchValue);

	let hydrated = hydrate_markup(markup, &client, &RenderScope::default(), &options);
	let p = hydrated.p();

	assert!(hydrated.before.is_same_node(&hydrated.doc, p));
	assert_eq!(hydrated.doc.attribute(p, "style"), Some("color: red;"));
	assert_eq!(hydrated.report.patched, 1);
}

#[rstest]
#[case("color:red;margin:0", "color: red; margin: 0;")]
#[case("  color : red ;;  margin: 0  ", "color: red; margin: 0;")]
#[case("color: red; margin: 0;", "color: red; margin: 0;")]
fn test_insignificant_differences_are_not_mismatches(#[case] server: &str, #[case] client: &str) {
	let markup = format!("<p style=\"{server}\"></p>");
	let client = program(&static_style(client), Target::Client);

	let hydrated = hydrate_markup(&markup, &client, &RenderScope::default(), &HydrationOptions::default());

	assert_eq!(hydrated.report.state, HydrationState::CleanFinish);
	assert!(hydrated.report.diagnostics.is_empty());
	assert!(hydrated.before.matches(&hydrated.doc));
}

#[rstest]
fn test_non_style_attribute_keeps_identity() {
	let template = Template::new("t").node(Element::new("p").attr_expr("class", Expression::ident("c")));
	let markup = render_to_string(
		&program(&template, Target::Server),
		&RenderScope::new(json!({ "c": "server" })),
	)
	.unwrap();

	let hydrated = hydrate_markup(
		&markup,
		&program(&template, Target::Client),
		&RenderScope::new(json!({ "c": "client" })),
		&HydrationOptions::default(),
	);
	let p = hydrated.p();

	assert!(hydrated.before.is_same_node(&hydrated.doc, p));
	assert_eq!(hydrated.doc.attribute(p, "class"), Some("client"));
	assert_eq!(hydrated.report.replaced, 0);
}

#[rstest]
fn test_second_pass_finds_nothing() {
	let markup = "<p style=\"background-color: red; border-color: red; margin: 1px;\"></p>";
	let client = program(&static_style("background-color: red; border-color: red;"), Target::Client);
	let scope = RenderScope::default();
	let options = HydrationOptions::default();

	let mut hydrated = hydrate_markup(markup, &client, &scope, &options);
	let root = hydrated.doc.root();
	let second = hydrate(&mut hydrated.doc, root, &client, &scope, &options).unwrap();

	assert!(second.is_clean());
	assert!(second.diagnostics.is_empty());
	assert!(second.mismatches.is_empty());
}

#[rstest]
fn test_server_program_is_rejected() {
	let template = static_style("color: red");
	let server = program(&template, Target::Server);
	let mut doc = parse_fragment("<p></p>");
	let root = doc.root();

	let err = hydrate(&mut doc, root, &server, &RenderScope::default(), &HydrationOptions::default())
		.unwrap_err();
	assert_eq!(err.to_string(), "hydration needs a client program, found a server program");
}

//! End-to-end tests: compile, render on the server, parse, hydrate.

use std::io::Write;

use grappelli::dom::Snapshot;
use grappelli::hydration::{COMPLETED_WITH_ERRORS, HydrationState, MismatchKind};
use grappelli::ir::{Element, Expression, ForEach, IfBlock, Node, Slot, Template};
use grappelli::{
	CompileOptions, HydrationOptions, Pipeline, PipelineConfig, RenderScope, RepairAction,
};
use rstest::{fixture, rstest};
use serde_json::json;

fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_test_writer()
		.try_init();
}

#[fixture]
fn card() -> Pipeline {
	init_tracing();
	let template = Template::new("card").node(
		Element::new("article")
			.attr_expr("style", Expression::ident("style"))
			.child(Element::new("h1").child(Node::expr(Expression::ident("title"))))
			.child(
				Element::new("ul").child(
					ForEach::new(Expression::ident("tags"), "tag")
						.child(Element::new("li").child(Node::expr(Expression::ident("tag")))),
				),
			)
			.child(
				IfBlock::new(Expression::ident("draft"))
					.child(Element::new("em").child(Node::text("draft"))),
			)
			.child(Slot::named("footer").fallback(Node::text("no footer"))),
	);
	Pipeline::compile(&template, &PipelineConfig::default()).unwrap()
}

fn scope() -> RenderScope {
	RenderScope::new(json!({
		"style": "color: red",
		"title": "Hello & welcome",
		"tags": ["a", "b"],
		"draft": false
	}))
}

#[rstest]
fn test_identical_render_is_an_empty_diff(card: Pipeline) {
	let markup = card.render_server(&scope()).unwrap();
	let mut doc = Pipeline::parse_server_output(&markup);
	let root = doc.root();
	let before = Snapshot::capture(&doc, root).unwrap();
	let mutations = doc.mutation_count();

	let report = card.hydrate(&mut doc, root, &scope()).unwrap();

	assert_eq!(report.state, HydrationState::CleanFinish);
	assert!(report.diagnostics.is_empty());
	assert_eq!(doc.mutation_count(), mutations);
	assert!(before.matches(&doc));
}

#[rstest]
fn test_different_priority_replaces_element(card: Pipeline) {
	let server = scope();
	let client = RenderScope::new(json!({
		"style": "color: red !important",
		"title": "Hello & welcome",
		"tags": ["a", "b"],
		"draft": false
	}));
	let markup = card.render_server(&server).unwrap();
	let mut doc = Pipeline::parse_server_output(&markup);
	let root = doc.root();
	let article = doc.first_element_by_tag(root, "article").unwrap();
	let before = Snapshot::capture(&doc, article).unwrap();

	let report = card.hydrate(&mut doc, root, &client).unwrap();
	let after = doc.first_element_by_tag(root, "article").unwrap();

	assert!(!before.is_same_node(&doc, after));
	assert_eq!(doc.attribute(after, "style"), Some("color: red !important;"));
	assert_eq!(
		report.diagnostics.warnings(),
		vec![
			"Mismatch hydrating element <article>: attribute \"style\" has different values, expected \"color: red !important;\" but found \"color: red;\"",
			COMPLETED_WITH_ERRORS,
		]
	);
}

#[rstest]
fn test_extra_declaration_from_server(card: Pipeline) {
	let markup = card
		.render_server(&scope())
		.unwrap()
		.replace("color: red;", "color: red; margin: 1px;");

	let (doc, report) = card.hydrate_markup(&markup, &scope()).unwrap();
	let article = doc.first_element_by_tag(doc.root(), "article").unwrap();

	assert_eq!(doc.attribute(article, "style"), Some("color: red;"));
	assert_eq!(report.mismatches.len(), 1);
	assert_eq!(report.mismatches[0].mismatch.kind, MismatchKind::StyleValue);
	assert_eq!(report.diagnostics.warnings().last(), Some(&COMPLETED_WITH_ERRORS));
}

#[rstest]
fn test_text_change_is_patched_in_place(card: Pipeline) {
	let client = RenderScope::new(json!({
		"style": "color: red",
		"title": "Goodbye",
		"tags": ["a", "b"],
		"draft": false
	}));

	let markup = card.render_server(&scope()).unwrap();
	let mut doc = Pipeline::parse_server_output(&markup);
	let root = doc.root();
	let h1 = doc.first_element_by_tag(root, "h1").unwrap();
	let before = Snapshot::capture(&doc, h1).unwrap();

	let report = card.hydrate(&mut doc, root, &client).unwrap();

	assert!(before.is_same_node(&doc, h1));
	assert_eq!(doc.text_content(h1), "Goodbye");
	assert_eq!(report.patched, 1);
	assert_eq!(
		report.diagnostics.warnings(),
		vec![
			"Mismatch hydrating text node in <h1>: text values do not match, expected \"Goodbye\" but found \"Hello & welcome\"",
			COMPLETED_WITH_ERRORS,
		]
	);
}

#[rstest]
fn test_list_length_change_is_structural(card: Pipeline) {
	let server = RenderScope::new(json!({
		"style": "color: red",
		"title": "t",
		"tags": ["a", "b", "c"],
		"draft": true
	}));
	let client = RenderScope::new(json!({
		"style": "color: red",
		"title": "t",
		"tags": ["a", "b"],
		"draft": false
	}));

	let (doc, report) = card.round_trip(&server, &client).unwrap();
	let ul = doc.first_element_by_tag(doc.root(), "ul").unwrap();

	assert_eq!(doc.elements_by_tag(ul, "li").len(), 2);
	assert!(doc.first_element_by_tag(doc.root(), "em").is_none());
	assert_eq!(
		report.diagnostics.errors(),
		vec![
			"Mismatch hydrating element <ul>: expected nothing but found <li>",
			"Mismatch hydrating element <article>: expected node text \"no footer\" but found <em>",
			"Mismatch hydrating element <article>: expected nothing but found text \"no footer\"",
		]
	);
	assert_eq!(report.diagnostics.warnings(), vec![COMPLETED_WITH_ERRORS]);

	let (_, second) = card.round_trip(&client, &client).unwrap();
	assert!(second.is_clean());
}

#[rstest]
fn test_projected_slot_round_trip(card: Pipeline) {
	let footer = Template::new("footer").node(Element::new("small").child(Node::text("(c)")));
	let with_footer = scope()
		.with_slot_template(Some("footer"), &footer, &CompileOptions::default())
		.unwrap();

	let markup = card.render_server(&with_footer).unwrap();
	assert!(markup.ends_with("<small>(c)</small></article>"), "{markup}");

	let (_, clean) = card.hydrate_markup(&markup, &with_footer).unwrap();
	assert!(clean.is_clean());

	let (doc, report) = card.hydrate_markup(&markup, &scope()).unwrap();
	let article = doc.first_element_by_tag(doc.root(), "article").unwrap();
	assert!(doc.first_element_by_tag(article, "small").is_none());
	assert!(doc.text_content(article).ends_with("no footer"));
	assert_eq!(
		report.diagnostics.errors(),
		vec!["Mismatch hydrating element <article>: expected node text \"no footer\" but found <small>"]
	);
}

#[rstest]
fn test_config_file_drives_both_stages() {
	init_tracing();
	let mut file = tempfile::NamedTempFile::new().unwrap();
	writeln!(
		file,
		"[compile]\ncoalesce_text = false\n\n[hydration]\nstyle_action = \"patch_value\""
	)
	.unwrap();
	let config = PipelineConfig::from_toml_file(file.path()).unwrap();
	assert_eq!(
		config,
		PipelineConfig::new()
			.compile(CompileOptions::new().coalesce_text(false))
			.hydration(HydrationOptions::new().style_action(RepairAction::PatchValue))
	);

	let template = Template::new("p").node(
		Element::new("p")
			.attr_expr("style", Expression::ident("style"))
			.child(Node::text("a"))
			.child(Node::text("b")),
	);
	let pipeline = Pipeline::compile(&template, &config).unwrap();
	let server = RenderScope::new(json!({ "style": "color: blue" }));
	let client = RenderScope::new(json!({ "style": "color: red" }));

	assert_eq!(
		pipeline.render_server_chunks(&server).unwrap(),
		vec!["<p style=\"color: blue;\">a", "b", "</p>"]
	);

	let markup = pipeline.render_server(&server).unwrap();
	let mut doc = Pipeline::parse_server_output(&markup);
	let root = doc.root();
	let p = doc.first_element_by_tag(root, "p").unwrap();
	let report = pipeline.hydrate(&mut doc, root, &client).unwrap();

	assert_eq!(report.mismatches[0].action, RepairAction::PatchValue);
	assert_eq!(doc.attribute(p, "style"), Some("color: red;"));
	assert!(doc.is_attached(p));
}

#[rstest]
#[case::emoji_family(json!({ "who": "family 👨\u{200D}👩\u{200D}👧" }))]
#[case::trailing_joiner(json!({ "who": "a\u{200D}" }))]
#[case::empty(json!({ "who": "" }))]
fn test_joiners_in_text_round_trip_clean(#[case] data: serde_json::Value) {
	init_tracing();
	let template = Template::new("who").node(Element::new("p").child(Node::expr(Expression::ident("who"))));
	let pipeline = Pipeline::compile(&template, &PipelineConfig::default()).unwrap();
	let scope = RenderScope::new(data);

	let (mut doc, first) = pipeline.round_trip(&scope, &scope).unwrap();
	assert!(first.is_clean(), "{:?}", first.diagnostics.warnings());
	assert!(first.diagnostics.is_empty());

	let root = doc.root();
	let second = pipeline.hydrate(&mut doc, root, &scope).unwrap();
	assert!(second.is_clean());
	assert!(second.diagnostics.is_empty());
}

#[rstest]
fn test_placeholder_is_not_written_next_to_text() {
	let template = Template::new("pair").node(
		Element::new("p")
			.child(Node::expr(Expression::ident("a")))
			.child(Node::expr(Expression::ident("b"))),
	);
	let config = PipelineConfig::new().compile(CompileOptions::new().coalesce_text(false));
	let pipeline = Pipeline::compile(&template, &config).unwrap();
	let scope = RenderScope::new(json!({ "a": "", "b": "x" }));

	assert_eq!(pipeline.render_server(&scope).unwrap(), "<p>x</p>");
	let (_, report) = pipeline.round_trip(&scope, &scope).unwrap();
	assert!(report.is_clean());
}

#[rstest]
fn test_block_in_paragraph_is_repaired_structurally() {
	init_tracing();
	let template = Template::new("nested").node(
		Element::new("p")
			.child(Node::text("a"))
			.child(Element::new("div").child(Node::text("b"))),
	);
	let pipeline = Pipeline::compile(&template, &PipelineConfig::default()).unwrap();
	let scope = RenderScope::new(json!({}));

	let markup = pipeline.render_server(&scope).unwrap();
	assert_eq!(markup, "<p>a<div>b</div></p>");

	let (mut doc, report) = pipeline.hydrate_markup(&markup, &scope).unwrap();
	assert_eq!(
		report.diagnostics.errors(),
		vec![
			"Mismatch hydrating element <p>: expected node <div> but found nothing",
			"Mismatch hydrating element #document: expected nothing but found <div>",
			"Mismatch hydrating element #document: expected nothing but found <p>",
		]
	);
	assert_eq!(report.diagnostics.warnings(), vec![COMPLETED_WITH_ERRORS]);

	let root = doc.root();
	let second = pipeline.hydrate(&mut doc, root, &scope).unwrap();
	assert!(second.is_clean());
}

#[rstest]
fn test_leading_newline_in_pre_round_trips() {
	let template = Template::new("code").node(Element::new("pre").child(Node::expr(Expression::ident("code"))));
	let pipeline = Pipeline::compile(&template, &PipelineConfig::default()).unwrap();
	let scope = RenderScope::new(json!({ "code": "\nfn main() {}" }));

	let (doc, report) = pipeline.round_trip(&scope, &scope).unwrap();
	let pre = doc.first_element_by_tag(doc.root(), "pre").unwrap();

	assert!(report.is_clean());
	assert_eq!(doc.text_content(pre), "\nfn main() {}");
}

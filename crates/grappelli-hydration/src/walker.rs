//! The hydration walker.
//!
//! A [`HydrationPass`] walks the live children of a root alongside the nodes
//! the client program expects there, depth first and in document order. Every
//! divergence becomes a [`Mismatch`], is classified by the [`RepairPolicy`],
//! reported, and repaired according to its action. A mismatch never stops the
//! pass.
//!
//! ```text
//! NotStarted --run--> Walking --+--> CleanFinish
//!                               +--> FinishedWithMismatches
//! ```
//!
//! `run` consumes the pass, so a finished pass cannot be resumed or retried.

use grappelli_compiler::{CompiledTemplate, RenderScope, Target, VElement, VNode, render_client};
use grappelli_dom::{Document, DomError, NodeId, NodeKind};
use grappelli_serializer::{canonical_eq, canonical_text};

use crate::diagnostics::Diagnostics;
use crate::error::{HydrationError, Result};
use crate::mismatch::{Mismatch, NodeLocator};
use crate::options::HydrationOptions;
use crate::policy::{RepairAction, RepairPolicy};

/// Progress of a hydration pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HydrationState {
	/// Created, not yet run.
	NotStarted,
	/// Traversal in progress.
	Walking,
	/// Finished with nothing reported.
	CleanFinish,
	/// Finished after reporting at least one mismatch.
	FinishedWithMismatches,
}

impl HydrationState {
	/// Returns `true` for both terminal states.
	pub fn is_finished(self) -> bool {
		matches!(self, Self::CleanFinish | Self::FinishedWithMismatches)
	}
}

/// A mismatch together with the action taken for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedMismatch {
	/// The mismatch.
	pub mismatch: Mismatch,
	/// What the walker did about it.
	pub action: RepairAction,
}

/// Outcome of a finished pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HydrationReport {
	/// Terminal state.
	pub state: HydrationState,
	/// Every mismatch found, in traversal order, ignored ones included.
	pub mismatches: Vec<RecordedMismatch>,
	/// Leveled messages for reported mismatches.
	pub diagnostics: Diagnostics,
	/// Nodes replaced, inserted or removed by repair.
	pub replaced: usize,
	/// Attribute and text values patched in place.
	pub patched: usize,
}

impl HydrationReport {
	/// Returns `true` if nothing was reported.
	pub fn is_clean(&self) -> bool {
		self.state == HydrationState::CleanFinish
	}

	/// Mismatches that were reported, skipping ignored ones.
	pub fn reported(&self) -> impl Iterator<Item = &RecordedMismatch> {
		self.mismatches
			.iter()
			.filter(|recorded| recorded.action.is_reported())
	}
}

/// One hydration pass over a live subtree.
pub struct HydrationPass<'d> {
	doc: &'d mut Document,
	root: NodeId,
	expected: Vec<VNode>,
	policy: RepairPolicy,
	state: HydrationState,
	mismatches: Vec<RecordedMismatch>,
	diagnostics: Diagnostics,
	replaced: usize,
	patched: usize,
}

impl<'d> HydrationPass<'d> {
	/// Prepares a pass that hydrates the children of `root` against what
	/// `program` renders for `scope`.
	///
	/// The client tree is rendered here, so every expression is resolved
	/// before traversal starts.
	pub fn new(
		doc: &'d mut Document,
		root: NodeId,
		program: &CompiledTemplate,
		scope: &RenderScope,
		options: &HydrationOptions,
	) -> Result<Self> {
		if program.target != Target::Client {
			return Err(HydrationError::WrongTarget(program.target));
		}
		let expected = render_client(program, scope)?;
		Self::from_expected(doc, root, expected, options)
	}

	/// Prepares a pass against an already rendered client tree.
	pub fn from_expected(
		doc: &'d mut Document,
		root: NodeId,
		expected: Vec<VNode>,
		options: &HydrationOptions,
	) -> Result<Self> {
		match doc.kind(root) {
			Some(NodeKind::Document | NodeKind::Element(_)) => {}
			Some(_) => return Err(HydrationError::InvalidRoot(root)),
			None => return Err(DomError::UnknownNode(root).into()),
		}
		if !doc.is_attached(root) {
			return Err(HydrationError::DetachedRoot(root));
		}
		Ok(Self {
			doc,
			root,
			expected,
			policy: RepairPolicy::new(options.clone()),
			state: HydrationState::NotStarted,
			mismatches: Vec::new(),
			diagnostics: Diagnostics::new(),
			replaced: 0,
			patched: 0,
		})
	}

	/// Current state. Always [`HydrationState::NotStarted`] before `run`.
	pub fn state(&self) -> HydrationState {
		self.state
	}

	/// The nodes expected under the root.
	pub fn expected(&self) -> &[VNode] {
		&self.expected
	}

	/// Runs the pass to completion.
	///
	/// Errors are only returned for repairs the document rejects; mismatches
	/// are in the report.
	pub fn run(mut self) -> Result<HydrationReport> {
		self.state = HydrationState::Walking;
		crate::info_log!(root = %self.root, nodes = self.expected.len(), "hydration started");

		let expected = std::mem::take(&mut self.expected);
		let mut path = Vec::new();
		self.walk_children(self.root, &expected, &mut path)?;

		self.state = if self.mismatches.iter().any(|r| r.action.is_reported()) {
			HydrationState::FinishedWithMismatches
		} else {
			HydrationState::CleanFinish
		};
		self.diagnostics.finish();
		crate::info_log!(
			state = ?self.state,
			mismatches = self.mismatches.len(),
			replaced = self.replaced,
			patched = self.patched,
			"hydration finished"
		);

		Ok(HydrationReport {
			state: self.state,
			mismatches: self.mismatches,
			diagnostics: self.diagnostics,
			replaced: self.replaced,
			patched: self.patched,
		})
	}

	fn walk_children(&mut self, parent: NodeId, expected: &[VNode], path: &mut Vec<usize>) -> Result<()> {
		let live: Vec<NodeId> = self
			.doc
			.children(parent)
			.iter()
			.copied()
			.filter(|&id| !self.doc.is_comment(id))
			.collect();

		for index in 0..expected.len().max(live.len()) {
			path.push(index);
			let result = match (expected.get(index), live.get(index).copied()) {
				(Some(node), Some(id)) => self.hydrate_node(parent, node, id, path),
				(Some(node), None) => self.missing(parent, node, None, path),
				(None, Some(id)) => self.extra(parent, id, path),
				(None, None) => Ok(()),
			};
			path.pop();
			result?;
		}
		Ok(())
	}

	fn hydrate_node(&mut self, parent: NodeId, node: &VNode, id: NodeId, path: &mut Vec<usize>) -> Result<()> {
		let same_kind = match (node, self.doc.kind(id)) {
			(VNode::Element(expected), Some(NodeKind::Element(data))) => data.tag == expected.tag,
			(VNode::Text(_), Some(NodeKind::Text(_))) => true,
			_ => false,
		};
		if !same_kind {
			return self.missing(parent, node, Some(id), path);
		}
		crate::debug_log!(node = %id, locator = %NodeLocator::new(path.clone()), "hydrating {node}");
		match node {
			VNode::Element(expected) => self.hydrate_element(parent, expected, id, path),
			VNode::Text(expected) => self.hydrate_text(parent, expected, id, path),
		}
	}

	fn hydrate_element(
		&mut self,
		parent: NodeId,
		expected: &VElement,
		id: NodeId,
		path: &mut Vec<usize>,
	) -> Result<()> {
		let subject = format!("<{}>", expected.tag);
		let locator = NodeLocator::new(path.clone());

		let unexpected: Vec<String> = self
			.doc
			.attributes(id)
			.map(|found| {
				found
					.keys()
					.filter(|name| !expected.attributes.contains_key(*name))
					.cloned()
					.collect()
			})
			.unwrap_or_default();
		let names = expected.attributes.keys().cloned().chain(unexpected);

		let mut repairs = Vec::new();
		for name in names {
			let want = expected.attribute(&name);
			let found = self.doc.attribute(id, &name);
			if canonical_eq(&name, want, found) {
				continue;
			}
			let mismatch = Mismatch::attribute(
				locator.clone(),
				subject.clone(),
				name.clone(),
				want.map(str::to_owned),
				found.map(str::to_owned),
			);
			let action = self.policy.classify(&mismatch);
			repairs.push((mismatch, action));
		}

		let replace = repairs
			.iter()
			.any(|(_, action)| *action == RepairAction::ReplaceNode);
		for (mismatch, action) in repairs {
			if action == RepairAction::PatchValue && !replace {
				self.patch_attribute(id, &mismatch)?;
			}
			self.record(mismatch, action);
		}

		if replace {
			// The mounted node is built from the expected tree, so its
			// content needs no walk.
			return self.replace(parent, &VNode::Element(expected.clone()), id);
		}
		self.walk_children(id, &expected.children, path)
	}

	fn patch_attribute(&mut self, id: NodeId, mismatch: &Mismatch) -> Result<()> {
		let name = mismatch.name.as_deref().unwrap_or_default();
		match &mismatch.expected {
			Some(value) => self.doc.set_attribute(id, name, value.as_str())?,
			None => {
				self.doc.remove_attribute(id, name)?;
			}
		}
		self.patched += 1;
		Ok(())
	}

	fn hydrate_text(&mut self, parent: NodeId, expected: &str, id: NodeId, path: &[usize]) -> Result<()> {
		let found = self.doc.text(id).unwrap_or_default().to_string();
		if canonical_text(&found) == canonical_text(expected) {
			return Ok(());
		}
		let mismatch = Mismatch::text(
			NodeLocator::new(path),
			describe(self.doc, parent),
			expected,
			found,
		);
		let action = self.policy.classify(&mismatch);
		match action {
			RepairAction::PatchValue => {
				self.doc.set_text(id, expected)?;
				self.patched += 1;
			}
			RepairAction::ReplaceNode => self.replace(parent, &VNode::Text(expected.to_string()), id)?,
			RepairAction::ReportOnly | RepairAction::Ignore => {}
		}
		self.record(mismatch, action);
		Ok(())
	}

	/// `node` is expected at this position; `found` is the live node of the
	/// wrong kind or tag, or `None` when the live children ran out.
	fn missing(&mut self, parent: NodeId, node: &VNode, found: Option<NodeId>, path: &[usize]) -> Result<()> {
		let mismatch = Mismatch::missing(
			NodeLocator::new(path),
			describe(self.doc, parent),
			node.to_string(),
			found.map(|id| describe(self.doc, id)),
		);
		let action = self.policy.classify(&mismatch);
		if action == RepairAction::ReplaceNode {
			match found {
				Some(old) => self.replace(parent, node, old)?,
				None => {
					let new = node.mount(self.doc)?;
					self.doc.append_child(parent, new)?;
					self.replaced += 1;
				}
			}
		}
		self.record(mismatch, action);
		Ok(())
	}

	fn extra(&mut self, parent: NodeId, id: NodeId, path: &[usize]) -> Result<()> {
		let mismatch = Mismatch::extra(
			NodeLocator::new(path),
			describe(self.doc, parent),
			describe(self.doc, id),
		);
		let action = self.policy.classify(&mismatch);
		if action == RepairAction::ReplaceNode {
			self.doc.remove_child(parent, id)?;
			self.replaced += 1;
		}
		self.record(mismatch, action);
		Ok(())
	}

	fn replace(&mut self, parent: NodeId, node: &VNode, old: NodeId) -> Result<()> {
		let new = node.mount(self.doc)?;
		self.doc.replace_child(parent, new, old)?;
		self.replaced += 1;
		crate::debug_log!(old = %old, new = %new, "replaced node");
		Ok(())
	}

	fn record(&mut self, mismatch: Mismatch, action: RepairAction) {
		if action.is_reported() {
			self.diagnostics.report(&mismatch);
		}
		self.mismatches.push(RecordedMismatch { mismatch, action });
	}
}

/// Short form of a live node for messages, matching the [`VNode`] display
/// form.
fn describe(doc: &Document, id: NodeId) -> String {
	match doc.kind(id) {
		Some(NodeKind::Element(data)) => format!("<{}>", data.tag),
		Some(NodeKind::Text(text)) => format!("text {text:?}"),
		Some(NodeKind::Comment(_)) => "comment".to_string(),
		Some(NodeKind::Document) | None => "#document".to_string(),
	}
}

/// Hydrates the children of `root` against `program` rendered for `scope`.
///
/// # Examples
///
/// ```
/// use grappelli_compiler::{CompileOptions, RenderScope, compile_both, render_to_string};
/// use grappelli_dom::parse_fragment;
/// use grappelli_hydration::{HydrationOptions, hydrate};
/// use grappelli_ir::{Element, Expression, Template};
/// use serde_json::json;
///
/// let template = Template::new("t").node(Element::new("p").attr_expr("title", Expression::ident("t")));
/// let (server, client) = compile_both(&template, &CompileOptions::default()).unwrap();
///
/// let markup = render_to_string(&server, &RenderScope::new(json!({ "t": "server" }))).unwrap();
/// let mut doc = parse_fragment(&markup);
/// let root = doc.root();
///
/// let scope = RenderScope::new(json!({ "t": "client" }));
/// let report = hydrate(&mut doc, root, &client, &scope, &HydrationOptions::default()).unwrap();
///
/// assert_eq!(report.diagnostics.warnings(), vec![
/// 	"Mismatch hydrating element <p>: attribute \"title\" has different values, expected \"client\" but found \"server\"",
/// 	"Hydration completed with errors.",
/// ]);
/// let p = doc.first_element_by_tag(root, "p").unwrap();
/// assert_eq!(doc.attribute(p, "title"), Some("client"));
/// ```
pub fn hydrate(
	doc: &mut Document,
	root: NodeId,
	program: &CompiledTemplate,
	scope: &RenderScope,
	options: &HydrationOptions,
) -> Result<HydrationReport> {
	HydrationPass::new(doc, root, program, scope, options)?.run()
}

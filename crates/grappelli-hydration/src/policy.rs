//! Mismatch classification and repair actions.
//!
//! Value mismatches are patched in place and keep node identity, with one
//! exception: a `style` mismatch replaces the element by default. Structural
//! mismatches replace the node, so any id held for it goes stale.

use serde::{Deserialize, Serialize};

use crate::mismatch::{Mismatch, MismatchKind};
use crate::options::HydrationOptions;

/// What the walker does about a mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairAction {
	/// Overwrite the live value with the expected one. The node keeps its
	/// identity.
	PatchValue,
	/// Destroy the live node and mount the expected one in its place.
	ReplaceNode,
	/// Report the mismatch and leave the live node as found.
	ReportOnly,
	/// Neither report nor repair.
	Ignore,
}

impl RepairAction {
	/// Returns `true` if the action produces a diagnostic.
	pub fn is_reported(self) -> bool {
		self != Self::Ignore
	}

	/// Returns `true` if the action mutates the live tree.
	pub fn mutates(self) -> bool {
		matches!(self, Self::PatchValue | Self::ReplaceNode)
	}
}

/// Maps mismatches to repair actions.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairPolicy {
	options: HydrationOptions,
}

impl Default for RepairPolicy {
	fn default() -> Self {
		Self::new(HydrationOptions::default())
	}
}

impl RepairPolicy {
	/// Creates a policy from options.
	pub fn new(options: HydrationOptions) -> Self {
		Self { options }
	}

	/// The options this policy was built from.
	pub fn options(&self) -> &HydrationOptions {
		&self.options
	}

	/// Classifies a mismatch.
	///
	/// ```
	/// use grappelli_hydration::{Mismatch, NodeLocator, RepairAction, RepairPolicy};
	///
	/// let policy = RepairPolicy::default();
	/// let style = Mismatch::attribute(NodeLocator::default(), "<p>", "style", None, None);
	/// let title = Mismatch::attribute(NodeLocator::default(), "<p>", "title", None, None);
	///
	/// assert_eq!(policy.classify(&style), RepairAction::ReplaceNode);
	/// assert_eq!(policy.classify(&title), RepairAction::PatchValue);
	/// ```
	pub fn classify(&self, mismatch: &Mismatch) -> RepairAction {
		let options = &self.options;
		match mismatch.kind {
			MismatchKind::AttributeValue | MismatchKind::StyleValue => {
				let name = mismatch.name.as_deref().unwrap_or_default();
				if options.is_ignored(name) {
					return RepairAction::Ignore;
				}
				if let Some(action) = options.override_for(name) {
					return action;
				}
				if mismatch.kind == MismatchKind::StyleValue {
					options.style_action
				} else {
					options.attribute_action
				}
			}
			MismatchKind::TextValue => options.text_action,
			MismatchKind::MissingNode | MismatchKind::ExtraNode if options.structural_repair => {
				RepairAction::ReplaceNode
			}
			MismatchKind::MissingNode | MismatchKind::ExtraNode => RepairAction::ReportOnly,
		}
	}
}

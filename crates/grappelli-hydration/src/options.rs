//! Hydration options.
//!
//! ```toml
//! style_action = "replace_node"
//! attribute_action = "patch_value"
//! text_action = "patch_value"
//! structural_repair = true
//! ignore_attributes = ["data-nonce"]
//!
//! [attribute_overrides]
//! class = "report_only"
//! ```

use std::path::Path;

use grappelli_compiler::ConfigError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::policy::RepairAction;

/// Options for a hydration pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HydrationOptions {
	/// Action for `style` mismatches.
	pub style_action: RepairAction,
	/// Action for other attribute mismatches.
	pub attribute_action: RepairAction,
	/// Action for text mismatches.
	pub text_action: RepairAction,
	/// Replace structurally mismatched nodes. When disabled they are
	/// reported and left as found, and their content is not walked.
	pub structural_repair: bool,
	/// Per-attribute actions that take precedence over the defaults.
	pub attribute_overrides: IndexMap<String, RepairAction>,
	/// Attributes whose mismatches are neither reported nor repaired.
	pub ignore_attributes: Vec<String>,
}

impl Default for HydrationOptions {
	fn default() -> Self {
		Self {
			style_action: RepairAction::ReplaceNode,
			attribute_action: RepairAction::PatchValue,
			text_action: RepairAction::PatchValue,
			structural_repair: true,
			attribute_overrides: IndexMap::new(),
			ignore_attributes: Vec::new(),
		}
	}
}

impl HydrationOptions {
	/// Creates new default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the action for `style` mismatches.
	pub fn style_action(mut self, action: RepairAction) -> Self {
		self.style_action = action;
		self
	}

	/// Sets the action for other attribute mismatches.
	pub fn attribute_action(mut self, action: RepairAction) -> Self {
		self.attribute_action = action;
		self
	}

	/// Sets the action for text mismatches.
	pub fn text_action(mut self, action: RepairAction) -> Self {
		self.text_action = action;
		self
	}

	/// Enables or disables structural repair.
	pub fn structural_repair(mut self, enable: bool) -> Self {
		self.structural_repair = enable;
		self
	}

	/// Overrides the action for one attribute.
	pub fn attribute_override(mut self, name: &str, action: RepairAction) -> Self {
		self.attribute_overrides.insert(name.to_ascii_lowercase(), action);
		self
	}

	/// Ignores mismatches on one attribute.
	pub fn ignore_attribute(mut self, name: &str) -> Self {
		self.ignore_attributes.push(name.to_ascii_lowercase());
		self
	}

	/// Returns `true` if mismatches on `name` are ignored.
	pub fn is_ignored(&self, name: &str) -> bool {
		self.ignore_attributes
			.iter()
			.any(|ignored| ignored.eq_ignore_ascii_case(name))
	}

	/// The override for `name`, if any.
	pub fn override_for(&self, name: &str) -> Option<RepairAction> {
		self.attribute_overrides
			.iter()
			.find(|(attribute, _)| attribute.eq_ignore_ascii_case(name))
			.map(|(_, action)| *action)
	}

	/// Parses options from a TOML string.
	pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(source)?)
	}

	/// Loads options from a TOML file.
	pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&source)
	}
}

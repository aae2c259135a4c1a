//! Leveled hydration diagnostics.
//!
//! One message per reported mismatch, in the order the walker found them,
//! followed by a single terminal message when at least one was reported.
//! Message text is stable; callers assert on it.

use std::fmt;

use crate::mismatch::{Mismatch, MismatchKind};

/// Terminal message appended after a pass that reported mismatches.
pub const COMPLETED_WITH_ERRORS: &str = "Hydration completed with errors.";

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
	/// A recoverable value mismatch, or the terminal summary.
	Warn,
	/// A structural mismatch.
	Error,
}

impl fmt::Display for Level {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Warn => "warn",
			Self::Error => "error",
		})
	}
}

/// One leveled message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
	/// Severity.
	pub level: Level,
	/// Message text.
	pub message: String,
}

impl Diagnostic {
	/// Creates a warning.
	pub fn warn(message: impl Into<String>) -> Self {
		Self {
			level: Level::Warn,
			message: message.into(),
		}
	}

	/// Creates an error.
	pub fn error(message: impl Into<String>) -> Self {
		Self {
			level: Level::Error,
			message: message.into(),
		}
	}

	/// The diagnostic for a mismatch.
	pub fn for_mismatch(mismatch: &Mismatch) -> Self {
		let subject = &mismatch.subject;
		match mismatch.kind {
			MismatchKind::AttributeValue | MismatchKind::StyleValue => Self::warn(format!(
				"Mismatch hydrating element {subject}: attribute \"{}\" has different values, expected {} but found {}",
				mismatch.name.as_deref().unwrap_or_default(),
				quoted_or_null(mismatch.expected.as_deref()),
				quoted_or_null(mismatch.found.as_deref()),
			)),
			MismatchKind::TextValue => Self::warn(format!(
				"Mismatch hydrating text node in {subject}: text values do not match, expected \"{}\" but found \"{}\"",
				mismatch.expected.as_deref().unwrap_or_default(),
				mismatch.found.as_deref().unwrap_or_default(),
			)),
			MismatchKind::MissingNode => Self::error(format!(
				"Mismatch hydrating element {subject}: expected node {} but found {}",
				mismatch.expected.as_deref().unwrap_or("nothing"),
				mismatch.found.as_deref().unwrap_or("nothing"),
			)),
			MismatchKind::ExtraNode => Self::error(format!(
				"Mismatch hydrating element {subject}: expected nothing but found {}",
				mismatch.found.as_deref().unwrap_or("nothing"),
			)),
		}
	}
}

impl fmt::Display for Diagnostic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[{}]: {}", self.level, self.message)
	}
}

fn quoted_or_null(value: Option<&str>) -> String {
	match value {
		Some(value) => format!("\"{value}\""),
		None => "null".to_string(),
	}
}

/// Diagnostics collected during one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
	entries: Vec<Diagnostic>,
	finished: bool,
}

impl Diagnostics {
	/// Creates an empty collection.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records and logs the diagnostic for a mismatch.
	pub fn report(&mut self, mismatch: &Mismatch) {
		self.push(Diagnostic::for_mismatch(mismatch));
	}

	fn push(&mut self, diagnostic: Diagnostic) {
		match diagnostic.level {
			Level::Warn => crate::warn_log!(
				sequence = self.entries.len(),
				"{}",
				diagnostic.message
			),
			Level::Error => crate::error_log!(
				sequence = self.entries.len(),
				"{}",
				diagnostic.message
			),
		}
		self.entries.push(diagnostic);
	}

	/// Closes the collection, appending the terminal message if anything was
	/// reported. Later calls do nothing.
	pub fn finish(&mut self) {
		if self.finished {
			return;
		}
		self.finished = true;
		if !self.entries.is_empty() {
			self.push(Diagnostic::warn(COMPLETED_WITH_ERRORS));
		}
	}

	/// Whether [`finish`](Self::finish) has been called.
	pub fn is_finished(&self) -> bool {
		self.finished
	}

	/// Warning messages in emission order.
	pub fn warnings(&self) -> Vec<&str> {
		self.messages(Level::Warn)
	}

	/// Error messages in emission order.
	pub fn errors(&self) -> Vec<&str> {
		self.messages(Level::Error)
	}

	fn messages(&self, level: Level) -> Vec<&str> {
		self.entries
			.iter()
			.filter(|entry| entry.level == level)
			.map(|entry| entry.message.as_str())
			.collect()
	}

	/// All diagnostics in emission order.
	pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
		self.entries.iter()
	}

	/// Number of diagnostics, including the terminal message.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` if nothing was reported.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl<'a> IntoIterator for &'a Diagnostics {
	type Item = &'a Diagnostic;
	type IntoIter = std::slice::Iter<'a, Diagnostic>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::mismatch::NodeLocator;
	use rstest::rstest;

	#[rstest]
	#[case(
		Mismatch::attribute(NodeLocator::default(), "<p>", "title", Some("a".into()), None),
		Level::Warn,
		"Mismatch hydrating element <p>: attribute \"title\" has different values, expected \"a\" but found null"
	)]
	#[case(
		Mismatch::text(NodeLocator::default(), "<span>", "x", "y"),
		Level::Warn,
		"Mismatch hydrating text node in <span>: text values do not match, expected \"x\" but found \"y\""
	)]
	#[case(
		Mismatch::missing(NodeLocator::default(), "<ul>", "<li>", None),
		Level::Error,
		"Mismatch hydrating element <ul>: expected node <li> but found nothing"
	)]
	#[case(
		Mismatch::missing(NodeLocator::default(), "<ul>", "<li>", Some("<p>".into())),
		Level::Error,
		"Mismatch hydrating element <ul>: expected node <li> but found <p>"
	)]
	#[case(
		Mismatch::extra(NodeLocator::default(), "<ul>", "text \"x\""),
		Level::Error,
		"Mismatch hydrating element <ul>: expected nothing but found text \"x\""
	)]
	fn test_messages(#[case] mismatch: Mismatch, #[case] level: Level, #[case] message: &str) {
		let diagnostic = Diagnostic::for_mismatch(&mismatch);
		assert_eq!(diagnostic.level, level);
		assert_eq!(diagnostic.message, message);
	}

	#[rstest]
	fn test_terminal_message_only_once_and_only_after_reports() {
		let mut empty = Diagnostics::new();
		empty.finish();
		assert!(empty.is_empty());

		let mut diagnostics = Diagnostics::new();
		diagnostics.report(&Mismatch::text(NodeLocator::default(), "<p>", "a", "b"));
		diagnostics.finish();
		diagnostics.finish();

		assert_eq!(diagnostics.len(), 2);
		assert_eq!(diagnostics.warnings().last(), Some(&COMPLETED_WITH_ERRORS));
		assert!(diagnostics.errors().is_empty());
	}

	#[rstest]
	fn test_display_prefixes_level() {
		assert_eq!(Diagnostic::error("boom").to_string(), "[error]: boom");
	}
}

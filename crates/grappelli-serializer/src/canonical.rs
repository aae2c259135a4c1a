//! Canonical forms for attribute and style values.
//!
//! `canonicalize(kind, raw)` is the single source of truth for attribute
//! equality. Comparisons are always made between canonical forms, never raw
//! strings.
//!
//! ## Style
//!
//! - split into declarations on `;` (outside quotes and parentheses)
//! - trim each declaration and drop empty ones
//! - keep declaration order; never reorder or deduplicate
//! - lowercase property names, except custom properties (`--name`)
//! - collapse whitespace runs in values (outside quotes) to a single space
//! - keep `!important` markers as written, separated by one space
//! - join with `"; "` and terminate with `;`
//!
//! A style with no declarations canonicalizes to the empty string, which
//! [`canonical_attribute`] treats as an absent attribute.

use crate::html::is_boolean_attribute;

/// Determines which canonicalization rules apply to an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
	/// The `style` attribute.
	Style,
	/// The `class` attribute (whitespace-separated token list).
	Class,
	/// A boolean attribute (presence/absence only).
	Boolean,
	/// Any other attribute.
	Generic,
}

impl AttributeKind {
	/// Classifies an attribute by name (case-insensitive).
	pub fn of(name: &str) -> Self {
		if name.eq_ignore_ascii_case("style") {
			Self::Style
		} else if name.eq_ignore_ascii_case("class") {
			Self::Class
		} else if is_boolean_attribute(name) {
			Self::Boolean
		} else {
			Self::Generic
		}
	}
}

/// One declaration of a style attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDeclaration {
	/// Property name. Lowercased unless it is a custom property.
	pub property: String,
	/// Value with whitespace collapsed, without the priority marker.
	pub value: String,
	/// The priority marker as written (e.g. `!important`), if any.
	pub priority: Option<String>,
}

impl StyleDeclaration {
	fn parse(raw: &str) -> Self {
		let Some((property, value)) = raw.split_once(':') else {
			// Not a declaration. Kept as a bare token.
			return Self {
				property: collapse_whitespace(raw),
				value: String::new(),
				priority: None,
			};
		};

		let property = property.trim();
		let property = if property.starts_with("--") {
			property.to_string()
		} else {
			property.to_ascii_lowercase()
		};

		let (value, priority) = split_priority(value);

		Self {
			property,
			value: collapse_whitespace(value),
			priority,
		}
	}

	fn write_to(&self, out: &mut String) {
		out.push_str(&self.property);
		if self.value.is_empty() && self.priority.is_none() {
			return;
		}
		out.push_str(": ");
		out.push_str(&self.value);
		if let Some(priority) = &self.priority {
			if !self.value.is_empty() {
				out.push(' ');
			}
			out.push_str(priority);
		}
	}
}

/// Splits a trailing `!important` marker off a declaration value.
fn split_priority(value: &str) -> (&str, Option<String>) {
	let Some(bang) = value.rfind('!') else {
		return (value, None);
	};
	let marker = value[bang + 1..].trim();
	if !marker.eq_ignore_ascii_case("important") {
		return (value, None);
	}
	let written = value[bang..].trim();
	// `! important` is legal CSS; drop the inner whitespace, keep the case.
	let written: String = written.chars().filter(|c| !c.is_whitespace()).collect();
	(value[..bang].trim_end(), Some(written))
}

/// Collapses whitespace runs outside quotes to a single space and trims.
fn collapse_whitespace(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());
	let mut quote: Option<char> = None;
	let mut pending_space = false;

	for ch in raw.trim().chars() {
		match quote {
			Some(q) => {
				out.push(ch);
				if ch == q {
					quote = None;
				}
			}
			None if ch.is_whitespace() => pending_space = true,
			None => {
				if pending_space {
					out.push(' ');
					pending_space = false;
				}
				if ch == '"' || ch == '\'' {
					quote = Some(ch);
				}
				out.push(ch);
			}
		}
	}

	out
}

/// Splits a style attribute into raw declarations.
///
/// `;` inside quotes or parentheses (e.g. `url("data:a;b")`) does not split.
fn split_declarations(raw: &str) -> Vec<&str> {
	let mut parts = Vec::new();
	let mut quote: Option<char> = None;
	let mut depth = 0usize;
	let mut start = 0usize;

	for (index, ch) in raw.char_indices() {
		match (quote, ch) {
			(Some(q), c) if c == q => quote = None,
			(Some(_), _) => {}
			(None, '"' | '\'') => quote = Some(ch),
			(None, '(') => depth += 1,
			(None, ')') => depth = depth.saturating_sub(1),
			(None, ';') if depth == 0 => {
				parts.push(&raw[start..index]);
				start = index + 1;
			}
			_ => {}
		}
	}
	parts.push(&raw[start..]);

	parts
}

/// Parses a style attribute into its declarations, in source order.
///
/// # Examples
///
/// ```
/// use grappelli_serializer::parse_style;
///
/// let decls = parse_style("color: red; border-color: red !important;");
/// assert_eq!(decls.len(), 2);
/// assert_eq!(decls[1].priority.as_deref(), Some("!important"));
/// ```
pub fn parse_style(raw: &str) -> Vec<StyleDeclaration> {
	split_declarations(raw)
		.into_iter()
		.map(str::trim)
		.filter(|decl| !decl.is_empty())
		.map(StyleDeclaration::parse)
		.collect()
}

/// Canonicalizes a style attribute value.
///
/// # Examples
///
/// ```
/// use grappelli_serializer::normalize_style;
///
/// assert_eq!(
///     normalize_style("background-color: red; border-color: red !important;"),
///     "background-color: red; border-color: red !important;"
/// );
/// assert_eq!(normalize_style("COLOR:red"), "color: red;");
/// assert_eq!(normalize_style(" ; ;"), "");
/// ```
pub fn normalize_style(raw: &str) -> String {
	let declarations = parse_style(raw);
	let mut out = String::with_capacity(raw.len());

	for (index, declaration) in declarations.iter().enumerate() {
		if index > 0 {
			out.push(' ');
		}
		declaration.write_to(&mut out);
		out.push(';');
	}

	out
}

/// Canonicalizes a raw attribute value according to `kind`.
///
/// - `Style`: see the module documentation
/// - `Class`: tokens separated by single spaces, order preserved
/// - `Boolean`: always the empty string (presence is all that matters)
/// - `Generic`: trimmed value
pub fn canonicalize(kind: AttributeKind, raw: &str) -> String {
	match kind {
		AttributeKind::Style => normalize_style(raw),
		AttributeKind::Class => raw.split_whitespace().collect::<Vec<_>>().join(" "),
		AttributeKind::Boolean => String::new(),
		AttributeKind::Generic => raw.trim().to_string(),
	}
}

/// Canonicalizes an optional attribute value by attribute name.
///
/// `None` means the attribute is absent. An empty style is also absent.
pub fn canonical_attribute(name: &str, raw: Option<&str>) -> Option<String> {
	let kind = AttributeKind::of(name);
	let value = canonicalize(kind, raw?);
	if kind == AttributeKind::Style && value.is_empty() {
		return None;
	}
	Some(value)
}

/// Compares two optional attribute values by their canonical forms.
///
/// # Examples
///
/// ```
/// use grappelli_serializer::canonical_eq;
///
/// assert!(canonical_eq("style", Some("color:red"), Some("color: red;")));
/// assert!(!canonical_eq(
///     "style",
///     Some("color: red;"),
///     Some("color: red; margin: 1px;"),
/// ));
/// assert!(canonical_eq("style", Some(""), None));
/// assert!(!canonical_eq("title", Some(""), None));
/// ```
pub fn canonical_eq(name: &str, expected: Option<&str>, found: Option<&str>) -> bool {
	canonical_attribute(name, expected) == canonical_attribute(name, found)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("color: red", "color: red;")]
	#[case("color:red;", "color: red;")]
	#[case("  color :   red  ;  ", "color: red;")]
	#[case("color: red;;margin: 1px", "color: red; margin: 1px;")]
	#[case("COLOR: Red", "color: Red;")]
	#[case("--Main-Color: blue", "--Main-Color: blue;")]
	#[case("border-color: red !important", "border-color: red !important;")]
	#[case("border-color: red!important", "border-color: red !important;")]
	#[case("border-color: red ! IMPORTANT", "border-color: red !IMPORTANT;")]
	#[case("font-family: 'A  B', serif", "font-family: 'A  B', serif;")]
	#[case(
		"background: url(\"data:image/png;base64,xx\")",
		"background: url(\"data:image/png;base64,xx\");"
	)]
	#[case("", "")]
	#[case(";", "")]
	#[case("color:", "color;")]
	fn test_normalize_style(#[case] raw: &str, #[case] expected: &str) {
		assert_eq!(normalize_style(raw), expected);
	}

	#[rstest]
	fn test_normalize_style_preserves_order() {
		assert_eq!(
			normalize_style("margin: 0; color: red"),
			"margin: 0; color: red;"
		);
		assert_ne!(
			normalize_style("margin: 0; color: red"),
			normalize_style("color: red; margin: 0")
		);
	}

	#[rstest]
	fn test_priority_is_significant() {
		assert!(!canonical_eq(
			"style",
			Some("background-color: red; border-color: red !important;"),
			Some("background-color: red; border-color: red;"),
		));
	}

	#[rstest]
	fn test_extra_declaration_is_not_a_subset_match() {
		assert!(!canonical_eq(
			"style",
			Some("background-color: red; border-color: red;"),
			Some("background-color: red; border-color: red; margin: 1px;"),
		));
	}

	#[rstest]
	#[case(AttributeKind::Class, "  a   b  c ", "a b c")]
	#[case(AttributeKind::Boolean, "disabled", "")]
	#[case(AttributeKind::Generic, "  hello  ", "hello")]
	#[case(AttributeKind::Generic, "Hello", "Hello")]
	fn test_canonicalize(#[case] kind: AttributeKind, #[case] raw: &str, #[case] expected: &str) {
		assert_eq!(canonicalize(kind, raw), expected);
	}

	#[rstest]
	#[case("style", AttributeKind::Style)]
	#[case("STYLE", AttributeKind::Style)]
	#[case("class", AttributeKind::Class)]
	#[case("hidden", AttributeKind::Boolean)]
	#[case("data-id", AttributeKind::Generic)]
	fn test_attribute_kind_of(#[case] name: &str, #[case] kind: AttributeKind) {
		assert_eq!(AttributeKind::of(name), kind);
	}

	#[rstest]
	fn test_boolean_presence() {
		assert!(canonical_eq("disabled", Some(""), Some("disabled")));
		assert!(!canonical_eq("disabled", Some(""), None));
	}

	#[rstest]
	fn test_declaration_without_colon_is_kept() {
		assert_eq!(normalize_style("color: red; garbage"), "color: red; garbage;");
		assert!(!canonical_eq("style", Some("color: red;"), Some("color: red; garbage")));
	}
}

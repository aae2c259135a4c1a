//! Text and expression-value massaging.
//!
//! Both render targets turn expression values into strings through the
//! functions here, so a value can never render differently on the server and
//! the client.

use serde_json::Value;

/// Placeholder emitted for a text run that renders to the empty string.
///
/// An empty text node does not survive a trip through markup, so the server
/// emits a zero-width joiner instead. [`canonical_text`] maps it back to `""`.
pub const TEXT_PLACEHOLDER: char = '\u{200D}';

/// Converts an expression value into text content.
///
/// - `null` becomes the empty string
/// - strings are used verbatim
/// - numbers and booleans use their JSON display form
/// - arrays and objects serialize as compact JSON
///
/// # Examples
///
/// ```
/// use grappelli_serializer::massage_text_content;
/// use serde_json::json;
///
/// assert_eq!(massage_text_content(&json!(null)), "");
/// assert_eq!(massage_text_content(&json!("hi")), "hi");
/// assert_eq!(massage_text_content(&json!(42)), "42");
/// assert_eq!(massage_text_content(&json!(true)), "true");
/// ```
pub fn massage_text_content(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::String(text) => text.clone(),
		Value::Bool(flag) => flag.to_string(),
		Value::Number(number) => number.to_string(),
		Value::Array(_) | Value::Object(_) => value.to_string(),
	}
}

/// Canonical form of a text node's content for comparison.
///
/// A node made only of placeholders is the empty string. Any other text is
/// content as written, including zero-width joiners inside emoji sequences.
///
/// # Examples
///
/// ```
/// use grappelli_serializer::canonical_text;
///
/// assert_eq!(canonical_text("\u{200D}"), "");
/// assert_eq!(canonical_text("a\u{200D}b"), "a\u{200D}b");
/// assert_eq!(canonical_text("plain"), "plain");
/// ```
pub fn canonical_text(text: &str) -> &str {
	if text.chars().all(|c| c == TEXT_PLACEHOLDER) {
		""
	} else {
		text
	}
}

/// Truthiness of an expression value for conditional rendering.
///
/// `null`, `false`, `0` and `""` are falsy. Everything else, including empty
/// arrays and objects, is truthy.
pub fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(flag) => *flag,
		Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
		Value::String(text) => !text.is_empty(),
		Value::Array(_) | Value::Object(_) => true,
	}
}

/// Converts a dynamic attribute value into its rendered form.
///
/// `null` and `false` mean the attribute is absent. `true` renders as the
/// empty string (present). Anything else goes through
/// [`massage_text_content`]. For boolean attributes any truthy value means
/// present.
///
/// # Examples
///
/// ```
/// use grappelli_serializer::attribute_from_value;
/// use serde_json::json;
///
/// assert_eq!(attribute_from_value("title", &json!(null)), None);
/// assert_eq!(attribute_from_value("title", &json!(true)).as_deref(), Some(""));
/// assert_eq!(attribute_from_value("title", &json!(3)).as_deref(), Some("3"));
/// assert_eq!(attribute_from_value("hidden", &json!("yes")).as_deref(), Some(""));
/// assert_eq!(attribute_from_value("hidden", &json!(0)), None);
/// ```
pub fn attribute_from_value(name: &str, value: &Value) -> Option<String> {
	if crate::html::is_boolean_attribute(name) {
		return is_truthy(value).then(String::new);
	}
	match value {
		Value::Null | Value::Bool(false) => None,
		Value::Bool(true) => Some(String::new()),
		other => Some(massage_text_content(other)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(json!(null), "")]
	#[case(json!(""), "")]
	#[case(json!("a <b>"), "a <b>")]
	#[case(json!(1.5), "1.5")]
	#[case(json!(-3), "-3")]
	#[case(json!(false), "false")]
	#[case(json!([1, 2]), "[1,2]")]
	#[case(json!({"a": 1}), "{\"a\":1}")]
	fn test_massage_text_content(#[case] value: Value, #[case] expected: &str) {
		assert_eq!(massage_text_content(&value), expected);
	}

	#[rstest]
	#[case("\u{200D}", "")]
	#[case("\u{200D}\u{200D}", "")]
	#[case("", "")]
	#[case("a\u{200D}", "a\u{200D}")]
	#[case("\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}", "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}")]
	#[case("hello", "hello")]
	fn test_canonical_text(#[case] text: &str, #[case] expected: &str) {
		assert_eq!(canonical_text(text), expected);
	}

	#[rstest]
	#[case(json!(null), false)]
	#[case(json!(false), false)]
	#[case(json!(0), false)]
	#[case(json!(0.0), false)]
	#[case(json!(""), false)]
	#[case(json!(true), true)]
	#[case(json!(1), true)]
	#[case(json!("0"), true)]
	#[case(json!([]), true)]
	#[case(json!({}), true)]
	fn test_is_truthy(#[case] value: Value, #[case] expected: bool) {
		assert_eq!(is_truthy(&value), expected);
	}

	#[rstest]
	fn test_attribute_from_value_false_is_absent() {
		assert_eq!(attribute_from_value("title", &json!(false)), None);
		assert_eq!(
			attribute_from_value("style", &json!("color: red")).as_deref(),
			Some("color: red")
		);
	}
}

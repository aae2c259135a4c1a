//! HTML escaping.
//!
//! The server path escapes text and attribute values with [`html_escape`].
//! The escaped forms are the ones every HTML parser decodes back, so a value
//! is byte-identical after a trip through server markup.

use std::borrow::Cow;

/// Escapes HTML special characters.
///
/// # Examples
///
/// ```
/// use grappelli_serializer::html_escape;
///
/// assert_eq!(html_escape("a < b & c"), "a &lt; b &amp; c");
/// assert_eq!(html_escape("plain"), "plain");
/// ```
pub fn html_escape(text: &str) -> Cow<'_, str> {
	if !text
		.bytes()
		.any(|b| matches!(b, b'&' | b'<' | b'>' | b'"' | b'\''))
	{
		return Cow::Borrowed(text);
	}

	let mut result = String::with_capacity(text.len() + 10);
	for ch in text.chars() {
		match ch {
			'&' => result.push_str("&amp;"),
			'<' => result.push_str("&lt;"),
			'>' => result.push_str("&gt;"),
			'"' => result.push_str("&quot;"),
			'\'' => result.push_str("&#x27;"),
			_ => result.push(ch),
		}
	}
	Cow::Owned(result)
}

//! Property-based tests for the markup parser and serializer
//!
//! Uses proptest to verify that values survive a trip through markup.

use grappelli_dom::{parse_fragment, to_markup};
use grappelli_serializer::html_escape;
use proptest::prelude::*;
use proptest::proptest;

proptest! {
	/// Property: escaped text parses back to the original text
	#[test]
	fn prop_escaped_text_survives(text in r"\PC{1,64}") {
		let markup = format!("<p>{}</p>", html_escape(&text));
		let doc = parse_fragment(&markup);
		let p = doc.first_element_by_tag(doc.root(), "p").unwrap();

		prop_assert_eq!(doc.text_content(p), text);
	}

	/// Property: escaped attribute values parse back to the original value
	#[test]
	fn prop_escaped_attribute_survives(
		name in r"[a-z][a-z\-]{0,10}",
		value in r"\PC{1,64}"
	) {
		let markup = format!("<div {}=\"{}\"></div>", name, html_escape(&value));
		let doc = parse_fragment(&markup);
		let div = doc.first_element_by_tag(doc.root(), "div").unwrap();

		prop_assert_eq!(doc.attribute(div, &name), Some(value.as_str()));
	}

	/// Property: serializing a parsed tree and parsing it again is stable
	#[test]
	fn prop_serialization_is_stable(
		tags in prop::collection::vec(r"(div|p|span)", 1..6),
		words in prop::collection::vec(r"[a-z &<>]{0,8}", 1..6)
	) {
		let mut markup = String::new();
		for (tag, word) in tags.iter().zip(words.iter().cycle()) {
			markup.push_str(&format!("<{tag} title=\"{}\">{}", html_escape(word), html_escape(word)));
		}
		for tag in tags.iter().rev() {
			markup.push_str(&format!("</{tag}>"));
		}

		let first = parse_fragment(&markup);
		let serialized = to_markup(&first, first.root());
		let second = parse_fragment(&serialized);

		prop_assert_eq!(to_markup(&second, second.root()), serialized);
	}
}

//! Static facts about HTML elements and attributes.

/// Elements that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
	"wbr",
];

/// Elements whose content is raw text rather than markup.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Elements whose first newline is swallowed by the HTML parser.
const LEADING_NEWLINE_ELEMENTS: &[&str] = &["pre", "textarea", "listing"];

/// Boolean attributes are either present or absent in HTML, not string-valued.
const BOOLEAN_ATTRIBUTES: &[&str] = &[
	"disabled",
	"required",
	"readonly",
	"checked",
	"selected",
	"autofocus",
	"autoplay",
	"controls",
	"loop",
	"muted",
	"default",
	"defer",
	"formnovalidate",
	"hidden",
	"ismap",
	"multiple",
	"novalidate",
	"open",
	"reversed",
];

/// Returns whether `tag` is a void element (no children, no closing tag).
pub fn is_void_element(tag: &str) -> bool {
	VOID_ELEMENTS
		.iter()
		.any(|void| void.eq_ignore_ascii_case(tag))
}

/// Returns whether `tag` holds raw text (`<script>`, `<style>`).
pub fn is_raw_text_element(tag: &str) -> bool {
	RAW_TEXT_ELEMENTS
		.iter()
		.any(|raw| raw.eq_ignore_ascii_case(tag))
}

/// Returns whether a parser drops a newline right after the start tag of
/// `tag`. Markup writers double that newline so content keeps its own.
pub fn drops_leading_newline(tag: &str) -> bool {
	LEADING_NEWLINE_ELEMENTS
		.iter()
		.any(|element| element.eq_ignore_ascii_case(tag))
}

/// Returns whether `name` is a boolean attribute.
pub fn is_boolean_attribute(name: &str) -> bool {
	BOOLEAN_ATTRIBUTES
		.iter()
		.any(|attr| attr.eq_ignore_ascii_case(name))
}

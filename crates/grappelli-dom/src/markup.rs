//! Markup serialization of live subtrees.

use grappelli_serializer::{drops_leading_newline, html_escape, is_raw_text_element, is_void_element};

use crate::document::{Document, NodeId, NodeKind};

/// Serializes the subtree rooted at `id`.
///
/// A document or unknown id serializes its children only. Attribute values
/// are always double-quoted; an empty value renders as a bare attribute. Text
/// opening a `<pre>` or `<textarea>` with a newline gets one more, which the
/// parser drops again.
///
/// # Examples
///
/// ```
/// use grappelli_dom::{parse_fragment, to_markup};
///
/// let doc = parse_fragment("<p CLASS='a'>x &lt; y<br></p>");
/// assert_eq!(to_markup(&doc, doc.root()), r#"<p class="a">x &lt; y<br></p>"#);
/// ```
pub fn to_markup(doc: &Document, id: NodeId) -> String {
	let mut out = String::new();
	write_node(doc, id, false, &mut out);
	out
}

/// Serializes the children of `id`.
pub fn inner_markup(doc: &Document, id: NodeId) -> String {
	let raw = doc.tag(id).is_some_and(is_raw_text_element);
	let mut out = String::new();
	for &child in doc.children(id) {
		write_node(doc, child, raw, &mut out);
	}
	out
}

fn write_node(doc: &Document, id: NodeId, raw_text: bool, out: &mut String) {
	match doc.kind(id) {
		Some(NodeKind::Element(data)) => {
			out.push('<');
			out.push_str(&data.tag);
			for (name, value) in &data.attributes {
				out.push(' ');
				out.push_str(name);
				if !value.is_empty() {
					out.push_str("=\"");
					out.push_str(&html_escape(value));
					out.push('"');
				}
			}
			out.push('>');
			if is_void_element(&data.tag) {
				return;
			}
			let first_text = doc.children(id).first().and_then(|&child| doc.text(child));
			if drops_leading_newline(&data.tag) && first_text.is_some_and(|text| text.starts_with('\n')) {
				out.push('\n');
			}
			out.push_str(&inner_markup(doc, id));
			out.push_str("</");
			out.push_str(&data.tag);
			out.push('>');
		}
		Some(NodeKind::Text(text)) if raw_text => out.push_str(text),
		Some(NodeKind::Text(text)) => out.push_str(&html_escape(text)),
		Some(NodeKind::Comment(text)) => {
			out.push_str("<!--");
			out.push_str(text);
			out.push_str("-->");
		}
		Some(NodeKind::Document) | None => {
			for &child in doc.children(id) {
				write_node(doc, child, false, out);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::parser::parse_fragment;
	use rstest::rstest;

	#[rstest]
	#[case("<div id=\"a\"><p>x</p><!--c--></div>")]
	#[case("<input disabled><span>a &amp; b</span>")]
	#[case("<style>p > a { color: red; }</style>")]
	#[case("<p title=\"&quot;q&quot;\">\u{200D}</p>")]
	#[case("<pre>\n\nx</pre><textarea>\n\n</textarea>")]
	fn test_reparse_is_stable(#[case] markup: &str) {
		let doc = parse_fragment(markup);
		let first = to_markup(&doc, doc.root());
		let reparsed = parse_fragment(&first);
		assert_eq!(to_markup(&reparsed, reparsed.root()), first);
	}

	#[rstest]
	fn test_leading_newline_in_pre_survives_reparse() {
		let mut doc = Document::new();
		let root = doc.root();
		let pre = doc.create_element("pre");
		let text = doc.create_text("\nx");
		doc.append_child(root, pre).unwrap();
		doc.append_child(pre, text).unwrap();

		let markup = to_markup(&doc, root);
		assert_eq!(markup, "<pre>\n\nx</pre>");
		let reparsed = parse_fragment(&markup);
		let pre = reparsed.first_element_by_tag(reparsed.root(), "pre").unwrap();
		assert_eq!(reparsed.text_content(pre), "\nx");
	}

	#[rstest]
	fn test_detached_subtree() {
		let mut doc = Document::new();
		let ul = doc.create_element("ul");
		let li = doc.create_element("li");
		let text = doc.create_text("1 < 2");
		doc.append_child(ul, li).unwrap();
		doc.append_child(li, text).unwrap();

		assert_eq!(to_markup(&doc, ul), "<ul><li>1 &lt; 2</li></ul>");
		assert_eq!(inner_markup(&doc, ul), "<li>1 &lt; 2</li>");
	}
}

//! HTML5 fragment parsing of server-rendered output.
//!
//! Markup goes through the scraper/html5ever tree builder in fragment mode
//! with a `<body>` context, so the resulting tree is the one a browser would
//! hand to hydration: implied end tags are inserted, a block element closes an
//! open `<p>`, the newline right after `<pre>` or `<textarea>` is dropped and
//! adjacent character data is merged. The built tree is then copied into a
//! [`Document`].

use scraper::{Html, Node};
use tracing::debug;

use crate::document::{Document, ElementData, NodeKind};
use crate::error::ParseError;

/// Parses a markup fragment into a new document, recovering from malformed
/// markup the way a browser does.
///
/// Top-level nodes of the fragment become children of the document root.
/// Doctypes and processing instructions are dropped.
///
/// # Examples
///
/// ```
/// use grappelli_dom::parse_fragment;
///
/// let doc = parse_fragment("<p class=x>Tom &amp; Jerry</p>");
/// let p = doc.first_element_by_tag(doc.root(), "p").unwrap();
/// assert_eq!(doc.attribute(p, "class"), Some("x"));
/// assert_eq!(doc.text_content(p), "Tom & Jerry");
/// ```
pub fn parse_fragment(markup: &str) -> Document {
	let html = Html::parse_fragment(markup);
	if let Some(first) = html.errors.first() {
		debug!(count = html.errors.len(), %first, "recovered from malformed markup");
	}
	build(&html)
}

/// Parses a markup fragment, failing if the tree builder had to recover from
/// anything.
///
/// # Examples
///
/// ```
/// use grappelli_dom::parse_fragment_strict;
///
/// assert!(parse_fragment_strict("<p>a</p>").is_ok());
/// assert!(parse_fragment_strict("<p>a</em></p>").is_err());
/// ```
pub fn parse_fragment_strict(markup: &str) -> Result<Document, ParseError> {
	let html = Html::parse_fragment(markup);
	if !html.errors.is_empty() {
		return Err(ParseError {
			errors: html.errors.iter().map(ToString::to_string).collect(),
		});
	}
	Ok(build(&html))
}

fn build(html: &Html) -> Document {
	let mut doc = Document::new();
	let root = doc.root();
	// The fragment's nodes sit under the synthetic <html> context element.
	let mut pending: Vec<_> = html.root_element().children().rev().map(|node| (node, root)).collect();
	while let Some((node, parent)) = pending.pop() {
		let kind = match node.value() {
			Node::Element(element) => NodeKind::Element(ElementData {
				tag: element.name().to_ascii_lowercase(),
				attributes: element
					.attrs()
					.map(|(name, value)| (name.to_ascii_lowercase(), value.to_string()))
					.collect(),
			}),
			Node::Text(text) => NodeKind::Text(String::from(&**text)),
			Node::Comment(comment) => NodeKind::Comment(String::from(&**comment)),
			_ => continue,
		};
		let id = doc.push_parsed(parent, kind);
		pending.extend(node.children().rev().map(|child| (child, id)));
	}
	doc
}

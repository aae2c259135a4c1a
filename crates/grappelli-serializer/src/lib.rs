//! Attribute and style serialization for grappelli.
//!
//! Every textual attribute value that crosses the server/client boundary goes
//! through this crate. The template compiler uses it to decide what to emit,
//! and the hydration walker uses it to decide whether a mismatch exists, so the
//! two sides can never disagree about what "equal" means.
//!
//! ## Modules
//!
//! - [`canonical`]: `canonicalize(kind, raw)` and the equality helpers built on it
//! - [`escape`]: HTML escaping for server output and entity decoding for parsed markup
//! - [`text`]: text massaging applied identically on both render paths
//! - [`html`]: element and attribute facts (void elements, boolean attributes)
//!
//! ## Example
//!
//! ```
//! use grappelli_serializer::{AttributeKind, canonicalize};
//!
//! assert_eq!(
//!     canonicalize(AttributeKind::Style, "color:red ;  ; margin: 1px"),
//!     "color: red; margin: 1px;"
//! );
//! ```

pub mod canonical;
pub mod escape;
pub mod html;
pub mod text;

pub use canonical::{
	AttributeKind, StyleDeclaration, canonical_attribute, canonical_eq, canonicalize,
	normalize_style, parse_style,
};
pub use escape::html_escape;
pub use html::{drops_leading_newline, is_boolean_attribute, is_raw_text_element, is_void_element};
pub use text::{
	TEXT_PLACEHOLDER, attribute_from_value, canonical_text, is_truthy, massage_text_content,
};

//! Live DOM model for grappelli hydration.
//!
//! The hydration walker never builds its own view of server output; it works
//! on a [`Document`] parsed from that output and mutates it only through the
//! methods here.
//!
//! ## Modules
//!
//! - [`document`] - arena document with stable [`NodeId`] handles
//! - [`parser`] - HTML5 fragment parsing of server-rendered output
//! - [`markup`] - subtree serialization
//! - [`snapshot`] - captures used to verify identity and values after hydration

pub mod document;
pub mod error;
pub mod markup;
pub mod parser;
pub mod snapshot;

pub use document::{Descendants, Document, ElementData, NodeId, NodeKind};
pub use error::{DomError, ParseError, Result};
pub use markup::{inner_markup, to_markup};
pub use parser::{parse_fragment, parse_fragment_strict};
pub use snapshot::Snapshot;

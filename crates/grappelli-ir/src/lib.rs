//! Template intermediate representation for grappelli.
//!
//! The IR is the input to the template compiler. It is a closed set of node
//! variants, so every pass over it is an exhaustive `match`.
//!
//! ## Modules
//!
//! - [`node`] - node types and the builder API
//! - [`expression`] - identifiers, member access and literals
//! - [`location`] - source positions reported by compile errors
//! - [`validate`] - structural checks run before lowering
//! - [`visit`] - `IrVisitor` trait and walking helpers
//!
//! ## Pipeline
//!
//! ```text
//! Template IR -> validate -> lower (server | client) -> instructions
//! ```

pub mod error;
pub mod expression;
pub mod location;
pub mod node;
pub mod validate;
pub mod visit;

pub use error::{IrError, IrErrorKind, Result};
pub use expression::{Expression, Literal, is_identifier};
pub use location::Location;
pub use node::{
	Attribute, AttributeValue, Branch, Directive, Element, ExpressionNode, ForEach, IfBlock,
	IfChain, Node, Slot, Template, Text, TextValue,
};
pub use validate::{is_valid_attribute_name, is_valid_tag_name, validate, validate_nodes};
pub use visit::IrVisitor;

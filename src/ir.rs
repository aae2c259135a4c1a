//! Template intermediate representation
//!
//! This module provides access to grappelli-ir: the node types templates are
//! built from, their builder API and structural validation.
//!
//! ## Example
//!
//! ```rust
//! use grappelli::ir::{Element, Expression, Node, Template, validate};
//!
//! let template = Template::new("greeting")
//!     .node(Element::new("p").child(Node::expr(Expression::path("user.name"))));
//! assert!(validate(&template).is_ok());
//! ```

// Re-export all grappelli-ir functionality
pub use grappelli_ir::*;

//! Template expressions.
//!
//! Expressions are deliberately small: identifiers, member access and
//! literals. Anything richer belongs to the component, which exposes the
//! result as a property.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// A literal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Literal {
	/// A string literal.
	String(String),
	/// A numeric literal.
	Number(Number),
	/// A boolean literal.
	Bool(bool),
	/// `null`.
	Null,
}

impl Literal {
	/// Converts the literal into a JSON value.
	pub fn to_value(&self) -> Value {
		match self {
			Self::String(s) => Value::String(s.clone()),
			Self::Number(n) => Value::Number(n.clone()),
			Self::Bool(b) => Value::Bool(*b),
			Self::Null => Value::Null,
		}
	}
}

impl From<&str> for Literal {
	fn from(value: &str) -> Self {
		Self::String(value.to_string())
	}
}

impl From<String> for Literal {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<bool> for Literal {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i64> for Literal {
	fn from(value: i64) -> Self {
		Self::Number(value.into())
	}
}

impl fmt::Display for Literal {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.to_value())
	}
}

/// An expression evaluated against the render scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expression {
	/// A bare identifier (`name`).
	Identifier {
		/// Identifier name.
		name: String,
	},
	/// Member access (`object.property`).
	Member {
		/// Expression the member is read from.
		object: Box<Expression>,
		/// Member name.
		property: String,
	},
	/// A literal value.
	Literal {
		/// The literal.
		value: Literal,
	},
}

impl Expression {
	/// Creates an identifier expression.
	pub fn ident(name: impl Into<String>) -> Self {
		Self::Identifier { name: name.into() }
	}

	/// Creates a literal expression.
	pub fn literal(value: impl Into<Literal>) -> Self {
		Self::Literal {
			value: value.into(),
		}
	}

	/// Wraps `self` in a member access.
	pub fn member(self, property: impl Into<String>) -> Self {
		Self::Member {
			object: Box::new(self),
			property: property.into(),
		}
	}

	/// Builds an identifier/member chain from a dotted path.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_ir::Expression;
	///
	/// let expr = Expression::path("user.address.city");
	/// assert_eq!(expr.to_string(), "user.address.city");
	/// assert_eq!(expr.root_identifier(), Some("user"));
	/// ```
	pub fn path(path: &str) -> Self {
		let mut segments = path.split('.');
		let head = Self::ident(segments.next().unwrap_or_default());
		segments.fold(head, Self::member)
	}

	/// Returns the identifier at the root of a member chain, if any.
	pub fn root_identifier(&self) -> Option<&str> {
		match self {
			Self::Identifier { name } => Some(name),
			Self::Member { object, .. } => object.root_identifier(),
			Self::Literal { .. } => None,
		}
	}

	/// Returns the literal if this expression is one.
	pub fn as_literal(&self) -> Option<&Literal> {
		match self {
			Self::Literal { value } => Some(value),
			_ => None,
		}
	}
}

impl fmt::Display for Expression {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Identifier { name } => f.write_str(name),
			Self::Member { object, property } => write!(f, "{object}.{property}"),
			Self::Literal { value } => write!(f, "{value}"),
		}
	}
}

/// Returns whether `name` is a valid binding identifier.
///
/// Identifiers start with an ASCII letter, `_` or `$`, followed by ASCII
/// alphanumerics, `_` or `$`.
pub fn is_identifier(name: &str) -> bool {
	let mut chars = name.chars();
	match chars.next() {
		Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
		_ => return false,
	}
	chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

//! Hydration input errors.
//!
//! Mismatches are never errors; they are data in the
//! [`HydrationReport`](crate::HydrationReport). These variants cover inputs a
//! pass cannot start from.

use grappelli_compiler::{RenderError, Target};
use grappelli_dom::{DomError, NodeId};
use thiserror::Error;

/// A hydration pass that cannot run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum HydrationError {
	/// The program was not compiled for the client.
	#[error("hydration needs a client program, found a {0} program")]
	WrongTarget(Target),
	/// The root is not connected to its document.
	#[error("hydration root {0} is not attached to the document")]
	DetachedRoot(NodeId),
	/// The root cannot have children.
	#[error("hydration root {0} is not an element or document")]
	InvalidRoot(NodeId),
	/// The client program could not be executed.
	#[error("failed to render expected tree: {0}")]
	Render(#[from] RenderError),
	/// A repair could not be applied to the live tree.
	#[error("failed to repair live tree: {0}")]
	Dom(#[from] DomError),
}

/// Result type for hydration.
pub type Result<T> = std::result::Result<T, HydrationError>;

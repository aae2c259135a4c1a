//! Hydration for grappelli.
//!
//! Hydration takes a document parsed from server markup and the client
//! program of the same template, verifies the two agree, and repairs the
//! document where they do not. Disagreement is never fatal: each mismatch is
//! classified, repaired (or not) per the [`RepairPolicy`], and reported as a
//! leveled [`Diagnostic`].
//!
//! ## Repair policy
//!
//! | Mismatch | Default action | Node identity |
//! |----------|----------------|---------------|
//! | attribute value | [`RepairAction::PatchValue`] | kept |
//! | `style` value | [`RepairAction::ReplaceNode`] | replaced |
//! | text value | [`RepairAction::PatchValue`] | kept |
//! | missing / extra node | [`RepairAction::ReplaceNode`] | replaced |
//!
//! Every default can be changed through [`HydrationOptions`].
//!
//! ## Modules
//!
//! - [`walker`] - the hydration pass and its report
//! - [`mismatch`] - mismatch records
//! - [`policy`] - classification into repair actions
//! - [`diagnostics`] - leveled messages
//! - [`options`] - TOML loadable options
//! - [`logging`] - logging macros on the `grappelli::hydration` target

pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod mismatch;
pub mod options;
pub mod policy;
pub mod walker;

pub use diagnostics::{COMPLETED_WITH_ERRORS, Diagnostic, Diagnostics, Level};
pub use error::{HydrationError, Result};
pub use mismatch::{Mismatch, MismatchKind, NodeLocator};
pub use options::HydrationOptions;
pub use policy::{RepairAction, RepairPolicy};
pub use walker::{HydrationPass, HydrationReport, HydrationState, RecordedMismatch, hydrate};

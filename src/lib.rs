//! # Grappelli
//!
//! A template compiler with server and client render targets, and a hydration
//! engine that reconciles server-rendered markup with what the client would
//! have rendered.
//!
//! One template is compiled twice. The server program streams markup; the
//! client program describes the node tree the client expects. Both route every
//! value through the same serializer, so when server and client disagree the
//! disagreement is real, and hydration reports and repairs it instead of
//! failing.
//!
//! ## Crates
//!
//! | Module | Crate | Role |
//! |--------|-------|------|
//! | [`ir`] | `grappelli-ir` | template IR, builders, validation |
//! | [`serializer`] | `grappelli-serializer` | attribute, style and text canonicalization |
//! | [`dom`] | `grappelli-dom` | live document, markup parser, snapshots |
//! | [`compiler`] | `grappelli-compiler` | lowering, server and client renderers |
//! | [`hydration`] | `grappelli-hydration` | walker, repair policy, diagnostics |
//!
//! ## Pipeline
//!
//! ```text
//! Template IR -> compile (server, client)
//!   server program -> markup -> parse -> live document --+
//!   client program -> expected tree ---------------------+-> hydrate -> report
//! ```
//!
//! See [`Pipeline`] for the whole flow in one type.

pub mod compiler;
pub mod dom;
pub mod hydration;
pub mod ir;
pub mod pipeline;
pub mod serializer;

pub use grappelli_compiler::{CompileOptions, RenderScope, Target};
pub use grappelli_hydration::{Diagnostic, HydrationOptions, HydrationReport, Level, RepairAction};
pub use pipeline::{Error, Pipeline, PipelineConfig, Result};

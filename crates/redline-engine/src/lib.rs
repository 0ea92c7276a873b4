//! # redline-engine
//!
//! Decoration and reconciliation engine for pending, unapplied edits in the
//! redline book editor. Suggestion batches arrive as persisted step JSON
//! authored against a historical document version; this crate re-expresses
//! them against the live document and turns them into non-destructive visual
//! overlays the editing surface renders, without ever mutating the document.
//!
//! The pipeline:
//!
//! 1. [`codec::parse_steps`] reconstructs live [`Step`]s from persisted JSON,
//!    re-attaching the auxiliary text metadata the wire format carries
//!    alongside the document model's own serialization.
//! 2. [`remap::remap_steps`] (or a [`Mapping`] passed to the builder)
//!    re-expresses steps against the current document version.
//! 3. [`decorate::build_decorations`] produces the overlay set, verifying
//!    each deletion against the live text and falling back to
//!    [`locate::locate_text`] when stored positions have drifted.
//! 4. [`apply::apply_steps`] materializes an accepted suggestion into a new
//!    [`Snapshot`]; previews never go through it destructively.
//!
//! Everything is synchronous and pure with respect to the document: snapshots
//! go in, new values come out. Failures at the single-step granularity degrade
//! to a skipped decoration or a structured outcome, never a panic.

pub mod apply;
pub mod codec;
pub mod decorate;
pub mod doc;
pub mod error;
pub mod locate;
pub mod mapping;
pub mod preview;
pub mod remap;
pub mod step;

// Re-export key types for easier usage
pub use apply::{ApplyOutcome, apply_steps};
pub use codec::parse_steps;
pub use decorate::{
    ChangeKind, Decoration, DecorationData, DecorationSet, ViewMode, WidgetElement,
    build_decorations, build_decorations_flat,
};
pub use doc::Snapshot;
pub use error::StepFailure;
pub use locate::{TextRange, locate_text};
pub use mapping::{MapEntry, Mapping};
pub use preview::{Preview, PreviewOptions, extract_preview, preview_batches};
pub use remap::{RemapOutcome, remap_steps};
pub use step::{Batch, Slice, Step};

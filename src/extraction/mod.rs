//! Field extraction module
//!
//! This module resolves the semantic fields of a conversation page (title,
//! summary, transcript, creation date) through per-field chains of
//! independent strategies, falling back to a fixed placeholder when the page
//! offers nothing usable.

pub mod diagnostics;
pub mod document;
pub mod pipeline;
pub mod strategy;
pub mod table;
pub mod target;

pub use diagnostics::{AttributeHit, DiagnosticSnapshot, ElementSample, SnapshotOptions};
pub use document::{Document, StaticDocument};
pub use pipeline::{accept, ExtractionPipeline, FieldValues};
pub use strategy::Strategy;
pub use table::StrategyTable;
pub use target::{ExtractionTarget, UNABLE_TO_SCRAPE, UNKNOWN_DATE, UNKNOWN_TITLE};

//! # CodeLink Codebook
//!
//! Input data model for the scenario-linking engine: the codebook of
//! hierarchical interview codes, their per-participant reference records,
//! and the scenario-to-candidate-codes table.
//!
//! These types mirror the JSON artifacts produced upstream (coding
//! pipeline output). They are read-only for the duration of a request;
//! nothing in this crate mutates them after construction.

mod model;

pub use model::{CodeEntry, CodeKind, Codebook, ReferenceRecord, ScenarioTable};

/// Separator between segments of a hierarchical code name,
/// e.g. `Drivers\Climate\Sea level rise`.
pub const PATH_DELIMITER: char = '\\';

/// Name of the synthetic root node attached above all top-level codes.
/// Never present in the codebook itself.
pub const ROOT_NAME: &str = "root";

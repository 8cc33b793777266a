//! Sift Domain Layer
//!
//! This crate contains the core vocabulary shared by every other Sift crate.
//! It defines the value objects that flow through a batch run and the trait
//! interfaces the dispatcher uses to reach infrastructure.
//!
//! ## Key Concepts
//!
//! - **Work Unit**: One source document collection (a JSON file of message
//!   fragments) belonging to an entity directory
//! - **Payload**: The text derived from a unit, flagged when it was truncated
//! - **Outcome**: What the enrichment service said about one payload
//! - **Significant Interest**: A scored label at or above the alert threshold
//! - **Run**: One pass over the corpus under a fixed starting quota
//!
//! ## Architecture
//!
//! - Pure data and logic only, no I/O
//! - Infrastructure implementations live in other crates
//! - Trait definitions for every external interaction

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod outcome;
pub mod payload;
pub mod run;
pub mod traits;
pub mod unit;

// Re-exports for convenience
pub use outcome::{
    significant_interests, Enrichment, Outcome, ScoreMap, SignificantInterest,
    SIGNIFICANCE_THRESHOLD,
};
pub use payload::Payload;
pub use run::RunId;
pub use unit::{UnitId, WorkUnit};

//! # cs-viz
//!
//! Presentation artifacts for CutStat.
//!
//! This crate is intentionally dependency-light and focuses on emitting
//! plot-friendly JSON structures (arrays instead of nested objects) for an
//! external table or step/error-bar presenter.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Purity table and step-plot artifacts.
pub mod purity;

pub use purity::{
    PurityArtifact, PurityDisplay, PurityGroupSeries, PurityMeta, PurityRow, PuritySeries,
    purity_artifact,
};

//! Selection-statistics domain layer for CutStat.
//!
//! - [`sample`]: columnar event samples (category codes, weights, cut flags)
//! - [`purity`]: sequential/cumulative purity over an ordered cut sequence
//! - [`response`]: smearing-matrix to response-matrix conversion
//! - [`systematics`]: systematic-key canonicalization and uncertainty averaging

pub mod purity;
pub mod response;
pub mod sample;
pub mod systematics;

pub use purity::{CategoryMap, CutSequence, GroupPurity, PurityEngine, PurityPoint};
pub use sample::Sample;

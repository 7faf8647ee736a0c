//! Probability building blocks for CutStat.
//!
//! Hosts the binomial proportion machinery used by the purity engine:
//! exact (Clopper–Pearson) two-sided intervals from Beta quantiles.

pub mod binomial;

pub use binomial::clopper_pearson;

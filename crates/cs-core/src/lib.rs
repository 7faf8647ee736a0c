//! Core types for CutStat.
//!
//! Shared error type, `Result` alias, and the interval estimate carried by
//! every purity figure.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::Interval;

/// Crate version, propagated into artifact metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

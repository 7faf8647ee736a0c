//! Columnar event sample.
//!
//! Events are stored as flat columns: one category code and one weight per
//! event, plus named boolean cut columns. Column lengths are validated at
//! construction so downstream consumers can index freely.

use std::collections::HashMap;

use cs_core::{Error, Result};

/// A columnar event table.
#[derive(Debug, Clone, Default)]
pub struct Sample {
    categories: Vec<i64>,
    weights: Vec<f64>,
    cut_flags: HashMap<String, Vec<bool>>,
}

impl Sample {
    /// Unweighted sample: every event counts once.
    pub fn new(categories: Vec<i64>) -> Self {
        let weights = vec![1.0; categories.len()];
        Self { categories, weights, cut_flags: HashMap::new() }
    }

    /// Weighted sample. Weights must be finite and non-negative and match
    /// the category column in length.
    pub fn weighted(categories: Vec<i64>, weights: Vec<f64>) -> Result<Self> {
        if weights.len() != categories.len() {
            return Err(Error::Validation(format!(
                "weights length {} != categories length {}",
                weights.len(),
                categories.len()
            )));
        }
        if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(Error::Validation(format!(
                "event weights must be finite and >= 0, got {}",
                w
            )));
        }
        Ok(Self { categories, weights, cut_flags: HashMap::new() })
    }

    /// Attach a named boolean cut column.
    pub fn with_cut(mut self, key: &str, flags: Vec<bool>) -> Result<Self> {
        if flags.len() != self.categories.len() {
            return Err(Error::Validation(format!(
                "cut column '{}' length {} != event count {}",
                key,
                flags.len(),
                self.categories.len()
            )));
        }
        self.cut_flags.insert(key.to_string(), flags);
        Ok(self)
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// True when the sample holds no events.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Category codes, one per event.
    pub fn categories(&self) -> &[i64] {
        &self.categories
    }

    /// Event weights, one per event.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Cut column by key, if present.
    pub fn cut_column(&self, key: &str) -> Option<&[bool]> {
        self.cut_flags.get(key).map(Vec::as_slice)
    }
}

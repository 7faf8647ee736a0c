//! Sequential selection purity with exact binomial intervals.
//!
//! The engine folds an ordered cut sequence over a sample: the accumulator
//! is the running survival mask, ANDed with each cut's pass column in turn,
//! so events failing an earlier cut never re-enter. At every layer it
//! records, per category group, the cumulative purity (in-group survivors
//! over all survivors) and the differential purity (in-group survivors over
//! the previous layer's survivors), each with a Clopper–Pearson interval.

use std::collections::HashMap;

use cs_core::{Error, Interval, Result};
use cs_prob::binomial::clopper_pearson;
use rayon::prelude::*;

use crate::sample::Sample;

/// Ordered mapping from category code to group label.
///
/// Multiple codes may share a group; group order is the first-seen order of
/// the labels and is user-visible (legend and table row order).
#[derive(Debug, Clone)]
pub struct CategoryMap {
    entries: Vec<(i64, String)>,
}

impl CategoryMap {
    /// Build from ordered `(code, group label)` pairs.
    pub fn new(entries: Vec<(i64, String)>) -> Self {
        Self { entries }
    }

    /// Group label for a category code.
    pub fn group_of(&self, code: i64) -> Option<&str> {
        self.entries.iter().find(|(c, _)| *c == code).map(|(_, g)| g.as_str())
    }

    /// Group labels deduplicated preserving first-seen order.
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for (_, g) in &self.entries {
            if !groups.contains(&g.as_str()) {
                groups.push(g.as_str());
            }
        }
        groups
    }
}

/// Ordered mapping from cut key to display label.
///
/// The entry order defines the cumulative-cut sequence and is significant.
#[derive(Debug, Clone)]
pub struct CutSequence {
    entries: Vec<(String, String)>,
}

impl CutSequence {
    /// Build from ordered `(cut key, display label)` pairs.
    pub fn new(entries: Vec<(String, String)>) -> Self {
        Self { entries }
    }

    /// `(key, label)` pairs in application order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(k, l)| (k.as_str(), l.as_str()))
    }

    /// Display labels in application order.
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|(_, l)| l.as_str()).collect()
    }

    /// Number of cuts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no cuts are configured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Purity at one cut layer.
#[derive(Debug, Clone)]
pub struct PurityPoint {
    /// Display label of the cut closing this layer.
    pub cut_label: String,
    /// Weighted number of events surviving all cuts up to this layer.
    pub n_surviving: f64,
    /// Purity of this layer's survivors relative to the previous layer.
    pub differential: Interval,
    /// Purity of this layer's survivors relative to themselves.
    pub cumulative: Interval,
}

/// Purity series for one category group, in cut order.
#[derive(Debug, Clone)]
pub struct GroupPurity {
    /// Group label.
    pub group: String,
    /// One point per cut, in cut-sequence order.
    pub points: Vec<PurityPoint>,
}

/// Sequential/cumulative purity over an ordered cut sequence.
#[derive(Debug, Clone)]
pub struct PurityEngine {
    categories: CategoryMap,
    cuts: CutSequence,
    confidence: f64,
}

impl PurityEngine {
    /// Create an engine. The confidence level must lie in `(0, 1)`.
    pub fn new(categories: CategoryMap, cuts: CutSequence, confidence: f64) -> Result<Self> {
        if !confidence.is_finite() || confidence <= 0.0 || confidence >= 1.0 {
            return Err(Error::Validation(format!(
                "confidence level must be in (0,1), got {}",
                confidence
            )));
        }
        Ok(Self { categories, cuts, confidence })
    }

    /// Group labels in first-seen category-map order.
    pub fn groups(&self) -> Vec<&str> {
        self.categories.groups()
    }

    /// Compute per-group purity series for a sample.
    ///
    /// Fails fast on category codes missing from the category map and on
    /// cut keys without a matching sample column. A layer with zero
    /// survivors produces the `NaN`/`[0,1]` degenerate estimate, not an
    /// error: empty layers are an expected terminal state of tight
    /// selections.
    pub fn compute(&self, sample: &Sample) -> Result<Vec<GroupPurity>> {
        let groups = self.categories.groups();
        let group_index: HashMap<&str, usize> =
            groups.iter().enumerate().map(|(i, g)| (*g, i)).collect();

        // Resolve every event's group up front; unknown codes fail fast.
        let mut event_groups = Vec::with_capacity(sample.len());
        for &code in sample.categories() {
            let group = self.categories.group_of(code).ok_or_else(|| {
                Error::Validation(format!(
                    "category code {} not present in the category map",
                    code
                ))
            })?;
            event_groups.push(group_index[group]);
        }

        // Fold over cuts: the running survival mask plus, per layer, the
        // weighted survival total and per-group totals. The totals are
        // computed once here and shared by every group below.
        let weights = sample.weights();
        let full_total: f64 = weights.iter().sum();
        let mut mask = vec![true; sample.len()];
        let mut layer_totals: Vec<f64> = Vec::with_capacity(self.cuts.len());
        let mut layer_group_totals: Vec<Vec<f64>> = Vec::with_capacity(self.cuts.len());

        for (key, _) in self.cuts.entries() {
            let flags = sample.cut_column(key).ok_or_else(|| {
                Error::Validation(format!(
                    "cut key '{}' has no matching column in the sample",
                    key
                ))
            })?;

            let mut total = 0.0_f64;
            let mut group_totals = vec![0.0_f64; groups.len()];
            for i in 0..mask.len() {
                mask[i] &= flags[i];
                if mask[i] {
                    total += weights[i];
                    group_totals[event_groups[i]] += weights[i];
                }
            }
            layer_totals.push(total);
            layer_group_totals.push(group_totals);
        }

        // Independent per-group reduction; the ordered collect keeps the
        // output deterministic regardless of scheduling.
        let confidence = self.confidence;
        let labels = self.cuts.labels();
        groups
            .par_iter()
            .enumerate()
            .map(|(gi, group)| {
                let mut points = Vec::with_capacity(labels.len());
                for k in 0..labels.len() {
                    let numerator = layer_group_totals[k][gi];
                    let denominator = layer_totals[k];
                    let previous = if k == 0 { full_total } else { layer_totals[k - 1] };
                    points.push(PurityPoint {
                        cut_label: labels[k].to_string(),
                        n_surviving: denominator,
                        differential: clopper_pearson(numerator, previous, confidence)?,
                        cumulative: clopper_pearson(numerator, denominator, confidence)?,
                    });
                }
                Ok(GroupPurity { group: group.to_string(), points })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const SIGMA_1: f64 = 0.6827;

    fn two_group_map() -> CategoryMap {
        CategoryMap::new(vec![
            (0, "Signal".to_string()),
            (1, "Background".to_string()),
            (2, "Background".to_string()),
        ])
    }

    #[test]
    fn test_group_order_preserves_first_seen() {
        let map = CategoryMap::new(vec![
            (3, "Cosmic".to_string()),
            (0, "Signal".to_string()),
            (1, "Cosmic".to_string()),
            (2, "Other".to_string()),
        ]);
        assert_eq!(map.groups(), vec!["Cosmic", "Signal", "Other"]);
        // Stable across repeated calls on the same mapping.
        assert_eq!(map.groups(), map.groups());
    }

    #[test]
    fn test_confidence_level_validation() {
        let map = two_group_map();
        let cuts = CutSequence::new(vec![]);
        assert!(PurityEngine::new(map.clone(), cuts.clone(), 0.0).is_err());
        assert!(PurityEngine::new(map.clone(), cuts.clone(), 1.0).is_err());
        assert!(PurityEngine::new(map, cuts, 0.6827).is_ok());
    }

    #[test]
    fn test_unknown_category_code_fails_fast() {
        let engine = PurityEngine::new(
            two_group_map(),
            CutSequence::new(vec![("c0".to_string(), "Cut 0".to_string())]),
            SIGMA_1,
        )
        .unwrap();
        let sample = Sample::new(vec![0, 7]).with_cut("c0", vec![true, true]).unwrap();
        let err = engine.compute(&sample).unwrap_err().to_string();
        assert!(err.contains('7'), "message was: {}", err);
    }

    #[test]
    fn test_unknown_cut_key_fails_fast() {
        let engine = PurityEngine::new(
            two_group_map(),
            CutSequence::new(vec![("missing".to_string(), "Missing".to_string())]),
            SIGMA_1,
        )
        .unwrap();
        let sample = Sample::new(vec![0, 1]);
        let err = engine.compute(&sample).unwrap_err().to_string();
        assert!(err.contains("missing"), "message was: {}", err);
    }

    #[test]
    fn test_cumulative_purity_matches_raw_counts() {
        // 6 signal and 4 background events; the cut keeps 4 signal and 1
        // background.
        let categories = vec![0, 0, 0, 0, 0, 0, 1, 1, 2, 2];
        let keep = vec![
            true, true, true, true, false, false, true, false, false, false,
        ];
        let sample = Sample::new(categories).with_cut("sel", vec![true; 10]).unwrap();
        let sample = sample.with_cut("keep", keep).unwrap();
        let engine = PurityEngine::new(
            two_group_map(),
            CutSequence::new(vec![
                ("sel".to_string(), "Preselection".to_string()),
                ("keep".to_string(), "Selection".to_string()),
            ]),
            SIGMA_1,
        )
        .unwrap();

        let results = engine.compute(&sample).unwrap();
        assert_eq!(results.len(), 2);
        let signal = &results[0];
        assert_eq!(signal.group, "Signal");
        assert_abs_diff_eq!(signal.points[0].cumulative.value, 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(signal.points[1].cumulative.value, 4.0 / 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(signal.points[1].n_surviving, 5.0, epsilon = 1e-12);
        // Differential at the second layer: survivors in-group over the
        // previous layer's total.
        assert_abs_diff_eq!(signal.points[1].differential.value, 4.0 / 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cut_removing_nothing_keeps_cumulative() {
        let sample = Sample::new(vec![0, 0, 1])
            .with_cut("first", vec![true, false, true])
            .unwrap()
            .with_cut("noop", vec![true, true, true])
            .unwrap();
        let engine = PurityEngine::new(
            two_group_map(),
            CutSequence::new(vec![
                ("first".to_string(), "First".to_string()),
                ("noop".to_string(), "No-op".to_string()),
            ]),
            SIGMA_1,
        )
        .unwrap();

        let results = engine.compute(&sample).unwrap();
        let signal = &results[0];
        let first = &signal.points[0];
        let noop = &signal.points[1];
        assert_abs_diff_eq!(noop.cumulative.value, first.cumulative.value, epsilon = 1e-12);
        // The no-op layer's differential equals the previous cumulative.
        assert_abs_diff_eq!(noop.differential.value, first.cumulative.value, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_layer_is_a_sentinel_not_an_error() {
        let sample = Sample::new(vec![0, 1])
            .with_cut("none", vec![false, false])
            .unwrap();
        let engine = PurityEngine::new(
            two_group_map(),
            CutSequence::new(vec![("none".to_string(), "Kills all".to_string())]),
            SIGMA_1,
        )
        .unwrap();

        let results = engine.compute(&sample).unwrap();
        for group in &results {
            let point = &group.points[0];
            assert!(point.cumulative.is_degenerate());
            assert_eq!(point.cumulative.lower, 0.0);
            assert_eq!(point.cumulative.upper, 1.0);
            assert_abs_diff_eq!(point.n_surviving, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_interval_bounds_bracket_values() {
        let sample = Sample::new(vec![0, 0, 0, 1, 1, 2])
            .with_cut("a", vec![true, true, false, true, true, true])
            .unwrap()
            .with_cut("b", vec![true, false, true, true, false, true])
            .unwrap();
        let engine = PurityEngine::new(
            two_group_map(),
            CutSequence::new(vec![
                ("a".to_string(), "A".to_string()),
                ("b".to_string(), "B".to_string()),
            ]),
            SIGMA_1,
        )
        .unwrap();

        for group in engine.compute(&sample).unwrap() {
            for point in &group.points {
                for iv in [&point.cumulative, &point.differential] {
                    assert!(iv.lower <= iv.value && iv.value <= iv.upper);
                    assert!((0.0..=1.0).contains(&iv.lower));
                    assert!((0.0..=1.0).contains(&iv.upper));
                }
            }
        }
    }

    #[test]
    fn test_weighted_sample_totals() {
        let sample = Sample::weighted(vec![0, 1], vec![2.5, 0.5])
            .unwrap()
            .with_cut("all", vec![true, true])
            .unwrap();
        let engine = PurityEngine::new(
            two_group_map(),
            CutSequence::new(vec![("all".to_string(), "All".to_string())]),
            SIGMA_1,
        )
        .unwrap();

        let results = engine.compute(&sample).unwrap();
        let signal = &results[0];
        assert_abs_diff_eq!(signal.points[0].n_surviving, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(signal.points[0].cumulative.value, 2.5 / 3.0, epsilon = 1e-12);
    }
}

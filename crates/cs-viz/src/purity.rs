//! Purity table and step-plot artifact (numbers-first).
//!
//! The artifact carries, per category group, the surviving-event series and
//! the differential/cumulative purity series with confidence bounds. Values
//! are always stored as fractions; display scaling (percent) and section
//! visibility are presenter directives carried alongside the numbers.

use std::time::{SystemTime, UNIX_EPOCH};

use cs_core::{Interval, Result};
use cs_selection::purity::{GroupPurity, PurityPoint};
use serde::{Deserialize, Serialize};

/// Display directives for the external presenter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PurityDisplay {
    /// Render values scaled to percent (stored values stay fractional).
    pub percentage: bool,
    /// Include the cumulative purity series.
    pub show_cumulative: bool,
    /// Include the differential purity series.
    pub show_differential: bool,
}

impl Default for PurityDisplay {
    fn default() -> Self {
        Self { percentage: true, show_cumulative: true, show_differential: true }
    }
}

/// Plot-friendly artifact for selection purity tables and step plots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurityArtifact {
    /// Artifact schema identifier.
    pub schema_version: String,
    /// Tool provenance.
    pub meta: PurityMeta,
    /// Coverage of the confidence intervals, e.g. 0.6827.
    pub confidence_level: f64,
    /// Presenter directives.
    pub display: PurityDisplay,
    /// Cut display labels in application order.
    pub cut_labels: Vec<String>,
    /// One series per category group, in first-seen group order.
    pub groups: Vec<PurityGroupSeries>,
}

/// Tool provenance block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurityMeta {
    /// Producing tool name.
    pub tool: String,
    /// Producing tool version.
    pub tool_version: String,
    /// Creation timestamp, Unix milliseconds.
    pub created_unix_ms: u128,
}

/// Purity series for one category group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurityGroupSeries {
    /// Group label (legend entry / table row marker).
    pub group: String,
    /// Weighted surviving events after each cut (step-plot abscissa).
    pub n_surviving: Vec<f64>,
    /// Differential purity series, absent when toggled off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub differential: Option<PuritySeries>,
    /// Cumulative purity series, absent when toggled off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cumulative: Option<PuritySeries>,
}

/// Aligned value/bound arrays for one purity definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuritySeries {
    /// Central values, one per cut.
    pub values: Vec<f64>,
    /// Lower confidence bounds, aligned with `values`.
    pub lower: Vec<f64>,
    /// Upper confidence bounds, aligned with `values`.
    pub upper: Vec<f64>,
}

/// One flat table row, produced in group-then-cut order.
#[derive(Debug, Clone, Serialize)]
pub struct PurityRow {
    /// Group label.
    pub group: String,
    /// Cut display label.
    pub cut_label: String,
    /// Weighted surviving events after this cut.
    pub n_surviving: f64,
    /// Differential purity `[value, lower, upper]`, if enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub differential: Option<[f64; 3]>,
    /// Cumulative purity `[value, lower, upper]`, if enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cumulative: Option<[f64; 3]>,
}

fn now_unix_ms() -> Result<u128> {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| cs_core::Error::Computation(format!("system time error: {}", e)))?;
    Ok(d.as_millis())
}

fn series(points: &[PurityPoint], pick: fn(&PurityPoint) -> &Interval) -> PuritySeries {
    PuritySeries {
        values: points.iter().map(|p| pick(p).value).collect(),
        lower: points.iter().map(|p| pick(p).lower).collect(),
        upper: points.iter().map(|p| pick(p).upper).collect(),
    }
}

/// Assemble the purity artifact from engine output.
///
/// Series order follows the engine's group order; every group must carry
/// the same cut sequence (ordering mismatches are validation errors).
pub fn purity_artifact(
    results: &[GroupPurity],
    confidence_level: f64,
    display: PurityDisplay,
) -> Result<PurityArtifact> {
    let cut_labels: Vec<String> = results
        .first()
        .map(|g| g.points.iter().map(|p| p.cut_label.clone()).collect())
        .unwrap_or_default();

    let mut groups = Vec::with_capacity(results.len());
    for g in results {
        if g.points.len() != cut_labels.len() {
            return Err(cs_core::Error::Validation(format!(
                "group '{}' has {} cut layers, expected {}",
                g.group,
                g.points.len(),
                cut_labels.len()
            )));
        }
        for (point, label) in g.points.iter().zip(&cut_labels) {
            if point.cut_label != *label {
                return Err(cs_core::Error::Validation(format!(
                    "cut ordering mismatch in group '{}': '{}' vs '{}'",
                    g.group, point.cut_label, label
                )));
            }
        }

        groups.push(PurityGroupSeries {
            group: g.group.clone(),
            n_surviving: g.points.iter().map(|p| p.n_surviving).collect(),
            differential: display
                .show_differential
                .then(|| series(&g.points, |p| &p.differential)),
            cumulative: display.show_cumulative.then(|| series(&g.points, |p| &p.cumulative)),
        });
    }

    Ok(PurityArtifact {
        schema_version: "cutstat_purity_v0".to_string(),
        meta: PurityMeta {
            tool: "cutstat".to_string(),
            tool_version: cs_core::VERSION.to_string(),
            created_unix_ms: now_unix_ms()?,
        },
        confidence_level,
        display,
        cut_labels,
        groups,
    })
}

impl PurityArtifact {
    /// Flatten to table rows in group-then-cut order.
    pub fn table_rows(&self) -> Vec<PurityRow> {
        let mut rows = Vec::new();
        for g in &self.groups {
            for (k, cut_label) in self.cut_labels.iter().enumerate() {
                let triple = |s: &Option<PuritySeries>| {
                    s.as_ref().map(|s| [s.values[k], s.lower[k], s.upper[k]])
                };
                rows.push(PurityRow {
                    group: g.group.clone(),
                    cut_label: cut_label.clone(),
                    n_surviving: g.n_surviving[k],
                    differential: triple(&g.differential),
                    cumulative: triple(&g.cumulative),
                });
            }
        }
        rows
    }
}

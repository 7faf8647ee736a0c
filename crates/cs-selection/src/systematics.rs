//! Systematic-key canonicalization and fractional-uncertainty averaging.
//!
//! Systematic keys arrive as raw identifiers like
//! `GENIEReWeight_SBN_v1_multisigma_foo_momentum_gev_cv.csv` and must be
//! reduced to a canonical parameter name plus the analysis variable the
//! uncertainty applies to.

use cs_core::{Error, Result};

/// Literal tokens removed from systematic keys, applied in order.
///
/// Later removals operate on the already-shortened string. New tokens are
/// added here (or passed to [`resolve_parameter_name_with_tokens`]) without
/// touching the resolver itself.
pub const DEFAULT_STRIP_TOKENS: &[&str] = &[
    "reco_leading_muon_",
    "true_leading_muon_",
    "momentum_gev",
    "costheta",
    "multisigma_",
    "multisim_",
    "nsigma_",
    "GENIEReWeight_SBN_v1_",
];

/// A systematic key resolved into its canonical parameter name and the
/// analysis variable it applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedParameter {
    /// Canonical parameter name (`"stat"` for statistical uncertainties).
    pub name: String,
    /// The matched analysis variable, first match in caller order.
    pub variable: String,
    /// True when the key encodes a statistical uncertainty.
    pub is_stat: bool,
}

/// Resolve a systematic key with the default token table.
pub fn resolve_parameter_name(key: &str, variables: &[&str]) -> Result<ParsedParameter> {
    resolve_parameter_name_with_tokens(key, variables, DEFAULT_STRIP_TOKENS)
}

/// Resolve a systematic key with a caller-supplied ordered token table.
///
/// CSV-style keys `{name}_{marker}.csv` lose the trailing marker token
/// first. The variable is matched by substring containment against the
/// shortened key, in caller order, before any other branching; an
/// unmatched variable is an error. Keys containing the literal `stat`
/// short-circuit to the canonical name `"stat"` with no further stripping.
pub fn resolve_parameter_name_with_tokens(
    key: &str,
    variables: &[&str],
    tokens: &[&str],
) -> Result<ParsedParameter> {
    let mut short = key.to_string();
    if short.contains(".csv") {
        short = short.replace(".csv", "");
        let parts: Vec<&str> = short.split('_').collect();
        short = parts[..parts.len().saturating_sub(1)].join("_");
    }

    let variable = variables
        .iter()
        .copied()
        .find(|v| short.contains(*v))
        .ok_or_else(|| {
            Error::Validation(format!("no known variable matches systematic key '{}'", key))
        })?
        .to_string();

    if short.contains("stat") {
        return Ok(ParsedParameter { name: "stat".to_string(), variable, is_stat: true });
    }

    short = short.replace(";1", "");
    for token in tokens {
        short = short.replace(token, "");
    }

    let name = short.trim_end_matches('_').to_string();
    if name.is_empty() {
        return Err(Error::Validation(format!(
            "systematic key '{}' reduced to an empty parameter name",
            key
        )));
    }
    Ok(ParsedParameter { name, variable, is_stat: false })
}

/// Central-value-weighted mean of per-bin fractional uncertainties.
///
/// A length mismatch is a contract violation. When every central value is
/// zero the weighted mean is undefined and the documented sentinel `NaN`
/// is returned.
pub fn average_fractional_uncertainty(frac_uncs: &[f64], central_values: &[f64]) -> Result<f64> {
    if frac_uncs.len() != central_values.len() {
        return Err(Error::Validation(format!(
            "fractional uncertainties ({}) and central values ({}) must have the same length",
            frac_uncs.len(),
            central_values.len()
        )));
    }
    let weight_sum: f64 = central_values.iter().sum();
    if weight_sum == 0.0 {
        return Ok(f64::NAN);
    }
    let weighted: f64 = frac_uncs.iter().zip(central_values).map(|(u, w)| u * w).sum();
    Ok(weighted / weight_sum)
}

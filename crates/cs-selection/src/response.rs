//! Smearing-matrix to response-matrix conversion.

use cs_core::{Error, Result};

/// Convert a raw smearing (migration) matrix into an efficiency-weighted
/// response matrix.
///
/// `smearing[i][j]` counts events true in bin `j` reconstructed in bin `i`.
/// Each column `j` is scaled by `efficiency[j]` and divided by the column
/// sum of the *unscaled* matrix, so output columns sum to at most
/// `efficiency[j]`. Columns with a zero sum come out all-zero (no NaN/Inf).
pub fn build_response_matrix(smearing: &[Vec<f64>], efficiency: &[f64]) -> Result<Vec<Vec<f64>>> {
    let n = smearing.len();
    if n == 0 {
        return Err(Error::Validation("smearing matrix must be non-empty".to_string()));
    }
    for (i, row) in smearing.iter().enumerate() {
        if row.len() != n {
            return Err(Error::Validation(format!(
                "smearing matrix must be square: row {} length {} != {}",
                i,
                row.len(),
                n
            )));
        }
    }
    if efficiency.len() != n {
        return Err(Error::Validation(format!(
            "efficiency length {} != matrix dimension {}",
            efficiency.len(),
            n
        )));
    }

    // Column sums over the raw matrix, before efficiency scaling.
    let mut col_sums = vec![0.0_f64; n];
    for row in smearing {
        for (j, &v) in row.iter().enumerate() {
            col_sums[j] += v;
        }
    }

    let response = smearing
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(j, &v)| {
                    if col_sums[j] != 0.0 { v * efficiency[j] / col_sums[j] } else { 0.0 }
                })
                .collect()
        })
        .collect();
    Ok(response)
}

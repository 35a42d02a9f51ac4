//! Moore-Penrose pseudo-inverse via SVD.
//!
//! For `X = U Σ Vᵀ` the pseudo-inverse is `X⁺ = V Σ⁺ Uᵀ`, where `Σ⁺` inverts
//! every singular value above a cutoff and zeroes the rest.
//!
//! Implementation choices:
//! - The cutoff is relative to the largest singular value. By default it is
//!   `max(M, N) * eps * sigma_max`; `SolverConfig::rcond` replaces the
//!   `max(M, N) * eps` factor.
//! - We call `try_svd` with an iteration cap so a non-convergent
//!   decomposition surfaces as an error instead of looping or panicking.
//! - Singular values are not assumed to be sorted.

use nalgebra::{DMatrix, DVector};

use crate::domain::SolverConfig;
use crate::error::ComputationError;

/// Default absolute cutoff for a `rows x cols` matrix with largest singular value `sigma_max`.
pub fn default_cutoff(rows: usize, cols: usize, sigma_max: f64) -> f64 {
    rows.max(cols) as f64 * f64::EPSILON * sigma_max
}

/// Absolute cutoff under `config`.
pub fn singular_value_cutoff(rows: usize, cols: usize, sigma_max: f64, config: &SolverConfig) -> f64 {
    match config.rcond {
        Some(rcond) => rcond * sigma_max,
        None => default_cutoff(rows, cols, sigma_max),
    }
}

/// Compute the pseudo-inverse of `x` (shape `cols x rows`).
pub fn pseudo_inverse(x: &DMatrix<f64>, config: &SolverConfig) -> Result<DMatrix<f64>, ComputationError> {
    let (rows, cols) = x.shape();
    if rows == 0 || cols == 0 {
        return Ok(DMatrix::zeros(cols, rows));
    }

    let svd = x
        .clone()
        .try_svd(true, true, f64::EPSILON, config.max_svd_iterations)
        .ok_or_else(|| {
            ComputationError::Decomposition(format!(
                "SVD did not converge within {} iterations",
                config.max_svd_iterations
            ))
        })?;

    let u = svd
        .u
        .as_ref()
        .ok_or_else(|| ComputationError::Decomposition("SVD returned no left singular vectors".to_string()))?;
    let v_t = svd
        .v_t
        .as_ref()
        .ok_or_else(|| ComputationError::Decomposition("SVD returned no right singular vectors".to_string()))?;

    if svd.singular_values.iter().any(|s| !s.is_finite()) {
        return Err(ComputationError::Decomposition(
            "SVD produced non-finite singular values".to_string(),
        ));
    }

    let sigma_max = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
    let cutoff = singular_value_cutoff(rows, cols, sigma_max, config);
    let sigma_inv = DVector::from_iterator(
        svd.singular_values.len(),
        svd.singular_values
            .iter()
            .map(|&s| if s > cutoff { 1.0 / s } else { 0.0 }),
    );

    // V Σ⁺ : scale column j of V by 1/σ_j.
    let mut v_sigma = v_t.transpose();
    for (j, &inv) in sigma_inv.iter().enumerate() {
        let mut col = v_sigma.column_mut(j);
        col *= inv;
    }

    Ok(v_sigma * u.transpose())
}

/// Number of singular values kept under `config` (numerical rank).
pub fn numerical_rank(x: &DMatrix<f64>, config: &SolverConfig) -> Result<usize, ComputationError> {
    let (rows, cols) = x.shape();
    if rows == 0 || cols == 0 {
        return Ok(0);
    }
    let singular_values = x
        .clone()
        .try_svd(false, false, f64::EPSILON, config.max_svd_iterations)
        .ok_or_else(|| ComputationError::Decomposition("SVD did not converge".to_string()))?
        .singular_values;
    let sigma_max = singular_values.iter().copied().fold(0.0_f64, f64::max);
    let cutoff = singular_value_cutoff(rows, cols, sigma_max, config);
    Ok(singular_values.iter().filter(|&&s| s > cutoff).count())
}

//! Reporting utilities: solve diagnostics and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::{DesignMatrix, SolverConfig};
use crate::error::ComputationError;
use crate::math::numerical_rank;

/// Diagnostics for one solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveSummary {
    pub rows: usize,
    pub cols: usize,
    pub rank: usize,
    pub sse: f64,
    pub rmse: f64,
}

/// Residual diagnostics of `weights` against `x · w ≈ y`.
pub fn summarize(
    x: &DesignMatrix,
    y: &[f64],
    weights: &[f64],
    config: &SolverConfig,
) -> Result<SolveSummary, ComputationError> {
    let rank = numerical_rank(&x.to_dmatrix(), config)?;

    let sse: f64 = if weights.is_empty() {
        y.iter().take(x.rows()).map(|v| v * v).sum()
    } else {
        (0..x.rows())
            .map(|i| {
                let fitted: f64 = x.row(i).iter().zip(weights).map(|(a, w)| a * w).sum();
                let r = y[i] - fitted;
                r * r
            })
            .sum()
    };
    let rmse = if x.rows() > 0 { (sse / x.rows() as f64).sqrt() } else { 0.0 };

    Ok(SolveSummary {
        rows: x.rows(),
        cols: x.cols(),
        rank,
        sse,
        rmse,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_of_mean_fit() {
        let x = DesignMatrix::from_rows(vec![vec![1.0], vec![1.0], vec![1.0]]).unwrap();
        let s = summarize(&x, &[1.0, 2.0, 3.0], &[2.0], &SolverConfig::default()).unwrap();
        assert_eq!(s.rank, 1);
        assert!((s.sse - 2.0).abs() < 1e-12);
        assert!((s.rmse - (2.0_f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn summary_of_empty_matrix() {
        let s = summarize(&DesignMatrix::empty(), &[], &[], &SolverConfig::default()).unwrap();
        assert_eq!(s.rows, 0);
        assert_eq!(s.rank, 0);
        assert_eq!(s.rmse, 0.0);
    }
}

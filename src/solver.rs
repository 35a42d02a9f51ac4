//! The weight solver.
//!
//! `WeaknessSolver::compute` is the entire numeric contract of the service:
//! `weights = pinv(X) · Y`, with an empty matrix short-circuiting to empty weights.
//! It is pure (no I/O, no logging, no shared state), so one instance can be
//! shared freely across threads.

use nalgebra::DVector;

use crate::domain::{DesignMatrix, SolveRequest, SolverConfig};
use crate::error::{AppError, ComputationError};
use crate::math::pseudo_inverse;

/// Anything that can turn a design matrix and outcomes into weights.
///
/// Implemented by the local solver and by `client::RemoteSolver`, so the
/// analysis pipeline does not care where the computation happens.
pub trait WeightSolver {
    fn solve(&self, x: &DesignMatrix, y: &[f64]) -> Result<Vec<f64>, AppError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WeaknessSolver {
    config: SolverConfig,
}

impl WeaknessSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Least-squares weights for `x · w ≈ y`.
    pub fn compute(&self, x: &DesignMatrix, y: &[f64]) -> Result<Vec<f64>, ComputationError> {
        if x.is_empty() {
            return Ok(Vec::new());
        }
        if y.len() != x.rows() {
            return Err(ComputationError::LengthMismatch {
                rows: x.rows(),
                outcomes: y.len(),
            });
        }

        let pinv = pseudo_inverse(&x.to_dmatrix(), &self.config)?;
        let weights = pinv * DVector::from_column_slice(y);

        if weights.iter().any(|w| !w.is_finite()) {
            return Err(ComputationError::Decomposition(
                "weights contain non-finite values".to_string(),
            ));
        }
        Ok(weights.iter().copied().collect())
    }

    pub fn compute_request(&self, request: &SolveRequest) -> Result<Vec<f64>, ComputationError> {
        self.compute(&request.matrix, &request.outcomes)
    }
}

impl WeightSolver for WeaknessSolver {
    fn solve(&self, x: &DesignMatrix, y: &[f64]) -> Result<Vec<f64>, AppError> {
        Ok(self.compute(x, y)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[f64]]) -> DesignMatrix {
        DesignMatrix::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn empty_matrix_returns_empty_weights() {
        let solver = WeaknessSolver::default();
        let w = solver.compute(&DesignMatrix::empty(), &[1.0, 2.0]).unwrap();
        assert!(w.is_empty());
    }

    #[test]
    fn identity_system_is_solved_exactly() {
        let solver = WeaknessSolver::default();
        let w = solver.compute(&matrix(&[&[1.0, 0.0], &[0.0, 1.0]]), &[1.0, 0.0]).unwrap();
        assert_eq!(w.len(), 2);
        assert!((w[0] - 1.0).abs() < 1e-12);
        assert!(w[1].abs() < 1e-12);
    }

    #[test]
    fn single_column_of_ones_gives_the_mean() {
        let solver = WeaknessSolver::default();
        let w = solver.compute(&matrix(&[&[1.0], &[1.0], &[1.0]]), &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(w.len(), 1);
        assert!((w[0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn fits_a_line_by_least_squares() {
        // y = 2 + 3x on x = [0, 1, 2]
        let solver = WeaknessSolver::default();
        let x = matrix(&[&[1.0, 0.0], &[1.0, 1.0], &[1.0, 2.0]]);
        let w = solver.compute(&x, &[2.0, 5.0, 8.0]).unwrap();
        assert!((w[0] - 2.0).abs() < 1e-10);
        assert!((w[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn underdetermined_system_gets_minimum_norm_solution() {
        // x1 + x2 = 2 has minimum-norm solution (1, 1).
        let solver = WeaknessSolver::default();
        let w = solver.compute(&matrix(&[&[1.0, 1.0]]), &[2.0]).unwrap();
        assert!((w[0] - 1.0).abs() < 1e-12);
        assert!((w[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn one_hot_topics_give_per_topic_accuracy() {
        // Topic 0: 2 of 3 correct. Topic 1: 0 of 1. Topic 2: never asked.
        let solver = WeaknessSolver::default();
        let x = matrix(&[
            &[1.0, 0.0, 0.0],
            &[1.0, 0.0, 0.0],
            &[1.0, 0.0, 0.0],
            &[0.0, 1.0, 0.0],
        ]);
        let w = solver.compute(&x, &[1.0, 0.0, 1.0, 0.0]).unwrap();
        assert_eq!(w.len(), 3);
        assert!((w[0] - 2.0 / 3.0).abs() < 1e-12);
        assert!(w[1].abs() < 1e-12);
        assert!(w[2].abs() < 1e-12);
    }

    #[test]
    fn outcome_length_mismatch_is_an_error() {
        let solver = WeaknessSolver::default();
        let err = solver
            .compute(&matrix(&[&[1.0, 0.0], &[0.0, 1.0]]), &[1.0, 2.0, 3.0])
            .unwrap_err();
        assert_eq!(err, ComputationError::LengthMismatch { rows: 2, outcomes: 3 });
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn rows_without_columns_give_empty_weights() {
        let solver = WeaknessSolver::default();
        let x = DesignMatrix::from_rows(vec![vec![], vec![]]).unwrap();
        let w = solver.compute(&x, &[1.0, 0.0]).unwrap();
        assert!(w.is_empty());
    }

    #[test]
    fn compute_is_idempotent() {
        let solver = WeaknessSolver::default();
        let x = matrix(&[&[1.0, 2.0, 0.5], &[0.3, 1.0, 4.0], &[2.0, 2.0, 1.0], &[1.0, 0.0, 0.0]]);
        let y = [1.0, 0.0, 1.0, 1.0];
        let a = solver.compute(&x, &y).unwrap();
        let b = solver.compute(&x, &y).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), x.cols());
    }

    #[test]
    fn trait_object_reports_compute_exit_code() {
        let solver: &dyn WeightSolver = &WeaknessSolver::default();
        let err = solver.solve(&matrix(&[&[1.0]]), &[]).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_COMPUTE);
    }
}

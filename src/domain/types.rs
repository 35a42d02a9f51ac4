//! Shared domain types.
//!
//! These types are kept small and serializable so they can be:
//!
//! - built from HTTP request bodies and request files
//! - handed to the solver as strongly typed, already validated values
//! - written back out as JSON (responses, sample datasets, reports)

use clap::ValueEnum;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ComputationError, EXIT_INPUT, Location};

/// Default bound on SVD sweeps before the decomposition is declared non-convergent.
pub const DEFAULT_MAX_SVD_ITERATIONS: usize = 10_000;

/// How terminal commands print their results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table.
    Table,
    /// Machine-readable JSON (same envelope as the HTTP endpoint).
    Json,
}

/// What `weakness sample` writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    /// Topic list + per-item results, consumable by `weakness analyze`.
    Exam,
    /// Raw `{matrix_X, vector_Y}` request, consumable by `weakness solve` and the endpoint.
    Request,
}

/// Numeric settings for the pseudo-inverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Relative singular-value cutoff.
    ///
    /// `None` uses `max(M, N) * f64::EPSILON`. Singular values at or below
    /// `rcond * sigma_max` are treated as zero.
    pub rcond: Option<f64>,
    /// Iteration cap handed to the SVD. Hitting it is reported as non-convergence.
    pub max_svd_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            rcond: None,
            max_svd_iterations: DEFAULT_MAX_SVD_ITERATIONS,
        }
    }
}

impl SolverConfig {
    pub fn with_rcond(rcond: Option<f64>) -> Self {
        Self {
            rcond,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(rcond) = self.rcond {
            if !(rcond.is_finite() && rcond >= 0.0) {
                return Err(AppError::new(
                    EXIT_INPUT,
                    format!("rcond must be a finite, non-negative number (got {rcond})."),
                ));
            }
        }
        if self.max_svd_iterations == 0 {
            return Err(AppError::new(EXIT_INPUT, "max SVD iterations must be > 0."));
        }
        Ok(())
    }
}

/// A rectangular matrix of finite reals, stored row-major.
///
/// The only way to build one is through a validating constructor, so the
/// solver never sees ragged or non-finite input.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl DesignMatrix {
    /// A matrix with no rows (and therefore no columns).
    pub fn empty() -> Self {
        Self {
            rows: 0,
            cols: 0,
            data: Vec::new(),
        }
    }

    /// Build from nested rows. The first row fixes the column count.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ComputationError> {
        let Some(first) = rows.first() else {
            return Ok(Self::empty());
        };
        let cols = first.len();
        let mut data = Vec::with_capacity(rows.len() * cols);

        for (r, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(ComputationError::Ragged {
                    row: r,
                    expected: cols,
                    found: row.len(),
                });
            }
            for (c, &v) in row.iter().enumerate() {
                if !v.is_finite() {
                    return Err(ComputationError::NonFinite {
                        field: "matrix_X",
                        location: Location::Cell { row: r, col: c },
                    });
                }
            }
            data.extend_from_slice(row);
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Nested-row form, as sent over the wire.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows).map(|i| self.row(i).to_vec()).collect()
    }

    pub fn to_dmatrix(&self) -> DMatrix<f64> {
        DMatrix::from_row_slice(self.rows, self.cols, &self.data)
    }
}

/// A validated request: the design matrix and one outcome per row.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveRequest {
    pub matrix: DesignMatrix,
    pub outcomes: Vec<f64>,
}

/// Wire form of a request, used when *sending* (client, sample output).
///
/// Incoming bodies go through `io::payload` instead, which reports per-cell errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(rename = "matrix_X")]
    pub matrix_x: Vec<Vec<f64>>,
    #[serde(rename = "vector_Y")]
    pub vector_y: Vec<f64>,
}

/// Successful response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightsResponse {
    pub weights: Vec<f64>,
}

/// Error response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

/// One answered exam item, tagged with the topic it tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamItem {
    pub topic: String,
    pub correct: bool,
}

/// Input to topic analysis: a fixed topic order plus the answered items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub topics: Vec<String>,
    pub items: Vec<ExamItem>,
}

/// Per-topic result: the raw least-squares weight and the 0..=100 score derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicScore {
    pub topic: String,
    pub weight: f64,
    pub score: u8,
}

/// Settings for synthetic exam generation.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub topic_count: usize,
    pub item_count: usize,
    pub seed: u64,
    /// Beta distribution shape parameters for per-topic mastery.
    pub alpha: f64,
    pub beta: f64,
}

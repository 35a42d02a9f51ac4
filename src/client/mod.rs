//! Blocking client for a remote weight endpoint.
//!
//! Speaks the same wire contract the `serve` command exposes, so analysis can
//! run against a deployed instance instead of the in-process solver.

use reqwest::blocking::Client;
use tracing::debug;

use crate::domain::{DesignMatrix, ErrorBody, RequestBody, WeightsResponse};
use crate::error::{AppError, EXIT_INPUT, EXIT_REMOTE};
use crate::solver::WeightSolver;

/// Environment variable holding the default endpoint URL.
pub const API_URL_ENV: &str = "WEAKNESS_API_URL";

pub struct RemoteSolver {
    client: Client,
    url: String,
}

impl RemoteSolver {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    /// Build from `WEAKNESS_API_URL` (`.env` is honored).
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let url = std::env::var(API_URL_ENV)
            .map_err(|_| AppError::new(EXIT_INPUT, format!("Missing {API_URL_ENV} in environment (.env).")))?;
        Ok(Self::new(url))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl WeightSolver for RemoteSolver {
    fn solve(&self, x: &DesignMatrix, y: &[f64]) -> Result<Vec<f64>, AppError> {
        let body = RequestBody {
            matrix_x: x.to_rows(),
            vector_y: y.to_vec(),
        };
        debug!(url = %self.url, rows = x.rows(), cols = x.cols(), "posting solve request");

        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .map_err(|e| AppError::new(EXIT_REMOTE, format!("Request to {} failed: {e}", self.url)))?;

        let status = resp.status().as_u16();
        let bytes = resp
            .bytes()
            .map_err(|e| AppError::new(EXIT_REMOTE, format!("Failed to read response body: {e}")))?;

        interpret_response(status, &bytes, x.cols())
    }
}

/// Turn an endpoint response into weights.
///
/// Error envelopes are surfaced with their message; a successful response
/// must carry one weight per column (or none for an empty matrix).
pub fn interpret_response(status: u16, body: &[u8], cols: usize) -> Result<Vec<f64>, AppError> {
    if !(200..300).contains(&status) {
        let detail = serde_json::from_slice::<ErrorBody>(body)
            .map(|e| e.error)
            .unwrap_or_else(|_| String::from_utf8_lossy(body).into_owned());
        return Err(AppError::new(
            EXIT_REMOTE,
            format!("Remote solver returned status {status}: {detail}"),
        ));
    }

    let parsed: WeightsResponse = serde_json::from_slice(body)
        .map_err(|e| AppError::new(EXIT_REMOTE, format!("Failed to parse remote response: {e}")))?;

    if parsed.weights.len() != cols {
        return Err(AppError::new(
            EXIT_REMOTE,
            format!(
                "Remote solver returned {} weights for {cols} columns.",
                parsed.weights.len()
            ),
        ));
    }
    Ok(parsed.weights)
}

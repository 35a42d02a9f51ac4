//! Shared solve/analysis workflows used by the terminal commands.
//!
//! The commands only do I/O and presentation; the steps themselves live here
//! so they can be tested without spawning processes.

use tracing::info;

use crate::analysis::{AnalysisReport, analyze, build_design};
use crate::client::RemoteSolver;
use crate::data::SampleExam;
use crate::domain::{AnalysisInput, RequestBody, SampleFormat, SolveRequest, SolverConfig};
use crate::error::{AppError, EXIT_INPUT};
use crate::report::{SolveSummary, summarize};
use crate::solver::{WeaknessSolver, WeightSolver};

/// Outputs of a single `weakness solve` run.
#[derive(Debug, Clone)]
pub struct SolveRun {
    pub weights: Vec<f64>,
    pub summary: SolveSummary,
}

/// Where analysis weights come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverSource {
    Local,
    Remote(String),
    RemoteFromEnv,
}

pub fn run_solve(request: &SolveRequest, config: SolverConfig) -> Result<SolveRun, AppError> {
    config.validate()?;
    let solver = WeaknessSolver::new(config);

    let weights = solver.compute_request(request)?;
    let summary = summarize(&request.matrix, &request.outcomes, &weights, &config)?;
    info!(
        rows = summary.rows,
        cols = summary.cols,
        rank = summary.rank,
        "solved request"
    );

    Ok(SolveRun { weights, summary })
}

/// Resolve a solver for analysis. Returns the solver and a label for reports.
pub fn select_solver(
    source: &SolverSource,
    config: SolverConfig,
) -> Result<(Box<dyn WeightSolver>, String), AppError> {
    let (solver, label): (Box<dyn WeightSolver>, String) = match source {
        SolverSource::Local => {
            config.validate()?;
            (Box::new(WeaknessSolver::new(config)), "local".to_string())
        }
        SolverSource::Remote(url) => (Box::new(RemoteSolver::new(url.clone())), url.clone()),
        SolverSource::RemoteFromEnv => {
            let remote = RemoteSolver::from_env()?;
            let label = remote.url().to_string();
            (Box::new(remote), label)
        }
    };
    Ok((solver, label))
}

pub fn run_analysis(
    input: &AnalysisInput,
    solver: &dyn WeightSolver,
) -> Result<AnalysisReport, AppError> {
    let report = analyze(input, solver)?;
    info!(
        topics = input.topics.len(),
        items_used = report.items_used,
        items_skipped = report.items_skipped,
        "analysis complete"
    );
    Ok(report)
}

/// Convert a generated exam into the requested output document.
pub fn sample_document(exam: &SampleExam, format: SampleFormat) -> Result<serde_json::Value, AppError> {
    let value = match format {
        SampleFormat::Exam => serde_json::to_value(&exam.input),
        SampleFormat::Request => {
            let design = build_design(&exam.input.topics, &exam.input.items)?;
            serde_json::to_value(RequestBody {
                matrix_x: design.matrix.to_rows(),
                vector_y: design.outcomes,
            })
        }
    };
    value.map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to build sample JSON: {e}")))
}

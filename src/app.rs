//! Top-level application orchestration.
//!
//! `src/main.rs` is tiny; this module is the "real main" that:
//! - parses CLI arguments and initializes logging
//! - resolves configuration
//! - runs the server or a terminal command and prints its output

use clap::Parser;
use tracing::info;

use crate::cli::{AnalyzeArgs, Command, SampleArgs, ServeArgs, SolveArgs};
use crate::config::{ServerConfig, ServerOverrides};
use crate::domain::{OutputFormat, SampleConfig, SolverConfig, WeightsResponse};
use crate::error::{AppError, EXIT_INPUT};
use crate::io::files::{read_analysis_input, read_solve_request, write_json};

pub mod pipeline;

use pipeline::SolverSource;

/// Entry point for the `weakness` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    let default_level = match cli.command {
        Command::Serve(_) => "info",
        _ => "warn",
    };
    crate::logging::init(cli.log_level.as_deref().unwrap_or(default_level));

    match cli.command {
        Command::Serve(args) => handle_serve(args),
        Command::Solve(args) => handle_solve(args),
        Command::Analyze(args) => handle_analyze(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_serve(args: ServeArgs) -> Result<(), AppError> {
    let mut config = ServerConfig::from_env()?;
    config.apply_overrides(ServerOverrides {
        host: args.host,
        port: args.port,
        rcond: args.rcond,
        max_body_bytes: args.max_body_bytes,
    });
    // Overrides first, then validate once.
    config.validate()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to start async runtime: {e}")))?;

    runtime.block_on(crate::server::serve(config))
}

fn handle_solve(args: SolveArgs) -> Result<(), AppError> {
    let request = read_solve_request(args.input.as_deref())?;
    let run = pipeline::run_solve(&request, SolverConfig::with_rcond(args.rcond))?;

    match args.format {
        OutputFormat::Table => print!("{}", crate::report::format_solve(&run.weights, &run.summary)),
        OutputFormat::Json => write_json(None, &WeightsResponse { weights: run.weights })?,
    }
    Ok(())
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let input = read_analysis_input(args.input.as_deref())?;

    let source = match (&args.remote, args.remote_env) {
        (Some(url), _) => SolverSource::Remote(url.clone()),
        (None, true) => SolverSource::RemoteFromEnv,
        (None, false) => SolverSource::Local,
    };
    let (solver, label) = pipeline::select_solver(&source, SolverConfig::with_rcond(args.rcond))?;
    info!(solver = %label, "analyzing {} items", input.items.len());

    let report = pipeline::run_analysis(&input, solver.as_ref())?;

    match args.format {
        OutputFormat::Table => print!(
            "{}",
            crate::report::format_topic_report(&report, &label, args.width)
        ),
        OutputFormat::Json => write_json(None, &report.scores)?,
    }
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        topic_count: args.topics,
        item_count: args.items,
        seed: args.seed,
        alpha: args.alpha,
        beta: args.beta,
    };
    let exam = crate::data::generate_exam(&config)?;
    let doc = pipeline::sample_document(&exam, args.format)?;
    write_json(args.output.as_deref(), &doc)
}

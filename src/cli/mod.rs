//! Command-line parsing for the weakness solver.
//!
//! Argument parsing and command dispatch stay separate from the math and the
//! HTTP layer; `app` turns these structs into configs and runs them.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{OutputFormat, SampleFormat};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "weakness", version, about = "Least-squares weakness weights via the Moore-Penrose pseudo-inverse")]
pub struct Cli {
    /// Log level used when RUST_LOG is not set.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the HTTP endpoint.
    Serve(ServeArgs),
    /// Solve a `{matrix_X, vector_Y}` request file (or stdin) and print the weights.
    Solve(SolveArgs),
    /// Score topics from exam results (`{topics, items}`), locally or via a remote endpoint.
    Analyze(AnalyzeArgs),
    /// Generate a synthetic exam dataset.
    Sample(SampleArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct ServeArgs {
    /// Bind address (overrides WEAKNESS_HOST).
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (overrides PORT).
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Relative singular-value cutoff (overrides WEAKNESS_RCOND).
    #[arg(long)]
    pub rcond: Option<f64>,

    /// Maximum request body size in bytes (overrides WEAKNESS_MAX_BODY_BYTES).
    #[arg(long)]
    pub max_body_bytes: Option<usize>,
}

#[derive(Debug, Parser, Clone)]
pub struct SolveArgs {
    /// Request JSON file; `-` or omitted reads stdin.
    #[arg(short, long, value_name = "JSON")]
    pub input: Option<PathBuf>,

    /// Relative singular-value cutoff (default: max(M, N) * machine epsilon).
    #[arg(long)]
    pub rcond: Option<f64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    /// Analysis JSON file (`{topics, items}`); `-` or omitted reads stdin.
    #[arg(short, long, value_name = "JSON")]
    pub input: Option<PathBuf>,

    /// POST the design to this endpoint instead of solving locally.
    #[arg(long, value_name = "URL", conflicts_with = "remote_env")]
    pub remote: Option<String>,

    /// Use the endpoint in WEAKNESS_API_URL.
    #[arg(long)]
    pub remote_env: bool,

    /// Relative singular-value cutoff for local solves.
    #[arg(long)]
    pub rcond: Option<f64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Bar width for the table output.
    #[arg(long, default_value_t = 30)]
    pub width: usize,
}

#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Number of topics.
    #[arg(short, long, default_value_t = 6)]
    pub topics: usize,

    /// Number of exam items.
    #[arg(short = 'n', long, default_value_t = 40)]
    pub items: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Beta(alpha, beta) shape for per-topic mastery.
    #[arg(long, default_value_t = 2.0)]
    pub alpha: f64,

    #[arg(long, default_value_t = 2.0)]
    pub beta: f64,

    #[arg(long, value_enum, default_value_t = SampleFormat::Exam)]
    pub format: SampleFormat,

    /// Output file; stdout when omitted.
    #[arg(short, long, value_name = "JSON")]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_flags_parse() {
        let cli = Cli::parse_from(["weakness", "serve", "--port", "9000", "--rcond", "1e-12"]);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.port, Some(9000));
        assert_eq!(args.rcond, Some(1e-12));
        assert!(args.host.is_none());
    }

    #[test]
    fn analyze_remote_flags_conflict() {
        let res = Cli::try_parse_from(["weakness", "analyze", "--remote", "http://x", "--remote-env"]);
        assert!(res.is_err());
    }

    #[test]
    fn sample_defaults() {
        let cli = Cli::parse_from(["weakness", "--log-level", "debug", "sample"]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        let Command::Sample(args) = cli.command else {
            panic!("expected sample");
        };
        assert_eq!(args.topics, 6);
        assert_eq!(args.items, 40);
        assert_eq!(args.format, SampleFormat::Exam);
    }
}

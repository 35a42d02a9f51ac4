//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - the validated request form (`DesignMatrix`, `SolveRequest`)
//! - wire envelopes (`RequestBody`, `WeightsResponse`, `ErrorBody`)
//! - solver and sample settings (`SolverConfig`, `SampleConfig`)
//! - topic analysis types (`AnalysisInput`, `ExamItem`, `TopicScore`)

pub mod types;

pub use types::*;

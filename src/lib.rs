//! `weakness-solver` library crate.
//!
//! The binary (`weakness`) is a thin wrapper around this library so that:
//!
//! - the solver and the HTTP handler are testable in-process
//! - the same computation backs the server and the terminal commands

pub mod analysis;
pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod math;
pub mod report;
pub mod server;
pub mod solver;

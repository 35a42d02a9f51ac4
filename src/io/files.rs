//! Read/write the JSON files used by the terminal commands.
//!
//! - request files (`{matrix_X, vector_Y}`), decoded exactly like HTTP bodies
//! - analysis inputs (`{topics, items}`)
//! - pretty-printed JSON output (results, generated samples)
//!
//! A missing path (or `-`) means stdin / stdout.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;

use crate::domain::{AnalysisInput, SolveRequest};
use crate::error::{AppError, EXIT_INPUT};
use crate::io::payload::{decode_body, parse_request};

fn is_stdio(path: Option<&Path>) -> bool {
    path.is_none_or(|p| p.as_os_str() == "-")
}

/// Read the whole input (file or stdin).
pub fn read_input_bytes(path: Option<&Path>) -> Result<Vec<u8>, AppError> {
    let mut buf = Vec::new();
    match path {
        Some(p) if !is_stdio(path) => {
            File::open(p)
                .and_then(|mut f| f.read_to_end(&mut buf))
                .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to read '{}': {e}", p.display())))?;
        }
        _ => {
            std::io::stdin()
                .read_to_end(&mut buf)
                .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to read stdin: {e}")))?;
        }
    }
    Ok(buf)
}

/// Read and validate a `{matrix_X, vector_Y}` request.
pub fn read_solve_request(path: Option<&Path>) -> Result<SolveRequest, AppError> {
    let bytes = read_input_bytes(path)?;
    let value = decode_body(&bytes).ok_or_else(|| AppError::new(EXIT_INPUT, "No JSON data provided"))?;
    parse_request(&value).map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid request: {e}")))
}

/// Read an analysis input (`{topics, items}`).
pub fn read_analysis_input(path: Option<&Path>) -> Result<AnalysisInput, AppError> {
    let bytes = read_input_bytes(path)?;
    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid analysis input JSON: {e}")))
}

/// Write `value` as pretty JSON to `path` (or stdout).
pub fn write_json<T: Serialize>(path: Option<&Path>, value: &T) -> Result<(), AppError> {
    let mut json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to serialize JSON: {e}")))?;
    json.push('\n');

    match path {
        Some(p) if !is_stdio(path) => {
            let mut file = File::create(p)
                .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to create '{}': {e}", p.display())))?;
            file.write_all(json.as_bytes())
                .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write '{}': {e}", p.display())))?;
        }
        _ => {
            std::io::stdout()
                .write_all(json.as_bytes())
                .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write stdout: {e}")))?;
        }
    }
    Ok(())
}

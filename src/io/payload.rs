//! Request body decoding.
//!
//! Incoming bodies are handled in two steps, mirroring the two error tiers of
//! the endpoint:
//!
//! 1. `decode_body`: is there any JSON data at all? (`None` → 400)
//! 2. `parse_request`: strict conversion into a `SolveRequest`. Every problem
//!    (missing keys, wrong shapes, non-numeric cells, ragged rows) becomes a
//!    `ComputationError` naming the offending location (→ 500).
//!
//! We deliberately walk `serde_json::Value` instead of deriving `Deserialize`
//! so errors can point at a specific cell.

use serde_json::Value;

use crate::domain::{DesignMatrix, SolveRequest};
use crate::error::{ComputationError, Location};

pub const MATRIX_FIELD: &str = "matrix_X";
pub const VECTOR_FIELD: &str = "vector_Y";

/// Decode raw body bytes. Returns `None` when the body is empty, not JSON, or
/// a JSON value that carries no data.
pub fn decode_body(bytes: &[u8]) -> Option<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    let value: Value = serde_json::from_slice(bytes).ok()?;
    if carries_no_data(&value) {
        return None;
    }
    Some(value)
}

/// `null`, `false`, `0`, `""`, `[]` and `{}`.
pub fn carries_no_data(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Convert a decoded body into a validated request.
///
/// An empty `matrix_X` is valid; `vector_Y` must still be present but its
/// contents are not inspected since nothing will be computed.
pub fn parse_request(value: &Value) -> Result<SolveRequest, ComputationError> {
    let object = value.as_object().ok_or_else(|| ComputationError::Malformed {
        field: "request body",
        message: "expected a JSON object".to_string(),
    })?;

    let raw_matrix = object
        .get(MATRIX_FIELD)
        .ok_or(ComputationError::MissingField(MATRIX_FIELD))?;
    let raw_vector = object
        .get(VECTOR_FIELD)
        .ok_or(ComputationError::MissingField(VECTOR_FIELD))?;

    let matrix = DesignMatrix::from_rows(parse_rows(raw_matrix)?)?;
    if matrix.is_empty() {
        return Ok(SolveRequest {
            matrix,
            outcomes: Vec::new(),
        });
    }

    let outcomes = parse_vector(raw_vector)?;
    Ok(SolveRequest { matrix, outcomes })
}

fn parse_rows(value: &Value) -> Result<Vec<Vec<f64>>, ComputationError> {
    let rows = value.as_array().ok_or_else(|| ComputationError::Malformed {
        field: MATRIX_FIELD,
        message: format!("expected an array of rows, got {}", kind_of(value)),
    })?;

    rows.iter()
        .enumerate()
        .map(|(r, row)| {
            let cells = row.as_array().ok_or_else(|| ComputationError::Malformed {
                field: MATRIX_FIELD,
                message: format!("row {r} is {}, expected an array", kind_of(row)),
            })?;
            cells
                .iter()
                .enumerate()
                .map(|(c, cell)| coerce_number(cell, MATRIX_FIELD, Location::Cell { row: r, col: c }))
                .collect::<Result<Vec<f64>, _>>()
        })
        .collect()
}

fn parse_vector(value: &Value) -> Result<Vec<f64>, ComputationError> {
    let items = value.as_array().ok_or_else(|| ComputationError::Malformed {
        field: VECTOR_FIELD,
        message: format!("expected an array of numbers, got {}", kind_of(value)),
    })?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| coerce_number(item, VECTOR_FIELD, Location::Index(i)))
        .collect()
}

/// Numbers pass through; booleans count as 0/1 (correctness flags).
fn coerce_number(value: &Value, field: &'static str, location: Location) -> Result<f64, ComputationError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or(ComputationError::NonFinite { field, location }),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        _ => Err(ComputationError::NonNumeric { field, location }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decode_body_rejects_missing_or_empty_data() {
        assert!(decode_body(b"").is_none());
        assert!(decode_body(b"   \n").is_none());
        assert!(decode_body(b"not json").is_none());
        assert!(decode_body(b"{}").is_none());
        assert!(decode_body(b"null").is_none());
        assert!(decode_body(b"[]").is_none());
        assert!(decode_body(br#"{"matrix_X": []}"#).is_some());
        assert!(decode_body(b"[1]").is_some());
    }

    #[test]
    fn out_of_range_numbers_are_data_but_not_finite() {
        let value = decode_body(br#"{"matrix_X": [[1, 2], [3, 1e400]], "vector_Y": [1, 2]}"#).unwrap();
        let err = parse_request(&value).unwrap_err();
        assert_eq!(
            err,
            ComputationError::NonFinite {
                field: "matrix_X",
                location: Location::Cell { row: 1, col: 1 },
            }
        );

        let value = decode_body(br#"{"matrix_X": [[1]], "vector_Y": [-1e999]}"#).unwrap();
        let err = parse_request(&value).unwrap_err();
        assert_eq!(err.to_string(), "vector_Y[0] is not a finite number");
    }

    #[test]
    fn parses_a_well_formed_request() {
        let req = parse_request(&json!({
            "matrix_X": [[1, 0], [0, 1.5]],
            "vector_Y": [1, 0]
        }))
        .unwrap();
        assert_eq!(req.matrix.rows(), 2);
        assert_eq!(req.matrix.cols(), 2);
        assert_eq!(req.matrix.row(1), &[0.0, 1.5]);
        assert_eq!(req.outcomes, vec![1.0, 0.0]);
    }

    #[test]
    fn booleans_are_read_as_zero_or_one() {
        let req = parse_request(&json!({
            "matrix_X": [[1], [1]],
            "vector_Y": [true, false]
        }))
        .unwrap();
        assert_eq!(req.outcomes, vec![1.0, 0.0]);
    }

    #[test]
    fn empty_matrix_ignores_vector_contents() {
        let req = parse_request(&json!({ "matrix_X": [], "vector_Y": "anything" })).unwrap();
        assert!(req.matrix.is_empty());
        assert!(req.outcomes.is_empty());
    }

    #[test]
    fn missing_keys_are_reported_by_name() {
        let err = parse_request(&json!({ "vector_Y": [1] })).unwrap_err();
        assert_eq!(err, ComputationError::MissingField("matrix_X"));

        let err = parse_request(&json!({ "matrix_X": [] })).unwrap_err();
        assert_eq!(err, ComputationError::MissingField("vector_Y"));
    }

    #[test]
    fn non_numeric_cells_point_at_their_location() {
        let err = parse_request(&json!({
            "matrix_X": [[1, 0], [0, "x"]],
            "vector_Y": [1, 0]
        }))
        .unwrap_err();
        assert_eq!(
            err,
            ComputationError::NonNumeric {
                field: "matrix_X",
                location: Location::Cell { row: 1, col: 1 }
            }
        );

        let err = parse_request(&json!({
            "matrix_X": [[1]],
            "vector_Y": [null]
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "vector_Y[0] is not a number");
    }

    #[test]
    fn ragged_and_misshapen_matrices_are_rejected() {
        let err = parse_request(&json!({
            "matrix_X": [[1, 0], [1]],
            "vector_Y": [1, 0]
        }))
        .unwrap_err();
        assert!(matches!(err, ComputationError::Ragged { row: 1, .. }));

        let err = parse_request(&json!({ "matrix_X": [1, 2], "vector_Y": [1, 0] })).unwrap_err();
        assert!(matches!(err, ComputationError::Malformed { field: "matrix_X", .. }));

        let err = parse_request(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, ComputationError::Malformed { field: "request body", .. }));
    }
}

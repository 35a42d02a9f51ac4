//! Error types.
//!
//! - `AppError`: process-level failure carrying an exit code (CLI surface).
//! - `ComputationError`: everything that can go wrong between a parsed request
//!   and a weight vector. The HTTP layer reports these verbatim with status 500.

/// Exit code for invalid input or configuration.
pub const EXIT_INPUT: u8 = 2;
/// Exit code for network / remote endpoint failures.
pub const EXIT_REMOTE: u8 = 3;
/// Exit code for numeric failures.
pub const EXIT_COMPUTE: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<ComputationError> for AppError {
    fn from(err: ComputationError) -> Self {
        AppError::new(EXIT_COMPUTE, err.to_string())
    }
}

/// Where a bad value sits inside the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// `matrix_X[row][col]`
    Cell { row: usize, col: usize },
    /// `vector_Y[index]`
    Index(usize),
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Cell { row, col } => write!(f, "[{row}][{col}]"),
            Location::Index(i) => write!(f, "[{i}]"),
        }
    }
}

/// Failure while turning a request into weights.
#[derive(Debug, Clone, PartialEq)]
pub enum ComputationError {
    /// A request key is absent.
    MissingField(&'static str),
    /// A request key is present but does not have the expected JSON shape.
    Malformed { field: &'static str, message: String },
    /// A row of the matrix has a different length than the first row.
    Ragged { row: usize, expected: usize, found: usize },
    /// `vector_Y` does not have one entry per row of `matrix_X`.
    LengthMismatch { rows: usize, outcomes: usize },
    /// A value that cannot be read as a real number.
    NonNumeric { field: &'static str, location: Location },
    /// NaN or infinity.
    NonFinite { field: &'static str, location: Location },
    /// The singular value decomposition failed or produced unusable values.
    Decomposition(String),
}

impl std::fmt::Display for ComputationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComputationError::MissingField(field) => write!(f, "missing field `{field}`"),
            ComputationError::Malformed { field, message } => write!(f, "invalid `{field}`: {message}"),
            ComputationError::Ragged { row, expected, found } => write!(
                f,
                "matrix_X is not rectangular: row {row} has {found} columns, expected {expected}"
            ),
            ComputationError::LengthMismatch { rows, outcomes } => write!(
                f,
                "shape mismatch: matrix_X has {rows} rows but vector_Y has {outcomes} values"
            ),
            ComputationError::NonNumeric { field, location } => {
                write!(f, "{field}{location} is not a number")
            }
            ComputationError::NonFinite { field, location } => {
                write!(f, "{field}{location} is not a finite number")
            }
            ComputationError::Decomposition(message) => {
                write!(f, "pseudo-inverse computation failed: {message}")
            }
        }
    }
}

impl std::error::Error for ComputationError {}

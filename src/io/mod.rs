//! Input/output helpers.
//!
//! - request body decoding + validation (`payload`)
//! - JSON file read/write for the terminal commands (`files`)

pub mod files;
pub mod payload;

pub use files::*;
pub use payload::*;

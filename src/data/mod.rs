//! Data sources.
//!
//! - `sample`: seeded synthetic exam generator

pub mod sample;

pub use sample::*;

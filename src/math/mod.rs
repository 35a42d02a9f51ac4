//! Numerical utilities: SVD-based pseudo-inverse.

pub mod pinv;

pub use pinv::*;

//! Error types for convolution operations.

use thiserror::Error;

/// Errors that can occur while convolving.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid {name} dimensions {rows}x{cols}: both must be at least 1")]
    InvalidDimensions {
        name: &'static str,
        rows: usize,
        cols: usize,
    },

    #[error("Failed to allocate {name} buffer of {rows}x{cols} values")]
    Allocation {
        name: &'static str,
        rows: usize,
        cols: usize,
    },

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;

//! conv2d - Same-size 2D convolution.
//!
//! Cross-correlates a dense `f32` matrix with a kernel and returns a matrix of
//! the input's dimensions, whatever the kernel size or parity. A serial and a
//! rayon-parallel engine produce the same values up to rounding.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use conv2d::{convolve, Matrix, Mode};
//!
//! let input = Matrix::from_rows(&[[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0]]);
//! let kernel = Matrix::new(3, 3, vec![1.0 / 9.0; 9]);
//!
//! let output = convolve(&input, &kernel, Mode::default())?;
//! assert_eq!(output.dimensions(), input.dimensions());
//! ```

pub mod config;
pub mod convolution;
mod error;
pub mod matrix;
pub mod matrix_file;
pub mod random;

#[cfg(feature = "bench")]
pub mod bench;

pub use config::{Mode, ParallelConfig, RowPartition};
pub use convolution::{
    convolve, convolve_parallel, convolve_serial, evaluate_cell, pad, Padding,
};
pub use error::{Error, Result};
pub use matrix::Matrix;
pub use matrix_file::{
    format_matrix, parse_matrix, read_matrix, write_matrix, MatrixFileError,
};
pub use random::random_matrix;

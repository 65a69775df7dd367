//! Same-size 2D convolution.
//!
//! Computes the cross-correlation of an input matrix with a kernel (the kernel
//! is not flipped). The input is zero padded according to [`Padding::select`]
//! so the output always has the input's dimensions.
//!
//! Two engines share the padding and the per-cell evaluator:
//! - [`convolve_serial`] walks the output in row-major order on the calling thread.
//! - [`convolve_parallel`] splits the output rows into disjoint chunks processed
//!   by rayon workers.
//!
//! Every output cell sums its `kH * kW` terms in the same order in both engines.


pub mod padding;

use common::parallel::ParRowsMut;
use rayon::prelude::*;

use crate::config::{Mode, ParallelConfig};
use crate::error::{Error, Result};
use crate::matrix::Matrix;

pub use padding::{pad, Padding};

/// Convolve `input` with `kernel` using the engine selected by `mode`.
pub fn convolve(input: &Matrix, kernel: &Matrix, mode: Mode) -> Result<Matrix> {
    match mode {
        Mode::Serial => convolve_serial(input, kernel),
        Mode::Parallel(config) => convolve_parallel(input, kernel, &config),
    }
}

/// Weighted sum of the `kernel`-sized window of `padded` whose top-left corner is `(row, col)`.
///
/// Terms are accumulated kernel row by kernel row, left to right.
#[inline]
pub fn evaluate_cell(padded: &Matrix, kernel: &Matrix, row: usize, col: usize) -> f32 {
    let kernel_cols = kernel.cols();
    let mut sum = 0.0f32;
    for (u, kernel_row) in kernel.iter_rows().enumerate() {
        let window = &padded.row(row + u)[col..col + kernel_cols];
        for (&p, &k) in window.iter().zip(kernel_row) {
            sum += p * k;
        }
    }
    sum
}

/// Single-threaded convolution, bit-for-bit deterministic.
pub fn convolve_serial(input: &Matrix, kernel: &Matrix) -> Result<Matrix> {
    validate_dimensions(input, kernel)?;

    let padding = Padding::for_kernel(kernel);
    tracing::debug!(
        rows = input.rows(),
        cols = input.cols(),
        kernel_rows = kernel.rows(),
        kernel_cols = kernel.cols(),
        ?padding,
        "Serial convolution"
    );

    let padded = pad(input, padding)?;
    let mut output = Matrix::zeros_named("output", input.rows(), input.cols())?;
    for row in 0..output.rows() {
        for (col, out) in output.row_mut(row).iter_mut().enumerate() {
            *out = evaluate_cell(&padded, kernel, row, col);
        }
    }

    Ok(output)
}

/// Data-parallel convolution.
///
/// Output rows are split into disjoint chunks according to `config.partition`;
/// each worker only writes the rows of its own chunk. The padded input and the
/// kernel are shared read-only. The call returns once every chunk is done.
///
/// # Panics
///
/// Panics if `config` is invalid (see [`ParallelConfig::validate`]).
pub fn convolve_parallel(
    input: &Matrix,
    kernel: &Matrix,
    config: &ParallelConfig,
) -> Result<Matrix> {
    config.validate();
    validate_dimensions(input, kernel)?;

    let padding = Padding::for_kernel(kernel);
    tracing::debug!(
        rows = input.rows(),
        cols = input.cols(),
        kernel_rows = kernel.rows(),
        kernel_cols = kernel.cols(),
        ?padding,
        threads = ?config.threads,
        partition = %config.partition,
        "Parallel convolution"
    );

    let padded = pad(input, padding)?;
    let mut output = Matrix::zeros_named("output", input.rows(), input.cols())?;

    match config.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads.get())
                .thread_name(|i| format!("conv2d-worker-{i}"))
                .build()?;
            pool.install(|| fill_rows_parallel(&padded, kernel, &mut output, config));
        }
        None => fill_rows_parallel(&padded, kernel, &mut output, config),
    }

    Ok(output)
}

/// Evaluate every cell of `output` on the current rayon pool.
fn fill_rows_parallel(
    padded: &Matrix,
    kernel: &Matrix,
    output: &mut Matrix,
    config: &ParallelConfig,
) {
    let cols = output.cols();
    output
        .values_mut()
        .par_rows_mut(cols, config.partition)
        .for_each(|(chunk_start_row, chunk)| {
            for (local_row, out_row) in chunk.chunks_exact_mut(cols).enumerate() {
                let row = chunk_start_row + local_row;
                for (col, out) in out_row.iter_mut().enumerate() {
                    *out = evaluate_cell(padded, kernel, row, col);
                }
            }
        });
}

fn validate_dimensions(input: &Matrix, kernel: &Matrix) -> Result<()> {
    for (name, matrix) in [("input", input), ("kernel", kernel)] {
        if matrix.rows() == 0 || matrix.cols() == 0 {
            return Err(Error::InvalidDimensions {
                name,
                rows: matrix.rows(),
                cols: matrix.cols(),
            });
        }
    }
    Ok(())
}

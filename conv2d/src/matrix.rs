//! Dense row-major `f32` matrix.

use std::ops::{Index, IndexMut};

use crate::error::{Error, Result};

/// Owned dense matrix stored as one contiguous row-major buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    values: Vec<f32>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// Wraps `values` laid out row by row.
    ///
    /// # Panics
    ///
    /// Panics if `values.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, values: Vec<f32>) -> Self {
        assert_eq!(
            Some(values.len()),
            rows.checked_mul(cols),
            "values length must equal rows * cols"
        );
        Self { values, rows, cols }
    }

    /// Allocates a zero-filled matrix, reporting allocation failure instead of aborting.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        Self::zeros_named("matrix", rows, cols)
    }

    /// Like [`Matrix::zeros`], with `name` identifying the buffer in the error.
    pub(crate) fn zeros_named(name: &'static str, rows: usize, cols: usize) -> Result<Self> {
        let alloc_error = || Error::Allocation { name, rows, cols };

        let len = rows.checked_mul(cols).ok_or_else(alloc_error)?;
        let mut values = Vec::new();
        values.try_reserve_exact(len).map_err(|_| alloc_error())?;
        values.resize(len, 0.0);

        Ok(Self { values, rows, cols })
    }

    /// Builds a matrix from equally long rows.
    ///
    /// # Panics
    ///
    /// Panics if the rows differ in length.
    pub fn from_rows<R: AsRef<[f32]>>(rows: &[R]) -> Self {
        let cols = rows.first().map_or(0, |row| row.as_ref().len());
        let mut values = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            assert_eq!(row.len(), cols, "all rows must have the same length");
            values.extend_from_slice(row);
        }
        Self::new(rows.len(), cols, values)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        debug_assert!(row < self.rows && col < self.cols);
        self.values[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        debug_assert!(row < self.rows && col < self.cols);
        self.values[row * self.cols + col] = value;
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[f32] {
        let start = row * self.cols;
        &self.values[start..start + self.cols]
    }

    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut [f32] {
        let start = row * self.cols;
        &mut self.values[start..start + self.cols]
    }

    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    #[inline]
    pub fn values_mut(&mut self) -> &mut [f32] {
        &mut self.values
    }

    #[inline]
    pub fn into_vec(self) -> Vec<f32> {
        self.values
    }

    /// Iterates over the rows as slices.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        // chunks_exact(0) panics, and a zero-width matrix has no values anyway.
        self.values.chunks_exact(self.cols.max(1))
    }

    /// Largest absolute element-wise difference to `other`.
    ///
    /// # Panics
    ///
    /// Panics if the dimensions differ.
    pub fn max_abs_diff(&self, other: &Matrix) -> f32 {
        assert_eq!(
            self.dimensions(),
            other.dimensions(),
            "dimension mismatch"
        );
        self.values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f32::max)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f32;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.values[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        &mut self.values[row * self.cols + col]
    }
}

impl From<Matrix> for Vec<f32> {
    #[inline]
    fn from(matrix: Matrix) -> Self {
        matrix.values
    }
}

//! Zero padding that keeps the output the same size as the input.

use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Zero border added around the input before the sliding-window sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

impl Padding {
    /// Chooses the padding for a `kernel_rows x kernel_cols` kernel.
    ///
    /// Odd x odd kernels are centred: `k / 2` on each side of each axis.
    /// If either dimension is even, both axes get no top/left padding and
    /// `k - 1` bottom/right padding, so the kernel's top-left weight sits on
    /// the output cell. A 3x2 kernel therefore pads `(0, 2, 0, 1)`, not a
    /// per-axis mix.
    pub fn select(kernel_rows: usize, kernel_cols: usize) -> Self {
        if kernel_rows % 2 == 1 && kernel_cols % 2 == 1 {
            Self {
                top: kernel_rows / 2,
                bottom: kernel_rows / 2,
                left: kernel_cols / 2,
                right: kernel_cols / 2,
            }
        } else {
            Self {
                top: 0,
                bottom: kernel_rows.saturating_sub(1),
                left: 0,
                right: kernel_cols.saturating_sub(1),
            }
        }
    }

    /// Padding for `kernel`.
    pub fn for_kernel(kernel: &Matrix) -> Self {
        Self::select(kernel.rows(), kernel.cols())
    }

    /// Whether the kernel is centred on the output cell.
    pub fn is_symmetric(&self) -> bool {
        self.top == self.bottom && self.left == self.right
    }

    /// Dimensions of a `rows x cols` matrix after padding, `None` on overflow.
    pub fn padded_dimensions(&self, rows: usize, cols: usize) -> Option<(usize, usize)> {
        let padded_rows = rows.checked_add(self.top)?.checked_add(self.bottom)?;
        let padded_cols = cols.checked_add(self.left)?.checked_add(self.right)?;
        Some((padded_rows, padded_cols))
    }
}

/// Copies `input` into a zero-filled buffer with `padding` around it.
///
/// The border is zero and stays zero: nothing writes to the result after this.
pub fn pad(input: &Matrix, padding: Padding) -> Result<Matrix> {
    let (padded_rows, padded_cols) = padding
        .padded_dimensions(input.rows(), input.cols())
        .ok_or_else(|| Error::Allocation {
            name: "padded",
            rows: input
                .rows()
                .saturating_add(padding.top)
                .saturating_add(padding.bottom),
            cols: input
                .cols()
                .saturating_add(padding.left)
                .saturating_add(padding.right),
        })?;

    let mut padded = Matrix::zeros_named("padded", padded_rows, padded_cols)?;
    let left = padding.left;
    let cols = input.cols();
    for (row, values) in input.iter_rows().enumerate() {
        padded.row_mut(row + padding.top)[left..left + cols].copy_from_slice(values);
    }

    Ok(padded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_odd_kernel_is_centred() {
        assert_eq!(
            Padding::select(3, 5),
            Padding {
                top: 1,
                bottom: 1,
                left: 2,
                right: 2,
            }
        );
        assert!(Padding::select(3, 5).is_symmetric());
    }

    #[test]
    fn test_select_one_by_one_has_no_padding() {
        assert_eq!(Padding::select(1, 1), Padding::default());
    }

    #[test]
    fn test_select_even_kernel_pads_bottom_right() {
        assert_eq!(
            Padding::select(4, 2),
            Padding {
                top: 0,
                bottom: 3,
                left: 0,
                right: 1,
            }
        );
        assert!(!Padding::select(4, 2).is_symmetric());
    }

    #[test]
    fn test_select_mixed_parity_pads_both_axes_asymmetrically() {
        // Odd rows do not get centred when the column count is even.
        assert_eq!(
            Padding::select(3, 2),
            Padding {
                top: 0,
                bottom: 2,
                left: 0,
                right: 1,
            }
        );
        assert_eq!(
            Padding::select(2, 5),
            Padding {
                top: 0,
                bottom: 1,
                left: 0,
                right: 4,
            }
        );
    }

    #[test]
    fn test_padded_dimensions_keep_output_size() {
        // Padded size minus (k - 1) must equal the input size for any kernel.
        for kernel_rows in 1..6 {
            for kernel_cols in 1..6 {
                let padding = Padding::select(kernel_rows, kernel_cols);
                let (rows, cols) = padding.padded_dimensions(7, 4).unwrap();
                assert_eq!(rows + 1 - kernel_rows, 7);
                assert_eq!(cols + 1 - kernel_cols, 4);
            }
        }
    }

    #[test]
    fn test_padded_dimensions_overflow() {
        let padding = Padding::select(3, 3);
        assert_eq!(padding.padded_dimensions(usize::MAX, 1), None);
    }

    #[test]
    fn test_pad_symmetric_border_is_zero() {
        let input = Matrix::from_rows(&[[1.0f32, 2.0], [3.0, 4.0]]);
        let padded = pad(&input, Padding::select(3, 3)).unwrap();

        assert_eq!(padded.dimensions(), (4, 4));
        let expected = Matrix::from_rows(&[
            [0.0f32, 0.0, 0.0, 0.0],
            [0.0, 1.0, 2.0, 0.0],
            [0.0, 3.0, 4.0, 0.0],
            [0.0, 0.0, 0.0, 0.0],
        ]);
        assert_eq!(padded, expected);
    }

    #[test]
    fn test_pad_asymmetric_offsets_at_origin() {
        let input = Matrix::from_rows(&[[1.0f32, 2.0, 3.0]]);
        let padded = pad(&input, Padding::select(2, 2)).unwrap();

        let expected = Matrix::from_rows(&[[1.0f32, 2.0, 3.0, 0.0], [0.0, 0.0, 0.0, 0.0]]);
        assert_eq!(padded, expected);
    }

    #[test]
    fn test_pad_without_padding_copies_input() {
        let input = Matrix::from_rows(&[[1.5f32, -2.0], [0.25, 8.0]]);
        let padded = pad(&input, Padding::default()).unwrap();
        assert_eq!(padded, input);
    }

    #[test]
    fn test_pad_overflow_is_allocation_error() {
        let input = Matrix::from_rows(&[[1.0f32]]);
        let padding = Padding {
            bottom: usize::MAX,
            ..Padding::default()
        };
        let err = pad(&input, padding).unwrap_err();
        assert!(matches!(err, Error::Allocation { name: "padded", .. }));
    }
}

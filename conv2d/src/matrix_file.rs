//! Plain-text matrix files.
//!
//! Format: a `"<rows> <cols>"` header line, then one line per row with the
//! values separated by spaces. Values are written with 3 fractional digits.
//! The reader only needs the tokens in order, so any whitespace layout works.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::matrix::Matrix;

/// Errors that can occur when reading or writing a matrix file.
#[derive(Debug, Error)]
pub enum MatrixFileError {
    #[error("Failed to read matrix file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write matrix file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Missing matrix header, expected \"<rows> <cols>\"")]
    MissingHeader,

    #[error("Invalid matrix header value '{token}'")]
    InvalidHeader { token: String },

    #[error("Invalid matrix dimensions {rows}x{cols}: both must be at least 1")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("Invalid value '{token}' at row {row}, column {col}")]
    InvalidValue {
        token: String,
        row: usize,
        col: usize,
    },

    #[error("Expected {expected} values for a {rows}x{cols} matrix, found {actual}")]
    ValueCount {
        rows: usize,
        cols: usize,
        expected: usize,
        actual: usize,
    },
}

/// Reads a matrix file.
pub fn read_matrix(path: &Path) -> Result<Matrix, MatrixFileError> {
    let text = std::fs::read_to_string(path).map_err(|source| MatrixFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let matrix = parse_matrix(&text)?;
    tracing::debug!(
        path = %path.display(),
        rows = matrix.rows(),
        cols = matrix.cols(),
        "Matrix loaded"
    );
    Ok(matrix)
}

/// Parses the text format.
pub fn parse_matrix(text: &str) -> Result<Matrix, MatrixFileError> {
    let mut tokens = text.split_whitespace();
    let rows = parse_header_value(tokens.next())?;
    let cols = parse_header_value(tokens.next())?;
    if rows == 0 || cols == 0 {
        return Err(MatrixFileError::InvalidDimensions { rows, cols });
    }

    let value_count_error = |actual| MatrixFileError::ValueCount {
        rows,
        cols,
        expected: rows.saturating_mul(cols),
        actual,
    };
    let expected = rows.checked_mul(cols).ok_or(value_count_error(0))?;

    let mut values = Vec::new();
    for (i, token) in tokens.enumerate() {
        if i >= expected {
            return Err(value_count_error(i + 1));
        }
        let value = token
            .parse::<f32>()
            .map_err(|_| MatrixFileError::InvalidValue {
                token: token.to_string(),
                row: i / cols,
                col: i % cols,
            })?;
        values.push(value);
    }
    if values.len() != expected {
        return Err(value_count_error(values.len()));
    }

    Ok(Matrix::new(rows, cols, values))
}

fn parse_header_value(token: Option<&str>) -> Result<usize, MatrixFileError> {
    let token = token.ok_or(MatrixFileError::MissingHeader)?;
    token
        .parse::<usize>()
        .map_err(|_| MatrixFileError::InvalidHeader {
            token: token.to_string(),
        })
}

/// Writes `matrix` to `path`, replacing any existing file.
pub fn write_matrix(path: &Path, matrix: &Matrix) -> Result<(), MatrixFileError> {
    let write_error = |source| MatrixFileError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    write_matrix_to(&mut writer, matrix).map_err(write_error)?;
    writer.flush().map_err(write_error)?;
    tracing::debug!(
        path = %path.display(),
        rows = matrix.rows(),
        cols = matrix.cols(),
        "Matrix saved"
    );
    Ok(())
}

/// Writes `matrix` in the text format to any writer.
pub fn write_matrix_to<W: Write>(writer: &mut W, matrix: &Matrix) -> io::Result<()> {
    writeln!(writer, "{} {}", matrix.rows(), matrix.cols())?;
    for row in matrix.iter_rows() {
        for (col, value) in row.iter().enumerate() {
            if col > 0 {
                writer.write_all(b" ")?;
            }
            write!(writer, "{:.3}", value)?;
        }
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Formats `matrix` in the text format.
pub fn format_matrix(matrix: &Matrix) -> String {
    let mut out = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_matrix_to(&mut out, matrix);
    String::from_utf8_lossy(&out).into_owned()
}

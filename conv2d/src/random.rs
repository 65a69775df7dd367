//! Random matrix generation.

use rand::Rng;

use crate::error::Result;
use crate::matrix::Matrix;

/// Matrix of values drawn uniformly from `[0, 1)` using `rng`.
///
/// Pass a seeded generator (e.g. `ChaCha8Rng::seed_from_u64`) for reproducible output.
pub fn random_matrix<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Result<Matrix> {
    let mut matrix = Matrix::zeros(rows, cols)?;
    for value in matrix.values_mut() {
        *value = rng.random::<f32>();
    }
    Ok(matrix)
}

//! Ordinary least squares for cross-sectional regressions.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::MathError;

/// Relative column norm below which a regressor counts as linearly dependent.
const RANK_TOLERANCE: f64 = 1e-10;

/// Result of an ordinary least squares fit.
#[derive(Debug, Clone)]
pub struct LstsqResult {
    /// Estimated coefficients, one per design column. Dependent columns get 0.
    pub coefficients: Array1<f64>,
    /// Residuals `y - X b`.
    pub residuals: Array1<f64>,
    /// Numerical rank of the design matrix.
    pub rank: usize,
}

/// Prepend a column of ones to a design matrix.
#[must_use]
pub fn add_intercept(x: ArrayView2<'_, f64>) -> Array2<f64> {
    Array2::from_shape_fn((x.nrows(), x.ncols() + 1), |(i, j)| if j == 0 { 1.0 } else { x[[i, j - 1]] })
}

/// Solve `min ||y - X b||` by modified Gram-Schmidt QR.
///
/// Columns that are numerically dependent on earlier ones are dropped from
/// the basis and receive a zero coefficient, so the residuals are always the
/// projection of `y` off the column space of `X`.
///
/// # Errors
///
/// Returns an error if the dimensions disagree, the system is empty, or an
/// input is not finite.
pub fn least_squares(
    y: ArrayView1<'_, f64>,
    x: ArrayView2<'_, f64>,
) -> Result<LstsqResult, MathError> {
    let (n, p) = x.dim();
    if y.len() != n {
        return Err(MathError::DimensionMismatch { expected: n, actual: y.len() });
    }
    if n == 0 || p == 0 {
        return Err(MathError::EmptyData);
    }
    if !y.iter().chain(x.iter()).all(|v| v.is_finite()) {
        return Err(MathError::NumericalInstability("non-finite value in regression".to_string()));
    }

    let scale = x.columns().into_iter().map(|c| c.dot(&c).sqrt()).fold(0.0, f64::max);
    let mut q: Vec<Array1<f64>> = Vec::with_capacity(p);
    let mut basis: Vec<usize> = Vec::with_capacity(p);
    let mut r = Array2::<f64>::zeros((p, p));

    for j in 0..p {
        let mut v = x.column(j).to_owned();
        // second pass restores orthogonality lost to rounding
        for _ in 0..2 {
            for (k, qk) in q.iter().enumerate() {
                let proj = qk.dot(&v);
                r[[k, j]] += proj;
                v.scaled_add(-proj, qk);
            }
        }
        let norm = v.dot(&v).sqrt();
        if norm > RANK_TOLERANCE * scale.max(1.0) {
            let k = q.len();
            r[[k, j]] = norm;
            q.push(v / norm);
            basis.push(j);
        }
    }

    let rank = q.len();
    if rank == 0 {
        return Err(MathError::LinearAlgebra("design matrix has rank 0".to_string()));
    }

    // back-substitute R_b b_b = Q^T y over the independent columns
    let qty: Vec<f64> = q.iter().map(|qk| qk.dot(&y)).collect();
    let mut solved = vec![0.0; rank];
    for k in (0..rank).rev() {
        let mut acc = qty[k];
        for m in (k + 1)..rank {
            acc -= r[[k, basis[m]]] * solved[m];
        }
        solved[k] = acc / r[[k, basis[k]]];
    }
    let mut coefficients = Array1::zeros(p);
    for (k, &j) in basis.iter().enumerate() {
        coefficients[j] = solved[k];
    }

    let residuals = &y - &x.dot(&coefficients);
    Ok(LstsqResult { coefficients, residuals, rank })
}

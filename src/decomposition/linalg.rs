//! Symmetric eigensolvers on top of `nalgebra`.
//!
//! Inputs and outputs are `ndarray` matrices; the conversion happens here so
//! the models never touch `nalgebra` types.
//!
//! The generalized problem A·v = λ·B·v (A symmetric, B symmetric positive
//! definite) is reduced to a standard one with the Cholesky factor B = L·Lᵀ:
//!
//!   M = L⁻¹·A·L⁻ᵀ,   M·w = λ·w,   v = L⁻ᵀ·w
//!
//! which yields B-orthonormal eigenvectors (vᵀ·B·v = 1).

use nalgebra::{Cholesky, DMatrix, SymmetricEigen};
use ndarray::{Array1, Array2};

use crate::error::{Error, Result};

/// Eigenvalues in decreasing order with matching eigenvector columns
#[derive(Debug, Clone)]
pub struct EigenPairs {
    /// Eigenvalues, descending
    pub values: Array1<f64>,
    /// Eigenvectors as columns [n_features, n_values]
    pub vectors: Array2<f64>,
}

fn to_nalgebra(m: &Array2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(m.nrows(), m.ncols(), |i, j| m[[i, j]])
}

fn symmetrize(m: &DMatrix<f64>) -> DMatrix<f64> {
    (m + m.transpose()) * 0.5
}

/// True when `m` equals its transpose within a relative tolerance
pub fn is_symmetric(m: &Array2<f64>) -> bool {
    if m.nrows() != m.ncols() {
        return false;
    }
    let scale = m.iter().fold(0.0_f64, |acc, v| acc.max(v.abs())).max(1.0);
    let n = m.nrows();
    for i in 0..n {
        for j in i + 1..n {
            if (m[[i, j]] - m[[j, i]]).abs() > 1e-8 * scale {
                return false;
            }
        }
    }
    true
}

/// Sort eigenpairs by decreasing eigenvalue and fix each vector's sign so
/// its largest-magnitude entry is positive
fn sorted_pairs(values: &[f64], vectors: &DMatrix<f64>) -> EigenPairs {
    let n = vectors.nrows();
    let k = values.len();

    let mut order: Vec<usize> = (0..k).collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

    let mut out_values = Array1::zeros(k);
    let mut out_vectors = Array2::zeros((n, k));

    for (col, &idx) in order.iter().enumerate() {
        out_values[col] = values[idx];

        let mut pivot = 0.0_f64;
        for row in 0..n {
            let v = vectors[(row, idx)];
            if v.abs() > pivot.abs() {
                pivot = v;
            }
        }
        let sign = if pivot < 0.0 { -1.0 } else { 1.0 };

        for row in 0..n {
            out_vectors[[row, col]] = sign * vectors[(row, idx)];
        }
    }

    EigenPairs {
        values: out_values,
        vectors: out_vectors,
    }
}

/// Eigendecomposition of a symmetric matrix
pub fn symmetric_eigen(a: &Array2<f64>) -> Result<EigenPairs> {
    if !is_symmetric(a) {
        return Err(Error::Linalg("matrix is not symmetric".into()));
    }

    let eigen = SymmetricEigen::new(symmetrize(&to_nalgebra(a)));
    if eigen.eigenvalues.iter().any(|v| !v.is_finite()) {
        return Err(Error::Linalg("non-finite eigenvalue".into()));
    }

    Ok(sorted_pairs(eigen.eigenvalues.as_slice(), &eigen.eigenvectors))
}

/// Generalized eigendecomposition A·v = λ·B·v
pub fn generalized_symmetric_eigen(a: &Array2<f64>, b: &Array2<f64>) -> Result<EigenPairs> {
    if !is_symmetric(a) {
        return Err(Error::Linalg("offset correlation matrix is not symmetric".into()));
    }
    if !is_symmetric(b) {
        return Err(Error::Linalg("covariance matrix is not symmetric".into()));
    }

    let a = symmetrize(&to_nalgebra(a));
    let b = symmetrize(&to_nalgebra(b));

    let chol = Cholesky::new(b)
        .ok_or_else(|| Error::Linalg("covariance matrix is not positive definite".into()))?;
    let l = chol.l();

    // L⁻¹·A, then L⁻¹·(L⁻¹·A)ᵀ = L⁻¹·A·L⁻ᵀ since A is symmetric
    let la = l
        .solve_lower_triangular(&a)
        .ok_or_else(|| Error::Linalg("singular Cholesky factor".into()))?;
    let m = l
        .solve_lower_triangular(&la.transpose())
        .ok_or_else(|| Error::Linalg("singular Cholesky factor".into()))?;

    let eigen = SymmetricEigen::new(symmetrize(&m));
    let vectors = l
        .transpose()
        .solve_upper_triangular(&eigen.eigenvectors)
        .ok_or_else(|| Error::Linalg("singular Cholesky factor".into()))?;

    if eigen.eigenvalues.iter().any(|v| !v.is_finite()) {
        return Err(Error::Linalg("non-finite eigenvalue".into()));
    }

    Ok(sorted_pairs(eigen.eigenvalues.as_slice(), &vectors))
}

/// Inverse of a small symmetric positive definite matrix
pub fn spd_inverse(m: &Array2<f64>) -> Option<Array2<f64>> {
    let chol = Cholesky::new(symmetrize(&to_nalgebra(m)))?;
    let inv = chol.inverse();
    Some(Array2::from_shape_fn((inv.nrows(), inv.ncols()), |(i, j)| inv[(i, j)]))
}

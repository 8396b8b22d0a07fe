// =============================================================================
// ndarray ↔ nalgebra Conversion Utilities
// =============================================================================
//
// Data lives in ndarray (column slicing, removal, serialization of results);
// decompositions come from nalgebra. Every crossing between the two goes
// through this module.
//
// =============================================================================

use ndarray::{Array1, Array2, ArrayView2};
use nalgebra::{DMatrix, DVector};

// =============================================================================
// ndarray → nalgebra
// =============================================================================

/// Convert an ndarray matrix view to a nalgebra DMatrix.
///
/// Works for any memory layout; elements are read in logical order.
#[inline]
pub fn to_dmatrix(a: ArrayView2<'_, f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

/// Convert an ndarray vector to a nalgebra DVector.
#[inline]
pub fn to_dvector(v: &Array1<f64>) -> DVector<f64> {
    DVector::from_iterator(v.len(), v.iter().copied())
}

// =============================================================================
// nalgebra → ndarray
// =============================================================================

/// Convert a nalgebra DMatrix to an ndarray Array2.
#[inline]
pub fn to_array2(m: &DMatrix<f64>) -> Array2<f64> {
    let (nrows, ncols) = m.shape();
    Array2::from_shape_fn((nrows, ncols), |(i, j)| m[(i, j)])
}

/// Convert a nalgebra DVector to an ndarray Array1.
#[inline]
pub fn to_array1(v: &DVector<f64>) -> Array1<f64> {
    Array1::from_vec(v.as_slice().to_vec())
}

// =============================================================================
// Linear algebra helpers
// =============================================================================

/// Singular values of `a`, largest first.
pub fn singular_values(a: &DMatrix<f64>) -> Vec<f64> {
    let mut s: Vec<f64> = a.singular_values().iter().copied().collect();
    s.sort_by(|x, y| y.total_cmp(x));
    s
}

/// Numerical rank from singular values.
///
/// Uses the same cutoff as LAPACK-based `matrix_rank` routines:
/// `s_max * max(nrows, ncols) * ε`.
pub fn numerical_rank(singular: &[f64], nrows: usize, ncols: usize) -> usize {
    let s_max = singular.first().copied().unwrap_or(0.0);
    let tol = s_max * nrows.max(ncols) as f64 * f64::EPSILON;
    singular.iter().filter(|&&s| s > tol).count()
}

/// Least-squares solution of `Ax ≈ b` together with `(A'A)⁻¹`, both taken
/// from the thin SVD `A = UΣVᵀ`:
///
/// ```text
/// x       = V Σ⁻¹ Uᵀ b
/// (A'A)⁻¹ = V Σ⁻² Vᵀ
/// ```
///
/// `A'A` is never formed, so the solve sees cond(A) instead of cond(A)².
/// Returns `None` if a singular value is zero or not finite.
pub fn svd_solve_and_invert(a: &DMatrix<f64>, b: &DVector<f64>) -> Option<(Array1<f64>, Array2<f64>)> {
    let svd = a.clone().svd(true, true);
    let u = svd.u.as_ref()?;
    let v_t = svd.v_t.as_ref()?;
    let s = &svd.singular_values;
    if s.iter().any(|&sv| sv <= 0.0 || !sv.is_finite()) {
        return None;
    }

    let k = s.len();
    let utb = u.transpose() * b;
    let scaled_utb = DVector::from_fn(k, |l, _| utb[l] / s[l]);
    let solution = v_t.transpose() * scaled_utb;

    let scaled_v_t = DMatrix::from_fn(k, v_t.ncols(), |l, j| v_t[(l, j)] / (s[l] * s[l]));
    let inverse = v_t.transpose() * scaled_v_t;

    Some((to_array1(&solution), to_array2(&inverse)))
}

// =============================================================================
// Tests
// =============================================================================

//! Mathematical utilities for FEM calculations

use nalgebra::{DMatrix, DVector, Matrix2, Matrix3, Vector3};

use crate::error::{FEMError, FEMResult};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;
pub type Mat2 = Matrix2<f64>;
pub type Mat3 = Matrix3<f64>;
pub type Vec3 = Vector3<f64>;

/// Default relative pivot threshold below which a system counts as singular
pub const DEFAULT_SINGULAR_TOLERANCE: f64 = 1e-12;

/// Solve a linear system using LU decomposition with partial pivoting
///
/// The system is first scaled symmetrically to a unit diagonal, so the pivot
/// test does not depend on the unit system and unit rows left by direct
/// elimination sit next to stiffness rows of any magnitude. Fails with
/// [`FEMError::SingularSystem`] when a diagonal entry is zero, when the
/// smallest pivot of the scaled U is below `tolerance` times the largest one,
/// or when the solution is not finite.
pub fn solve_linear_system(a: &Mat, b: &Vec, tolerance: f64) -> FEMResult<Vec> {
    if a.nrows() != a.ncols() {
        return Err(FEMError::DimensionMismatch {
            context: "linear system (square matrix)".to_string(),
            expected: a.nrows(),
            found: a.ncols(),
        });
    }
    if a.nrows() != b.len() {
        return Err(FEMError::DimensionMismatch {
            context: "linear system right-hand side".to_string(),
            expected: a.nrows(),
            found: b.len(),
        });
    }

    // A DOF without stiffness cannot be scaled
    let scale = diagonal_scaling(a).ok_or(FEMError::SingularSystem)?;
    let scaled = Mat::from_fn(a.nrows(), a.ncols(), |i, j| a[(i, j)] * scale[i] * scale[j]);

    let lu = scaled.lu();

    let u = lu.u();
    let pivots = u.diagonal();
    let largest = pivots.amax();
    let smallest = pivots.iter().fold(f64::INFINITY, |m, p| m.min(p.abs()));
    if largest == 0.0 || smallest <= tolerance * largest {
        return Err(FEMError::SingularSystem);
    }

    let y = lu.solve(&b.component_mul(&scale)).ok_or(FEMError::SingularSystem)?;
    let x = y.component_mul(&scale);
    if x.iter().any(|v| !v.is_finite()) {
        return Err(FEMError::SingularSystem);
    }
    Ok(x)
}

/// `1 / sqrt(|a_ii|)` per row, `None` if a diagonal entry is zero or not finite
fn diagonal_scaling(a: &Mat) -> Option<Vec> {
    let mut scale = Vec::zeros(a.nrows());
    for i in 0..a.nrows() {
        let d = a[(i, i)].abs();
        if d == 0.0 || !d.is_finite() {
            return None;
        }
        scale[i] = 1.0 / d.sqrt();
    }
    Some(scale)
}

/// Check a square matrix for symmetry within a relative tolerance
pub fn is_symmetric(a: &Mat, tolerance: f64) -> bool {
    if a.nrows() != a.ncols() {
        return false;
    }
    let scale = a.amax().max(f64::MIN_POSITIVE);
    for i in 0..a.nrows() {
        for j in (i + 1)..a.ncols() {
            if (a[(i, j)] - a[(j, i)]).abs() > tolerance * scale {
                return false;
            }
        }
    }
    true
}

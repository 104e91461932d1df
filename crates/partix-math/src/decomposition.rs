//! Matrix decompositions for shape matching.
//!
//! Shape matching needs the rotational part R of a 3×3 covariance
//! matrix A (A = R·S, S symmetric). We obtain it as
//! `R = A · (√(AᵀA))⁻¹`, with the square root computed by a fixed-length
//! Denman–Beavers iteration.

use glam::Mat3;
use partix_types::constants::EPSILON;

/// Inverse of a 3×3 matrix via the adjugate.
///
/// An exactly singular matrix does not fail: its determinant is treated
/// as 1, so the result is the plain adjugate. A real-time step must not
/// abort on a transient degeneracy.
pub fn inverse_or_unit_det(m: Mat3) -> Mat3 {
    let mut det = m.determinant();
    if det == 0.0 {
        det = 1.0;
    }
    let inv_det = 1.0 / det;

    let tmp0 = m.y_axis.cross(m.z_axis);
    let tmp1 = m.z_axis.cross(m.x_axis);
    let tmp2 = m.x_axis.cross(m.y_axis);
    Mat3::from_cols(tmp0, tmp1, tmp2).transpose() * inv_det
}

/// Square root of a matrix by Denman–Beavers iteration.
///
/// Starting from `Y₀ = M`, `Z₀ = I`:
///
/// ```text
/// Yₖ₊₁ = (Yₖ + Zₖ⁻¹) / 2
/// Zₖ₊₁ = (Zₖ + Yₖ⁻¹) / 2
/// ```
///
/// `Y` converges to √M and `Z` to √M⁻¹. The loop always runs exactly
/// `iterations` times with no convergence test, so ill-conditioned inputs
/// yield a truncated approximation. Simulation output depends on that
/// truncation; keep the count fixed (see
/// [`SQRT_ITERATIONS`](partix_types::constants::SQRT_ITERATIONS)).
pub fn sqrt_denman_beavers(m: Mat3, iterations: u32) -> Mat3 {
    let mut y = m;
    let mut z = Mat3::IDENTITY;

    for _ in 0..iterations {
        let y_inv = inverse_or_unit_det(y);
        let z_inv = inverse_or_unit_det(z);
        y = (y + z_inv) * 0.5;
        z = (z + y_inv) * 0.5;
    }

    y
}

/// Squared Frobenius norm.
#[inline]
pub fn frobenius_norm_sq(m: &Mat3) -> f32 {
    m.x_axis.length_squared() + m.y_axis.length_squared() + m.z_axis.length_squared()
}

/// Outer product `a · bᵀ`.
#[inline]
pub fn outer(a: glam::Vec3, b: glam::Vec3) -> Mat3 {
    Mat3::from_cols(a * b.x, a * b.y, a * b.z)
}

/// Rotational part of `a`: `R = A · (√(AᵀA))⁻¹`.
///
/// `a` is normalised by its Frobenius norm first. The rotation is
/// scale-invariant, and unit-scale input keeps the fixed-length square
/// root inside its fast-converging range.
///
/// Falls back to the identity for a (near-)zero or non-finite input, and
/// for a result that is not a proper rotation: a flattened `a` yields a
/// singular R and an inverted `a` a reflection.
pub fn optimal_rotation(a: Mat3, iterations: u32) -> Mat3 {
    let norm = frobenius_norm_sq(&a).sqrt();
    if !norm.is_finite() || norm < EPSILON {
        return Mat3::IDENTITY;
    }

    let a = a * (1.0 / norm);
    let s = sqrt_denman_beavers(a.transpose() * a, iterations);
    let r = a * inverse_or_unit_det(s);

    if r.is_finite() && r.determinant() > EPSILON {
        r
    } else {
        Mat3::IDENTITY
    }
}

/// Scales `m` to unit determinant so a linear fit preserves volume.
///
/// Matrices with a determinant at or below `EPSILON` are returned as-is.
pub fn volume_preserving(m: Mat3) -> Mat3 {
    let det = m.determinant();
    if det > EPSILON {
        m * (1.0 / det.cbrt())
    } else {
        m
    }
}

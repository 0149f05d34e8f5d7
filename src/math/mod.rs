//! Mathematical utilities for the pile finite element model

use nalgebra::{DMatrix, DVector, Matrix6, Vector6};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;

/// 6x6 matrix for beam element stiffness
pub type Mat6 = Matrix6<f64>;
/// 6-element vector for beam end forces/displacements
pub type Vec6 = Vector6<f64>;

/// Smallest pivot of the diagonally scaled matrix accepted by [`solve_linear_system`]
pub const PIVOT_LIMIT: f64 = 1e-12;

/// Compute the stiffness matrix of a 2-node beam element on the pile axis
///
/// Local DOFs are `[u1, v1, θ1, u2, v2, θ2]` with node 1 on top, `u` axial,
/// `v` transverse and `θ` the rotation.
///
/// # Arguments
/// * `e` - Modulus of elasticity
/// * `a` - Cross-sectional area
/// * `i` - Second moment of area
/// * `length` - Element length
/// * `phi` - Shear deformation parameter 12EI/(κGAL²), 0 for Euler-Bernoulli
pub fn beam_local_stiffness(e: f64, a: f64, i: f64, length: f64, phi: f64) -> Mat6 {
    let l = length;
    let l2 = l * l;

    let ea_l = e * a / l;
    let c = e * i / ((1.0 + phi) * l2 * l);

    let k_vv = 12.0 * c;
    let k_vt = 6.0 * c * l;
    let k_tt = (4.0 + phi) * c * l2;
    let k_tt2 = (2.0 - phi) * c * l2;

    #[rustfmt::skip]
    let data = [
        ea_l,   0.0,   0.0,    -ea_l,  0.0,   0.0,
        0.0,    k_vv,  k_vt,   0.0,    -k_vv, k_vt,
        0.0,    k_vt,  k_tt,   0.0,    -k_vt, k_tt2,
        -ea_l,  0.0,   0.0,    ea_l,   0.0,   0.0,
        0.0,    -k_vv, -k_vt,  0.0,    k_vv,  -k_vt,
        0.0,    k_vt,  k_tt2,  0.0,    -k_vt, k_tt,
    ];

    Mat6::from_row_slice(&data)
}

/// Solve a linear system using LU decomposition
///
/// The matrix is first scaled to a unit diagonal, `S A S` with
/// `S = diag(1/sqrt(|a_ii|))`, so the pivots measure how well each DOF is held
/// independently of element sizes. Returns `None` for a zero diagonal term, a
/// scaled pivot under [`PIVOT_LIMIT`] or a non-finite solution.
pub fn solve_linear_system(a: &Mat, b: &Vec) -> Option<Vec> {
    let n = a.nrows();
    let mut scale = Vec::zeros(n);
    for i in 0..n {
        let d = a[(i, i)].abs();
        if !(d > 0.0 && d.is_finite()) {
            return None;
        }
        scale[i] = 1.0 / d.sqrt();
    }

    let scaled = Mat::from_fn(n, n, |i, j| a[(i, j)] * scale[i] * scale[j]);
    let lu = scaled.lu();

    let min_pivot = lu
        .u()
        .diagonal()
        .iter()
        .fold(f64::INFINITY, |acc, p| acc.min(p.abs()));
    if !(min_pivot >= PIVOT_LIMIT) {
        return None;
    }

    let x = lu.solve(&b.component_mul(&scale))?.component_mul(&scale);
    x.iter().all(|v| v.is_finite()).then_some(x)
}

/// Piecewise linear interpolation of `(xp, fp)` at `x`, flat outside the table
///
/// `xp` must be non-decreasing. Repeated abscissae take the later ordinate.
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let n = xp.len().min(fp.len());
    if n == 0 {
        return 0.0;
    }
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[n - 1] {
        return fp[n - 1];
    }
    // first index with xp[j] > x, so xp[j-1] <= x < xp[j]
    let j = xp[..n].partition_point(|&v| v <= x);
    let (x0, x1) = (xp[j - 1], xp[j]);
    let (f0, f1) = (fp[j - 1], fp[j]);
    if x1 - x0 <= 0.0 {
        return f1;
    }
    f0 + (f1 - f0) * (x - x0) / (x1 - x0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_local_stiffness_symmetry() {
        let k = beam_local_stiffness(210e6, 0.5, 0.25, 2.0, 0.3);
        for i in 0..6 {
            for j in 0..6 {
                assert_relative_eq!(k[(i, j)], k[(j, i)], epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_euler_bernoulli_terms() {
        let (e, a, i, l) = (200e6, 0.1, 0.01, 4.0);
        let k = beam_local_stiffness(e, a, i, l, 0.0);
        assert_relative_eq!(k[(0, 0)], e * a / l);
        assert_relative_eq!(k[(1, 1)], 12.0 * e * i / l.powi(3));
        assert_relative_eq!(k[(1, 2)], 6.0 * e * i / l.powi(2));
        assert_relative_eq!(k[(2, 2)], 4.0 * e * i / l);
        assert_relative_eq!(k[(2, 5)], 2.0 * e * i / l);
    }

    #[test]
    fn test_rigid_rotation_is_force_free() {
        // v = theta * s for a rotation about the top node, s downwards
        let l = 3.0;
        let k = beam_local_stiffness(210e6, 0.5, 0.25, l, 0.4);
        let theta = 1e-3;
        let d = Vec6::new(0.0, 0.0, theta, 0.0, theta * l, theta);
        let q = k * d;
        for i in 0..6 {
            assert_relative_eq!(q[i], 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_singular_system_rejected() {
        let a = Mat::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        let b = Vec::from_vec(vec![1.0, 2.0]);
        assert!(solve_linear_system(&a, &b).is_none());

        let a = Mat::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 4.0]);
        let x = solve_linear_system(&a, &b).unwrap();
        assert_relative_eq!(x[0], 0.5);
        assert_relative_eq!(x[1], 0.5);
    }

    #[test]
    fn test_widely_scaled_stiffness_is_solved() {
        // a very stiff DOF next to a soft spring pair, as with a short element
        #[rustfmt::skip]
        let a = Mat::from_row_slice(3, 3, &[
            1e14, 0.0,  0.0,
            0.0,  2.0,  -1.0,
            0.0,  -1.0, 2.0,
        ]);
        let b = Vec::from_vec(vec![1e14, 1.0, 1.0]);
        let x = solve_linear_system(&a, &b).unwrap();
        for i in 0..3 {
            assert_relative_eq!(x[i], 1.0, max_relative = 1e-12);
        }

        // no stiffness at all on a DOF
        let a = Mat::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 0.0]);
        assert!(solve_linear_system(&a, &b.rows(0, 2).into_owned()).is_none());
    }

    #[test]
    fn test_interp_is_flat_outside_table() {
        let xp = [0.0, 1.0, 2.0];
        let fp = [0.0, 10.0, 15.0];
        assert_relative_eq!(interp(-1.0, &xp, &fp), 0.0);
        assert_relative_eq!(interp(0.5, &xp, &fp), 5.0);
        assert_relative_eq!(interp(1.5, &xp, &fp), 12.5);
        assert_relative_eq!(interp(5.0, &xp, &fp), 15.0);
    }
}

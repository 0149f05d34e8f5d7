//! Linear and nonlinear (Winkler) equation solvers

use log::{debug, info, log, warn};

use crate::analysis::AnalysisOptions;
use crate::assembly::build_stiffness_matrix;
use crate::elements::ElementType;
use crate::error::{PileError, PileResult};
use crate::loads::SystemVectors;
use crate::math::{self, Mat, Vec as FEVec};
use crate::mesh::Mesh;
use crate::springs::{SpringTables, StiffnessKind};

/// Displacements and reactions of a solved system
#[derive(Debug, Clone)]
pub struct Solution {
    /// Displacement at every DOF
    pub displacements: FEVec,
    /// Reaction at restrained DOFs, zero at free DOFs
    pub reactions: FEVec,
}

/// Outcome of the Winkler iterations
#[derive(Debug, Clone)]
pub struct WinklerSolution {
    /// Final displacements
    pub displacements: FEVec,
    /// Reactions in equilibrium with the final secant state
    pub reactions: FEVec,
    /// Whether the residual criterion was met
    pub converged: bool,
    /// Number of linear solves performed
    pub iterations: usize,
    /// Residual norm over the free DOFs after every iteration
    pub residuals: Vec<f64>,
}

/// Solve K d = F with prescribed displacements U at the restrained DOFs
///
/// The reduced system `K_ff d_f = F_f - K_fr U_r` is solved for the free DOFs
/// and the reactions are `Q_r = K_rf d_f + K_rr U_r - F_r`.
pub fn solve_equations(
    k: &Mat,
    forces: &FEVec,
    prescribed: &FEVec,
    restrained: &[bool],
) -> PileResult<Solution> {
    let n_dofs = forces.len();
    let free_dofs: Vec<usize> = (0..n_dofs).filter(|&i| !restrained[i]).collect();

    let mut d_full = FEVec::zeros(n_dofs);
    for i in (0..n_dofs).filter(|&i| restrained[i]) {
        d_full[i] = prescribed[i];
    }

    if !free_dofs.is_empty() {
        // Partition stiffness matrix and load vector
        let n_free = free_dofs.len();
        let mut k11 = Mat::zeros(n_free, n_free);
        let mut p1 = FEVec::zeros(n_free);

        for (i, &di) in free_dofs.iter().enumerate() {
            p1[i] = forces[di];
            for (j, &dj) in free_dofs.iter().enumerate() {
                k11[(i, j)] = k[(di, dj)];
            }
            // Account for enforced displacements
            for dj in (0..n_dofs).filter(|&j| restrained[j]) {
                p1[i] -= k[(di, dj)] * prescribed[dj];
            }
        }

        // Solve K11 * D1 = P1
        let d1 = math::solve_linear_system(&k11, &p1).ok_or(PileError::SingularMatrix)?;

        for (i, &di) in free_dofs.iter().enumerate() {
            d_full[di] = d1[i];
        }
    }

    let reactions = restrained_reactions(k, &d_full, forces, restrained);

    Ok(Solution {
        displacements: d_full,
        reactions,
    })
}

/// (K d - F) at restrained DOFs, zero elsewhere
fn restrained_reactions(k: &Mat, d: &FEVec, forces: &FEVec, restrained: &[bool]) -> FEVec {
    let mut q = k * d - forces;
    for (i, &r) in restrained.iter().enumerate() {
        if !r {
            q[i] = 0.0;
        }
    }
    q
}

/// Incremental-iterative solution of a pile on nonlinear Winkler springs
///
/// Starts from the initial spring stiffness, checks equilibrium against the
/// secant stiffness and advances with the tangent stiffness. Prescribed
/// displacements are applied in the first increment only. Convergence is
/// accepted from the second iteration onwards.
pub fn winkler_loop(
    mesh: &Mesh,
    springs: &SpringTables,
    element_type: ElementType,
    vectors: &SystemVectors,
    options: &AnalysisOptions,
) -> PileResult<WinklerSolution> {
    let level = options.progress_level();
    let n_dofs = mesh.dof_count();
    let forces = &vectors.forces;
    let restrained = &vectors.restrained;
    let free_dofs = vectors.free_dofs();

    let mut d = FEVec::zeros(n_dofs);
    let mut k = build_stiffness_matrix(mesh, Some(springs), element_type, &d, StiffnessKind::Initial);
    let mut rg = forces.clone();
    let mut prescribed = vectors.displacements.clone();

    let mut control = 0.0;
    let mut residuals = Vec::new();
    let mut converged = false;
    let mut iterations = 0;
    let mut k_secant = k.clone();

    for iteration in 0..options.max_iterations {
        iterations = iteration + 1;

        let step = match solve_equations(&k, &rg, &prescribed, restrained) {
            Ok(step) => step,
            Err(PileError::SingularMatrix) => {
                warn!(
                    "Failure of the pile-soil system at iteration {}: boundary conditions may not be realistic or values may be too large",
                    iteration
                );
                return Err(PileError::SystemFailure { iteration });
            }
            Err(e) => return Err(e),
        };

        let external = forces - &step.reactions;
        if iteration == 0 {
            control = external.norm();
        }

        d += &step.displacements;

        k_secant = build_stiffness_matrix(mesh, Some(springs), element_type, &d, StiffnessKind::Secant);
        let internal = -(&k_secant * &d);
        rg = external + internal;

        let residual = free_dofs.iter().map(|&i| rg[i] * rg[i]).sum::<f64>().sqrt();
        residuals.push(residual);
        log!(
            level,
            "Iteration {}: residual {:.3e} (target {:.3e})",
            iteration,
            residual,
            options.tolerance * control
        );

        if residual <= options.tolerance * control && iteration > 0 {
            converged = true;
            break;
        }

        k = build_stiffness_matrix(mesh, Some(springs), element_type, &d, StiffnessKind::Tangent);
        prescribed.fill(0.0);
    }

    if converged {
        info!("Converged at iteration no. {}", iterations - 1);
    } else {
        warn!("Not converged after {} iterations", iterations);
    }

    let reactions = restrained_reactions(&k_secant, &d, forces, restrained);
    debug!("Winkler analysis finished with {} restrained DOFs", vectors.restrained_dofs().len());

    Ok(WinklerSolution {
        displacements: d,
        reactions,
        converged,
        iterations,
        residuals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_spring_with_enforced_displacement() {
        // two springs in series, 0 -- k1 -- 1 -- k2 -- 2, node 0 fixed, node 2 pushed
        let k = Mat::from_row_slice(3, 3, &[
            100.0, -100.0, 0.0,
            -100.0, 300.0, -200.0,
            0.0, -200.0, 200.0,
        ]);
        let f = FEVec::zeros(3);
        let u = FEVec::from_vec(vec![0.0, 0.0, 0.3]);
        let restrained = [true, false, true];

        let sol = solve_equations(&k, &f, &u, &restrained).unwrap();
        assert_relative_eq!(sol.displacements[1], 0.2, epsilon = 1e-12);
        assert_relative_eq!(sol.reactions[0], -20.0, epsilon = 1e-9);
        assert_relative_eq!(sol.reactions[2], 20.0, epsilon = 1e-9);
        assert_eq!(sol.reactions[1], 0.0);
    }

    #[test]
    fn test_floating_system_is_singular() {
        let k = Mat::from_row_slice(2, 2, &[1.0, -1.0, -1.0, 1.0]);
        let f = FEVec::from_vec(vec![1.0, 0.0]);
        let u = FEVec::zeros(2);
        let err = solve_equations(&k, &f, &u, &[false, false]).unwrap_err();
        assert!(matches!(err, PileError::SingularMatrix));
    }

    #[test]
    fn test_fully_restrained_system() {
        let k = Mat::from_row_slice(2, 2, &[2.0, -1.0, -1.0, 2.0]);
        let f = FEVec::zeros(2);
        let u = FEVec::from_vec(vec![1.0, 0.0]);
        let sol = solve_equations(&k, &f, &u, &[true, true]).unwrap();
        assert_eq!(sol.displacements, u);
        assert_relative_eq!(sol.reactions[0], 2.0);
        assert_relative_eq!(sol.reactions[1], -1.0);
    }
}

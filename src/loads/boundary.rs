//! Boundary conditions keyed by elevation and their global vectors

use std::fmt;

use serde::{Deserialize, Serialize};

use super::point_load::{PointDisplacement, PointLoad};
use crate::elements::{Support, DOFS_PER_NODE};
use crate::error::{PileError, PileResult};
use crate::math::Vec as FEVec;
use crate::mesh::{locate_node, Mesh};

/// Loads, prescribed displacements and supports of one analysis
///
/// Every setter targets the node at the given elevation (within 1 mm) and
/// overwrites what was declared there before. A rejected call leaves the
/// conditions already declared untouched.
///
/// ```rust
/// use pile_solver::prelude::*;
///
/// let pile = Pile::create("P", 0.0, vec![PileSection::new(10.0, 2.0, 0.05)]).unwrap();
/// let model = PileModel::create("M", pile, None, ModelConfig::default()).unwrap();
///
/// let mut bc = model.boundary_conditions();
/// bc.set_support(-10.0, Support::fixed()).unwrap()
///     .set_pointload(0.0, PointLoad::py(100.0)).unwrap();
///
/// assert!(matches!(bc.set_pointload(-2.25, PointLoad::py(1.0)), Err(PileError::NotMeshed(_))));
/// assert_eq!(bc.point_loads().len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryConditions {
    elevations: Vec<f64>,
    forces: Vec<[f64; 3]>,
    displacements: Vec<[f64; 3]>,
    restrained: Vec<[bool; 3]>,
}

/// Global force, prescribed displacement and restraint vectors
#[derive(Debug, Clone)]
pub struct SystemVectors {
    /// External forces F
    pub forces: FEVec,
    /// Prescribed displacements U
    pub displacements: FEVec,
    /// Restraint mask, one flag per DOF
    pub restrained: Vec<bool>,
}

impl SystemVectors {
    /// DOFs solved for
    pub fn free_dofs(&self) -> Vec<usize> {
        (0..self.restrained.len()).filter(|&i| !self.restrained[i]).collect()
    }

    /// DOFs with a known displacement
    pub fn restrained_dofs(&self) -> Vec<usize> {
        (0..self.restrained.len()).filter(|&i| self.restrained[i]).collect()
    }
}

/// A nonzero point load as declared at a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodalLoad {
    pub node: usize,
    pub elevation: f64,
    pub px: f64,
    pub py: f64,
    pub mz: f64,
}

impl fmt::Display for NodalLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Load applied at elevation {} m (node no. {}): Px = {} kN, Py = {} kN, Mz = {} kNm.",
            self.elevation, self.node, self.px, self.py, self.mz
        )
    }
}

impl BoundaryConditions {
    /// Empty boundary conditions for a mesh
    pub fn new(mesh: &Mesh) -> Self {
        let n = mesh.node_count();
        Self {
            elevations: mesh.elevations(),
            forces: vec![[0.0; 3]; n],
            displacements: vec![[0.0; 3]; n],
            restrained: vec![[false; 3]; n],
        }
    }

    /// Number of nodes the conditions were declared for
    pub fn node_count(&self) -> usize {
        self.elevations.len()
    }

    /// Node elevations the conditions were declared for
    pub fn elevations(&self) -> &[f64] {
        &self.elevations
    }

    /// Set the given load components at a node
    pub fn set_pointload(&mut self, elevation: f64, load: PointLoad) -> PileResult<&mut Self> {
        let node = locate_node(&self.elevations, elevation)?;
        check_finite(&load.components(), "point load", elevation)?;
        for (k, value) in load.components().into_iter().enumerate() {
            if let Some(v) = value {
                self.forces[node][k] = v;
            }
        }
        Ok(self)
    }

    /// Set the restraints of a node, replacing every previous flag
    pub fn set_support(&mut self, elevation: f64, support: Support) -> PileResult<&mut Self> {
        let node = locate_node(&self.elevations, elevation)?;
        self.restrained[node] = support.flags();
        Ok(self)
    }

    /// Prescribe the given displacement components at a node, restraining them
    pub fn set_pointdisplacement(
        &mut self,
        elevation: f64,
        displacement: PointDisplacement,
    ) -> PileResult<&mut Self> {
        let node = locate_node(&self.elevations, elevation)?;
        check_finite(&displacement.components(), "prescribed displacement", elevation)?;
        for (k, value) in displacement.components().into_iter().enumerate() {
            if let Some(v) = value {
                self.displacements[node][k] = v;
                self.restrained[node][k] = true;
            }
        }
        Ok(self)
    }

    /// Nonzero point loads, from the pile head down
    pub fn point_loads(&self) -> Vec<NodalLoad> {
        self.forces
            .iter()
            .enumerate()
            .filter(|(_, f)| f.iter().any(|&v| v != 0.0))
            .map(|(node, f)| NodalLoad {
                node,
                elevation: self.elevations[node],
                px: f[0],
                py: f[1],
                mz: f[2],
            })
            .collect()
    }

    /// Restraint flags of a node
    pub fn restraints(&self, node: usize) -> Option<[bool; 3]> {
        self.restrained.get(node).copied()
    }

    /// Whether at least one DOF is restrained
    pub fn has_restraints(&self) -> bool {
        self.restrained.iter().flatten().any(|&r| r)
    }

    /// Assemble the global vectors, DOF = 3 x node + component
    pub fn build(&self) -> SystemVectors {
        let n_dofs = DOFS_PER_NODE * self.node_count();
        let mut forces = FEVec::zeros(n_dofs);
        let mut displacements = FEVec::zeros(n_dofs);
        let mut restrained = vec![false; n_dofs];

        for node in 0..self.node_count() {
            for k in 0..DOFS_PER_NODE {
                let dof = DOFS_PER_NODE * node + k;
                forces[dof] = self.forces[node][k];
                displacements[dof] = self.displacements[node][k];
                restrained[dof] = self.restrained[node][k];
            }
        }

        SystemVectors {
            forces,
            displacements,
            restrained,
        }
    }
}

/// Reject NaN or infinite components before anything is written
fn check_finite(components: &[Option<f64>; 3], what: &str, elevation: f64) -> PileResult<()> {
    if components.iter().flatten().any(|v| !v.is_finite()) {
        return Err(PileError::InvalidInput(format!(
            "{} at {} m must be finite",
            what, elevation
        )));
    }
    Ok(())
}

//! Result types for pile analyses

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisType;
use crate::elements::{global_dof, Dof, ElementType};
use crate::error::{PileError, PileResult};
use crate::math::{Vec as FEVec, Vec6};
use crate::mesh::Mesh;
use crate::springs::SpringTables;

/// Reactions below this magnitude are reported as zero
pub const REACTION_THRESHOLD: f64 = 1e-3;

/// Displacement results at a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeDisplacement {
    /// Node elevation in m
    pub elevation: f64,
    /// Axial displacement in m
    pub settlement: f64,
    /// Transverse displacement in m
    pub deflection: f64,
    /// Rotation in rad
    pub rotation: f64,
}

/// Internal forces at one end of an element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionForces {
    /// Elevation of the element end in m
    pub elevation: f64,
    /// Normal force in kN
    pub n: f64,
    /// Shear force in kN
    pub v: f64,
    /// Bending moment in kNm
    pub m: f64,
}

impl SectionForces {
    /// Create from the element end forces at the top node
    pub fn from_top_end(elevation: f64, q: &Vec6) -> Self {
        Self {
            elevation,
            n: -q[0],
            v: -q[1],
            m: -q[2],
        }
    }

    /// Create from the element end forces at the bottom node
    pub fn from_bottom_end(elevation: f64, q: &Vec6) -> Self {
        Self {
            elevation,
            n: q[3],
            v: q[4],
            m: q[5],
        }
    }
}

/// Reaction forces at a supported node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    /// Node elevation in m
    pub elevation: f64,
    /// Normal reaction in kN
    pub nr: f64,
    /// Shear reaction in kN
    pub vr: f64,
    /// Moment reaction in kNm
    pub mr: f64,
}

/// Mobilised and available resistance of the distributed springs at an element end
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringMobilization {
    pub elevation: f64,
    /// Mobilised lateral resistance in kN/m
    pub p_mobilized: f64,
    /// Largest lateral resistance of the p-y curve in kN/m
    pub p_max: f64,
    /// Mobilised distributed moment in kNm/m
    pub m_mobilized: f64,
    /// Largest distributed moment of the m-t curve in kNm/m
    pub m_max: f64,
}

/// Mobilised and available resistance of a base spring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseMobilization {
    pub mobilized: f64,
    pub maximum: f64,
}

/// Summary of analysis results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Maximum absolute deflection
    pub max_deflection: f64,
    /// Elevation of the maximum deflection
    pub max_deflection_elevation: f64,
    /// Maximum absolute bending moment
    pub max_moment: f64,
    /// Elevation of the maximum bending moment
    pub max_moment_elevation: f64,
    /// Maximum absolute shear force
    pub max_shear: f64,
    /// Total number of nodes
    pub num_nodes: usize,
    /// Total number of elements
    pub num_elements: usize,
    /// Total DOFs
    pub total_dofs: usize,
    /// Free DOFs (unknown)
    pub free_dofs: usize,
}

/// Complete result of a beam or Winkler analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Model and pile (and soil) names
    pub name: String,
    pub analysis_type: AnalysisType,
    /// Whether the residual criterion was met; always true for a beam analysis
    pub converged: bool,
    /// Number of linear solves
    pub iterations: usize,
    /// Residual norm after each iteration
    pub residuals: Vec<f64>,
    pub displacements: Vec<NodeDisplacement>,
    /// Two rows per element, top end first
    pub forces: Vec<SectionForces>,
    pub reactions: Vec<Reaction>,
    /// Two rows per element, present for Winkler analyses
    pub spring_mobilization: Option<Vec<SpringMobilization>>,
    pub hb_mobilization: Option<BaseMobilization>,
    pub mb_mobilization: Option<BaseMobilization>,
    pub summary: AnalysisSummary,
}

impl AnalysisResult {
    /// Turn a non-converged result into [`PileError::ConvergenceFailed`]
    pub fn ensure_converged(self) -> PileResult<Self> {
        if self.converged {
            Ok(self)
        } else {
            Err(PileError::ConvergenceFailed(self.iterations))
        }
    }

    /// Serialize the result to pretty JSON
    pub fn to_json(&self) -> PileResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// (elevation, settlement) pairs
    pub fn settlement(&self) -> Vec<(f64, f64)> {
        self.displacements.iter().map(|d| (d.elevation, d.settlement)).collect()
    }

    /// (elevation, deflection) pairs
    pub fn deflection(&self) -> Vec<(f64, f64)> {
        self.displacements.iter().map(|d| (d.elevation, d.deflection)).collect()
    }

    /// (elevation, rotation) pairs
    pub fn rotation(&self) -> Vec<(f64, f64)> {
        self.displacements.iter().map(|d| (d.elevation, d.rotation)).collect()
    }

    /// Displacement of the node closest to `elevation`
    pub fn displacement_at(&self, elevation: f64) -> Option<&NodeDisplacement> {
        self.displacements
            .iter()
            .min_by(|a, b| (a.elevation - elevation).abs().total_cmp(&(b.elevation - elevation).abs()))
    }

    /// Reaction at `elevation` (within 1 mm), if one is reported
    pub fn reaction_at(&self, elevation: f64) -> Option<&Reaction> {
        self.reactions
            .iter()
            .find(|r| (r.elevation - elevation).abs() <= crate::mesh::NODE_TOLERANCE)
    }
}

/// Nodal displacement table
pub(crate) fn displacement_table(mesh: &Mesh, d: &FEVec) -> Vec<NodeDisplacement> {
    mesh.nodes
        .iter()
        .map(|node| NodeDisplacement {
            elevation: node.elevation,
            settlement: d[node.dof(Dof::Tx)],
            deflection: d[node.dof(Dof::Ty)],
            rotation: d[node.dof(Dof::Rz)],
        })
        .collect()
}

/// Internal forces at both ends of every element from the nodal displacements
pub(crate) fn recover_forces(mesh: &Mesh, element_type: ElementType, d: &FEVec) -> Vec<SectionForces> {
    let mut forces = Vec::with_capacity(2 * mesh.elements.len());
    for element in &mesh.elements {
        let q = element.end_forces(element_type, d);
        forces.push(SectionForces::from_top_end(element.top, &q));
        forces.push(SectionForces::from_bottom_end(element.bottom, &q));
    }
    forces
}

/// Reaction table: small values zeroed, nodes without reaction dropped
pub(crate) fn reaction_table(mesh: &Mesh, q: &FEVec) -> Vec<Reaction> {
    let clean = |v: f64| if v.abs() < REACTION_THRESHOLD { 0.0 } else { v };
    mesh.nodes
        .iter()
        .map(|node| Reaction {
            elevation: node.elevation,
            nr: clean(q[node.dof(Dof::Tx)]),
            vr: clean(q[node.dof(Dof::Ty)]),
            mr: clean(q[node.dof(Dof::Rz)]),
        })
        .filter(|r| r.nr != 0.0 || r.vr != 0.0 || r.mr != 0.0)
        .collect()
}

/// Mobilised resistance of the distributed springs at every element end
pub(crate) fn mobilization_table(mesh: &Mesh, springs: &SpringTables, d: &FEVec) -> Vec<SpringMobilization> {
    let mut rows = Vec::with_capacity(2 * mesh.elements.len());
    for (i, element) in mesh.elements.iter().enumerate() {
        for end in 0..2 {
            let node = element.index + end;
            let v = d[global_dof(node, Dof::Ty)];
            let theta = d[global_dof(node, Dof::Rz)];

            let py = &springs.py[i][end];
            let mt = &springs.mt[i][end];
            let p_mobilized = py.resistance_at(v).abs();

            rows.push(SpringMobilization {
                elevation: mesh.nodes[node].elevation,
                p_mobilized,
                p_max: py.max_resistance(),
                m_mobilized: mt.resistance_at(theta, p_mobilized).abs(),
                m_max: mt.max_resistance(p_mobilized),
            });
        }
    }
    rows
}

/// Base shear and base moment mobilisation at the pile tip
pub(crate) fn base_mobilization(
    mesh: &Mesh,
    springs: &SpringTables,
    d: &FEVec,
) -> (BaseMobilization, BaseMobilization) {
    let (v, theta) = match mesh.nodes.last() {
        Some(tip) => (d[tip.dof(Dof::Ty)], d[tip.dof(Dof::Rz)]),
        None => (0.0, 0.0),
    };
    (
        BaseMobilization {
            mobilized: springs.hb.resistance_at(v).abs(),
            maximum: springs.hb.max_resistance(),
        },
        BaseMobilization {
            mobilized: springs.mb.resistance_at(theta).abs(),
            maximum: springs.mb.max_resistance(),
        },
    )
}

/// Extreme values and model size
pub(crate) fn summarize(
    mesh: &Mesh,
    displacements: &[NodeDisplacement],
    forces: &[SectionForces],
    free_dofs: usize,
) -> AnalysisSummary {
    let mut summary = AnalysisSummary {
        num_nodes: mesh.node_count(),
        num_elements: mesh.elements.len(),
        total_dofs: mesh.dof_count(),
        free_dofs,
        ..Default::default()
    };

    for d in displacements {
        if d.deflection.abs() > summary.max_deflection {
            summary.max_deflection = d.deflection.abs();
            summary.max_deflection_elevation = d.elevation;
        }
    }
    for f in forces {
        if f.m.abs() > summary.max_moment {
            summary.max_moment = f.m.abs();
            summary.max_moment_elevation = f.elevation;
        }
        summary.max_shear = summary.max_shear.max(f.v.abs());
    }

    summary
}

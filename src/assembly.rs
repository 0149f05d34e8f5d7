//! Global stiffness assembly

use crate::elements::{global_dof, Dof, Element, ElementType};
use crate::math::{Mat, Vec as FEVec};
use crate::mesh::Mesh;
use crate::springs::{SpringTables, StiffnessKind};

/// Build the global stiffness matrix at the displacement state `d`
///
/// Beam stiffness is independent of `d`. Soil springs are linearised
/// according to `kind` and lumped on the diagonal: distributed springs carry
/// half the element length to each end node, p-y first then the m-t spring
/// conditioned on the p-y resistance just mobilised.
pub fn build_stiffness_matrix(
    mesh: &Mesh,
    springs: Option<&SpringTables>,
    element_type: ElementType,
    d: &FEVec,
    kind: StiffnessKind,
) -> Mat {
    let n_dofs = mesh.dof_count();
    let mut k_global = Mat::zeros(n_dofs, n_dofs);

    for element in &mesh.elements {
        add_element_stiffness(&mut k_global, element, element_type);
    }

    if let Some(springs) = springs {
        add_spring_stiffness(&mut k_global, mesh, springs, d, kind);
    }

    k_global
}

/// Overlap-add the 6x6 element stiffness into the global matrix
fn add_element_stiffness(k_global: &mut Mat, element: &Element, element_type: ElementType) {
    let k_local = element.stiffness(element_type);
    let dofs = element.dofs();

    for (a, &ga) in dofs.iter().enumerate() {
        for (b, &gb) in dofs.iter().enumerate() {
            k_global[(ga, gb)] += k_local[(a, b)];
        }
    }
}

fn add_spring_stiffness(
    k_global: &mut Mat,
    mesh: &Mesh,
    springs: &SpringTables,
    d: &FEVec,
    kind: StiffnessKind,
) {
    for (i, element) in mesh.elements.iter().enumerate() {
        let half_length = 0.5 * element.length();

        for end in 0..2 {
            let node = element.index + end;
            let ty = global_dof(node, Dof::Ty);
            let rz = global_dof(node, Dof::Rz);

            let py = &springs.py[i][end];
            let k_py = py.stiffness(kind, d[ty]);
            k_global[(ty, ty)] += k_py * half_length;

            let p_mobilised = py.resistance_at(d[ty]);
            let k_mt = springs.mt[i][end].stiffness(kind, d[rz], p_mobilised);
            k_global[(rz, rz)] += k_mt * half_length;
        }
    }

    if let Some(tip) = mesh.nodes.last() {
        let ty = tip.dof(Dof::Ty);
        let rz = tip.dof(Dof::Rz);
        k_global[(ty, ty)] += springs.hb.stiffness(kind, d[ty]);
        k_global[(rz, rz)] += springs.mb.stiffness(kind, d[rz]);
    }
}

//! Beam element spanning two consecutive mesh nodes

use serde::{Deserialize, Serialize};

use super::node::DOFS_PER_NODE;
use crate::math::{self, Mat6, Vec6};

/// Beam kinematics used for the element stiffness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ElementType {
    /// Slender beam, no shear deformation
    EulerBernoulli,
    /// Thick beam with shear deformation
    #[default]
    Timoshenko,
}

/// Soil state of an element, one value per end where it varies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementSoil {
    /// Index of the governing layer in the soil profile
    pub layer: usize,
    /// Name of the governing layer
    pub layer_name: String,
    /// Bulk unit weight of the layer in kN/m³
    pub unit_weight: f64,
    /// Thickness of the governing layer in m
    pub layer_height: f64,
    /// Vertical effective stress at [top, bottom] in kPa
    pub sigma_v: [f64; 2],
    /// Depth below ground at [top, bottom] in m
    pub depth: [f64; 2],
    /// Depth below the top of the layer at [top, bottom] in m
    pub depth_in_layer: [f64; 2],
    /// Whether each end lies below the water elevation
    pub below_water: [bool; 2],
}

/// A pile element between node `index` (top) and node `index + 1` (bottom)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    /// Index in the mesh (0 at the pile head)
    pub index: usize,
    /// Top elevation
    pub top: f64,
    /// Bottom elevation
    pub bottom: f64,
    /// Young's modulus in kPa
    pub e: f64,
    /// Shear modulus in kPa
    pub g: f64,
    /// Cross-sectional area in m²
    pub area: f64,
    /// Second moment of area in m⁴
    pub second_moment_of_area: f64,
    /// Outer diameter in m
    pub diameter: f64,
    /// Wall thickness in m, if the section is a plain tube
    pub wall_thickness: Option<f64>,
    /// Timoshenko shear coefficient
    pub shear_coefficient: f64,
    /// Soil state, `None` above ground or without a soil profile
    pub soil: Option<ElementSoil>,
}

impl Element {
    /// Element length
    pub fn length(&self) -> f64 {
        self.top - self.bottom
    }

    /// Index of the top node
    pub fn top_node(&self) -> usize {
        self.index
    }

    /// Index of the bottom node
    pub fn bottom_node(&self) -> usize {
        self.index + 1
    }

    /// Global DOFs of the element, top node first
    pub fn dofs(&self) -> [usize; 6] {
        let base = DOFS_PER_NODE * self.index;
        [base, base + 1, base + 2, base + 3, base + 4, base + 5]
    }

    /// Shear deformation parameter phi = 12EI / (kappa G A L²), zero for Euler-Bernoulli
    pub fn shear_parameter(&self, kind: ElementType) -> f64 {
        match kind {
            ElementType::EulerBernoulli => 0.0,
            ElementType::Timoshenko => {
                let l = self.length();
                12.0 * self.e * self.second_moment_of_area
                    / (self.shear_coefficient * self.g * self.area * l * l)
            }
        }
    }

    /// Element stiffness in the pile axes
    pub fn stiffness(&self, kind: ElementType) -> Mat6 {
        math::beam_local_stiffness(
            self.e,
            self.area,
            self.second_moment_of_area,
            self.length(),
            self.shear_parameter(kind),
        )
    }

    /// Element end forces q = k d from the global displacement vector
    pub fn end_forces(&self, kind: ElementType, displacements: &math::Vec) -> Vec6 {
        let mut d = Vec6::zeros();
        for (local, &global) in self.dofs().iter().enumerate() {
            d[local] = displacements[global];
        }
        self.stiffness(kind) * d
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn element() -> Element {
        Element {
            index: 2,
            top: -1.0,
            bottom: -3.0,
            e: 210.0e6,
            g: 80.77e6,
            area: 0.5,
            second_moment_of_area: 0.25,
            diameter: 2.0,
            wall_thickness: Some(0.08),
            shear_coefficient: 0.53,
            soil: None,
        }
    }

    #[test]
    fn test_element_geometry() {
        let el = element();
        assert_eq!(el.length(), 2.0);
        assert_eq!(el.top_node(), 2);
        assert_eq!(el.bottom_node(), 3);
        assert_eq!(el.dofs(), [6, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn test_rigid_translation_is_force_free() {
        let el = element();
        let mut d = math::Vec::zeros(15);
        for dof in el.dofs() {
            d[dof] = if dof % 3 == 1 { 0.01 } else { 0.0 };
        }
        let q = el.end_forces(ElementType::Timoshenko, &d);
        for i in 0..6 {
            assert_relative_eq!(q[i], 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_shear_parameter() {
        let el = element();
        assert_eq!(el.shear_parameter(ElementType::EulerBernoulli), 0.0);
        let phi = 12.0 * 210.0e6 * 0.25 / (0.53 * 80.77e6 * 0.5 * 4.0);
        assert_relative_eq!(el.shear_parameter(ElementType::Timoshenko), phi, epsilon = 1e-12);
    }
}

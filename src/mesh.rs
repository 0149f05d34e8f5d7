//! Mesh generation along the pile axis

use log::debug;
use serde::{Deserialize, Serialize};

use crate::elements::{Element, ElementSoil, Node, Pile, SoilProfile, DOFS_PER_NODE};
use crate::error::{PileError, PileResult};
use crate::model::ModelConfig;

/// Rounding allowance on elevation comparisons
const MERGE_TOLERANCE: f64 = 1e-6;

/// Tolerance used to match a user elevation with a node (1 mm)
pub const NODE_TOLERANCE: f64 = 1e-3;

/// Nodes and elements of a pile model, ordered from the pile head down
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mesh {
    pub nodes: Vec<Node>,
    pub elements: Vec<Element>,
}

impl Mesh {
    /// Build the mesh of a pile, optionally embedded in a soil profile
    pub fn build(pile: &Pile, soil: Option<&SoilProfile>, config: &ModelConfig) -> PileResult<Self> {
        let elevations = mesh_elevations(pile, soil, config)?;

        let nodes: Vec<Node> = elevations
            .iter()
            .enumerate()
            .map(|(i, &z)| Node::new(i, z))
            .collect();

        let nu = pile.material.nu;
        let mut elements = Vec::with_capacity(nodes.len().saturating_sub(1));
        for (i, pair) in elevations.windows(2).enumerate() {
            let (top, bottom) = (pair[0], pair[1]);
            let section = pile.section_at(top);

            elements.push(Element {
                index: i,
                top,
                bottom,
                e: pile.material.e,
                g: pile.material.g(),
                area: section.area,
                second_moment_of_area: section.second_moment_of_area,
                diameter: section.diameter,
                wall_thickness: section.wall_thickness,
                shear_coefficient: section.shear_coefficient(nu),
                soil: soil.and_then(|sp| element_soil(sp, top, bottom)),
            });
        }

        debug!(
            "Mesh built: {} nodes, {} elements between {} m and {} m",
            nodes.len(),
            elements.len(),
            pile.top_elevation,
            pile.bottom_elevation()
        );

        Ok(Self { nodes, elements })
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of global degrees of freedom
    pub fn dof_count(&self) -> usize {
        DOFS_PER_NODE * self.nodes.len()
    }

    /// Node elevations from top to bottom
    pub fn elevations(&self) -> Vec<f64> {
        self.nodes.iter().map(|n| n.elevation).collect()
    }

    /// Top elevation of the mesh
    pub fn top(&self) -> f64 {
        self.nodes.first().map_or(0.0, |n| n.elevation)
    }

    /// Bottom elevation of the mesh
    pub fn bottom(&self) -> f64 {
        self.nodes.last().map_or(0.0, |n| n.elevation)
    }

    /// Index of the node at `elevation`, within 1 mm
    pub fn node_at(&self, elevation: f64) -> PileResult<usize> {
        locate_node(&self.elevations(), elevation)
    }
}

/// Index of the elevation matching `elevation` within 1 mm
///
/// Distinguishes elevations outside the meshed range from elevations that
/// simply fall between two nodes.
pub(crate) fn locate_node(elevations: &[f64], elevation: f64) -> PileResult<usize> {
    let top = elevations.first().copied().unwrap_or(0.0);
    let bottom = elevations.last().copied().unwrap_or(0.0);
    if elevation > top + NODE_TOLERANCE || elevation < bottom - NODE_TOLERANCE {
        return Err(PileError::OutsideModel {
            elevation,
            top,
            bottom,
        });
    }
    elevations
        .iter()
        .position(|z| (z - elevation).abs() <= NODE_TOLERANCE)
        .ok_or(PileError::NotMeshed(elevation))
}

/// Sorted, unique node elevations honouring every anchor and the coarseness
fn mesh_elevations(
    pile: &Pile,
    soil: Option<&SoilProfile>,
    config: &ModelConfig,
) -> PileResult<Vec<f64>> {
    if !(config.coarseness > 0.0) || !config.coarseness.is_finite() {
        return Err(PileError::InvalidInput(format!(
            "coarseness must be strictly positive, got {}",
            config.coarseness
        )));
    }

    let top = pile.top_elevation;
    let bottom = pile.bottom_elevation();
    if !(top > bottom) {
        return Err(PileError::InvalidGeometry(format!(
            "pile bottom {} m is not below its top {} m",
            bottom, top
        )));
    }

    let sections = pile.section_elevations();
    let mut anchors = sections.clone();

    if let Some(sp) = soil {
        let soil_bottom = sp.bottom_elevation();
        if soil_bottom > bottom + NODE_TOLERANCE {
            return Err(PileError::PileDeeperThanSoil {
                pile_bottom: bottom,
                soil_bottom,
            });
        }
        anchors.extend(
            sp.layer_elevations()
                .into_iter()
                .filter(|&z| z <= top && z >= bottom),
        );
    }

    for &z in &config.x2mesh {
        if !(z <= top + NODE_TOLERANCE && z >= bottom - NODE_TOLERANCE) {
            return Err(PileError::InvalidInput(format!(
                "mesh elevation {} m lies outside the pile ({} m to {} m)",
                z, top, bottom
            )));
        }
        anchors.push(z.clamp(bottom, top));
    }

    anchors.sort_by(|a, b| b.total_cmp(a));
    let anchors = merge_anchors(anchors, &sections);

    let mut elevations = Vec::with_capacity(anchors.len());
    for pair in anchors.windows(2) {
        let span = pair[0] - pair[1];
        let divider = ((span / config.coarseness - 1e-9).ceil() as usize).max(1);
        let step = span / divider as f64;
        elevations.extend((0..divider).map(|k| pair[0] - step * k as f64));
    }
    if let Some(&last) = anchors.last() {
        elevations.push(last);
    }

    Ok(elevations)
}

/// Collapse anchors closer than the node tolerance, section boundaries win
fn merge_anchors(sorted: Vec<f64>, sections: &[f64]) -> Vec<f64> {
    let is_section = |z: f64| sections.iter().any(|&s| (s - z).abs() < MERGE_TOLERANCE);
    let mut merged: Vec<f64> = Vec::with_capacity(sorted.len());
    for z in sorted {
        match merged.last_mut() {
            Some(last) if *last - z <= NODE_TOLERANCE + MERGE_TOLERANCE => {
                if is_section(z) && !is_section(*last) {
                    *last = z;
                }
            }
            _ => merged.push(z),
        }
    }
    merged
}

/// Soil state of the element spanning `top` to `bottom`, `None` above ground
fn element_soil(soil: &SoilProfile, top: f64, bottom: f64) -> Option<ElementSoil> {
    if top > soil.top_elevation + MERGE_TOLERANCE {
        return None;
    }
    let layer_index = soil.layer_index_at(top)?;
    let layer = &soil.layers[layer_index];
    let ends = [top, bottom];

    Some(ElementSoil {
        layer: layer_index,
        layer_name: layer.name.clone(),
        unit_weight: layer.weight,
        layer_height: layer.height(),
        sigma_v: ends.map(|z| soil.vertical_effective_stress(z)),
        depth: ends.map(|z| soil.depth_below_ground(z)),
        depth_in_layer: ends.map(|z| layer.top - z),
        below_water: ends.map(|z| z <= soil.water_elevation),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Layer, PileSection};
    use approx::assert_relative_eq;

    fn pile() -> Pile {
        Pile::create(
            "P",
            0.0,
            vec![PileSection::new(10.0, 7.5, 0.07), PileSection::new(30.0, 7.5, 0.08)],
        )
        .unwrap()
    }

    fn soil() -> SoilProfile {
        SoilProfile::create(
            "BH",
            -5.0,
            -2.0,
            vec![
                Layer::new("Sand", -5.0, -17.0, 18.0),
                Layer::new("Clay", -17.0, -45.0, 19.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_anchors_and_coarseness() {
        let config = ModelConfig::default().with_coarseness(3.0).with_x2mesh(vec![-2.5]);
        let mesh = Mesh::build(&pile(), Some(&soil()), &config).unwrap();
        let z = mesh.elevations();

        for anchor in [0.0, -2.5, -5.0, -10.0, -17.0, -40.0] {
            assert!(z.iter().any(|&v| (v - anchor).abs() < 1e-9), "missing {}", anchor);
        }
        assert!(z.windows(2).all(|w| w[0] > w[1]));
        assert!(mesh.elements.iter().all(|e| e.length() <= 3.0 + 1e-9));
        assert_eq!(mesh.elements.len(), mesh.nodes.len() - 1);
        assert_eq!(mesh.dof_count(), 3 * mesh.nodes.len());
    }

    #[test]
    fn test_exact_multiple_is_not_oversplit() {
        let config = ModelConfig::default().with_coarseness(0.5);
        let mesh = Mesh::build(&pile(), None, &config).unwrap();
        assert_eq!(mesh.elements.len(), 80);
    }

    #[test]
    fn test_element_properties_follow_sections() {
        let config = ModelConfig::default().with_coarseness(5.0);
        let mesh = Mesh::build(&pile(), None, &config).unwrap();
        assert_eq!(mesh.elements[0].wall_thickness, Some(0.07));
        assert_eq!(mesh.elements[1].wall_thickness, Some(0.07));
        assert_eq!(mesh.elements[2].wall_thickness, Some(0.08));
        assert!(mesh.elements.iter().all(|e| e.soil.is_none()));
    }

    #[test]
    fn test_element_soil_state() {
        let config = ModelConfig::default().with_coarseness(1.0);
        let mesh = Mesh::build(&pile(), Some(&soil()), &config).unwrap();

        let above = mesh.elements.iter().filter(|e| e.top > -5.0).count();
        assert_eq!(above, 5);
        assert!(mesh.elements[..5].iter().all(|e| e.soil.is_none()));

        let first = mesh.elements[5].soil.as_ref().unwrap();
        assert_eq!(first.layer_name, "Sand");
        assert_relative_eq!(first.sigma_v[0], 0.0);
        assert_relative_eq!(first.sigma_v[1], 8.0, epsilon = 1e-9);
        assert_relative_eq!(first.depth[1], 1.0, epsilon = 1e-9);
        assert!(first.below_water[0]);

        let clay = mesh.elements.iter().find(|e| e.top <= -17.0).unwrap();
        let cs = clay.soil.as_ref().unwrap();
        assert_eq!(cs.layer_name, "Clay");
        assert_relative_eq!(cs.sigma_v[0], 12.0 * 8.0, epsilon = 1e-9);
        assert_relative_eq!(cs.depth_in_layer[0], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pile_deeper_than_soil() {
        let shallow = SoilProfile::create("BH", 0.0, 0.0, vec![Layer::new("S", 0.0, -20.0, 18.0)])
            .unwrap();
        let err = Mesh::build(&pile(), Some(&shallow), &ModelConfig::default()).unwrap_err();
        assert!(matches!(err, PileError::PileDeeperThanSoil { .. }));
    }

    #[test]
    fn test_invalid_mesh_inputs() {
        let p = pile();
        assert!(Mesh::build(&p, None, &ModelConfig::default().with_coarseness(0.0)).is_err());
        assert!(Mesh::build(&p, None, &ModelConfig::default().with_x2mesh(vec![5.0])).is_err());
    }

    #[test]
    fn test_close_anchors_are_merged() {
        let config = ModelConfig::default()
            .with_coarseness(5.0)
            .with_x2mesh(vec![-3.0, -3.001, -9.9995]);
        let mesh = Mesh::build(&pile(), None, &config).unwrap();
        let z = mesh.elevations();

        assert!(mesh.elements.iter().all(|e| e.length() > NODE_TOLERANCE));
        assert_eq!(z.iter().filter(|&&v| (v + 3.0).abs() <= 2e-3).count(), 1);
        // the section boundary survives the merge
        assert!(z.iter().any(|&v| v == -10.0));
        assert!(!z.iter().any(|&v| v == -9.9995));
        assert_eq!(mesh.node_at(-3.001).unwrap(), mesh.node_at(-3.0).unwrap());
    }

    #[test]
    fn test_node_lookup() {
        let mesh = Mesh::build(&pile(), None, &ModelConfig::default().with_coarseness(1.0)).unwrap();
        assert_eq!(mesh.node_at(-3.0005).unwrap(), 3);
        assert!(matches!(mesh.node_at(-3.5), Err(PileError::NotMeshed(_))));
        assert!(matches!(mesh.node_at(2.0), Err(PileError::OutsideModel { .. })));
    }
}

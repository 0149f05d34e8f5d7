//! Pile model - mesh, spring tables and analyses

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisOptions, AnalysisType};
use crate::assembly::build_stiffness_matrix;
use crate::elements::{ElementSoil, ElementType, Pile, SoilProfile};
use crate::error::{PileError, PileResult};
use crate::loads::BoundaryConditions;
use crate::math::Vec as FEVec;
use crate::mesh::{Mesh, NODE_TOLERANCE};
use crate::results::{self, AnalysisResult};
use crate::solver::{solve_equations, winkler_loop};
use crate::springs::{MtFamily, SpringCurve, SpringTables, StiffnessKind};

/// Meshing and spring options of a model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Beam kinematics
    pub element_type: ElementType,
    /// Maximum element length in m
    pub coarseness: f64,
    /// Extra elevations that must be meshed as nodes
    pub x2mesh: Vec<f64>,
    /// Build p-y springs
    pub distributed_lateral: bool,
    /// Build m-t springs
    pub distributed_moment: bool,
    /// Build the base shear spring
    pub base_shear: bool,
    /// Build the base moment spring
    pub base_moment: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            element_type: ElementType::Timoshenko,
            coarseness: 0.5,
            x2mesh: Vec::new(),
            distributed_lateral: true,
            distributed_moment: false,
            base_shear: false,
            base_moment: false,
        }
    }
}

impl ModelConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the beam kinematics
    pub fn with_element_type(mut self, element_type: ElementType) -> Self {
        self.element_type = element_type;
        self
    }

    /// Set the maximum element length
    pub fn with_coarseness(mut self, coarseness: f64) -> Self {
        self.coarseness = coarseness;
        self
    }

    /// Set extra elevations to mesh
    pub fn with_x2mesh(mut self, x2mesh: Vec<f64>) -> Self {
        self.x2mesh = x2mesh;
        self
    }

    /// Enable or disable the p-y springs
    pub fn with_distributed_lateral(mut self, on: bool) -> Self {
        self.distributed_lateral = on;
        self
    }

    /// Enable or disable the m-t springs
    pub fn with_distributed_moment(mut self, on: bool) -> Self {
        self.distributed_moment = on;
        self
    }

    /// Enable or disable the base shear spring
    pub fn with_base_shear(mut self, on: bool) -> Self {
        self.base_shear = on;
        self
    }

    /// Enable or disable the base moment spring
    pub fn with_base_moment(mut self, on: bool) -> Self {
        self.base_moment = on;
        self
    }
}

/// Structural properties of one element
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ElementProperties {
    pub top: f64,
    pub bottom: f64,
    pub diameter: f64,
    pub wall_thickness: Option<f64>,
    pub area: f64,
    pub second_moment_of_area: f64,
    pub young_modulus: f64,
}

/// Soil properties of one element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoilProperties {
    pub top: f64,
    pub bottom: f64,
    #[serde(flatten)]
    pub soil: ElementSoil,
}

/// A laterally loaded pile, meshed and ready for analysis
///
/// The model is immutable once created: analyses borrow it and own their
/// working vectors, so several analyses may run concurrently.
///
/// ```rust
/// use pile_solver::prelude::*;
///
/// let pile = Pile::create("P", 0.0, vec![PileSection::new(10.0, 2.0, 0.05)]).unwrap();
/// let config = ModelConfig::default().with_element_type(ElementType::EulerBernoulli);
/// let model = PileModel::create("Cantilever", pile, None, config).unwrap();
///
/// let mut bc = model.boundary_conditions();
/// bc.set_support(0.0, Support::fixed()).unwrap();
/// bc.set_pointload(-10.0, PointLoad::py(100.0)).unwrap();
///
/// let result = model.analyze_beam(&bc).unwrap();
/// assert!(result.converged);
/// assert_eq!(result.reactions.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PileModel {
    name: String,
    pile: Pile,
    soil: Option<SoilProfile>,
    config: ModelConfig,
    mesh: Mesh,
    springs: Option<SpringTables>,
}

impl PileModel {
    /// Validate the inputs, mesh the pile and build the spring tables
    pub fn create(
        name: &str,
        pile: Pile,
        soil: Option<SoilProfile>,
        config: ModelConfig,
    ) -> PileResult<Self> {
        let mesh = Mesh::build(&pile, soil.as_ref(), &config)?;
        let springs = match &soil {
            Some(sp) => Some(SpringTables::build(&mesh.elements, &pile, sp, &config)?),
            None => None,
        };

        info!(
            "Model '{}' created: {} elements, {} DOFs",
            name,
            mesh.elements.len(),
            mesh.dof_count()
        );

        Ok(Self {
            name: name.to_string(),
            pile,
            soil,
            config,
            mesh,
            springs,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pile(&self) -> &Pile {
        &self.pile
    }

    pub fn soil(&self) -> Option<&SoilProfile> {
        self.soil.as_ref()
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Node elevations from the pile head down
    pub fn node_elevations(&self) -> Vec<f64> {
        self.mesh.elevations()
    }

    /// Structural properties of every element
    pub fn element_properties(&self) -> Vec<ElementProperties> {
        self.mesh
            .elements
            .iter()
            .map(|e| ElementProperties {
                top: e.top,
                bottom: e.bottom,
                diameter: e.diameter,
                wall_thickness: e.wall_thickness,
                area: e.area,
                second_moment_of_area: e.second_moment_of_area,
                young_modulus: e.e,
            })
            .collect()
    }

    /// Soil properties of every element below ground
    pub fn soil_properties(&self) -> Vec<SoilProperties> {
        self.mesh
            .elements
            .iter()
            .filter_map(|e| {
                e.soil.as_ref().map(|s| SoilProperties {
                    top: e.top,
                    bottom: e.bottom,
                    soil: s.clone(),
                })
            })
            .collect()
    }

    /// p-y curves per element, [top, bottom]
    pub fn py_springs(&self) -> Option<&[[SpringCurve; 2]]> {
        self.springs.as_ref().map(|s| s.py.as_slice())
    }

    /// m-t families per element, [top, bottom]
    pub fn mt_springs(&self) -> Option<&[[MtFamily; 2]]> {
        self.springs.as_ref().map(|s| s.mt.as_slice())
    }

    /// Every spring of the model
    pub fn spring_tables(&self) -> Option<&SpringTables> {
        self.springs.as_ref()
    }

    /// Empty boundary conditions matching the mesh
    pub fn boundary_conditions(&self) -> BoundaryConditions {
        BoundaryConditions::new(&self.mesh)
    }

    /// Run the requested analysis
    pub fn analyze(
        &self,
        bc: &BoundaryConditions,
        analysis_type: AnalysisType,
        options: &AnalysisOptions,
    ) -> PileResult<AnalysisResult> {
        match analysis_type {
            AnalysisType::Beam => self.analyze_beam(bc),
            AnalysisType::Winkler => self.analyze_winkler(bc, options),
        }
    }

    /// Linear analysis of the pile without soil springs
    pub fn analyze_beam(&self, bc: &BoundaryConditions) -> PileResult<AnalysisResult> {
        self.check_boundary_conditions(bc)?;
        let vectors = bc.build();
        let element_type = self.config.element_type;

        let d0 = FEVec::zeros(self.mesh.dof_count());
        let k = build_stiffness_matrix(&self.mesh, None, element_type, &d0, StiffnessKind::Initial);
        let solution = solve_equations(&k, &vectors.forces, &vectors.displacements, &vectors.restrained)?;

        debug!("Beam analysis of '{}' solved", self.name);

        let displacements = results::displacement_table(&self.mesh, &solution.displacements);
        let forces = results::recover_forces(&self.mesh, element_type, &solution.displacements);
        let summary = results::summarize(&self.mesh, &displacements, &forces, vectors.free_dofs().len());

        Ok(AnalysisResult {
            name: format!("{} ({})", self.name, self.pile.name),
            analysis_type: AnalysisType::Beam,
            converged: true,
            iterations: 1,
            residuals: Vec::new(),
            displacements,
            forces,
            reactions: results::reaction_table(&self.mesh, &solution.reactions),
            spring_mobilization: None,
            hb_mobilization: None,
            mb_mobilization: None,
            summary,
        })
    }

    /// Nonlinear analysis of the pile on its soil springs
    ///
    /// A result is returned even when the iterations do not converge; check
    /// [`AnalysisResult::converged`] or call [`AnalysisResult::ensure_converged`].
    pub fn analyze_winkler(
        &self,
        bc: &BoundaryConditions,
        options: &AnalysisOptions,
    ) -> PileResult<AnalysisResult> {
        let (soil, springs) = match (&self.soil, &self.springs) {
            (Some(soil), Some(springs)) => (soil, springs),
            _ => return Err(PileError::MissingSoilProfile),
        };
        if options.max_iterations == 0 {
            return Err(PileError::InvalidInput(
                "at least one iteration is required".to_string(),
            ));
        }
        self.check_boundary_conditions(bc)?;

        let vectors = bc.build();
        let element_type = self.config.element_type;
        let solution = winkler_loop(&self.mesh, springs, element_type, &vectors, options)?;
        let d = &solution.displacements;

        let displacements = results::displacement_table(&self.mesh, d);
        let forces = results::recover_forces(&self.mesh, element_type, d);
        let summary = results::summarize(&self.mesh, &displacements, &forces, vectors.free_dofs().len());
        let (hb, mb) = results::base_mobilization(&self.mesh, springs, d);

        Ok(AnalysisResult {
            name: format!("{} ({}/{})", self.name, self.pile.name, soil.name),
            analysis_type: AnalysisType::Winkler,
            converged: solution.converged,
            iterations: solution.iterations,
            residuals: solution.residuals,
            displacements,
            forces,
            reactions: results::reaction_table(&self.mesh, &solution.reactions),
            spring_mobilization: Some(results::mobilization_table(&self.mesh, springs, d)),
            hb_mobilization: Some(hb),
            mb_mobilization: Some(mb),
            summary,
        })
    }

    fn check_boundary_conditions(&self, bc: &BoundaryConditions) -> PileResult<()> {
        if bc.node_count() != self.mesh.node_count() {
            return Err(PileError::InvalidInput(format!(
                "boundary conditions declared for {} nodes, model '{}' has {}",
                bc.node_count(),
                self.name,
                self.mesh.node_count()
            )));
        }
        let shifted = bc
            .elevations()
            .iter()
            .zip(self.mesh.elevations())
            .any(|(a, b)| (a - b).abs() > NODE_TOLERANCE);
        if shifted {
            return Err(PileError::InvalidInput(format!(
                "boundary conditions were declared on a different mesh than model '{}'",
                self.name
            )));
        }
        Ok(())
    }
}

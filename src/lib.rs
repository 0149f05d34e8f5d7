//! Pile Solver - laterally loaded piles on nonlinear Winkler springs
//!
//! The pile is modelled as a column of 2D beam elements (Euler-Bernoulli or
//! Timoshenko) with three DOFs per node: settlement, deflection and rotation.
//! Soil reaction is represented by nonlinear springs generated per element end
//! from the soil layer models:
//! - API sand and API clay p-y curves
//! - User tabulated p-y, m-t, base shear and base moment curves
//!
//! Two analyses are available:
//! - Beam analysis: linear structural solve without soil
//! - Winkler analysis: incremental-iterative solve on the soil springs
//!
//! ## Example
//! ```rust
//! use pile_solver::prelude::*;
//!
//! let pile = Pile::create("Tube", 0.0, vec![PileSection::new(20.0, 2.0, 0.05)]).unwrap();
//! let sand = ApiSand::new([33.0, 33.0], SandKind::Static).unwrap();
//! let soil = SoilProfile::create(
//!     "Borehole",
//!     0.0,
//!     0.0,
//!     vec![Layer::new("Sand", 0.0, -25.0, 20.0).with_lateral_model(sand.into())],
//! )
//! .unwrap();
//!
//! let model = PileModel::create("Model", pile, Some(soil), ModelConfig::default()).unwrap();
//!
//! let mut bc = model.boundary_conditions();
//! bc.set_pointload(0.0, PointLoad::py(500.0)).unwrap();
//! bc.set_support(-20.0, Support::with_restraints(true, false, false)).unwrap();
//!
//! let result = model.analyze_winkler(&bc, &AnalysisOptions::default()).unwrap();
//! assert!(result.converged);
//! let head = result.displacement_at(0.0).unwrap();
//! assert!(head.deflection > 0.0);
//! ```

pub mod analysis;
pub mod assembly;
pub mod elements;
pub mod error;
pub mod loads;
pub mod math;
pub mod mesh;
pub mod model;
pub mod results;
pub mod soilmodels;
pub mod solver;
pub mod springs;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{AnalysisOptions, AnalysisType};
    pub use crate::elements::{ElementType, Layer, Material, Pile, PileSection, SoilProfile, Support};
    pub use crate::error::{PileError, PileResult};
    pub use crate::loads::{BoundaryConditions, PointDisplacement, PointLoad};
    pub use crate::model::{ModelConfig, PileModel};
    pub use crate::results::{AnalysisResult, NodeDisplacement, Reaction, SectionForces};
    pub use crate::soilmodels::{ApiClay, ApiSand, ClayKind, SandKind, SoilModel, Tabulated};
    pub use crate::springs::{MtFamily, SpringCurve};
}

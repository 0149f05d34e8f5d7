//! Pile, soil and mesh element types

mod element;
mod material;
mod node;
mod pile;
mod section;
mod soil;
mod support;

pub use element::{Element, ElementSoil, ElementType};
pub use material::Material;
pub use node::{global_dof, Dof, Node, DOFS_PER_NODE};
pub use pile::Pile;
pub use section::{PileSection, SectionProperties};
pub use soil::{Layer, SoilProfile, WATER_UNIT_WEIGHT};
pub use support::Support;

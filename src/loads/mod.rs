//! Point loads, prescribed displacements and boundary conditions

mod boundary;
mod point_load;

pub use boundary::{BoundaryConditions, NodalLoad, SystemVectors};
pub use point_load::{PointDisplacement, PointLoad};

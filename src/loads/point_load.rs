//! Point loads and prescribed displacements at pile nodes

use serde::{Deserialize, Serialize};

/// Concentrated load at a node; `None` components leave the current value untouched
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointLoad {
    /// Normal (axial) force in kN
    pub px: Option<f64>,
    /// Shear (transverse) force in kN
    pub py: Option<f64>,
    /// Bending moment in kNm
    pub mz: Option<f64>,
}

impl PointLoad {
    /// Create a point load with every component set
    pub fn new(px: f64, py: f64, mz: f64) -> Self {
        Self {
            px: Some(px),
            py: Some(py),
            mz: Some(mz),
        }
    }

    /// Normal force only
    pub fn px(value: f64) -> Self {
        Self {
            px: Some(value),
            ..Default::default()
        }
    }

    /// Shear force only
    pub fn py(value: f64) -> Self {
        Self {
            py: Some(value),
            ..Default::default()
        }
    }

    /// Bending moment only
    pub fn mz(value: f64) -> Self {
        Self {
            mz: Some(value),
            ..Default::default()
        }
    }

    /// Components ordered as the node DOFs
    pub fn components(&self) -> [Option<f64>; 3] {
        [self.px, self.py, self.mz]
    }
}

/// Prescribed displacement at a node; every declared component is restrained
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointDisplacement {
    /// Settlement in m
    pub tx: Option<f64>,
    /// Deflection in m
    pub ty: Option<f64>,
    /// Rotation in rad
    pub rz: Option<f64>,
}

impl PointDisplacement {
    /// Prescribed settlement only
    pub fn tx(value: f64) -> Self {
        Self {
            tx: Some(value),
            ..Default::default()
        }
    }

    /// Prescribed deflection only
    pub fn ty(value: f64) -> Self {
        Self {
            ty: Some(value),
            ..Default::default()
        }
    }

    /// Prescribed rotation only
    pub fn rz(value: f64) -> Self {
        Self {
            rz: Some(value),
            ..Default::default()
        }
    }

    /// Components ordered as the node DOFs
    pub fn components(&self) -> [Option<f64>; 3] {
        [self.tx, self.ty, self.rz]
    }
}

//! Support conditions

use serde::{Deserialize, Serialize};

/// Restraint flags at a node of the pile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Support {
    /// Restrained in axial translation
    pub tx: bool,
    /// Restrained in transverse translation
    pub ty: bool,
    /// Restrained in rotation
    pub rz: bool,
}

impl Support {
    /// Create a new support with no restraints
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fully fixed support (all DOFs restrained)
    pub fn fixed() -> Self {
        Self {
            tx: true,
            ty: true,
            rz: true,
        }
    }

    /// Create a pinned support (translations restrained, rotation free)
    pub fn pinned() -> Self {
        Self {
            tx: true,
            ty: true,
            rz: false,
        }
    }

    /// Create a roller support (transverse translation restrained only)
    pub fn roller() -> Self {
        Self {
            tx: false,
            ty: true,
            rz: false,
        }
    }

    /// Create a support with specific restraints
    pub fn with_restraints(tx: bool, ty: bool, rz: bool) -> Self {
        Self { tx, ty, rz }
    }

    /// Restraint flags ordered as the node DOFs
    pub fn flags(&self) -> [bool; 3] {
        [self.tx, self.ty, self.rz]
    }

    /// Check if any DOF is restrained
    pub fn is_restrained(&self) -> bool {
        self.tx || self.ty || self.rz
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_support_presets() {
        assert_eq!(Support::fixed().flags(), [true, true, true]);
        assert_eq!(Support::pinned().flags(), [true, true, false]);
        assert_eq!(Support::roller().flags(), [false, true, false]);
        assert!(!Support::new().is_restrained());
    }
}

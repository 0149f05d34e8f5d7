//! Mesh node - a point on the pile axis

use serde::{Deserialize, Serialize};

/// Number of degrees of freedom per node: settlement, deflection, rotation
pub const DOFS_PER_NODE: usize = 3;

/// Local degree of freedom of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dof {
    /// Axial translation (settlement)
    Tx = 0,
    /// Transverse translation (deflection)
    Ty = 1,
    /// Rotation
    Rz = 2,
}

/// A node of the pile mesh, ordered from the pile head downwards
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Node {
    /// Index in the mesh (0 at the pile head)
    pub index: usize,
    /// Elevation in m
    pub elevation: f64,
}

impl Node {
    /// Create a new node
    pub fn new(index: usize, elevation: f64) -> Self {
        Self { index, elevation }
    }

    /// Global degree of freedom number of a local component
    pub fn dof(&self, component: Dof) -> usize {
        global_dof(self.index, component)
    }

    /// The three global degrees of freedom of this node
    pub fn dofs(&self) -> [usize; DOFS_PER_NODE] {
        let base = DOFS_PER_NODE * self.index;
        [base, base + 1, base + 2]
    }
}

/// Global degree of freedom number: 3 x node + component
#[inline]
pub fn global_dof(node: usize, component: Dof) -> usize {
    DOFS_PER_NODE * node + component as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dof_numbering() {
        let node = Node::new(4, -2.0);
        assert_eq!(node.dof(Dof::Tx), 12);
        assert_eq!(node.dof(Dof::Ty), 13);
        assert_eq!(node.dof(Dof::Rz), 14);
        assert_eq!(node.dofs(), [12, 13, 14]);
    }
}

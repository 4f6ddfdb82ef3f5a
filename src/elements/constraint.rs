//! Boundary constraints (fixities) at nodes

use serde::{Deserialize, Serialize};

use super::NodeId;

/// Fixity flags applied to one node, ordered [DX, DY, DZ, RX, RY, RZ]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    pub node: NodeId,
    pub fixity: [bool; 6],
}

impl Constraint {
    /// Create a constraint with specific restraints
    pub fn new(node: NodeId, fixity: [bool; 6]) -> Self {
        Self { node, fixity }
    }

    /// Count number of restrained DOFs
    pub fn num_restrained(&self) -> usize {
        self.fixity.iter().filter(|&&fixed| fixed).count()
    }
}

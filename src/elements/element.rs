//! Elastic beam-column element - 3D frame element

use serde::{Deserialize, Serialize};

use super::NodeId;

/// Integer identifier of an element
pub type ElementId = i64;

/// Tag of a geometric transform (local axis definition) in the solver
pub type TransformTag = u32;

/// A 3D frame element between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    /// Start and end node; the order defines the local x direction
    pub nodes: [NodeId; 2],
    /// Name of the section
    pub section: String,
    /// Vector lying in the local x-z plane
    pub local_xz: [f64; 3],
    /// Geometric transform tag, unique per element
    pub transform: TransformTag,
}

impl Element {
    /// Create a new element
    pub fn new(
        id: ElementId,
        i_node: NodeId,
        j_node: NodeId,
        section: &str,
        local_xz: [f64; 3],
        transform: TransformTag,
    ) -> Self {
        Self {
            id,
            nodes: [i_node, j_node],
            section: section.to_string(),
            local_xz,
            transform,
        }
    }

    pub fn i_node(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn j_node(&self) -> NodeId {
        self.nodes[1]
    }
}

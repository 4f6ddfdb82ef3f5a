//! Node - a point in 3D space

use serde::{Deserialize, Serialize};

/// Integer identifier of a node
pub type NodeId = i64;

/// A node of the frame model. Coordinates are fixed once registered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Node {
    /// Create a new node at the given coordinates
    pub fn new(id: NodeId, x: f64, y: f64, z: f64) -> Self {
        Self { id, x, y, z }
    }

    /// Get the coordinates as an array
    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Calculate distance to another node
    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_distance() {
        let n1 = Node::new(1, 0.0, 0.0, 0.0);
        let n2 = Node::new(2, 3.0, 4.0, 0.0);
        assert!((n1.distance_to(&n2) - 5.0).abs() < 1e-10);
        assert_eq!(n2.coords(), [3.0, 4.0, 0.0]);
    }
}

//! Nodal displacement results

pub mod output;
pub mod shape;

pub use output::{parse_displacements, persist, read_displacements, write_displacements};
pub use shape::{DeformedShape, ElementShape};

use serde::{Deserialize, Serialize};

use crate::elements::NodeId;
use crate::error::FrameResult;
use crate::model::{FrameModel, Registry};
use crate::solver::Solver;

/// Displacement results at a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDisplacement {
    /// Displacement in X direction
    pub dx: f64,
    /// Displacement in Y direction
    pub dy: f64,
    /// Displacement in Z direction
    pub dz: f64,
    /// Rotation about X axis
    pub rx: f64,
    /// Rotation about Y axis
    pub ry: f64,
    /// Rotation about Z axis
    pub rz: f64,
}

impl NodeDisplacement {
    /// Create from array [DX, DY, DZ, RX, RY, RZ]
    pub fn from_array(arr: [f64; 6]) -> Self {
        Self {
            dx: arr[0],
            dy: arr[1],
            dz: arr[2],
            rx: arr[3],
            ry: arr[4],
            rz: arr[5],
        }
    }

    pub fn as_array(&self) -> [f64; 6] {
        [self.dx, self.dy, self.dz, self.rx, self.ry, self.rz]
    }

    pub fn translation(&self) -> [f64; 3] {
        [self.dx, self.dy, self.dz]
    }

    /// Get translation magnitude
    pub fn translation_magnitude(&self) -> f64 {
        (self.dx.powi(2) + self.dy.powi(2) + self.dz.powi(2)).sqrt()
    }
}

/// Node displacements in node registration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplacementMap(Registry<NodeId, NodeDisplacement>);

impl DisplacementMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node's result; returns it back if the node already has one
    pub fn insert(
        &mut self,
        node: NodeId,
        displacement: NodeDisplacement,
    ) -> Result<(), NodeDisplacement> {
        self.0.insert(node, displacement)
    }

    pub fn get(&self, node: NodeId) -> Option<&NodeDisplacement> {
        self.0.get(&node)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &NodeDisplacement)> {
        self.0.iter().map(|(id, d)| (*id, d))
    }

    /// Largest translation magnitude and the node it occurs at
    pub fn max_translation(&self) -> Option<(NodeId, f64)> {
        self.iter()
            .map(|(id, d)| (id, d.translation_magnitude()))
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// Pulls per-node displacements out of the solver after an analysis
#[derive(Debug, Clone, Default)]
pub struct ResultExtractor {
    results: DisplacementMap,
}

impl ResultExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Results of the last successful extraction
    pub fn results(&self) -> &DisplacementMap {
        &self.results
    }

    /// Query every node of `model` and replace the stored results
    ///
    /// If any query fails the previous results are kept.
    pub fn extract<S: Solver + ?Sized>(
        &mut self,
        solver: &S,
        model: &FrameModel,
    ) -> FrameResult<&DisplacementMap> {
        let mut fresh = DisplacementMap::new();
        for node in model.node_ids() {
            let values = solver.query_displacement(node, 0)?;
            // Node ids are unique in the model
            let _ = fresh.insert(node, NodeDisplacement::from_array(values));
        }

        if let Some((node, magnitude)) = fresh.max_translation() {
            log::debug!(
                "Extracted {} displacements, max |u| = {magnitude:e} at node {node}",
                fresh.len()
            );
        }
        self.results = fresh;
        Ok(&self.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_keeps_insertion_order() {
        let mut map = DisplacementMap::new();
        map.insert(5, NodeDisplacement::default()).unwrap();
        map.insert(2, NodeDisplacement::from_array([0.0, 3.0, 4.0, 0.0, 0.0, 0.0]))
            .unwrap();

        assert_eq!(map.node_ids().collect::<Vec<_>>(), vec![5, 2]);
        assert_eq!(map.max_translation(), Some((2, 5.0)));
        assert!(map.insert(5, NodeDisplacement::default()).is_err());
    }

    #[test]
    fn test_displacement_array_order() {
        let d = NodeDisplacement::from_array([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(d.rz, 6.0);
        assert_eq!(d.as_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(d.translation(), [1.0, 2.0, 3.0]);
    }
}

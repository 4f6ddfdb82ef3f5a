//! Deformed-shape data for plotting
//!
//! Pairs every element's undeformed end coordinates with the end coordinates
//! displaced by `scale` times the nodal translations. Drawing is left to
//! whatever consumes the JSON.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::DisplacementMap;
use crate::elements::{ElementId, NodeId};
use crate::error::{FrameError, FrameResult};
use crate::model::FrameModel;

/// Original and deformed line of one element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementShape {
    pub element: ElementId,
    pub nodes: [NodeId; 2],
    pub original: [[f64; 3]; 2],
    pub deformed: [[f64; 3]; 2],
}

/// Deformed geometry of a whole model for one set of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeformedShape {
    pub scale: f64,
    pub elements: Vec<ElementShape>,
}

impl DeformedShape {
    /// Elements whose end nodes lack a result are skipped
    pub fn new(model: &FrameModel, results: &DisplacementMap, scale: f64) -> Self {
        let elements = model
            .elements()
            .values()
            .filter_map(|element| {
                let mut original = [[0.0; 3]; 2];
                let mut deformed = [[0.0; 3]; 2];
                for (end, &node_id) in element.nodes.iter().enumerate() {
                    let node = model.node(node_id)?;
                    let translation = results.get(node_id)?.translation();
                    original[end] = node.coords();
                    for axis in 0..3 {
                        deformed[end][axis] = original[end][axis] + scale * translation[axis];
                    }
                }
                Some(ElementShape {
                    element: element.id,
                    nodes: element.nodes,
                    original,
                    deformed,
                })
            })
            .collect();

        Self { scale, elements }
    }

    pub fn to_json(&self) -> FrameResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the shape as pretty-printed JSON
    pub fn save(&self, path: &Path) -> FrameResult<()> {
        let file = File::create(path).map_err(|e| FrameError::io(path, e))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        log::debug!(
            "Wrote deformed shape of {} elements to {}",
            self.elements.len(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Element, Node};
    use crate::results::NodeDisplacement;
    use approx::assert_relative_eq;

    fn model() -> FrameModel {
        let mut model = FrameModel::default();
        for (id, x) in [(1, 0.0), (2, 1.0), (3, 2.0)] {
            model.nodes.insert(id, Node::new(id, x, 0.0, 0.0)).unwrap();
        }
        model
            .elements
            .insert(1, Element::new(1, 1, 2, "box", [0.0, 0.0, 1.0], 1))
            .unwrap();
        model
            .elements
            .insert(2, Element::new(2, 2, 3, "box", [0.0, 0.0, 1.0], 2))
            .unwrap();
        model
    }

    #[test]
    fn test_scaled_deformation() {
        let mut results = DisplacementMap::new();
        results.insert(1, NodeDisplacement::default()).unwrap();
        results
            .insert(2, NodeDisplacement::from_array([0.0, 0.002, 0.0, 0.0, 0.0, 0.5]))
            .unwrap();

        let shape = DeformedShape::new(&model(), &results, 100.0);

        // Element 2 has no result at node 3
        assert_eq!(shape.elements.len(), 1);
        let line = &shape.elements[0];
        assert_eq!(line.original, [[0.0; 3], [1.0, 0.0, 0.0]]);
        assert_relative_eq!(line.deformed[1][1], 0.2, epsilon = 1e-12);
        assert_eq!(line.deformed[0], [0.0; 3]);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut results = DisplacementMap::new();
        for id in 1..=3 {
            results.insert(id, NodeDisplacement::default()).unwrap();
        }
        let shape = DeformedShape::new(&model(), &results, 1.0);
        let parsed: DeformedShape = serde_json::from_str(&shape.to_json().unwrap()).unwrap();
        assert_eq!(parsed, shape);
    }
}

//! Nodal loads and load patterns

use serde::{Deserialize, Serialize};

use crate::analysis::TimeSeriesTag;
use crate::elements::NodeId;
use crate::solver::PatternId;
use crate::tables::LoadRow;

/// A load applied directly to a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodalLoad {
    pub node: NodeId,
    /// Force in X direction (N)
    pub fx: f64,
    /// Force in Y direction (N)
    pub fy: f64,
    /// Force in Z direction (N)
    pub fz: f64,
    /// Moment about X axis (N·m)
    pub mx: f64,
    /// Moment about Y axis (N·m)
    pub my: f64,
    /// Moment about Z axis (N·m)
    pub mz: f64,
}

impl NodalLoad {
    /// Create a force-only nodal load
    pub fn force(node: NodeId, fx: f64, fy: f64, fz: f64) -> Self {
        Self {
            node,
            fx,
            fy,
            fz,
            mx: 0.0,
            my: 0.0,
            mz: 0.0,
        }
    }

    /// Get the load as an array [FX, FY, FZ, MX, MY, MZ]
    pub fn as_array(&self) -> [f64; 6] {
        [self.fx, self.fy, self.fz, self.mx, self.my, self.mz]
    }
}

impl From<&LoadRow> for NodalLoad {
    fn from(row: &LoadRow) -> Self {
        Self::force(row.node, row.fx, row.fy, row.fz)
    }
}

/// The load pattern installed in the solver for one load case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadPattern {
    pub id: PatternId,
    pub time_series: TimeSeriesTag,
    /// Loads in table order
    pub loads: Vec<NodalLoad>,
}

impl LoadPattern {
    /// Sum of the applied forces [FX, FY, FZ]
    pub fn total_force(&self) -> [f64; 3] {
        self.loads.iter().fold([0.0; 3], |acc, load| {
            [acc[0] + load.fx, acc[1] + load.fy, acc[2] + load.fz]
        })
    }
}

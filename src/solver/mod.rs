//! Contract between the pipeline and the structural solver
//!
//! The pipeline only ever talks to a solver through [`Solver`]. Calls mirror a
//! stateful finite-element engine: geometry is defined once, load patterns are
//! swapped in and out, and `analyze` advances the current state.

pub mod linear;

pub use linear::LinearFrameSolver;

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisConfig, TimeSeriesTag};
use crate::elements::{Element, ElementId, NodeId, Section, TransformTag};
use crate::error::FrameResult;

/// Tag of a load pattern in the solver
pub type PatternId = u32;

/// Integer status returned by [`Solver::analyze`]; zero means success
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvergenceCode(pub i32);

impl ConvergenceCode {
    pub const SUCCESS: Self = Self(0);
    /// The system matrix could not be factorized
    pub const SINGULAR: Self = Self(-2);
    /// The convergence test failed within the iteration cap
    pub const NOT_CONVERGED: Self = Self(-3);

    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }
}

/// Everything the solver needs to create an elastic beam-column element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDefinition {
    pub id: ElementId,
    pub nodes: [NodeId; 2],
    pub area: f64,
    pub e: f64,
    pub g: f64,
    pub j: f64,
    pub iy: f64,
    pub iz: f64,
    pub transform: TransformTag,
    pub mass_per_length: f64,
}

impl ElementDefinition {
    /// Combine an element with its resolved section
    pub fn new(element: &Element, section: &Section) -> Self {
        Self {
            id: element.id,
            nodes: element.nodes,
            area: section.area,
            e: section.e,
            g: section.g,
            j: section.j,
            iy: section.iy,
            iz: section.iz,
            transform: element.transform,
            mass_per_length: section.mass_per_length,
        }
    }
}

/// A stateful structural solver
pub trait Solver {
    /// Discard every definition and start a model with the given dimensions
    fn reset_model(&mut self, dimensions: usize, dofs_per_node: usize) -> FrameResult<()>;

    fn define_node(&mut self, id: NodeId, coords: [f64; 3]) -> FrameResult<()>;

    /// Fixity flags ordered [DX, DY, DZ, RX, RY, RZ]; a later call for the same node wins
    fn define_constraint(&mut self, node: NodeId, fixity: [bool; 6]) -> FrameResult<()>;

    /// Geometric transform given by a vector in the local x-z plane
    fn define_local_axis(&mut self, tag: TransformTag, vecxz: [f64; 3]) -> FrameResult<()>;

    fn define_element(&mut self, element: &ElementDefinition) -> FrameResult<()>;

    /// Create a pattern; subsequent nodal loads are added to it
    fn define_load_pattern(
        &mut self,
        pattern: PatternId,
        time_series: TimeSeriesTag,
    ) -> FrameResult<()>;

    /// Add a load [FX, FY, FZ, MX, MY, MZ] to the most recently defined pattern
    fn add_nodal_load(&mut self, node: NodeId, load: [f64; 6]) -> FrameResult<()>;

    fn remove_load_pattern(&mut self, pattern: PatternId) -> FrameResult<()>;

    /// Return the analysis state (displacements, pseudo-time) to its initial values
    fn reset_analysis_state(&mut self) -> FrameResult<()>;

    fn configure_analysis(&mut self, config: &AnalysisConfig) -> FrameResult<()>;

    fn analyze(&mut self, num_steps: usize) -> FrameResult<ConvergenceCode>;

    /// Displacement vector [DX, DY, DZ, RX, RY, RZ] of a node
    fn query_displacement(&self, node: NodeId, time_index: usize) -> FrameResult<[f64; 6]>;
}

//! frame-sim - 3D frame models from tables, analyzed load case by load case
//!
//! The crate turns five tables (materials, sections, nodes, constraints,
//! elements) into a frame model held by a structural solver, then runs any
//! number of static nodal load cases against it without rebuilding the
//! geometry:
//! - Table loading from CSV with header-name column matching
//! - Staged model building with referential checks
//! - Single active load pattern swapped between load cases
//! - Static analysis reported as converged / not converged
//! - Nodal displacement extraction, file output and deformed-shape data
//!
//! The solver is reached through the [`solver::Solver`] trait;
//! [`solver::LinearFrameSolver`] is an in-process linear elastic implementation.
//!
//! ## Example
//! ```rust
//! use frame_sim::prelude::*;
//!
//! let tables = ModelTables {
//!     materials: parse_table("materials,E,G,density\nsteel,2e11,8e10,7850\n".as_bytes())?,
//!     sections: parse_table("sections,Area,Iz,Iy,J,material\nbox,0.01,1e-6,1e-6,1e-6,steel\n".as_bytes())?,
//!     nodes: parse_table("node,x,y,z\n1,0,0,0\n2,1,0,0\n".as_bytes())?,
//!     constraints: parse_table("node,x,y,z,rot_x,rot_y,rot_z\n1,1,1,1,1,1,1\n".as_bytes())?,
//!     elements: parse_table(
//!         "element,node1,node2,section,localxz_x,localxz_y,localxz_z\n1,1,2,box,0,0,1\n".as_bytes(),
//!     )?,
//! };
//!
//! let mut sim = Simulation::new(LinearFrameSolver::new(), &tables, AnalysisConfig::default())?;
//! let report = sim.run_load_case(&[LoadRow::new(2, 0.0, 1000.0, 0.0)])?;
//! assert_eq!(report.outcome, AnalysisOutcome::Converged);
//!
//! // PL³/3EI
//! let tip = sim.results().get(2).unwrap();
//! assert!((tip.dy - 1000.0 / (3.0 * 2e11 * 1e-6)).abs() < 1e-9);
//! # Ok::<(), frame_sim::error::FrameError>(())
//! ```

pub mod analysis;
pub mod elements;
pub mod error;
pub mod loads;
pub mod math;
pub mod model;
pub mod results;
pub mod simulation;
pub mod solver;
pub mod tables;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{
        AnalysisConfig, AnalysisDriver, AnalysisOutcome, NumbererKind, SystemKind,
    };
    pub use crate::elements::{Constraint, Element, Material, Node, NodeId, Section};
    pub use crate::error::{FrameError, FrameResult};
    pub use crate::loads::{LoadCaseOrchestrator, LoadPattern, NodalLoad, OrchestratorState};
    pub use crate::model::{build, FrameModel, ModelBuilder};
    pub use crate::results::{
        persist, read_displacements, DeformedShape, DisplacementMap, NodeDisplacement,
        ResultExtractor,
    };
    pub use crate::simulation::{LoadCaseReport, Simulation};
    pub use crate::solver::{ConvergenceCode, ElementDefinition, LinearFrameSolver, Solver};
    pub use crate::tables::{
        parse_table, read_load_table, read_table, ConstraintRow, ElementRow, LoadRow,
        MaterialRow, ModelPaths, ModelTables, NodeRow, SectionRow,
    };
}

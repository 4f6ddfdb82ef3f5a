//! Load patterns and their lifecycle across load cases

pub mod orchestrator;
mod pattern;

pub use orchestrator::{LoadCaseOrchestrator, OrchestratorState};
pub use pattern::{LoadPattern, NodalLoad};

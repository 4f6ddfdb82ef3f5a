//! Model build plus repeated load-case analysis
//!
//! The model is built and the analysis configured once; every load case then
//! goes through apply, analyze and extract against the same geometry.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisConfig, AnalysisDriver, AnalysisOutcome};
use crate::error::FrameResult;
use crate::loads::{LoadCaseOrchestrator, LoadPattern};
use crate::model::{self, FrameModel};
use crate::results::{self, DeformedShape, DisplacementMap, ResultExtractor};
use crate::solver::{PatternId, Solver};
use crate::tables::{LoadRow, ModelPaths, ModelTables};

/// Summary of one load case run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadCaseReport {
    pub pattern: PatternId,
    pub outcome: AnalysisOutcome,
}

/// A frame model bound to the solver that holds its definitions
pub struct Simulation<S: Solver> {
    solver: S,
    model: FrameModel,
    orchestrator: LoadCaseOrchestrator,
    driver: AnalysisDriver,
    extractor: ResultExtractor,
}

impl<S: Solver> Simulation<S> {
    /// Build the model into `solver` and configure the analysis
    pub fn new(mut solver: S, tables: &ModelTables, config: AnalysisConfig) -> FrameResult<Self> {
        let model = model::build(&mut solver, tables)?;
        let mut driver = AnalysisDriver::new(config);
        driver.configure(&mut solver)?;
        let orchestrator = LoadCaseOrchestrator::new(driver.config().time_series_tag());

        Ok(Self {
            solver,
            model,
            orchestrator,
            driver,
            extractor: ResultExtractor::new(),
        })
    }

    /// Read the five tables and build the model from them
    pub fn from_paths(solver: S, paths: &ModelPaths, config: AnalysisConfig) -> FrameResult<Self> {
        let tables = ModelTables::load(paths)?;
        Self::new(solver, &tables, config)
    }

    /// Replace the active load pattern
    pub fn apply_load_case(&mut self, rows: &[LoadRow]) -> FrameResult<&LoadPattern> {
        self.orchestrator
            .apply_load_case(&mut self.solver, &self.model, rows)
    }

    /// Analyze the currently applied load case
    pub fn run(&mut self) -> FrameResult<AnalysisOutcome> {
        self.driver.run(&mut self.solver)
    }

    /// Refresh the displacement results from the solver
    pub fn extract(&mut self) -> FrameResult<&DisplacementMap> {
        self.extractor.extract(&self.solver, &self.model)
    }

    /// Apply, analyze and extract one load case
    ///
    /// Results are extracted even when the analysis did not converge; whether
    /// to keep them is up to the caller.
    pub fn run_load_case(&mut self, rows: &[LoadRow]) -> FrameResult<LoadCaseReport> {
        let pattern = self.apply_load_case(rows)?.id;
        let outcome = self.run()?;
        self.extract()?;
        Ok(LoadCaseReport { pattern, outcome })
    }

    /// Write the current results in the displacement file format
    pub fn persist_results(&self, path: &Path) -> FrameResult<()> {
        results::persist(self.extractor.results(), path)
    }

    pub fn deformed_shape(&self, scale: f64) -> DeformedShape {
        DeformedShape::new(&self.model, self.extractor.results(), scale)
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn model(&self) -> &FrameModel {
        &self.model
    }

    pub fn results(&self) -> &DisplacementMap {
        self.extractor.results()
    }

    pub fn active_pattern(&self) -> Option<&LoadPattern> {
        self.orchestrator.active_pattern()
    }

    pub fn config(&self) -> &AnalysisConfig {
        self.driver.config()
    }

    /// Release the solver handle
    pub fn into_solver(self) -> S {
        self.solver
    }
}

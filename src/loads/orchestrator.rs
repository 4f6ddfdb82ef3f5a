//! Load-case orchestration
//!
//! A model carries at most one load pattern at a time. Installing a load case
//! retires the previous pattern and resets the analysis state so the next
//! analysis starts from the undeformed structure.

use super::{LoadPattern, NodalLoad};
use crate::analysis::TimeSeriesTag;
use crate::error::{FrameResult, RowRef, TableKind};
use crate::model::FrameModel;
use crate::solver::{PatternId, Solver};
use crate::tables::LoadRow;

/// Whether a load pattern is installed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    Empty,
    Loaded(PatternId),
}

/// Owns the single active load pattern of a model
#[derive(Debug, Clone)]
pub struct LoadCaseOrchestrator {
    time_series: TimeSeriesTag,
    counter: PatternId,
    active: Option<LoadPattern>,
}

impl LoadCaseOrchestrator {
    /// Patterns created by this orchestrator scale with `time_series`
    pub fn new(time_series: TimeSeriesTag) -> Self {
        Self {
            time_series,
            counter: 0,
            active: None,
        }
    }

    pub fn state(&self) -> OrchestratorState {
        match &self.active {
            Some(pattern) => OrchestratorState::Loaded(pattern.id),
            None => OrchestratorState::Empty,
        }
    }

    pub fn active_pattern(&self) -> Option<&LoadPattern> {
        self.active.as_ref()
    }

    /// Id of the most recently installed pattern, zero before the first
    pub fn counter(&self) -> PatternId {
        self.counter
    }

    /// Replace the active load pattern with one built from `rows`
    ///
    /// Every row is checked against the model first; an unknown node leaves
    /// the solver, the active pattern and the counter untouched. The counter
    /// only advances once the solver has accepted the pattern and all of its
    /// loads.
    pub fn apply_load_case<S: Solver + ?Sized>(
        &mut self,
        solver: &mut S,
        model: &FrameModel,
        rows: &[LoadRow],
    ) -> FrameResult<&LoadPattern> {
        for (index, row) in rows.iter().enumerate() {
            model.resolve_node(row.node, RowRef::at(TableKind::Loads, index))?;
        }

        if let Some(previous) = self.active.as_ref().map(|p| p.id) {
            log::debug!("Removing load pattern {previous}");
            solver.remove_load_pattern(previous)?;
            self.active = None;
            solver.reset_analysis_state()?;
        }

        let pattern = LoadPattern {
            id: self.counter + 1,
            time_series: self.time_series,
            loads: rows.iter().map(NodalLoad::from).collect(),
        };

        solver.define_load_pattern(pattern.id, pattern.time_series)?;
        let added = pattern
            .loads
            .iter()
            .try_for_each(|load| solver.add_nodal_load(load.node, load.as_array()));
        if let Err(e) = added {
            log::warn!("Load pattern {} rejected, removing it: {e}", pattern.id);
            if let Err(remove_error) = solver.remove_load_pattern(pattern.id) {
                // Still in the solver, so the next load case has to retire it
                log::error!("Could not remove load pattern {}: {remove_error}", pattern.id);
                self.counter = pattern.id;
                self.active = Some(pattern);
            }
            return Err(e);
        }

        self.counter = pattern.id;
        let [fx, fy, fz] = pattern.total_force();
        log::info!(
            "Applied load pattern {} with {} nodal loads, total force [{fx:e}, {fy:e}, {fz:e}]",
            pattern.id,
            pattern.loads.len()
        );

        Ok(self.active.insert(pattern))
    }
}

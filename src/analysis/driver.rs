//! Runs one static equilibrium analysis per load case

use serde::{Deserialize, Serialize};

use super::AnalysisConfig;
use crate::error::{FrameError, FrameResult};
use crate::solver::Solver;

/// Result of one analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisOutcome {
    Converged,
    NotConverged,
}

impl AnalysisOutcome {
    pub fn is_converged(self) -> bool {
        self == Self::Converged
    }
}

/// Configures the solver once and runs analyses with a fixed parameter block
#[derive(Debug, Clone)]
pub struct AnalysisDriver {
    config: AnalysisConfig,
    configured: bool,
}

impl AnalysisDriver {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            configured: false,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Hand the analysis parameters to the solver; later calls do nothing
    pub fn configure<S: Solver + ?Sized>(&mut self, solver: &mut S) -> FrameResult<()> {
        if self.configured {
            return Ok(());
        }
        solver.configure_analysis(&self.config)?;
        self.configured = true;
        log::debug!("Configured analysis: {:?}", self.config);
        Ok(())
    }

    /// Run `config.steps` analysis steps on the currently loaded state
    ///
    /// A failed analysis is reported as [`AnalysisOutcome::NotConverged`]; it is
    /// never retried.
    pub fn run<S: Solver + ?Sized>(&self, solver: &mut S) -> FrameResult<AnalysisOutcome> {
        if !self.configured {
            return Err(FrameError::SolverState(
                "analysis run before configuration".to_string(),
            ));
        }

        let code = solver.analyze(self.config.steps)?;
        if code.is_success() {
            log::info!("Analysis converged");
            Ok(AnalysisOutcome::Converged)
        } else {
            log::warn!("Analysis did not converge (solver code {})", code.0);
            Ok(AnalysisOutcome::NotConverged)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::LinearFrameSolver;

    #[test]
    fn test_run_requires_configuration() {
        let mut solver = LinearFrameSolver::new();
        solver.reset_model(3, 6).unwrap();
        let driver = AnalysisDriver::new(AnalysisConfig::default());

        assert!(matches!(
            driver.run(&mut solver),
            Err(FrameError::SolverState(_))
        ));
    }

    #[test]
    fn test_configure_is_idempotent() {
        let mut solver = LinearFrameSolver::new();
        solver.reset_model(3, 6).unwrap();
        let mut driver = AnalysisDriver::new(AnalysisConfig::default());

        driver.configure(&mut solver).unwrap();
        driver.configure(&mut solver).unwrap();
        assert!(driver.is_configured());
        assert_eq!(driver.run(&mut solver).unwrap(), AnalysisOutcome::Converged);
    }

    #[test]
    fn test_singular_system_is_not_converged() {
        let mut solver = LinearFrameSolver::new();
        solver.reset_model(3, 6).unwrap();
        // A free node with no element attached has no stiffness
        solver.define_node(1, [0.0; 3]).unwrap();
        let mut driver = AnalysisDriver::new(AnalysisConfig::default());
        driver.configure(&mut solver).unwrap();

        let outcome = driver.run(&mut solver).unwrap();
        assert_eq!(outcome, AnalysisOutcome::NotConverged);
        assert!(!outcome.is_converged());
    }
}

//! Analysis parameters and the analysis driver

pub mod driver;

pub use driver::{AnalysisDriver, AnalysisOutcome};

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, FrameResult};

/// Tag of a time series in the solver
pub type TimeSeriesTag = u32;

/// How the system of equations is stored and solved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SystemKind {
    /// Symmetric profile storage, Cholesky factorization
    #[default]
    SparseSymmetric,
    /// Dense storage, LU factorization
    FullGeneral,
}

/// Equation numbering strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NumbererKind {
    /// Node registration order
    Plain,
    /// Reverse Cuthill-McKee over the node connectivity graph
    #[default]
    Rcm,
}

/// Treatment of single-point constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConstraintHandlerKind {
    /// Fixed dofs are removed from the system
    #[default]
    Plain,
}

/// Load factor as a function of pseudo-time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TimeSeries {
    /// factor = t
    Linear { tag: TimeSeriesTag },
}

impl TimeSeries {
    pub fn tag(&self) -> TimeSeriesTag {
        match self {
            Self::Linear { tag } => *tag,
        }
    }

    pub fn factor(&self, time: f64) -> f64 {
        match self {
            Self::Linear { .. } => time,
        }
    }
}

impl Default for TimeSeries {
    fn default() -> Self {
        Self::Linear { tag: 1 }
    }
}

/// Advance of pseudo-time per analysis step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Integrator {
    LoadControl { increment: f64 },
}

impl Integrator {
    pub fn increment(&self) -> f64 {
        match self {
            Self::LoadControl { increment } => *increment,
        }
    }
}

impl Default for Integrator {
    fn default() -> Self {
        Self::LoadControl { increment: 1.0 }
    }
}

/// Convergence test applied after each iteration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConvergenceTest {
    /// 2-norm of the displacement increment below `tolerance`
    NormDispIncr {
        tolerance: f64,
        max_iterations: usize,
    },
}

impl Default for ConvergenceTest {
    fn default() -> Self {
        Self::NormDispIncr {
            tolerance: 1e-5,
            max_iterations: 100,
        }
    }
}

/// Solution algorithm within a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Algorithm {
    /// Iterate on the residual until the convergence test passes
    #[default]
    Newton,
    /// Single solve per step
    Linear,
}

/// Kind of analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnalysisKind {
    #[default]
    Static,
}

/// Parameters of a static analysis
///
/// Missing fields in a JSON document take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub system: SystemKind,
    pub numberer: NumbererKind,
    pub constraints: ConstraintHandlerKind,
    pub time_series: TimeSeries,
    pub integrator: Integrator,
    pub test: ConvergenceTest,
    pub algorithm: Algorithm,
    pub analysis: AnalysisKind,
    /// Steps per analysis run
    pub steps: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            system: SystemKind::default(),
            numberer: NumbererKind::default(),
            constraints: ConstraintHandlerKind::default(),
            time_series: TimeSeries::default(),
            integrator: Integrator::default(),
            test: ConvergenceTest::default(),
            algorithm: Algorithm::default(),
            analysis: AnalysisKind::default(),
            steps: 1,
        }
    }
}

impl AnalysisConfig {
    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> FrameResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn load(path: &Path) -> FrameResult<Self> {
        let json = fs::read_to_string(path).map_err(|e| FrameError::io(path, e))?;
        Self::from_json(&json)
    }

    /// Check that the numeric parameters are usable
    pub fn validate(&self) -> FrameResult<()> {
        if self.steps == 0 {
            return Err(FrameError::InvalidDefinition(
                "analysis needs at least one step".to_string(),
            ));
        }
        let increment = self.integrator.increment();
        if !(increment.is_finite() && increment > 0.0) {
            return Err(FrameError::InvalidDefinition(format!(
                "load increment must be positive, got {increment}"
            )));
        }
        let ConvergenceTest::NormDispIncr {
            tolerance,
            max_iterations,
        } = self.test;
        if tolerance.is_nan() || tolerance <= 0.0 || max_iterations == 0 {
            return Err(FrameError::InvalidDefinition(format!(
                "convergence test needs a positive tolerance and iteration cap, got {tolerance} / {max_iterations}"
            )));
        }
        Ok(())
    }

    pub fn time_series_tag(&self) -> TimeSeriesTag {
        self.time_series.tag()
    }

    pub fn with_system(mut self, system: SystemKind) -> Self {
        self.system = system;
        self
    }

    pub fn with_numberer(mut self, numberer: NumbererKind) -> Self {
        self.numberer = numberer;
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the NormDispIncr tolerance and iteration cap
    pub fn with_test(mut self, tolerance: f64, max_iterations: usize) -> Self {
        self.test = ConvergenceTest::NormDispIncr {
            tolerance,
            max_iterations,
        };
        self
    }

    /// Set the LoadControl increment
    pub fn with_load_increment(mut self, increment: f64) -> Self {
        self.integrator = Integrator::LoadControl { increment };
        self
    }

    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }
}

//! In-process linear elastic solver for 3D frames
//!
//! Each node carries six dofs [DX, DY, DZ, RX, RY, RZ]. Element stiffness is
//! the 12x12 Euler-Bernoulli frame matrix rotated into global axes when the
//! element is defined; `analyze` assembles the free-dof system, factorizes it
//! once and advances pseudo-time step by step.

use std::collections::HashMap;

use nalgebra::{DVector, Dyn, LU};
use nalgebra_sparse::CsrMatrix;

use super::{ConvergenceCode, ElementDefinition, PatternId, Solver};
use crate::analysis::{
    Algorithm, AnalysisConfig, ConvergenceTest, NumbererKind, SystemKind, TimeSeriesTag,
};
use crate::elements::{ElementId, Node, NodeId, TransformTag};
use crate::error::{FrameError, FrameResult};
use crate::math::sparse::{sparse_matvec, PIVOT_TOLERANCE};
use crate::math::{
    member_global_stiffness, member_local_stiffness, member_transformation_matrix,
    reverse_cuthill_mckee, Mat, Mat12, SparseCholeskySolver, SparseMatrixBuilder,
};
use crate::model::Registry;

const DIMENSIONS: usize = 3;
const DOFS_PER_NODE: usize = 6;

/// Equation number of each dof of each node, `None` for fixed dofs
type DofMap = Vec<[Option<usize>; DOFS_PER_NODE]>;

/// An element with its stiffness already in global axes
#[derive(Debug, Clone)]
struct FrameMember {
    /// Registration positions of the end nodes
    ends: [usize; 2],
    k_global: Mat12,
}

#[derive(Debug, Clone)]
struct ActivePattern {
    id: PatternId,
    /// Loads keyed by node registration position
    loads: Vec<(usize, [f64; DOFS_PER_NODE])>,
}

/// Factorized free-dof stiffness
enum LinearSystem {
    Skyline {
        matrix: CsrMatrix<f64>,
        factor: SparseCholeskySolver,
    },
    Dense {
        matrix: Mat,
        factor: LU<f64, Dyn, Dyn>,
    },
}

impl LinearSystem {
    /// Factorize the assembled matrix, or `None` when it is singular
    fn factorize(kind: SystemKind, builder: &SparseMatrixBuilder) -> Option<Self> {
        match kind {
            SystemKind::SparseSymmetric => {
                let matrix = builder.to_csr();
                let mut factor = SparseCholeskySolver::new(&matrix);
                if let Err(e) = factor.factorize() {
                    log::debug!("Skyline factorization failed: {e}");
                    return None;
                }
                log::trace!("Skyline profile holds {} entries", factor.profile_len());
                Some(Self::Skyline { matrix, factor })
            }
            SystemKind::FullGeneral => {
                let matrix = builder.to_dense();
                let factor = matrix.clone().lu();
                // Each pivot is measured against its own original diagonal
                let singular = factor
                    .u()
                    .diagonal()
                    .iter()
                    .zip(matrix.diagonal().iter())
                    .any(|(pivot, diag)| pivot.abs() <= PIVOT_TOLERANCE * diag.abs());
                if singular {
                    log::debug!("Dense LU factorization found a zero pivot");
                    return None;
                }
                Some(Self::Dense { matrix, factor })
            }
        }
    }

    fn solve(&self, rhs: &DVector<f64>) -> Option<DVector<f64>> {
        match self {
            Self::Skyline { factor, .. } => Some(factor.solve(rhs)),
            Self::Dense { factor, .. } => factor.solve(rhs),
        }
    }

    fn product(&self, u: &DVector<f64>) -> DVector<f64> {
        match self {
            Self::Skyline { matrix, .. } => sparse_matvec(matrix, u),
            Self::Dense { matrix, .. } => matrix * u,
        }
    }
}

/// Linear elastic frame solver implementing [`Solver`]
#[derive(Debug, Clone, Default)]
pub struct LinearFrameSolver {
    initialized: bool,
    nodes: Registry<NodeId, Node>,
    fixity: HashMap<NodeId, [bool; DOFS_PER_NODE]>,
    transforms: HashMap<TransformTag, [f64; 3]>,
    members: Registry<ElementId, FrameMember>,
    config: Option<AnalysisConfig>,
    patterns: Vec<ActivePattern>,
    /// Pattern receiving `add_nodal_load` calls
    loading: Option<PatternId>,
    /// Current displacement of every node, by registration position
    displacements: Vec<[f64; DOFS_PER_NODE]>,
    pseudo_time: f64,
    analyzed: bool,
}

impl LinearFrameSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags of the load patterns currently defined, in definition order
    pub fn active_load_patterns(&self) -> Vec<PatternId> {
        self.patterns.iter().map(|p| p.id).collect()
    }

    /// Pseudo-time reached by the last analysis
    pub fn pseudo_time(&self) -> f64 {
        self.pseudo_time
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn element_count(&self) -> usize {
        self.members.len()
    }

    fn ensure_initialized(&self) -> FrameResult<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(FrameError::SolverState(
                "model has not been initialized".to_string(),
            ))
        }
    }

    fn node_position(&self, node: NodeId) -> FrameResult<usize> {
        self.nodes
            .position(&node)
            .ok_or_else(|| FrameError::SolverState(format!("node {node} is not defined")))
    }

    /// Assign equation numbers to free dofs, node by node in numberer order
    fn number_equations(&self, numberer: NumbererKind) -> (DofMap, usize) {
        let order: Vec<usize> = match numberer {
            NumbererKind::Plain => (0..self.nodes.len()).collect(),
            NumbererKind::Rcm => {
                let mut adjacency = vec![Vec::new(); self.nodes.len()];
                for member in self.members.values() {
                    let [a, b] = member.ends;
                    adjacency[a].push(b);
                    adjacency[b].push(a);
                }
                reverse_cuthill_mckee(&adjacency)
            }
        };

        let mut dof_map: DofMap = vec![[None; DOFS_PER_NODE]; self.nodes.len()];
        let mut next = 0;
        for &position in &order {
            let fixity = self
                .nodes
                .get_index(position)
                .and_then(|(id, _)| self.fixity.get(id).copied())
                .unwrap_or_default();
            for (dof, fixed) in fixity.iter().enumerate() {
                if !fixed {
                    dof_map[position][dof] = Some(next);
                    next += 1;
                }
            }
        }
        (dof_map, next)
    }

    fn assemble_stiffness(&self, dof_map: &DofMap, num_equations: usize) -> SparseMatrixBuilder {
        let mut builder = SparseMatrixBuilder::new(num_equations);
        for member in self.members.values() {
            let mut equations = [None; 2 * DOFS_PER_NODE];
            for (end, &position) in member.ends.iter().enumerate() {
                equations[end * DOFS_PER_NODE..(end + 1) * DOFS_PER_NODE]
                    .copy_from_slice(&dof_map[position]);
            }
            for (a, row) in equations.iter().enumerate() {
                let Some(row) = *row else { continue };
                for (b, col) in equations.iter().enumerate() {
                    if let Some(col) = *col {
                        builder.add(row, col, member.k_global[(a, b)]);
                    }
                }
            }
        }
        builder
    }

    /// Sum of all active patterns at unit load factor; loads on fixed dofs go to reactions
    fn reference_load(&self, dof_map: &DofMap, num_equations: usize) -> DVector<f64> {
        let mut reference = DVector::zeros(num_equations);
        for pattern in &self.patterns {
            for (position, load) in &pattern.loads {
                for (dof, value) in load.iter().enumerate() {
                    if let Some(eq) = dof_map[*position][dof] {
                        reference[eq] += value;
                    }
                }
            }
        }
        reference
    }

    fn gather(&self, dof_map: &DofMap, num_equations: usize) -> DVector<f64> {
        let mut u = DVector::zeros(num_equations);
        for (position, equations) in dof_map.iter().enumerate() {
            for (dof, eq) in equations.iter().enumerate() {
                if let Some(eq) = eq {
                    u[*eq] = self.displacements[position][dof];
                }
            }
        }
        u
    }

    fn scatter(&mut self, dof_map: &DofMap, u: &DVector<f64>) {
        for (position, equations) in dof_map.iter().enumerate() {
            for (dof, eq) in equations.iter().enumerate() {
                self.displacements[position][dof] = eq.map_or(0.0, |eq| u[eq]);
            }
        }
    }
}

impl Solver for LinearFrameSolver {
    fn reset_model(&mut self, dimensions: usize, dofs_per_node: usize) -> FrameResult<()> {
        if dimensions != DIMENSIONS || dofs_per_node != DOFS_PER_NODE {
            return Err(FrameError::InvalidDefinition(format!(
                "only {DIMENSIONS}D models with {DOFS_PER_NODE} dofs per node are supported, got {dimensions}D with {dofs_per_node}"
            )));
        }
        *self = Self {
            initialized: true,
            ..Self::default()
        };
        Ok(())
    }

    fn define_node(&mut self, id: NodeId, coords: [f64; 3]) -> FrameResult<()> {
        self.ensure_initialized()?;
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(FrameError::InvalidDefinition(format!(
                "node {id} has non-finite coordinates"
            )));
        }
        let [x, y, z] = coords;
        self.nodes.insert(id, Node::new(id, x, y, z)).map_err(|_| {
            FrameError::InvalidDefinition(format!("node {id} is already defined"))
        })?;
        self.displacements.push([0.0; DOFS_PER_NODE]);
        Ok(())
    }

    fn define_constraint(&mut self, node: NodeId, fixity: [bool; 6]) -> FrameResult<()> {
        self.ensure_initialized()?;
        self.node_position(node)?;
        self.fixity.insert(node, fixity);
        Ok(())
    }

    fn define_local_axis(&mut self, tag: TransformTag, vecxz: [f64; 3]) -> FrameResult<()> {
        self.ensure_initialized()?;
        if self.transforms.contains_key(&tag) {
            return Err(FrameError::InvalidDefinition(format!(
                "transform {tag} is already defined"
            )));
        }
        let norm = vecxz.iter().map(|v| v * v).sum::<f64>().sqrt();
        if !norm.is_finite() || norm == 0.0 {
            return Err(FrameError::InvalidDefinition(format!(
                "transform {tag} needs a non-zero x-z plane vector"
            )));
        }
        self.transforms.insert(tag, vecxz);
        Ok(())
    }

    fn define_element(&mut self, element: &ElementDefinition) -> FrameResult<()> {
        self.ensure_initialized()?;
        let id = element.id;
        if self.members.contains(&id) {
            return Err(FrameError::InvalidDefinition(format!(
                "element {id} is already defined"
            )));
        }
        let constants = [
            element.area,
            element.e,
            element.g,
            element.j,
            element.iy,
            element.iz,
        ];
        if constants.iter().any(|c| !c.is_finite() || *c <= 0.0) {
            return Err(FrameError::InvalidDefinition(format!(
                "element {id} needs positive section constants"
            )));
        }

        let [i_node, j_node] = element.nodes;
        let ends = [self.node_position(i_node)?, self.node_position(j_node)?];
        let end_node = |position: usize| {
            self.nodes
                .get_index(position)
                .map(|(_, node)| *node)
                .ok_or_else(|| FrameError::SolverState(format!("element {id} has an undefined end")))
        };
        let (i, j) = (end_node(ends[0])?, end_node(ends[1])?);
        let vecxz = self.transforms.get(&element.transform).ok_or_else(|| {
            FrameError::SolverState(format!(
                "transform {} of element {id} is not defined",
                element.transform
            ))
        })?;
        let t = member_transformation_matrix(&i.coords(), &j.coords(), vecxz).ok_or_else(|| {
            FrameError::InvalidDefinition(format!(
                "element {id} has zero length or its x-z vector is parallel to its axis"
            ))
        })?;
        let k_local = member_local_stiffness(
            element.e,
            element.g,
            element.area,
            element.iy,
            element.iz,
            element.j,
            i.distance_to(&j),
        );

        let member = FrameMember {
            ends,
            k_global: member_global_stiffness(&k_local, &t),
        };
        self.members
            .insert(id, member)
            .map_err(|_| FrameError::InvalidDefinition(format!("element {id} is already defined")))
    }

    fn define_load_pattern(
        &mut self,
        pattern: PatternId,
        time_series: TimeSeriesTag,
    ) -> FrameResult<()> {
        self.ensure_initialized()?;
        let defined = self.config.as_ref().map(AnalysisConfig::time_series_tag);
        if defined != Some(time_series) {
            return Err(FrameError::SolverState(format!(
                "time series {time_series} is not defined"
            )));
        }
        if self.patterns.iter().any(|p| p.id == pattern) {
            return Err(FrameError::InvalidDefinition(format!(
                "load pattern {pattern} is already defined"
            )));
        }
        self.patterns.push(ActivePattern {
            id: pattern,
            loads: Vec::new(),
        });
        self.loading = Some(pattern);
        Ok(())
    }

    fn add_nodal_load(&mut self, node: NodeId, load: [f64; 6]) -> FrameResult<()> {
        self.ensure_initialized()?;
        let position = self.node_position(node)?;
        let target = self.loading;
        let pattern = self
            .patterns
            .iter_mut()
            .find(|p| Some(p.id) == target)
            .ok_or_else(|| FrameError::SolverState("no load pattern to add to".to_string()))?;
        pattern.loads.push((position, load));
        Ok(())
    }

    fn remove_load_pattern(&mut self, pattern: PatternId) -> FrameResult<()> {
        self.ensure_initialized()?;
        let index = self
            .patterns
            .iter()
            .position(|p| p.id == pattern)
            .ok_or_else(|| FrameError::SolverState(format!("load pattern {pattern} is not defined")))?;
        self.patterns.remove(index);
        if self.loading == Some(pattern) {
            self.loading = None;
        }
        Ok(())
    }

    fn reset_analysis_state(&mut self) -> FrameResult<()> {
        self.ensure_initialized()?;
        self.displacements.fill([0.0; DOFS_PER_NODE]);
        self.pseudo_time = 0.0;
        self.analyzed = false;
        Ok(())
    }

    fn configure_analysis(&mut self, config: &AnalysisConfig) -> FrameResult<()> {
        self.ensure_initialized()?;
        config.validate()?;
        self.config = Some(config.clone());
        Ok(())
    }

    fn analyze(&mut self, num_steps: usize) -> FrameResult<ConvergenceCode> {
        self.ensure_initialized()?;
        let config = self
            .config
            .clone()
            .ok_or_else(|| FrameError::SolverState("analysis is not configured".to_string()))?;
        self.analyzed = true;

        let (dof_map, num_equations) = self.number_equations(config.numberer);
        log::debug!(
            "Analyzing {} nodes, {} elements, {} equations, {} pattern(s)",
            self.nodes.len(),
            self.members.len(),
            num_equations,
            self.patterns.len()
        );

        let increment = config.integrator.increment();
        if num_equations == 0 {
            self.pseudo_time += increment * num_steps as f64;
            return Ok(ConvergenceCode::SUCCESS);
        }

        let builder = self.assemble_stiffness(&dof_map, num_equations);
        let Some(system) = LinearSystem::factorize(config.system, &builder) else {
            return Ok(ConvergenceCode::SINGULAR);
        };

        let reference = self.reference_load(&dof_map, num_equations);
        let mut u = self.gather(&dof_map, num_equations);
        let ConvergenceTest::NormDispIncr {
            tolerance,
            max_iterations,
        } = config.test;

        for step in 1..=num_steps {
            self.pseudo_time += increment;
            let target = &reference * config.time_series.factor(self.pseudo_time);

            let iterations = match config.algorithm {
                Algorithm::Linear => 1,
                Algorithm::Newton => max_iterations,
            };
            let mut converged = config.algorithm == Algorithm::Linear;
            for iteration in 1..=iterations {
                let residual = &target - system.product(&u);
                let Some(du) = system.solve(&residual) else {
                    self.scatter(&dof_map, &u);
                    return Ok(ConvergenceCode::SINGULAR);
                };
                u += &du;

                let norm = du.norm();
                log::trace!("step {step} iteration {iteration}: |du| = {norm:e}");
                if config.algorithm == Algorithm::Newton && norm < tolerance {
                    converged = true;
                    break;
                }
            }

            self.scatter(&dof_map, &u);
            if !converged {
                log::debug!("step {step} did not converge in {max_iterations} iterations");
                return Ok(ConvergenceCode::NOT_CONVERGED);
            }
        }

        Ok(ConvergenceCode::SUCCESS)
    }

    fn query_displacement(&self, node: NodeId, time_index: usize) -> FrameResult<[f64; 6]> {
        self.ensure_initialized()?;
        if time_index != 0 {
            return Err(FrameError::SolverState(format!(
                "only the current state (time index 0) is kept, got {time_index}"
            )));
        }
        if !self.analyzed {
            return Err(FrameError::SolverState(
                "no analysis since the last reset".to_string(),
            ));
        }
        let position = self.node_position(node)?;
        Ok(self.displacements[position])
    }
}

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use frame_sim::analysis::TimeSeriesTag;
use frame_sim::elements::{ElementId, TransformTag};
use frame_sim::prelude::*;
use frame_sim::solver::PatternId;

pub const MATERIALS_CSV: &str = "materials,E,G,density\nsteel,2e11,8e10,7850\n";
pub const SECTIONS_CSV: &str = "sections,Area,Iz,Iy,J,material\nbox,0.01,1e-6,1e-6,1e-6,steel\n";
pub const NODES_CSV: &str = "node,x,y,z\n1,0,0,0\n2,1,0,0\n";
pub const CONSTRAINTS_CSV: &str = "node,x,y,z,rot_x,rot_y,rot_z\n1,1,1,1,1,1,1\n";
pub const ELEMENTS_CSV: &str =
    "element,node1,node2,section,localxz_x,localxz_y,localxz_z\n1,1,2,box,0,0,1\n";

/// PL³/3EI of the unit cantilever under a 1000 N tip load
pub const CANTILEVER_TIP_DY: f64 = 1000.0 / (3.0 * 2e11 * 1e-6);

/// One-element cantilever along X, fixed at node 1
pub fn cantilever_tables() -> ModelTables {
    ModelTables {
        materials: parse_table(MATERIALS_CSV.as_bytes()).unwrap(),
        sections: parse_table(SECTIONS_CSV.as_bytes()).unwrap(),
        nodes: parse_table(NODES_CSV.as_bytes()).unwrap(),
        constraints: parse_table(CONSTRAINTS_CSV.as_bytes()).unwrap(),
        elements: parse_table(ELEMENTS_CSV.as_bytes()).unwrap(),
    }
}

/// Portal frame in the XY plane: two fixed columns and a beam
pub fn portal_tables() -> ModelTables {
    ModelTables {
        materials: parse_table(MATERIALS_CSV.as_bytes()).unwrap(),
        sections: parse_table(SECTIONS_CSV.as_bytes()).unwrap(),
        nodes: parse_table("node,x,y,z\n1,0,0,0\n2,0,3,0\n3,4,3,0\n4,4,0,0\n".as_bytes())
            .unwrap(),
        constraints: parse_table(
            "node,x,y,z,rot_x,rot_y,rot_z\n1,1,1,1,1,1,1\n4,1,1,1,1,1,1\n".as_bytes(),
        )
        .unwrap(),
        elements: parse_table(
            "element,node1,node2,section,localxz_x,localxz_y,localxz_z\n\
             1,1,2,box,0,0,1\n\
             2,2,3,box,0,0,1\n\
             3,4,3,box,0,0,1\n"
                .as_bytes(),
        )
        .unwrap(),
    }
}

/// Write the cantilever tables into `dir` and return their paths
pub fn write_cantilever_files(dir: &Path) -> ModelPaths {
    let write = |name: &str, contents: &str| -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    };
    ModelPaths {
        materials: write("materials.csv", MATERIALS_CSV),
        sections: write("sections.csv", SECTIONS_CSV),
        nodes: write("nodes.csv", NODES_CSV),
        constraints: write("constraints.csv", CONSTRAINTS_CSV),
        elements: write("elements.csv", ELEMENTS_CSV),
    }
}

/// A solver call as seen by [`RecordingSolver`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ResetModel(usize, usize),
    Node(NodeId),
    Constraint(NodeId),
    LocalAxis(TransformTag),
    Element(ElementId, TransformTag),
    LoadPattern(PatternId, TimeSeriesTag),
    NodalLoad(NodeId, [f64; 6]),
    RemovePattern(PatternId),
    ResetAnalysis,
    Configure,
    Analyze(usize),
}

/// Wraps the linear solver and records every call made to it
#[derive(Debug, Default)]
pub struct RecordingSolver {
    pub inner: LinearFrameSolver,
    pub calls: Vec<Call>,
    /// Nodal loads on this node are rejected
    pub reject_loads_on: Option<NodeId>,
}

impl RecordingSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting_loads_on(node: NodeId) -> Self {
        Self {
            reject_loads_on: Some(node),
            ..Self::default()
        }
    }
}

impl Solver for RecordingSolver {
    fn reset_model(&mut self, dimensions: usize, dofs_per_node: usize) -> FrameResult<()> {
        self.calls.push(Call::ResetModel(dimensions, dofs_per_node));
        self.inner.reset_model(dimensions, dofs_per_node)
    }

    fn define_node(&mut self, id: NodeId, coords: [f64; 3]) -> FrameResult<()> {
        self.calls.push(Call::Node(id));
        self.inner.define_node(id, coords)
    }

    fn define_constraint(&mut self, node: NodeId, fixity: [bool; 6]) -> FrameResult<()> {
        self.calls.push(Call::Constraint(node));
        self.inner.define_constraint(node, fixity)
    }

    fn define_local_axis(&mut self, tag: TransformTag, vecxz: [f64; 3]) -> FrameResult<()> {
        self.calls.push(Call::LocalAxis(tag));
        self.inner.define_local_axis(tag, vecxz)
    }

    fn define_element(&mut self, element: &ElementDefinition) -> FrameResult<()> {
        self.calls.push(Call::Element(element.id, element.transform));
        self.inner.define_element(element)
    }

    fn define_load_pattern(
        &mut self,
        pattern: PatternId,
        time_series: TimeSeriesTag,
    ) -> FrameResult<()> {
        self.calls.push(Call::LoadPattern(pattern, time_series));
        self.inner.define_load_pattern(pattern, time_series)
    }

    fn add_nodal_load(&mut self, node: NodeId, load: [f64; 6]) -> FrameResult<()> {
        self.calls.push(Call::NodalLoad(node, load));
        if self.reject_loads_on == Some(node) {
            return Err(FrameError::SolverState(format!("loads on node {node} rejected")));
        }
        self.inner.add_nodal_load(node, load)
    }

    fn remove_load_pattern(&mut self, pattern: PatternId) -> FrameResult<()> {
        self.calls.push(Call::RemovePattern(pattern));
        self.inner.remove_load_pattern(pattern)
    }

    fn reset_analysis_state(&mut self) -> FrameResult<()> {
        self.calls.push(Call::ResetAnalysis);
        self.inner.reset_analysis_state()
    }

    fn configure_analysis(&mut self, config: &AnalysisConfig) -> FrameResult<()> {
        self.calls.push(Call::Configure);
        self.inner.configure_analysis(config)
    }

    fn analyze(&mut self, num_steps: usize) -> FrameResult<ConvergenceCode> {
        self.calls.push(Call::Analyze(num_steps));
        self.inner.analyze(num_steps)
    }

    fn query_displacement(&self, node: NodeId, time_index: usize) -> FrameResult<[f64; 6]> {
        self.inner.query_displacement(node, time_index)
    }
}

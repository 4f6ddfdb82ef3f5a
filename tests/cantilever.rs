mod common;

use approx::assert_relative_eq;
use common::{cantilever_tables, Call, RecordingSolver, CANTILEVER_TIP_DY};
use frame_sim::prelude::*;

#[test]
fn cantilever_tip_load_converges_with_beam_theory_deflection() {
    let mut sim = Simulation::new(
        LinearFrameSolver::new(),
        &cantilever_tables(),
        AnalysisConfig::default(),
    )
    .unwrap();

    let report = sim
        .run_load_case(&[LoadRow::new(2, 0.0, 1000.0, 0.0)])
        .unwrap();
    assert_eq!(report.outcome, AnalysisOutcome::Converged);
    assert_eq!(report.pattern, 1);

    let tip = sim.results().get(2).unwrap();
    assert!(tip.dy != 0.0);
    assert_relative_eq!(tip.dy, CANTILEVER_TIP_DY, max_relative = 1e-9);
    assert_relative_eq!(tip.rz, 1000.0 / (2.0 * 2e11 * 1e-6), max_relative = 1e-9);

    let root = sim.results().get(1).unwrap();
    assert_eq!(root.as_array(), [0.0; 6]);
}

#[test]
fn build_mirrors_registrations_in_order() {
    let mut solver = RecordingSolver::new();
    let model = build(&mut solver, &cantilever_tables()).unwrap();
    assert_eq!(model.nodes().len(), 2);

    assert_eq!(
        solver.calls,
        vec![
            Call::ResetModel(3, 6),
            Call::Node(1),
            Call::Node(2),
            Call::Constraint(1),
            Call::LocalAxis(1),
            Call::Element(1, 1),
        ]
    );
}

#[test]
fn every_solver_option_gives_the_same_deflection() {
    let configs = [
        AnalysisConfig::default(),
        AnalysisConfig::default().with_numberer(NumbererKind::Plain),
        AnalysisConfig::default().with_system(SystemKind::FullGeneral),
        AnalysisConfig::default().with_algorithm(frame_sim::analysis::Algorithm::Linear),
    ];

    for config in configs {
        let mut sim =
            Simulation::new(LinearFrameSolver::new(), &cantilever_tables(), config).unwrap();
        let report = sim
            .run_load_case(&[LoadRow::new(2, 0.0, 1000.0, 0.0)])
            .unwrap();
        assert!(report.outcome.is_converged());
        assert_relative_eq!(
            sim.results().get(2).unwrap().dy,
            CANTILEVER_TIP_DY,
            max_relative = 1e-9
        );
    }
}

#[test]
fn unsupported_model_reports_not_converged() {
    let mut tables = cantilever_tables();
    tables.constraints.clear();

    let mut sim =
        Simulation::new(LinearFrameSolver::new(), &tables, AnalysisConfig::default()).unwrap();
    let report = sim
        .run_load_case(&[LoadRow::new(2, 0.0, 1000.0, 0.0)])
        .unwrap();
    assert_eq!(report.outcome, AnalysisOutcome::NotConverged);
}

#[test]
fn portal_frame_sway_is_antisymmetric() {
    let mut sim = Simulation::new(
        LinearFrameSolver::new(),
        &common::portal_tables(),
        AnalysisConfig::default(),
    )
    .unwrap();

    sim.run_load_case(&[LoadRow::new(2, 1000.0, 0.0, 0.0)])
        .unwrap();
    let left = *sim.results().get(2).unwrap();
    let right = *sim.results().get(3).unwrap();

    // Both beam ends sway the same way; the loaded side moves slightly more
    assert!(left.dx > 0.0 && right.dx > 0.0);
    assert!(left.dx >= right.dx);
    assert_relative_eq!(left.dz, 0.0, epsilon = 1e-15);
    assert_eq!(sim.results().get(1).unwrap().as_array(), [0.0; 6]);
    assert_eq!(sim.results().get(4).unwrap().as_array(), [0.0; 6]);
}

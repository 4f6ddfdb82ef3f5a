//! frame-sim command line driver
//!
//! Builds a frame model from five CSV tables, then analyzes each load-case
//! table in turn and writes one displacement file per case.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;

use frame_sim::prelude::*;

/// Create 3D frame models from CSV tables and analyze them load case by load case
#[derive(Parser, Debug)]
#[command(name = "frame-sim", version)]
struct Cli {
    /// Materials table (materials,E,G,density)
    #[arg(short, long)]
    materials: PathBuf,

    /// Sections table (sections,Area,Iz,Iy,J,material)
    #[arg(short, long)]
    sections: PathBuf,

    /// Nodes table (node,x,y,z)
    #[arg(short, long)]
    nodes: PathBuf,

    /// Elements table (element,node1,node2,section,localxz_x,localxz_y,localxz_z)
    #[arg(short, long)]
    elements: PathBuf,

    /// Constraints table (node,x,y,z,rot_x,rot_y,rot_z)
    #[arg(short, long)]
    constraints: PathBuf,

    /// Load-case table (node,fx,fy,fz); repeat for several cases
    #[arg(short = 'l', long = "loads", required = true)]
    loads: Vec<PathBuf>,

    /// Displacement output per load case, paired by position
    #[arg(short, long = "output")]
    output: Vec<PathBuf>,

    /// Analysis parameters as JSON; defaults apply to missing fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write deformed-shape JSON for each load case
    #[arg(long)]
    shape: Option<PathBuf>,

    /// Displacement magnification for the deformed shape
    #[arg(long, default_value_t = 100.0)]
    scale: f64,

    /// Stop without writing output when an analysis does not converge
    #[arg(long, default_value_t = false)]
    abort_on_divergence: bool,
}

const DEFAULT_OUTPUT: &str = "output_displacements.csv";

/// Output file of load case `k` (1-based) out of `total`
fn output_path(outputs: &[PathBuf], k: usize, total: usize) -> PathBuf {
    match outputs.get(k - 1) {
        Some(path) => path.clone(),
        None if total == 1 => PathBuf::from(DEFAULT_OUTPUT),
        None => PathBuf::from(format!("output_displacements_{k}.csv")),
    }
}

/// `base` with `_<k>` before the extension when there are several load cases
fn numbered_path(base: &Path, k: usize, total: usize) -> PathBuf {
    if total == 1 {
        return base.to_path_buf();
    }
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match base.extension() {
        Some(ext) => format!("{stem}_{k}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{k}"),
    };
    base.with_file_name(name)
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("Failed to load analysis config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    let paths = ModelPaths {
        materials: cli.materials,
        sections: cli.sections,
        nodes: cli.nodes,
        constraints: cli.constraints,
        elements: cli.elements,
    };
    let mut sim = Simulation::from_paths(LinearFrameSolver::new(), &paths, config)
        .context("Failed to build the frame model")?;

    let total = cli.loads.len();
    for (index, load_path) in cli.loads.iter().enumerate() {
        let k = index + 1;
        let rows = read_load_table(load_path)
            .with_context(|| format!("Failed to read load case {}", load_path.display()))?;
        let report = sim
            .run_load_case(&rows)
            .with_context(|| format!("Load case {} failed", load_path.display()))?;

        if !report.outcome.is_converged() {
            if cli.abort_on_divergence {
                bail!("Analysis of {} did not converge", load_path.display());
            }
            log::warn!(
                "Writing results of non-converged load case {}",
                load_path.display()
            );
        }

        let output = output_path(&cli.output, k, total);
        sim.persist_results(&output)?;
        println!(
            "Load case {} ({}): {:?}, displacements written to {}",
            k,
            load_path.display(),
            report.outcome,
            output.display()
        );

        if let Some(shape_base) = &cli.shape {
            let shape_path = numbered_path(shape_base, k, total);
            sim.deformed_shape(cli.scale).save(&shape_path)?;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    run(Cli::parse())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_case_default_output() {
        assert_eq!(output_path(&[], 1, 1), PathBuf::from("output_displacements.csv"));
    }

    #[test]
    fn test_missing_outputs_are_numbered() {
        let outputs = vec![PathBuf::from("first.csv")];
        assert_eq!(output_path(&outputs, 1, 3), PathBuf::from("first.csv"));
        assert_eq!(
            output_path(&outputs, 3, 3),
            PathBuf::from("output_displacements_3.csv")
        );
    }

    #[test]
    fn test_shape_paths() {
        let base = Path::new("out/shape.json");
        assert_eq!(numbered_path(base, 1, 1), PathBuf::from("out/shape.json"));
        assert_eq!(numbered_path(base, 2, 4), PathBuf::from("out/shape_2.json"));
        assert_eq!(numbered_path(Path::new("shape"), 2, 2), PathBuf::from("shape_2"));
    }

    #[test]
    fn test_cli_accepts_repeated_load_cases() {
        let cli = Cli::try_parse_from([
            "frame-sim", "-m", "m.csv", "-s", "s.csv", "-n", "n.csv", "-e", "e.csv", "-c",
            "c.csv", "-l", "a.csv", "-l", "b.csv", "-o", "out_a.csv",
        ])
        .unwrap();
        assert_eq!(cli.loads.len(), 2);
        assert_eq!(cli.output, vec![PathBuf::from("out_a.csv")]);
        assert!(!cli.abort_on_divergence);
        assert_eq!(cli.scale, 100.0);
    }
}

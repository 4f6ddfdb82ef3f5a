//! Displacement file format
//!
//! ```text
//! node, dx, dy, dz, rot_x, rot_y, rot_z
//! 1, 0.000000, 0.000000, 0.000000, 0.000000, 0.000000, 0.000000
//! 2, 0.000000, 0.001667, 0.000000, 0.000000, 0.000000, 0.002500
//! ```
//!
//! One row per node in result order, six decimals, never scientific notation.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use serde::Deserialize;

use super::{DisplacementMap, NodeDisplacement};
use crate::elements::NodeId;
use crate::error::{EntityKind, FrameError, FrameResult, RowRef, TableKind};

const HEADER: &str = "node, dx, dy, dz, rot_x, rot_y, rot_z";

#[derive(Debug, Deserialize)]
struct DisplacementRow {
    node: NodeId,
    dx: f64,
    dy: f64,
    dz: f64,
    rot_x: f64,
    rot_y: f64,
    rot_z: f64,
}

/// Write results in the displacement file format
pub fn write_displacements<W: Write>(
    results: &DisplacementMap,
    mut writer: W,
) -> std::io::Result<()> {
    writeln!(writer, "{HEADER}")?;
    for (node, d) in results.iter() {
        writeln!(
            writer,
            "{}, {:.6}, {:.6}, {:.6}, {:.6}, {:.6}, {:.6}",
            node, d.dx, d.dy, d.dz, d.rx, d.ry, d.rz
        )?;
    }
    writer.flush()
}

/// Write results to a file, replacing it
pub fn persist(results: &DisplacementMap, path: &Path) -> FrameResult<()> {
    let file = File::create(path).map_err(|e| FrameError::io(path, e))?;
    write_displacements(results, BufWriter::new(file)).map_err(|e| FrameError::io(path, e))?;
    log::info!("Wrote {} displacements to {}", results.len(), path.display());
    Ok(())
}

/// Parse the displacement file format
pub fn parse_displacements<R: Read>(reader: R) -> FrameResult<DisplacementMap> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut results = DisplacementMap::new();
    for (index, record) in csv_reader.deserialize::<DisplacementRow>().enumerate() {
        let row = record.map_err(|e| FrameError::TableSchema {
            table: TableKind::Displacements,
            row: Some(index + 1),
            reason: e.to_string(),
        })?;
        let displacement = NodeDisplacement::from_array([
            row.dx, row.dy, row.dz, row.rot_x, row.rot_y, row.rot_z,
        ]);
        results
            .insert(row.node, displacement)
            .map_err(|_| FrameError::DuplicateIdentifier {
                kind: EntityKind::Node,
                id: row.node.to_string(),
                referrer: RowRef::at(TableKind::Displacements, index),
            })?;
    }
    Ok(results)
}

/// Read a displacement file written by [`persist`]
pub fn read_displacements(path: &Path) -> FrameResult<DisplacementMap> {
    let file = File::open(path).map_err(|e| FrameError::io(path, e))?;
    parse_displacements(file)
}

//! Table loading
//!
//! Reads the five structural-definition tables and the load-case tables from
//! CSV sources. Columns are matched by header name, so their order within a
//! row does not matter and extra columns are ignored. Nothing beyond header
//! presence and type coercion is validated here; referential checks belong
//! to the model builder.

mod rows;

pub use rows::{
    ConstraintRow, ElementRow, LoadRow, MaterialRow, NodeRow, SectionRow, TableRow,
};

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{FrameError, FrameResult};

/// Rows of one load case, in table order
pub type LoadTable = Vec<LoadRow>;

/// Parse a table from any reader
pub fn parse_table<R: TableRow, Rd: Read>(reader: Rd) -> FrameResult<Vec<R>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(|e| FrameError::TableSchema {
        table: R::TABLE,
        row: None,
        reason: e.to_string(),
    })?;
    if let Some(missing) = R::COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        return Err(FrameError::TableSchema {
            table: R::TABLE,
            row: None,
            reason: format!("missing column '{missing}'"),
        });
    }

    csv_reader
        .deserialize::<R>()
        .enumerate()
        .map(|(i, record)| {
            record.map_err(|e| FrameError::TableSchema {
                table: R::TABLE,
                row: Some(i + 1),
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Read a table from a CSV file
pub fn read_table<R: TableRow>(path: &Path) -> FrameResult<Vec<R>> {
    let file = File::open(path).map_err(|e| FrameError::io(path, e))?;
    let rows = parse_table(file)?;
    log::debug!("Read {} {} rows from {}", rows.len(), R::TABLE, path.display());
    Ok(rows)
}

/// Read one load-case table
pub fn read_load_table(path: &Path) -> FrameResult<LoadTable> {
    read_table(path)
}

/// File locations of the five structural tables
#[derive(Debug, Clone)]
pub struct ModelPaths {
    pub materials: PathBuf,
    pub sections: PathBuf,
    pub nodes: PathBuf,
    pub constraints: PathBuf,
    pub elements: PathBuf,
}

/// The five structural tables of one model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelTables {
    pub materials: Vec<MaterialRow>,
    pub sections: Vec<SectionRow>,
    pub nodes: Vec<NodeRow>,
    pub constraints: Vec<ConstraintRow>,
    pub elements: Vec<ElementRow>,
}

impl ModelTables {
    /// Load every table; any schema problem surfaces before the model is built
    pub fn load(paths: &ModelPaths) -> FrameResult<Self> {
        Ok(Self {
            materials: read_table(&paths.materials)?,
            sections: read_table(&paths.sections)?,
            nodes: read_table(&paths.nodes)?,
            constraints: read_table(&paths.constraints)?,
            elements: read_table(&paths.elements)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TableKind;

    #[test]
    fn test_columns_matched_by_name() {
        let csv = "z, y, x, node\n3.0, 2.0, 1.0, 5\n";
        let rows: Vec<NodeRow> = parse_table(csv.as_bytes()).unwrap();
        assert_eq!(rows, vec![NodeRow { node: 5, x: 1.0, y: 2.0, z: 3.0 }]);
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let csv = "node,fx,fy\n1,0,0\n";
        let err = parse_table::<LoadRow, _>(csv.as_bytes()).unwrap_err();
        match err {
            FrameError::TableSchema { table, row, reason } => {
                assert_eq!(table, TableKind::Loads);
                assert_eq!(row, None);
                assert!(reason.contains("fz"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_untypeable_value_reports_row() {
        let csv = "materials,E,G,density\nsteel,2e11,8e10,7850\nwood,soft,1e9,500\n";
        let err = parse_table::<MaterialRow, _>(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            FrameError::TableSchema { table: TableKind::Materials, row: Some(2), .. }
        ));
    }

    #[test]
    fn test_fixity_flags() {
        let csv = "node,x,y,z,rot_x,rot_y,rot_z\n1,1,1,1,0,0,0\n2,true,false,1.0,0.0,0,1\n";
        let rows: Vec<ConstraintRow> = parse_table(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].fixity(), [true, true, true, false, false, false]);
        assert_eq!(rows[1].fixity(), [true, false, true, false, false, true]);
    }

    #[test]
    fn test_header_only_table_is_empty() {
        let rows: Vec<LoadRow> = parse_table("node,fx,fy,fz\n".as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_extra_columns_ignored() {
        let csv = "sections,Area,Iz,Iy,J,material,comment\nbox,0.01,1e-6,1e-6,1e-6,steel,hollow\n";
        let rows: Vec<SectionRow> = parse_table(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].material, "steel");
        assert_eq!(rows[0].area, 0.01);
    }
}

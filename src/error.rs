//! Error types for frame-sim

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Kind of entity an identifier refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Material,
    Section,
    Node,
    Element,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Material => "material",
            Self::Section => "section",
            Self::Node => "node",
            Self::Element => "element",
        };
        f.write_str(name)
    }
}

/// The input tables understood by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Materials,
    Sections,
    Nodes,
    Constraints,
    Elements,
    Loads,
    Displacements,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Materials => "materials",
            Self::Sections => "sections",
            Self::Nodes => "nodes",
            Self::Constraints => "constraints",
            Self::Elements => "elements",
            Self::Loads => "loads",
            Self::Displacements => "displacements",
        };
        f.write_str(name)
    }
}

/// Location of a row inside an input table (row is 1-based, header excluded)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRef {
    pub table: TableKind,
    pub row: usize,
}

impl RowRef {
    pub fn new(table: TableKind, row: usize) -> Self {
        Self { table, row }
    }

    /// Reference for the row at a 0-based position in a parsed table
    pub fn at(table: TableKind, index: usize) -> Self {
        Self::new(table, index + 1)
    }
}

impl fmt::Display for RowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} row {}", self.table, self.row)
    }
}

/// Main error type for model building, load cases and solver calls
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("{referrer} references undefined {kind} '{id}'")]
    ReferentialIntegrity {
        kind: EntityKind,
        id: String,
        referrer: RowRef,
    },

    #[error("duplicate {kind} '{id}' at {referrer}")]
    DuplicateIdentifier {
        kind: EntityKind,
        id: String,
        referrer: RowRef,
    },

    #[error("{table} table{}: {reason}", .row.map(|r| format!(" row {r}")).unwrap_or_default())]
    TableSchema {
        table: TableKind,
        row: Option<usize>,
        reason: String,
    },

    #[error("Solver state error: {0}")]
    SolverState(String),

    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl FrameError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn undefined(kind: EntityKind, id: impl ToString, referrer: RowRef) -> Self {
        Self::ReferentialIntegrity {
            kind,
            id: id.to_string(),
            referrer,
        }
    }
}

/// Result type for frame-sim operations
pub type FrameResult<T> = Result<T, FrameError>;

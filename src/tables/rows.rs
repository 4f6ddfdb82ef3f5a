//! Row schemas of the input tables

use serde::{Deserialize, Deserializer, Serialize};

use crate::elements::{ElementId, NodeId};
use crate::error::TableKind;

/// A row type that can be read from a named-column table
pub trait TableRow: serde::de::DeserializeOwned {
    /// Which table this row belongs to
    const TABLE: TableKind;
    /// Column names that must be present in the header
    const COLUMNS: &'static [&'static str];
}

/// `materials,E,G,density`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRow {
    #[serde(rename = "materials")]
    pub name: String,
    #[serde(rename = "E")]
    pub e: f64,
    #[serde(rename = "G")]
    pub g: f64,
    pub density: f64,
}

impl TableRow for MaterialRow {
    const TABLE: TableKind = TableKind::Materials;
    const COLUMNS: &'static [&'static str] = &["materials", "E", "G", "density"];
}

/// `sections,Area,Iz,Iy,J,material`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRow {
    #[serde(rename = "sections")]
    pub name: String,
    #[serde(rename = "Area")]
    pub area: f64,
    #[serde(rename = "Iz")]
    pub iz: f64,
    #[serde(rename = "Iy")]
    pub iy: f64,
    #[serde(rename = "J")]
    pub j: f64,
    pub material: String,
}

impl TableRow for SectionRow {
    const TABLE: TableKind = TableKind::Sections;
    const COLUMNS: &'static [&'static str] = &["sections", "Area", "Iz", "Iy", "J", "material"];
}

/// `node,x,y,z`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeRow {
    pub node: NodeId,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl TableRow for NodeRow {
    const TABLE: TableKind = TableKind::Nodes;
    const COLUMNS: &'static [&'static str] = &["node", "x", "y", "z"];
}

/// `node,x,y,z,rot_x,rot_y,rot_z`; a non-zero flag marks the dof as fixed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintRow {
    pub node: NodeId,
    #[serde(deserialize_with = "fixity_flag")]
    pub x: bool,
    #[serde(deserialize_with = "fixity_flag")]
    pub y: bool,
    #[serde(deserialize_with = "fixity_flag")]
    pub z: bool,
    #[serde(deserialize_with = "fixity_flag")]
    pub rot_x: bool,
    #[serde(deserialize_with = "fixity_flag")]
    pub rot_y: bool,
    #[serde(deserialize_with = "fixity_flag")]
    pub rot_z: bool,
}

impl ConstraintRow {
    /// Flags ordered [DX, DY, DZ, RX, RY, RZ]
    pub fn fixity(&self) -> [bool; 6] {
        [self.x, self.y, self.z, self.rot_x, self.rot_y, self.rot_z]
    }
}

impl TableRow for ConstraintRow {
    const TABLE: TableKind = TableKind::Constraints;
    const COLUMNS: &'static [&'static str] = &["node", "x", "y", "z", "rot_x", "rot_y", "rot_z"];
}

/// `element,node1,node2,section,localxz_x,localxz_y,localxz_z`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRow {
    pub element: ElementId,
    pub node1: NodeId,
    pub node2: NodeId,
    pub section: String,
    pub localxz_x: f64,
    pub localxz_y: f64,
    pub localxz_z: f64,
}

impl ElementRow {
    pub fn local_xz(&self) -> [f64; 3] {
        [self.localxz_x, self.localxz_y, self.localxz_z]
    }
}

impl TableRow for ElementRow {
    const TABLE: TableKind = TableKind::Elements;
    const COLUMNS: &'static [&'static str] = &[
        "element",
        "node1",
        "node2",
        "section",
        "localxz_x",
        "localxz_y",
        "localxz_z",
    ];
}

/// `node,fx,fy,fz`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadRow {
    pub node: NodeId,
    pub fx: f64,
    pub fy: f64,
    pub fz: f64,
}

impl LoadRow {
    pub fn new(node: NodeId, fx: f64, fy: f64, fz: f64) -> Self {
        Self { node, fx, fy, fz }
    }
}

impl TableRow for LoadRow {
    const TABLE: TableKind = TableKind::Loads;
    const COLUMNS: &'static [&'static str] = &["node", "fx", "fy", "fz"];
}

/// Accepts integer or float flags (non-zero = fixed) and `true`/`false`
fn fixity_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let text = raw.trim();
    if text.eq_ignore_ascii_case("true") {
        return Ok(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return Ok(false);
    }
    text.parse::<f64>()
        .map(|value| value != 0.0)
        .map_err(|_| serde::de::Error::custom(format!("invalid fixity flag '{text}'")))
}

//! Section properties for frame elements

use serde::{Deserialize, Serialize};

use super::Material;

/// Cross-section properties with the stiffness constants of its material resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Unique section name
    pub name: String,
    /// Cross-sectional area
    pub area: f64,
    /// Moment of inertia about local z-axis
    pub iz: f64,
    /// Moment of inertia about local y-axis
    pub iy: f64,
    /// Torsional constant
    pub j: f64,
    /// Name of the material the section was resolved from
    pub material: String,
    /// Modulus of elasticity copied from the material
    pub e: f64,
    /// Shear modulus copied from the material
    pub g: f64,
    /// Mass per unit length (density * area)
    pub mass_per_length: f64,
}

impl Section {
    /// Create a section from its geometric constants and an already resolved material
    pub fn resolve(name: &str, area: f64, iz: f64, iy: f64, j: f64, material: &Material) -> Self {
        Self {
            name: name.to_string(),
            area,
            iz,
            iy,
            j,
            material: material.name.clone(),
            e: material.e,
            g: material.g,
            mass_per_length: material.density * area,
        }
    }
}

//! Material properties

use serde::{Deserialize, Serialize};

/// Elastic material referenced by sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Unique material name
    pub name: String,
    /// Modulus of elasticity (Young's modulus)
    pub e: f64,
    /// Shear modulus
    pub g: f64,
    /// Mass density
    pub density: f64,
}

impl Material {
    /// Create a new material with given properties
    pub fn new(name: &str, e: f64, g: f64, density: f64) -> Self {
        Self {
            name: name.to_string(),
            e,
            g,
            density,
        }
    }
}

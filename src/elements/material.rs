//! Pile material properties

use serde::{Deserialize, Serialize};

/// Material properties of the pile (kPa, kN/m³)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    /// Modulus of elasticity (Young's modulus) in kPa
    pub e: f64,
    /// Poisson's ratio
    pub nu: f64,
    /// Unit weight in kN/m³
    pub unit_weight: f64,
}

impl Material {
    /// Create a new material with given properties
    pub fn new(e: f64, nu: f64, unit_weight: f64) -> Self {
        Self { e, nu, unit_weight }
    }

    /// Structural steel
    pub fn steel() -> Self {
        Self {
            e: 210.0e6,        // 210 GPa
            nu: 0.3,
            unit_weight: 78.0, // kN/m³
        }
    }

    /// Shear modulus G = E / (2 + 2ν)
    pub fn g(&self) -> f64 {
        self.e / (2.0 + 2.0 * self.nu)
    }

    /// Override the Young's modulus
    pub fn with_young_modulus(mut self, e: f64) -> Self {
        self.e = e;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::steel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shear_modulus() {
        let mat = Material::new(200e6, 0.25, 78.0);
        assert!((mat.g() - 80e6).abs() < 1e-6);
    }

    #[test]
    fn test_steel_properties() {
        let steel = Material::steel();
        assert_eq!(steel.e, 210.0e6);
        assert_eq!(steel.unit_weight, 78.0);
    }
}

//! Pile cross-sections

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// One segment of the pile with a constant hollow circular cross-section
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PileSection {
    /// Segment length in m
    pub length: f64,
    /// Outer diameter in m
    pub diameter: f64,
    /// Wall thickness in m
    pub wall_thickness: f64,
}

impl PileSection {
    /// Create a new pile section
    pub fn new(length: f64, diameter: f64, wall_thickness: f64) -> Self {
        Self {
            length,
            diameter,
            wall_thickness,
        }
    }

    /// Cross-sectional area of the tube
    pub fn area(&self) -> f64 {
        let d_i = self.diameter - 2.0 * self.wall_thickness;
        PI / 4.0 * (self.diameter.powi(2) - d_i.powi(2))
    }

    /// Second moment of area of the tube
    pub fn second_moment_of_area(&self) -> f64 {
        let d_i = self.diameter - 2.0 * self.wall_thickness;
        PI / 64.0 * (self.diameter.powi(4) - d_i.powi(4))
    }
}

/// Structural properties of a pile segment located by elevation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SectionProperties {
    /// Top elevation of the segment in m
    pub top: f64,
    /// Bottom elevation of the segment in m
    pub bottom: f64,
    /// Outer diameter (pile width) in m
    pub diameter: f64,
    /// Wall thickness in m, `None` once area, inertia or width is overridden
    pub wall_thickness: Option<f64>,
    /// Cross-sectional area in m²
    pub area: f64,
    /// Second moment of area in m⁴
    pub second_moment_of_area: f64,
}

impl SectionProperties {
    /// Properties of a hollow circular section spanning `top` to `bottom`
    pub fn pipe(top: f64, bottom: f64, section: &PileSection) -> Self {
        Self {
            top,
            bottom,
            diameter: section.diameter,
            wall_thickness: Some(section.wall_thickness),
            area: section.area(),
            second_moment_of_area: section.second_moment_of_area(),
        }
    }

    /// Timoshenko shear coefficient of a hollow circle (Hutchinson, 2001).
    /// Falls back to the solid circle when the wall thickness is unknown.
    pub fn shear_coefficient(&self, nu: f64) -> f64 {
        let a = 0.5 * self.diameter;
        let b = match self.wall_thickness {
            Some(t) => (0.5 * (self.diameter - 2.0 * t)).max(0.0),
            None => 0.0,
        };
        let (a2, b2) = (a * a, b * b);
        let (a4, b4) = (a2 * a2, b2 * b2);

        let num = 6.0 * (a2 + b2).powi(2) * (1.0 + nu).powi(2);
        let den = 7.0 * a4 + 34.0 * a2 * b2 + 7.0 * b4
            + nu * (12.0 * a4 + 48.0 * a2 * b2 + 12.0 * b4)
            + nu * nu * (4.0 * a4 + 16.0 * a2 * b2 + 4.0 * b4);
        num / den
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pipe_properties() {
        let s = PileSection::new(40.0, 2.0, 0.08);
        let d_i: f64 = 2.0 - 0.16;
        assert_relative_eq!(s.area(), PI / 4.0 * (4.0 - d_i.powi(2)), epsilon = 1e-12);
        assert_relative_eq!(
            s.second_moment_of_area(),
            PI / 64.0 * (16.0 - d_i.powi(4)),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_solid_circle_shear_coefficient() {
        let props = SectionProperties {
            top: 0.0,
            bottom: -1.0,
            diameter: 1.0,
            wall_thickness: None,
            area: PI / 4.0,
            second_moment_of_area: PI / 64.0,
        };
        let nu: f64 = 0.3;
        let expected = 6.0 * (1.0 + nu).powi(2) / (7.0 + 12.0 * nu + 4.0 * nu * nu);
        assert_relative_eq!(props.shear_coefficient(nu), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_thin_tube_shear_coefficient() {
        // thin-walled tubes tend towards kappa = (1+nu)/(2+nu)
        let s = PileSection::new(1.0, 2.0, 0.001);
        let props = SectionProperties::pipe(0.0, -1.0, &s);
        let nu = 0.3;
        assert_relative_eq!(
            props.shear_coefficient(nu),
            (1.0 + nu) / (2.0 + nu),
            epsilon = 1e-2
        );
    }
}

//! Pile geometry and structural data

use serde::{Deserialize, Serialize};

use super::material::Material;
use super::section::{PileSection, SectionProperties};
use crate::error::{PileError, PileResult};

/// A circular steel pile made of one or more stacked sections
///
/// ```rust
/// use pile_solver::prelude::*;
///
/// let pile = Pile::create(
///     "WTG01",
///     0.0,
///     vec![
///         PileSection::new(10.0, 7.5, 0.07),
///         PileSection::new(30.0, 7.5, 0.08),
///     ],
/// )
/// .unwrap();
///
/// assert_eq!(pile.length(), 40.0);
/// assert_eq!(pile.bottom_elevation(), -40.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pile {
    /// Name of the pile
    pub name: String,
    /// Top elevation of the pile in the model datum
    pub top_elevation: f64,
    /// Sections from top to bottom
    pub sections: Vec<PileSection>,
    /// Pile material
    pub material: Material,

    /// Derived section data from top to bottom
    data: Vec<SectionProperties>,
}

impl Pile {
    /// Create and validate a pile from its sections (ordered top to bottom)
    pub fn create(name: &str, top_elevation: f64, sections: Vec<PileSection>) -> PileResult<Self> {
        if sections.is_empty() {
            return Err(PileError::InvalidGeometry(
                "a pile needs at least one section".to_string(),
            ));
        }

        for (i, s) in sections.iter().enumerate() {
            if !(s.length > 0.0 && s.diameter > 0.0 && s.wall_thickness > 0.0) {
                return Err(PileError::InvalidGeometry(format!(
                    "section {} must have positive length, diameter and wall thickness",
                    i
                )));
            }
            if s.wall_thickness > 0.5 * s.diameter {
                return Err(PileError::InvalidGeometry(format!(
                    "section {}: wall thickness {} m exceeds the radius",
                    i, s.wall_thickness
                )));
            }
        }

        let mut data = Vec::with_capacity(sections.len());
        let mut top = top_elevation;
        for s in &sections {
            let bottom = top - s.length;
            data.push(SectionProperties::pipe(top, bottom, s));
            top = bottom;
        }

        Ok(Self {
            name: name.to_string(),
            top_elevation,
            sections,
            material: Material::steel(),
            data,
        })
    }

    /// Bottom elevation of the pile
    pub fn bottom_elevation(&self) -> f64 {
        self.top_elevation - self.length()
    }

    /// Pile length
    pub fn length(&self) -> f64 {
        self.sections.iter().map(|s| s.length).sum()
    }

    /// Section properties from top to bottom
    pub fn section_data(&self) -> &[SectionProperties] {
        &self.data
    }

    /// Elevations bounding the sections, from top to bottom
    pub fn section_elevations(&self) -> Vec<f64> {
        let mut x = vec![self.top_elevation];
        x.extend(self.data.iter().map(|d| d.bottom));
        x
    }

    /// Young's modulus of the pile material
    pub fn young_modulus(&self) -> f64 {
        self.material.e
    }

    /// Override the Young's modulus of the whole pile
    pub fn with_young_modulus(mut self, e: f64) -> Self {
        self.material = self.material.with_young_modulus(e);
        self
    }

    /// Override the second moment of area of every section
    pub fn with_second_moment_of_area(mut self, value: f64) -> Self {
        for d in &mut self.data {
            d.second_moment_of_area = value;
            d.wall_thickness = None;
        }
        self
    }

    /// Override the cross-sectional area of every section
    pub fn with_area(mut self, value: f64) -> Self {
        for d in &mut self.data {
            d.area = value;
            d.wall_thickness = None;
        }
        self
    }

    /// Override the width (diameter) of every section
    pub fn with_width(mut self, value: f64) -> Self {
        for d in &mut self.data {
            d.diameter = value;
            d.wall_thickness = None;
        }
        self
    }

    /// Section governing an element whose top is at `elevation`:
    /// the lowest section whose top is at or above it.
    pub(crate) fn section_at(&self, elevation: f64) -> &SectionProperties {
        self.data
            .iter()
            .rev()
            .find(|d| d.top >= elevation - 1e-9)
            .unwrap_or(&self.data[0])
    }
}

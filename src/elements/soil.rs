//! Soil layers and soil profile

use serde::{Deserialize, Serialize};

use crate::error::{PileError, PileResult};
use crate::soilmodels::SoilModel;

/// Unit weight of water used for the buoyant correction, in kN/m³
pub const WATER_UNIT_WEIGHT: f64 = 10.0;

/// A soil layer with its representative lateral constitutive model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    /// Name of the layer
    pub name: String,
    /// Top elevation
    pub top: f64,
    /// Bottom elevation
    pub bottom: f64,
    /// Bulk unit weight in kN/m³
    pub weight: f64,
    /// Lateral constitutive model
    pub lateral_model: Option<SoilModel>,
}

impl Layer {
    /// Create a layer without a lateral model
    pub fn new(name: &str, top: f64, bottom: f64, weight: f64) -> Self {
        Self {
            name: name.to_string(),
            top,
            bottom,
            weight,
            lateral_model: None,
        }
    }

    /// Attach a lateral constitutive model
    pub fn with_lateral_model(mut self, model: SoilModel) -> Self {
        self.lateral_model = Some(model);
        self
    }

    /// Layer thickness
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }
}

/// A soil profile: ground elevation, water elevation and contiguous layers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoilProfile {
    /// Name of the profile (borehole, location)
    pub name: String,
    /// Ground elevation
    pub top_elevation: f64,
    /// Water elevation (sea level or water table)
    pub water_elevation: f64,
    /// Layers sorted from top to bottom
    pub layers: Vec<Layer>,
}

impl SoilProfile {
    /// Create and validate a soil profile
    pub fn create(
        name: &str,
        top_elevation: f64,
        water_elevation: f64,
        mut layers: Vec<Layer>,
    ) -> PileResult<Self> {
        if layers.is_empty() {
            return Err(PileError::InvalidSoilProfile(
                "a soil profile needs at least one layer".to_string(),
            ));
        }

        for layer in &layers {
            if !(layer.top > layer.bottom) {
                return Err(PileError::InvalidSoilProfile(format!(
                    "layer '{}': bottom elevation is higher than top elevation",
                    layer.name
                )));
            }
            if !(layer.weight > WATER_UNIT_WEIGHT) {
                return Err(PileError::InvalidSoilProfile(format!(
                    "layer '{}': unit weight must exceed {} kN/m3",
                    layer.name, WATER_UNIT_WEIGHT
                )));
            }
        }

        layers.sort_by(|a, b| b.top.total_cmp(&a.top));

        if (layers[0].top - top_elevation).abs() > 1e-3 {
            return Err(PileError::InvalidSoilProfile(
                "top_elevation not matching uppermost layer's elevations".to_string(),
            ));
        }

        for pair in layers.windows(2) {
            if (pair[1].top - pair[0].bottom).abs() > 1e-3 {
                return Err(PileError::InvalidSoilProfile(format!(
                    "layers '{}' and '{}' overlap or leave a gap",
                    pair[0].name, pair[1].name
                )));
            }
        }

        Ok(Self {
            name: name.to_string(),
            top_elevation,
            water_elevation,
            layers,
        })
    }

    /// Bottom elevation of the profile
    pub fn bottom_elevation(&self) -> f64 {
        self.top_elevation - self.layers.iter().map(Layer::height).sum::<f64>()
    }

    /// Layer and soil elevations bounding each layer, from top to bottom
    pub fn layer_elevations(&self) -> Vec<f64> {
        let mut x: Vec<f64> = self.layers.iter().map(|l| l.top).collect();
        if let Some(last) = self.layers.last() {
            x.push(last.bottom);
        }
        x
    }

    /// Index of the layer governing an element whose top is at `elevation`:
    /// the lowest layer whose top is at or above it.
    pub fn layer_index_at(&self, elevation: f64) -> Option<usize> {
        self.layers
            .iter()
            .enumerate()
            .rev()
            .find(|(_, l)| l.top >= elevation - 1e-9)
            .map(|(i, _)| i)
    }

    /// Vertical effective stress at `elevation`, integrated from the ground
    /// with the buoyant unit weight below the water elevation
    pub fn vertical_effective_stress(&self, elevation: f64) -> f64 {
        let mut sigma = 0.0;
        for layer in &self.layers {
            let top = layer.top;
            let bottom = layer.bottom.max(elevation);
            if bottom >= top {
                break;
            }
            // dry part above the water elevation, submerged part below
            let split = self.water_elevation.clamp(bottom, top);
            sigma += (top - split) * layer.weight;
            sigma += (split - bottom) * (layer.weight - WATER_UNIT_WEIGHT);
        }
        sigma
    }

    /// Depth below ground of `elevation` (zero above ground)
    pub fn depth_below_ground(&self, elevation: f64) -> f64 {
        (self.top_elevation - elevation).max(0.0)
    }
}

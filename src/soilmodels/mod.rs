//! Lateral soil constitutive models generating spring curves

mod api_clay;
mod api_sand;
mod tabulated;

pub use api_clay::{ApiClay, ClayKind};
pub use api_sand::{ApiSand, SandKind};
pub use tabulated::Tabulated;

use serde::{Deserialize, Serialize};

use crate::elements::{Element, ElementSoil};
use crate::springs::{MtFamily, SpringCurve, SPRING_LENGTH};

/// Soil and pile state at one element end, handed to the curve functions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringContext {
    /// Vertical effective stress in kPa
    pub sig: f64,
    /// Depth below ground in m
    pub x: f64,
    /// Thickness of the governing layer in m
    pub layer_height: f64,
    /// Depth below the top of the governing layer in m
    pub depth_from_top_of_layer: f64,
    /// Pile width in m
    pub d: f64,
    /// Pile length in m
    pub l: f64,
    /// Whether the point lies below the water elevation
    pub below_water_table: bool,
    /// Number of points of the generated curve
    pub output_length: usize,
}

impl SpringContext {
    /// Context at the top (`end = 0`) or bottom (`end = 1`) of an element
    pub fn at_element_end(element: &Element, soil: &ElementSoil, end: usize, pile_length: f64) -> Self {
        Self {
            sig: soil.sigma_v[end],
            x: soil.depth[end],
            layer_height: soil.layer_height,
            depth_from_top_of_layer: soil.depth_in_layer[end],
            d: element.diameter,
            l: pile_length,
            below_water_table: soil.below_water[end],
            output_length: SPRING_LENGTH,
        }
    }

    /// Value of a `[top, bottom]` layer parameter at this depth
    pub fn layer_value(&self, values: [f64; 2]) -> f64 {
        if self.layer_height <= 0.0 {
            return values[0];
        }
        let t = (self.depth_from_top_of_layer / self.layer_height).clamp(0.0, 1.0);
        values[0] + (values[1] - values[0]) * t
    }
}

/// Which spring mechanisms a model provides
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpringSignature {
    /// Distributed lateral (p-y) springs
    pub py: bool,
    /// Distributed rotational (m-t) springs
    pub mt: bool,
    /// Base shear spring
    pub hb: bool,
    /// Base moment spring
    pub mb: bool,
}

/// Behaviour shared by every lateral soil model
pub trait LateralModel {
    /// Spring mechanisms the model can generate
    fn signature(&self) -> SpringSignature;

    /// Lateral resistance (kN/m) versus deflection (m)
    fn py_spring(&self, ctx: &SpringContext) -> Option<SpringCurve>;

    /// Distributed moment (kNm/m) versus rotation (rad), per mobilised lateral resistance
    fn mt_spring(&self, _ctx: &SpringContext) -> Option<MtFamily> {
        None
    }

    /// Base shear (kN) versus deflection at the pile tip
    fn hb_spring(&self, _ctx: &SpringContext) -> Option<SpringCurve> {
        None
    }

    /// Base moment (kNm) versus rotation at the pile tip
    fn mb_spring(&self, _ctx: &SpringContext) -> Option<SpringCurve> {
        None
    }
}

/// Lateral model attached to a soil layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "model")]
pub enum SoilModel {
    /// API RP2A sand
    ApiSand(ApiSand),
    /// API RP2A soft clay (Matlock)
    ApiClay(ApiClay),
    /// User-supplied curves
    Tabulated(Tabulated),
}

impl SoilModel {
    fn actual(&self) -> &dyn LateralModel {
        match self {
            SoilModel::ApiSand(m) => m,
            SoilModel::ApiClay(m) => m,
            SoilModel::Tabulated(m) => m,
        }
    }
}

impl LateralModel for SoilModel {
    fn signature(&self) -> SpringSignature {
        self.actual().signature()
    }

    fn py_spring(&self, ctx: &SpringContext) -> Option<SpringCurve> {
        self.actual().py_spring(ctx)
    }

    fn mt_spring(&self, ctx: &SpringContext) -> Option<MtFamily> {
        self.actual().mt_spring(ctx)
    }

    fn hb_spring(&self, ctx: &SpringContext) -> Option<SpringCurve> {
        self.actual().hb_spring(ctx)
    }

    fn mb_spring(&self, ctx: &SpringContext) -> Option<SpringCurve> {
        self.actual().mb_spring(ctx)
    }
}

impl From<ApiSand> for SoilModel {
    fn from(m: ApiSand) -> Self {
        SoilModel::ApiSand(m)
    }
}

impl From<ApiClay> for SoilModel {
    fn from(m: ApiClay) -> Self {
        SoilModel::ApiClay(m)
    }
}

impl From<Tabulated> for SoilModel {
    fn from(m: Tabulated) -> Self {
        SoilModel::Tabulated(m)
    }
}

/// Displacements from zero to `y_max`, refined near the origin
pub(crate) fn quadratic_grid(y_max: f64, n: usize) -> Vec<f64> {
    let n = n.max(2);
    (0..n)
        .map(|i| {
            let t = i as f64 / (n - 1) as f64;
            y_max * t * t
        })
        .collect()
}

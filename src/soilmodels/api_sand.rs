//! API RP2A sand p-y model

use serde::{Deserialize, Serialize};

use super::{quadratic_grid, LateralModel, SpringContext, SpringSignature};
use crate::error::{PileError, PileResult};
use crate::springs::SpringCurve;

/// Loading regime of the sand curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SandKind {
    #[default]
    Static,
    Cyclic,
}

/// API sand with a friction angle varying linearly through the layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSand {
    /// Internal friction angle in degrees at [top, bottom] of the layer
    pub phi: [f64; 2],
    /// Static or cyclic curves
    pub kind: SandKind,
}

impl ApiSand {
    /// Create a sand model, friction angles in degrees
    pub fn new(phi: [f64; 2], kind: SandKind) -> PileResult<Self> {
        if phi.iter().any(|&p| !(p > 0.0 && p < 60.0)) {
            return Err(PileError::InvalidInput(format!(
                "API sand friction angle must lie between 0 and 60 degrees, got {:?}",
                phi
            )));
        }
        Ok(Self { phi, kind })
    }

    /// Initial modulus of subgrade reaction in kN/m³ (API chart fit)
    pub fn initial_modulus(phi: f64, below_water_table: bool) -> f64 {
        let k = if below_water_table {
            0.1978 * phi * phi - 10.232 * phi + 136.82
        } else {
            0.2153 * phi * phi - 8.232 * phi + 63.657
        };
        (k * 1000.0).max(5400.0)
    }

    /// Ultimate lateral resistance in kN/m
    pub fn ultimate_resistance(phi: f64, sig: f64, x: f64, d: f64) -> f64 {
        let b = 0.4_f64;
        let phi_r = phi.to_radians();
        let beta = (45.0 + 0.5 * phi).to_radians();
        let alpha = (0.5 * phi).to_radians();
        let ka = (45.0 - 0.5 * phi).to_radians().tan().powi(2);

        let (tan_b, tan_p) = (beta.tan(), phi_r.tan());
        let tan_bp = (beta - phi_r).tan();

        let c1 = b * tan_p * beta.sin() / (tan_bp * alpha.cos())
            + tan_b.powi(2) * alpha.tan() / tan_bp
            + b * tan_b * (tan_p * beta.sin() - alpha.tan());
        let c2 = tan_b / tan_bp - ka;
        let c3 = b * tan_p * tan_b.powi(4) + ka * (tan_b.powi(8) - 1.0);

        ((c1 * x + c2 * d) * sig).min(c3 * d * sig).max(0.0)
    }

    fn factor_a(&self, x: f64, d: f64) -> f64 {
        match self.kind {
            SandKind::Cyclic => 0.9,
            SandKind::Static => (3.0 - 0.8 * x / d).max(0.9),
        }
    }
}

impl LateralModel for ApiSand {
    fn signature(&self) -> SpringSignature {
        SpringSignature {
            py: true,
            ..Default::default()
        }
    }

    fn py_spring(&self, ctx: &SpringContext) -> Option<SpringCurve> {
        let phi = ctx.layer_value(self.phi);
        let y = quadratic_grid(0.1 * ctx.d, ctx.output_length);

        let pu = Self::ultimate_resistance(phi, ctx.sig, ctx.x, ctx.d);
        let k = Self::initial_modulus(phi, ctx.below_water_table);
        let a = self.factor_a(ctx.x, ctx.d);

        let p = if pu > 0.0 && ctx.x > 0.0 {
            y.iter()
                .map(|&v| a * pu * (k * ctx.x * v / (a * pu)).tanh())
                .collect()
        } else {
            vec![0.0; y.len()]
        };

        Some(SpringCurve::from_parts(y, p))
    }
}

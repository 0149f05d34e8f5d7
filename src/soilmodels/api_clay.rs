//! API RP2A soft clay p-y model (Matlock, 1970)

use serde::{Deserialize, Serialize};

use super::{quadratic_grid, LateralModel, SpringContext, SpringSignature};
use crate::error::{PileError, PileResult};
use crate::springs::SpringCurve;

/// Loading regime of the clay curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClayKind {
    #[default]
    Static,
    Cyclic,
}

/// API soft clay with undrained strength and strain varying through the layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiClay {
    /// Undrained shear strength in kPa at [top, bottom] of the layer
    pub su: [f64; 2],
    /// Strain at 50% of the maximum deviatoric stress at [top, bottom]
    pub eps50: [f64; 2],
    /// Empirical depth factor J
    pub j: f64,
    /// Static or cyclic curves
    pub kind: ClayKind,
}

impl ApiClay {
    /// Create a clay model with the usual J = 0.5
    pub fn new(su: [f64; 2], eps50: [f64; 2], kind: ClayKind) -> PileResult<Self> {
        if su.iter().any(|&s| !(s > 0.0)) {
            return Err(PileError::InvalidInput(
                "API clay undrained shear strength must be positive".to_string(),
            ));
        }
        if eps50.iter().any(|&e| !(e > 0.0)) {
            return Err(PileError::InvalidInput(
                "API clay eps50 must be positive".to_string(),
            ));
        }
        Ok(Self {
            su,
            eps50,
            j: 0.5,
            kind,
        })
    }

    /// Override the empirical factor J
    pub fn with_j(mut self, j: f64) -> Self {
        self.j = j;
        self
    }

    /// Ultimate lateral resistance in kN/m
    pub fn ultimate_resistance(&self, su: f64, sig: f64, x: f64, d: f64) -> f64 {
        ((3.0 * su + sig) * d + self.j * su * x).min(9.0 * su * d)
    }

    /// Depth below which the cyclic resistance does not degrade
    fn transition_depth(&self, su: f64, sig: f64, x: f64, d: f64) -> f64 {
        let gamma = if x > 0.0 { sig / x } else { 0.0 };
        let denom = gamma * d / su + self.j;
        let xr = if denom > 0.0 { 6.0 * d / denom } else { f64::INFINITY };
        xr.max(2.5 * d)
    }
}

impl LateralModel for ApiClay {
    fn signature(&self) -> SpringSignature {
        SpringSignature {
            py: true,
            ..Default::default()
        }
    }

    fn py_spring(&self, ctx: &SpringContext) -> Option<SpringCurve> {
        let su = ctx.layer_value(self.su);
        let eps50 = ctx.layer_value(self.eps50);
        let (x, d) = (ctx.x, ctx.d);

        let pu = self.ultimate_resistance(su, ctx.sig, x, d);
        let y50 = 2.5 * eps50 * d;
        let y = quadratic_grid(16.0 * y50, ctx.output_length);

        let backbone = |v: f64| 0.5 * pu * (v / y50).cbrt();

        let p = match self.kind {
            ClayKind::Static => y.iter().map(|&v| backbone(v).min(pu)).collect(),
            ClayKind::Cyclic => {
                let xr = self.transition_depth(su, ctx.sig, x, d);
                let cap = 0.72 * pu;
                let residual = if x < xr { cap * x / xr } else { cap };
                y.iter()
                    .map(|&v| {
                        if v <= 3.0 * y50 {
                            backbone(v).min(cap)
                        } else if v >= 15.0 * y50 {
                            residual
                        } else {
                            cap + (residual - cap) * (v - 3.0 * y50) / (12.0 * y50)
                        }
                    })
                    .collect()
            }
        };

        Some(SpringCurve::from_parts(y, p))
    }
}

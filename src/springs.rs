//! Nonlinear soil spring curves and the per-element spring tables

use log::debug;
use serde::{Deserialize, Serialize};

use crate::elements::{Element, Pile, SoilProfile};
use crate::error::{PileError, PileResult};
use crate::math::interp;
use crate::model::ModelConfig;
use crate::soilmodels::{LateralModel, SpringContext};

/// Number of points of every generated spring curve
pub const SPRING_LENGTH: usize = 15;

/// Linearisation of a spring at a displacement state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StiffnessKind {
    /// Slope of the curve at zero displacement
    Initial,
    /// Resistance over displacement at the current state
    Secant,
    /// Local slope at the current state
    Tangent,
}

/// Resistance versus displacement table of one spring
///
/// Displacements are non-decreasing and the curve is evaluated on the
/// absolute value of the nodal displacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpringCurve {
    y: Vec<f64>,
    p: Vec<f64>,
}

impl SpringCurve {
    /// Create and validate a curve from displacements `y` and resistances `p`
    pub fn new(y: Vec<f64>, p: Vec<f64>) -> PileResult<Self> {
        if y.len() != p.len() {
            return Err(PileError::InvalidInput(format!(
                "spring curve has {} displacements but {} resistances",
                y.len(),
                p.len()
            )));
        }
        if y.len() < 2 {
            return Err(PileError::InvalidInput(
                "spring curve needs at least two points".to_string(),
            ));
        }
        if y.iter().chain(p.iter()).any(|v| !v.is_finite()) {
            return Err(PileError::InvalidInput(
                "spring curve values must be finite".to_string(),
            ));
        }
        if y[0] < 0.0 || y.windows(2).any(|w| w[1] < w[0]) {
            return Err(PileError::InvalidInput(
                "spring curve displacements must be positive and non-decreasing".to_string(),
            ));
        }
        Ok(Self { y, p })
    }

    /// Curve built from ordinates produced by a soil model
    pub(crate) fn from_parts(y: Vec<f64>, p: Vec<f64>) -> Self {
        Self { y, p }
    }

    /// All-zero curve: no resistance is ever mobilised
    pub fn zero(len: usize) -> Self {
        Self {
            y: vec![0.0; len],
            p: vec![0.0; len],
        }
    }

    /// Displacement ordinates
    pub fn displacements(&self) -> &[f64] {
        &self.y
    }

    /// Resistance ordinates
    pub fn resistances(&self) -> &[f64] {
        &self.p
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// Whether the curve has no points
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Whether the curve carries no resistance at all
    pub fn is_zero(&self) -> bool {
        self.p.iter().all(|&v| v == 0.0)
    }

    /// Largest tabulated resistance
    pub fn max_resistance(&self) -> f64 {
        self.p.iter().fold(0.0, |acc: f64, &v| acc.max(v.abs()))
    }

    /// Resistance mobilised at displacement `d`, flat beyond the table
    pub fn resistance_at(&self, d: f64) -> f64 {
        if self.is_zero() {
            return 0.0;
        }
        interp(d.abs(), &self.y, &self.p)
    }

    /// Spring stiffness at displacement `d`, never negative
    pub fn stiffness(&self, kind: StiffnessKind, d: f64) -> f64 {
        if self.is_zero() || self.y.len() < 2 {
            return 0.0;
        }
        let k = match kind {
            StiffnessKind::Initial => self.slope_at(0.0),
            StiffnessKind::Secant => {
                let a = d.abs();
                if a <= f64::EPSILON {
                    self.slope_at(0.0)
                } else {
                    self.resistance_at(a) / a
                }
            }
            StiffnessKind::Tangent => self.slope_at(d.abs()),
        };
        k.max(0.0)
    }

    /// Slope of the table segment containing `a`, zero past the last point
    fn slope_at(&self, a: f64) -> f64 {
        let n = self.y.len();
        if a >= self.y[n - 1] {
            return 0.0;
        }
        let j = self.y.partition_point(|&v| v <= a).clamp(1, n - 1);
        let dy = self.y[j] - self.y[j - 1];
        if dy <= 0.0 {
            return 0.0;
        }
        (self.p[j] - self.p[j - 1]) / dy
    }
}

/// Family of m-t curves conditioned on the mobilised lateral resistance
///
/// Curve `i` applies when the p-y spring at the same node mobilises
/// `p_levels[i]`. Between levels the stiffness is interpolated linearly; the
/// lowest and highest curves apply outside the range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MtFamily {
    p_levels: Vec<f64>,
    curves: Vec<SpringCurve>,
}

impl MtFamily {
    /// Create and validate a family of m-t curves
    pub fn new(p_levels: Vec<f64>, curves: Vec<SpringCurve>) -> PileResult<Self> {
        if p_levels.is_empty() || p_levels.len() != curves.len() {
            return Err(PileError::InvalidInput(
                "m-t family needs one curve per lateral resistance level".to_string(),
            ));
        }
        if p_levels.windows(2).any(|w| w[1] <= w[0]) {
            return Err(PileError::InvalidInput(
                "m-t lateral resistance levels must be strictly increasing".to_string(),
            ));
        }
        Ok(Self { p_levels, curves })
    }

    /// A family made of a single curve, independent of the lateral resistance
    pub fn single(curve: SpringCurve) -> Self {
        Self {
            p_levels: vec![0.0],
            curves: vec![curve],
        }
    }

    /// All-zero family
    pub fn zero(len: usize) -> Self {
        Self::single(SpringCurve::zero(len))
    }

    /// Lateral resistance levels
    pub fn p_levels(&self) -> &[f64] {
        &self.p_levels
    }

    /// Curves, one per level
    pub fn curves(&self) -> &[SpringCurve] {
        &self.curves
    }

    /// Whether no curve carries resistance
    pub fn is_zero(&self) -> bool {
        self.curves.iter().all(SpringCurve::is_zero)
    }

    /// Bracketing curves and the weight of the upper one
    fn bracket(&self, p: f64) -> (usize, usize, f64) {
        let n = self.p_levels.len();
        let p = p.abs();
        if n == 1 || p <= self.p_levels[0] {
            return (0, 0, 0.0);
        }
        if p >= self.p_levels[n - 1] {
            return (n - 1, n - 1, 0.0);
        }
        let j = self.p_levels.partition_point(|&v| v <= p).clamp(1, n - 1);
        let (p0, p1) = (self.p_levels[j - 1], self.p_levels[j]);
        (j - 1, j, (p - p0) / (p1 - p0))
    }

    fn blend(&self, p: f64, f: impl Fn(&SpringCurve) -> f64) -> f64 {
        let (lo, hi, t) = self.bracket(p);
        (1.0 - t) * f(&self.curves[lo]) + t * f(&self.curves[hi])
    }

    /// Rotational stiffness at rotation `theta` under lateral resistance `p`
    pub fn stiffness(&self, kind: StiffnessKind, theta: f64, p: f64) -> f64 {
        self.blend(p, |c| c.stiffness(kind, theta)).max(0.0)
    }

    /// Moment mobilised at rotation `theta` under lateral resistance `p`
    pub fn resistance_at(&self, theta: f64, p: f64) -> f64 {
        self.blend(p, |c| c.resistance_at(theta))
    }

    /// Largest moment available under lateral resistance `p`
    pub fn max_resistance(&self, p: f64) -> f64 {
        self.blend(p, SpringCurve::max_resistance)
    }
}

/// Spring tables of a model: one entry per element end, plus the base springs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpringTables {
    /// p-y curves per element, [top, bottom]
    pub py: Vec<[SpringCurve; 2]>,
    /// m-t families per element, [top, bottom]
    pub mt: Vec<[MtFamily; 2]>,
    /// Base shear spring at the pile tip
    pub hb: SpringCurve,
    /// Base moment spring at the pile tip
    pub mb: SpringCurve,
}

impl SpringTables {
    /// Tables for a model without any spring
    pub fn empty(element_count: usize) -> Self {
        Self {
            py: (0..element_count)
                .map(|_| [SpringCurve::zero(SPRING_LENGTH), SpringCurve::zero(SPRING_LENGTH)])
                .collect(),
            mt: (0..element_count)
                .map(|_| [MtFamily::zero(SPRING_LENGTH), MtFamily::zero(SPRING_LENGTH)])
                .collect(),
            hb: SpringCurve::zero(SPRING_LENGTH),
            mb: SpringCurve::zero(SPRING_LENGTH),
        }
    }

    /// Evaluate the soil models of every element end
    pub fn build(
        elements: &[Element],
        pile: &Pile,
        soil: &SoilProfile,
        config: &ModelConfig,
    ) -> PileResult<Self> {
        let mut tables = Self::empty(elements.len());

        for (i, element) in elements.iter().enumerate() {
            let Some(es) = &element.soil else { continue };
            let Some(model) = soil.layers[es.layer].lateral_model.as_ref() else {
                continue;
            };
            let signature = model.signature();

            for end in 0..2 {
                let ctx = SpringContext::at_element_end(element, es, end, pile.length());
                if signature.py && config.distributed_lateral {
                    if let Some(curve) = model.py_spring(&ctx) {
                        tables.py[i][end] = curve;
                    }
                }
                if signature.mt && config.distributed_moment {
                    if let Some(family) = model.mt_spring(&ctx) {
                        tables.mt[i][end] = family;
                    }
                }
            }
        }

        // base springs act at the bottom end of the last element
        if let Some(element) = elements.last() {
            if let Some(es) = &element.soil {
                if let Some(model) = soil.layers[es.layer].lateral_model.as_ref() {
                    let signature = model.signature();
                    let ctx = SpringContext::at_element_end(element, es, 1, pile.length());
                    if signature.hb && config.base_shear {
                        if let Some(curve) = model.hb_spring(&ctx) {
                            tables.hb = curve;
                        }
                    }
                    if signature.mb && config.base_moment {
                        if let Some(curve) = model.mb_spring(&ctx) {
                            tables.mb = curve;
                        }
                    }
                }
            }
        }

        debug!(
            "Spring tables built: {} p-y, {} m-t active element ends",
            tables.py.iter().flatten().filter(|c| !c.is_zero()).count(),
            tables.mt.iter().flatten().filter(|f| !f.is_zero()).count(),
        );

        Ok(tables)
    }

    /// Whether any spring carries resistance
    pub fn has_springs(&self) -> bool {
        self.py.iter().flatten().any(|c| !c.is_zero())
            || self.mt.iter().flatten().any(|f| !f.is_zero())
            || !self.hb.is_zero()
            || !self.mb.is_zero()
    }
}

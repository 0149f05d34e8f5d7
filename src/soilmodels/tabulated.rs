//! User-supplied spring curves, independent of depth

use serde::{Deserialize, Serialize};

use super::{LateralModel, SpringContext, SpringSignature};
use crate::springs::{MtFamily, SpringCurve};

/// Lateral model made of tabulated curves
///
/// Curves are used as given, whatever their number of points.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tabulated {
    /// p-y curve (kN/m vs m)
    pub py: Option<SpringCurve>,
    /// m-t family (kNm/m vs rad) conditioned on the mobilised p
    pub mt: Option<MtFamily>,
    /// Base shear curve (kN vs m)
    pub hb: Option<SpringCurve>,
    /// Base moment curve (kNm vs rad)
    pub mb: Option<SpringCurve>,
}

impl Tabulated {
    /// Model with a single p-y curve
    pub fn new(py: SpringCurve) -> Self {
        Self {
            py: Some(py),
            ..Default::default()
        }
    }

    /// Add a family of m-t curves
    pub fn with_mt(mut self, mt: MtFamily) -> Self {
        self.mt = Some(mt);
        self
    }

    /// Add a base shear curve
    pub fn with_base_shear(mut self, hb: SpringCurve) -> Self {
        self.hb = Some(hb);
        self
    }

    /// Add a base moment curve
    pub fn with_base_moment(mut self, mb: SpringCurve) -> Self {
        self.mb = Some(mb);
        self
    }
}

impl LateralModel for Tabulated {
    fn signature(&self) -> SpringSignature {
        SpringSignature {
            py: self.py.is_some(),
            mt: self.mt.is_some(),
            hb: self.hb.is_some(),
            mb: self.mb.is_some(),
        }
    }

    fn py_spring(&self, _ctx: &SpringContext) -> Option<SpringCurve> {
        self.py.clone()
    }

    fn mt_spring(&self, _ctx: &SpringContext) -> Option<MtFamily> {
        self.mt.clone()
    }

    fn hb_spring(&self, _ctx: &SpringContext) -> Option<SpringCurve> {
        self.hb.clone()
    }

    fn mb_spring(&self, _ctx: &SpringContext) -> Option<SpringCurve> {
        self.mb.clone()
    }
}

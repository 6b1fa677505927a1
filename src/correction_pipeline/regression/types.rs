//! Linear model types

use serde::{Deserialize, Serialize};

use crate::correction_pipeline::common::error::{CorrectionError, Result};
use crate::correction_pipeline::common::warning::NumericalWarning;

/// `primary = c + m1 * predictor1 + m2 * predictor2`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coefficients {
    pub c: f64,
    pub m1: f64,
    #[serde(default)]
    pub m2: f64,
}

impl Coefficients {
    pub fn new(c: f64, m1: f64, m2: f64) -> Self {
        Self { c, m1, m2 }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("c", self.c), ("m1", self.m1), ("m2", self.m2)] {
            if !value.is_finite() {
                return Err(CorrectionError::InvalidCoefficient { name, value });
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let coefficients: Coefficients = serde_json::from_str(json)?;
        coefficients.validate()?;
        Ok(coefficients)
    }
}

/// Goodness of fit of a model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FitQuality {
    /// Coefficient of determination of a least-squares fit.
    RSquared(f64),
    /// The fitted target was constant, so R² is undefined.
    ZeroVariance,
    /// Coefficients were supplied by hand.
    NotComputed,
}

impl FitQuality {
    pub fn r_squared(&self) -> Option<f64> {
        match self {
            FitQuality::RSquared(r2) => Some(*r2),
            _ => None,
        }
    }

    pub fn warning(&self) -> Option<NumericalWarning> {
        matches!(self, FitQuality::ZeroVariance).then_some(NumericalWarning::UndefinedRSquared)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub coefficients: Coefficients,
    /// Whether predictor 2 took part in the model. When false, `m2` is exactly 0.
    pub two_predictor: bool,
    pub quality: FitQuality,
    /// Number of pixels the model was fitted on; 0 for manual models.
    pub pixel_count: usize,
}

impl LinearModel {
    /// A model from user-entered coefficients. A nonzero `m2` makes it a two-predictor
    /// model.
    pub fn manual(coefficients: Coefficients) -> Result<Self> {
        coefficients.validate()?;
        Ok(Self {
            coefficients,
            two_predictor: coefficients.m2 != 0.0,
            quality: FitQuality::NotComputed,
            pixel_count: 0,
        })
    }

    /// Whether applying the model needs a predictor 2 value.
    pub fn requires_predictor2(&self) -> bool {
        self.two_predictor || self.coefficients.m2 != 0.0
    }

    /// Predicted primary intensity. A missing predictor 2 contributes nothing.
    #[inline]
    pub fn predict(&self, predictor1: f64, predictor2: Option<f64>) -> f64 {
        let Coefficients { c, m1, m2 } = self.coefficients;
        match predictor2 {
            Some(p2) if self.requires_predictor2() => c + m1 * predictor1 + m2 * p2,
            _ => c + m1 * predictor1,
        }
    }

    pub fn r_squared(&self) -> Option<f64> {
        self.quality.r_squared()
    }

    /// Model formula with coefficients and R², four decimals each.
    pub fn equation(&self) -> String {
        let Coefficients { c, m1, m2 } = self.coefficients;
        let mut text = if self.two_predictor {
            format!(
                "Primary channel = c + m1 * (Predictor 1) + m2 * (Predictor 2)\nc = {:.4}\nm1 = {:.4}\nm2 = {:.4}",
                c, m1, m2
            )
        } else {
            format!(
                "Primary channel = c + m1 * (Predictor 1)\nc = {:.4}\nm1 = {:.4}",
                c, m1
            )
        };
        match self.quality {
            FitQuality::RSquared(r2) => text.push_str(&format!("\n\nR² = {:.4}", r2)),
            FitQuality::ZeroVariance => text.push_str("\n\nR² = undefined"),
            FitQuality::NotComputed => {}
        }
        text
    }
}

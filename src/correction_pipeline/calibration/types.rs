//! Calibration configuration types

use serde::{Deserialize, Serialize};

use crate::correction_pipeline::common::error::{CorrectionError, Result};
use crate::correction_pipeline::common::warning::NumericalWarning;
use crate::correction_pipeline::image::Roi;
use crate::correction_pipeline::pooling::PooledDataset;
use crate::correction_pipeline::regression::LinearModel;
use crate::correction_pipeline::results::{PlotData, ResultTable};
use crate::correction_pipeline::sampling::{ChannelAssignment, EmbryoSample, SaturationPolicy};

/// Configuration for a calibration run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Channel roles; a predictor 2 channel selects the two-predictor model
    pub channels: ChannelAssignment,
    /// Gaussian sigma in pixels applied to whole planes before sampling. 0 disables it
    pub blur_radius: f64,
    /// Sample inside each image's ROI (true) or over the whole image (false)
    pub use_roi: bool,
    /// Upper bound on the number of images in one run
    pub max_images: usize,
    pub saturation: SaturationPolicy,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            channels: ChannelAssignment::default(),
            blur_radius: 2.0,
            use_roi: true,
            max_images: 10,
            saturation: SaturationPolicy::BitDepthMax,
        }
    }
}

impl CalibrationConfig {
    pub fn builder() -> CalibrationConfigBuilder {
        CalibrationConfigBuilder::default()
    }

    pub fn two_predictor(&self) -> bool {
        self.channels.two_predictor()
    }

    pub fn validate(&self) -> Result<()> {
        self.channels.validate()?;
        if !self.blur_radius.is_finite() || self.blur_radius < 0.0 {
            return Err(CorrectionError::InvalidBlurRadius(self.blur_radius));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: CalibrationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Builder for CalibrationConfig
#[derive(Default)]
pub struct CalibrationConfigBuilder {
    channels: Option<ChannelAssignment>,
    blur_radius: Option<f64>,
    use_roi: Option<bool>,
    max_images: Option<usize>,
    saturation: Option<SaturationPolicy>,
}

impl CalibrationConfigBuilder {
    pub fn channels(mut self, channels: ChannelAssignment) -> Self {
        self.channels = Some(channels);
        self
    }

    pub fn blur_radius(mut self, radius: f64) -> Self {
        self.blur_radius = Some(radius);
        self
    }

    pub fn use_roi(mut self, use_roi: bool) -> Self {
        self.use_roi = Some(use_roi);
        self
    }

    pub fn max_images(mut self, max: usize) -> Self {
        self.max_images = Some(max);
        self
    }

    pub fn saturation(mut self, policy: SaturationPolicy) -> Self {
        self.saturation = Some(policy);
        self
    }

    pub fn build(self) -> CalibrationConfig {
        let default = CalibrationConfig::default();
        CalibrationConfig {
            channels: self.channels.unwrap_or(default.channels),
            blur_radius: self.blur_radius.unwrap_or(default.blur_radius),
            use_roi: self.use_roi.unwrap_or(default.use_roi),
            max_images: self.max_images.unwrap_or(default.max_images),
            saturation: self.saturation.unwrap_or(default.saturation),
        }
    }
}

/// An image chosen for calibration, with the ROI drawn on it if any.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSelection {
    pub name: String,
    pub roi: Option<Roi>,
}

impl ImageSelection {
    pub fn new(name: impl Into<String>, roi: Option<Roi>) -> Self {
        Self {
            name: name.into(),
            roi,
        }
    }

    pub fn whole(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }
}

/// Everything a calibration run produces.
#[derive(Debug, Clone)]
pub struct CalibrationOutcome {
    pub model: LinearModel,
    pub samples: Vec<EmbryoSample>,
    pub pooled: PooledDataset,
    pub table: ResultTable,
    pub plot: PlotData,
    pub warnings: Vec<NumericalWarning>,
}

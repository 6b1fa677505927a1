//! Bleed-through correction pipeline
//!
//! Calibrates a linear model of how predictor channels (autofluorescence, or a second
//! fluorophore) leak into a primary fluorescence channel, and subtracts the modelled
//! contamination from images.
//!
//! The flow is: image + region → [`sampling`] → [`pooling`] → [`regression`] →
//! [`correction`] and [`results`]. [`calibration`] runs the whole chain over a set of
//! selected images.

pub mod calibration;
pub mod common;
pub mod correction;
pub mod image;
pub mod pooling;
pub mod regression;
pub mod results;
pub mod sampling;
pub mod smoothing;

#[cfg(test)]
pub(crate) mod testing;

pub use common::{CorrectionError, ErrorKind, NumericalWarning, Result};

pub use image::{ChannelImage, Hyperstack, ImageRegistry, ImageSource, Region, Roi};

pub use smoothing::{GaussianSmoother, Smoother};

pub use sampling::{
    ChannelAssignment, ChannelRole, ChannelSamples, EmbryoSample, PixelSampler, SaturationPolicy,
};

pub use pooling::{PooledDataset, pool};

pub use regression::{Coefficients, FitQuality, LinearModel, fit};

pub use correction::{
    CorrectedStack, CorrectionConfig, CorrectionConfigBuilder, CorrectionPipeline, FrameSelection,
    SampleResidual, correct, sample_residuals,
};

pub use results::{PlotData, PlotSeries, ResultRow, ResultTable};

pub use calibration::{
    CalibrationConfig, CalibrationConfigBuilder, CalibrationOutcome, CalibrationPipeline,
    ImageSelection, StageTimings,
};

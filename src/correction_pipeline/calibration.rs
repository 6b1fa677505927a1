//! Calibration module
//!
//! Orchestrates validation, sampling, pooling, fitting and result assembly for a set of
//! selected images.

mod pipeline;
mod timing;
pub mod types;


pub use pipeline::CalibrationPipeline;
pub use timing::{StageTiming, StageTimings};
pub use types::{CalibrationConfig, CalibrationConfigBuilder, CalibrationOutcome, ImageSelection};

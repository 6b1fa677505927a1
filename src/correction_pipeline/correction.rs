//! Correction module
//!
//! Subtraction of modelled bleed-through from whole images, and the matching per-pixel
//! residuals for sampled data.

mod engine;
mod pipeline;
pub mod types;


pub use engine::{SampleResidual, correct, sample_residuals};
pub use pipeline::CorrectionPipeline;
pub use types::{CorrectedStack, CorrectionConfig, CorrectionConfigBuilder, FrameSelection};

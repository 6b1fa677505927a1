//! Regression module
//!
//! Least-squares calibration of the linear bleed-through model.

mod ols;
pub mod types;

pub use ols::fit;
pub use types::{Coefficients, FitQuality, LinearModel};

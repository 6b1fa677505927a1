//! Smoothing module
//!
//! The blur step applied to whole channel planes before sampling.

mod gaussian;
mod smoother;

pub use gaussian::GaussianSmoother;
pub use smoother::Smoother;

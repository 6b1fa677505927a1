//! Common utilities module
//!
//! Error and warning types shared across the correction pipeline.

pub mod error;
pub mod warning;

pub use error::{CorrectionError, ErrorKind, Result};
pub use warning::NumericalWarning;

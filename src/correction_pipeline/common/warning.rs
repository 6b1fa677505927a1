use std::fmt;

use crate::correction_pipeline::sampling::ChannelRole;

/// Conditions worth telling the user about that do not stop a run.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericalWarning {
    /// Raw pixels at or above the saturation threshold inside the sampled region.
    Saturation {
        image: String,
        role: ChannelRole,
        channel: usize,
        count: usize,
    },
    /// The smoothed primary values were constant, so R² has no meaning.
    UndefinedRSquared,
}

impl fmt::Display for NumericalWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericalWarning::Saturation {
                image,
                role,
                channel,
                count,
            } => write!(
                f,
                "{} saturated pixels in {} channel (channel {}) of image {}",
                count, role, channel, image
            ),
            NumericalWarning::UndefinedRSquared => {
                write!(f, "primary channel has zero variance, R² is undefined")
            }
        }
    }
}

use crate::correction_pipeline::common::error::Result;
use crate::correction_pipeline::image::ChannelImage;

/// Whole-plane blur operator.
///
/// Implementations must return a new image of the same size and treat a radius of 0 as
/// the identity.
pub trait Smoother {
    fn blur(&self, image: &ChannelImage, radius: f64) -> Result<ChannelImage>;
}

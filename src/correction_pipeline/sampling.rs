//! Pixel sampling module
//!
//! Turns an image, a channel assignment and a region into an [`EmbryoSample`].

mod pixel_sampler;
pub mod types;

#[cfg(test)]
mod tests;

pub use pixel_sampler::PixelSampler;
pub use types::{ChannelAssignment, ChannelRole, ChannelSamples, EmbryoSample, SaturationPolicy};

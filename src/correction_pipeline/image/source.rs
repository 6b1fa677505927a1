use crate::correction_pipeline::common::error::{CorrectionError, Result};
use crate::correction_pipeline::image::types::{ChannelImage, Hyperstack};

/// Read access to a multi-channel image.
///
/// Implementors only need the accessors; `split_channel` has a generic default that
/// copies one plane out pixel by pixel.
pub trait ImageSource {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn channels(&self) -> usize;
    fn frames(&self) -> usize;
    /// The time point currently selected for single-frame operations.
    fn active_frame(&self) -> usize;
    fn bits_per_sample(&self) -> u32;
    fn pixel(&self, channel: usize, frame: usize, x: usize, y: usize) -> f32;

    fn split_channel(&self, channel: usize, frame: usize) -> Result<ChannelImage> {
        self.check_plane(channel, frame)?;
        let (w, h) = (self.width(), self.height());
        let mut data = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                data.push(self.pixel(channel, frame, x, y));
            }
        }
        ChannelImage::new(w, h, data)
    }

    fn check_plane(&self, channel: usize, frame: usize) -> Result<()> {
        if frame >= self.frames() {
            return Err(CorrectionError::FrameOutOfRange {
                frame,
                frames: self.frames(),
            });
        }
        if channel >= self.channels() {
            return Err(CorrectionError::NoSuchChannel {
                channel,
                available: self.channels(),
            });
        }
        Ok(())
    }
}

impl ImageSource for Hyperstack {
    fn width(&self) -> usize {
        Hyperstack::width(self)
    }

    fn height(&self) -> usize {
        Hyperstack::height(self)
    }

    fn channels(&self) -> usize {
        Hyperstack::channels(self)
    }

    fn frames(&self) -> usize {
        Hyperstack::frames(self)
    }

    fn active_frame(&self) -> usize {
        Hyperstack::active_frame(self)
    }

    fn bits_per_sample(&self) -> u32 {
        Hyperstack::bits_per_sample(self)
    }

    fn pixel(&self, channel: usize, frame: usize, x: usize, y: usize) -> f32 {
        Hyperstack::pixel(self, channel, frame, x, y)
    }

    fn split_channel(&self, channel: usize, frame: usize) -> Result<ChannelImage> {
        self.check_plane(channel, frame)?;
        ChannelImage::new(
            Hyperstack::width(self),
            Hyperstack::height(self),
            self.plane(channel, frame).to_vec(),
        )
    }
}

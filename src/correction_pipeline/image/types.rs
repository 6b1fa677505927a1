//! Image data types

use crate::correction_pipeline::common::error::{CorrectionError, Result};

/// A single 2-D plane of intensities, row-major.
///
/// Values are stored as 32-bit floats so that smoothed and corrected planes share the
/// type with raw ones. Integer source data converts losslessly.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelImage {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Pixel data, `width * height` values
    pub data: Vec<f32>,
}

impl ChannelImage {
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CorrectionError::InvalidDimensions(width, height));
        }
        if data.len() != width * height {
            return Err(CorrectionError::BufferLength {
                expected: width * height,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn filled(width: usize, height: usize, value: f32) -> Result<Self> {
        Self::new(width, height, vec![value; width * height])
    }

    pub fn from_u16(width: usize, height: usize, data: &[u16]) -> Result<Self> {
        Self::new(width, height, data.iter().map(|&v| v as f32).collect())
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub(crate) fn ensure_same_size(&self, other: &ChannelImage) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(CorrectionError::DimensionMismatch {
                expected: self.dimensions(),
                actual: other.dimensions(),
            });
        }
        Ok(())
    }
}

/// Multi-channel, multi-frame image.
///
/// Storage order is frame, then channel, then row-major pixels, so one channel of one
/// frame is a contiguous plane.
#[derive(Debug, Clone)]
pub struct Hyperstack {
    width: usize,
    height: usize,
    channels: usize,
    frames: usize,
    active_frame: usize,
    bits_per_sample: u32,
    data: Vec<f32>,
}

pub const SUPPORTED_BIT_DEPTHS: [u32; 3] = [8, 16, 32];

impl Hyperstack {
    pub fn new(
        width: usize,
        height: usize,
        channels: usize,
        frames: usize,
        bits_per_sample: u32,
        data: Vec<f32>,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CorrectionError::InvalidDimensions(width, height));
        }
        if !SUPPORTED_BIT_DEPTHS.contains(&bits_per_sample) {
            return Err(CorrectionError::UnsupportedBitDepth {
                bits: bits_per_sample,
                operation: "image construction",
            });
        }
        let expected = width * height * channels * frames;
        if channels == 0 || frames == 0 || data.len() != expected {
            return Err(CorrectionError::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            frames,
            active_frame: 0,
            bits_per_sample,
            data,
        })
    }

    /// Build a single-frame 16-bit stack from one plane per channel.
    pub fn from_planes_u16(width: usize, height: usize, planes: &[Vec<u16>]) -> Result<Self> {
        let data = planes
            .iter()
            .flat_map(|plane| plane.iter().map(|&v| v as f32))
            .collect();
        Self::new(width, height, planes.len(), 1, 16, data)
    }

    /// Build a single-frame stack from channel images of equal size.
    pub fn from_channels(planes: &[ChannelImage], bits_per_sample: u32) -> Result<Self> {
        let first = planes.first().ok_or(CorrectionError::BufferLength {
            expected: 1,
            actual: 0,
        })?;
        for plane in planes {
            first.ensure_same_size(plane)?;
        }
        let data = planes.iter().flat_map(|p| p.data.iter().copied()).collect();
        Self::new(
            first.width,
            first.height,
            planes.len(),
            1,
            bits_per_sample,
            data,
        )
    }

    pub fn set_active_frame(&mut self, frame: usize) -> Result<()> {
        if frame >= self.frames {
            return Err(CorrectionError::FrameOutOfRange {
                frame,
                frames: self.frames,
            });
        }
        self.active_frame = frame;
        Ok(())
    }

    fn plane_offset(&self, channel: usize, frame: usize) -> usize {
        (frame * self.channels + channel) * self.width * self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn active_frame(&self) -> usize {
        self.active_frame
    }

    pub fn bits_per_sample(&self) -> u32 {
        self.bits_per_sample
    }

    pub fn pixel(&self, channel: usize, frame: usize, x: usize, y: usize) -> f32 {
        self.data[self.plane_offset(channel, frame) + y * self.width + x]
    }

    pub fn plane(&self, channel: usize, frame: usize) -> &[f32] {
        let start = self.plane_offset(channel, frame);
        &self.data[start..start + self.width * self.height]
    }
}

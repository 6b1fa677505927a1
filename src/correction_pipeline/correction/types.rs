//! Standalone correction configuration

use serde::{Deserialize, Serialize};

use crate::correction_pipeline::image::ChannelImage;
use crate::correction_pipeline::sampling::ChannelAssignment;

/// Which time points of a stack to correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FrameSelection {
    #[default]
    Active,
    All,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorrectionConfig {
    pub channels: ChannelAssignment,
    pub frames: FrameSelection,
}

impl CorrectionConfig {
    pub fn builder() -> CorrectionConfigBuilder {
        CorrectionConfigBuilder::default()
    }
}

#[derive(Default)]
pub struct CorrectionConfigBuilder {
    channels: Option<ChannelAssignment>,
    frames: Option<FrameSelection>,
}

impl CorrectionConfigBuilder {
    pub fn channels(mut self, channels: ChannelAssignment) -> Self {
        self.channels = Some(channels);
        self
    }

    pub fn frames(mut self, frames: FrameSelection) -> Self {
        self.frames = Some(frames);
        self
    }

    pub fn build(self) -> CorrectionConfig {
        let default = CorrectionConfig::default();
        CorrectionConfig {
            channels: self.channels.unwrap_or(default.channels),
            frames: self.frames.unwrap_or(default.frames),
        }
    }
}

/// Corrected planes, one per processed frame, in frame order.
#[derive(Debug, Clone)]
pub struct CorrectedStack {
    pub frames: Vec<(usize, ChannelImage)>,
}

impl CorrectedStack {
    pub fn frame(&self, frame: usize) -> Option<&ChannelImage> {
        self.frames
            .iter()
            .find(|(f, _)| *f == frame)
            .map(|(_, image)| image)
    }
}

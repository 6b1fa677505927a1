//! Sampling configuration and sample data types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::correction_pipeline::common::error::{CorrectionError, Result};
use crate::correction_pipeline::common::warning::NumericalWarning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelRole {
    Primary,
    Predictor1,
    Predictor2,
}

impl fmt::Display for ChannelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChannelRole::Primary => "Primary",
            ChannelRole::Predictor1 => "Predictor 1",
            ChannelRole::Predictor2 => "Predictor 2",
        };
        f.write_str(name)
    }
}

/// Which image channel plays which role. Indices are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAssignment {
    pub primary: usize,
    pub predictor1: usize,
    pub predictor2: Option<usize>,
}

impl Default for ChannelAssignment {
    fn default() -> Self {
        Self {
            primary: 0,
            predictor1: 1,
            predictor2: None,
        }
    }
}

impl ChannelAssignment {
    pub fn new(primary: usize, predictor1: usize, predictor2: Option<usize>) -> Self {
        Self {
            primary,
            predictor1,
            predictor2,
        }
    }

    pub fn two_predictor(&self) -> bool {
        self.predictor2.is_some()
    }

    /// Configured `(role, channel)` pairs in primary, predictor 1, predictor 2 order.
    pub fn roles(&self) -> Vec<(ChannelRole, usize)> {
        let mut roles = vec![
            (ChannelRole::Primary, self.primary),
            (ChannelRole::Predictor1, self.predictor1),
        ];
        if let Some(p2) = self.predictor2 {
            roles.push((ChannelRole::Predictor2, p2));
        }
        roles
    }

    /// Rejects duplicate assignments. Needs no image.
    pub fn validate(&self) -> Result<()> {
        if self.primary == self.predictor1 {
            return Err(CorrectionError::DuplicateChannel {
                first: ChannelRole::Primary,
                second: ChannelRole::Predictor1,
                channel: self.primary,
            });
        }
        if let Some(p2) = self.predictor2 {
            if p2 == self.predictor1 {
                return Err(CorrectionError::DuplicateChannel {
                    first: ChannelRole::Predictor1,
                    second: ChannelRole::Predictor2,
                    channel: p2,
                });
            }
            if p2 == self.primary {
                return Err(CorrectionError::DuplicateChannel {
                    first: ChannelRole::Primary,
                    second: ChannelRole::Predictor2,
                    channel: p2,
                });
            }
        }
        Ok(())
    }

    pub fn validate_against(&self, available: usize) -> Result<()> {
        for (role, channel) in self.roles() {
            if channel >= available {
                return Err(CorrectionError::ChannelOutOfRange {
                    role,
                    channel,
                    available,
                });
            }
        }
        Ok(())
    }
}

/// How raw values are checked for clipping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SaturationPolicy {
    Disabled,
    /// Maximum representable value of the image's integer bit depth.
    BitDepthMax,
    Threshold(f64),
}

impl Default for SaturationPolicy {
    fn default() -> Self {
        SaturationPolicy::BitDepthMax
    }
}

impl SaturationPolicy {
    pub fn threshold(&self, bits_per_sample: u32) -> Result<Option<f64>> {
        match self {
            SaturationPolicy::Disabled => Ok(None),
            SaturationPolicy::Threshold(t) => Ok(Some(*t)),
            SaturationPolicy::BitDepthMax => match bits_per_sample {
                8 => Ok(Some(u8::MAX as f64)),
                16 => Ok(Some(u16::MAX as f64)),
                bits => Err(CorrectionError::UnsupportedBitDepth {
                    bits,
                    operation: "saturation check",
                }),
            },
        }
    }
}

/// Raw and smoothed values of one channel at every sampled coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSamples {
    pub channel: usize,
    pub raw: Vec<f64>,
    pub smoothed: Vec<f64>,
    pub saturated: usize,
}

/// Pixels sampled from one region of one image.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbryoSample {
    pub image_name: String,
    /// Time point every channel was taken from.
    pub frame: usize,
    /// In-region coordinates in row-major scan order.
    pub coords: Vec<(usize, usize)>,
    pub primary: ChannelSamples,
    pub predictor1: ChannelSamples,
    pub predictor2: Option<ChannelSamples>,
}

impl EmbryoSample {
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn channels(&self) -> Vec<(ChannelRole, &ChannelSamples)> {
        let mut channels = vec![
            (ChannelRole::Primary, &self.primary),
            (ChannelRole::Predictor1, &self.predictor1),
        ];
        if let Some(p2) = &self.predictor2 {
            channels.push((ChannelRole::Predictor2, p2));
        }
        channels
    }

    /// One warning per channel that had saturated pixels, keyed to that channel.
    pub fn saturation_warnings(&self) -> Vec<NumericalWarning> {
        self.channels()
            .into_iter()
            .filter(|(_, samples)| samples.saturated > 0)
            .map(|(role, samples)| NumericalWarning::Saturation {
                image: self.image_name.clone(),
                role,
                channel: samples.channel,
                count: samples.saturated,
            })
            .collect()
    }
}

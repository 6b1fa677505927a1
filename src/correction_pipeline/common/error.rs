use thiserror::Error;

use crate::correction_pipeline::sampling::ChannelRole;

/// Broad classes of failure. Configuration and input-state errors are raised before any
/// pixel work starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    InputState,
    Io,
}

#[derive(Error, Debug)]
pub enum CorrectionError {
    #[error("{first} and {second} channels must be different (both set to channel {channel})")]
    DuplicateChannel {
        first: ChannelRole,
        second: ChannelRole,
        channel: usize,
    },

    #[error("{role} channel {channel} is out of range for an image with {available} channels")]
    ChannelOutOfRange {
        role: ChannelRole,
        channel: usize,
        available: usize,
    },

    #[error("Two-predictor model requires a predictor 2 image")]
    MissingPredictor2,

    #[error("Samples disagree on whether predictor 2 was sampled")]
    InconsistentSamples,

    #[error("No images selected")]
    NoImagesSelected,

    #[error("Too many images selected: {selected} (maximum {max})")]
    TooManyImages { selected: usize, max: usize },

    #[error("Blur radius must be a finite non-negative number, got {0}")]
    InvalidBlurRadius(f64),

    #[error("Invalid coefficient {name}: {value}")]
    InvalidCoefficient { name: &'static str, value: f64 },

    #[error("No calibrated model is available")]
    NoFittedModel,

    #[error("Image {0} is not available")]
    ImageUnavailable(String),

    #[error("No area selection for image {0}")]
    NotAnArea(String),

    #[error("Region of image {0} contains no pixels")]
    EmptyRegion(String),

    #[error("Need at least {required} sampled pixels to fit the model, got {available}")]
    InsufficientPixels { required: usize, available: usize },

    #[error("Unsupported bit depth {bits} for {operation}")]
    UnsupportedBitDepth { bits: u32, operation: &'static str },

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Image size mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Pixel buffer holds {actual} values, expected {expected}")]
    BufferLength { expected: usize, actual: usize },

    #[error("Channel {channel} does not exist in an image with {available} channels")]
    NoSuchChannel { channel: usize, available: usize },

    #[error("Frame {frame} is out of range for an image with {frames} frames")]
    FrameOutOfRange { frame: usize, frames: usize },

    #[error("Least-squares solve failed: {0}")]
    SolveFailed(String),

    #[error("Delimiter must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(char),

    #[error("Delimited export error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CorrectionError {
    pub fn kind(&self) -> ErrorKind {
        use CorrectionError::*;
        match self {
            DuplicateChannel { .. }
            | ChannelOutOfRange { .. }
            | MissingPredictor2
            | InconsistentSamples
            | NoImagesSelected
            | TooManyImages { .. }
            | InvalidBlurRadius(_)
            | InvalidCoefficient { .. }
            | NoFittedModel
            | InvalidDelimiter(_) => ErrorKind::Configuration,
            ImageUnavailable(_)
            | NotAnArea(_)
            | EmptyRegion(_)
            | InsufficientPixels { .. }
            | UnsupportedBitDepth { .. }
            | InvalidDimensions(..)
            | DimensionMismatch { .. }
            | BufferLength { .. }
            | NoSuchChannel { .. }
            | FrameOutOfRange { .. }
            | SolveFailed(_) => ErrorKind::InputState,
            Csv(_) | Serialization(_) | IoError(_) => ErrorKind::Io,
        }
    }

    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
}

pub type Result<T> = std::result::Result<T, CorrectionError>;

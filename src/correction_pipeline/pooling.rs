//! Pooling of per-image samples into flat regression arrays.

use std::ops::Range;

use tracing::debug;

use crate::correction_pipeline::common::error::{CorrectionError, Result};
use crate::correction_pipeline::sampling::EmbryoSample;

/// Smoothed values of every sample laid end to end, sample-major.
#[derive(Debug, Clone, PartialEq)]
pub struct PooledDataset {
    pub primary: Vec<f64>,
    pub predictor1: Vec<f64>,
    pub predictor2: Option<Vec<f64>>,
    /// For each pooled value, the index of the sample it came from.
    pub sample_index: Vec<usize>,
    /// Range of pooled indices occupied by each sample.
    pub boundaries: Vec<Range<usize>>,
}

impl PooledDataset {
    pub fn len(&self) -> usize {
        self.primary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }

    pub fn sample_count(&self) -> usize {
        self.boundaries.len()
    }
}

pub fn pool(samples: &[EmbryoSample]) -> Result<PooledDataset> {
    let first = samples.first().ok_or(CorrectionError::NoImagesSelected)?;
    let two_predictor = first.predictor2.is_some();
    if samples
        .iter()
        .any(|s| s.predictor2.is_some() != two_predictor)
    {
        return Err(CorrectionError::InconsistentSamples);
    }

    let total: usize = samples.iter().map(EmbryoSample::len).sum();
    let mut primary = Vec::with_capacity(total);
    let mut predictor1 = Vec::with_capacity(total);
    let mut predictor2 = two_predictor.then(|| Vec::with_capacity(total));
    let mut sample_index = Vec::with_capacity(total);
    let mut boundaries = Vec::with_capacity(samples.len());

    for (index, sample) in samples.iter().enumerate() {
        let start = primary.len();
        primary.extend_from_slice(&sample.primary.smoothed);
        predictor1.extend_from_slice(&sample.predictor1.smoothed);
        if let (Some(pooled), Some(p2)) = (predictor2.as_mut(), sample.predictor2.as_ref()) {
            pooled.extend_from_slice(&p2.smoothed);
        }
        sample_index.extend(std::iter::repeat_n(index, sample.len()));
        boundaries.push(start..primary.len());
    }

    debug!(
        samples = samples.len(),
        pixels = total,
        "Pooled calibration samples"
    );

    Ok(PooledDataset {
        primary,
        predictor1,
        predictor2,
        sample_index,
        boundaries,
    })
}

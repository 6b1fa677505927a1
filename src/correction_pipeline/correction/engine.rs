use crate::correction_pipeline::common::error::{CorrectionError, Result};
use crate::correction_pipeline::image::ChannelImage;
use crate::correction_pipeline::regression::LinearModel;
use crate::correction_pipeline::sampling::EmbryoSample;

/// Model prediction and residual at one sampled pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleResidual {
    pub predicted: f64,
    pub residual: f64,
}

/// Subtracts the modelled contamination from every pixel of `primary`.
///
/// Returns `primary - (c + m1 * predictor1 + m2 * predictor2)` as a new image. Inputs
/// are never modified.
pub fn correct(
    primary: &ChannelImage,
    predictor1: &ChannelImage,
    predictor2: Option<&ChannelImage>,
    model: &LinearModel,
) -> Result<ChannelImage> {
    if model.requires_predictor2() && predictor2.is_none() {
        return Err(CorrectionError::MissingPredictor2);
    }
    model.coefficients.validate()?;
    primary.ensure_same_size(predictor1)?;
    if let Some(p2) = predictor2 {
        primary.ensure_same_size(p2)?;
    }

    let data = match predictor2 {
        Some(p2) => primary
            .data
            .iter()
            .zip(&predictor1.data)
            .zip(&p2.data)
            .map(|((&f, &a), &b)| residual(model, f, a, Some(b)))
            .collect(),
        None => primary
            .data
            .iter()
            .zip(&predictor1.data)
            .map(|(&f, &a)| residual(model, f, a, None))
            .collect(),
    };

    ChannelImage::new(primary.width, primary.height, data)
}

#[inline]
fn residual(model: &LinearModel, primary: f32, p1: f32, p2: Option<f32>) -> f32 {
    (primary as f64 - model.predict(p1 as f64, p2.map(f64::from))) as f32
}

/// Prediction and residual for every sampled pixel, from the smoothed values.
pub fn sample_residuals(sample: &EmbryoSample, model: &LinearModel) -> Result<Vec<SampleResidual>> {
    if model.requires_predictor2() && sample.predictor2.is_none() {
        return Err(CorrectionError::MissingPredictor2);
    }

    let p2 = sample.predictor2.as_ref().map(|s| s.smoothed.as_slice());
    Ok(sample
        .primary
        .smoothed
        .iter()
        .zip(&sample.predictor1.smoothed)
        .enumerate()
        .map(|(i, (&f, &a))| {
            let predicted = model.predict(a, p2.map(|v| v[i]));
            SampleResidual {
                predicted,
                residual: f - predicted,
            }
        })
        .collect())
}

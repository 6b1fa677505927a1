use tracing::{debug, warn};

use crate::correction_pipeline::common::error::{CorrectionError, Result};
use crate::correction_pipeline::image::{ChannelImage, ImageSource, Region};
use crate::correction_pipeline::sampling::types::{
    ChannelAssignment, ChannelSamples, EmbryoSample, SaturationPolicy,
};
use crate::correction_pipeline::smoothing::{GaussianSmoother, Smoother};

/// Extracts raw and smoothed channel values under a region.
pub struct PixelSampler<S: Smoother> {
    smoother: S,
    saturation: SaturationPolicy,
}

impl PixelSampler<GaussianSmoother> {
    pub fn new(saturation: SaturationPolicy) -> Self {
        Self {
            smoother: GaussianSmoother,
            saturation,
        }
    }
}

impl<S: Smoother> PixelSampler<S> {
    pub fn with_custom(smoother: S, saturation: SaturationPolicy) -> Self {
        Self {
            smoother,
            saturation,
        }
    }

    pub fn smoother(&self) -> &S {
        &self.smoother
    }

    pub fn set_saturation(&mut self, saturation: SaturationPolicy) {
        self.saturation = saturation;
    }

    /// Checks everything that can be checked without reading pixels.
    pub fn validate<I, R>(
        &self,
        name: &str,
        image: &I,
        assignment: &ChannelAssignment,
        region: &R,
        blur_radius: f64,
    ) -> Result<()>
    where
        I: ImageSource + ?Sized,
        R: Region + ?Sized,
    {
        self.prepare(name, image, assignment, region, blur_radius)
            .map(|_| ())
    }

    /// Validation shared by `validate` and `sample`. Yields the saturation threshold and
    /// the in-region coordinates, so the region is scanned once.
    fn prepare<I, R>(
        &self,
        name: &str,
        image: &I,
        assignment: &ChannelAssignment,
        region: &R,
        blur_radius: f64,
    ) -> Result<(Option<f64>, Vec<(usize, usize)>)>
    where
        I: ImageSource + ?Sized,
        R: Region + ?Sized,
    {
        assignment.validate()?;
        if !blur_radius.is_finite() || blur_radius < 0.0 {
            return Err(CorrectionError::InvalidBlurRadius(blur_radius));
        }
        if !region.is_area() {
            return Err(CorrectionError::NotAnArea(name.to_string()));
        }
        assignment.validate_against(image.channels())?;
        let threshold = self.saturation.threshold(image.bits_per_sample())?;
        let coords = region_coords(image, region);
        if coords.is_empty() {
            return Err(CorrectionError::EmptyRegion(name.to_string()));
        }
        Ok((threshold, coords))
    }

    /// Samples the active frame of `image` inside `region`.
    ///
    /// Each configured channel is split from the same frame and smoothed once over the
    /// whole plane; values are then read at every in-region coordinate in row-major
    /// order.
    pub fn sample<I, R>(
        &self,
        name: &str,
        image: &I,
        assignment: &ChannelAssignment,
        region: &R,
        blur_radius: f64,
    ) -> Result<EmbryoSample>
    where
        I: ImageSource + ?Sized,
        R: Region + ?Sized,
    {
        let (threshold, coords) = self.prepare(name, image, assignment, region, blur_radius)?;
        let frame = image.active_frame();

        debug!(
            image = name,
            frame,
            pixels = coords.len(),
            "Sampling region"
        );

        let read_channel = |channel: usize| -> Result<ChannelSamples> {
            let raw_plane = image.split_channel(channel, frame)?;
            let smoothed_plane = self.smoother.blur(&raw_plane, blur_radius)?;
            raw_plane.ensure_same_size(&smoothed_plane)?;
            Ok(collect_samples(
                channel,
                &raw_plane,
                &smoothed_plane,
                &coords,
                threshold,
            ))
        };

        let primary = read_channel(assignment.primary)?;
        let predictor1 = read_channel(assignment.predictor1)?;
        let predictor2 = assignment.predictor2.map(|channel| read_channel(channel)).transpose()?;

        let sample = EmbryoSample {
            image_name: name.to_string(),
            frame,
            coords,
            primary,
            predictor1,
            predictor2,
        };

        for warning in sample.saturation_warnings() {
            warn!("{}", warning);
        }

        Ok(sample)
    }
}

/// In-region coordinates, `y` outer and `x` inner.
fn region_coords<I, R>(image: &I, region: &R) -> Vec<(usize, usize)>
where
    I: ImageSource + ?Sized,
    R: Region + ?Sized,
{
    let mut coords = Vec::new();
    for y in 0..image.height() {
        for x in 0..image.width() {
            if region.contains(x, y) {
                coords.push((x, y));
            }
        }
    }
    coords
}

fn collect_samples(
    channel: usize,
    raw_plane: &ChannelImage,
    smoothed_plane: &ChannelImage,
    coords: &[(usize, usize)],
    threshold: Option<f64>,
) -> ChannelSamples {
    let mut raw = Vec::with_capacity(coords.len());
    let mut smoothed = Vec::with_capacity(coords.len());
    let mut saturated = 0;

    for &(x, y) in coords {
        let value = raw_plane.get(x, y) as f64;
        if threshold.is_some_and(|t| value >= t) {
            saturated += 1;
        }
        raw.push(value);
        smoothed.push(smoothed_plane.get(x, y) as f64);
    }

    ChannelSamples {
        channel,
        raw,
        smoothed,
        saturated,
    }
}

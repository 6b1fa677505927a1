use image::{ImageBuffer, Luma};
use imageproc::filter::gaussian_blur_f32;
use tracing::debug;

use crate::correction_pipeline::common::error::{CorrectionError, Result};
use crate::correction_pipeline::image::ChannelImage;
use crate::correction_pipeline::smoothing::smoother::Smoother;

/// Below this sigma the off-centre kernel weights are under 1e-21 of the centre weight,
/// so the blur rounds to the identity in f32. `gaussian_blur_f32` also rejects a zero
/// sigma and yields NaN for subnormal ones.
const IDENTITY_SIGMA: f64 = 0.1;

/// Separable Gaussian blur backed by `imageproc`. The radius is the standard deviation in
/// pixels. Edges are handled by clamping to the border pixel.
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussianSmoother;

impl GaussianSmoother {
    /// Sigma actually passed to the kernel for a plane of the given size, or `None` when
    /// the blur is the identity.
    ///
    /// The kernel spans `2 * ceil(2 * sigma) + 1` taps. Sigma is capped at half the longer
    /// side so the kernel never outgrows the plane.
    pub fn effective_sigma(radius: f64, width: usize, height: usize) -> Result<Option<f32>> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(CorrectionError::InvalidBlurRadius(radius));
        }
        if radius < IDENTITY_SIGMA {
            return Ok(None);
        }
        let max_sigma = (width.max(height) as f64 / 2.0).max(IDENTITY_SIGMA);
        Ok(Some(radius.min(max_sigma) as f32))
    }
}

impl Smoother for GaussianSmoother {
    fn blur(&self, image: &ChannelImage, radius: f64) -> Result<ChannelImage> {
        let Some(sigma) = Self::effective_sigma(radius, image.width, image.height)? else {
            return Ok(image.clone());
        };

        debug!(
            "Gaussian blur sigma={} (requested {}) on {}x{} plane",
            sigma, radius, image.width, image.height
        );

        let buffer = ImageBuffer::<Luma<f32>, _>::from_raw(
            image.width as u32,
            image.height as u32,
            image.data.clone(),
        )
        .ok_or(CorrectionError::BufferLength {
            expected: image.width * image.height,
            actual: image.data.len(),
        })?;

        let blurred = gaussian_blur_f32(&buffer, sigma);
        ChannelImage::new(image.width, image.height, blurred.into_raw())
    }
}

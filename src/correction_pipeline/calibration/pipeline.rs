use tracing::{info, instrument};

use crate::correction_pipeline::calibration::timing::StageTimings;
use crate::correction_pipeline::calibration::types::{
    CalibrationConfig, CalibrationOutcome, ImageSelection,
};
use crate::correction_pipeline::common::error::{CorrectionError, Result};
use crate::correction_pipeline::correction::{CorrectionConfig, CorrectionPipeline, FrameSelection};
use crate::correction_pipeline::image::{ChannelImage, ImageRegistry, ImageSource, Roi};
use crate::correction_pipeline::pooling::pool;
use crate::correction_pipeline::regression::{Coefficients, LinearModel, fit};
use crate::correction_pipeline::results::{PlotData, ResultTable};
use crate::correction_pipeline::sampling::{EmbryoSample, PixelSampler};
use crate::correction_pipeline::smoothing::{GaussianSmoother, Smoother};

/// A selection that passed validation, bound to its image and final region.
struct ResolvedImage<'a, I> {
    name: &'a str,
    image: &'a I,
    roi: Roi,
}

/// Fits the bleed-through model from pixels pooled across selected images.
///
/// The most recently fitted model is kept so it can seed a later manual correction; a
/// failed run leaves it untouched.
pub struct CalibrationPipeline<S: Smoother> {
    sampler: PixelSampler<S>,
    config: CalibrationConfig,
    last_model: Option<LinearModel>,
}

impl CalibrationPipeline<GaussianSmoother> {
    pub fn new(config: CalibrationConfig) -> Self {
        Self {
            sampler: PixelSampler::new(config.saturation),
            config,
            last_model: None,
        }
    }
}

impl<S: Smoother> CalibrationPipeline<S> {
    pub fn with_custom(smoother: S, config: CalibrationConfig) -> Self {
        Self {
            sampler: PixelSampler::with_custom(smoother, config.saturation),
            config,
            last_model: None,
        }
    }

    fn resolve<'a, G: ImageRegistry>(
        &self,
        registry: &'a G,
        selections: &'a [ImageSelection],
    ) -> Result<Vec<ResolvedImage<'a, G::Image>>> {
        self.config.validate()?;

        if selections.is_empty() {
            return Err(CorrectionError::NoImagesSelected);
        }
        if selections.len() > self.config.max_images {
            return Err(CorrectionError::TooManyImages {
                selected: selections.len(),
                max: self.config.max_images,
            });
        }

        selections
            .iter()
            .map(|selection| {
                let name = selection.name.as_str();
                let image = registry
                    .get(name)
                    .ok_or_else(|| CorrectionError::ImageUnavailable(name.to_string()))?;

                let roi = if self.config.use_roi {
                    selection
                        .roi
                        .clone()
                        .ok_or_else(|| CorrectionError::NotAnArea(name.to_string()))?
                } else {
                    Roi::whole_image(image.width(), image.height())
                };

                self.sampler.validate(
                    name,
                    image,
                    &self.config.channels,
                    &roi,
                    self.config.blur_radius,
                )?;

                Ok(ResolvedImage { name, image, roi })
            })
            .collect()
    }

    /// Checks the whole selection without reading pixel data.
    pub fn validate<G: ImageRegistry>(
        &self,
        registry: &G,
        selections: &[ImageSelection],
    ) -> Result<()> {
        self.resolve(registry, selections).map(|_| ())
    }

    pub fn run<G: ImageRegistry>(
        &mut self,
        registry: &G,
        selections: &[ImageSelection],
    ) -> Result<CalibrationOutcome> {
        self.run_with_timings(registry, selections)
            .map(|(outcome, _)| outcome)
    }

    #[instrument(skip_all, fields(images = selections.len()))]
    pub fn run_with_timings<G: ImageRegistry>(
        &mut self,
        registry: &G,
        selections: &[ImageSelection],
    ) -> Result<(CalibrationOutcome, StageTimings)> {
        let mut timings = StageTimings::new();
        info!("Starting calibration");

        let resolved = {
            let _span = tracing::info_span!("validate").entered();
            timings.time("validate", || self.resolve(registry, selections))?
        };

        let samples = {
            let _span = tracing::info_span!("sample", radius = self.config.blur_radius).entered();
            timings.time("sample", || {
                resolved
                    .iter()
                    .map(|r| {
                        self.sampler.sample(
                            r.name,
                            r.image,
                            &self.config.channels,
                            &r.roi,
                            self.config.blur_radius,
                        )
                    })
                    .collect::<Result<Vec<_>>>()
            })?
        };
        let mut warnings: Vec<_> = samples
            .iter()
            .flat_map(EmbryoSample::saturation_warnings)
            .collect();

        let pooled = {
            let _span = tracing::info_span!("pool").entered();
            timings.time("pool", || pool(&samples))?
        };

        let model = {
            let _span = tracing::info_span!("fit", pixels = pooled.len()).entered();
            timings.time("fit", || fit(&pooled, self.config.two_predictor()))?
        };
        warnings.extend(model.quality.warning());

        let (table, plot) = {
            let _span = tracing::info_span!("assemble").entered();
            timings.time("assemble", || -> Result<_> {
                Ok((
                    ResultTable::build(&samples, &model)?,
                    PlotData::build(&samples, &model)?,
                ))
            })?
        };

        self.last_model = Some(model);

        let Coefficients { c, m1, m2 } = model.coefficients;
        info!(
            c,
            m1,
            m2,
            r2 = ?model.r_squared(),
            pixels = pooled.len(),
            "Calibration complete"
        );

        Ok((
            CalibrationOutcome {
                model,
                samples,
                pooled,
                table,
                plot,
                warnings,
            },
            timings,
        ))
    }

    /// Applies the last fitted model to the active frame of `image`.
    pub fn residual_image<I: ImageSource + ?Sized>(&self, image: &I) -> Result<ChannelImage> {
        let model = self.last_model.as_ref().ok_or(CorrectionError::NoFittedModel)?;
        let correction = CorrectionPipeline::new(CorrectionConfig {
            channels: self.config.channels,
            frames: FrameSelection::Active,
        });
        let mut stack = correction.run(image, model)?;
        stack
            .frames
            .pop()
            .map(|(_, plane)| plane)
            .ok_or(CorrectionError::FrameOutOfRange {
                frame: image.active_frame(),
                frames: image.frames(),
            })
    }

    pub fn last_model(&self) -> Option<&LinearModel> {
        self.last_model.as_ref()
    }

    /// Coefficients to prefill a manual correction with.
    pub fn manual_defaults(&self) -> Option<Coefficients> {
        self.last_model.map(|m| m.coefficients)
    }

    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: CalibrationConfig) {
        self.sampler.set_saturation(config.saturation);
        self.config = config;
    }
}

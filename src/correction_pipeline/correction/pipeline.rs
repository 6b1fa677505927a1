use tracing::{info, instrument};

use crate::correction_pipeline::common::error::{CorrectionError, Result};
use crate::correction_pipeline::correction::engine::correct;
use crate::correction_pipeline::correction::types::{
    CorrectedStack, CorrectionConfig, FrameSelection,
};
use crate::correction_pipeline::image::{ImageRegistry, ImageSource};
use crate::correction_pipeline::regression::LinearModel;

/// Applies a model to whole images, independent of any calibration run.
pub struct CorrectionPipeline {
    config: CorrectionConfig,
}

impl CorrectionPipeline {
    pub fn new(config: CorrectionConfig) -> Self {
        Self { config }
    }

    /// Everything that must hold before pixel data is touched.
    pub fn validate<I: ImageSource + ?Sized>(&self, image: &I, model: &LinearModel) -> Result<()> {
        let channels = &self.config.channels;
        channels.validate()?;
        if model.requires_predictor2() && channels.predictor2.is_none() {
            return Err(CorrectionError::MissingPredictor2);
        }
        model.coefficients.validate()?;
        channels.validate_against(image.channels())?;
        Ok(())
    }

    #[instrument(skip(self, image, model), fields(width = image.width(), height = image.height()))]
    pub fn run<I: ImageSource + ?Sized>(
        &self,
        image: &I,
        model: &LinearModel,
    ) -> Result<CorrectedStack> {
        self.validate(image, model)?;

        let frames: Vec<usize> = match self.config.frames {
            FrameSelection::Active => vec![image.active_frame()],
            FrameSelection::All => (0..image.frames()).collect(),
        };

        let channels = &self.config.channels;
        let mut corrected = Vec::with_capacity(frames.len());
        for frame in frames {
            let _span = tracing::info_span!("correct_frame", frame).entered();
            let primary = image.split_channel(channels.primary, frame)?;
            let predictor1 = image.split_channel(channels.predictor1, frame)?;
            let predictor2 = channels
                .predictor2
                .map(|c| image.split_channel(c, frame))
                .transpose()?;
            let plane = correct(&primary, &predictor1, predictor2.as_ref(), model)?;
            corrected.push((frame, plane));
        }

        info!(frames = corrected.len(), "Correction complete");
        Ok(CorrectedStack { frames: corrected })
    }

    /// Looks the image up by name first; a closed image is an error.
    pub fn run_named<G: ImageRegistry>(
        &self,
        registry: &G,
        name: &str,
        model: &LinearModel,
    ) -> Result<CorrectedStack> {
        let image = registry
            .get(name)
            .ok_or_else(|| CorrectionError::ImageUnavailable(name.to_string()))?;
        self.run(image, model)
    }

    pub fn config(&self) -> &CorrectionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: CorrectionConfig) {
        self.config = config;
    }
}

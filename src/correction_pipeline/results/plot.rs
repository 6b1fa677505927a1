use crate::correction_pipeline::common::error::Result;
use crate::correction_pipeline::correction::sample_residuals;
use crate::correction_pipeline::regression::LinearModel;
use crate::correction_pipeline::sampling::EmbryoSample;

/// Colours assigned to successive series, wrapping around.
pub const PALETTE: [&str; 10] = [
    "blue",
    "green",
    "red",
    "cyan",
    "magenta",
    "orange",
    "pink",
    "gray",
    "lightGray",
    "darkGray",
];

/// Identity line drawn across the full 16-bit range.
pub const REFERENCE_LINE: [(f64, f64); 2] = [(0.0, 0.0), (65536.0, 65536.0)];

#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub image_id: usize,
    pub name: String,
    pub color: &'static str,
    /// `(predicted, smoothed primary)` pairs.
    pub points: Vec<(f64, f64)>,
}

/// Predicted-versus-observed scatter data.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotData {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<PlotSeries>,
    pub reference_line: [(f64, f64); 2],
    pub equation: String,
}

impl PlotData {
    pub fn build(samples: &[EmbryoSample], model: &LinearModel) -> Result<Self> {
        let series = samples
            .iter()
            .enumerate()
            .map(|(image_id, sample)| {
                let points = sample_residuals(sample, model)?
                    .into_iter()
                    .zip(&sample.primary.smoothed)
                    .map(|(r, &observed)| (r.predicted, observed))
                    .collect();
                Ok(PlotSeries {
                    image_id,
                    name: sample.image_name.clone(),
                    color: PALETTE[image_id % PALETTE.len()],
                    points,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let x_label = if model.two_predictor {
            "Linear model: c + m1 * (Predictor 1) + m2 * (Predictor 2)"
        } else {
            "Linear model: c + m1 * (Predictor 1)"
        };

        Ok(Self {
            title: "Linear model".to_string(),
            x_label: x_label.to_string(),
            y_label: "Primary channel".to_string(),
            series,
            reference_line: REFERENCE_LINE,
            equation: model.equation(),
        })
    }

    /// Legend entries, one per series.
    pub fn legend(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}

use std::collections::HashMap;

use bleedcorr_rs::correction_pipeline::{
    CalibrationConfig, CalibrationPipeline, ChannelAssignment, Coefficients, CorrectionConfig,
    CorrectionPipeline, Hyperstack, ImageSelection, LinearModel, Roi,
};
use bleedcorr_rs::logger;

use tracing::{info, warn};

/// Synthetic two-channel embryo: a bright disc of autofluorescence leaking into the
/// primary channel with `primary = 300 + 0.6 * af`, plus a true signal ring.
fn synthetic_embryo(width: usize, height: usize, signal: f32) -> anyhow::Result<Hyperstack> {
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    let radius = width.min(height) as f32 / 3.0;
    let mut primary = Vec::with_capacity(width * height);
    let mut af = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let d = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
            let a = if d < radius { 2000.0 - 3.0 * d } else { 400.0 };
            let ring = if (d - radius).abs() < 1.5 { signal } else { 0.0 };
            af.push(a);
            primary.push(300.0 + 0.6 * a + ring);
        }
    }
    let planes = [primary, af].concat();
    Ok(Hyperstack::new(width, height, 2, 1, 16, planes)?)
}

fn main() -> anyhow::Result<()> {
    logger::init()?;

    info!("Starting bleed-through calibration demo...");

    let mut images = HashMap::new();
    images.insert("control_1".to_string(), synthetic_embryo(64, 48, 0.0)?);
    images.insert("control_2".to_string(), synthetic_embryo(48, 48, 0.0)?);
    images.insert("sample".to_string(), synthetic_embryo(64, 64, 800.0)?);

    let channels = ChannelAssignment::new(0, 1, None);
    let config = CalibrationConfig::builder()
        .channels(channels)
        .blur_radius(2.0)
        .use_roi(true)
        .build();
    let mut calibration = CalibrationPipeline::new(config);

    let selections = [
        ImageSelection::new("control_1", Some(Roi::rectangle(8, 4, 48, 40))),
        ImageSelection::new("control_2", Some(Roi::rectangle(4, 4, 40, 40))),
    ];
    let (outcome, timings) = calibration.run_with_timings(&images, &selections)?;
    timings.log_summary();

    for warning in &outcome.warnings {
        warn!("{}", warning);
    }
    info!("{}", outcome.model.equation());
    info!("Pixel table: {} rows", outcome.table.len());

    let coefficients: Coefficients = calibration
        .manual_defaults()
        .ok_or_else(|| anyhow::anyhow!("calibration produced no model"))?;
    println!("{}", coefficients.to_json()?);

    let correction = CorrectionPipeline::new(CorrectionConfig::builder().channels(channels).build());
    let model = LinearModel::manual(coefficients)?;
    let corrected = correction.run_named(&images, "sample", &model)?;

    if let Some((frame, plane)) = corrected.frames.first() {
        let max = plane.data.iter().cloned().fold(f32::MIN, f32::max);
        info!(frame = *frame, max, "Corrected sample");
    }

    Ok(())
}

use std::cell::Cell;

use crate::correction_pipeline::common::error::CorrectionError;
use crate::correction_pipeline::common::warning::NumericalWarning;
use crate::correction_pipeline::image::{Hyperstack, Region, Roi};
use crate::correction_pipeline::sampling::{
    ChannelAssignment, ChannelRole, PixelSampler, SaturationPolicy,
};
use crate::correction_pipeline::testing::{
    MeanSmoother, RecordingSmoother, UntouchableImage, linear_stack,
};

fn one_predictor() -> ChannelAssignment {
    ChannelAssignment::new(0, 1, None)
}

#[test]
fn test_row_major_scan_order() {
    let image = linear_stack(4, 3, 0.0, 1.0, |x, y| (y * 10 + x) as f32);
    let sampler = PixelSampler::with_custom(RecordingSmoother::default(), SaturationPolicy::Disabled);

    let sample = sampler
        .sample("img", &image, &one_predictor(), &Roi::rectangle(1, 1, 2, 2), 0.0)
        .unwrap();

    assert_eq!(sample.coords, vec![(1, 1), (2, 1), (1, 2), (2, 2)]);
    assert_eq!(sample.predictor1.raw, vec![11.0, 12.0, 21.0, 22.0]);
    assert_eq!(sample.primary.channel, 0);
    assert_eq!(sample.predictor1.channel, 1);
    assert!(sample.predictor2.is_none());
}

#[test]
fn test_smoothing_runs_once_per_channel_on_whole_plane() {
    let image = linear_stack(6, 5, 1.0, 2.0, |x, _| x as f32);
    let smoother = RecordingSmoother::default();
    let sampler = PixelSampler::with_custom(smoother, SaturationPolicy::Disabled);

    sampler
        .sample("img", &image, &one_predictor(), &Roi::rectangle(0, 0, 2, 2), 1.5)
        .unwrap();

    let calls = sampler.smoother().calls.borrow();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|&(dims, r)| dims == (6, 5) && r == 1.5));
}

#[test]
fn test_smoothed_values_come_from_full_plane() {
    // Mean over the whole predictor plane is 1.5; a region-only blur would give 0.0.
    let image = linear_stack(4, 1, 0.0, 1.0, |x, _| if x < 2 { 0.0 } else { 3.0 });
    let sampler = PixelSampler::with_custom(MeanSmoother, SaturationPolicy::Disabled);

    let sample = sampler
        .sample("img", &image, &one_predictor(), &Roi::rectangle(0, 0, 2, 1), 2.0)
        .unwrap();

    assert_eq!(sample.predictor1.raw, vec![0.0, 0.0]);
    assert_eq!(sample.predictor1.smoothed, vec![1.5, 1.5]);
}

#[test]
fn test_uses_active_frame_for_every_channel() {
    let (w, h) = (2, 2);
    let n = w * h;
    // frame 0: primary 1, predictor 2; frame 1: primary 10, predictor 20
    let mut data = Vec::new();
    data.extend(vec![1.0; n]);
    data.extend(vec![2.0; n]);
    data.extend(vec![10.0; n]);
    data.extend(vec![20.0; n]);
    let mut image = Hyperstack::new(w, h, 2, 2, 16, data).unwrap();
    image.set_active_frame(1).unwrap();

    let sampler = PixelSampler::with_custom(RecordingSmoother::default(), SaturationPolicy::Disabled);
    let sample = sampler
        .sample("movie", &image, &one_predictor(), &Roi::whole_image(w, h), 0.0)
        .unwrap();

    assert_eq!(sample.frame, 1);
    assert!(sample.primary.raw.iter().all(|&v| v == 10.0));
    assert!(sample.predictor1.raw.iter().all(|&v| v == 20.0));
}

#[test]
fn test_saturation_counted_per_channel() {
    let image = linear_stack(3, 1, 0.0, 1.0, |x, _| if x == 0 { 65535.0 } else { 10.0 });
    let sampler = PixelSampler::with_custom(RecordingSmoother::default(), SaturationPolicy::BitDepthMax);

    let sample = sampler
        .sample("sat", &image, &one_predictor(), &Roi::whole_image(3, 1), 0.0)
        .unwrap();

    assert_eq!(sample.primary.saturated, 1);
    assert_eq!(sample.predictor1.saturated, 1);

    let warnings = sample.saturation_warnings();
    assert_eq!(warnings.len(), 2);
    assert_eq!(
        warnings[1],
        NumericalWarning::Saturation {
            image: "sat".to_string(),
            role: ChannelRole::Predictor1,
            channel: 1,
            count: 1,
        }
    );
}

#[test]
fn test_explicit_threshold() {
    let image = linear_stack(4, 1, 0.0, 1.0, |x, _| (x * 100) as f32);
    let sampler = PixelSampler::with_custom(RecordingSmoother::default(), SaturationPolicy::Threshold(200.0));

    let sample = sampler
        .sample("img", &image, &one_predictor(), &Roi::whole_image(4, 1), 0.0)
        .unwrap();

    assert_eq!(sample.predictor1.saturated, 2);
}

#[test]
fn test_point_region_rejected_before_pixel_access() {
    let image = UntouchableImage { channels: 2 };
    let sampler = PixelSampler::with_custom(RecordingSmoother::default(), SaturationPolicy::Disabled);

    let result = sampler.sample("img", &image, &one_predictor(), &Roi::Point { x: 1, y: 1 }, 0.0);

    assert!(matches!(result, Err(CorrectionError::NotAnArea(name)) if name == "img"));
}

#[test]
fn test_duplicate_channels_rejected_before_pixel_access() {
    let image = UntouchableImage { channels: 3 };
    let sampler = PixelSampler::with_custom(RecordingSmoother::default(), SaturationPolicy::Disabled);

    let result = sampler.sample(
        "img",
        &image,
        &ChannelAssignment::new(1, 1, None),
        &Roi::whole_image(4, 4),
        0.0,
    );

    let err = result.unwrap_err();
    assert!(err.is_configuration());
    assert!(matches!(
        err,
        CorrectionError::DuplicateChannel {
            first: ChannelRole::Primary,
            second: ChannelRole::Predictor1,
            channel: 1
        }
    ));
}

#[test]
fn test_channel_out_of_range() {
    let image = UntouchableImage { channels: 2 };
    let sampler = PixelSampler::with_custom(RecordingSmoother::default(), SaturationPolicy::Disabled);

    let result = sampler.sample(
        "img",
        &image,
        &ChannelAssignment::new(0, 1, Some(2)),
        &Roi::whole_image(4, 4),
        0.0,
    );

    assert!(matches!(
        result,
        Err(CorrectionError::ChannelOutOfRange {
            role: ChannelRole::Predictor2,
            channel: 2,
            available: 2
        })
    ));
}

#[test]
fn test_float_image_cannot_use_bit_depth_saturation() {
    let image = Hyperstack::new(2, 2, 2, 1, 32, vec![0.0; 8]).unwrap();
    let sampler = PixelSampler::with_custom(RecordingSmoother::default(), SaturationPolicy::BitDepthMax);

    let result = sampler.sample("float", &image, &one_predictor(), &Roi::whole_image(2, 2), 0.0);

    assert!(matches!(
        result,
        Err(CorrectionError::UnsupportedBitDepth { bits: 32, .. })
    ));
}

#[test]
fn test_region_outside_image_is_empty() {
    let image = linear_stack(4, 4, 0.0, 1.0, |x, _| x as f32);
    let sampler = PixelSampler::with_custom(RecordingSmoother::default(), SaturationPolicy::Disabled);

    let result = sampler.sample("img", &image, &one_predictor(), &Roi::rectangle(10, 10, 3, 3), 0.0);

    assert!(matches!(result, Err(CorrectionError::EmptyRegion(_))));
}

struct CountingRegion {
    inner: Roi,
    calls: Cell<usize>,
}

impl Region for CountingRegion {
    fn contains(&self, x: usize, y: usize) -> bool {
        self.calls.set(self.calls.get() + 1);
        self.inner.contains(x, y)
    }

    fn is_area(&self) -> bool {
        self.inner.is_area()
    }
}

#[test]
fn test_region_scanned_once_per_sample() {
    let image = linear_stack(5, 4, 0.0, 1.0, |x, y| (x + y) as f32);
    let sampler = PixelSampler::with_custom(RecordingSmoother::default(), SaturationPolicy::Disabled);
    let region = CountingRegion {
        inner: Roi::rectangle(1, 1, 3, 2),
        calls: Cell::new(0),
    };

    let sample = sampler
        .sample("img", &image, &one_predictor(), &region, 0.0)
        .unwrap();

    assert_eq!(sample.len(), 6);
    assert_eq!(region.calls.get(), 5 * 4);
}

#[test]
fn test_vanishing_radius_samples_raw_values() {
    let image = linear_stack(6, 6, 3.0, 2.0, |x, y| (x * 7 + y) as f32);
    let sampler = PixelSampler::new(SaturationPolicy::BitDepthMax);

    let sample = sampler
        .sample("img", &image, &one_predictor(), &Roi::whole_image(6, 6), 1e-50)
        .unwrap();

    assert_eq!(sample.primary.smoothed, sample.primary.raw);
    assert_eq!(sample.predictor1.smoothed, sample.predictor1.raw);
}

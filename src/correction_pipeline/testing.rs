//! Shared fixtures for unit tests.

use std::cell::RefCell;

use crate::correction_pipeline::common::error::Result;
use crate::correction_pipeline::image::{ChannelImage, Hyperstack, ImageSource};
use crate::correction_pipeline::smoothing::Smoother;

/// Two-channel 16-bit stack where channel 1 holds `predictor(x, y)` and channel 0 holds
/// `c + m * predictor`.
pub fn linear_stack(
    width: usize,
    height: usize,
    c: f32,
    m: f32,
    predictor: impl Fn(usize, usize) -> f32,
) -> Hyperstack {
    let mut primary = Vec::with_capacity(width * height);
    let mut pred = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let p = predictor(x, y);
            pred.push(p);
            primary.push(c + m * p);
        }
    }
    let data = primary.into_iter().chain(pred).collect();
    Hyperstack::new(width, height, 2, 1, 16, data).unwrap()
}

/// Three-channel 16-bit stack: primary, predictor 1, predictor 2.
pub fn two_predictor_stack(
    width: usize,
    height: usize,
    (c, m1, m2): (f32, f32, f32),
    p1: impl Fn(usize, usize) -> f32,
    p2: impl Fn(usize, usize) -> f32,
) -> Hyperstack {
    let n = width * height;
    let mut data = vec![0.0; 3 * n];
    for y in 0..height {
        for x in 0..width {
            let i = y * width + x;
            let a = p1(x, y);
            let b = p2(x, y);
            data[i] = c + m1 * a + m2 * b;
            data[n + i] = a;
            data[2 * n + i] = b;
        }
    }
    Hyperstack::new(width, height, 3, 1, 16, data).unwrap()
}

/// Smoother that records each call and returns the input unchanged.
#[derive(Default)]
pub struct RecordingSmoother {
    pub calls: RefCell<Vec<((usize, usize), f64)>>,
}

impl Smoother for RecordingSmoother {
    fn blur(&self, image: &ChannelImage, radius: f64) -> Result<ChannelImage> {
        self.calls.borrow_mut().push((image.dimensions(), radius));
        Ok(image.clone())
    }
}

/// Smoother that replaces every pixel with the plane mean, making it obvious whether the
/// whole plane or only the region was blurred.
pub struct MeanSmoother;

impl Smoother for MeanSmoother {
    fn blur(&self, image: &ChannelImage, _radius: f64) -> Result<ChannelImage> {
        let mean = image.data.iter().sum::<f32>() / image.data.len() as f32;
        ChannelImage::filled(image.width, image.height, mean)
    }
}

/// Image that panics when its pixels are read.
pub struct UntouchableImage {
    pub channels: usize,
}

impl ImageSource for UntouchableImage {
    fn width(&self) -> usize {
        4
    }
    fn height(&self) -> usize {
        4
    }
    fn channels(&self) -> usize {
        self.channels
    }
    fn frames(&self) -> usize {
        1
    }
    fn active_frame(&self) -> usize {
        0
    }
    fn bits_per_sample(&self) -> u32 {
        16
    }
    fn pixel(&self, _channel: usize, _frame: usize, _x: usize, _y: usize) -> f32 {
        panic!("pixel data must not be read");
    }
}

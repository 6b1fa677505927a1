use std::collections::HashMap;

use crate::correction_pipeline::image::source::ImageSource;
use crate::correction_pipeline::image::types::Hyperstack;

/// Looks up open images by name at execution time.
pub trait ImageRegistry {
    type Image: ImageSource;

    fn get(&self, name: &str) -> Option<&Self::Image>;
}

impl ImageRegistry for HashMap<String, Hyperstack> {
    type Image = Hyperstack;

    fn get(&self, name: &str) -> Option<&Hyperstack> {
        HashMap::get(self, name)
    }
}

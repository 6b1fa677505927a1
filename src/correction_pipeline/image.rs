//! Image access module
//!
//! Channel planes, multi-channel hyperstacks, the registry of open images, and regions of
//! interest. These are the collaborator contracts the calibration and correction engines
//! consume.

mod registry;
mod source;
pub mod region;
pub mod types;

pub use region::{Region, Roi};
pub use registry::ImageRegistry;
pub use source::ImageSource;
pub use types::{ChannelImage, Hyperstack};

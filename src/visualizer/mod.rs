//! Display support for overlaid frames.

pub mod color;
#[cfg(feature = "visualize")]
pub mod viewer;

pub use color::Color;
#[cfg(feature = "visualize")]
pub use viewer::Viewer;

//! Overlay pipeline configuration.
//!
//! This module defines the [`OverlayConfig`] struct, which controls the
//! confidence threshold, model input size, target frame rate, and drawing
//! style of the skeleton overlay.

use crate::error::{OverlayError, Result};
use crate::visualizer::Color;

/// Configuration for the pose overlay pipeline.
///
/// Uses a builder pattern for convenient construction.
///
/// # Example
///
/// ```rust
/// use pose_overlay::OverlayConfig;
///
/// let config = OverlayConfig::new()
///     .with_confidence(0.5)
///     .with_target_fps(24)
///     .with_marker_radius(6);
/// ```
#[derive(Debug, Clone)]
pub struct OverlayConfig {
    /// Confidence threshold for joints (0.0 to 1.0). A joint whose score does
    /// not strictly exceed this value is treated as absent.
    pub confidence_threshold: f32,
    /// Model input size as (height, width).
    pub input_size: (usize, usize),
    /// Target frame rate; frames arriving faster than this are dropped.
    pub target_fps: u32,
    /// Skeleton line stroke width in pixels.
    pub line_width: u32,
    /// Skeleton line color.
    pub line_color: Color,
    /// Joint marker radius in pixels.
    pub marker_radius: i32,
    /// Joint marker color.
    pub marker_color: Color,
    /// Number of intra-op threads for ONNX Runtime (0 lets the runtime decide).
    pub num_threads: usize,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.3,
            input_size: (192, 192),
            target_fps: 30,
            line_width: 3,
            line_color: Color::WHITE,
            marker_radius: 4,
            marker_color: Color::RED,
            num_threads: 0,
        }
    }
}

impl OverlayConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the joint confidence threshold.
    ///
    /// # Arguments
    ///
    /// * `threshold` - The minimum confidence score (0.0 to 1.0).
    #[must_use]
    pub const fn with_confidence(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Set the model input size.
    ///
    /// # Arguments
    ///
    /// * `height` - Input tensor height.
    /// * `width` - Input tensor width.
    #[must_use]
    pub const fn with_input_size(mut self, height: usize, width: usize) -> Self {
        self.input_size = (height, width);
        self
    }

    /// Set the target frame rate for frame processing.
    #[must_use]
    pub const fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    /// Set the skeleton line stroke width.
    #[must_use]
    pub const fn with_line_width(mut self, width: u32) -> Self {
        self.line_width = width;
        self
    }

    /// Set the skeleton line color.
    #[must_use]
    pub const fn with_line_color(mut self, color: Color) -> Self {
        self.line_color = color;
        self
    }

    /// Set the joint marker radius.
    #[must_use]
    pub const fn with_marker_radius(mut self, radius: i32) -> Self {
        self.marker_radius = radius;
        self
    }

    /// Set the joint marker color.
    #[must_use]
    pub const fn with_marker_color(mut self, color: Color) -> Self {
        self.marker_color = color;
        self
    }

    /// Set the number of intra-op threads for inference.
    #[must_use]
    pub const fn with_threads(mut self, threads: usize) -> Self {
        self.num_threads = threads;
        self
    }

    /// Check the configuration for values the pipeline cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::ConfigError`] if the confidence threshold is
    /// outside [0, 1] or the input size has a zero dimension.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(OverlayError::ConfigError(format!(
                "confidence threshold must be in [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if self.input_size.0 == 0 || self.input_size.1 == 0 {
            return Err(OverlayError::ConfigError(format!(
                "input size must be non-zero, got ({}, {})",
                self.input_size.0, self.input_size.1
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = OverlayConfig::default();
        assert!((config.confidence_threshold - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.input_size, (192, 192));
        assert_eq!(config.target_fps, 30);
        assert_eq!(config.line_width, 3);
        assert_eq!(config.marker_radius, 4);
        assert_eq!(config.line_color, Color::WHITE);
        assert_eq!(config.marker_color, Color::RED);
    }

    #[test]
    fn test_config_builder() {
        let config = OverlayConfig::new()
            .with_confidence(0.5)
            .with_input_size(256, 256)
            .with_target_fps(24)
            .with_line_width(2)
            .with_marker_radius(6)
            .with_threads(4);

        assert!((config.confidence_threshold - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.input_size, (256, 256));
        assert_eq!(config.target_fps, 24);
        assert_eq!(config.line_width, 2);
        assert_eq!(config.marker_radius, 6);
        assert_eq!(config.num_threads, 4);
    }

    #[test]
    fn test_config_validate_defaults_ok() {
        assert!(OverlayConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validate_rejects_bad_confidence() {
        let negative = OverlayConfig::new().with_confidence(-0.1);
        assert!(matches!(
            negative.validate(),
            Err(OverlayError::ConfigError(_))
        ));

        let above_one = OverlayConfig::new().with_confidence(1.5);
        assert!(above_one.validate().is_err());
    }

    #[test]
    fn test_config_validate_rejects_zero_input_size() {
        let config = OverlayConfig::new().with_input_size(0, 192);
        assert!(matches!(config.validate(), Err(OverlayError::ConfigError(_))));
    }
}

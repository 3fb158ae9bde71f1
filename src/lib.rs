#![allow(clippy::multiple_crate_versions)]

//! # Pose Overlay
//!
//! Real-time single-person pose skeleton overlay written in Rust. Runs a
//! 17-keypoint pose estimation model (MoveNet-style ONNX export) over frames
//! from images, videos, or a webcam, and draws the skeleton on top of each
//! frame.
//!
//! ## Features
//!
//! - **ONNX Runtime** - Hardware-accelerated inference via ONNX Runtime
//! - **17-Keypoint Skeletons** - COCO-style joints with a fixed connection table
//! - **Confidence Gating** - Joints below the confidence threshold are omitted,
//!   along with any skeleton line touching them
//! - **Frame Rate Limiting** - Frames arriving faster than the target rate are
//!   dropped while the last pose stays on screen
//! - **Multiple Sources** - Images, directories, video files, webcams, streams
//!
//! ## Quick Start (Library)
//!
//! ```no_run
//! use pose_overlay::{OverlayConfig, PoseModel, build_scene, decode_pose, draw_scene};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OverlayConfig::new().with_confidence(0.3);
//!     let mut model = PoseModel::load_with_config("movenet.onnx", &config)?;
//!
//!     let frame = image::open("person.jpg")?;
//!     let tensor = pose_overlay::frame_to_tensor(&frame, config.input_size)?;
//!     let output = model.run(&tensor)?;
//!
//!     let pose = decode_pose(&output, config.confidence_threshold)?;
//!     let scene = build_scene(&pose, frame.width(), frame.height());
//!     let overlaid = draw_scene(&frame, &scene, &config);
//!     overlaid.save("person_overlay.jpg")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # Overlay on a single image
//! pose-overlay overlay --model movenet.onnx --source person.jpg --save
//!
//! # Live webcam overlay
//! pose-overlay overlay --model movenet.onnx --source 0 --show
//!
//! # Video with a custom threshold and frame rate cap
//! pose-overlay overlay -m movenet.onnx -s video.mp4 --conf 0.5 --fps 15 --show
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`model`] | [`PoseModel`] for loading ONNX pose models and running inference |
//! | [`decoder`] | Raw model output to [`Pose`] decoding with confidence gating |
//! | [`keypoint`] | [`Keypoint`], [`KeypointKind`], and [`Pose`] types |
//! | [`skeleton`] | The fixed joint connection table |
//! | [`scene`] | Pose to drawable [`Scene`] conversion (lines and markers) |
//! | [`overlay`] | Rasterizing a [`Scene`] onto a frame |
//! | [`mailbox`] | [`PoseSlot`] single-value handoff between threads |
//! | [`pipeline`] | End-to-end per-frame processing with frame rate limiting |
//! | [`source`] | Input source handling ([`Source`], [`SourceIterator`]) |
//! | [`config`] | [`OverlayConfig`] builder |
//! | [`error`] | Error types ([`OverlayError`], [`Result`]) |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `visualize` | Real-time window display (default) |
//! | `video` | Video file, webcam, and stream support |

// Modules
pub mod cli;
pub mod config;
pub mod decoder;
pub mod error;
pub mod keypoint;
pub mod mailbox;
pub mod model;
pub mod overlay;
pub mod pipeline;
pub mod preprocessing;
pub mod scene;
pub mod skeleton;
pub mod source;
pub mod visualizer;

// Re-export main types for convenience
pub use config::OverlayConfig;
pub use decoder::{OUTPUT_LEN, decode_pose};
pub use error::{OverlayError, Result};
pub use keypoint::{KEYPOINT_KINDS, Keypoint, KeypointKind, NUM_KEYPOINTS, Pose};
pub use mailbox::PoseSlot;
pub use model::PoseModel;
pub use overlay::draw_scene;
pub use pipeline::{FrameGate, FrameSpeed, Pipeline};
pub use preprocessing::frame_to_tensor;
pub use scene::{LineSegment, Marker, Scene, build_scene};
pub use skeleton::SKELETON;
pub use source::{FrameMeta, Source, SourceIterator};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(VERSION.contains('.'));
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "pose-overlay");
    }
}

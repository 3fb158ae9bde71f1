//! Per-frame capture/inference driver.
//!
//! The [`Pipeline`] runs the fixed per-frame sequence: gate on frame rate
//! and model availability, resize the frame to the model's input tensor,
//! run inference, decode the output buffer, and publish the resulting pose
//! through the shared [`PoseSlot`]. There is no retry - a skipped or failed
//! frame is simply superseded by the next one.

use std::sync::Arc;
use std::time::{Duration, Instant};

use image::DynamicImage;

use crate::config::OverlayConfig;
use crate::decoder::decode_pose;
use crate::error::Result;
use crate::keypoint::Pose;
use crate::mailbox::PoseSlot;
use crate::model::PoseModel;
use crate::preprocessing::frame_to_tensor;

/// Timing information for one processed frame (in milliseconds).
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameSpeed {
    /// Time spent resizing the frame into the input tensor.
    pub preprocess: f64,
    /// Time spent on model inference.
    pub inference: f64,
    /// Time spent decoding the output buffer.
    pub decode: f64,
}

impl FrameSpeed {
    /// Total processing time for the frame.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.preprocess + self.inference + self.decode
    }
}

/// Frame-rate gate: admits at most `target_fps` frames per second.
///
/// Frames arriving faster than the target interval are dropped; there is no
/// buffering, the next admitted frame is simply the next one to arrive after
/// the interval elapses.
#[derive(Debug)]
pub struct FrameGate {
    interval: Duration,
    last_admitted: Option<Instant>,
}

impl FrameGate {
    /// Create a gate for the given target frame rate. A rate of 0 admits
    /// every frame.
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let interval = if target_fps == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        };
        Self {
            interval,
            last_admitted: None,
        }
    }

    /// Decide whether a frame arriving at `now` should be processed.
    pub fn admit(&mut self, now: Instant) -> bool {
        match self.last_admitted {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last_admitted = Some(now);
                true
            }
        }
    }
}

/// The capture/inference orchestrator.
pub struct Pipeline {
    model: Option<PoseModel>,
    config: OverlayConfig,
    gate: FrameGate,
    slot: Arc<PoseSlot>,
}

impl Pipeline {
    /// Create a pipeline with no model attached. Frames are skipped until
    /// [`Self::attach_model`] is called; a previously published pose stays
    /// visible in the slot.
    #[must_use]
    pub fn new(config: OverlayConfig, slot: Arc<PoseSlot>) -> Self {
        let gate = FrameGate::new(config.target_fps);
        Self {
            model: None,
            config,
            gate,
            slot,
        }
    }

    /// Create a pipeline with a loaded model.
    #[must_use]
    pub fn with_model(model: PoseModel, config: OverlayConfig, slot: Arc<PoseSlot>) -> Self {
        let mut pipeline = Self::new(config, slot);
        pipeline.model = Some(model);
        pipeline
    }

    /// Attach a loaded model; subsequent frames are processed.
    pub fn attach_model(&mut self, model: PoseModel) {
        self.model = Some(model);
    }

    /// Whether a model is attached and frames will be processed.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// The shared pose slot this pipeline publishes into.
    #[must_use]
    pub fn slot(&self) -> Arc<PoseSlot> {
        Arc::clone(&self.slot)
    }

    /// Process one frame: resize, infer, decode, publish.
    ///
    /// Returns `Ok(None)` when the frame is skipped (no model attached, or
    /// dropped by the frame-rate gate) - the slot keeps its previous pose.
    /// On success the decoded pose is published to the slot and returned
    /// with its stage timings.
    ///
    /// # Errors
    ///
    /// Returns an error if preprocessing, inference, or decoding fails. The
    /// slot is left untouched in that case; the caller is expected to drop
    /// the frame and continue.
    pub fn process_frame(&mut self, frame: &DynamicImage) -> Result<Option<(Pose, FrameSpeed)>> {
        if !self.gate.admit(Instant::now()) {
            return Ok(None);
        }

        let Some(model) = self.model.as_mut() else {
            return Ok(None);
        };

        let start = Instant::now();
        let tensor = frame_to_tensor(frame, self.config.input_size)?;
        let preprocess = start.elapsed().as_secs_f64() * 1000.0;

        let start = Instant::now();
        let output = model.run(&tensor)?;
        let inference = start.elapsed().as_secs_f64() * 1000.0;

        let start = Instant::now();
        let pose = decode_pose(&output, self.config.confidence_threshold)?;
        let decode = start.elapsed().as_secs_f64() * 1000.0;

        self.slot.publish(pose);

        Ok(Some((
            pose,
            FrameSpeed {
                preprocess,
                inference,
                decode,
            },
        )))
    }
}

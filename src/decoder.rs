//! Pose model output decoding.
//!
//! The single-pose model emits one flat buffer of 51 floats: 17 joints of
//! (y, x, score) triplets in COCO keypoint order. Decoding thresholds each
//! joint's score and produces a fixed 17-entry [`Pose`]. The function is
//! pure: same buffer in, same pose out.

use crate::error::{OverlayError, Result};
use crate::keypoint::{Keypoint, NUM_KEYPOINTS, Pose};

/// Expected output buffer length: 17 joints x (y, x, score).
pub const OUTPUT_LEN: usize = NUM_KEYPOINTS * 3;

/// Decode a flat model output buffer into a [`Pose`].
///
/// Each triplet is laid out as (y, x, score). A joint is present only when
/// its score strictly exceeds `threshold`; a score exactly at the threshold
/// yields an absent joint.
///
/// # Arguments
///
/// * `output` - Flat output buffer, length must be exactly 51.
/// * `threshold` - Minimum confidence for a joint to be considered present.
///
/// # Errors
///
/// Returns [`OverlayError::DecodeError`] if the buffer length is not 51.
pub fn decode_pose(output: &[f32], threshold: f32) -> Result<Pose> {
    if output.len() != OUTPUT_LEN {
        return Err(OverlayError::DecodeError(format!(
            "expected {OUTPUT_LEN} output values (17 joints x 3), got {}",
            output.len()
        )));
    }

    let mut joints = [None; NUM_KEYPOINTS];
    for (i, joint) in joints.iter_mut().enumerate() {
        let y = output[i * 3];
        let x = output[i * 3 + 1];
        let score = output[i * 3 + 2];
        if score > threshold {
            *joint = Some(Keypoint::new(x, y, score));
        }
    }

    Ok(Pose::new(joints))
}

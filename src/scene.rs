//! Declarative overlay scene.
//!
//! A [`Scene`] is a plain value - line segments for each connected joint
//! pair plus a marker per present joint - computed fresh from a [`Pose`]
//! and the target pixel dimensions. Normalized coordinates are scaled to
//! pixel space exactly here and nowhere else, so rebuilding a scene from
//! the same pose always yields the same drawing.

use crate::keypoint::Pose;
use crate::skeleton::SKELETON;

/// A skeleton line between two joints, in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// Start point (x, y).
    pub start: (f32, f32),
    /// End point (x, y).
    pub end: (f32, f32),
}

/// A joint marker, in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    /// Marker center (x, y).
    pub center: (f32, f32),
    /// Model output index of the joint this marker belongs to.
    pub joint_index: usize,
}

/// Drawable overlay scene for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    /// Skeleton lines, one per connection whose endpoints are both present.
    pub lines: Vec<LineSegment>,
    /// Joint markers, one per present joint.
    pub markers: Vec<Marker>,
}

impl Scene {
    /// Check if the scene draws nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.markers.is_empty()
    }
}

/// Build the overlay scene for a pose at the given pixel dimensions.
///
/// For each skeleton connection (i, j): a line is emitted only when both
/// joints are present. Every present joint additionally gets a marker.
/// Absent joints contribute nothing and cause no errors.
///
/// # Arguments
///
/// * `pose` - The current 17-entry joint list.
/// * `width` - Target surface width in pixels.
/// * `height` - Target surface height in pixels.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn build_scene(pose: &Pose, width: u32, height: u32) -> Scene {
    let (w, h) = (width as f32, height as f32);

    let lines = SKELETON
        .iter()
        .filter_map(|&[i, j]| {
            let a = pose.joint(i)?;
            let b = pose.joint(j)?;
            Some(LineSegment {
                start: (a.x * w, a.y * h),
                end: (b.x * w, b.y * h),
            })
        })
        .collect();

    let markers = pose
        .iter()
        .enumerate()
        .filter_map(|(idx, joint)| {
            joint.map(|kp| Marker {
                center: (kp.x * w, kp.y * h),
                joint_index: idx,
            })
        })
        .collect();

    Scene { lines, markers }
}

//! Keypoint and pose types.
//!
//! A pose is a fixed list of 17 joints in COCO keypoint order, each either
//! present with a normalized position or absent (below the confidence
//! threshold). The list is replaced wholesale on every inference; no joint
//! identity is carried across frames.

use std::fmt;
use std::str::FromStr;

/// Number of joints produced by the pose model.
pub const NUM_KEYPOINTS: usize = 17;

/// The 17 anatomical landmarks, in the model's output order (COCO convention).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum KeypointKind {
    /// Nose (index 0).
    Nose = 0,
    /// Left eye (index 1).
    LeftEye = 1,
    /// Right eye (index 2).
    RightEye = 2,
    /// Left ear (index 3).
    LeftEar = 3,
    /// Right ear (index 4).
    RightEar = 4,
    /// Left shoulder (index 5).
    LeftShoulder = 5,
    /// Right shoulder (index 6).
    RightShoulder = 6,
    /// Left elbow (index 7).
    LeftElbow = 7,
    /// Right elbow (index 8).
    RightElbow = 8,
    /// Left wrist (index 9).
    LeftWrist = 9,
    /// Right wrist (index 10).
    RightWrist = 10,
    /// Left hip (index 11).
    LeftHip = 11,
    /// Right hip (index 12).
    RightHip = 12,
    /// Left knee (index 13).
    LeftKnee = 13,
    /// Right knee (index 14).
    RightKnee = 14,
    /// Left ankle (index 15).
    LeftAnkle = 15,
    /// Right ankle (index 16).
    RightAnkle = 16,
}

/// All keypoint kinds in output order.
pub const KEYPOINT_KINDS: [KeypointKind; NUM_KEYPOINTS] = [
    KeypointKind::Nose,
    KeypointKind::LeftEye,
    KeypointKind::RightEye,
    KeypointKind::LeftEar,
    KeypointKind::RightEar,
    KeypointKind::LeftShoulder,
    KeypointKind::RightShoulder,
    KeypointKind::LeftElbow,
    KeypointKind::RightElbow,
    KeypointKind::LeftWrist,
    KeypointKind::RightWrist,
    KeypointKind::LeftHip,
    KeypointKind::RightHip,
    KeypointKind::LeftKnee,
    KeypointKind::RightKnee,
    KeypointKind::LeftAnkle,
    KeypointKind::RightAnkle,
];

impl KeypointKind {
    /// Returns the string representation of the landmark.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }

    /// Returns the model output index of this landmark.
    #[must_use]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Look up a landmark by model output index.
    ///
    /// # Returns
    ///
    /// * `Some` kind for indices 0..17, otherwise `None`.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        KEYPOINT_KINDS.get(index).copied()
    }
}

impl fmt::Display for KeypointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for KeypointKind {
    type Err = KeypointParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        KEYPOINT_KINDS
            .iter()
            .find(|k| k.as_str() == lower)
            .copied()
            .ok_or_else(|| KeypointParseError(s.to_string()))
    }
}

/// Error returned when parsing an invalid keypoint name.
#[derive(Debug, Clone)]
pub struct KeypointParseError(String);

impl fmt::Display for KeypointParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid keypoint '{}', expected a COCO landmark name", self.0)
    }
}

impl std::error::Error for KeypointParseError {}

/// A detected joint: normalized position plus confidence score.
///
/// Coordinates are in [0, 1] relative to the model input frame. They are
/// scaled to pixel space only when a scene is built, never stored pre-scaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    /// Normalized horizontal position.
    pub x: f32,
    /// Normalized vertical position.
    pub y: f32,
    /// Confidence score in [0, 1].
    pub score: f32,
}

impl Keypoint {
    /// Create a new keypoint.
    #[must_use]
    pub const fn new(x: f32, y: f32, score: f32) -> Self {
        Self { x, y, score }
    }
}

/// One frame's joint list: exactly 17 entries, each present or absent.
///
/// Produced fresh by the decoder on every inference and replaced wholesale;
/// `Copy` so the render side always takes a complete snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    joints: [Option<Keypoint>; NUM_KEYPOINTS],
}

impl Pose {
    /// Create a pose from a full joint array.
    #[must_use]
    pub const fn new(joints: [Option<Keypoint>; NUM_KEYPOINTS]) -> Self {
        Self { joints }
    }

    /// Get a joint by model output index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 17`.
    #[must_use]
    pub fn joint(&self, index: usize) -> Option<Keypoint> {
        self.joints[index]
    }

    /// Get a joint by landmark kind.
    #[must_use]
    pub fn joint_of(&self, kind: KeypointKind) -> Option<Keypoint> {
        self.joints[kind.index()]
    }

    /// Iterate over all 17 joint slots in output order.
    pub fn iter(&self) -> impl Iterator<Item = &Option<Keypoint>> {
        self.joints.iter()
    }

    /// Count of present joints.
    #[must_use]
    pub fn present_count(&self) -> usize {
        self.joints.iter().filter(|j| j.is_some()).count()
    }

    /// Check if no joint cleared the confidence threshold.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.present_count() == 0
    }
}

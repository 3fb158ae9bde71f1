//! Latest-pose hand-off between the inference and render contexts.
//!
//! A [`PoseSlot`] is a single-slot mailbox with overwrite semantics: the
//! frame-processing thread publishes a complete [`Pose`] and the render
//! thread reads the latest one. There is exactly one value in flight -
//! a publish replaces the previous pose wholesale, so the reader can never
//! observe a torn mix of old and new joints. Stale poses are dropped, not
//! queued.

use std::sync::Mutex;

use crate::keypoint::Pose;

/// Single-slot pose mailbox shared between two threads.
#[derive(Debug, Default)]
pub struct PoseSlot {
    slot: Mutex<Option<Pose>>,
}

impl PoseSlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a new pose, replacing whatever was there.
    pub fn publish(&self, pose: Pose) {
        // Lock poisoning only happens if a holder panicked; the slot content
        // is always a complete value, so recover it.
        let mut guard = self.slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard = Some(pose);
    }

    /// Read the latest published pose without consuming it.
    ///
    /// Returns `None` until the first publish; afterwards always returns the
    /// most recently published pose.
    #[must_use]
    pub fn latest(&self) -> Option<Pose> {
        let guard = self.slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypoint::{Keypoint, NUM_KEYPOINTS};
    use std::sync::Arc;

    fn pose_with_nose(x: f32) -> Pose {
        let mut joints = [None; NUM_KEYPOINTS];
        joints[0] = Some(Keypoint::new(x, 0.5, 0.9));
        Pose::new(joints)
    }

    #[test]
    fn test_empty_until_first_publish() {
        let slot = PoseSlot::new();
        assert!(slot.latest().is_none());
    }

    #[test]
    fn test_publish_replaces_wholesale() {
        let slot = PoseSlot::new();
        slot.publish(pose_with_nose(0.1));
        slot.publish(pose_with_nose(0.2));

        let latest = slot.latest().unwrap();
        assert!((latest.joint(0).unwrap().x - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_read_does_not_consume() {
        let slot = PoseSlot::new();
        slot.publish(pose_with_nose(0.4));

        assert!(slot.latest().is_some());
        assert!(slot.latest().is_some());
    }

    #[test]
    fn test_cross_thread_publish() {
        let slot = Arc::new(PoseSlot::new());
        let producer = Arc::clone(&slot);

        let handle = std::thread::spawn(move || {
            for i in 0..100 {
                #[allow(clippy::cast_precision_loss)]
                producer.publish(pose_with_nose(i as f32 / 100.0));
            }
        });

        // Reader only ever sees complete 17-entry snapshots.
        while !handle.is_finished() {
            if let Some(pose) = slot.latest() {
                assert_eq!(pose.present_count(), 1);
            }
        }
        handle.join().unwrap();

        let last = slot.latest().unwrap();
        assert!((last.joint(0).unwrap().x - 0.99).abs() < 1e-6);
    }
}

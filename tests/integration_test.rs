//! Integration tests for the pose overlay library.
//!
//! Exercises the decode, scene, raster, and handoff stages together without
//! requiring an ONNX model file.

use std::sync::Arc;

use image::{DynamicImage, GenericImageView, RgbImage};
use pose_overlay::{
    NUM_KEYPOINTS, OUTPUT_LEN, OverlayConfig, PoseSlot, SKELETON, build_scene, decode_pose,
    draw_scene, frame_to_tensor,
};

/// Build a raw output buffer where every joint has the given score and all
/// joints sit on a diagonal across the normalized frame.
fn diagonal_output(score: f32) -> Vec<f32> {
    let mut output = Vec::with_capacity(OUTPUT_LEN);
    for i in 0..NUM_KEYPOINTS {
        let t = i as f32 / (NUM_KEYPOINTS - 1) as f32;
        output.push(t); // y
        output.push(t); // x
        output.push(score);
    }
    output
}

#[test]
fn test_decode_to_scene_full_pose() {
    let pose = decode_pose(&diagonal_output(0.9), 0.3).unwrap();
    assert_eq!(pose.present_count(), NUM_KEYPOINTS);

    let scene = build_scene(&pose, 640, 480);
    assert_eq!(scene.markers.len(), NUM_KEYPOINTS);
    assert_eq!(scene.lines.len(), SKELETON.len());
}

#[test]
fn test_decode_to_scene_below_threshold() {
    // Scores exactly at the threshold do not qualify.
    let pose = decode_pose(&diagonal_output(0.3), 0.3).unwrap();
    assert!(pose.is_empty());

    let scene = build_scene(&pose, 640, 480);
    assert!(scene.is_empty());
}

#[test]
fn test_missing_joint_removes_incident_lines() {
    let mut output = diagonal_output(0.9);
    // Drop the left shoulder (joint 5).
    output[5 * 3 + 2] = 0.0;

    let pose = decode_pose(&output, 0.3).unwrap();
    assert_eq!(pose.present_count(), NUM_KEYPOINTS - 1);

    let scene = build_scene(&pose, 640, 480);
    assert_eq!(scene.markers.len(), NUM_KEYPOINTS - 1);

    let expected_lines = SKELETON.iter().filter(|[a, b]| *a != 5 && *b != 5).count();
    assert_eq!(scene.lines.len(), expected_lines);
}

#[test]
fn test_malformed_output_is_rejected() {
    let short = vec![0.5; OUTPUT_LEN - 3];
    assert!(decode_pose(&short, 0.3).is_err());

    let long = vec![0.5; OUTPUT_LEN + 3];
    assert!(decode_pose(&long, 0.3).is_err());
}

#[test]
fn test_scene_scales_with_frame_size() {
    let pose = decode_pose(&diagonal_output(0.9), 0.3).unwrap();

    let small = build_scene(&pose, 100, 100);
    let large = build_scene(&pose, 200, 200);

    for (s, l) in small.markers.iter().zip(large.markers.iter()) {
        assert!((l.center.0 - s.center.0 * 2.0).abs() < 1e-4);
        assert!((l.center.1 - s.center.1 * 2.0).abs() < 1e-4);
    }
}

#[test]
fn test_draw_scene_paints_markers_and_lines() {
    let config = OverlayConfig::default();
    let frame = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, image::Rgb([0, 0, 0])));

    let mut output = vec![0.0; OUTPUT_LEN];
    // Nose at the center, left eye at the upper-left quarter.
    output[0] = 0.5;
    output[1] = 0.5;
    output[2] = 0.9;
    output[3] = 0.25;
    output[4] = 0.25;
    output[5] = 0.9;

    let pose = decode_pose(&output, config.confidence_threshold).unwrap();
    let scene = build_scene(&pose, 64, 64);
    assert_eq!(scene.markers.len(), 2);
    assert_eq!(scene.lines.len(), 1);

    let overlaid = draw_scene(&frame, &scene, &config);

    // Marker center is red.
    let px = overlaid.get_pixel(32, 32);
    assert_eq!((px[0], px[1], px[2]), (255, 0, 0));

    // Line midpoint between (16,16) and (32,32) is white.
    let px = overlaid.get_pixel(24, 24);
    assert_eq!((px[0], px[1], px[2]), (255, 255, 255));
}

#[test]
fn test_draw_scene_leaves_empty_frame_untouched() {
    let config = OverlayConfig::default();
    let frame = DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 32, image::Rgb([7, 8, 9])));

    let pose = decode_pose(&vec![0.0; OUTPUT_LEN], config.confidence_threshold).unwrap();
    let scene = build_scene(&pose, 32, 32);
    let overlaid = draw_scene(&frame, &scene, &config);

    for y in 0..32 {
        for x in 0..32 {
            let px = overlaid.get_pixel(x, y);
            assert_eq!((px[0], px[1], px[2]), (7, 8, 9));
        }
    }
}

#[test]
fn test_slot_handoff_replaces_whole_pose() {
    let slot = Arc::new(PoseSlot::new());
    assert!(slot.latest().is_none());

    let first = decode_pose(&diagonal_output(0.9), 0.3).unwrap();
    slot.publish(first);
    assert_eq!(slot.latest().unwrap().present_count(), NUM_KEYPOINTS);

    let mut output = diagonal_output(0.9);
    output[2] = 0.0;
    let second = decode_pose(&output, 0.3).unwrap();
    slot.publish(second);

    // The previous pose is gone in full; no joints linger from it.
    let latest = slot.latest().unwrap();
    assert_eq!(latest.present_count(), NUM_KEYPOINTS - 1);
    assert!(latest.joint(0).is_none());
}

#[test]
fn test_frame_to_tensor_matches_model_input() {
    let frame = DynamicImage::ImageRgb8(RgbImage::from_pixel(640, 480, image::Rgb([10, 20, 30])));
    let tensor = frame_to_tensor(&frame, (192, 192)).unwrap();

    assert_eq!(tensor.shape(), &[1, 192, 192, 3]);
    assert_eq!(tensor[[0, 96, 96, 0]], 10);
    assert_eq!(tensor[[0, 96, 96, 1]], 20);
    assert_eq!(tensor[[0, 96, 96, 2]], 30);
}

//! Scene rasterization over frames.

use image::{DynamicImage, Rgb};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

use crate::config::OverlayConfig;
use crate::scene::Scene;

/// Draw a [`Scene`] over a frame, returning the composited image.
///
/// The frame is left untouched; lines are stroked first so markers sit on
/// top of them.
#[must_use]
pub fn draw_scene(frame: &DynamicImage, scene: &Scene, config: &OverlayConfig) -> DynamicImage {
    let mut img = frame.to_rgb8();

    let line_color = Rgb(config.line_color.rgb());
    let marker_color = Rgb(config.marker_color.rgb());

    for line in &scene.lines {
        draw_thick_line(&mut img, line.start, line.end, config.line_width, line_color);
    }

    #[allow(clippy::cast_possible_truncation)]
    for marker in &scene.markers {
        let cx = marker.center.0.round() as i32;
        let cy = marker.center.1.round() as i32;
        draw_filled_circle_mut(&mut img, (cx, cy), config.marker_radius, marker_color);
    }

    DynamicImage::ImageRgb8(img)
}

/// Stroke a line with the given width.
///
/// imageproc lines are one pixel wide, so width is approximated by drawing
/// parallel one-pixel lines offset along the segment's minor axis.
fn draw_thick_line(
    img: &mut image::RgbImage,
    start: (f32, f32),
    end: (f32, f32),
    width: u32,
    color: Rgb<u8>,
) {
    if width <= 1 {
        draw_line_segment_mut(img, start, end, color);
        return;
    }

    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    // Offset perpendicular to the dominant direction.
    let horizontal = dx.abs() >= dy.abs();

    #[allow(clippy::cast_precision_loss)]
    let half = (width as f32 - 1.0) / 2.0;
    for t in 0..width {
        #[allow(clippy::cast_precision_loss)]
        let offset = t as f32 - half;
        let (ox, oy) = if horizontal { (0.0, offset) } else { (offset, 0.0) };
        draw_line_segment_mut(
            img,
            (start.0 + ox, start.1 + oy),
            (end.0 + ox, end.1 + oy),
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypoint::{Keypoint, NUM_KEYPOINTS, Pose};
    use crate::scene::build_scene;
    use image::{GenericImageView, RgbImage};

    fn black_frame(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::new(w, h))
    }

    #[test]
    fn test_empty_scene_leaves_frame_unchanged() {
        let frame = black_frame(64, 64);
        let out = draw_scene(&frame, &Scene::default(), &OverlayConfig::default());
        assert_eq!(out.to_rgb8().as_raw(), frame.to_rgb8().as_raw());
    }

    #[test]
    fn test_marker_is_drawn_at_joint() {
        let mut joints = [None; NUM_KEYPOINTS];
        joints[0] = Some(Keypoint::new(0.5, 0.5, 0.9));
        let scene = build_scene(&Pose::new(joints), 64, 64);

        let out = draw_scene(&black_frame(64, 64), &scene, &OverlayConfig::default());
        // Marker center lands at (32, 32) and is red by default.
        assert_eq!(out.get_pixel(32, 32), image::Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_line_is_drawn_between_joints() {
        let mut joints = [None; NUM_KEYPOINTS];
        // Nose and left eye on a horizontal line at y = 0.5.
        joints[0] = Some(Keypoint::new(0.1, 0.5, 0.9));
        joints[1] = Some(Keypoint::new(0.9, 0.5, 0.9));
        let scene = build_scene(&Pose::new(joints), 100, 100);

        let config = OverlayConfig::default().with_marker_radius(1);
        let out = draw_scene(&black_frame(100, 100), &scene, &config);
        // Midpoint of the segment is far from either marker, so it must be
        // the white line color.
        assert_eq!(out.get_pixel(50, 50), image::Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_off_frame_coordinates_do_not_panic() {
        let mut joints = [None; NUM_KEYPOINTS];
        // Slightly out of [0,1]: the model can emit these near frame edges.
        joints[0] = Some(Keypoint::new(-0.05, 1.1, 0.9));
        joints[1] = Some(Keypoint::new(0.5, 0.5, 0.9));
        let scene = build_scene(&Pose::new(joints), 64, 64);

        let _ = draw_scene(&black_frame(64, 64), &scene, &OverlayConfig::default());
    }
}

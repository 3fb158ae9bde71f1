//! Live window for overlaid frames.

use std::time::{Duration, Instant};

use image::DynamicImage;
use minifb::{Key, Window, WindowOptions};

use crate::error::{OverlayError, Result};

/// Pack a frame into the 0x00RRGGBB pixel layout minifb expects.
fn pack_frame(frame: &DynamicImage, buffer: &mut Vec<u32>) -> (usize, usize) {
    let rgb = frame.to_rgb8();
    let (w, h) = (rgb.width() as usize, rgb.height() as usize);

    buffer.clear();
    buffer.extend(
        rgb.pixels()
            .map(|px| (u32::from(px[0]) << 16) | (u32::from(px[1]) << 8) | u32::from(px[2])),
    );
    (w, h)
}

/// Window that presents overlaid frames until closed or dismissed.
///
/// Frame dimensions may change between calls (a source switch, a rotated
/// camera); the window keeps its size and minifb scales the buffer into it.
pub struct Viewer {
    window: Window,
    buffer: Vec<u32>,
    size: (usize, usize),
}

impl Viewer {
    /// Open the display window.
    ///
    /// # Errors
    ///
    /// Returns an error if the window cannot be created.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let mut window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| OverlayError::VisualizerError(format!("Failed to create window: {e}")))?;

        window.set_target_fps(60);

        Ok(Self {
            window,
            buffer: Vec::new(),
            size: (width, height),
        })
    }

    /// Whether the window is still open and not dismissed with Escape or Q.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.window.is_open()
            && !self.window.is_key_down(Key::Escape)
            && !self.window.is_key_down(Key::Q)
    }

    /// Present a frame. Returns `Ok(false)` once the window is dismissed.
    ///
    /// # Errors
    ///
    /// Returns an error if the window buffer cannot be updated.
    pub fn show(&mut self, frame: &DynamicImage) -> Result<bool> {
        if !self.is_active() {
            return Ok(false);
        }

        self.size = pack_frame(frame, &mut self.buffer);

        self.window
            .update_with_buffer(&self.buffer, self.size.0, self.size.1)
            .map_err(|e| OverlayError::VisualizerError(format!("Failed to update window: {e}")))?;

        Ok(true)
    }

    /// Keep the last frame on screen for `duration`, processing window
    /// events. Returns `false` if the window was dismissed meanwhile.
    pub fn hold(&mut self, duration: Duration) -> bool {
        if self.buffer.is_empty() {
            return true;
        }

        let deadline = Instant::now() + duration;
        while Instant::now() < deadline {
            if !self.is_active() {
                return false;
            }
            let _ = self
                .window
                .update_with_buffer(&self.buffer, self.size.0, self.size.1);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_pack_frame_layout() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgb([0xAA, 0xBB, 0xCC]));
        img.put_pixel(1, 0, image::Rgb([0x01, 0x02, 0x03]));

        let mut buffer = Vec::new();
        let size = pack_frame(&DynamicImage::ImageRgb8(img), &mut buffer);

        assert_eq!(size, (2, 1));
        assert_eq!(buffer, vec![0x00AA_BBCC, 0x0001_0203]);
    }

    #[test]
    fn test_pack_frame_reuses_buffer_across_sizes() {
        let mut buffer = Vec::new();

        let big = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        assert_eq!(pack_frame(&big, &mut buffer), (4, 4));
        assert_eq!(buffer.len(), 16);

        let small = DynamicImage::ImageRgb8(RgbImage::new(2, 2));
        assert_eq!(pack_frame(&small, &mut buffer), (2, 2));
        assert_eq!(buffer.len(), 4);
    }
}

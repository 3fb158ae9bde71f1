//! Frame preprocessing for the pose model.
//!
//! The model expects a small fixed-size RGB uint8 tensor (192x192 by
//! default). Frames are squashed to the target size with a bilinear resize,
//! so the model sees the full frame and its normalized output coordinates
//! map linearly back onto the original frame. No letterboxing, no
//! normalization to [0, 1] - the model consumes raw uint8.

use fast_image_resize::{PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image};
use image::{DynamicImage, GenericImageView};
use ndarray::Array4;

use crate::error::{OverlayError, Result};

/// Resize a frame and build the model's NHWC u8 input tensor.
///
/// # Arguments
///
/// * `frame` - Input frame in any `image` color format.
/// * `target_size` - Model input size as (height, width).
///
/// # Returns
///
/// Tensor of shape (1, height, width, 3).
///
/// # Errors
///
/// Returns an error if the frame has zero dimensions or the resize fails.
pub fn frame_to_tensor(frame: &DynamicImage, target_size: (usize, usize)) -> Result<Array4<u8>> {
    let (src_w, src_h) = frame.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(OverlayError::ImageError(
            "Frame has zero width or height".to_string(),
        ));
    }

    #[allow(clippy::cast_possible_truncation)]
    let (dst_h, dst_w) = (target_size.0 as u32, target_size.1 as u32);

    let rgb = resize_rgb(frame, src_w, src_h, dst_w, dst_h)?;

    Array4::from_shape_vec((1, target_size.0, target_size.1, 3), rgb)
        .map_err(|e| OverlayError::ImageError(format!("Failed to shape input tensor: {e}")))
}

/// Bilinear resize to raw RGB bytes, squashing the aspect ratio.
fn resize_rgb(
    frame: &DynamicImage,
    src_w: u32,
    src_h: u32,
    dst_w: u32,
    dst_h: u32,
) -> Result<Vec<u8>> {
    let src_rgb = frame.to_rgb8();

    // Same-size frames skip the resizer entirely.
    if src_w == dst_w && src_h == dst_h {
        return Ok(src_rgb.into_raw());
    }

    let src_image = Image::from_vec_u8(src_w, src_h, src_rgb.into_raw(), PixelType::U8x3)
        .map_err(|e| OverlayError::ImageError(format!("Failed to wrap source frame: {e}")))?;

    let mut dst_image = Image::new(dst_w, dst_h, PixelType::U8x3);

    let mut resizer = Resizer::new();
    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(
        fast_image_resize::FilterType::Bilinear,
    ));
    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| OverlayError::ImageError(format!("Failed to resize frame: {e}")))?;

    Ok(dst_image.into_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_tensor_shape() {
        let frame = DynamicImage::ImageRgb8(RgbImage::new(640, 480));
        let tensor = frame_to_tensor(&frame, (192, 192)).unwrap();
        assert_eq!(tensor.shape(), &[1, 192, 192, 3]);
    }

    #[test]
    fn test_same_size_passthrough() {
        let mut img = RgbImage::new(192, 192);
        img.put_pixel(10, 20, image::Rgb([200, 100, 50]));
        let frame = DynamicImage::ImageRgb8(img);

        let tensor = frame_to_tensor(&frame, (192, 192)).unwrap();
        assert_eq!(tensor[[0, 20, 10, 0]], 200);
        assert_eq!(tensor[[0, 20, 10, 1]], 100);
        assert_eq!(tensor[[0, 20, 10, 2]], 50);
    }

    #[test]
    fn test_uniform_color_survives_resize() {
        let img = RgbImage::from_pixel(400, 300, image::Rgb([120, 60, 30]));
        let frame = DynamicImage::ImageRgb8(img);

        let tensor = frame_to_tensor(&frame, (192, 192)).unwrap();
        assert_eq!(tensor[[0, 96, 96, 0]], 120);
        assert_eq!(tensor[[0, 96, 96, 1]], 60);
        assert_eq!(tensor[[0, 96, 96, 2]], 30);
    }
}

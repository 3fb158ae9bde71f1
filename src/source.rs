//! Frame sources for the overlay pipeline.
//!
//! The camera capability is external to the core pipeline; for the CLI this
//! module provides frame streams from still images, directories, video
//! files, webcams, and network streams.

use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::error::{OverlayError, Result};

/// Represents different frame sources.
#[derive(Debug, Clone)]
pub enum Source {
    /// Path to an image file.
    Image(PathBuf),
    /// In-memory frame.
    ImageBuffer(DynamicImage),
    /// Directory containing images, processed in sorted order.
    Directory(PathBuf),
    /// Path to a video file.
    Video(PathBuf),
    /// Webcam device index.
    Webcam(u32),
    /// Streaming URL (RTSP, RTMP, HTTP).
    Stream(String),
}

impl Source {
    /// Check if this source is a single still image.
    #[must_use]
    pub const fn is_image(&self) -> bool {
        matches!(self, Self::Image(_) | Self::ImageBuffer(_))
    }

    /// Check if this source is a live/video source.
    #[must_use]
    pub const fn is_video(&self) -> bool {
        matches!(self, Self::Video(_) | Self::Webcam(_) | Self::Stream(_))
    }

    /// Get the path if this source has one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Image(p) | Self::Video(p) | Self::Directory(p) => Some(p),
            _ => None,
        }
    }
}

/// Convert from a string path to Source.
impl From<&str> for Source {
    fn from(s: &str) -> Self {
        // Bare integer means a webcam index.
        if let Ok(idx) = s.parse::<u32>() {
            return Self::Webcam(idx);
        }

        if s.starts_with("rtsp://")
            || s.starts_with("rtmp://")
            || s.starts_with("http://")
            || s.starts_with("https://")
        {
            return Self::Stream(s.to_string());
        }

        let path = PathBuf::from(s);

        if path.is_dir() {
            return Self::Directory(path);
        }

        if let Some(ext) = path.extension() {
            let ext = ext.to_string_lossy().to_lowercase();
            if matches!(
                ext.as_str(),
                "mp4" | "avi" | "mov" | "mkv" | "wmv" | "flv" | "webm" | "m4v" | "mpeg" | "mpg"
            ) {
                return Self::Video(path);
            }
        }

        Self::Image(path)
    }
}

impl From<String> for Source {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Self::from(path.to_string_lossy().as_ref())
    }
}

impl From<DynamicImage> for Source {
    fn from(img: DynamicImage) -> Self {
        Self::ImageBuffer(img)
    }
}

impl From<u32> for Source {
    fn from(idx: u32) -> Self {
        Self::Webcam(idx)
    }
}

/// Metadata about a source frame.
#[derive(Debug, Clone)]
pub struct FrameMeta {
    /// Frame index (0 for single images).
    pub frame_idx: usize,
    /// Total frames (1 for single images, unknown for live streams).
    pub total_frames: Option<usize>,
    /// Source path or identifier.
    pub path: String,
    /// Frames per second reported by the source, if any.
    pub fps: Option<f32>,
}

impl Default for FrameMeta {
    fn default() -> Self {
        Self {
            frame_idx: 0,
            total_frames: Some(1),
            path: String::new(),
            fps: None,
        }
    }
}

/// Iterator over frames from a source.
pub struct SourceIterator {
    source: Source,
    current_frame: usize,
    image_paths: Vec<PathBuf>,
    #[cfg(feature = "video")]
    decoder: Option<video_rs::decode::Decoder>,
    #[cfg(feature = "video")]
    total_frames: Option<usize>,
}

impl SourceIterator {
    /// Create a new source iterator.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be opened.
    pub fn new(source: Source) -> Result<Self> {
        let image_paths = match &source {
            Source::Directory(path) => Self::collect_images_from_dir(path)?,
            Source::Image(path) => vec![path.clone()],
            _ => vec![],
        };

        Ok(Self {
            source,
            current_frame: 0,
            image_paths,
            #[cfg(feature = "video")]
            decoder: None,
            #[cfg(feature = "video")]
            total_frames: None,
        })
    }

    /// Collect image paths from a directory.
    fn collect_images_from_dir(dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(OverlayError::ImageError(format!(
                "Not a directory: {}",
                dir.display()
            )));
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| Self::is_image_file(path))
            .collect();

        paths.sort();
        Ok(paths)
    }

    /// Check if a path is an image file based on extension.
    fn is_image_file(path: &Path) -> bool {
        path.extension().is_some_and(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            matches!(
                ext.as_str(),
                "jpg" | "jpeg" | "png" | "bmp" | "gif" | "webp" | "tiff" | "tif"
            )
        })
    }

    /// Get the next still image from the source.
    fn next_image(&mut self) -> Option<Result<(DynamicImage, FrameMeta)>> {
        if self.current_frame >= self.image_paths.len() {
            return None;
        }

        let path = &self.image_paths[self.current_frame];
        let meta = FrameMeta {
            frame_idx: self.current_frame,
            total_frames: Some(self.image_paths.len()),
            path: path.to_string_lossy().to_string(),
            fps: None,
        };

        self.current_frame += 1;

        match image::open(path) {
            Ok(img) => Some(Ok((img, meta))),
            Err(e) => Some(Err(OverlayError::ImageError(format!(
                "Failed to load {}: {e}",
                path.display()
            )))),
        }
    }

    /// Get the next video frame.
    #[cfg(feature = "video")]
    fn next_video_frame(&mut self) -> Option<Result<(DynamicImage, FrameMeta)>> {
        if self.decoder.is_none() {
            let location = match &self.source {
                Source::Video(path) => path.clone(),
                // Webcam indices map to V4L-style device paths; the decoder
                // treats them like any other input location.
                Source::Webcam(idx) => PathBuf::from(format!("/dev/video{idx}")),
                Source::Stream(url) => {
                    match video_rs::Url::parse(url) {
                        Ok(parsed) => match video_rs::decode::Decoder::new(parsed) {
                            Ok(d) => {
                                self.decoder = Some(d);
                                return self.decode_next();
                            }
                            Err(e) => {
                                return Some(Err(OverlayError::VideoError(format!(
                                    "Failed to open stream: {e}"
                                ))));
                            }
                        },
                        Err(e) => {
                            return Some(Err(OverlayError::VideoError(format!(
                                "Invalid stream URL {url}: {e}"
                            ))));
                        }
                    }
                }
                _ => return None,
            };

            match video_rs::decode::Decoder::new(location.as_path()) {
                Ok(d) => {
                    if let Ok(duration) = d.duration() {
                        let fps = d.frame_rate();
                        let duration_seconds = duration.as_secs_f64();
                        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                        {
                            self.total_frames = Some((duration_seconds * f64::from(fps)) as usize);
                        }
                    }
                    self.decoder = Some(d);
                }
                Err(e) => {
                    return Some(Err(OverlayError::VideoError(format!(
                        "Failed to open {}: {e}",
                        location.display()
                    ))));
                }
            }
        }

        self.decode_next()
    }

    #[cfg(feature = "video")]
    fn decode_next(&mut self) -> Option<Result<(DynamicImage, FrameMeta)>> {
        let decoder = self.decoder.as_mut()?;

        match decoder.decode() {
            Ok((_ts, frame)) => {
                let fps = decoder.frame_rate();
                let meta = FrameMeta {
                    frame_idx: self.current_frame,
                    total_frames: self.total_frames,
                    path: self
                        .source
                        .path()
                        .map(|p| p.to_string_lossy().to_string())
                        .unwrap_or_default(),
                    fps: Some(fps),
                };
                self.current_frame += 1;

                match video_frame_to_image(&frame) {
                    Ok(img) => Some(Ok((img, meta))),
                    Err(e) => Some(Err(e)),
                }
            }
            // Decode errors at the tail of a stream mean end-of-stream.
            Err(_e) => None,
        }
    }

    #[cfg(not(feature = "video"))]
    fn next_video_frame(&mut self) -> Option<Result<(DynamicImage, FrameMeta)>> {
        Some(Err(OverlayError::FeatureNotEnabled(
            "Video/webcam sources require the 'video' feature".to_string(),
        )))
    }
}

impl Iterator for SourceIterator {
    type Item = Result<(DynamicImage, FrameMeta)>;

    fn next(&mut self) -> Option<Self::Item> {
        match &self.source {
            Source::Image(_) | Source::Directory(_) => self.next_image(),
            Source::ImageBuffer(img) => {
                if self.current_frame == 0 {
                    self.current_frame = 1;
                    Some(Ok((img.clone(), FrameMeta::default())))
                } else {
                    None
                }
            }
            Source::Video(_) | Source::Webcam(_) | Source::Stream(_) => self.next_video_frame(),
        }
    }
}

/// Convert a `video_rs` frame (HWC ndarray) to a `DynamicImage`.
#[cfg(feature = "video")]
fn video_frame_to_image(arr: &video_rs::Frame) -> Result<DynamicImage> {
    let shape = arr.shape();
    let height = u32::try_from(shape[0])
        .map_err(|_| OverlayError::ImageError("Frame height exceeds u32::MAX".to_string()))?;
    let width = u32::try_from(shape[1])
        .map_err(|_| OverlayError::ImageError("Frame width exceeds u32::MAX".to_string()))?;

    let mut rgb_data = Vec::with_capacity((height * width * 3) as usize);
    for y in 0..height as usize {
        for x in 0..width as usize {
            rgb_data.push(arr[[y, x, 0]]);
            rgb_data.push(arr[[y, x, 1]]);
            rgb_data.push(arr[[y, x, 2]]);
        }
    }

    let img_buffer = image::RgbImage::from_raw(width, height, rgb_data).ok_or_else(|| {
        OverlayError::ImageError("Failed to create image from video frame".to_string())
    })?;

    Ok(DynamicImage::ImageRgb8(img_buffer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_from_string() {
        assert!(matches!(Source::from("image.jpg"), Source::Image(_)));
        assert!(matches!(Source::from("video.mp4"), Source::Video(_)));
        assert!(matches!(
            Source::from("rtsp://example.com/feed"),
            Source::Stream(_)
        ));
        assert!(matches!(Source::from("0"), Source::Webcam(0)));
    }

    #[test]
    fn test_source_checks() {
        let img = Source::Image(PathBuf::from("frame.png"));
        assert!(img.is_image());
        assert!(!img.is_video());

        let cam = Source::Webcam(0);
        assert!(!cam.is_image());
        assert!(cam.is_video());
    }

    #[test]
    fn test_image_buffer_yields_once() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::new(8, 8));
        let mut iter = SourceIterator::new(Source::ImageBuffer(img)).unwrap();

        assert!(iter.next().is_some());
        assert!(iter.next().is_none());
    }
}

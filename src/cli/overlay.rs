use std::fs;
use std::path::{Path, PathBuf};
use std::process;
#[cfg(feature = "visualize")]
use std::time::Duration;

#[cfg(feature = "visualize")]
use crate::visualizer::Viewer;

use std::sync::Arc;

use crate::cli::args::OverlayArgs;
use crate::mailbox::PoseSlot;
use crate::pipeline::Pipeline;
use crate::scene::build_scene;
use crate::source::{Source, SourceIterator};
use crate::{OverlayConfig, PoseModel, VERSION, draw_scene};
use crate::{error, verbose, warn};
use image::GenericImageView;

/// Run pose overlay over all frames of a source.
#[allow(
    clippy::too_many_lines,
    clippy::cast_precision_loss,
    clippy::missing_panics_doc
)]
pub fn run_overlay(args: &OverlayArgs) {
    let conf_threshold = args.conf;
    let target_fps = args.fps;
    let imgsz = args.imgsz;
    let save = args.save;
    #[cfg(feature = "visualize")]
    let show = args.show;
    #[cfg(not(feature = "visualize"))]
    if args.show {
        warn!(
            "--show requires the 'visualize' feature. Compile with --features visualize to enable display."
        );
    }

    let config = OverlayConfig::new()
        .with_confidence(conf_threshold)
        .with_target_fps(target_fps)
        .with_input_size(imgsz, imgsz);

    let model = match PoseModel::load_with_config(&args.model, &config) {
        Ok(m) => m,
        Err(e) => {
            error!("Error loading model: {e}");
            process::exit(1);
        }
    };

    let source = match &args.source {
        Some(s) => Source::from(s.as_str()),
        None => {
            error!("'source' argument is missing. Pass --source <image|dir|video|webcam>.");
            process::exit(1);
        }
    };

    let save_dir = if save {
        let dir = find_next_run_dir("runs/overlay", "predict");
        if let Err(e) = fs::create_dir_all(&dir) {
            error!("Failed to create save directory {dir}: {e}");
            process::exit(1);
        }
        Some(PathBuf::from(dir))
    } else {
        None
    };

    println!("pose-overlay {VERSION} 🚀 Rust ONNX");

    let input_size = model.input_size();
    verbose!(
        "{}: 17 keypoints, input=({}, {}), conf={}, fps={}",
        args.model,
        input_size.0,
        input_size.1,
        conf_threshold,
        target_fps
    );
    verbose!("");

    let is_video = source.is_video();
    #[cfg(not(feature = "video"))]
    if is_video {
        warn!(
            "Video source detected but 'video' feature is not enabled. Please compile with '--features video'"
        );
        process::exit(1);
    }

    // Rate limiting paces live and video input; a batch of still images is
    // processed in full.
    let pipeline_config = if is_video {
        config.clone()
    } else {
        config.clone().with_target_fps(0)
    };

    let slot = Arc::new(PoseSlot::new());
    let mut pipeline = Pipeline::with_model(model, pipeline_config, Arc::clone(&slot));

    #[cfg(feature = "visualize")]
    let mut viewer: Option<Viewer> = None;

    // Bounded channel so decoding runs ahead of inference by a couple of frames.
    let (sender, receiver) = std::sync::mpsc::sync_channel(2);

    let source_clone = source.clone();
    std::thread::spawn(move || {
        let iter = match SourceIterator::new(source_clone) {
            Ok(iter) => iter,
            Err(e) => {
                error!("Error initializing source in thread: {e}");
                return;
            }
        };

        for item in iter {
            if sender.send(item).is_err() {
                break; // Receiver dropped, stop decoding
            }
        }
    });

    let mut frames_processed = 0usize;
    let mut frames_skipped = 0usize;
    let mut total_preprocess = 0.0;
    let mut total_inference = 0.0;
    let mut total_decode = 0.0;

    for item in receiver {
        let (frame, meta) = match item {
            Ok(val) => val,
            Err(e) => {
                error!("Error reading source: {e}");
                break;
            }
        };

        let outcome = match pipeline.process_frame(&frame) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Error processing frame {}: {e}", meta.frame_idx);
                break;
            }
        };

        // Draw from the mailbox, not the step result. Skipped frames keep
        // showing the most recent pose.
        let (width, height) = frame.dimensions();
        let scene = slot.latest().map(|pose| build_scene(&pose, width, height));
        let overlaid = match &scene {
            Some(scene) => draw_scene(&frame, scene, &config),
            None => frame.clone(),
        };

        match outcome {
            Some((pose, speed)) => {
                frames_processed += 1;
                total_preprocess += speed.preprocess;
                total_inference += speed.inference;
                total_decode += speed.decode;

                let total_frames_str = meta
                    .total_frames
                    .map_or_else(|| "?".to_string(), |n| n.to_string());
                let kind = if is_video { "video frame" } else { "image" };
                verbose!(
                    "{kind} {}/{} {}: {}x{} {} keypoints, {:.1}ms",
                    meta.frame_idx + 1,
                    total_frames_str,
                    meta.path,
                    width,
                    height,
                    pose.present_count(),
                    speed.inference
                );
            }
            None => frames_skipped += 1,
        }

        if let Some(dir) = &save_dir {
            let name = format!("frame_{:06}.jpg", meta.frame_idx);
            let out_path = dir.join(name);
            if let Err(e) = overlaid.save(&out_path) {
                error!("Failed to save {}: {e}", out_path.display());
            }
        }

        #[cfg(feature = "visualize")]
        if show {
            if viewer.is_none() {
                match Viewer::new("Pose Overlay", width as usize, height as usize) {
                    Ok(v) => viewer = Some(v),
                    Err(e) => {
                        error!("Failed to open viewer: {e}");
                        break;
                    }
                }
            }

            if let Some(ref mut v) = viewer {
                match v.show(&overlaid) {
                    Ok(true) => {
                        if !is_video && !v.hold(Duration::from_millis(200)) {
                            break;
                        }
                    }
                    Ok(false) => break,
                    Err(e) => {
                        error!("Viewer error: {e}");
                        break;
                    }
                }
            }
        }
    }

    let num_frames = frames_processed.max(1) as f64;
    verbose!("");
    verbose!(
        "Speed: {:.1}ms preprocess, {:.1}ms inference, {:.1}ms decode per frame at shape (1, {}, {}, 3)",
        total_preprocess / num_frames,
        total_inference / num_frames,
        total_decode / num_frames,
        input_size.1,
        input_size.0
    );
    if frames_skipped > 0 {
        verbose!("Skipped {frames_skipped} frames to hold the frame rate limit");
    }

    if let Some(ref dir) = save_dir {
        verbose!("Results saved to {}", dir.display());
    }
}

/// Find the next available run directory
/// (`predict`, `predict2`, `predict3`, ...).
pub fn find_next_run_dir(base: &str, prefix: &str) -> String {
    let base_path = Path::new(base);

    let first = base_path.join(prefix);
    if !first.exists() {
        return first.to_string_lossy().to_string();
    }

    for i in 2.. {
        let numbered = base_path.join(format!("{prefix}{i}"));
        if !numbered.exists() {
            return numbered.to_string_lossy().to_string();
        }
    }

    base_path.join(prefix).to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_next_run_dir_fresh() {
        let dir = find_next_run_dir("nonexistent_base_dir", "predict");
        assert!(dir.ends_with("predict"));
    }

    #[test]
    fn test_find_next_run_dir_increments() {
        let tmp = std::env::temp_dir().join(format!("overlay_runs_{}", std::process::id()));
        let base = tmp.to_string_lossy().to_string();

        fs::create_dir_all(tmp.join("predict")).unwrap();
        let next = find_next_run_dir(&base, "predict");
        assert!(next.ends_with("predict2"));

        fs::create_dir_all(tmp.join("predict2")).unwrap();
        let next = find_next_run_dir(&base, "predict");
        assert!(next.ends_with("predict3"));

        fs::remove_dir_all(&tmp).unwrap();
    }
}

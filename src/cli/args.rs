use clap::{Args, Parser, Subcommand};

/// CLI arguments parser.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = r#"Overlay Options:
    --model, -m <MODEL>    Path to ONNX pose model file [default: movenet.onnx]
    --source, -s <SOURCE>  Input source (image, directory, video, or webcam index)
    --conf <CONF>          Keypoint confidence threshold [default: 0.3]
    --fps <FPS>            Maximum frames per second fed to the model [default: 30]
    --imgsz <IMGSZ>        Model input size (square) [default: 192]
    --save                 Save overlaid frames to runs/overlay/predict
    --show                 Display overlaid frames in a window
    --verbose              Show verbose output

Examples:
    pose-overlay overlay --model movenet.onnx --source image.jpg
    pose-overlay overlay --model movenet.onnx --source video.mp4 --show
    pose-overlay overlay --model movenet.onnx --source 0 --conf 0.5
    pose-overlay overlay -m movenet.onnx -s frames/ --save
    pose-overlay overlay -m movenet.onnx -s video.mp4 --fps 15 --show"#)]
pub struct Cli {
    #[command(subcommand)]
    /// Subcommand to execute.
    pub command: Commands,
}

/// Commands for the CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Overlay a pose skeleton on frames from an image, video, or webcam
    Overlay(OverlayArgs),
}

/// Arguments for the overlay command.
#[derive(Args, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct OverlayArgs {
    /// Path to ONNX pose model file
    #[arg(short, long, default_value = "movenet.onnx")]
    pub model: String,

    /// Input source (image, directory, video, or webcam index)
    #[arg(short, long)]
    pub source: Option<String>,

    /// Keypoint confidence threshold
    #[arg(long, default_value_t = 0.3)]
    pub conf: f32,

    /// Maximum frames per second fed to the model (0 disables the limit)
    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// Model input size (square)
    #[arg(long, default_value_t = 192)]
    pub imgsz: usize,

    /// Save overlaid frames to runs/overlay/predict
    #[arg(long, default_value_t = false)]
    pub save: bool,

    /// Display overlaid frames in a window
    #[arg(long, default_value_t = false)]
    pub show: bool,

    /// Show verbose output
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub verbose: bool,
}

//! Pose model loading and inference.
//!
//! Wraps an ONNX Runtime session around a single-pose keypoint model
//! (MoveNet-style: uint8 NHWC input, one flat float output of 51 values).

use std::path::Path;

use ndarray::Array4;
use ort::session::Session;
use ort::value::TensorRef;

use crate::config::OverlayConfig;
use crate::error::{OverlayError, Result};

/// Single-pose keypoint model backed by an ONNX Runtime session.
///
/// # Example
///
/// ```no_run
/// use pose_overlay::PoseModel;
///
/// let mut model = PoseModel::load("movenet-lightning.onnx").unwrap();
/// let input = ndarray::Array4::<u8>::zeros((1, 192, 192, 3));
/// let output = model.run(&input).unwrap();
/// assert_eq!(output.len(), 51);
/// ```
pub struct PoseModel {
    /// ONNX Runtime session.
    session: Session,
    /// Input tensor name.
    input_name: String,
    /// Output tensor name.
    output_name: String,
    /// Model input size (height, width).
    input_size: (usize, usize),
    /// Whether model has been warmed up.
    warmed_up: bool,
}

impl PoseModel {
    /// Load a pose model from an ONNX file with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the model file doesn't exist or can't be loaded.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with_config(path, &OverlayConfig::default())
    }

    /// Load a pose model with custom configuration.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the ONNX model file.
    /// * `config` - Overlay configuration (input size, thread count).
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the model file
    /// doesn't exist, or the session can't be created.
    pub fn load_with_config<P: AsRef<Path>>(path: P, config: &OverlayConfig) -> Result<Self> {
        config.validate()?;

        let path = path.as_ref();

        if !path.exists() {
            return Err(OverlayError::ModelLoadError(format!(
                "Model file not found: {}",
                path.display()
            )));
        }

        let session = Session::builder()
            .map_err(|e| {
                OverlayError::ModelLoadError(format!("Failed to create session builder: {e}"))
            })?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)
            .map_err(|e| {
                OverlayError::ModelLoadError(format!("Failed to set optimization level: {e}"))
            })?
            .with_intra_threads(config.num_threads)
            .map_err(|e| {
                OverlayError::ModelLoadError(format!("Failed to set intra-thread count: {e}"))
            })?
            .commit_from_file(path)
            .map_err(|e| OverlayError::ModelLoadError(format!("Failed to load model: {e}")))?;

        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .unwrap_or_else(|| "input".to_string());

        let output_name = session
            .outputs()
            .first()
            .map(|o| o.name().to_string())
            .unwrap_or_else(|| "output_0".to_string());

        Ok(Self {
            session,
            input_name,
            output_name,
            input_size: config.input_size,
            warmed_up: false,
        })
    }

    /// Warm up the model by running inference with a dummy input.
    ///
    /// Pre-allocates memory and optimizes the execution graph so the first
    /// real frame does not pay the setup cost. Called automatically on first
    /// `run`.
    ///
    /// # Errors
    ///
    /// Returns an error if the warmup inference fails.
    pub fn warmup(&mut self) -> Result<()> {
        if self.warmed_up {
            return Ok(());
        }

        let (h, w) = self.input_size;
        let dummy = Array4::<u8>::zeros((1, h, w, 3));
        let _ = self.run_inference(&dummy)?;

        self.warmed_up = true;
        Ok(())
    }

    /// Run inference on a preprocessed NHWC u8 tensor.
    ///
    /// # Arguments
    ///
    /// * `input` - Tensor of shape (1, H, W, 3) matching [`Self::input_size`].
    ///
    /// # Returns
    ///
    /// The model's flat output buffer (51 floats for a 17-joint model).
    ///
    /// # Errors
    ///
    /// Returns an error if the session run fails or the output tensor cannot
    /// be extracted.
    pub fn run(&mut self, input: &Array4<u8>) -> Result<Vec<f32>> {
        if !self.warmed_up {
            self.warmup()?;
        }
        self.run_inference(input)
    }

    /// Run the ONNX session without the warmup gate.
    fn run_inference(&mut self, input: &Array4<u8>) -> Result<Vec<f32>> {
        let input_contiguous = input.as_standard_layout();

        let input_tensor = TensorRef::from_array_view(&input_contiguous).map_err(|e| {
            OverlayError::InferenceError(format!("Failed to create input tensor: {e}"))
        })?;

        let inputs = ort::inputs![&self.input_name => input_tensor];

        let outputs = self
            .session
            .run(inputs)
            .map_err(|e| OverlayError::InferenceError(format!("Inference failed: {e}")))?;

        let output = outputs.get(self.output_name.as_str()).ok_or_else(|| {
            OverlayError::InferenceError(format!("Output '{}' not found", self.output_name))
        })?;

        let (_shape, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| OverlayError::InferenceError(format!("Failed to extract output: {e}")))?;

        Ok(data.to_vec())
    }

    /// Get the model's input size (height, width).
    #[must_use]
    pub const fn input_size(&self) -> (usize, usize) {
        self.input_size
    }

    /// Get the input tensor name.
    #[must_use]
    pub fn input_name(&self) -> &str {
        &self.input_name
    }
}

impl std::fmt::Debug for PoseModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoseModel")
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("input_size", &self.input_size)
            .finish()
    }
}

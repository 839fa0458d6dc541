use crate::letterbox::letterbox_tensor;
use crate::postprocess::{decode_predictions, non_max_suppression};
use crate::RawBox;
use app_state::DetectorSettings;
use image::DynamicImage;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::fmt::Display;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("model file not found: {0}")]
    ModelNotFound(String),

    #[error("failed to load model: {0}")]
    ModelLoad(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("unexpected model output shape {0:?}")]
    UnexpectedOutput(Vec<usize>),

    #[error("detector is unavailable")]
    Unavailable,
}

impl DetectorError {
    fn load(err: impl Display) -> Self {
        Self::ModelLoad(err.to_string())
    }

    fn inference(err: impl Display) -> Self {
        Self::Inference(err.to_string())
    }
}

/// Anything that can find objects in an image.
///
/// Boxes are in the image's own pixel coordinates. The order of the returned boxes is
/// significant downstream, implementations should return them in a stable order.
pub trait Detector: Send + Sync {
    fn detect(&self, image: &DynamicImage) -> Result<Vec<RawBox>, DetectorError>;
}

/// YOLO detector running an ONNX export through ONNX Runtime.
pub struct YoloDetector {
    session: Mutex<Session>,
    input_name: String,
    settings: DetectorSettings,
}

impl std::fmt::Debug for YoloDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoloDetector")
            .field("input_name", &self.input_name)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl YoloDetector {
    /// Load the ONNX model and prepare a CPU session.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or ONNX Runtime rejects the model.
    pub fn new(model_path: &Path, settings: DetectorSettings) -> Result<Self, DetectorError> {
        if !model_path.is_file() {
            return Err(DetectorError::ModelNotFound(
                model_path.display().to_string(),
            ));
        }

        info!("Loading detection model from {}", model_path.display());
        let now = Instant::now();
        let session = Session::builder()
            .map_err(DetectorError::load)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(DetectorError::load)?
            .with_intra_threads(settings.intra_threads)
            .map_err(DetectorError::load)?
            .commit_from_file(model_path)
            .map_err(DetectorError::load)?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| DetectorError::ModelLoad("model has no inputs".to_owned()))?;
        debug!(
            "Model inputs: {:?}, outputs: {:?}",
            session.inputs.iter().map(|i| &i.name).collect::<Vec<_>>(),
            session.outputs.iter().map(|o| &o.name).collect::<Vec<_>>()
        );
        info!("Detection model loaded in {:.2?}", now.elapsed());

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            settings,
        })
    }
}

impl Detector for YoloDetector {
    fn detect(&self, image: &DynamicImage) -> Result<Vec<RawBox>, DetectorError> {
        let now = Instant::now();
        let (input, letterbox) = letterbox_tensor(image, self.settings.input_size);
        let input = Tensor::from_array(input).map_err(DetectorError::inference)?;

        let candidates = {
            let mut session = self
                .session
                .lock()
                .map_err(|_| DetectorError::Unavailable)?;
            let outputs = session
                .run(ort::inputs![self.input_name.as_str() => input])
                .map_err(DetectorError::inference)?;
            let output = outputs[0]
                .try_extract_array::<f32>()
                .map_err(DetectorError::inference)?;
            decode_predictions(
                &output,
                self.settings.num_classes(),
                self.settings.confidence_threshold,
            )?
        };

        let boxes: Vec<RawBox> = non_max_suppression(
            candidates,
            self.settings.iou_threshold,
            self.settings.max_detections,
        )
        .into_iter()
        .map(|candidate| {
            let [x1, y1, x2, y2] = letterbox.restore(candidate.bbox);
            RawBox {
                class_id: candidate.class_id,
                class_name: self.settings.class_name(candidate.class_id),
                confidence: candidate.score,
                x1: f64::from(x1),
                y1: f64::from(y1),
                x2: f64::from(x2),
                y2: f64::from(y2),
            }
        })
        .collect();

        debug!(
            "Detected {} objects in {:.2?}",
            boxes.len(),
            now.elapsed()
        );
        Ok(boxes)
    }
}

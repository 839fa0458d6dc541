use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct RawSettings {
    pub model: RawModelSettings,
    pub logging: LoggingSettings,
    pub api: ApiSettings,
}

/// Where the detection model lives and how its output is filtered.
#[derive(Debug, Deserialize, Clone)]
pub struct RawModelSettings {
    /// ONNX file, relative paths are resolved against the working directory.
    pub path: PathBuf,
    /// Fetched into `path` at startup when the file is missing. Empty means unset.
    #[serde(default)]
    pub download_url: Option<String>,
    pub detector: DetectorSettings,
}

/// Inference parameters for the YOLO detector.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DetectorSettings {
    /// Side of the square model input, 640 for stock YOLO exports.
    pub input_size: u32,
    pub confidence_threshold: f32,
    pub iou_threshold: f32,
    pub max_detections: usize,
    pub intra_threads: usize,
    /// Label per class id. Ids past the end are reported as `class_{id}`.
    #[serde(default)]
    pub class_names: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    /// Env-filter directive used when `RUST_LOG` is not set.
    pub level: String,
}

/// Configuration for the API server.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub host: String,
    pub port: u32,
    pub allowed_origins: Vec<String>,
    /// Largest accepted image upload in bytes.
    pub max_upload_bytes: usize,
}

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelStoreError {
    #[error("Model not found at {0} and no download URL is configured (set model.download_url or MODEL_URL)")]
    Missing(PathBuf),

    #[error("Invalid model URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Model download from {url} failed with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("{0} returned an HTML page instead of the model, is the file shared publicly?")]
    NotAFile(String),

    #[error("I/O error while storing model: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not move downloaded model into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

use crate::api::detect::interfaces::ErrorDetail;
use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use color_eyre::eyre;
use ml_analysis::DetectorError;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("File must be an image (PNG, JPEG, etc.)")]
    NotAnImage,

    #[error("No file was uploaded.")]
    MissingFile,

    #[error("File is larger than the {limit} byte upload limit.")]
    PayloadTooLarge { limit: usize },

    #[error("Malformed upload: {0}")]
    Multipart(String),

    #[error("cannot decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image has no pixels")]
    EmptyImage,

    #[error(transparent)]
    Detector(#[from] DetectorError),

    #[error("internal error: {0}")]
    Internal(#[from] eyre::Report),
}

impl DetectError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotAnImage
            | Self::MissingFile
            | Self::PayloadTooLarge { .. }
            | Self::Multipart(_) => StatusCode::BAD_REQUEST,
            Self::Decode(_) | Self::EmptyImage | Self::Detector(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for DetectError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = if status.is_client_error() {
            warn!("Rejected upload: {self}");
            self.to_string()
        } else {
            error!("Detection failed: {self:?}");
            format!("Error processing image: {self}")
        };

        (status, Json(ErrorDetail { detail })).into_response()
    }
}

impl From<MultipartError> for DetectError {
    fn from(err: MultipartError) -> Self {
        Self::Multipart(err.body_text())
    }
}

impl From<MultipartRejection> for DetectError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::Multipart(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for DetectError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(eyre::Report::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(err: DetectError) -> color_eyre::Result<(StatusCode, Value)> {
        let response = err.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, serde_json::from_slice(&body)?))
    }

    #[tokio::test]
    async fn client_errors_are_bad_requests() -> color_eyre::Result<()> {
        let (status, body) = render(DetectError::NotAnImage).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "File must be an image (PNG, JPEG, etc.)");

        let (status, body) = render(DetectError::PayloadTooLarge { limit: 10 }).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "File is larger than the 10 byte upload limit.");
        Ok(())
    }

    #[tokio::test]
    async fn processing_errors_are_server_errors() -> color_eyre::Result<()> {
        let (status, body) = render(DetectError::Detector(DetectorError::Unavailable)).await?;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "Error processing image: detector is unavailable");

        let (status, _) = render(DetectError::EmptyImage).await?;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        Ok(())
    }
}

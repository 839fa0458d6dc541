use crate::api_state::ApiContext;
use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use common_services::api::detect::error::DetectError;
use common_services::api::detect::interfaces::{DetectUpload, DetectionResponse, ErrorDetail};
use common_services::api::detect::service::{read_image_upload, run_detection};
use tracing::{debug, instrument};

/// Detect objects in an uploaded image.
///
/// Every detection is placed in a 3x3 grid over the image, and a single movement
/// decision for the satellite is derived from those positions.
#[utoipa::path(
    post,
    path = "/detect",
    tag = "Detection",
    request_body(content = DetectUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Detected objects and the resulting decision.", body = DetectionResponse),
        (status = 400, description = "The upload is missing, not an image, or too large.", body = ErrorDetail),
        (status = 500, description = "The image could not be decoded or analyzed.", body = ErrorDetail),
    )
)]
#[instrument(skip(context, multipart))]
pub async fn detect_handler(
    State(context): State<ApiContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DetectionResponse>, DetectError> {
    let mut multipart = multipart?;
    let bytes = read_image_upload(&mut multipart, context.settings.api.max_upload_bytes).await?;
    debug!("Received {} byte upload", bytes.len());
    let response = run_detection(context.detector.clone(), bytes).await?;
    Ok(Json(response))
}

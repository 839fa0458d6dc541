use ml_analysis::{ClassifiedObject, Decision};
use serde::Serialize;
use utoipa::ToSchema;

/// Objects found in an uploaded image and what the satellite should do about them.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DetectionResponse {
    /// In detector order.
    pub objects: Vec<ClassifiedObject>,
    #[schema(value_type = String, example = "Move satellite right")]
    pub decision: Decision,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    pub detail: String,
}

/// Multipart body of `POST /detect`, only used for the OpenAPI document.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct DetectUpload {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

use serde::Serialize;
use utoipa::ToSchema;

pub const SERVICE_NAME: &str = "Space Debris Detection API";

#[derive(Debug, Serialize, ToSchema)]
pub struct RootResponse {
    #[schema(example = "Space Debris Detection API")]
    pub message: &'static str,
}

impl Default for RootResponse {
    fn default() -> Self {
        Self {
            message: SERVICE_NAME,
        }
    }
}

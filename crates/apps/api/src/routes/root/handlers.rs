use axum::Json;
use common_services::api::system::interfaces::RootResponse;

#[utoipa::path(
    get,
    path = "/",
    tag = "System",
    responses(
        (status = 200, description = "Service name, used as a liveness probe", body = RootResponse)
    )
)]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse::default())
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    responses(
        (status = 200, description = "API is up and the detector is loaded", body = String),
    )
)]
pub async fn health_check() -> &'static str {
    // The server only starts listening once the model is loaded.
    "OK"
}

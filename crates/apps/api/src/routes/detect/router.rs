use crate::api_state::ApiContext;
use crate::detect::handlers::detect_handler;
use axum::{Router, routing::post};

pub fn detect_public_router() -> Router<ApiContext> {
    Router::new().route("/detect", post(detect_handler))
}

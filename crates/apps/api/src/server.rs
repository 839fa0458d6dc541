use crate::api_state::ApiContext;
use crate::create_router;
use app_state::{ApiSettings, AppSettings};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use common_services::model_store::ensure_model;
use http::{HeaderValue, Method, header};
use ml_analysis::{Detector, YoloDetector};
use reqwest::Client;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub async fn serve(settings: AppSettings) -> Result<()> {
    // --- Model ---
    info!("🚀 Initializing server...");
    let model_path = ensure_model(&settings.model, &Client::new()).await?;
    let detector_settings = settings.model.detector.clone();
    let detector =
        tokio::task::spawn_blocking(move || YoloDetector::new(&model_path, detector_settings))
            .await??;

    let api_state = ApiContext {
        detector: Arc::new(detector),
        settings: settings.clone(),
    };

    // --- Create Router ---
    let app = build_app(api_state);

    let addr: SocketAddr = format!("{}:{}", settings.api.host, settings.api.port)
        .parse()
        .map_err(|e| eyre!("Invalid address: {}", e))?;
    let listener = TcpListener::bind(addr).await?;

    info!("🛰️ Server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Router with all routes and the middleware stack applied.
pub fn build_app(api_state: ApiContext) -> Router {
    let body_limit = api_state.settings.api.max_upload_bytes + MULTIPART_OVERHEAD;
    let cors = cors_layer(&api_state.settings.api);

    create_router(api_state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Convenience for wiring an arbitrary detector, mostly useful in tests.
pub fn build_app_with(detector: Arc<dyn Detector>, settings: AppSettings) -> Router {
    build_app(ApiContext { detector, settings })
}

fn cors_layer(settings: &ApiSettings) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = settings
        .allowed_origins
        .iter()
        .filter_map(|s| match s.parse() {
            Ok(hv) => Some(hv),
            Err(e) => {
                error!("Invalid CORS origin configured: {} - Error: {}", s, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_origin(allowed_origins)
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
            header::USER_AGENT,
        ])
}

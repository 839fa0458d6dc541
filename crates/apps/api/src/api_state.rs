use app_state::AppSettings;
use axum::extract::FromRef;
use ml_analysis::Detector;
use std::sync::Arc;

#[derive(Clone)]
pub struct ApiContext {
    pub detector: Arc<dyn Detector>,
    pub settings: AppSettings,
}

// Lets handlers extract only the part of the state they need.
impl FromRef<ApiContext> for Arc<dyn Detector> {
    fn from_ref(state: &ApiContext) -> Self {
        state.detector.clone()
    }
}

impl FromRef<ApiContext> for AppSettings {
    fn from_ref(state: &ApiContext) -> Self {
        state.settings.clone()
    }
}

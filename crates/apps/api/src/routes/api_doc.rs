use crate::routes::{detect, root};
use common_services::api::detect::interfaces::{DetectUpload, DetectionResponse, ErrorDetail};
use common_services::api::system::interfaces::RootResponse;
use ml_analysis::ClassifiedObject;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        root::handlers::root,
        root::handlers::health_check,
        detect::handlers::detect_handler,
    ),
    components(
        schemas(RootResponse, DetectionResponse, ClassifiedObject, ErrorDetail, DetectUpload),
    ),
    tags(
        (name = "Space Debris", description = "Space debris detection API"),
        (name = "Detection", description = "Detect objects and decide how to move the satellite"),
        (name = "System", description = "Liveness and health check"),
    )
)]
pub struct ApiDoc;

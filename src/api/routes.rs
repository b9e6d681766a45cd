//! Route definitions for the API.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers;
use crate::AppState;

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::moderate_image,
        handlers::evaluate_report,
        handlers::get_thresholds,
        handlers::health_check,
    ),
    components(schemas(
        crate::api::types::ModerateImageRequest,
        crate::api::types::ModerateImageResponse,
        crate::api::types::EvaluateReportRequest,
        crate::api::types::EvaluateReportResponse,
        crate::api::types::ThresholdsResponse,
        crate::api::types::HealthResponse,
        crate::domain::AnalysisReport,
        crate::domain::NudityScores,
        crate::domain::DetectedText,
        crate::domain::Face,
        crate::domain::FaceAttributes,
        crate::domain::Thresholds,
        crate::domain::Verdict,
        crate::domain::EvaluationResult,
        crate::domain::FaceEmotionReadout,
        crate::domain::ModerationOutcome,
    )),
    tags(
        (name = "moderation", description = "Image moderation endpoints"),
        (name = "health", description = "Health and status endpoints")
    ),
    info(
        title = "SafeView Core API",
        version = "0.1.0",
        description = "Image moderation gateway - scores uploaded images against calibrated policy thresholds",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Moderation
        .route("/v1/images/moderate", post(handlers::moderate_image))
        .route("/v1/reports/evaluate", post(handlers::evaluate_report))
        .route("/v1/thresholds", get(handlers::get_thresholds))
        // Health
        .route("/v1/health", get(handlers::health_check))
        .with_state(state)
        // OpenAPI docs
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

//! HTTP request handlers.

use axum::{extract::State, Json};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::api::types::*;
use crate::domain::{AnalysisReport, ModerationOutcome, Thresholds, Verdict};
use crate::engine::CacheKey;
use crate::error::{ModerationError, ModerationResult};
use crate::AppState;

/// Resolve the effective thresholds for a request and validate them.
fn resolve_thresholds(
    requested: Option<Thresholds>,
    defaults: Thresholds,
) -> ModerationResult<Thresholds> {
    let thresholds = requested.unwrap_or(defaults);
    thresholds
        .validate()
        .map_err(ModerationError::BadRequest)?;
    Ok(thresholds)
}

/// Moderate one image: analyze, score against thresholds, render a verdict.
///
/// POST /v1/images/moderate
#[utoipa::path(
    post,
    path = "/v1/images/moderate",
    request_body = ModerateImageRequest,
    responses(
        (status = 200, description = "Moderation complete (verdict may be error on provider failure)", body = ModerateImageResponse),
        (status = 400, description = "Malformed image or thresholds"),
        (status = 500, description = "Internal error")
    ),
    tag = "moderation"
)]
pub async fn moderate_image(
    State(state): State<AppState>,
    Json(request): Json<ModerateImageRequest>,
) -> ModerationResult<Json<ModerateImageResponse>> {
    let image = BASE64
        .decode(request.image.trim())
        .map_err(|e| ModerationError::BadRequest(format!("Invalid base64 image: {}", e)))?;

    let thresholds = resolve_thresholds(request.thresholds, state.default_thresholds)?;

    let key = CacheKey::new(&image, &thresholds);
    if let Some(outcome) = state.cache.get(&key).await {
        tracing::debug!(evaluation_id = %outcome.evaluation.id, "Serving cached outcome");
        return Ok(Json(ModerateImageResponse {
            evaluation: outcome.evaluation,
            report: outcome.report,
            cached: true,
        }));
    }

    let outcome = match state.provider.analyze(&image).await {
        Ok(provider_report) => {
            let evaluation = state.evaluator.evaluate(&provider_report.report, &thresholds);
            ModerationOutcome {
                evaluation,
                report: provider_report.raw,
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Analysis provider call failed");
            ModerationOutcome::provider_error(format!("Analysis failed: {}", e))
        }
    };

    tracing::info!(
        evaluation_id = %outcome.evaluation.id,
        verdict = %outcome.evaluation.verdict,
        rule_count = outcome.evaluation.rule_hits.len(),
        image_len = image.len(),
        "Moderation complete"
    );

    // Provider failures are not memoized; a retry should hit the provider.
    if outcome.evaluation.verdict != Verdict::Error {
        state.cache.insert(key, outcome.clone()).await;
    }

    Ok(Json(ModerateImageResponse {
        evaluation: outcome.evaluation,
        report: outcome.report,
        cached: false,
    }))
}

/// Evaluate a stored analysis report against thresholds.
///
/// POST /v1/reports/evaluate
#[utoipa::path(
    post,
    path = "/v1/reports/evaluate",
    request_body = EvaluateReportRequest,
    responses(
        (status = 200, description = "Evaluation complete", body = EvaluateReportResponse),
        (status = 400, description = "Malformed report or thresholds"),
        (status = 500, description = "Internal error")
    ),
    tag = "moderation"
)]
pub async fn evaluate_report(
    State(state): State<AppState>,
    Json(request): Json<EvaluateReportRequest>,
) -> ModerationResult<Json<EvaluateReportResponse>> {
    let thresholds = resolve_thresholds(request.thresholds, state.default_thresholds)?;

    let report = AnalysisReport::from_value(&request.report)?;
    let evaluation = state.evaluator.evaluate(&report, &thresholds);

    tracing::info!(
        evaluation_id = %evaluation.id,
        verdict = %evaluation.verdict,
        rule_count = evaluation.rule_hits.len(),
        "Report evaluation complete"
    );

    Ok(Json(EvaluateReportResponse {
        evaluation,
        report: request.report,
    }))
}

/// Get the configured default thresholds.
///
/// GET /v1/thresholds
#[utoipa::path(
    get,
    path = "/v1/thresholds",
    responses(
        (status = 200, description = "Configured calibration", body = ThresholdsResponse)
    ),
    tag = "moderation"
)]
pub async fn get_thresholds(State(state): State<AppState>) -> Json<ThresholdsResponse> {
    Json(ThresholdsResponse {
        thresholds: state.default_thresholds,
    })
}

/// Health check endpoint.
///
/// GET /v1/health
#[utoipa::path(
    get,
    path = "/v1/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider = if state.provider.is_configured() {
        "configured".to_string()
    } else {
        "missing credentials".to_string()
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

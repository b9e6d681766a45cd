//! SafeView Core - Image Moderation Gateway
//!
//! This service forwards uploaded images to a content-analysis provider,
//! scores the returned report against calibrated thresholds, and renders a
//! pass/fail verdict with human-readable justifications.

use std::sync::Arc;

use tokio::net::TcpListener;

mod api;
mod config;
mod domain;
mod engine;
mod error;
mod logging;
mod provider;

use crate::api::build_router;
use crate::config::Config;
use crate::domain::Thresholds;
use crate::engine::{EvaluationCache, ModerationEvaluator};
use crate::provider::{AnalysisProvider, SightengineClient};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The moderation evaluator.
    pub evaluator: Arc<ModerationEvaluator>,
    /// Analysis provider client.
    pub provider: Arc<dyn AnalysisProvider>,
    /// Memoized outcomes keyed on image content and thresholds.
    pub cache: Arc<EvaluationCache>,
    /// Operator-calibrated default thresholds.
    pub default_thresholds: Thresholds,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    // This is optional and won't fail if .env doesn't exist
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file loaded ({e})");
    }

    // Initialize logging
    logging::init();

    tracing::info!("Starting SafeView Core v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        provider_endpoint = %config.provider.endpoint,
        cache_capacity = config.moderation.cache_capacity,
        "Configuration loaded"
    );

    config
        .moderation
        .thresholds
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid calibrated thresholds: {}", e))?;

    // Build the provider client from injected configuration
    let provider = SightengineClient::new(config.provider.clone());
    if provider.is_configured() {
        tracing::info!(
            models = %config.provider.models.join(","),
            "Analysis provider configured"
        );
    } else {
        tracing::warn!(
            "Analysis provider credentials missing - moderation requests will return error verdicts"
        );
    }

    // Build application state
    let state = AppState {
        evaluator: Arc::new(ModerationEvaluator::new()),
        provider: Arc::new(provider),
        cache: Arc::new(EvaluationCache::new(config.moderation.cache_capacity)),
        default_thresholds: config.moderation.thresholds,
    };

    // Build router
    let app = build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "Server listening");
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

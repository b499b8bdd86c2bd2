//! HTTP handlers module
//!
//! Contains all HTTP endpoint handling logic

pub mod ai;
pub mod health;
pub mod usage;

use crate::config::Settings;
use crate::services::{CompletionEngine, OpenAIClient, UsageTracker};
use anyhow::{Context, Result};
use axum::http::HeaderValue;
use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

/// Maximum accepted request body size in bytes
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Application state
///
/// Engine and tracker are constructed once at startup and injected here;
/// handlers never reach for globals
#[derive(Debug)]
pub struct AppState {
    pub settings: Settings,
    pub engine: CompletionEngine,
    pub tracker: Arc<UsageTracker>,
}

/// Create application router
pub async fn create_router(settings: Settings) -> Result<Router> {
    // Create provider client
    let client = OpenAIClient::new(&settings)?;

    // Create usage tracker and completion engine
    let tracker = Arc::new(UsageTracker::new(settings.pricing.clone()));
    let engine = CompletionEngine::new(client, tracker.clone(), &settings);

    // Create application state
    let app_state = Arc::new(AppState {
        settings: settings.clone(),
        engine,
        tracker,
    });

    // CORS restricted to the configured origin; "*" opens it up
    let cors = if settings.security.allowed_origin == "*" {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origin = settings
            .security
            .allowed_origin
            .parse::<HeaderValue>()
            .context("Invalid CORS origin")?;
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Create middleware stack
    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors);

    // Create routes
    let router = Router::new()
        .route("/api/v1/ai", post(ai::handle_completion))
        .route("/api/v1/ai/stream", post(ai::handle_completion_stream))
        .route("/api/v1/usage/recent", get(usage::usage_recent))
        .route("/health", get(health::health_check))
        .layer(axum::middleware::from_fn(
            crate::middleware::logging::request_logging_middleware,
        ))
        .with_state(app_state)
        .layer(middleware_stack);

    Ok(router)
}

//! Usage history handlers
//!
//! Exposes the tracker's recent accounting records

use crate::handlers::AppState;
use crate::models::UsageRecentResponse;
use crate::services::tracker::DEFAULT_RECENT_LIMIT;
use axum::{extract::State, response::Json};
use std::sync::Arc;
use tracing::debug;

/// Recent usage records
///
/// GET /api/v1/usage/recent
///
/// Returns the most recent records, oldest to newest, most recent last
pub async fn usage_recent(State(state): State<Arc<AppState>>) -> Json<UsageRecentResponse> {
    let items = state.tracker.recent(DEFAULT_RECENT_LIMIT);
    debug!("Returning {} usage records", items.len());

    Json(UsageRecentResponse { items })
}

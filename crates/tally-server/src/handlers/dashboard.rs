//! Dashboard and plan handlers

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Json,
};
use chrono::Utc;

use crate::{get_user_email, AppError, AppState};
use tally_core::gating::TierSummary;
use tally_core::models::DashboardStats;

/// GET /api/dashboard - Month-to-date overview
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<DashboardStats>, AppError> {
    let user_email = get_user_email(request.headers());

    let stats = state.db.get_dashboard_stats(Utc::now().date_naive())?;

    state
        .db
        .log_audit(&user_email, "view", Some("dashboard"), None, None)?;

    Ok(Json(stats))
}

/// GET /api/tier - Limits and features of the configured plan
pub async fn get_tier(State(state): State<Arc<AppState>>) -> Json<TierSummary> {
    Json(state.gate().summary())
}

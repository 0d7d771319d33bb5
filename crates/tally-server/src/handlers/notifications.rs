//! Notification handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{get_user_email, AppError, AppState, SuccessResponse, MAX_PAGE_LIMIT};
use tally_core::models::Notification;

#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// Include notifications already read
    #[serde(default)]
    pub all: bool,
    #[serde(default = "default_notification_limit")]
    pub limit: i64,
}

fn default_notification_limit() -> i64 {
    50
}

#[derive(Serialize)]
pub struct UnreadCount {
    pub unread: i64,
}

#[derive(Serialize)]
pub struct MarkedCount {
    pub marked: usize,
}

/// GET /api/notifications - List notifications, newest first
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NotificationQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<Notification>>, AppError> {
    let user_email = get_user_email(&headers);
    let limit = params.limit.clamp(1, MAX_PAGE_LIMIT);

    let notifications = state.db.list_notifications(params.all, limit)?;

    state.db.log_audit(
        &user_email,
        "list",
        Some("notification"),
        None,
        Some(&format!("all={}, count={}", params.all, notifications.len())),
    )?;

    Ok(Json(notifications))
}

/// GET /api/notifications/count - Unread notification count
pub async fn count_notifications(
    State(state): State<Arc<AppState>>,
) -> Result<Json<UnreadCount>, AppError> {
    let unread = state.db.count_unread_notifications()?;
    Ok(Json(UnreadCount { unread }))
}

/// POST /api/notifications/:id/read - Mark one notification read
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_email = get_user_email(request.headers());

    state.db.mark_notification_read(id)?;

    state
        .db
        .log_audit(&user_email, "read", Some("notification"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}

/// POST /api/notifications/read-all - Mark every notification read
pub async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<MarkedCount>, AppError> {
    let user_email = get_user_email(request.headers());

    let marked = state.db.mark_all_notifications_read()?;

    state.db.log_audit(
        &user_email,
        "read_all",
        Some("notification"),
        None,
        Some(&format!("marked={}", marked)),
    )?;

    Ok(Json(MarkedCount { marked }))
}

//! Recurring rule handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::HeaderMap,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;

use crate::{get_user_email, read_json, AppError, AppState, SuccessResponse};
use tally_core::db::RecurringRunSummary;
use tally_core::gating::Resource;
use tally_core::models::{Frequency, NewRecurringTransaction, RecurringKind, RecurringTransaction};

/// Query parameters for listing rules
#[derive(Debug, Deserialize)]
pub struct RecurringQuery {
    /// Include paused rules
    #[serde(default)]
    pub all: bool,
}

/// Query parameters for a run
#[derive(Debug, Deserialize)]
pub struct RunQuery {
    /// Process occurrences up to this date (defaults to today)
    pub date: Option<NaiveDate>,
}

/// Request body for creating a rule
#[derive(Debug, Deserialize)]
pub struct CreateRecurringRequest {
    pub kind: RecurringKind,
    pub name: String,
    pub category: Option<String>,
    pub amount: f64,
    pub currency: Option<String>,
    pub frequency: Frequency,
    /// First occurrence (defaults to today)
    pub start_date: Option<NaiveDate>,
}

/// GET /api/recurring - List recurring rules
pub async fn list_recurring(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecurringQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<RecurringTransaction>>, AppError> {
    let user_email = get_user_email(&headers);

    let rules = state.db.list_recurring(params.all)?;

    state.db.log_audit(
        &user_email,
        "list",
        Some("recurring"),
        None,
        Some(&format!("count={}", rules.len())),
    )?;

    Ok(Json(rules))
}

/// POST /api/recurring - Create a recurring rule
pub async fn create_recurring(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<RecurringTransaction>, AppError> {
    let user_email = get_user_email(request.headers());
    let req: CreateRecurringRequest = read_json(request).await?;

    state
        .gate()
        .check_create(Resource::RecurringRules, state.db.count_recurring()?)?;

    let rule = NewRecurringTransaction {
        kind: req.kind,
        name: req.name,
        category: req.category,
        amount: req.amount,
        currency: req
            .currency
            .unwrap_or_else(|| state.settings.default_currency.clone()),
        frequency: req.frequency,
        start_date: req.start_date.unwrap_or_else(|| Utc::now().date_naive()),
    };

    let id = state.db.create_recurring(&rule)?;
    let created = state
        .db
        .get_recurring(id)?
        .ok_or_else(|| AppError::internal("Recurring rule vanished after insert"))?;

    state.db.log_audit(
        &user_email,
        "create",
        Some("recurring"),
        Some(id),
        Some(&format!(
            "kind={}, frequency={}, amount={:.2}",
            created.kind, created.frequency, created.amount
        )),
    )?;

    Ok(Json(created))
}

/// DELETE /api/recurring/:id - Delete a rule (generated records are kept)
pub async fn delete_recurring(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_email = get_user_email(request.headers());

    state.db.delete_recurring(id)?;

    state
        .db
        .log_audit(&user_email, "delete", Some("recurring"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}

/// POST /api/recurring/run?date= - Materialize every occurrence that is due
pub async fn run_recurring(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RunQuery>,
    headers: HeaderMap,
) -> Result<Json<RecurringRunSummary>, AppError> {
    let user_email = get_user_email(&headers);
    let today = params.date.unwrap_or_else(|| Utc::now().date_naive());

    let summary = state
        .db
        .process_due_recurring(today, state.settings.recurring.max_catch_up)?;

    info!(
        date = %today,
        created = summary.total_created(),
        "Processed recurring rules"
    );

    state.db.log_audit(
        &user_email,
        "run",
        Some("recurring"),
        None,
        Some(&format!(
            "date={}, expenses={}, incomes={}",
            today, summary.expenses_created, summary.incomes_created
        )),
    )?;

    Ok(Json(summary))
}

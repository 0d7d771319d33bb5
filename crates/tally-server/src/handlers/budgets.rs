//! Budget handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::{get_user_email, read_json, AppError, AppState, SuccessResponse};
use tally_core::budget::BudgetEvaluation;
use tally_core::gating::Resource;
use tally_core::models::{Budget, NewBudget};

/// Request body for creating or replacing a budget
#[derive(Debug, Deserialize)]
pub struct BudgetRequest {
    pub category: String,
    pub monthly_limit: f64,
    pub currency: Option<String>,
}

impl BudgetRequest {
    fn into_new_budget(self, default_currency: &str) -> NewBudget {
        NewBudget {
            category: self.category,
            monthly_limit: self.monthly_limit,
            currency: self.currency.unwrap_or_else(|| default_currency.to_string()),
        }
    }
}

fn ensure_category_free(state: &AppState, category: &str, except_id: Option<i64>) -> Result<(), AppError> {
    let taken = state
        .db
        .list_budgets()?
        .iter()
        .any(|b| b.category == category && Some(b.id) != except_id);
    if taken {
        return Err(AppError::conflict(&format!(
            "A budget for '{}' already exists",
            category
        )));
    }
    Ok(())
}

/// GET /api/budgets - List all budgets
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<Budget>>, AppError> {
    let user_email = get_user_email(request.headers());

    let budgets = state.db.list_budgets()?;

    state.db.log_audit(
        &user_email,
        "list",
        Some("budget"),
        None,
        Some(&format!("count={}", budgets.len())),
    )?;

    Ok(Json(budgets))
}

/// POST /api/budgets - Create a budget
pub async fn create_budget(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Budget>, AppError> {
    let user_email = get_user_email(request.headers());
    let req: BudgetRequest = read_json(request).await?;
    ensure_category_free(&state, &req.category, None)?;

    state
        .gate()
        .check_create(Resource::Budgets, state.db.count_budgets()?)?;

    let id = state
        .db
        .create_budget(&req.into_new_budget(&state.settings.default_currency))?;
    let budget = state
        .db
        .get_budget(id)?
        .ok_or_else(|| AppError::internal("Budget vanished after insert"))?;

    state.db.log_audit(
        &user_email,
        "create",
        Some("budget"),
        Some(id),
        Some(&format!(
            "category={}, limit={:.2}",
            budget.category, budget.monthly_limit
        )),
    )?;

    Ok(Json(budget))
}

/// PUT /api/budgets/:id - Replace a budget's fields
pub async fn update_budget(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Budget>, AppError> {
    let user_email = get_user_email(request.headers());
    let req: BudgetRequest = read_json(request).await?;
    ensure_category_free(&state, &req.category, Some(id))?;

    let budget = state
        .db
        .update_budget(id, &req.into_new_budget(&state.settings.default_currency))?;

    state.db.log_audit(
        &user_email,
        "update",
        Some("budget"),
        Some(id),
        Some(&format!("limit={:.2}", budget.monthly_limit)),
    )?;

    Ok(Json(budget))
}

/// DELETE /api/budgets/:id - Delete a budget
pub async fn delete_budget(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_email = get_user_email(request.headers());

    state.db.delete_budget(id)?;

    state
        .db
        .log_audit(&user_email, "delete", Some("budget"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/budgets/status - Month-to-date status for every budget
///
/// Newly crossed thresholds are recorded and turned into notifications,
/// so each one is reported once per month.
pub async fn budget_status(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<BudgetEvaluation>, AppError> {
    let user_email = get_user_email(request.headers());

    let evaluation = state
        .db
        .evaluate_budgets(Utc::now(), state.settings.alerts.enabled)?;

    if !evaluation.alerts.is_empty() {
        info!(count = evaluation.alerts.len(), "Budget alerts fired");
    }

    state.db.log_audit(
        &user_email,
        "status",
        Some("budget"),
        None,
        Some(&format!(
            "budgets={}, alerts={}",
            evaluation.statuses.len(),
            evaluation.alerts.len()
        )),
    )?;

    Ok(Json(evaluation))
}

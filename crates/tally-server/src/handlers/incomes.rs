//! Income handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::HeaderMap,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::{get_user_email, read_json, AppError, AppState, SuccessResponse};
use tally_core::models::{Income, NewIncome};

/// Query parameters for listing income (inclusive YYYY-MM-DD bounds)
#[derive(Debug, Deserialize)]
pub struct IncomeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Request body for recording income
#[derive(Debug, Deserialize)]
pub struct CreateIncomeRequest {
    pub source: String,
    pub amount: f64,
    pub currency: Option<String>,
    pub date: Option<NaiveDate>,
}

/// GET /api/incomes - List income records
pub async fn list_incomes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IncomeQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<Income>>, AppError> {
    let user_email = get_user_email(&headers);

    let incomes = state.db.list_incomes(params.from, params.to)?;

    state.db.log_audit(
        &user_email,
        "list",
        Some("income"),
        None,
        Some(&format!("count={}", incomes.len())),
    )?;

    Ok(Json(incomes))
}

/// POST /api/incomes - Record income
pub async fn create_income(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Income>, AppError> {
    let user_email = get_user_email(request.headers());
    let req: CreateIncomeRequest = read_json(request).await?;

    let new_income = NewIncome {
        source: req.source,
        amount: req.amount,
        currency: req
            .currency
            .unwrap_or_else(|| state.settings.default_currency.clone()),
        date: req.date.unwrap_or_else(|| Utc::now().date_naive()),
        recurring_id: None,
    };

    let id = state.db.create_income(&new_income)?;

    state.db.log_audit(
        &user_email,
        "create",
        Some("income"),
        Some(id),
        Some(&format!(
            "source={}, amount={:.2}",
            new_income.source, new_income.amount
        )),
    )?;

    let income = state
        .db
        .list_incomes(Some(new_income.date), Some(new_income.date))?
        .into_iter()
        .find(|i| i.id == id)
        .ok_or_else(|| AppError::internal("Income vanished after insert"))?;

    Ok(Json(income))
}

/// DELETE /api/incomes/:id - Delete an income record
pub async fn delete_income(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_email = get_user_email(request.headers());

    state.db.delete_income(id)?;

    state
        .db
        .log_audit(&user_email, "delete", Some("income"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}

//! Expense handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::HeaderMap,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::{get_user_email, read_json, AppError, AppState, SuccessResponse, MAX_PAGE_LIMIT};
use tally_core::db::ExpenseFilter;
use tally_core::models::{Expense, NewExpense};

/// Query parameters for listing and exporting expenses
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseQuery {
    /// Calendar month (YYYY-MM)
    pub month: Option<String>,
    pub category: Option<String>,
    pub limit: Option<i64>,
}

impl ExpenseQuery {
    pub(crate) fn to_filter(&self) -> Result<ExpenseFilter, AppError> {
        let mut filter = match &self.month {
            Some(month) => ExpenseFilter::parse_month(month)?,
            None => ExpenseFilter::default(),
        };
        if let Some(category) = &self.category {
            filter = filter.with_category(category.clone());
        }
        filter.limit = self.limit.map(|l| l.clamp(1, MAX_PAGE_LIMIT));
        Ok(filter)
    }
}

/// Request body for recording an expense
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    pub category: String,
    /// Negative amounts record refunds
    pub amount: f64,
    pub currency: Option<String>,
    /// Defaults to today
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// GET /api/expenses - List expenses, newest first
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExpenseQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<Expense>>, AppError> {
    let user_email = get_user_email(&headers);

    let filter = params.to_filter()?;
    let expenses = state.db.list_expenses(&filter)?;

    state.db.log_audit(
        &user_email,
        "list",
        Some("expense"),
        None,
        Some(&format!(
            "month={:?}, category={:?}, count={}",
            params.month,
            params.category,
            expenses.len()
        )),
    )?;

    Ok(Json(expenses))
}

/// POST /api/expenses - Record an expense
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Expense>, AppError> {
    let user_email = get_user_email(request.headers());
    let req: CreateExpenseRequest = read_json(request).await?;

    let new_expense = NewExpense {
        category: req.category,
        amount: req.amount,
        currency: req
            .currency
            .unwrap_or_else(|| state.settings.default_currency.clone()),
        date: req.date.unwrap_or_else(|| Utc::now().date_naive()),
        description: req.description,
        recurring_id: None,
    };

    let id = state.db.create_expense(&new_expense)?;
    let expense = state
        .db
        .get_expense(id)?
        .ok_or_else(|| AppError::internal("Expense vanished after insert"))?;

    state.db.log_audit(
        &user_email,
        "create",
        Some("expense"),
        Some(id),
        Some(&format!(
            "category={}, amount={:.2}",
            expense.category, expense.amount
        )),
    )?;

    Ok(Json(expense))
}

/// DELETE /api/expenses/:id - Delete an expense
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_email = get_user_email(request.headers());

    state.db.delete_expense(id)?;

    state
        .db
        .log_audit(&user_email, "delete", Some("expense"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}

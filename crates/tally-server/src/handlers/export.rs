//! CSV export handlers

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, Response, StatusCode},
};
use tracing::info;

use super::expenses::ExpenseQuery;
use crate::{get_user_email, AppError, AppState};
use tally_core::export::expenses_csv_string;
use tally_core::gating::Feature;

/// GET /api/export/expenses?month=&category= - Download expenses as CSV
pub async fn export_expenses(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExpenseQuery>,
    headers: HeaderMap,
) -> Result<Response<Body>, AppError> {
    let user_email = get_user_email(&headers);

    state.gate().require(Feature::CsvExport)?;

    let filter = params.to_filter()?;
    let expenses = state.db.list_expenses(&filter)?;
    let csv = expenses_csv_string(&expenses)?;

    state.db.log_audit(
        &user_email,
        "export",
        Some("expense"),
        None,
        Some(&format!(
            "month={:?}, category={:?}, count={}",
            params.month,
            params.category,
            expenses.len()
        )),
    )?;

    info!("Exported {} expenses to CSV", expenses.len());

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"expenses.csv\"",
        )
        .body(Body::from(csv))
        .map_err(|e| AppError::internal(&e.to_string()))
}

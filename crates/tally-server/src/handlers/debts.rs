//! Debt handlers: CRUD, projections and payoff planning

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::{get_user_email, read_json, AppError, AppState, SuccessResponse};
use tally_core::debt::{DebtProjection, PayoffStrategy, Projector, StrategyComparison};
use tally_core::gating::Resource;
use tally_core::models::{Debt, DebtType, NewDebt};

/// Request body for creating or replacing a debt
#[derive(Debug, Deserialize)]
pub struct DebtRequest {
    pub name: String,
    #[serde(default = "default_debt_type")]
    pub debt_type: DebtType,
    pub currency: Option<String>,
    pub current_balance: f64,
    #[serde(default)]
    pub interest_rate: f64,
    pub minimum_payment: f64,
}

fn default_debt_type() -> DebtType {
    DebtType::Other
}

impl DebtRequest {
    fn into_new_debt(self, default_currency: &str) -> NewDebt {
        NewDebt {
            name: self.name,
            debt_type: self.debt_type,
            currency: self.currency.unwrap_or_else(|| default_currency.to_string()),
            current_balance: self.current_balance,
            interest_rate: self.interest_rate,
            minimum_payment: self.minimum_payment,
        }
    }
}

/// Query parameters for projections and plans
#[derive(Debug, Deserialize)]
pub struct ExtraPaymentQuery {
    #[serde(default)]
    pub extra: f64,
}

/// Query parameters for ordering
#[derive(Debug, Deserialize)]
pub struct StrategyQuery {
    pub strategy: Option<String>,
}

/// GET /api/debts - List all debts
pub async fn list_debts(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<Debt>>, AppError> {
    let user_email = get_user_email(request.headers());

    let debts = state.db.list_debts()?;

    state.db.log_audit(
        &user_email,
        "list",
        Some("debt"),
        None,
        Some(&format!("count={}", debts.len())),
    )?;

    Ok(Json(debts))
}

/// POST /api/debts - Create a debt
pub async fn create_debt(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Debt>, AppError> {
    let user_email = get_user_email(request.headers());
    let req: DebtRequest = read_json(request).await?;

    state
        .gate()
        .check_create(Resource::Debts, state.db.count_debts()?)?;

    let new_debt = req.into_new_debt(&state.settings.default_currency);
    let id = state.db.create_debt(&new_debt)?;
    let debt = state
        .db
        .get_debt(id)?
        .ok_or_else(|| AppError::internal("Debt vanished after insert"))?;

    state.db.log_audit(
        &user_email,
        "create",
        Some("debt"),
        Some(id),
        Some(&format!("name={}", debt.name)),
    )?;

    Ok(Json(debt))
}

/// GET /api/debts/:id - Get a single debt
pub async fn get_debt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Debt>, AppError> {
    let user_email = get_user_email(request.headers());

    let debt = state
        .db
        .get_debt(id)?
        .ok_or_else(|| AppError::not_found(&format!("Debt {} not found", id)))?;

    state
        .db
        .log_audit(&user_email, "view", Some("debt"), Some(id), None)?;

    Ok(Json(debt))
}

/// PUT /api/debts/:id - Replace a debt's fields
pub async fn update_debt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Debt>, AppError> {
    let user_email = get_user_email(request.headers());
    let req: DebtRequest = read_json(request).await?;

    let debt = state
        .db
        .update_debt(id, &req.into_new_debt(&state.settings.default_currency))?;

    state.db.log_audit(
        &user_email,
        "update",
        Some("debt"),
        Some(id),
        Some(&format!("balance={:.2}", debt.current_balance)),
    )?;

    Ok(Json(debt))
}

/// DELETE /api/debts/:id - Delete a debt
pub async fn delete_debt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_email = get_user_email(request.headers());

    state.db.delete_debt(id)?;

    state
        .db
        .log_audit(&user_email, "delete", Some("debt"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/debts/:id/projection?extra= - Month-by-month payoff schedule
pub async fn project_debt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(params): Query<ExtraPaymentQuery>,
    headers: HeaderMap,
) -> Result<Json<DebtProjection>, AppError> {
    let user_email = get_user_email(&headers);

    let debt = state
        .db
        .get_debt(id)?
        .ok_or_else(|| AppError::not_found(&format!("Debt {} not found", id)))?;

    let projector = Projector::new(state.settings.projection.max_months);
    let projection = projector.project(&debt, params.extra, Utc::now().date_naive())?;

    info!(
        debt_id = id,
        months = ?projection.outcome.months_to_payoff(),
        "Projected debt payoff"
    );

    state.db.log_audit(
        &user_email,
        "project",
        Some("debt"),
        Some(id),
        Some(&format!("extra={:.2}", params.extra)),
    )?;

    Ok(Json(projection))
}

/// GET /api/debts/order?strategy= - Debts in the order they should be paid
pub async fn order_debts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StrategyQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<Debt>>, AppError> {
    let user_email = get_user_email(&headers);

    let strategy: PayoffStrategy = match params.strategy.as_deref() {
        Some(s) => s.parse().map_err(|e: String| AppError::bad_request(&e))?,
        None => PayoffStrategy::default(),
    };

    let debts = state.db.list_debts()?;
    let ordered = tally_core::order_debts(&debts, strategy);

    state.db.log_audit(
        &user_email,
        "order",
        Some("debt"),
        None,
        Some(&format!("strategy={}", strategy)),
    )?;

    Ok(Json(ordered))
}

/// GET /api/debts/plan?extra= - Compare avalanche and snowball plans
pub async fn plan_debts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExtraPaymentQuery>,
    headers: HeaderMap,
) -> Result<Json<StrategyComparison>, AppError> {
    let user_email = get_user_email(&headers);

    let debts = state.db.list_debts()?;
    let comparison = tally_core::compare_strategies(
        &debts,
        params.extra,
        state.settings.projection.max_months,
    )?;

    state.db.log_audit(
        &user_email,
        "plan",
        Some("debt"),
        None,
        Some(&format!(
            "extra={:.2}, recommended={}",
            params.extra, comparison.recommended
        )),
    )?;

    Ok(Json(comparison))
}

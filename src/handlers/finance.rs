// src/handlers/finance.rs

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{i18n::Locale, tenancy::OrgContext},
    models::finance::{FinanceSummary, PaymentMethod, PayrollEntry, Transaction},
    models::membership::Membership,
};

// Intervalo inclusivo de datas do painel -> [from 00:00, to+1d 00:00) em UTC
fn date_range_bounds(
    from: NaiveDate,
    to: NaiveDate,
) -> (chrono::DateTime<Utc>, chrono::DateTime<Utc>) {
    let start = Utc.from_utc_datetime(&from.and_hms_opt(0, 0, 0).unwrap_or_default());
    let end = Utc.from_utc_datetime(
        &(to + Duration::days(1))
            .and_hms_opt(0, 0, 0)
            .unwrap_or_default(),
    );
    (start, end)
}

// =============================================================================
//  LIVRO-CAIXA
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionPayload {
    pub branch_id: Option<Uuid>,
    pub student_id: Option<Uuid>,

    #[schema(example = "10.00")]
    pub amount: Decimal,

    #[schema(example = "cash")]
    pub payment_method: PaymentMethod,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Pago suelto")]
    pub concept: String,
}

// POST /api/finance/transactions
#[utoipa::path(
    post,
    path = "/api/finance/transactions",
    tag = "Finance",
    request_body = CreateTransactionPayload,
    responses(
        (status = 201, description = "Lançamento registrado", body = Transaction)
    ),
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_transaction(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
    Json(payload): Json<CreateTransactionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let transaction = app_state
        .finance_service
        .record_transaction(
            org.0,
            payload.branch_id,
            payload.student_id,
            payload.amount,
            payload.payment_method,
            &payload.concept,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DateRangeQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

// GET /api/finance/transactions?from=&to=
#[utoipa::path(
    get,
    path = "/api/finance/transactions",
    tag = "Finance",
    params(
        DateRangeQuery,
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses(
        (status = 200, description = "Lançamentos do período", body = Vec<Transaction>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_transactions(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
    Query(query): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (from, to) = date_range_bounds(query.from, query.to);

    let transactions = app_state
        .finance_service
        .list_transactions(org.0, from, to)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(transactions)))
}

// =============================================================================
//  VENDA DE PLANO (ativa a mensalidade E cobra, na mesma transação)
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SellPlanPayload {
    pub student_id: Uuid,
    pub plan_id: Uuid,

    #[schema(value_type = Option<String>, format = Date, example = "2025-01-10")]
    pub start_date: Option<NaiveDate>,

    #[schema(example = "cash")]
    pub payment_method: PaymentMethod,
}

// POST /api/finance/sell-plan
#[utoipa::path(
    post,
    path = "/api/finance/sell-plan",
    tag = "Finance",
    request_body = SellPlanPayload,
    responses(
        (status = 201, description = "Mensalidade vendida e cobrada", body = Membership),
        (status = 404, description = "Aluno ou plano inexistente")
    ),
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn sell_plan(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
    Json(payload): Json<SellPlanPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let start_date = payload.start_date.unwrap_or_else(|| Utc::now().date_naive());

    let membership = app_state
        .membership_service
        .enroll(
            org.0,
            payload.student_id,
            payload.plan_id,
            start_date,
            Some(payload.payment_method),
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(membership)))
}

// =============================================================================
//  RESUMO E FOLHA
// =============================================================================

// GET /api/finance/summary?from=&to=
#[utoipa::path(
    get,
    path = "/api/finance/summary",
    tag = "Finance",
    params(
        DateRangeQuery,
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses(
        (status = 200, description = "Receita e solvência do período", body = FinanceSummary)
    ),
    security(("api_jwt" = []))
)]
pub async fn summary(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
    Query(query): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (from, to) = date_range_bounds(query.from, query.to);

    let summary = app_state
        .finance_service
        .summary(org.0, from, to)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(summary)))
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct PayrollQuery {
    #[validate(range(min = 2000, max = 2200, message = "invalid_year"))]
    pub year: i32,

    #[validate(range(min = 1, max = 12, message = "invalid_month"))]
    pub month: u32,
}

// GET /api/finance/payroll?year=&month=
// Recalculado das linhas cruas a cada chamada; não existe fechamento.
#[utoipa::path(
    get,
    path = "/api/finance/payroll",
    tag = "Finance",
    params(
        PayrollQuery,
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses(
        (status = 200, description = "Folha do mês por pessoa", body = Vec<PayrollEntry>)
    ),
    security(("api_jwt" = []))
)]
pub async fn payroll(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
    Query(query): Query<PayrollQuery>,
) -> Result<impl IntoResponse, ApiError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let entries = app_state
        .finance_service
        .payroll(org.0, query.year, query.month)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(entries)))
}

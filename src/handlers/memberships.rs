// src/handlers/memberships.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{i18n::Locale, tenancy::OrgContext},
    models::membership::{CoverageResponse, Membership},
};

// =============================================================================
//  INSCRIÇÃO (passo final do wizard)
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollPayload {
    pub student_id: Uuid,
    pub plan_id: Uuid,

    // Omissão = hoje
    #[schema(value_type = Option<String>, format = Date, example = "2025-01-10")]
    pub start_date: Option<NaiveDate>,
}

// POST /api/memberships
// A ativação da mensalidade NÃO cobra; a cobrança é a venda de plano
// do financeiro (/api/finance/sell-plan), que usa o mesmo serviço.
#[utoipa::path(
    post,
    path = "/api/memberships",
    tag = "Memberships",
    request_body = EnrollPayload,
    responses(
        (status = 201, description = "Mensalidade ativada", body = Membership),
        (status = 404, description = "Aluno ou plano inexistente")
    ),
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn enroll(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
    Json(payload): Json<EnrollPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let start_date = payload.start_date.unwrap_or_else(|| Utc::now().date_naive());

    let membership = app_state
        .membership_service
        .enroll(org.0, payload.student_id, payload.plan_id, start_date, None)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(membership)))
}

// GET /api/memberships/student/{student_id}
#[utoipa::path(
    get,
    path = "/api/memberships/student/{student_id}",
    tag = "Memberships",
    responses(
        (status = 200, description = "Mensalidades do aluno", body = Vec<Membership>)
    ),
    params(
        ("student_id" = Uuid, Path, description = "ID do aluno"),
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_by_student(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
    Path(student_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let memberships = app_state
        .membership_service
        .list_by_student(org.0, student_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(memberships)))
}

// =============================================================================
//  COBERTURA (check em lote do drawer de reserva)
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoveragePayload {
    #[validate(length(min = 1, message = "required"))]
    pub student_ids: Vec<Uuid>,
    pub service_id: Uuid,
}

// POST /api/memberships/coverage
#[utoipa::path(
    post,
    path = "/api/memberships/coverage",
    tag = "Memberships",
    request_body = CoveragePayload,
    responses(
        (status = 200, description = "Subconjunto coberto", body = CoverageResponse)
    ),
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn coverage(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
    Json(payload): Json<CoveragePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let covered_student_ids = app_state
        .membership_service
        .covered_for_service(org.0, &payload.student_ids, payload.service_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(CoverageResponse { covered_student_ids })))
}

// src/handlers/catalog.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{i18n::Locale, tenancy::OrgContext},
    models::catalog::{Plan, PlanWithServices, Service},
};

// =============================================================================
//  SERVIÇOS (Tipos de aula)
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServicePayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Salsa")]
    pub name: String,

    #[serde(default)]
    #[schema(example = "10.00")]
    pub price: Decimal,
}

// POST /api/catalog/services
#[utoipa::path(
    post,
    path = "/api/catalog/services",
    tag = "Catalog",
    request_body = CreateServicePayload,
    responses(
        (status = 201, description = "Serviço criado", body = Service)
    ),
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_service(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
    Json(payload): Json<CreateServicePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let service = app_state
        .catalog_service
        .create_service(org.0, &payload.name, payload.price)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(service)))
}

// GET /api/catalog/services
#[utoipa::path(
    get,
    path = "/api/catalog/services",
    tag = "Catalog",
    responses(
        (status = 200, description = "Serviços da organização", body = Vec<Service>)
    ),
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_services(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
) -> Result<impl IntoResponse, ApiError> {
    let services = app_state
        .catalog_service
        .list_services(org.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(services)))
}

// =============================================================================
//  PLANOS (Mensalidades)
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Mensualidad Salsa")]
    pub name: String,

    #[validate(range(min = 1, message = "invalid_duration"))]
    #[schema(example = 30)]
    pub duration_days: i32,

    #[serde(default)]
    #[schema(example = "120.00")]
    pub price: Decimal,

    // Serviços cobertos (junção). Pode ser vazio num plano ainda legado.
    #[serde(default)]
    pub service_ids: Vec<Uuid>,
}

// POST /api/catalog/plans
#[utoipa::path(
    post,
    path = "/api/catalog/plans",
    tag = "Catalog",
    request_body = CreatePlanPayload,
    responses(
        (status = 201, description = "Plano criado", body = Plan)
    ),
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_plan(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
    Json(payload): Json<CreatePlanPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let plan = app_state
        .catalog_service
        .create_plan(
            org.0,
            &payload.name,
            payload.duration_days,
            payload.price,
            &payload.service_ids,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(plan)))
}

// GET /api/catalog/plans
#[utoipa::path(
    get,
    path = "/api/catalog/plans",
    tag = "Catalog",
    responses(
        (status = 200, description = "Planos com serviços vinculados", body = Vec<PlanWithServices>)
    ),
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_plans(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
) -> Result<impl IntoResponse, ApiError> {
    let plans = app_state
        .catalog_service
        .list_plans(org.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(plans)))
}

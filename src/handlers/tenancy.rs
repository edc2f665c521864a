// src/handlers/tenancy.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::{CurrentProfile, require_role},
        i18n::Locale,
        tenancy::OrgContext,
    },
    models::{
        people::StaffRole,
        tenancy::{Branch, Organization},
    },
};

// GET /api/organizations/current
#[utoipa::path(
    get,
    path = "/api/organizations/current",
    tag = "Tenancy",
    responses(
        (status = 200, description = "Organização do cabeçalho", body = Organization),
        (status = 404, description = "Organização não encontrada")
    ),
    params(
        ("x-organization-id" = uuid::Uuid, Header, description = "ID da organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_current_organization(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
) -> Result<impl IntoResponse, ApiError> {
    let organization = app_state
        .tenancy_service
        .current_organization(org.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(organization)))
}

// ---
// 1. "Payload" (O "Formulário" da API)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBranchPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Sede Norte")]
    pub name: String,

    #[schema(example = "Calle 5 #42")]
    pub address: Option<String>,

    #[schema(example = "America/Mexico_City")]
    pub timezone: Option<String>,
}

// POST /api/organizations/branches
#[utoipa::path(
    post,
    path = "/api/organizations/branches",
    tag = "Tenancy",
    request_body = CreateBranchPayload,
    responses(
        (status = 201, description = "Sede criada", body = Branch),
        (status = 403, description = "Papel insuficiente")
    ),
    params(
        ("x-organization-id" = uuid::Uuid, Header, description = "ID da organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_branch(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
    CurrentProfile(profile): CurrentProfile,
    Json(payload): Json<CreateBranchPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    require_role(&profile, &[StaffRole::Owner, StaffRole::SuperAdmin])
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let branch = app_state
        .tenancy_service
        .create_branch(
            org.0,
            &payload.name,
            payload.address.as_deref(),
            payload.timezone.as_deref(),
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(branch)))
}

// GET /api/organizations/branches
#[utoipa::path(
    get,
    path = "/api/organizations/branches",
    tag = "Tenancy",
    responses(
        (status = 200, description = "Sedes da organização", body = Vec<Branch>)
    ),
    params(
        ("x-organization-id" = uuid::Uuid, Header, description = "ID da organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_branches(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
) -> Result<impl IntoResponse, ApiError> {
    let branches = app_state
        .tenancy_service
        .list_branches(org.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(branches)))
}

// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::{AuthenticatedUser, CurrentProfile, require_role},
        i18n::Locale,
        tenancy::OrgContext,
    },
    models::{
        auth::{AuthResponse, LoginPayload, RegisterPayload, User},
        people::{Profile, StaffRole},
    },
};

// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Conta e organização criadas", body = AuthResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail já em uso")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let token = app_state
        .auth_service
        .register_owner(
            &payload.email,
            &payload.password,
            &payload.full_name,
            &payload.organization_name,
            payload.industry.as_deref(),
            payload.security_pin.as_deref(),
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token })))
}

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Sessão iniciada", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let token = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(AuthResponse { token })))
}

// GET /api/users/me
// O "resolvedor de sessão": do usuário autenticado para o perfil
// (papel + organização + sede).
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Perfil do usuário logado", body = Profile),
        (status = 404, description = "Perfil não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let profile = app_state
        .auth_service
        .resolve_profile(user.id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(profile)))
}

// =============================================================================
//  CONVITES (o antigo endpoint serverless invite-user)
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteUserPayload {
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "staff@academia.com")]
    pub email: String,

    #[schema(example = "staff")]
    pub role: StaffRole,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Pedro Gómez")]
    pub full_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteResponse {
    #[schema(example = "Invitación emitida")]
    pub message: String,
    pub user: User,
    // Mostrada uma única vez; o convidado troca no primeiro acesso
    pub provisional_password: String,
}

// POST /api/users/invite
#[utoipa::path(
    post,
    path = "/api/users/invite",
    tag = "Users",
    request_body = InviteUserPayload,
    responses(
        (status = 201, description = "Usuário convidado", body = InviteResponse),
        (status = 403, description = "Papel insuficiente"),
        (status = 409, description = "E-mail já em uso")
    ),
    params(
        ("x-organization-id" = uuid::Uuid, Header, description = "ID da organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn invite_user(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
    CurrentProfile(profile): CurrentProfile,
    Json(payload): Json<InviteUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    // Só dono ou super_admin convidam
    require_role(&profile, &[StaffRole::Owner, StaffRole::SuperAdmin])
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let (user, _profile, provisional_password) = app_state
        .auth_service
        .invite_user(org.0, &payload.email, payload.role, &payload.full_name)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((
        StatusCode::CREATED,
        Json(InviteResponse {
            message: "Invitación emitida".to_string(),
            user,
            provisional_password,
        }),
    ))
}

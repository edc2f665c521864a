// src/middleware/auth.rs

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{Request, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{i18n::Locale, tenancy::OrgContext},
    models::{
        auth::User,
        people::{Profile, StaffRole},
    },
};

// Guarda de autenticação: valida o Bearer token e insere o usuário
// nos "extensions" da requisição.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&app_state, bearer)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

// Guarda de tenancy: além do token, exige o X-Organization-Id e verifica
// que o perfil do usuário pertence àquela organização. Insere usuário e
// perfil nos extensions.
pub async fn org_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let result = async {
        let user = authenticate(&app_state, bearer).await?;
        let profile = app_state.auth_service.authorize_org(user.id, org.0).await?;
        Ok::<(User, Profile), AppError>((user, profile))
    }
    .await
    .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    request.extensions_mut().insert(result.0);
    request.extensions_mut().insert(result.1);
    Ok(next.run(request).await)
}

async fn authenticate(
    app_state: &AppState,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<User, AppError> {
    let TypedHeader(auth) = bearer.ok_or(AppError::InvalidToken)?;
    app_state.auth_service.validate_token(auth.token()).await
}

// Extrator para obter o usuário autenticado diretamente nos handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(ApiError {
                status: axum::http::StatusCode::UNAUTHORIZED,
                message: "Token de autenticación inválido o ausente.".to_string(),
                details: None,
            })
    }
}

// Extrator do perfil carregado pelo org_guard
#[derive(Debug, Clone)]
pub struct CurrentProfile(pub Profile);

impl<S> FromRequestParts<S> for CurrentProfile
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Profile>()
            .cloned()
            .map(CurrentProfile)
            .ok_or(ApiError {
                status: axum::http::StatusCode::FORBIDDEN,
                message: "Perfil no cargado para esta organización.".to_string(),
                details: None,
            })
    }
}

// Porteiro de papéis: os papéis são um enum fechado, então a checagem
// é uma comparação simples em vez de tabelas de permissão.
pub fn require_role(profile: &Profile, allowed: &[StaffRole]) -> Result<(), AppError> {
    if allowed.contains(&profile.role) {
        Ok(())
    } else {
        Err(AppError::InsufficientRole)
    }
}

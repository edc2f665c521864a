// src/handlers/people.rs

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{i18n::Locale, tenancy::OrgContext},
    models::people::{Professional, Student, StudentListEntry},
};

// =============================================================================
//  ALUNOS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentPayload {
    pub branch_id: Option<Uuid>,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Lucía")]
    pub first_name: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Fernández")]
    pub last_name: String,

    #[validate(email(message = "invalid_email"))]
    #[schema(example = "lucia@email.com")]
    pub email: Option<String>,

    pub phone: Option<String>,
    pub notes: Option<String>,
}

// POST /api/students
#[utoipa::path(
    post,
    path = "/api/students",
    tag = "People",
    request_body = CreateStudentPayload,
    responses(
        (status = 201, description = "Aluno criado", body = Student)
    ),
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_student(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
    Json(payload): Json<CreateStudentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let student = app_state
        .people_service
        .create_student(
            org.0,
            payload.branch_id,
            &payload.first_name,
            &payload.last_name,
            payload.email.as_deref(),
            payload.phone.as_deref(),
            payload.notes.as_deref(),
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(student)))
}

// GET /api/students
#[utoipa::path(
    get,
    path = "/api/students",
    tag = "People",
    responses(
        (status = 200, description = "Alunos com a etiqueta de status", body = Vec<StudentListEntry>)
    ),
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_students(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
) -> Result<impl IntoResponse, ApiError> {
    let students = app_state
        .people_service
        .list_students(org.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(students)))
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct SearchStudentsQuery {
    // Mínimo de 2 caracteres; o debounce é preocupação do painel
    #[validate(length(min = 2, message = "query_too_short"))]
    pub q: String,

    // IDs já visíveis na lista, separados por vírgula; nunca voltam
    // como resultado adicionável
    pub exclude: Option<String>,
}

// GET /api/students/search
#[utoipa::path(
    get,
    path = "/api/students/search",
    tag = "People",
    params(
        SearchStudentsQuery,
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses(
        (status = 200, description = "Alunos encontrados", body = Vec<Student>)
    ),
    security(("api_jwt" = []))
)]
pub async fn search_students(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
    Query(query): Query<SearchStudentsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let exclude_ids: Vec<Uuid> = query
        .exclude
        .as_deref()
        .unwrap_or("")
        .split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect();

    let students = app_state
        .people_service
        .search_students(org.0, &query.q, &exclude_ids)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(students)))
}

// =============================================================================
//  PROFESSORES EXTERNOS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfessionalPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Carlos Jiménez")]
    pub full_name: String,

    #[serde(default)]
    #[schema(example = "0.00")]
    pub base_salary: Decimal,

    #[serde(default)]
    #[schema(example = "40.00")]
    pub commission_percentage: Decimal,
}

// POST /api/staff/professionals
#[utoipa::path(
    post,
    path = "/api/staff/professionals",
    tag = "People",
    request_body = CreateProfessionalPayload,
    responses(
        (status = 201, description = "Professor externo criado", body = Professional)
    ),
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_professional(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
    Json(payload): Json<CreateProfessionalPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let professional = app_state
        .people_service
        .create_professional(
            org.0,
            &payload.full_name,
            payload.base_salary,
            payload.commission_percentage,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(professional)))
}

// GET /api/staff/professionals
#[utoipa::path(
    get,
    path = "/api/staff/professionals",
    tag = "People",
    responses(
        (status = 200, description = "Professores externos", body = Vec<Professional>)
    ),
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_professionals(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
) -> Result<impl IntoResponse, ApiError> {
    let professionals = app_state
        .people_service
        .list_professionals(org.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(professionals)))
}

// GET /api/staff/profiles
#[utoipa::path(
    get,
    path = "/api/staff/profiles",
    tag = "People",
    responses(
        (status = 200, description = "Funcionários internos", body = Vec<crate::models::people::Profile>)
    ),
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_profiles(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
) -> Result<impl IntoResponse, ApiError> {
    let profiles = app_state
        .people_service
        .list_profiles(org.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(profiles)))
}

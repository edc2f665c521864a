// src/handlers/attendance.rs

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, tenancy::OrgContext},
    models::scheduling::{AttendanceStatus, ClassGroup, RosterResponse},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct AttendanceDayQuery {
    pub date: NaiveDate,
    pub branch_id: Option<Uuid>,
}

// GET /api/attendance/classes?date=2025-01-13
// Dia sem agendamentos devolve lista vazia (o "día libre" do painel);
// nenhuma consulta de alunos é feita nesse caso.
#[utoipa::path(
    get,
    path = "/api/attendance/classes",
    tag = "Attendance",
    params(
        AttendanceDayQuery,
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses(
        (status = 200, description = "Grupos de aula do dia", body = Vec<ClassGroup>)
    ),
    security(("api_jwt" = []))
)]
pub async fn day_groups(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
    Query(query): Query<AttendanceDayQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let groups = app_state
        .scheduling_service
        .attendance_day_groups(org.0, query.date, query.branch_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(groups)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RosterPayload {
    pub service_id: Uuid,

    #[validate(length(min = 1, message = "required"))]
    pub appointment_ids: Vec<Uuid>,
}

// POST /api/attendance/roster
#[utoipa::path(
    post,
    path = "/api/attendance/roster",
    tag = "Attendance",
    request_body = RosterPayload,
    responses(
        (status = 200, description = "Lista de chamada do grupo", body = RosterResponse)
    ),
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn class_roster(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
    Json(payload): Json<RosterPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let roster = app_state
        .scheduling_service
        .class_roster(org.0, payload.service_id, &payload.appointment_ids)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(roster)))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntryPayload {
    pub student_id: Uuid,
    #[schema(example = "present")]
    pub status: AttendanceStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveAttendancePayload {
    // O primeiro id é o agendamento canônico do grupo
    #[validate(length(min = 1, message = "required"))]
    pub appointment_ids: Vec<Uuid>,

    #[validate(length(min = 1, message = "required"))]
    pub entries: Vec<AttendanceEntryPayload>,
}

// POST /api/attendance
// Upsert na chave (agendamento, aluno): salvar duas vezes não duplica.
#[utoipa::path(
    post,
    path = "/api/attendance",
    tag = "Attendance",
    request_body = SaveAttendancePayload,
    responses(
        (status = 200, description = "Chamada salva", body = Vec<crate::models::scheduling::AttendanceRecord>),
        (status = 404, description = "Agendamento não encontrado")
    ),
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn save_attendance(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<SaveAttendancePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let entries: Vec<(Uuid, AttendanceStatus)> = payload
        .entries
        .iter()
        .map(|e| (e.student_id, e.status))
        .collect();

    let saved = app_state
        .scheduling_service
        .save_attendance(org.0, &payload.appointment_ids, &entries, user.id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(saved)))
}

// src/handlers/scheduling.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{i18n::Locale, tenancy::OrgContext},
    models::finance::PaymentMethod,
    models::scheduling::{
        Appointment, AppointmentDetail, AppointmentStatus, BookingResult, StaffSchedule,
    },
};

// =============================================================================
//  RESERVAS (o drawer do calendário)
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentPayload {
    pub branch_id: Uuid,
    pub service_id: Uuid,

    // Exatamente um dos dois: professor interno OU externo
    pub profile_id: Option<Uuid>,
    pub professional_id: Option<Uuid>,

    #[schema(value_type = String, example = "2025-01-13T09:00:00Z")]
    pub start_time: DateTime<Utc>,

    #[validate(length(min = 1, message = "empty_attendee_list"))]
    pub student_ids: Vec<Uuid>,

    // Usado para cobrar os alunos sem cobertura (só na criação)
    #[schema(example = "cash")]
    pub payment_method: PaymentMethod,
}

// POST /api/appointments
#[utoipa::path(
    post,
    path = "/api/appointments",
    tag = "Scheduling",
    request_body = CreateAppointmentPayload,
    responses(
        (status = 201, description = "Reserva criada e alunos sem cobertura cobrados", body = BookingResult),
        (status = 400, description = "Dados inválidos")
    ),
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_appointment(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
    Json(payload): Json<CreateAppointmentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let result = app_state
        .scheduling_service
        .create_appointment(
            org.0,
            payload.branch_id,
            payload.service_id,
            payload.profile_id,
            payload.professional_id,
            payload.start_time,
            &payload.student_ids,
            payload.payment_method,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(result)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentPayload {
    pub branch_id: Uuid,
    pub service_id: Uuid,
    pub profile_id: Option<Uuid>,
    pub professional_id: Option<Uuid>,

    #[schema(value_type = String, example = "2025-01-13T10:00:00Z")]
    pub start_time: DateTime<Utc>,

    #[validate(length(min = 1, message = "empty_attendee_list"))]
    pub student_ids: Vec<Uuid>,

    pub status: AppointmentStatus,
}

// PUT /api/appointments/{id}
// A edição regrava os participantes e NUNCA gera lançamentos.
#[utoipa::path(
    put,
    path = "/api/appointments/{id}",
    tag = "Scheduling",
    request_body = UpdateAppointmentPayload,
    responses(
        (status = 200, description = "Reserva atualizada", body = Appointment),
        (status = 404, description = "Reserva não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da reserva"),
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_appointment(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAppointmentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let appointment = app_state
        .scheduling_service
        .update_appointment(
            org.0,
            id,
            payload.branch_id,
            payload.service_id,
            payload.profile_id,
            payload.professional_id,
            payload.start_time,
            &payload.student_ids,
            payload.status,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(appointment)))
}

// DELETE /api/appointments/{id}
#[utoipa::path(
    delete,
    path = "/api/appointments/{id}",
    tag = "Scheduling",
    responses(
        (status = 204, description = "Reserva apagada (participantes e chamada em cascata)"),
        (status = 404, description = "Reserva não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da reserva"),
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_appointment(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .scheduling_service
        .delete_appointment(org.0, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CalendarDayQuery {
    pub date: NaiveDate,
    pub branch_id: Option<Uuid>,
}

// GET /api/appointments?date=2025-01-13
#[utoipa::path(
    get,
    path = "/api/appointments",
    tag = "Scheduling",
    params(
        CalendarDayQuery,
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses(
        (status = 200, description = "Reservas do dia", body = Vec<AppointmentDetail>)
    ),
    security(("api_jwt" = []))
)]
pub async fn calendar_day(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
    Query(query): Query<CalendarDayQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let appointments = app_state
        .scheduling_service
        .calendar_day(org.0, query.date, query.branch_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(appointments)))
}

// =============================================================================
//  DISPONIBILIDADE SEMANAL
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSchedulePayload {
    pub branch_id: Uuid,
    pub profile_id: Option<Uuid>,
    pub professional_id: Option<Uuid>,

    // 0 = domingo, convenção do painel
    #[validate(range(min = 0, max = 6, message = "invalid_weekday"))]
    #[schema(example = 1)]
    pub weekday: i16,

    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,

    #[schema(value_type = String, example = "17:00:00")]
    pub end_time: NaiveTime,
}

// POST /api/staff/schedules
#[utoipa::path(
    post,
    path = "/api/staff/schedules",
    tag = "Scheduling",
    request_body = CreateSchedulePayload,
    responses(
        (status = 201, description = "Janela semanal criada", body = StaffSchedule)
    ),
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_schedule(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
    Json(payload): Json<CreateSchedulePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let schedule = app_state
        .scheduling_service
        .create_schedule(
            org.0,
            payload.branch_id,
            payload.profile_id,
            payload.professional_id,
            payload.weekday,
            payload.start_time,
            payload.end_time,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(schedule)))
}

// GET /api/staff/schedules
#[utoipa::path(
    get,
    path = "/api/staff/schedules",
    tag = "Scheduling",
    responses(
        (status = 200, description = "Janelas semanais da organização", body = Vec<StaffSchedule>)
    ),
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_schedules(
    State(app_state): State<AppState>,
    locale: Locale,
    org: OrgContext,
) -> Result<impl IntoResponse, ApiError> {
    let schedules = app_state
        .scheduling_service
        .list_schedules(org.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(schedules)))
}

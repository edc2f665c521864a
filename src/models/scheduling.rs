// src/models/scheduling.rs

use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- ENUMS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "appointment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "attendance_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

// De onde o aluno entrou na lista de chamada. Não é persistido;
// calculado ao montar a lista.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RosterOrigin {
    Enrolled,
    Suggested,
    Manual,
}

// --- AGENDA ---

// Disponibilidade semanal do professor (um registro por dia/sede)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffSchedule {
    pub id: Uuid,
    #[schema(ignore)]
    pub organization_id: Uuid,
    pub branch_id: Uuid,
    pub profile_id: Option<Uuid>,
    pub professional_id: Option<Uuid>,
    #[schema(example = 1)]
    pub weekday: i16,
    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "17:00:00")]
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    #[schema(ignore)]
    pub organization_id: Uuid,
    pub branch_id: Uuid,
    pub service_id: Uuid,
    // Exatamente um dos dois está preenchido
    pub profile_id: Option<Uuid>,
    pub professional_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub is_private_class: bool,
    // Snapshot do preço do serviço no momento da reserva
    #[schema(example = "10.00")]
    pub price_at_booking: Decimal,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

// Linha do calendário: agendamento + nomes resolvidos + alunos da junção
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDetail {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub service_id: Uuid,
    pub profile_id: Option<Uuid>,
    pub professional_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub is_private_class: bool,
    pub price_at_booking: Decimal,
    pub status: AppointmentStatus,
    #[schema(example = "Salsa")]
    pub service_name: String,
    #[schema(example = "Carlos Jiménez")]
    pub teacher_name: String,
    pub attendee_ids: Vec<Uuid>,
}

// Resultado da criação da reserva: o agendamento + o resumo da cobrança
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingResult {
    pub appointment: Appointment,
    pub covered_count: usize,
    pub charged_count: usize,
    #[schema(example = "1 cubierto por membresía")]
    pub coverage_message: Option<String>,
}

// --- CHAMADA (Attendance) ---

// Linha crua do dia, insumo do agrupamento por (HH:mm, serviço)
#[derive(Debug, Clone, FromRow)]
pub struct DayAppointment {
    pub id: Uuid,
    pub start_time: DateTime<Utc>,
    pub service_id: Uuid,
    pub service_name: String,
    pub attendee_count: i64,
}

// Um "grupo de aula": agendamentos do dia com o mesmo horário e serviço
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassGroup {
    #[schema(example = "09:00")]
    pub time: String,
    pub service_id: Uuid,
    pub service_name: String,
    // Todos os agendamentos subjacentes; o primeiro é o canônico da chamada
    pub appointment_ids: Vec<Uuid>,
    pub student_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub student_id: Uuid,
    pub status: AttendanceStatus,
    pub marked_by: Option<Uuid>,
    pub recorded_at: DateTime<Utc>,
}

// Registro salvo + nome do aluno, para sobrepor à lista de candidatos
#[derive(Debug, Clone, FromRow)]
pub struct RecordedAttendee {
    pub student_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub status: AttendanceStatus,
}

// Candidato da lista (aluno inscrito ou sugerido), antes da sobreposição
#[derive(Debug, Clone, FromRow)]
pub struct RosterCandidate {
    pub student_id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

// Linha final da lista de chamada apresentada ao painel
#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub student_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub status: AttendanceStatus,
    pub origin: RosterOrigin,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RosterResponse {
    pub entries: Vec<RosterEntry>,
    // true quando não há mensalidade cobrindo o serviço: aula "aberta",
    // a lista vem dos alunos mais recentes
    pub open_class: bool,
}

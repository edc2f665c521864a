// src/models/membership.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Mapeia o CREATE TYPE membership_status do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "membership_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    Active,
    Expired,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: Uuid,
    #[schema(ignore)]
    pub organization_id: Uuid,
    pub student_id: Uuid,
    pub plan_id: Uuid,
    #[schema(value_type = String, format = Date, example = "2025-01-10")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2025-02-09")]
    pub end_date: NaiveDate,
    pub status: MembershipStatus,
    pub created_at: DateTime<Utc>,
}

// Linha crua da consulta de cobertura: uma por (mensalidade ativa x serviço
// vinculado). O filtro de data e o serviço alvo são aplicados em código.
#[derive(Debug, Clone, FromRow)]
pub struct CoverageRow {
    pub student_id: Uuid,
    pub end_date: NaiveDate,
    // Vínculo pela junção plan_services_access (NULL se o plano não tem linhas lá)
    pub linked_service_id: Option<Uuid>,
    // Fallback legado: coluna service_id do próprio plano
    pub legacy_service_id: Option<Uuid>,
}

// Resposta do check de cobertura em lote
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoverageResponse {
    pub covered_student_ids: Vec<Uuid>,
}

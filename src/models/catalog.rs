// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// ---
// Service (O tipo de aula reservável)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    #[schema(ignore)]
    pub organization_id: Uuid,
    #[schema(example = "Salsa")]
    pub name: String,
    #[schema(example = "10.00")]
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

// ---
// Plan (O produto de mensalidade)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: Uuid,
    #[schema(ignore)]
    pub organization_id: Uuid,
    #[schema(example = "Mensualidad Salsa")]
    pub name: String,
    #[schema(example = 30)]
    pub duration_days: i32,
    #[schema(example = "120.00")]
    pub price: Decimal,
    // Coluna legada: serviço único, anterior à junção plan_services_access
    pub service_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// Plano + serviços vinculados pela junção (leitura da listagem)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanWithServices {
    pub id: Uuid,
    #[schema(ignore)]
    pub organization_id: Uuid,
    pub name: String,
    pub duration_days: i32,
    pub price: Decimal,
    pub service_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    // ARRAY_AGG da junção; vazio quando o plano só tem a coluna legada
    pub linked_service_ids: Vec<Uuid>,
}

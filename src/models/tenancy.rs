// src/models/tenancy.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// ---
// 1. Organization (A raiz do tenant)
// ---
// A conta principal (Academia, Estúdio de Dança, Escola de Música)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: Uuid,
    #[schema(example = "Academia Ritmo")]
    pub name: String,
    #[schema(example = "danza")]
    pub industry: Option<String>,
    #[serde(skip_serializing)] // PIN nunca sai pela API
    #[schema(ignore)]
    pub security_pin: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ---
// 2. Branch (A "Sede")
// ---
// O local físico onde as aulas acontecem
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: Uuid,
    #[schema(ignore)]
    pub organization_id: Uuid,
    #[schema(example = "Sede Centro")]
    pub name: String,
    #[schema(example = "Av. Reforma 123")]
    pub address: Option<String>,
    #[schema(example = "America/Mexico_City")]
    pub timezone: String,
    pub created_at: DateTime<Utc>,
}

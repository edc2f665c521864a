// src/models/people.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- ENUMS ---

// Mapeia o CREATE TYPE staff_role do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "staff_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    SuperAdmin,
    Owner,
    Staff,
}

// ---
// Profile (Funcionário interno, 1:1 com o usuário de login)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    // Mesma PK do usuário de login
    pub id: Uuid,
    #[schema(ignore)]
    pub organization_id: Uuid,
    pub assigned_branch_id: Option<Uuid>,
    pub role: StaffRole,
    #[schema(example = "María Torres")]
    pub full_name: String,
    #[schema(example = "8000.00")]
    pub base_salary: Decimal,
    #[schema(example = "10.00")]
    pub commission_percentage: Decimal,
    pub created_at: DateTime<Utc>,
}

// ---
// Professional (Professor externo, sem login)
// ---
// Mesmos campos de folha do Profile; o papel é implícito
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Professional {
    pub id: Uuid,
    #[schema(ignore)]
    pub organization_id: Uuid,
    #[schema(example = "Carlos Jiménez")]
    pub full_name: String,
    #[schema(example = "0.00")]
    pub base_salary: Decimal,
    #[schema(example = "40.00")]
    pub commission_percentage: Decimal,
    pub created_at: DateTime<Utc>,
}

// ---
// Student (O Aluno)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: Uuid,
    #[schema(ignore)]
    pub organization_id: Uuid,
    pub branch_id: Option<Uuid>,
    #[schema(example = "Lucía")]
    pub first_name: String,
    #[schema(example = "Fernández")]
    pub last_name: String,
    #[schema(example = "lucia@email.com")]
    pub email: Option<String>,
    #[schema(example = "+52 55 1234 5678")]
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Linha da listagem: aluno + etiqueta de status derivada no SQL.
// Valores possíveis: "solvente" | "moroso" | "sin_pagos".
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentListEntry {
    pub id: Uuid,
    #[schema(ignore)]
    pub organization_id: Uuid,
    pub branch_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[schema(example = "solvente")]
    pub status_label: String,
}

// src/models/finance.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Mapeia o CREATE TYPE payment_method do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

// Lançamento do livro-caixa. Append-only: a API não edita nem apaga.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    #[schema(ignore)]
    pub organization_id: Uuid,
    pub branch_id: Option<Uuid>,
    pub student_id: Option<Uuid>,
    #[schema(example = "10.00")]
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    #[schema(example = "Clase Salsa 2025-01-10")]
    pub concept: String,
    pub created_at: DateTime<Utc>,
}

// Resumo do período (recalculado a cada leitura, nada é persistido)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSummary {
    #[schema(example = "2350.00")]
    pub income: Decimal,
    pub transaction_count: i64,
    // Fração de alunos "solvente" sobre o total (0..1)
    #[schema(example = "0.8")]
    pub solvency_rate: Decimal,
}

// Linha crua da folha: vendas agregadas no SQL, comissão calculada no service
#[derive(Debug, Clone, FromRow)]
pub struct PayrollRow {
    pub person_id: Uuid,
    pub full_name: String,
    // "staff" | "professional"
    pub kind: String,
    pub base_salary: Decimal,
    pub commission_percentage: Decimal,
    pub sales: Decimal,
}

// Linha final da folha apresentada ao painel
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayrollEntry {
    pub person_id: Uuid,
    #[schema(example = "Carlos Jiménez")]
    pub full_name: String,
    #[schema(example = "professional")]
    pub kind: String,
    pub base_salary: Decimal,
    pub commission_percentage: Decimal,
    // Soma de price_at_booking das aulas particulares do período
    pub sales: Decimal,
    pub commission: Decimal,
    pub total_payable: Decimal,
}

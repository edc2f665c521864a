// src/db/finance_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::finance::{PaymentMethod, PayrollRow, Transaction},
};

#[derive(Clone)]
pub struct FinanceRepository {
    pool: PgPool,
}

impl FinanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  LIVRO-CAIXA
    // =========================================================================

    pub async fn insert_transaction<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        branch_id: Option<Uuid>,
        student_id: Option<Uuid>,
        amount: Decimal,
        payment_method: PaymentMethod,
        concept: &str,
    ) -> Result<Transaction, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (
                organization_id, branch_id, student_id, amount, payment_method, concept
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING
                id, organization_id, branch_id, student_id, amount,
                payment_method, concept, created_at
            "#,
        )
        .bind(organization_id)
        .bind(branch_id)
        .bind(student_id)
        .bind(amount)
        .bind(payment_method)
        .bind(concept)
        .fetch_one(executor)
        .await?;

        Ok(transaction)
    }

    pub async fn list_transactions(
        &self,
        organization_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, AppError> {
        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT
                id, organization_id, branch_id, student_id, amount,
                payment_method, concept, created_at
            FROM transactions
            WHERE organization_id = $1
              AND created_at >= $2
              AND created_at < $3
            ORDER BY created_at DESC
            "#,
        )
        .bind(organization_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    /// Receita e quantidade de lançamentos do período.
    pub async fn income_totals(
        &self,
        organization_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<(Decimal, i64), AppError> {
        let (income, count) = sqlx::query_as::<_, (Option<Decimal>, i64)>(
            r#"
            SELECT COALESCE(SUM(amount), 0), COUNT(*)
            FROM transactions
            WHERE organization_id = $1
              AND created_at >= $2
              AND created_at < $3
            "#,
        )
        .bind(organization_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok((income.unwrap_or(Decimal::ZERO), count))
    }

    /// Contagem de alunos solventes x total (base da taxa de solvência).
    pub async fn solvency_counts(
        &self,
        organization_id: Uuid,
    ) -> Result<(i64, i64), AppError> {
        let counts = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT
                COUNT(*) FILTER (
                    WHERE EXISTS (
                        SELECT 1 FROM memberships m
                        WHERE m.student_id = s.id
                          AND m.status = 'active'
                          AND m.end_date >= CURRENT_DATE
                    )
                ),
                COUNT(*)
            FROM students s
            WHERE s.organization_id = $1
            "#,
        )
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }

    // =========================================================================
    //  FOLHA (recalculada a cada leitura)
    // =========================================================================

    /// Uma linha por pessoa (perfil interno ou professor externo) com as
    /// vendas de aulas particulares agregadas no período. A comissão é
    /// calculada no service.
    pub async fn payroll_rows(
        &self,
        organization_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PayrollRow>, AppError> {
        let rows = sqlx::query_as::<_, PayrollRow>(
            r#"
            SELECT
                p.id AS person_id, p.full_name, 'staff' AS kind,
                p.base_salary, p.commission_percentage,
                COALESCE(SUM(a.price_at_booking), 0) AS sales
            FROM profiles p
            LEFT JOIN appointments a
                   ON a.profile_id = p.id
                  AND a.is_private_class = TRUE
                  AND a.status <> 'cancelled'
                  AND a.start_time >= $2 AND a.start_time < $3
            WHERE p.organization_id = $1
            GROUP BY p.id, p.full_name, p.base_salary, p.commission_percentage

            UNION ALL

            SELECT
                pr.id AS person_id, pr.full_name, 'professional' AS kind,
                pr.base_salary, pr.commission_percentage,
                COALESCE(SUM(a.price_at_booking), 0) AS sales
            FROM professionals pr
            LEFT JOIN appointments a
                   ON a.professional_id = pr.id
                  AND a.is_private_class = TRUE
                  AND a.status <> 'cancelled'
                  AND a.start_time >= $2 AND a.start_time < $3
            WHERE pr.organization_id = $1
            GROUP BY pr.id, pr.full_name, pr.base_salary, pr.commission_percentage

            ORDER BY full_name ASC
            "#,
        )
        .bind(organization_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

// src/db/membership_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::membership::{CoverageRow, Membership},
    models::scheduling::RosterCandidate,
};

#[derive(Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insere a mensalidade. O end_date já chega calculado pelo service
    /// (start + duration_days do plano).
    pub async fn create_membership<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        student_id: Uuid,
        plan_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Membership, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO memberships (
                organization_id, student_id, plan_id, start_date, end_date
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING
                id, organization_id, student_id, plan_id,
                start_date, end_date, status, created_at
            "#,
        )
        .bind(organization_id)
        .bind(student_id)
        .bind(plan_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(executor)
        .await?;

        Ok(membership)
    }

    pub async fn list_by_student(
        &self,
        organization_id: Uuid,
        student_id: Uuid,
    ) -> Result<Vec<Membership>, AppError> {
        let memberships = sqlx::query_as::<_, Membership>(
            r#"
            SELECT
                id, organization_id, student_id, plan_id,
                start_date, end_date, status, created_at
            FROM memberships
            WHERE organization_id = $1 AND student_id = $2
            ORDER BY start_date DESC
            "#,
        )
        .bind(organization_id)
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(memberships)
    }

    /// Linhas cruas para o check de cobertura em lote: uma por
    /// (mensalidade ativa x serviço vinculado). O SQL filtra status e
    /// alunos; o corte por data e serviço alvo fica no service, em código.
    pub async fn coverage_rows(
        &self,
        organization_id: Uuid,
        student_ids: &[Uuid],
    ) -> Result<Vec<CoverageRow>, AppError> {
        let rows = sqlx::query_as::<_, CoverageRow>(
            r#"
            SELECT
                m.student_id,
                m.end_date,
                psa.service_id AS linked_service_id,
                p.service_id AS legacy_service_id
            FROM memberships m
            JOIN plans p ON p.id = m.plan_id
            LEFT JOIN plan_services_access psa ON psa.plan_id = p.id
            WHERE m.organization_id = $1
              AND m.status = 'active'
              AND m.student_id = ANY($2)
            "#,
        )
        .bind(organization_id)
        .bind(student_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Alunos "inscritos" de um serviço: mensalidade ativa vigente cujo
    /// plano cobre o serviço (junção ou coluna legada). Deduplicado no SQL.
    pub async fn enrolled_candidates(
        &self,
        organization_id: Uuid,
        service_id: Uuid,
        today: NaiveDate,
    ) -> Result<Vec<RosterCandidate>, AppError> {
        let candidates = sqlx::query_as::<_, RosterCandidate>(
            r#"
            SELECT DISTINCT st.id AS student_id, st.first_name, st.last_name
            FROM memberships m
            JOIN students st ON st.id = m.student_id
            JOIN plans p ON p.id = m.plan_id
            LEFT JOIN plan_services_access psa ON psa.plan_id = p.id
            WHERE m.organization_id = $1
              AND m.status = 'active'
              AND m.end_date >= $2
              AND (psa.service_id = $3 OR p.service_id = $3)
            ORDER BY st.first_name ASC
            "#,
        )
        .bind(organization_id)
        .bind(today)
        .bind(service_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(candidates)
    }
}

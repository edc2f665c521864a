// src/db/catalog_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::catalog::{Plan, PlanWithServices, Service},
};

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  SERVIÇOS (Tipos de aula)
    // =========================================================================

    pub async fn create_service<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        name: &str,
        price: Decimal,
    ) -> Result<Service, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let service = sqlx::query_as::<_, Service>(
            r#"
            INSERT INTO services (organization_id, name, price)
            VALUES ($1, $2, $3)
            RETURNING id, organization_id, name, price, created_at
            "#,
        )
        .bind(organization_id)
        .bind(name)
        .bind(price)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // Tratamento de erro de chave duplicada
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::UniqueConstraintViolation(format!(
                        "O serviço '{}' já existe.",
                        name
                    ));
                }
            }
            e.into()
        })?;

        Ok(service)
    }

    pub async fn find_service(
        &self,
        organization_id: Uuid,
        service_id: Uuid,
    ) -> Result<Option<Service>, AppError> {
        let service = sqlx::query_as::<_, Service>(
            r#"
            SELECT id, organization_id, name, price, created_at
            FROM services
            WHERE organization_id = $1 AND id = $2
            "#,
        )
        .bind(organization_id)
        .bind(service_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(service)
    }

    pub async fn list_services(&self, organization_id: Uuid) -> Result<Vec<Service>, AppError> {
        let services = sqlx::query_as::<_, Service>(
            r#"
            SELECT id, organization_id, name, price, created_at
            FROM services
            WHERE organization_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    // =========================================================================
    //  PLANOS (Produtos de mensalidade)
    // =========================================================================

    pub async fn create_plan<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        name: &str,
        duration_days: i32,
        price: Decimal,
    ) -> Result<Plan, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let plan = sqlx::query_as::<_, Plan>(
            r#"
            INSERT INTO plans (organization_id, name, duration_days, price)
            VALUES ($1, $2, $3, $4)
            RETURNING
                id, organization_id, name, duration_days, price,
                service_id, created_at
            "#,
        )
        .bind(organization_id)
        .bind(name)
        .bind(duration_days)
        .bind(price)
        .fetch_one(executor)
        .await?;

        Ok(plan)
    }

    /// Vincula os serviços cobertos pelo plano (junção).
    pub async fn link_plan_services<'e, E>(
        &self,
        executor: E,
        plan_id: Uuid,
        service_ids: &[Uuid],
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO plan_services_access (plan_id, service_id)
            SELECT $1, s FROM UNNEST($2::uuid[]) AS s
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(plan_id)
        .bind(service_ids)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn find_plan(
        &self,
        organization_id: Uuid,
        plan_id: Uuid,
    ) -> Result<Option<Plan>, AppError> {
        let plan = sqlx::query_as::<_, Plan>(
            r#"
            SELECT
                id, organization_id, name, duration_days, price,
                service_id, created_at
            FROM plans
            WHERE organization_id = $1 AND id = $2
            "#,
        )
        .bind(organization_id)
        .bind(plan_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(plan)
    }

    /// Listagem com os serviços vinculados agregados em array.
    pub async fn list_plans_with_services(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<PlanWithServices>, AppError> {
        let plans = sqlx::query_as::<_, PlanWithServices>(
            r#"
            SELECT
                p.id, p.organization_id, p.name, p.duration_days, p.price,
                p.service_id, p.created_at,
                COALESCE(
                    ARRAY_AGG(psa.service_id) FILTER (WHERE psa.service_id IS NOT NULL),
                    '{}'
                ) AS linked_service_ids
            FROM plans p
            LEFT JOIN plan_services_access psa ON psa.plan_id = p.id
            WHERE p.organization_id = $1
            GROUP BY p.id
            ORDER BY p.name ASC
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(plans)
    }
}

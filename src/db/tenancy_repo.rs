// src/db/tenancy_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::tenancy::{Branch, Organization},
};

#[derive(Clone)]
pub struct TenancyRepository {
    pool: PgPool,
}

impl TenancyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Cria a organização (raiz do tenant). Aceita um executor (pool ou transação).
    pub async fn create_organization<'e, E>(
        &self,
        executor: E,
        name: &str,
        industry: Option<&str>,
        security_pin: Option<&str>,
    ) -> Result<Organization, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let organization = sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (name, industry, security_pin)
            VALUES ($1, $2, $3)
            RETURNING id, name, industry, security_pin, created_at
            "#,
        )
        .bind(name)
        .bind(industry)
        .bind(security_pin)
        .fetch_one(executor)
        .await?;

        Ok(organization)
    }

    pub async fn find_organization(&self, id: Uuid) -> Result<Option<Organization>, AppError> {
        let organization = sqlx::query_as::<_, Organization>(
            "SELECT id, name, industry, security_pin, created_at FROM organizations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(organization)
    }

    /// Cria uma sede dentro da organização.
    pub async fn create_branch<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        name: &str,
        address: Option<&str>,
        timezone: Option<&str>,
    ) -> Result<Branch, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let branch = sqlx::query_as::<_, Branch>(
            r#"
            INSERT INTO branches (organization_id, name, address, timezone)
            VALUES ($1, $2, $3, COALESCE($4, 'America/Mexico_City'))
            RETURNING id, organization_id, name, address, timezone, created_at
            "#,
        )
        .bind(organization_id)
        .bind(name)
        .bind(address)
        .bind(timezone)
        .fetch_one(executor)
        .await?;

        Ok(branch)
    }

    pub async fn list_branches(&self, organization_id: Uuid) -> Result<Vec<Branch>, AppError> {
        let branches = sqlx::query_as::<_, Branch>(
            r#"
            SELECT id, organization_id, name, address, timezone, created_at
            FROM branches
            WHERE organization_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(branches)
    }
}

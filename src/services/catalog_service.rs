// src/services/catalog_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CatalogRepository,
    models::catalog::{Plan, PlanWithServices, Service},
};

#[derive(Clone)]
pub struct CatalogService {
    repo: CatalogRepository,
    pool: PgPool,
}

impl CatalogService {
    pub fn new(repo: CatalogRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn create_service(
        &self,
        organization_id: Uuid,
        name: &str,
        price: Decimal,
    ) -> Result<Service, AppError> {
        self.repo
            .create_service(&self.pool, organization_id, name, price)
            .await
    }

    pub async fn list_services(&self, organization_id: Uuid) -> Result<Vec<Service>, AppError> {
        self.repo.list_services(organization_id).await
    }

    /// Cria o plano e os vínculos da junção na mesma transação.
    pub async fn create_plan(
        &self,
        organization_id: Uuid,
        name: &str,
        duration_days: i32,
        price: Decimal,
        service_ids: &[Uuid],
    ) -> Result<Plan, AppError> {
        let mut tx = self.pool.begin().await?;

        let plan = self
            .repo
            .create_plan(&mut *tx, organization_id, name, duration_days, price)
            .await?;

        if !service_ids.is_empty() {
            self.repo
                .link_plan_services(&mut *tx, plan.id, service_ids)
                .await?;
        }

        tx.commit().await?;

        Ok(plan)
    }

    pub async fn list_plans(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<PlanWithServices>, AppError> {
        self.repo.list_plans_with_services(organization_id).await
    }
}

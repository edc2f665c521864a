// src/services/tenancy_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::TenancyRepository,
    models::tenancy::{Branch, Organization},
};

#[derive(Clone)]
pub struct TenancyService {
    repo: TenancyRepository,
    pool: PgPool,
}

impl TenancyService {
    pub fn new(repo: TenancyRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn create_branch(
        &self,
        organization_id: Uuid,
        name: &str,
        address: Option<&str>,
        timezone: Option<&str>,
    ) -> Result<Branch, AppError> {
        self.repo
            .create_branch(&self.pool, organization_id, name, address, timezone)
            .await
    }

    pub async fn list_branches(&self, organization_id: Uuid) -> Result<Vec<Branch>, AppError> {
        self.repo.list_branches(organization_id).await
    }

    pub async fn current_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Organization, AppError> {
        self.repo
            .find_organization(organization_id)
            .await?
            .ok_or(AppError::OrganizationNotFound)
    }
}

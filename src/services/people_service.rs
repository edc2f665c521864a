// src/services/people_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::PeopleRepository,
    models::people::{Professional, Profile, Student, StudentListEntry},
};

#[derive(Clone)]
pub struct PeopleService {
    repo: PeopleRepository,
    pool: PgPool,
}

impl PeopleService {
    pub fn new(repo: PeopleRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list_profiles(&self, organization_id: Uuid) -> Result<Vec<Profile>, AppError> {
        self.repo.list_profiles(organization_id).await
    }

    pub async fn create_professional(
        &self,
        organization_id: Uuid,
        full_name: &str,
        base_salary: Decimal,
        commission_percentage: Decimal,
    ) -> Result<Professional, AppError> {
        self.repo
            .create_professional(
                &self.pool,
                organization_id,
                full_name,
                base_salary,
                commission_percentage,
            )
            .await
    }

    pub async fn list_professionals(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<Professional>, AppError> {
        self.repo.list_professionals(organization_id).await
    }

    pub async fn create_student(
        &self,
        organization_id: Uuid,
        branch_id: Option<Uuid>,
        first_name: &str,
        last_name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Student, AppError> {
        self.repo
            .create_student(
                &self.pool,
                organization_id,
                branch_id,
                first_name,
                last_name,
                email,
                phone,
                notes,
            )
            .await
    }

    pub async fn list_students(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<StudentListEntry>, AppError> {
        self.repo.list_students_with_status(organization_id).await
    }

    /// Busca ao vivo. O mínimo de 2 caracteres já foi validado no handler;
    /// os ids excluídos vêm da lista visível no painel.
    pub async fn search_students(
        &self,
        organization_id: Uuid,
        query: &str,
        exclude_ids: &[Uuid],
    ) -> Result<Vec<Student>, AppError> {
        self.repo
            .search_students(organization_id, query, exclude_ids)
            .await
    }
}

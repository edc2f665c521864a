// src/db/people_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::people::{Professional, Profile, StaffRole, Student, StudentListEntry},
    models::scheduling::RosterCandidate,
};

#[derive(Clone)]
pub struct PeopleRepository {
    pool: PgPool,
}

impl PeopleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  PERFIS (Funcionários com login)
    // =========================================================================

    /// Cria o perfil 1:1 com o usuário de login (mesma PK).
    pub async fn create_profile<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        organization_id: Uuid,
        assigned_branch_id: Option<Uuid>,
        role: StaffRole,
        full_name: &str,
        base_salary: Decimal,
        commission_percentage: Decimal,
    ) -> Result<Profile, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (
                id, organization_id, assigned_branch_id, role,
                full_name, base_salary, commission_percentage
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING
                id, organization_id, assigned_branch_id, role,
                full_name, base_salary, commission_percentage, created_at
            "#,
        )
        .bind(user_id)
        .bind(organization_id)
        .bind(assigned_branch_id)
        .bind(role)
        .bind(full_name)
        .bind(base_salary)
        .bind(commission_percentage)
        .fetch_one(executor)
        .await?;

        Ok(profile)
    }

    pub async fn find_profile_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, AppError> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT
                id, organization_id, assigned_branch_id, role,
                full_name, base_salary, commission_percentage, created_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn list_profiles(&self, organization_id: Uuid) -> Result<Vec<Profile>, AppError> {
        let profiles = sqlx::query_as::<_, Profile>(
            r#"
            SELECT
                id, organization_id, assigned_branch_id, role,
                full_name, base_salary, commission_percentage, created_at
            FROM profiles
            WHERE organization_id = $1
            ORDER BY full_name ASC
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(profiles)
    }

    // =========================================================================
    //  PROFESSORES EXTERNOS
    // =========================================================================

    pub async fn create_professional<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        full_name: &str,
        base_salary: Decimal,
        commission_percentage: Decimal,
    ) -> Result<Professional, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let professional = sqlx::query_as::<_, Professional>(
            r#"
            INSERT INTO professionals (
                organization_id, full_name, base_salary, commission_percentage
            )
            VALUES ($1, $2, $3, $4)
            RETURNING
                id, organization_id, full_name, base_salary,
                commission_percentage, created_at
            "#,
        )
        .bind(organization_id)
        .bind(full_name)
        .bind(base_salary)
        .bind(commission_percentage)
        .fetch_one(executor)
        .await?;

        Ok(professional)
    }

    pub async fn list_professionals(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<Professional>, AppError> {
        let professionals = sqlx::query_as::<_, Professional>(
            r#"
            SELECT
                id, organization_id, full_name, base_salary,
                commission_percentage, created_at
            FROM professionals
            WHERE organization_id = $1
            ORDER BY full_name ASC
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(professionals)
    }

    // =========================================================================
    //  ALUNOS
    // =========================================================================

    pub async fn create_student<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        branch_id: Option<Uuid>,
        first_name: &str,
        last_name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Student, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let student = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (
                organization_id, branch_id, first_name, last_name, email, phone, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING
                id, organization_id, branch_id, first_name, last_name,
                email, phone, notes, created_at
            "#,
        )
        .bind(organization_id)
        .bind(branch_id)
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(phone)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(student)
    }

    pub async fn find_student(
        &self,
        organization_id: Uuid,
        student_id: Uuid,
    ) -> Result<Option<Student>, AppError> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            SELECT
                id, organization_id, branch_id, first_name, last_name,
                email, phone, notes, created_at
            FROM students
            WHERE organization_id = $1 AND id = $2
            "#,
        )
        .bind(organization_id)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    /// Listagem com a etiqueta derivada no SQL (a antiga "view" de status):
    /// mensalidade ativa vigente -> solvente; alguma mensalidade -> moroso;
    /// nada -> sin_pagos.
    pub async fn list_students_with_status(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<StudentListEntry>, AppError> {
        let students = sqlx::query_as::<_, StudentListEntry>(
            r#"
            SELECT
                s.id, s.organization_id, s.branch_id, s.first_name, s.last_name,
                s.email, s.phone, s.notes, s.created_at,
                CASE
                    WHEN EXISTS (
                        SELECT 1 FROM memberships m
                        WHERE m.student_id = s.id
                          AND m.status = 'active'
                          AND m.end_date >= CURRENT_DATE
                    ) THEN 'solvente'
                    WHEN EXISTS (
                        SELECT 1 FROM memberships m WHERE m.student_id = s.id
                    ) THEN 'moroso'
                    ELSE 'sin_pagos'
                END AS status_label
            FROM students s
            WHERE s.organization_id = $1
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }

    /// Busca ao vivo da chamada: mínimo de 2 caracteres (validado no handler),
    /// exclui os ids já visíveis na lista para não repetir.
    pub async fn search_students(
        &self,
        organization_id: Uuid,
        query: &str,
        exclude_ids: &[Uuid],
    ) -> Result<Vec<Student>, AppError> {
        let search_term = format!("%{}%", query);

        let students = sqlx::query_as::<_, Student>(
            r#"
            SELECT
                id, organization_id, branch_id, first_name, last_name,
                email, phone, notes, created_at
            FROM students
            WHERE organization_id = $1
              AND (first_name ILIKE $2 OR last_name ILIKE $2)
              AND NOT (id = ANY($3))
            ORDER BY first_name ASC
            LIMIT 10
            "#,
        )
        .bind(organization_id)
        .bind(search_term)
        .bind(exclude_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }

    /// Fallback da aula "aberta": os 10 alunos mais recentes do tenant.
    pub async fn recent_students(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<RosterCandidate>, AppError> {
        let candidates = sqlx::query_as::<_, RosterCandidate>(
            r#"
            SELECT id AS student_id, first_name, last_name
            FROM students
            WHERE organization_id = $1
            ORDER BY created_at DESC
            LIMIT 10
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(candidates)
    }
}

// src/services/membership_service.rs

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, FinanceRepository, MembershipRepository, PeopleRepository},
    models::finance::PaymentMethod,
    models::membership::{CoverageRow, Membership},
};

#[derive(Clone)]
pub struct MembershipService {
    repo: MembershipRepository,
    catalog_repo: CatalogRepository,
    people_repo: PeopleRepository,
    finance_repo: FinanceRepository,
    pool: PgPool,
}

impl MembershipService {
    pub fn new(
        repo: MembershipRepository,
        catalog_repo: CatalogRepository,
        people_repo: PeopleRepository,
        finance_repo: FinanceRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            repo,
            catalog_repo,
            people_repo,
            finance_repo,
            pool,
        }
    }

    /// Ativa a mensalidade do aluno. Ponto único usado tanto pelo wizard de
    /// inscrição (sem cobrança) quanto pela venda de plano do financeiro
    /// (com cobrança na mesma transação).
    pub async fn enroll(
        &self,
        organization_id: Uuid,
        student_id: Uuid,
        plan_id: Uuid,
        start_date: NaiveDate,
        charge: Option<PaymentMethod>,
    ) -> Result<Membership, AppError> {
        let student = self
            .people_repo
            .find_student(organization_id, student_id)
            .await?
            .ok_or(AppError::StudentNotFound)?;

        let plan = self
            .catalog_repo
            .find_plan(organization_id, plan_id)
            .await?
            .ok_or(AppError::PlanNotFound)?;

        let end_date = membership_end_date(start_date, plan.duration_days);

        let mut tx = self.pool.begin().await?;

        let membership = self
            .repo
            .create_membership(
                &mut *tx,
                organization_id,
                student_id,
                plan_id,
                start_date,
                end_date,
            )
            .await?;

        // Venda de plano: o lançamento entra junto, ou nada entra.
        if let Some(payment_method) = charge {
            let concept = format!("Venta plan {}", plan.name);
            self.finance_repo
                .insert_transaction(
                    &mut *tx,
                    organization_id,
                    student.branch_id,
                    Some(student_id),
                    plan.price,
                    payment_method,
                    &concept,
                )
                .await?;
        }

        tx.commit().await?;

        Ok(membership)
    }

    pub async fn list_by_student(
        &self,
        organization_id: Uuid,
        student_id: Uuid,
    ) -> Result<Vec<Membership>, AppError> {
        self.repo.list_by_student(organization_id, student_id).await
    }

    /// Check de cobertura em lote: quais dos alunos selecionados têm
    /// mensalidade ativa vigente cobrindo o serviço.
    pub async fn covered_for_service(
        &self,
        organization_id: Uuid,
        student_ids: &[Uuid],
        service_id: Uuid,
    ) -> Result<Vec<Uuid>, AppError> {
        let rows = self.repo.coverage_rows(organization_id, student_ids).await?;
        let today = Utc::now().date_naive();

        Ok(covered_students(&rows, service_id, today))
    }
}

/// end_date = start_date + duration_days do plano.
pub fn membership_end_date(start_date: NaiveDate, duration_days: i32) -> NaiveDate {
    start_date + chrono::Duration::days(duration_days as i64)
}

/// Aplica o predicado de cobertura sobre as linhas cruas: a mensalidade
/// precisa estar vigente (end_date >= hoje) e o plano precisa vincular o
/// serviço, pela junção ou pela coluna legada. Resultado deduplicado.
pub fn covered_students(
    rows: &[CoverageRow],
    service_id: Uuid,
    today: NaiveDate,
) -> Vec<Uuid> {
    let mut covered: Vec<Uuid> = rows
        .iter()
        .filter(|row| row.end_date >= today)
        .filter(|row| {
            row.linked_service_id == Some(service_id)
                || row.legacy_service_id == Some(service_id)
        })
        .map(|row| row.student_id)
        .collect();

    covered.sort();
    covered.dedup();
    covered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        student_id: Uuid,
        end_date: &str,
        linked: Option<Uuid>,
        legacy: Option<Uuid>,
    ) -> CoverageRow {
        CoverageRow {
            student_id,
            end_date: end_date.parse().unwrap(),
            linked_service_id: linked,
            legacy_service_id: legacy,
        }
    }

    #[test]
    fn covers_via_junction_link() {
        let student = Uuid::new_v4();
        let salsa = Uuid::new_v4();
        let today = "2025-01-10".parse().unwrap();

        let rows = vec![row(student, "2025-02-01", Some(salsa), None)];

        assert_eq!(covered_students(&rows, salsa, today), vec![student]);
    }

    #[test]
    fn covers_via_legacy_service_column() {
        let student = Uuid::new_v4();
        let salsa = Uuid::new_v4();
        let today = "2025-01-10".parse().unwrap();

        let rows = vec![row(student, "2025-02-01", None, Some(salsa))];

        assert_eq!(covered_students(&rows, salsa, today), vec![student]);
    }

    #[test]
    fn expired_membership_does_not_cover() {
        let student = Uuid::new_v4();
        let salsa = Uuid::new_v4();
        let today = "2025-01-10".parse().unwrap();

        let rows = vec![row(student, "2025-01-09", Some(salsa), None)];

        assert!(covered_students(&rows, salsa, today).is_empty());
    }

    #[test]
    fn membership_expiring_today_still_covers() {
        let student = Uuid::new_v4();
        let salsa = Uuid::new_v4();
        let today = "2025-01-10".parse().unwrap();

        let rows = vec![row(student, "2025-01-10", Some(salsa), None)];

        assert_eq!(covered_students(&rows, salsa, today), vec![student]);
    }

    #[test]
    fn other_service_does_not_cover() {
        let student = Uuid::new_v4();
        let salsa = Uuid::new_v4();
        let bachata = Uuid::new_v4();
        let today = "2025-01-10".parse().unwrap();

        let rows = vec![row(student, "2025-02-01", Some(bachata), None)];

        assert!(covered_students(&rows, salsa, today).is_empty());
    }

    #[test]
    fn duplicate_rows_collapse_to_one_student() {
        let student = Uuid::new_v4();
        let salsa = Uuid::new_v4();
        let today = "2025-01-10".parse().unwrap();

        // Duas mensalidades vigentes cobrindo o mesmo serviço
        let rows = vec![
            row(student, "2025-02-01", Some(salsa), None),
            row(student, "2025-03-01", None, Some(salsa)),
        ];

        assert_eq!(covered_students(&rows, salsa, today), vec![student]);
    }

    #[test]
    fn end_date_adds_plan_duration() {
        let start: NaiveDate = "2025-01-10".parse().unwrap();
        assert_eq!(
            membership_end_date(start, 30),
            "2025-02-09".parse::<NaiveDate>().unwrap()
        );
    }
}

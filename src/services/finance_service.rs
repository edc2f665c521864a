// src/services/finance_service.rs

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::FinanceRepository,
    models::finance::{FinanceSummary, PaymentMethod, PayrollEntry, PayrollRow, Transaction},
};

#[derive(Clone)]
pub struct FinanceService {
    repo: FinanceRepository,
    pool: PgPool,
}

impl FinanceService {
    pub fn new(repo: FinanceRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn record_transaction(
        &self,
        organization_id: Uuid,
        branch_id: Option<Uuid>,
        student_id: Option<Uuid>,
        amount: Decimal,
        payment_method: PaymentMethod,
        concept: &str,
    ) -> Result<Transaction, AppError> {
        self.repo
            .insert_transaction(
                &self.pool,
                organization_id,
                branch_id,
                student_id,
                amount,
                payment_method,
                concept,
            )
            .await
    }

    pub async fn list_transactions(
        &self,
        organization_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, AppError> {
        self.repo.list_transactions(organization_id, from, to).await
    }

    /// Resumo do período: receita e taxa de solvência, recalculados das
    /// linhas cruas a cada leitura. Nada é persistido.
    pub async fn summary(
        &self,
        organization_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<FinanceSummary, AppError> {
        let (income, transaction_count) =
            self.repo.income_totals(organization_id, from, to).await?;
        let (solvente, total) = self.repo.solvency_counts(organization_id).await?;

        Ok(FinanceSummary {
            income,
            transaction_count,
            solvency_rate: solvency_rate(solvente, total),
        })
    }

    /// Folha do mês: vendas agregadas no SQL, comissão e total a pagar
    /// calculados aqui. Editar uma aula passada muda a folha retroativamente;
    /// não existe fechamento persistido.
    pub async fn payroll(
        &self,
        organization_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<Vec<PayrollEntry>, AppError> {
        let (from, to) = month_bounds(year, month)
            .ok_or_else(|| anyhow::anyhow!("Período inválido: {}-{}", year, month))?;

        let rows = self.repo.payroll_rows(organization_id, from, to).await?;

        Ok(rows.into_iter().map(payroll_line).collect())
    }
}

/// [início, fim) do mês em UTC. None para mês fora de 1..=12.
pub fn month_bounds(year: i32, month: u32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };

    Some((
        Utc.from_utc_datetime(&start.and_hms_opt(0, 0, 0)?),
        Utc.from_utc_datetime(&end.and_hms_opt(0, 0, 0)?),
    ))
}

/// comissão = vendas * percentual / 100; total = salário base + comissão.
pub fn payroll_line(row: PayrollRow) -> PayrollEntry {
    let commission =
        (row.sales * row.commission_percentage / Decimal::from(100)).round_dp(2);
    let total_payable = row.base_salary + commission;

    PayrollEntry {
        person_id: row.person_id,
        full_name: row.full_name,
        kind: row.kind,
        base_salary: row.base_salary,
        commission_percentage: row.commission_percentage,
        sales: row.sales,
        commission,
        total_payable,
    }
}

/// Fração de alunos solventes sobre o total (0 quando não há alunos).
pub fn solvency_rate(solvente: i64, total: i64) -> Decimal {
    if total <= 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(solvente) / Decimal::from(total)).round_dp(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn row(base: &str, pct: &str, sales: &str) -> PayrollRow {
        PayrollRow {
            person_id: Uuid::new_v4(),
            full_name: "Carlos Jiménez".to_string(),
            kind: "professional".to_string(),
            base_salary: dec(base),
            commission_percentage: dec(pct),
            sales: dec(sales),
        }
    }

    #[test]
    fn commission_is_sales_times_rate() {
        let entry = payroll_line(row("8000.00", "10.00", "1500.00"));
        assert_eq!(entry.commission, dec("150.00"));
        assert_eq!(entry.total_payable, dec("8150.00"));
    }

    #[test]
    fn zero_sales_pays_base_salary_only() {
        let entry = payroll_line(row("8000.00", "40.00", "0"));
        assert_eq!(entry.commission, Decimal::ZERO);
        assert_eq!(entry.total_payable, dec("8000.00"));
    }

    #[test]
    fn commission_rounds_to_cents() {
        // 33.33% de 100.00 = 33.33
        let entry = payroll_line(row("0", "33.33", "100.00"));
        assert_eq!(entry.commission, dec("33.33"));
    }

    #[test]
    fn solvency_rate_handles_empty_roster() {
        assert_eq!(solvency_rate(0, 0), Decimal::ZERO);
    }

    #[test]
    fn solvency_rate_is_fraction_of_students() {
        assert_eq!(solvency_rate(4, 5), dec("0.8"));
    }

    #[test]
    fn month_bounds_cover_the_whole_month() {
        let (from, to) = month_bounds(2025, 1).unwrap();
        assert_eq!(from.to_rfc3339(), "2025-01-01T00:00:00+00:00");
        assert_eq!(to.to_rfc3339(), "2025-02-01T00:00:00+00:00");
    }

    #[test]
    fn month_bounds_roll_over_december() {
        let (_, to) = month_bounds(2024, 12).unwrap();
        assert_eq!(to.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn month_bounds_reject_invalid_month() {
        assert!(month_bounds(2025, 13).is_none());
        assert!(month_bounds(2025, 0).is_none());
    }
}

// src/db/scheduling_repo.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::scheduling::{
        Appointment, AppointmentDetail, AppointmentStatus, AttendanceRecord, AttendanceStatus,
        DayAppointment, RecordedAttendee, StaffSchedule,
    },
};

#[derive(Clone)]
pub struct SchedulingRepository {
    pool: PgPool,
}

impl SchedulingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  AGENDAMENTOS
    // =========================================================================

    pub async fn insert_appointment<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        branch_id: Uuid,
        service_id: Uuid,
        profile_id: Option<Uuid>,
        professional_id: Option<Uuid>,
        start_time: DateTime<Utc>,
        is_private_class: bool,
        price_at_booking: Decimal,
    ) -> Result<Appointment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments (
                organization_id, branch_id, service_id, profile_id, professional_id,
                start_time, is_private_class, price_at_booking
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING
                id, organization_id, branch_id, service_id, profile_id,
                professional_id, start_time, is_private_class,
                price_at_booking, status, created_at
            "#,
        )
        .bind(organization_id)
        .bind(branch_id)
        .bind(service_id)
        .bind(profile_id)
        .bind(professional_id)
        .bind(start_time)
        .bind(is_private_class)
        .bind(price_at_booking)
        .fetch_one(executor)
        .await?;

        Ok(appointment)
    }

    /// Atualiza a edição da reserva. O price_at_booking é snapshot da
    /// criação e não é tocado aqui.
    pub async fn update_appointment<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        appointment_id: Uuid,
        branch_id: Uuid,
        service_id: Uuid,
        profile_id: Option<Uuid>,
        professional_id: Option<Uuid>,
        start_time: DateTime<Utc>,
        is_private_class: bool,
        status: AppointmentStatus,
    ) -> Result<Appointment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE appointments
            SET branch_id = $3, service_id = $4, profile_id = $5,
                professional_id = $6, start_time = $7, is_private_class = $8,
                status = $9
            WHERE organization_id = $1 AND id = $2
            RETURNING
                id, organization_id, branch_id, service_id, profile_id,
                professional_id, start_time, is_private_class,
                price_at_booking, status, created_at
            "#,
        )
        .bind(organization_id)
        .bind(appointment_id)
        .bind(branch_id)
        .bind(service_id)
        .bind(profile_id)
        .bind(professional_id)
        .bind(start_time)
        .bind(is_private_class)
        .bind(status)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::AppointmentNotFound)?;

        Ok(appointment)
    }

    pub async fn find_appointment(
        &self,
        organization_id: Uuid,
        appointment_id: Uuid,
    ) -> Result<Option<Appointment>, AppError> {
        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT
                id, organization_id, branch_id, service_id, profile_id,
                professional_id, start_time, is_private_class,
                price_at_booking, status, created_at
            FROM appointments
            WHERE organization_id = $1 AND id = $2
            "#,
        )
        .bind(organization_id)
        .bind(appointment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(appointment)
    }

    /// Apaga a reserva; participantes e chamada caem em cascata (FK).
    pub async fn delete_appointment<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        appointment_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "DELETE FROM appointments WHERE organization_id = $1 AND id = $2",
        )
        .bind(organization_id)
        .bind(appointment_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    /// Linhas do calendário do dia, com nomes resolvidos e alunos agregados.
    pub async fn list_day_details(
        &self,
        organization_id: Uuid,
        date: NaiveDate,
        branch_id: Option<Uuid>,
    ) -> Result<Vec<AppointmentDetail>, AppError> {
        let details = sqlx::query_as::<_, AppointmentDetail>(
            r#"
            SELECT
                a.id, a.branch_id, a.service_id, a.profile_id, a.professional_id,
                a.start_time, a.is_private_class, a.price_at_booking, a.status,
                s.name AS service_name,
                COALESCE(p.full_name, pr.full_name, '') AS teacher_name,
                COALESCE(
                    ARRAY_AGG(aa.student_id) FILTER (WHERE aa.student_id IS NOT NULL),
                    '{}'
                ) AS attendee_ids
            FROM appointments a
            JOIN services s ON s.id = a.service_id
            LEFT JOIN profiles p ON p.id = a.profile_id
            LEFT JOIN professionals pr ON pr.id = a.professional_id
            LEFT JOIN appointment_attendees aa ON aa.appointment_id = a.id
            WHERE a.organization_id = $1
              AND a.start_time::date = $2
              AND ($3::uuid IS NULL OR a.branch_id = $3)
            GROUP BY a.id, s.name, p.full_name, pr.full_name
            ORDER BY a.start_time ASC
            "#,
        )
        .bind(organization_id)
        .bind(date)
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(details)
    }

    /// Insumo do agrupamento da chamada: agendamentos do dia com a contagem
    /// de alunos vinda da junção. A ordem define o agendamento canônico de
    /// cada grupo (o primeiro).
    pub async fn day_appointments(
        &self,
        organization_id: Uuid,
        date: NaiveDate,
        branch_id: Option<Uuid>,
    ) -> Result<Vec<DayAppointment>, AppError> {
        let rows = sqlx::query_as::<_, DayAppointment>(
            r#"
            SELECT
                a.id, a.start_time, a.service_id,
                s.name AS service_name,
                COUNT(aa.student_id) AS attendee_count
            FROM appointments a
            JOIN services s ON s.id = a.service_id
            LEFT JOIN appointment_attendees aa ON aa.appointment_id = a.id
            WHERE a.organization_id = $1
              AND a.start_time::date = $2
              AND a.status <> 'cancelled'
              AND ($3::uuid IS NULL OR a.branch_id = $3)
            GROUP BY a.id, s.name
            ORDER BY a.start_time ASC, a.created_at ASC
            "#,
        )
        .bind(organization_id)
        .bind(date)
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // =========================================================================
    //  PARTICIPANTES (junção appointment_attendees)
    // =========================================================================

    pub async fn delete_attendees<'e, E>(
        &self,
        executor: E,
        appointment_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM appointment_attendees WHERE appointment_id = $1")
            .bind(appointment_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn insert_attendees<'e, E>(
        &self,
        executor: E,
        appointment_id: Uuid,
        student_ids: &[Uuid],
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO appointment_attendees (appointment_id, student_id)
            SELECT $1, s FROM UNNEST($2::uuid[]) AS s
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(appointment_id)
        .bind(student_ids)
        .execute(executor)
        .await?;

        Ok(())
    }

    // =========================================================================
    //  DISPONIBILIDADE SEMANAL
    // =========================================================================

    pub async fn create_schedule<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        branch_id: Uuid,
        profile_id: Option<Uuid>,
        professional_id: Option<Uuid>,
        weekday: i16,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<StaffSchedule, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let schedule = sqlx::query_as::<_, StaffSchedule>(
            r#"
            INSERT INTO staff_schedules (
                organization_id, branch_id, profile_id, professional_id,
                weekday, start_time, end_time
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING
                id, organization_id, branch_id, profile_id, professional_id,
                weekday, start_time, end_time
            "#,
        )
        .bind(organization_id)
        .bind(branch_id)
        .bind(profile_id)
        .bind(professional_id)
        .bind(weekday)
        .bind(start_time)
        .bind(end_time)
        .fetch_one(executor)
        .await?;

        Ok(schedule)
    }

    pub async fn list_schedules(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<StaffSchedule>, AppError> {
        let schedules = sqlx::query_as::<_, StaffSchedule>(
            r#"
            SELECT
                id, organization_id, branch_id, profile_id, professional_id,
                weekday, start_time, end_time
            FROM staff_schedules
            WHERE organization_id = $1
            ORDER BY weekday ASC, start_time ASC
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(schedules)
    }

    /// Janela do professor interno para o dia da semana na sede.
    /// Ausência de linha significa "sem agenda" (vira aula particular).
    pub async fn find_profile_schedule(
        &self,
        organization_id: Uuid,
        branch_id: Uuid,
        profile_id: Uuid,
        weekday: i16,
    ) -> Result<Option<StaffSchedule>, AppError> {
        let schedule = sqlx::query_as::<_, StaffSchedule>(
            r#"
            SELECT
                id, organization_id, branch_id, profile_id, professional_id,
                weekday, start_time, end_time
            FROM staff_schedules
            WHERE organization_id = $1
              AND branch_id = $2
              AND profile_id = $3
              AND weekday = $4
            LIMIT 1
            "#,
        )
        .bind(organization_id)
        .bind(branch_id)
        .bind(profile_id)
        .bind(weekday)
        .fetch_optional(&self.pool)
        .await?;

        Ok(schedule)
    }

    // =========================================================================
    //  CHAMADA (attendance_records)
    // =========================================================================

    /// Upsert na chave (appointment_id, student_id): salvar a mesma lista
    /// duas vezes não duplica registros.
    pub async fn upsert_attendance<'e, E>(
        &self,
        executor: E,
        appointment_id: Uuid,
        student_id: Uuid,
        status: AttendanceStatus,
        marked_by: Option<Uuid>,
    ) -> Result<AttendanceRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            INSERT INTO attendance_records (appointment_id, student_id, status, marked_by)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (appointment_id, student_id)
            DO UPDATE SET
                status = EXCLUDED.status,
                marked_by = EXCLUDED.marked_by,
                recorded_at = NOW()
            RETURNING id, appointment_id, student_id, status, marked_by, recorded_at
            "#,
        )
        .bind(appointment_id)
        .bind(student_id)
        .bind(status)
        .bind(marked_by)
        .fetch_one(executor)
        .await?;

        Ok(record)
    }

    /// Registros já salvos para os agendamentos do grupo, com o nome do
    /// aluno. Um aluno pode aparecer em mais de um agendamento legado do
    /// mesmo grupo; fica o registro mais recente.
    pub async fn records_for_appointments(
        &self,
        appointment_ids: &[Uuid],
    ) -> Result<Vec<RecordedAttendee>, AppError> {
        let records = sqlx::query_as::<_, RecordedAttendee>(
            r#"
            SELECT DISTINCT ON (ar.student_id)
                ar.student_id, st.first_name, st.last_name, ar.status
            FROM attendance_records ar
            JOIN students st ON st.id = ar.student_id
            WHERE ar.appointment_id = ANY($1)
            ORDER BY ar.student_id, ar.recorded_at DESC
            "#,
        )
        .bind(appointment_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}

// src/services/scheduling_service.rs

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, FinanceRepository, MembershipRepository, PeopleRepository, SchedulingRepository},
    models::finance::PaymentMethod,
    models::scheduling::{
        Appointment, AppointmentDetail, AppointmentStatus, AttendanceRecord, AttendanceStatus,
        BookingResult, ClassGroup, DayAppointment, RecordedAttendee, RosterCandidate, RosterEntry,
        RosterOrigin, RosterResponse, StaffSchedule,
    },
    services::membership_service::covered_students,
};

// O professor da reserva: interno (perfil) ou externo (professional)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeacherRef {
    Profile(Uuid),
    Professional(Uuid),
}

#[derive(Clone)]
pub struct SchedulingService {
    repo: SchedulingRepository,
    membership_repo: MembershipRepository,
    people_repo: PeopleRepository,
    catalog_repo: CatalogRepository,
    finance_repo: FinanceRepository,
    pool: PgPool,
}

impl SchedulingService {
    pub fn new(
        repo: SchedulingRepository,
        membership_repo: MembershipRepository,
        people_repo: PeopleRepository,
        catalog_repo: CatalogRepository,
        finance_repo: FinanceRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            repo,
            membership_repo,
            people_repo,
            catalog_repo,
            finance_repo,
            pool,
        }
    }

    // =========================================================================
    //  RESERVA (criação cobra; edição nunca)
    // =========================================================================

    /// Cria a reserva: agendamento + participantes + um lançamento por aluno
    /// sem cobertura, tudo na mesma transação.
    pub async fn create_appointment(
        &self,
        organization_id: Uuid,
        branch_id: Uuid,
        service_id: Uuid,
        profile_id: Option<Uuid>,
        professional_id: Option<Uuid>,
        start_time: DateTime<Utc>,
        student_ids: &[Uuid],
        payment_method: PaymentMethod,
    ) -> Result<BookingResult, AppError> {
        if student_ids.is_empty() {
            return Err(AppError::EmptyAttendeeList);
        }
        let teacher = resolve_teacher(profile_id, professional_id)?;

        let service = self
            .catalog_repo
            .find_service(organization_id, service_id)
            .await?
            .ok_or(AppError::ServiceNotFound)?;

        let is_private = self
            .detect_private_class(organization_id, branch_id, teacher, start_time)
            .await?;

        // Check de cobertura em lote, antes de qualquer escrita
        let coverage_rows = self
            .membership_repo
            .coverage_rows(organization_id, student_ids)
            .await?;
        let covered = covered_students(&coverage_rows, service_id, Utc::now().date_naive());

        let mut tx = self.pool.begin().await?;

        let appointment = self
            .repo
            .insert_appointment(
                &mut *tx,
                organization_id,
                branch_id,
                service_id,
                profile_id,
                professional_id,
                start_time,
                is_private,
                service.price,
            )
            .await?;

        self.repo
            .insert_attendees(&mut *tx, appointment.id, student_ids)
            .await?;

        // Cobrança só na criação: um lançamento por aluno NÃO coberto
        let concept = format!("Clase {} {}", service.name, start_time.date_naive());
        let mut charged_count = 0usize;
        for student_id in student_ids {
            if covered.contains(student_id) {
                continue;
            }
            self.finance_repo
                .insert_transaction(
                    &mut *tx,
                    organization_id,
                    Some(branch_id),
                    Some(*student_id),
                    service.price,
                    payment_method,
                    &concept,
                )
                .await?;
            charged_count += 1;
        }

        tx.commit().await?;

        // `covered` já é o subconjunto dos alunos selecionados
        let covered_count = covered.len();

        tracing::info!(
            "📅 Clase {} creada: {} alumnos, {} cobrados",
            service.name,
            student_ids.len(),
            charged_count
        );

        Ok(BookingResult {
            appointment,
            covered_count,
            charged_count,
            coverage_message: (covered_count > 0).then(|| coverage_message(covered_count)),
        })
    }

    /// Edita a reserva: atualiza o agendamento e regrava os participantes.
    /// Nunca gera lançamentos, independentemente de mudanças de alunos ou
    /// de cobertura.
    pub async fn update_appointment(
        &self,
        organization_id: Uuid,
        appointment_id: Uuid,
        branch_id: Uuid,
        service_id: Uuid,
        profile_id: Option<Uuid>,
        professional_id: Option<Uuid>,
        start_time: DateTime<Utc>,
        student_ids: &[Uuid],
        status: AppointmentStatus,
    ) -> Result<Appointment, AppError> {
        if student_ids.is_empty() {
            return Err(AppError::EmptyAttendeeList);
        }
        let teacher = resolve_teacher(profile_id, professional_id)?;

        self.catalog_repo
            .find_service(organization_id, service_id)
            .await?
            .ok_or(AppError::ServiceNotFound)?;

        let is_private = self
            .detect_private_class(organization_id, branch_id, teacher, start_time)
            .await?;

        let mut tx = self.pool.begin().await?;

        let appointment = self
            .repo
            .update_appointment(
                &mut *tx,
                organization_id,
                appointment_id,
                branch_id,
                service_id,
                profile_id,
                professional_id,
                start_time,
                is_private,
                status,
            )
            .await?;

        self.repo.delete_attendees(&mut *tx, appointment_id).await?;
        self.repo
            .insert_attendees(&mut *tx, appointment_id, student_ids)
            .await?;

        tx.commit().await?;

        Ok(appointment)
    }

    pub async fn delete_appointment(
        &self,
        organization_id: Uuid,
        appointment_id: Uuid,
    ) -> Result<(), AppError> {
        let deleted = self
            .repo
            .delete_appointment(&self.pool, organization_id, appointment_id)
            .await?;

        if deleted == 0 {
            return Err(AppError::AppointmentNotFound);
        }

        Ok(())
    }

    pub async fn calendar_day(
        &self,
        organization_id: Uuid,
        date: NaiveDate,
        branch_id: Option<Uuid>,
    ) -> Result<Vec<AppointmentDetail>, AppError> {
        self.repo
            .list_day_details(organization_id, date, branch_id)
            .await
    }

    /// Heurística da aula particular: sem linha de agenda para o dia, ou
    /// horário fora da janela, vira particular. Professores externos nunca
    /// são particulares. Não é verificação de conflito de agenda.
    async fn detect_private_class(
        &self,
        organization_id: Uuid,
        branch_id: Uuid,
        teacher: TeacherRef,
        start_time: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let profile_id = match teacher {
            TeacherRef::Professional(_) => return Ok(false),
            TeacherRef::Profile(id) => id,
        };

        // 0 = domingo, convenção do painel
        let weekday = start_time.weekday().num_days_from_sunday() as i16;

        let window = self
            .repo
            .find_profile_schedule(organization_id, branch_id, profile_id, weekday)
            .await?
            .map(|s| (s.start_time, s.end_time));

        Ok(is_private_slot(window, start_time.time()))
    }

    // =========================================================================
    //  CHAMADA
    // =========================================================================

    /// Grupos do dia: agendamentos com o mesmo (HH:mm, serviço) colapsam em
    /// um grupo só. Dia sem agendamentos devolve lista vazia e nenhuma
    /// consulta de alunos é feita.
    pub async fn attendance_day_groups(
        &self,
        organization_id: Uuid,
        date: NaiveDate,
        branch_id: Option<Uuid>,
    ) -> Result<Vec<ClassGroup>, AppError> {
        let rows = self
            .repo
            .day_appointments(organization_id, date, branch_id)
            .await?;

        Ok(group_classes(&rows))
    }

    /// Lista de chamada do grupo selecionado: inscritos por mensalidade, ou
    /// os 10 alunos mais recentes quando ninguém cobre o serviço (aula
    /// "aberta"), com os registros já salvos sobrepostos.
    pub async fn class_roster(
        &self,
        organization_id: Uuid,
        service_id: Uuid,
        appointment_ids: &[Uuid],
    ) -> Result<RosterResponse, AppError> {
        let today = Utc::now().date_naive();

        let enrolled = self
            .membership_repo
            .enrolled_candidates(organization_id, service_id, today)
            .await?;

        let open_class = enrolled.is_empty();
        let suggested = if open_class {
            self.people_repo.recent_students(organization_id).await?
        } else {
            Vec::new()
        };

        let records = self.repo.records_for_appointments(appointment_ids).await?;

        Ok(RosterResponse {
            entries: build_roster(&enrolled, &suggested, &records),
            open_class,
        })
    }

    /// Salva a chamada: upsert de cada linha na chave
    /// (agendamento canônico, aluno). O canônico é o primeiro id do grupo.
    pub async fn save_attendance(
        &self,
        organization_id: Uuid,
        appointment_ids: &[Uuid],
        entries: &[(Uuid, AttendanceStatus)],
        marked_by: Uuid,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        let canonical = *appointment_ids
            .first()
            .ok_or(AppError::AppointmentNotFound)?;

        // Confere que o agendamento pertence ao tenant antes de gravar
        self.repo
            .find_appointment(organization_id, canonical)
            .await?
            .ok_or(AppError::AppointmentNotFound)?;

        let mut tx = self.pool.begin().await?;

        let mut saved = Vec::with_capacity(entries.len());
        for (student_id, status) in entries {
            let record = self
                .repo
                .upsert_attendance(&mut *tx, canonical, *student_id, *status, Some(marked_by))
                .await?;
            saved.push(record);
        }

        tx.commit().await?;

        Ok(saved)
    }

    // =========================================================================
    //  DISPONIBILIDADE SEMANAL
    // =========================================================================

    pub async fn create_schedule(
        &self,
        organization_id: Uuid,
        branch_id: Uuid,
        profile_id: Option<Uuid>,
        professional_id: Option<Uuid>,
        weekday: i16,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<StaffSchedule, AppError> {
        resolve_teacher(profile_id, professional_id)?;

        self.repo
            .create_schedule(
                &self.pool,
                organization_id,
                branch_id,
                profile_id,
                professional_id,
                weekday,
                start_time,
                end_time,
            )
            .await
    }

    pub async fn list_schedules(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<StaffSchedule>, AppError> {
        self.repo.list_schedules(organization_id).await
    }
}

// =============================================================================
//  REGRAS PURAS
// =============================================================================

/// A reserva exige exatamente um professor: perfil interno OU externo.
pub fn resolve_teacher(
    profile_id: Option<Uuid>,
    professional_id: Option<Uuid>,
) -> Result<TeacherRef, AppError> {
    match (profile_id, professional_id) {
        (Some(id), None) => Ok(TeacherRef::Profile(id)),
        (None, Some(id)) => Ok(TeacherRef::Professional(id)),
        _ => Err(AppError::TeacherSelectionInvalid),
    }
}

/// Sem janela para o dia -> particular. Com janela, particular sse
/// `T < start OR T >= end`.
pub fn is_private_slot(window: Option<(NaiveTime, NaiveTime)>, time: NaiveTime) -> bool {
    match window {
        None => true,
        Some((start, end)) => time < start || time >= end,
    }
}

/// Agrupa os agendamentos do dia por (HH:mm, serviço), preservando a ordem
/// cronológica. student_count soma os participantes da junção.
pub fn group_classes(rows: &[DayAppointment]) -> Vec<ClassGroup> {
    let mut groups: Vec<ClassGroup> = Vec::new();
    let mut index: HashMap<(String, Uuid), usize> = HashMap::new();

    for row in rows {
        let time = row.start_time.format("%H:%M").to_string();
        let key = (time.clone(), row.service_id);

        match index.get(&key) {
            Some(&i) => {
                groups[i].appointment_ids.push(row.id);
                groups[i].student_count += row.attendee_count;
            }
            None => {
                index.insert(key, groups.len());
                groups.push(ClassGroup {
                    time,
                    service_id: row.service_id,
                    service_name: row.service_name.clone(),
                    appointment_ids: vec![row.id],
                    student_count: row.attendee_count,
                });
            }
        }
    }

    groups
}

fn origin_rank(origin: RosterOrigin) -> u8 {
    match origin {
        RosterOrigin::Enrolled => 0,
        RosterOrigin::Suggested | RosterOrigin::Manual => 1,
    }
}

/// Monta a lista final: candidatos (inscritos, ou sugeridos na aula aberta)
/// com status inicial ausente, registros salvos sobrepostos (aluno gravado
/// que não estava na lista entra como "manual"), e ordenação: presentes
/// primeiro, inscritos antes de sugeridos/manuais, depois o primeiro nome.
pub fn build_roster(
    enrolled: &[RosterCandidate],
    suggested: &[RosterCandidate],
    records: &[RecordedAttendee],
) -> Vec<RosterEntry> {
    let (base, origin) = if enrolled.is_empty() {
        (suggested, RosterOrigin::Suggested)
    } else {
        (enrolled, RosterOrigin::Enrolled)
    };

    let mut entries: Vec<RosterEntry> = Vec::new();

    for candidate in base {
        if entries.iter().any(|e| e.student_id == candidate.student_id) {
            continue;
        }
        entries.push(RosterEntry {
            student_id: candidate.student_id,
            first_name: candidate.first_name.clone(),
            last_name: candidate.last_name.clone(),
            status: AttendanceStatus::Absent,
            origin,
        });
    }

    for record in records {
        match entries.iter_mut().find(|e| e.student_id == record.student_id) {
            Some(entry) => entry.status = record.status,
            None => entries.push(RosterEntry {
                student_id: record.student_id,
                first_name: record.first_name.clone(),
                last_name: record.last_name.clone(),
                status: record.status,
                origin: RosterOrigin::Manual,
            }),
        }
    }

    entries.sort_by(|a, b| {
        let present_a = (a.status != AttendanceStatus::Present) as u8;
        let present_b = (b.status != AttendanceStatus::Present) as u8;
        present_a
            .cmp(&present_b)
            .then_with(|| origin_rank(a.origin).cmp(&origin_rank(b.origin)))
            .then_with(|| a.first_name.to_lowercase().cmp(&b.first_name.to_lowercase()))
    });

    entries
}

fn coverage_message(covered: usize) -> String {
    if covered == 1 {
        "1 cubierto por membresía".to_string()
    } else {
        format!("{} cubiertos por membresía", covered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(hms: &str) -> NaiveTime {
        hms.parse().unwrap()
    }

    fn day_row(id: Uuid, start: &str, service_id: Uuid, name: &str, count: i64) -> DayAppointment {
        DayAppointment {
            id,
            start_time: start.parse().unwrap(),
            service_id,
            service_name: name.to_string(),
            attendee_count: count,
        }
    }

    fn candidate(id: Uuid, first: &str, last: &str) -> RosterCandidate {
        RosterCandidate {
            student_id: id,
            first_name: first.to_string(),
            last_name: last.to_string(),
        }
    }

    fn record(id: Uuid, first: &str, status: AttendanceStatus) -> RecordedAttendee {
        RecordedAttendee {
            student_id: id,
            first_name: first.to_string(),
            last_name: "X".to_string(),
            status,
        }
    }

    // --- professor ---

    #[test]
    fn teacher_must_be_exactly_one() {
        let id = Uuid::new_v4();
        assert!(resolve_teacher(Some(id), None).is_ok());
        assert!(resolve_teacher(None, Some(id)).is_ok());
        assert!(resolve_teacher(None, None).is_err());
        assert!(resolve_teacher(Some(id), Some(id)).is_err());
    }

    // --- aula particular ---

    #[test]
    fn no_schedule_row_means_private() {
        assert!(is_private_slot(None, t("10:00:00")));
    }

    #[test]
    fn inside_window_is_not_private() {
        let window = Some((t("09:00:00"), t("17:00:00")));
        assert!(!is_private_slot(window, t("10:00:00")));
    }

    #[test]
    fn outside_window_is_private() {
        let window = Some((t("09:00:00"), t("17:00:00")));
        assert!(is_private_slot(window, t("18:00:00")));
        assert!(is_private_slot(window, t("08:59:00")));
    }

    #[test]
    fn window_bounds_are_half_open() {
        let window = Some((t("09:00:00"), t("17:00:00")));
        // início incluso, fim excluso
        assert!(!is_private_slot(window, t("09:00:00")));
        assert!(is_private_slot(window, t("17:00:00")));
    }

    // --- agrupamento ---

    #[test]
    fn same_time_and_service_collapse_into_one_group() {
        let salsa = Uuid::new_v4();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let rows = vec![
            day_row(a, "2025-01-13T09:00:00Z", salsa, "Salsa", 2),
            day_row(b, "2025-01-13T09:00:00Z", salsa, "Salsa", 1),
        ];

        let groups = group_classes(&rows);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].appointment_ids, vec![a, b]);
        assert_eq!(groups[0].student_count, 3);
        assert_eq!(groups[0].time, "09:00");
    }

    #[test]
    fn different_service_at_same_time_stays_separate() {
        let salsa = Uuid::new_v4();
        let bachata = Uuid::new_v4();

        let rows = vec![
            day_row(Uuid::new_v4(), "2025-01-13T09:00:00Z", salsa, "Salsa", 1),
            day_row(Uuid::new_v4(), "2025-01-13T09:00:00Z", bachata, "Bachata", 1),
        ];

        assert_eq!(group_classes(&rows).len(), 2);
    }

    #[test]
    fn empty_day_produces_no_groups() {
        assert!(group_classes(&[]).is_empty());
    }

    // --- lista de chamada ---

    #[test]
    fn records_overlay_candidate_status() {
        let ana = Uuid::new_v4();
        let bea = Uuid::new_v4();

        let enrolled = vec![candidate(ana, "Ana", "López"), candidate(bea, "Bea", "Ruiz")];
        let records = vec![record(ana, "Ana", AttendanceStatus::Present)];

        let roster = build_roster(&enrolled, &[], &records);

        assert_eq!(roster.len(), 2);
        // Ana presente sobe para o topo
        assert_eq!(roster[0].student_id, ana);
        assert_eq!(roster[0].status, AttendanceStatus::Present);
        assert_eq!(roster[0].origin, RosterOrigin::Enrolled);
        assert_eq!(roster[1].status, AttendanceStatus::Absent);
    }

    #[test]
    fn recorded_walk_in_enters_as_manual() {
        let ana = Uuid::new_v4();
        let walkin = Uuid::new_v4();

        let enrolled = vec![candidate(ana, "Ana", "López")];
        let records = vec![record(walkin, "Zoe", AttendanceStatus::Present)];

        let roster = build_roster(&enrolled, &[], &records);

        assert_eq!(roster.len(), 2);
        let zoe = roster.iter().find(|e| e.student_id == walkin).unwrap();
        assert_eq!(zoe.origin, RosterOrigin::Manual);
        assert_eq!(zoe.status, AttendanceStatus::Present);
    }

    #[test]
    fn suggested_fallback_used_when_nobody_is_enrolled() {
        let x = Uuid::new_v4();
        let suggested = vec![candidate(x, "Caro", "Núñez")];

        let roster = build_roster(&[], &suggested, &[]);

        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].origin, RosterOrigin::Suggested);
        assert_eq!(roster[0].status, AttendanceStatus::Absent);
    }

    #[test]
    fn sort_present_then_enrolled_then_name() {
        let ana = Uuid::new_v4();
        let bea = Uuid::new_v4();
        let zoe = Uuid::new_v4();

        let enrolled = vec![candidate(bea, "Bea", "Ruiz"), candidate(ana, "Ana", "López")];
        // Zoe é walk-in presente; Bea também presente
        let records = vec![
            record(zoe, "Zoe", AttendanceStatus::Present),
            record(bea, "Bea", AttendanceStatus::Present),
        ];

        let roster = build_roster(&enrolled, &[], &records);

        // Presentes primeiro; entre presentes, inscrita (Bea) antes da
        // manual (Zoe); ausente (Ana) por último
        let order: Vec<Uuid> = roster.iter().map(|e| e.student_id).collect();
        assert_eq!(order, vec![bea, zoe, ana]);
    }

    #[test]
    fn duplicated_candidates_are_deduplicated() {
        let ana = Uuid::new_v4();
        let enrolled = vec![candidate(ana, "Ana", "López"), candidate(ana, "Ana", "López")];

        assert_eq!(build_roster(&enrolled, &[], &[]).len(), 1);
    }

    // --- mensagem de cobertura ---

    #[test]
    fn coverage_message_matches_panel_wording() {
        assert_eq!(coverage_message(1), "1 cubierto por membresía");
        assert_eq!(coverage_message(2), "2 cubiertos por membresía");
    }
}

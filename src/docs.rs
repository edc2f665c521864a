// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::auth::invite_user,

        // --- Tenancy ---
        handlers::tenancy::get_current_organization,
        handlers::tenancy::create_branch,
        handlers::tenancy::list_branches,

        // --- People ---
        handlers::people::create_student,
        handlers::people::list_students,
        handlers::people::search_students,
        handlers::people::create_professional,
        handlers::people::list_professionals,
        handlers::people::list_profiles,

        // --- Catalog ---
        handlers::catalog::create_service,
        handlers::catalog::list_services,
        handlers::catalog::create_plan,
        handlers::catalog::list_plans,

        // --- Memberships ---
        handlers::memberships::enroll,
        handlers::memberships::list_by_student,
        handlers::memberships::coverage,

        // --- Scheduling ---
        handlers::scheduling::create_appointment,
        handlers::scheduling::update_appointment,
        handlers::scheduling::delete_appointment,
        handlers::scheduling::calendar_day,
        handlers::scheduling::create_schedule,
        handlers::scheduling::list_schedules,

        // --- Attendance ---
        handlers::attendance::day_groups,
        handlers::attendance::class_roster,
        handlers::attendance::save_attendance,

        // --- Finance ---
        handlers::finance::create_transaction,
        handlers::finance::list_transactions,
        handlers::finance::sell_plan,
        handlers::finance::summary,
        handlers::finance::payroll,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterPayload,
            models::auth::LoginPayload,
            models::auth::AuthResponse,
            handlers::auth::InviteUserPayload,
            handlers::auth::InviteResponse,

            // --- Tenancy ---
            models::tenancy::Organization,
            models::tenancy::Branch,
            handlers::tenancy::CreateBranchPayload,

            // --- People ---
            models::people::StaffRole,
            models::people::Profile,
            models::people::Professional,
            models::people::Student,
            models::people::StudentListEntry,
            handlers::people::CreateStudentPayload,
            handlers::people::CreateProfessionalPayload,

            // --- Catalog ---
            models::catalog::Service,
            models::catalog::Plan,
            models::catalog::PlanWithServices,
            handlers::catalog::CreateServicePayload,
            handlers::catalog::CreatePlanPayload,

            // --- Memberships ---
            models::membership::MembershipStatus,
            models::membership::Membership,
            models::membership::CoverageResponse,
            handlers::memberships::EnrollPayload,
            handlers::memberships::CoveragePayload,

            // --- Scheduling ---
            models::scheduling::AppointmentStatus,
            models::scheduling::AttendanceStatus,
            models::scheduling::RosterOrigin,
            models::scheduling::StaffSchedule,
            models::scheduling::Appointment,
            models::scheduling::AppointmentDetail,
            models::scheduling::BookingResult,
            models::scheduling::ClassGroup,
            models::scheduling::AttendanceRecord,
            models::scheduling::RosterEntry,
            models::scheduling::RosterResponse,
            handlers::scheduling::CreateAppointmentPayload,
            handlers::scheduling::UpdateAppointmentPayload,
            handlers::scheduling::CreateSchedulePayload,
            handlers::attendance::RosterPayload,
            handlers::attendance::AttendanceEntryPayload,
            handlers::attendance::SaveAttendancePayload,

            // --- Finance ---
            models::finance::PaymentMethod,
            models::finance::Transaction,
            models::finance::FinanceSummary,
            models::finance::PayrollEntry,
            handlers::finance::CreateTransactionPayload,
            handlers::finance::SellPlanPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Perfil da sessão e convites"),
        (name = "Tenancy", description = "Organização e Sedes"),
        (name = "People", description = "Alunos, Funcionários e Professores Externos"),
        (name = "Catalog", description = "Serviços e Planos de Mensalidade"),
        (name = "Memberships", description = "Inscrições e Cobertura"),
        (name = "Scheduling", description = "Reservas e Disponibilidade"),
        (name = "Attendance", description = "Chamada por Grupo de Aula"),
        (name = "Finance", description = "Livro-caixa, Resumo e Folha")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

//src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::{auth_guard, org_guard};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas de usuário: /me só precisa do token; /invite exige a organização
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ))
        .merge(
            Router::new()
                .route("/invite", post(handlers::auth::invite_user))
                .layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    org_guard,
                )),
        );

    let organization_routes = Router::new()
        .route("/current", get(handlers::tenancy::get_current_organization))
        .route(
            "/branches",
            post(handlers::tenancy::create_branch).get(handlers::tenancy::list_branches),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            org_guard,
        ));

    let student_routes = Router::new()
        .route(
            "/",
            post(handlers::people::create_student).get(handlers::people::list_students),
        )
        .route("/search", get(handlers::people::search_students))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            org_guard,
        ));

    let staff_routes = Router::new()
        .route(
            "/professionals",
            post(handlers::people::create_professional).get(handlers::people::list_professionals),
        )
        .route("/profiles", get(handlers::people::list_profiles))
        .route(
            "/schedules",
            post(handlers::scheduling::create_schedule).get(handlers::scheduling::list_schedules),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            org_guard,
        ));

    let catalog_routes = Router::new()
        .route(
            "/services",
            post(handlers::catalog::create_service).get(handlers::catalog::list_services),
        )
        .route(
            "/plans",
            post(handlers::catalog::create_plan).get(handlers::catalog::list_plans),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            org_guard,
        ));

    let membership_routes = Router::new()
        .route("/", post(handlers::memberships::enroll))
        .route(
            "/student/{student_id}",
            get(handlers::memberships::list_by_student),
        )
        .route("/coverage", post(handlers::memberships::coverage))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            org_guard,
        ));

    let appointment_routes = Router::new()
        .route(
            "/",
            post(handlers::scheduling::create_appointment).get(handlers::scheduling::calendar_day),
        )
        .route(
            "/{id}",
            put(handlers::scheduling::update_appointment)
                .delete(handlers::scheduling::delete_appointment),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            org_guard,
        ));

    let attendance_routes = Router::new()
        .route("/", post(handlers::attendance::save_attendance))
        .route("/classes", get(handlers::attendance::day_groups))
        .route("/roster", post(handlers::attendance::class_roster))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            org_guard,
        ));

    let finance_routes = Router::new()
        .route(
            "/transactions",
            post(handlers::finance::create_transaction).get(handlers::finance::list_transactions),
        )
        .route("/sell-plan", post(handlers::finance::sell_plan))
        .route("/summary", get(handlers::finance::summary))
        .route("/payroll", get(handlers::finance::payroll))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            org_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/organizations", organization_routes)
        .nest("/api/students", student_routes)
        .nest("/api/staff", staff_routes)
        .nest("/api/catalog", catalog_routes)
        .nest("/api/memberships", membership_routes)
        .nest("/api/appointments", appointment_routes)
        .nest("/api/attendance", attendance_routes)
        .nest("/api/finance", finance_routes)
        .merge(
            SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
        )
        // O painel web chama de qualquer origem
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}

// src/config.rs

use std::sync::Arc;
use std::{env, time::Duration};

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    common::i18n::I18nStore,
    db::{
        CatalogRepository, FinanceRepository, MembershipRepository, PeopleRepository,
        SchedulingRepository, TenancyRepository, UserRepository,
    },
    services::{
        auth::AuthService, catalog_service::CatalogService, finance_service::FinanceService,
        membership_service::MembershipService, people_service::PeopleService,
        scheduling_service::SchedulingService, tenancy_service::TenancyService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub i18n_store: Arc<I18nStore>,
    pub auth_service: AuthService,
    pub tenancy_service: TenancyService,
    pub people_service: PeopleService,
    pub catalog_service: CatalogService,
    pub membership_service: MembershipService,
    pub scheduling_service: SchedulingService,
    pub finance_service: FinanceService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let tenancy_repo = TenancyRepository::new(db_pool.clone());
        let people_repo = PeopleRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let membership_repo = MembershipRepository::new(db_pool.clone());
        let scheduling_repo = SchedulingRepository::new(db_pool.clone());
        let finance_repo = FinanceRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            people_repo.clone(),
            tenancy_repo.clone(),
            jwt_secret.clone(),
            db_pool.clone(),
        );
        let tenancy_service = TenancyService::new(tenancy_repo.clone(), db_pool.clone());
        let people_service = PeopleService::new(people_repo.clone(), db_pool.clone());
        let catalog_service = CatalogService::new(catalog_repo.clone(), db_pool.clone());
        let membership_service = MembershipService::new(
            membership_repo.clone(),
            catalog_repo.clone(),
            people_repo.clone(),
            finance_repo.clone(),
            db_pool.clone(),
        );
        let scheduling_service = SchedulingService::new(
            scheduling_repo,
            membership_repo,
            people_repo,
            catalog_repo,
            finance_repo.clone(),
            db_pool.clone(),
        );
        let finance_service = FinanceService::new(finance_repo, db_pool.clone());

        Ok(Self {
            db_pool,
            jwt_secret,
            i18n_store: Arc::new(I18nStore::new()),
            auth_service,
            tenancy_service,
            people_service,
            catalog_service,
            membership_service,
            scheduling_service,
            finance_service,
        })
    }
}

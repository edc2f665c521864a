// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::{Rng, distributions::Alphanumeric};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{PeopleRepository, TenancyRepository, UserRepository},
    models::{
        auth::{Claims, User},
        people::{Profile, StaffRole},
    },
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    people_repo: PeopleRepository,
    tenancy_repo: TenancyRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        people_repo: PeopleRepository,
        tenancy_repo: TenancyRepository,
        jwt_secret: String,
        pool: PgPool,
    ) -> Self {
        Self {
            user_repo,
            people_repo,
            tenancy_repo,
            jwt_secret,
            pool,
        }
    }

    /// Registro de bootstrap: cria o usuário, a organização, a sede
    /// "Principal" e o perfil de dono, tudo na mesma transação.
    pub async fn register_owner(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        organization_name: &str,
        industry: Option<&str>,
        security_pin: Option<&str>,
    ) -> Result<String, AppError> {
        // Hashing fora da transação, pois não toca no banco
        let password_clone = password.to_owned();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let mut tx = self.pool.begin().await?;

        let new_user = self
            .user_repo
            .create_user(&mut *tx, email, &hashed_password)
            .await?;

        let organization = self
            .tenancy_repo
            .create_organization(&mut *tx, organization_name, industry, security_pin)
            .await?;

        let branch = self
            .tenancy_repo
            .create_branch(&mut *tx, organization.id, "Principal", None, None)
            .await?;

        self.people_repo
            .create_profile(
                &mut *tx,
                new_user.id,
                organization.id,
                Some(branch.id),
                StaffRole::Owner,
                full_name,
                Decimal::ZERO,
                Decimal::ZERO,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            "🏢 Organização '{}' criada com o dono {}",
            organization.name,
            email
        );

        self.create_token(new_user.id)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(user.id)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    /// O "resolvedor de sessão": do id autenticado para o perfil
    /// (papel + organização + sede atribuída).
    pub async fn resolve_profile(&self, user_id: Uuid) -> Result<Profile, AppError> {
        self.people_repo
            .find_profile_by_user(user_id)
            .await?
            .ok_or(AppError::ProfileNotFound)
    }

    /// Autorização de tenancy: o perfil precisa pertencer à organização
    /// do cabeçalho. super_admin transita entre organizações.
    pub async fn authorize_org(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Profile, AppError> {
        let profile = self.resolve_profile(user_id).await?;

        if profile.role != StaffRole::SuperAdmin && profile.organization_id != organization_id {
            return Err(AppError::OrganizationAccessDenied);
        }

        Ok(profile)
    }

    /// O antigo endpoint "invite-user": cria o usuário de login com senha
    /// provisória e o perfil com os metadados {organização, papel, nome}.
    /// A senha provisória volta na resposta e é mostrada uma única vez.
    pub async fn invite_user(
        &self,
        organization_id: Uuid,
        email: &str,
        role: StaffRole,
        full_name: &str,
    ) -> Result<(User, Profile, String), AppError> {
        let provisional: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(16)
            .map(char::from)
            .collect();

        let provisional_clone = provisional.clone();
        let hashed =
            tokio::task::spawn_blocking(move || hash(&provisional_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let mut tx = self.pool.begin().await?;

        let user = self.user_repo.create_user(&mut *tx, email, &hashed).await?;

        let profile = self
            .people_repo
            .create_profile(
                &mut *tx,
                user.id,
                organization_id,
                None,
                role,
                full_name,
                Decimal::ZERO,
                Decimal::ZERO,
            )
            .await?;

        tx.commit().await?;

        tracing::info!("✉️ Convite emitido para {} ({:?})", email, role);

        Ok((user, profile, provisional))
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    #[schema(example = "dueno@academia.com")]
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados para registro: cria o usuário, a organização e o perfil de dono
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "dueno@academia.com")]
    pub email: String,

    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "María Torres")]
    pub full_name: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Academia Ritmo")]
    pub organization_name: String,

    #[schema(example = "danza")]
    pub industry: Option<String>,

    // PIN de segurança da organização (ações sensíveis no painel)
    pub security_pin: Option<String>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "dueno@academia.com")]
    pub email: String,

    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

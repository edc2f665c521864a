// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Nosso tipo de erro interno, com `thiserror` para melhor ergonomia.
// Os handlers convertem para ApiError (a cara HTTP) via `to_api_error`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Perfil não encontrado")]
    ProfileNotFound,

    #[error("Aluno não encontrado")]
    StudentNotFound,

    #[error("Serviço não encontrado")]
    ServiceNotFound,

    #[error("Plano não encontrado")]
    PlanNotFound,

    #[error("Agendamento não encontrado")]
    AppointmentNotFound,

    #[error("Organização não encontrada")]
    OrganizationNotFound,

    #[error("Sem acesso a esta organização")]
    OrganizationAccessDenied,

    #[error("Papel insuficiente para esta operação")]
    InsufficientRole,

    // A reserva exige exatamente um professor: profile OU professional
    #[error("Seleção de professor inválida")]
    TeacherSelectionInvalid,

    // Reserva sem nenhum aluno selecionado
    #[error("Nenhum aluno selecionado")]
    EmptyAttendeeList,

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    // Código estável usado como chave de tradução
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation_error",
            AppError::EmailAlreadyExists => "email_already_exists",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::InvalidToken => "invalid_token",
            AppError::UserNotFound => "user_not_found",
            AppError::ProfileNotFound => "profile_not_found",
            AppError::StudentNotFound => "student_not_found",
            AppError::ServiceNotFound => "service_not_found",
            AppError::PlanNotFound => "plan_not_found",
            AppError::AppointmentNotFound => "appointment_not_found",
            AppError::OrganizationNotFound => "organization_not_found",
            AppError::OrganizationAccessDenied => "organization_access_denied",
            AppError::InsufficientRole => "insufficient_role",
            AppError::TeacherSelectionInvalid => "teacher_selection_invalid",
            AppError::EmptyAttendeeList => "empty_attendee_list",
            AppError::UniqueConstraintViolation(_) => "unique_violation",
            _ => "internal_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::TeacherSelectionInvalid
            | AppError::EmptyAttendeeList => StatusCode::BAD_REQUEST,
            AppError::EmailAlreadyExists | AppError::UniqueConstraintViolation(_) => {
                StatusCode::CONFLICT
            }
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::OrganizationAccessDenied | AppError::InsufficientRole => {
                StatusCode::FORBIDDEN
            }
            AppError::UserNotFound
            | AppError::ProfileNotFound
            | AppError::StudentNotFound
            | AppError::ServiceNotFound
            | AppError::PlanNotFound
            | AppError::AppointmentNotFound
            | AppError::OrganizationNotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Converte para a resposta HTTP, já traduzida para o idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status_code();

        // Erros inesperados: loga o detalhe e devolve mensagem genérica.
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let details = match self {
            // Retornar todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut map = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<Value> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| Value::String(m.to_string())))
                        .collect();
                    map.insert(field.to_string(), Value::Array(messages));
                }
                Some(Value::Object(map))
            }
            AppError::UniqueConstraintViolation(detail) => {
                Some(json!({ "detail": detail }))
            }
            _ => None,
        };

        ApiError {
            status,
            message: store.message(&locale.0, self.code()),
            details,
        }
    }
}

// A cara HTTP do erro: status + mensagem traduzida + detalhes opcionais.
// Também é o tipo de rejeição dos extratores.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.message, "details": details }),
            None => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

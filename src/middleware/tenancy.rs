// src/middleware/tenancy.rs

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use uuid::Uuid;

use crate::common::error::ApiError; // Usamos o nosso ApiError para rejeição

// O nome do nosso cabeçalho HTTP customizado
const ORGANIZATION_ID_HEADER: &str = "x-organization-id";

// O extrator do tenant: armazena o UUID da organização que o
// utilizador quer aceder. A verificação de que o perfil pertence a
// esta organização acontece no org_guard (middleware/auth.rs).
#[derive(Debug, Clone, Copy)]
pub struct OrgContext(pub Uuid);

impl<S> FromRequestParts<S> for OrgContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts.headers.get(ORGANIZATION_ID_HEADER);

        match header_value {
            Some(value) => {
                let value_str = value.to_str().map_err(|_| ApiError {
                    status: StatusCode::BAD_REQUEST,
                    message: "El encabezado X-Organization-Id contiene caracteres inválidos."
                        .to_string(),
                    details: None,
                })?;

                let organization_id = Uuid::parse_str(value_str).map_err(|_| ApiError {
                    status: StatusCode::BAD_REQUEST,
                    message: "El encabezado X-Organization-Id no es un UUID válido.".to_string(),
                    details: None,
                })?;

                Ok(OrgContext(organization_id))
            }
            None => Err(ApiError {
                status: StatusCode::BAD_REQUEST,
                message: "El encabezado X-Organization-Id es obligatorio.".to_string(),
                details: None,
            }),
        }
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de validación")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Token inválido")]
    InvalidToken,

    #[error("Sesión de almacenamiento ausente")]
    MissingStorageSession,

    #[error("Sesión de almacenamiento inválida")]
    InvalidStorageSession,

    #[error("No encontrado: {0}")]
    NotFound(String),

    #[error("No hay nada que restaurar")]
    NothingToRestore,

    // Falhas do gateway de documentos que não vêm do sqlx (ex: documento corrompido)
    #[error("Error del almacenamiento: {0}")]
    Gateway(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn not_found(kind: &str, id: &str) -> Self {
        AppError::NotFound(format!("{} '{}'", kind, id))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Uno o más campos son inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticación inválido o ausente.".to_string(),
            ),
            AppError::MissingStorageSession => (
                StatusCode::UNAUTHORIZED,
                "El encabezado x-storage-session es obligatorio.".to_string(),
            ),
            AppError::InvalidStorageSession => (
                StatusCode::UNAUTHORIZED,
                "Sesión de almacenamiento inválida o expirada.".to_string(),
            ),
            AppError::NotFound(what) => (StatusCode::NOT_FOUND, format!("No se encontró {}.", what)),
            AppError::NothingToRestore => (
                StatusCode::CONFLICT,
                "No hay ninguna eliminación reciente para deshacer.".to_string(),
            ),
            AppError::Gateway(ref detail) => {
                tracing::error!("Falha no gateway de documentos: {}", detail);
                (
                    StatusCode::BAD_GATEWAY,
                    "Error al acceder a los datos. Por favor, intenta de nuevo.".to_string(),
                )
            }
            AppError::DatabaseError(ref e) => {
                tracing::error!("Erro de banco de dados: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Error al acceder a los datos. Por favor, intenta de nuevo.".to_string(),
                )
            }

            // Todos os outros erros viram 500.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocurrió un error inesperado.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

// src/middleware/storage_session.rs

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{common::error::AppError, config::AppState, models::auth::Caller};

// O nome do nosso cabeçalho HTTP customizado
pub const STORAGE_SESSION_HEADER: &str = "x-storage-session";

/// Dono dos dados da requisição. Só existe se a sessão de armazenamento for
/// válida e pertencer ao mesmo chamador do token de identidade.
#[derive(Debug, Clone)]
pub struct StorageSession(pub String);

impl FromRequestParts<AppState> for StorageSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let caller = parts
            .extensions
            .get::<Caller>()
            .cloned()
            .ok_or(AppError::InvalidToken)?;

        let token = parts
            .headers
            .get(STORAGE_SESSION_HEADER)
            .ok_or(AppError::MissingStorageSession)?
            .to_str()
            .map_err(|_| AppError::InvalidStorageSession)?;

        let owner = state.auth_service.validate_storage_session(token)?;

        if owner != caller.id {
            tracing::warn!("Sessão de armazenamento de {} usada por {}", owner, caller.id);
            return Err(AppError::InvalidStorageSession);
        }

        Ok(StorageSession(owner))
    }
}

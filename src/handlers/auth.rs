// src/handlers/auth.rs

use axum::{extract::State, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{Caller, StorageSessionResponse},
};

// POST /api/auth/storage-session
#[utoipa::path(
    post,
    path = "/api/auth/storage-session",
    tag = "Auth",
    responses(
        (status = 200, description = "Sessão de armazenamento emitida", body = StorageSessionResponse),
        (status = 401, description = "Token de identidade inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_storage_session(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
) -> Result<Json<StorageSessionResponse>, AppError> {
    let session = app_state.auth_service.issue_storage_session(&caller)?;
    Ok(Json(session))
}

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses((status = 200, description = "Chamador autenticado", body = Caller)),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(caller): AuthenticatedUser) -> Json<Caller> {
    Json(caller)
}

// src/handlers/reproduction.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{i18n::Locale, storage_session::StorageSession},
    models::reproduction::{
        Check, CheckView, Insemination, InseminationNotesPayload, InseminationPayload,
    },
    services::schedule,
};

// =============================================================================
//  1. INSEMINAÇÕES
// =============================================================================

// GET /api/reproduction/inseminations
#[utoipa::path(
    get,
    path = "/api/reproduction/inseminations",
    tag = "Reproduction",
    responses((status = 200, description = "Inseminações registradas", body = Vec<Insemination>)),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn list_inseminations(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
) -> Result<impl IntoResponse, AppError> {
    let workspace = app_state.registry.open(&owner).await?;
    Ok(Json(workspace.reproduction.list_inseminations()))
}

// POST /api/reproduction/inseminations
#[utoipa::path(
    post,
    path = "/api/reproduction/inseminations",
    tag = "Reproduction",
    request_body = InseminationPayload,
    responses(
        (status = 201, description = "Inseminação registrada; primeiro chequeo agendado", body = Insemination),
        (status = 400, description = "Campos inválidos")
    ),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn create_insemination(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Json(payload): Json<InseminationPayload>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    let insemination = workspace.reproduction.create_insemination(payload).await?;
    Ok((StatusCode::CREATED, Json(insemination)))
}

// PUT /api/reproduction/inseminations/{id}
#[utoipa::path(
    put,
    path = "/api/reproduction/inseminations/{id}",
    tag = "Reproduction",
    request_body = InseminationPayload,
    responses(
        (status = 200, description = "Inseminação atualizada", body = Insemination),
        (status = 404, description = "Inseminação não encontrada")
    ),
    params(
        ("id" = String, Path, description = "ID da inseminação"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_insemination(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
    Json(payload): Json<InseminationPayload>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    Ok(Json(workspace.reproduction.update_insemination(&id, payload).await?))
}

// DELETE /api/reproduction/inseminations/{id}
#[utoipa::path(
    delete,
    path = "/api/reproduction/inseminations/{id}",
    tag = "Reproduction",
    responses(
        (status = 204, description = "Inseminação e seus chequeos removidos (pode ser desfeito)"),
        (status = 404, description = "Inseminação não encontrada")
    ),
    params(
        ("id" = String, Path, description = "ID da inseminação"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_insemination(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    workspace.reproduction.delete_insemination(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/reproduction/inseminations/undo
#[utoipa::path(
    post,
    path = "/api/reproduction/inseminations/undo",
    tag = "Reproduction",
    responses(
        (status = 201, description = "Inseminação e chequeos recriados", body = Insemination),
        (status = 409, description = "Nada para restaurar")
    ),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn undo_delete_insemination(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    let insemination = workspace.reproduction.undo_delete().await?;
    Ok((StatusCode::CREATED, Json(insemination)))
}

// POST /api/reproduction/inseminations/refresh
#[utoipa::path(
    post,
    path = "/api/reproduction/inseminations/refresh",
    tag = "Reproduction",
    responses((status = 200, description = "Inseminações e chequeos recarregados", body = Vec<Insemination>)),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn refresh_reproduction(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    workspace.reproduction.load().await?;
    Ok(Json(workspace.reproduction.list_inseminations()))
}

// POST /api/reproduction/inseminations/{id}/birthed
#[utoipa::path(
    post,
    path = "/api/reproduction/inseminations/{id}/birthed",
    tag = "Reproduction",
    responses(
        (status = 200, description = "Parto registrado; chequeos pendentes descartados", body = Insemination),
        (status = 404, description = "Inseminação não encontrada")
    ),
    params(
        ("id" = String, Path, description = "ID da inseminação"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn mark_birthed(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    Ok(Json(workspace.reproduction.mark_birthed(&id).await?))
}

// PUT /api/reproduction/inseminations/{id}/notes
#[utoipa::path(
    put,
    path = "/api/reproduction/inseminations/{id}/notes",
    tag = "Reproduction",
    request_body = InseminationNotesPayload,
    responses((status = 200, description = "Notas substituídas", body = Insemination)),
    params(
        ("id" = String, Path, description = "ID da inseminação"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_insemination_notes(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
    Json(payload): Json<InseminationNotesPayload>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    Ok(Json(workspace.reproduction.update_notes(&id, payload.notes).await?))
}

// =============================================================================
//  2. CHEQUEOS
// =============================================================================

// GET /api/reproduction/checks
#[utoipa::path(
    get,
    path = "/api/reproduction/checks",
    tag = "Reproduction",
    responses((status = 200, description = "Chequeos pendentes com aviso de proximidade", body = Vec<CheckView>)),
    params(
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento"),
        ("Accept-Language" = Option<String>, Header, description = "es (padrão), pt ou en")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_checks(
    State(app_state): State<AppState>,
    locale: Locale,
    StorageSession(owner): StorageSession,
) -> Result<impl IntoResponse, AppError> {
    let workspace = app_state.registry.open(&owner).await?;
    let today = Utc::now().date_naive();

    let views: Vec<CheckView> = workspace
        .reproduction
        .list_checks()
        .into_iter()
        .map(|check| {
            let days_until = schedule::days_until(check.date, today);
            let needs_attention = schedule::check_alert(&check, today);
            CheckView {
                alert: needs_attention.then(|| locale.check_alert(days_until)),
                check,
                days_until,
                needs_attention,
            }
        })
        .collect();

    Ok(Json(views))
}

// POST /api/reproduction/checks/{id}/complete
#[utoipa::path(
    post,
    path = "/api/reproduction/checks/{id}/complete",
    tag = "Reproduction",
    responses(
        (status = 200, description = "Chequeo concluído; devolve o próximo (ou null após o nono)", body = Option<Check>),
        (status = 404, description = "Chequeo não encontrado")
    ),
    params(
        ("id" = String, Path, description = "ID do chequeo"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn complete_check(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    Ok(Json(workspace.reproduction.complete_check(&id).await?))
}

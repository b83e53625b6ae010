// src/handlers/pregnancies.rs

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
    models::pregnancy::{PregnancyInsights, PregnancyNotePayload, PregnantCow, PregnantCowPayload},
    services::schedule,
};

// GET /api/pregnancies
#[utoipa::path(
    get,
    path = "/api/pregnancies",
    tag = "Pregnancies",
    responses((status = 200, description = "Vacas prenhes", body = Vec<PregnantCow>)),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn list_pregnancies(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
) -> Result<impl IntoResponse, AppError> {
    let workspace = app_state.registry.open(&owner).await?;
    Ok(Json(workspace.pregnancies.list()))
}

// POST /api/pregnancies
#[utoipa::path(
    post,
    path = "/api/pregnancies",
    tag = "Pregnancies",
    request_body = PregnantCowPayload,
    responses(
        (status = 201, description = "Prenhez registrada, com data prevista de parto", body = PregnantCow),
        (status = 400, description = "Campos inválidos")
    ),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn create_pregnancy(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Json(payload): Json<PregnantCowPayload>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    let cow = workspace.pregnancies.create(payload).await?;
    Ok((StatusCode::CREATED, Json(cow)))
}

// PUT /api/pregnancies/{id}
#[utoipa::path(
    put,
    path = "/api/pregnancies/{id}",
    tag = "Pregnancies",
    request_body = PregnantCowPayload,
    responses(
        (status = 200, description = "Prenhez atualizada", body = PregnantCow),
        (status = 404, description = "Registro não encontrado")
    ),
    params(
        ("id" = String, Path, description = "ID do registro"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_pregnancy(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
    Json(payload): Json<PregnantCowPayload>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    Ok(Json(workspace.pregnancies.update(&id, payload).await?))
}

// DELETE /api/pregnancies/{id}
#[utoipa::path(
    delete,
    path = "/api/pregnancies/{id}",
    tag = "Pregnancies",
    responses(
        (status = 204, description = "Registro removido (pode ser desfeito)"),
        (status = 404, description = "Registro não encontrado")
    ),
    params(
        ("id" = String, Path, description = "ID do registro"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_pregnancy(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    workspace.pregnancies.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/pregnancies/undo
#[utoipa::path(
    post,
    path = "/api/pregnancies/undo",
    tag = "Pregnancies",
    responses(
        (status = 201, description = "Último registro removido foi recriado", body = PregnantCow),
        (status = 409, description = "Nada para restaurar")
    ),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn undo_delete_pregnancy(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    let cow = workspace.pregnancies.undo_delete().await?;
    Ok((StatusCode::CREATED, Json(cow)))
}

// POST /api/pregnancies/refresh
#[utoipa::path(
    post,
    path = "/api/pregnancies/refresh",
    tag = "Pregnancies",
    responses((status = 200, description = "Cache recarregado do armazenamento", body = Vec<PregnantCow>)),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn refresh_pregnancies(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    workspace.pregnancies.load().await?;
    Ok(Json(workspace.pregnancies.list()))
}

// POST /api/pregnancies/{id}/notes
#[utoipa::path(
    post,
    path = "/api/pregnancies/{id}/notes",
    tag = "Pregnancies",
    request_body = PregnancyNotePayload,
    responses((status = 200, description = "Nota anexada", body = PregnantCow)),
    params(
        ("id" = String, Path, description = "ID do registro"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_pregnancy_note(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
    Json(payload): Json<PregnancyNotePayload>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    Ok(Json(workspace.pregnancies.add_note(&id, payload).await?))
}

// GET /api/pregnancies/{id}/insights
#[utoipa::path(
    get,
    path = "/api/pregnancies/{id}/insights",
    tag = "Pregnancies",
    responses(
        (status = 200, description = "Progresso, alertas e recomendações de hoje", body = PregnancyInsights),
        (status = 404, description = "Registro não encontrado")
    ),
    params(
        ("id" = String, Path, description = "ID do registro"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento"),
        ("Accept-Language" = Option<String>, Header, description = "es (padrão), pt ou en")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_pregnancy_insights(
    State(app_state): State<AppState>,
    locale: Locale,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let workspace = app_state.registry.open(&owner).await?;
    let cow = workspace.pregnancies.get(&id)?;
    let today = Utc::now().date_naive();

    let due_date = schedule::due_date(cow.breeding_date);
    let insights = PregnancyInsights {
        pregnancy_id: cow.id.clone(),
        estimated_due_date: due_date,
        days_until_due: schedule::days_until(due_date, today),
        progress_percent: schedule::progress_percent(cow.breeding_date, today),
        alerts: schedule::alerts(&cow, today)
            .into_iter()
            .map(|alert| locale.alert(alert).to_string())
            .collect(),
        recommendations: schedule::recommendations(&cow, today)
            .into_iter()
            .map(|r| locale.recommendation(r).to_string())
            .collect(),
    };

    Ok(Json(insights))
}

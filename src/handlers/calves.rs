// src/handlers/calves.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::storage_session::StorageSession,
    models::{
        calf::{Calf, CalfPayload, FeedingRecord, GrowthMilestone},
        records::{Note, Vaccination},
    },
};

// GET /api/calves
#[utoipa::path(
    get,
    path = "/api/calves",
    tag = "Calves",
    responses((status = 200, description = "Todas as crias com seus registros", body = Vec<Calf>)),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn list_calves(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
) -> Result<impl IntoResponse, AppError> {
    let workspace = app_state.registry.open(&owner).await?;
    Ok(Json(workspace.calves.list()))
}

// POST /api/calves
#[utoipa::path(
    post,
    path = "/api/calves",
    tag = "Calves",
    request_body = CalfPayload,
    responses(
        (status = 201, description = "Cria registrada", body = Calf),
        (status = 400, description = "Campos inválidos")
    ),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn create_calf(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Json(payload): Json<CalfPayload>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    let calf = workspace.calves.create(payload).await?;
    Ok((StatusCode::CREATED, Json(calf)))
}

// PUT /api/calves/{id}
#[utoipa::path(
    put,
    path = "/api/calves/{id}",
    tag = "Calves",
    request_body = CalfPayload,
    responses(
        (status = 200, description = "Cria atualizada", body = Calf),
        (status = 404, description = "Cria não encontrada")
    ),
    params(
        ("id" = String, Path, description = "ID da cria"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_calf(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
    Json(payload): Json<CalfPayload>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    Ok(Json(workspace.calves.update(&id, payload).await?))
}

// DELETE /api/calves/{id}
#[utoipa::path(
    delete,
    path = "/api/calves/{id}",
    tag = "Calves",
    responses(
        (status = 204, description = "Cria removida (pode ser desfeito)"),
        (status = 404, description = "Cria não encontrada")
    ),
    params(
        ("id" = String, Path, description = "ID da cria"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_calf(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    workspace.calves.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/calves/undo
#[utoipa::path(
    post,
    path = "/api/calves/undo",
    tag = "Calves",
    responses(
        (status = 201, description = "Última cria removida foi recriada", body = Calf),
        (status = 409, description = "Nada para restaurar")
    ),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn undo_delete_calf(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    let calf = workspace.calves.undo_delete().await?;
    Ok((StatusCode::CREATED, Json(calf)))
}

// POST /api/calves/refresh
#[utoipa::path(
    post,
    path = "/api/calves/refresh",
    tag = "Calves",
    responses((status = 200, description = "Cache recarregado do armazenamento", body = Vec<Calf>)),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn refresh_calves(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    workspace.calves.load().await?;
    Ok(Json(workspace.calves.list()))
}

// =============================================================================
//  SUB-REGISTROS
// =============================================================================

// POST /api/calves/{id}/feeding-records
#[utoipa::path(
    post,
    path = "/api/calves/{id}/feeding-records",
    tag = "Calves",
    request_body = FeedingRecord,
    responses((status = 201, description = "Alimentação registrada", body = FeedingRecord)),
    params(
        ("id" = String, Path, description = "ID da cria"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_feeding_record(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
    Json(payload): Json<FeedingRecord>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    let record = workspace.calves.add_record(&id, payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

// POST /api/calves/{id}/vaccinations
#[utoipa::path(
    post,
    path = "/api/calves/{id}/vaccinations",
    tag = "Calves",
    request_body = Vaccination,
    responses((status = 201, description = "Vacinação registrada", body = Vaccination)),
    params(
        ("id" = String, Path, description = "ID da cria"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_vaccination(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
    Json(payload): Json<Vaccination>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    let record = workspace.calves.add_record(&id, payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

// POST /api/calves/{id}/growth-milestones
#[utoipa::path(
    post,
    path = "/api/calves/{id}/growth-milestones",
    tag = "Calves",
    request_body = GrowthMilestone,
    responses((status = 201, description = "Marco de crescimento registrado", body = GrowthMilestone)),
    params(
        ("id" = String, Path, description = "ID da cria"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_growth_milestone(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
    Json(payload): Json<GrowthMilestone>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    let record = workspace.calves.add_record(&id, payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

// POST /api/calves/{id}/notes
#[utoipa::path(
    post,
    path = "/api/calves/{id}/notes",
    tag = "Calves",
    request_body = Note,
    responses((status = 201, description = "Nota adicionada", body = Note)),
    params(
        ("id" = String, Path, description = "ID da cria"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_note(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
    Json(payload): Json<Note>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    let record = workspace.calves.add_record(&id, payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

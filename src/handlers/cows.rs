// src/handlers/cows.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::storage_session::StorageSession,
    models::{
        cow::{Cow, CowPayload, FeedingSchedule, MilkYield, Treatment},
        records::{Note, Vaccination},
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Trecho do nome ou do id.
    #[serde(default)]
    pub q: String,
}

// GET /api/cows
#[utoipa::path(
    get,
    path = "/api/cows",
    tag = "Cows",
    responses((status = 200, description = "Todas as vacas com seus registros", body = Vec<Cow>)),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn list_cows(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
) -> Result<impl IntoResponse, AppError> {
    let workspace = app_state.registry.open(&owner).await?;
    Ok(Json(workspace.cows.list()))
}

// GET /api/cows/search?q=
#[utoipa::path(
    get,
    path = "/api/cows/search",
    tag = "Cows",
    responses((status = 200, description = "Vacas cujo id ou nome contém o termo", body = Vec<Cow>)),
    params(
        SearchQuery,
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn search_cows(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let workspace = app_state.registry.open(&owner).await?;
    Ok(Json(workspace.cows.search(&query.q)))
}

// POST /api/cows
#[utoipa::path(
    post,
    path = "/api/cows",
    tag = "Cows",
    request_body = CowPayload,
    responses(
        (status = 201, description = "Vaca registrada", body = Cow),
        (status = 400, description = "Campos inválidos")
    ),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn create_cow(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Json(payload): Json<CowPayload>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    let cow = workspace.cows.create(payload).await?;
    Ok((StatusCode::CREATED, Json(cow)))
}

// PUT /api/cows/{id}
#[utoipa::path(
    put,
    path = "/api/cows/{id}",
    tag = "Cows",
    request_body = CowPayload,
    responses(
        (status = 200, description = "Vaca atualizada", body = Cow),
        (status = 404, description = "Vaca não encontrada")
    ),
    params(
        ("id" = String, Path, description = "ID da vaca"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_cow(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
    Json(payload): Json<CowPayload>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    Ok(Json(workspace.cows.update(&id, payload).await?))
}

// DELETE /api/cows/{id}
#[utoipa::path(
    delete,
    path = "/api/cows/{id}",
    tag = "Cows",
    responses(
        (status = 204, description = "Vaca removida (pode ser desfeito)"),
        (status = 404, description = "Vaca não encontrada")
    ),
    params(
        ("id" = String, Path, description = "ID da vaca"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_cow(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    workspace.cows.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/cows/undo
#[utoipa::path(
    post,
    path = "/api/cows/undo",
    tag = "Cows",
    responses(
        (status = 201, description = "Última vaca removida foi recriada", body = Cow),
        (status = 409, description = "Nada para restaurar")
    ),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn undo_delete_cow(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    let cow = workspace.cows.undo_delete().await?;
    Ok((StatusCode::CREATED, Json(cow)))
}

// POST /api/cows/refresh
#[utoipa::path(
    post,
    path = "/api/cows/refresh",
    tag = "Cows",
    responses((status = 200, description = "Cache recarregado do armazenamento", body = Vec<Cow>)),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn refresh_cows(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    workspace.cows.load().await?;
    Ok(Json(workspace.cows.list()))
}

// =============================================================================
//  SUB-REGISTROS
// =============================================================================

// POST /api/cows/{id}/vaccinations
#[utoipa::path(
    post,
    path = "/api/cows/{id}/vaccinations",
    tag = "Cows",
    request_body = Vaccination,
    responses((status = 201, description = "Vacinação registrada", body = Vaccination)),
    params(
        ("id" = String, Path, description = "ID da vaca"),
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
    let record = workspace.cows.add_record(&id, payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

// POST /api/cows/{id}/treatments
#[utoipa::path(
    post,
    path = "/api/cows/{id}/treatments",
    tag = "Cows",
    request_body = Treatment,
    responses((status = 201, description = "Tratamento registrado", body = Treatment)),
    params(
        ("id" = String, Path, description = "ID da vaca"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_treatment(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
    Json(payload): Json<Treatment>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    let record = workspace.cows.add_record(&id, payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

// POST /api/cows/{id}/milk-production
#[utoipa::path(
    post,
    path = "/api/cows/{id}/milk-production",
    tag = "Cows",
    request_body = MilkYield,
    responses((status = 201, description = "Produção registrada", body = MilkYield)),
    params(
        ("id" = String, Path, description = "ID da vaca"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_milk_yield(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
    Json(payload): Json<MilkYield>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    let record = workspace.cows.add_record(&id, payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

// POST /api/cows/{id}/feeding-schedule
#[utoipa::path(
    post,
    path = "/api/cows/{id}/feeding-schedule",
    tag = "Cows",
    request_body = FeedingSchedule,
    responses((status = 201, description = "Alimentação registrada", body = FeedingSchedule)),
    params(
        ("id" = String, Path, description = "ID da vaca"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_feeding_schedule(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
    Json(payload): Json<FeedingSchedule>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    let record = workspace.cows.add_record(&id, payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

// POST /api/cows/{id}/notes
#[utoipa::path(
    post,
    path = "/api/cows/{id}/notes",
    tag = "Cows",
    request_body = Note,
    responses((status = 201, description = "Nota adicionada", body = Note)),
    params(
        ("id" = String, Path, description = "ID da vaca"),
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
    let record = workspace.cows.add_record(&id, payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

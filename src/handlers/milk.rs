// src/handlers/milk.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::storage_session::StorageSession,
    models::milk::{
        MilkCow, MilkIncident, MilkProductionPayload, MilkProductionRecord, ProductionDetail,
        ProductionPeriod, ProductionPoint,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnalyticsQuery {
    /// daily, weekly ou monthly
    #[param(value_type = String, example = "weekly")]
    pub period: ProductionPeriod,
}

// =============================================================================
//  1. VACAS LEITEIRAS
// =============================================================================

// GET /api/milk/cows
#[utoipa::path(
    get,
    path = "/api/milk/cows",
    tag = "Milk",
    responses((status = 200, description = "Vacas leiteiras", body = Vec<MilkCow>)),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn list_cows(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
) -> Result<impl IntoResponse, AppError> {
    let workspace = app_state.registry.open(&owner).await?;
    Ok(Json(workspace.milk.list_cows()))
}

// POST /api/milk/cows
#[utoipa::path(
    post,
    path = "/api/milk/cows",
    tag = "Milk",
    request_body = MilkCow,
    responses((status = 201, description = "Vaca leiteira registrada", body = MilkCow)),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn create_cow(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Json(payload): Json<MilkCow>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    let cow = workspace.milk.create_cow(payload).await?;
    Ok((StatusCode::CREATED, Json(cow)))
}

// PUT /api/milk/cows/{id}
#[utoipa::path(
    put,
    path = "/api/milk/cows/{id}",
    tag = "Milk",
    request_body = MilkCow,
    responses((status = 200, description = "Vaca leiteira atualizada", body = MilkCow)),
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
    Json(payload): Json<MilkCow>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    Ok(Json(workspace.milk.update_cow(&id, payload).await?))
}

// DELETE /api/milk/cows/{id}
#[utoipa::path(
    delete,
    path = "/api/milk/cows/{id}",
    tag = "Milk",
    responses((status = 204, description = "Vaca leiteira removida (pode ser desfeito)")),
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
    workspace.milk.delete_cow(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/milk/cows/undo
#[utoipa::path(
    post,
    path = "/api/milk/cows/undo",
    tag = "Milk",
    responses(
        (status = 201, description = "Última vaca removida foi recriada", body = MilkCow),
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
    let cow = workspace.milk.undo_delete_cow().await?;
    Ok((StatusCode::CREATED, Json(cow)))
}

// =============================================================================
//  2. PRODUÇÃO
// =============================================================================

// GET /api/milk/productions
#[utoipa::path(
    get,
    path = "/api/milk/productions",
    tag = "Milk",
    responses((status = 200, description = "Registros de ordenha", body = Vec<MilkProductionRecord>)),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn list_productions(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
) -> Result<impl IntoResponse, AppError> {
    let workspace = app_state.registry.open(&owner).await?;
    Ok(Json(workspace.milk.list_productions()))
}

// POST /api/milk/productions
#[utoipa::path(
    post,
    path = "/api/milk/productions",
    tag = "Milk",
    request_body = MilkProductionPayload,
    responses((status = 201, description = "Ordenha registrada; total calculado", body = MilkProductionRecord)),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn create_production(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Json(payload): Json<MilkProductionPayload>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    let record = workspace.milk.create_production(payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

// PUT /api/milk/productions/{id}
#[utoipa::path(
    put,
    path = "/api/milk/productions/{id}",
    tag = "Milk",
    request_body = MilkProductionPayload,
    responses((status = 200, description = "Ordenha atualizada; total recalculado", body = MilkProductionRecord)),
    params(
        ("id" = String, Path, description = "ID do registro"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_production(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
    Json(payload): Json<MilkProductionPayload>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    Ok(Json(workspace.milk.update_production(&id, payload).await?))
}

// DELETE /api/milk/productions/{id}
#[utoipa::path(
    delete,
    path = "/api/milk/productions/{id}",
    tag = "Milk",
    responses((status = 204, description = "Registro removido (pode ser desfeito)")),
    params(
        ("id" = String, Path, description = "ID do registro"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_production(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    workspace.milk.delete_production(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/milk/productions/undo
#[utoipa::path(
    post,
    path = "/api/milk/productions/undo",
    tag = "Milk",
    responses(
        (status = 201, description = "Último registro removido foi recriado", body = MilkProductionRecord),
        (status = 409, description = "Nada para restaurar")
    ),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn undo_delete_production(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    let record = workspace.milk.undo_delete_production().await?;
    Ok((StatusCode::CREATED, Json(record)))
}

// =============================================================================
//  3. INCIDENTES
// =============================================================================

// GET /api/milk/incidents
#[utoipa::path(
    get,
    path = "/api/milk/incidents",
    tag = "Milk",
    responses((status = 200, description = "Incidentes registrados", body = Vec<MilkIncident>)),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn list_incidents(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
) -> Result<impl IntoResponse, AppError> {
    let workspace = app_state.registry.open(&owner).await?;
    Ok(Json(workspace.milk.list_incidents()))
}

// POST /api/milk/incidents
#[utoipa::path(
    post,
    path = "/api/milk/incidents",
    tag = "Milk",
    request_body = MilkIncident,
    responses((status = 201, description = "Incidente registrado", body = MilkIncident)),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn create_incident(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Json(payload): Json<MilkIncident>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    let incident = workspace.milk.create_incident(payload).await?;
    Ok((StatusCode::CREATED, Json(incident)))
}

// PUT /api/milk/incidents/{id}
#[utoipa::path(
    put,
    path = "/api/milk/incidents/{id}",
    tag = "Milk",
    request_body = MilkIncident,
    responses((status = 200, description = "Incidente atualizado", body = MilkIncident)),
    params(
        ("id" = String, Path, description = "ID do incidente"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_incident(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
    Json(payload): Json<MilkIncident>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    Ok(Json(workspace.milk.update_incident(&id, payload).await?))
}

// DELETE /api/milk/incidents/{id}
#[utoipa::path(
    delete,
    path = "/api/milk/incidents/{id}",
    tag = "Milk",
    responses((status = 204, description = "Incidente removido (pode ser desfeito)")),
    params(
        ("id" = String, Path, description = "ID do incidente"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_incident(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    workspace.milk.delete_incident(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/milk/incidents/undo
#[utoipa::path(
    post,
    path = "/api/milk/incidents/undo",
    tag = "Milk",
    responses(
        (status = 201, description = "Último incidente removido foi recriado", body = MilkIncident),
        (status = 409, description = "Nada para restaurar")
    ),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn undo_delete_incident(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    let incident = workspace.milk.undo_delete_incident().await?;
    Ok((StatusCode::CREATED, Json(incident)))
}

// =============================================================================
//  4. ANALÍTICA
// =============================================================================

// GET /api/milk/analytics?period=weekly
#[utoipa::path(
    get,
    path = "/api/milk/analytics",
    tag = "Milk",
    responses((status = 200, description = "Série de produção agregada pelo período", body = Vec<ProductionPoint>)),
    params(
        AnalyticsQuery,
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_analytics(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let workspace = app_state.registry.open(&owner).await?;
    Ok(Json(workspace.milk.analytics(query.period)))
}

// GET /api/milk/analytics/{date}
#[utoipa::path(
    get,
    path = "/api/milk/analytics/{date}",
    tag = "Milk",
    responses((status = 200, description = "Produção por vaca no dia", body = Vec<ProductionDetail>)),
    params(
        ("date" = String, Path, description = "Data no formato YYYY-MM-DD"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_production_details(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(date): Path<NaiveDate>,
) -> Result<impl IntoResponse, AppError> {
    let workspace = app_state.registry.open(&owner).await?;
    Ok(Json(workspace.milk.details(date)))
}

// POST /api/milk/refresh
#[utoipa::path(
    post,
    path = "/api/milk/refresh",
    tag = "Milk",
    responses((status = 200, description = "Vacas, ordenhas e incidentes recarregados", body = Vec<MilkCow>)),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn refresh_milk(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    workspace.milk.load().await?;
    Ok(Json(workspace.milk.list_cows()))
}

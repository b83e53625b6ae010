// src/handlers/vaccines.rs

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
    models::vaccine::{
        SideEffectsPayload, Vaccine, VaccinationRecord, VaccinationRecordPayload,
        VaccinationRecordView, VaccinationSchedule,
    },
};

// =============================================================================
//  1. CATÁLOGO
// =============================================================================

// GET /api/vaccines/catalog
#[utoipa::path(
    get,
    path = "/api/vaccines/catalog",
    tag = "Vaccines",
    responses((status = 200, description = "Catálogo de vacinas", body = Vec<Vaccine>)),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn list_vaccines(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
) -> Result<impl IntoResponse, AppError> {
    let workspace = app_state.registry.open(&owner).await?;
    Ok(Json(workspace.vaccines.list_vaccines()))
}

// POST /api/vaccines/catalog
#[utoipa::path(
    post,
    path = "/api/vaccines/catalog",
    tag = "Vaccines",
    request_body = Vaccine,
    responses(
        (status = 201, description = "Vacina adicionada ao catálogo", body = Vaccine),
        (status = 400, description = "Campos inválidos")
    ),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn create_vaccine(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Json(payload): Json<Vaccine>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    let vaccine = workspace.vaccines.create_vaccine(payload).await?;
    Ok((StatusCode::CREATED, Json(vaccine)))
}

// PUT /api/vaccines/catalog/{id}
#[utoipa::path(
    put,
    path = "/api/vaccines/catalog/{id}",
    tag = "Vaccines",
    request_body = Vaccine,
    responses(
        (status = 200, description = "Vacina atualizada", body = Vaccine),
        (status = 404, description = "Vacina não encontrada")
    ),
    params(
        ("id" = String, Path, description = "ID da vacina"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_vaccine(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
    Json(payload): Json<Vaccine>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    Ok(Json(workspace.vaccines.update_vaccine(&id, payload).await?))
}

// DELETE /api/vaccines/catalog/{id}
#[utoipa::path(
    delete,
    path = "/api/vaccines/catalog/{id}",
    tag = "Vaccines",
    responses(
        (status = 204, description = "Vacina removida (pode ser desfeito)"),
        (status = 404, description = "Vacina não encontrada")
    ),
    params(
        ("id" = String, Path, description = "ID da vacina"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_vaccine(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    workspace.vaccines.delete_vaccine(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/vaccines/catalog/undo
#[utoipa::path(
    post,
    path = "/api/vaccines/catalog/undo",
    tag = "Vaccines",
    responses(
        (status = 201, description = "Última vacina removida foi recriada", body = Vaccine),
        (status = 409, description = "Nada para restaurar")
    ),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn undo_delete_vaccine(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    let vaccine = workspace.vaccines.undo_delete_vaccine().await?;
    Ok((StatusCode::CREATED, Json(vaccine)))
}

// =============================================================================
//  2. REGISTROS DE VACINAÇÃO
// =============================================================================

// GET /api/vaccines/records
#[utoipa::path(
    get,
    path = "/api/vaccines/records",
    tag = "Vaccines",
    responses((status = 200, description = "Registros com os nomes das vacinas", body = Vec<VaccinationRecordView>)),
    params(
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento"),
        ("Accept-Language" = Option<String>, Header, description = "es (padrão), pt ou en")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_records(
    State(app_state): State<AppState>,
    locale: Locale,
    StorageSession(owner): StorageSession,
) -> Result<impl IntoResponse, AppError> {
    let workspace = app_state.registry.open(&owner).await?;
    Ok(Json(workspace.vaccines.record_views(locale.deleted_vaccine())))
}

// POST /api/vaccines/records
#[utoipa::path(
    post,
    path = "/api/vaccines/records",
    tag = "Vaccines",
    request_body = VaccinationRecordPayload,
    responses(
        (status = 201, description = "Vacinação registrada", body = VaccinationRecord),
        (status = 400, description = "Campos inválidos")
    ),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn create_record(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Json(payload): Json<VaccinationRecordPayload>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    let record = workspace.vaccines.create_record(payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

// PUT /api/vaccines/records/{id}
#[utoipa::path(
    put,
    path = "/api/vaccines/records/{id}",
    tag = "Vaccines",
    request_body = VaccinationRecordPayload,
    responses(
        (status = 200, description = "Registro atualizado (efeitos colaterais preservados)", body = VaccinationRecord),
        (status = 404, description = "Registro não encontrado")
    ),
    params(
        ("id" = String, Path, description = "ID do registro"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_record(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
    Json(payload): Json<VaccinationRecordPayload>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    Ok(Json(workspace.vaccines.update_record(&id, payload).await?))
}

// PUT /api/vaccines/records/{id}/side-effects
#[utoipa::path(
    put,
    path = "/api/vaccines/records/{id}/side-effects",
    tag = "Vaccines",
    request_body = SideEffectsPayload,
    responses((status = 200, description = "Efeitos colaterais anotados", body = VaccinationRecord)),
    params(
        ("id" = String, Path, description = "ID do registro"),
        ("x-storage-session" = String, Header, description = "Sessão de armazenamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_side_effects(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
    Json(payload): Json<SideEffectsPayload>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    Ok(Json(workspace.vaccines.update_side_effects(&id, payload).await?))
}

// DELETE /api/vaccines/records/{id}
#[utoipa::path(
    delete,
    path = "/api/vaccines/records/{id}",
    tag = "Vaccines",
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
pub async fn delete_record(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    workspace.vaccines.delete_record(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/vaccines/records/undo
#[utoipa::path(
    post,
    path = "/api/vaccines/records/undo",
    tag = "Vaccines",
    responses(
        (status = 201, description = "Último registro removido foi recriado", body = VaccinationRecord),
        (status = 409, description = "Nada para restaurar")
    ),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn undo_delete_record(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    let record = workspace.vaccines.undo_delete_record().await?;
    Ok((StatusCode::CREATED, Json(record)))
}

// =============================================================================
//  3. AGENDA
// =============================================================================

// GET /api/vaccines/schedule
#[utoipa::path(
    get,
    path = "/api/vaccines/schedule",
    tag = "Vaccines",
    responses((status = 200, description = "Próximas, atrasadas e sem recorrência", body = VaccinationSchedule)),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn get_schedule(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
) -> Result<impl IntoResponse, AppError> {
    let workspace = app_state.registry.open(&owner).await?;
    Ok(Json(workspace.vaccines.schedule(Utc::now().date_naive())))
}

// POST /api/vaccines/refresh
#[utoipa::path(
    post,
    path = "/api/vaccines/refresh",
    tag = "Vaccines",
    responses((status = 200, description = "Catálogo e registros recarregados", body = Vec<Vaccine>)),
    params(("x-storage-session" = String, Header, description = "Sessão de armazenamento")),
    security(("api_jwt" = []))
)]
pub async fn refresh_vaccines(
    State(app_state): State<AppState>,
    StorageSession(owner): StorageSession,
) -> Result<impl IntoResponse, AppError> {
    let mut workspace = app_state.registry.open(&owner).await?;
    workspace.vaccines.load().await?;
    Ok(Json(workspace.vaccines.list_vaccines()))
}

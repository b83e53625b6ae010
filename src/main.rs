//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Json, Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new().await?;

    if let Some(pool) = &app_state.db_pool {
        sqlx::migrate!().run(pool).await?;
        tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");
    }

    // Libera periodicamente o cache dos donos que pararam de usar o servidor
    let registry = app_state.registry.clone();
    let workspace_idle = app_state.workspace_idle;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(workspace_idle);
        loop {
            ticker.tick().await;
            registry.evict_idle(workspace_idle).await;
        }
    });

    let bind_addr = app_state.bind_addr.clone();
    let app = build_router(app_state);

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(app_state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/storage-session", post(handlers::auth::create_storage_session))
        .route("/me", get(handlers::auth::get_me));

    let cow_routes = Router::new()
        .route("/", get(handlers::cows::list_cows).post(handlers::cows::create_cow))
        .route("/search", get(handlers::cows::search_cows))
        .route("/undo", post(handlers::cows::undo_delete_cow))
        .route("/refresh", post(handlers::cows::refresh_cows))
        .route(
            "/{id}",
            put(handlers::cows::update_cow).delete(handlers::cows::delete_cow),
        )
        .route("/{id}/vaccinations", post(handlers::cows::add_vaccination))
        .route("/{id}/treatments", post(handlers::cows::add_treatment))
        .route("/{id}/milk-production", post(handlers::cows::add_milk_yield))
        .route("/{id}/feeding-schedule", post(handlers::cows::add_feeding_schedule))
        .route("/{id}/notes", post(handlers::cows::add_note));

    let calf_routes = Router::new()
        .route("/", get(handlers::calves::list_calves).post(handlers::calves::create_calf))
        .route("/undo", post(handlers::calves::undo_delete_calf))
        .route("/refresh", post(handlers::calves::refresh_calves))
        .route(
            "/{id}",
            put(handlers::calves::update_calf).delete(handlers::calves::delete_calf),
        )
        .route("/{id}/feeding-records", post(handlers::calves::add_feeding_record))
        .route("/{id}/vaccinations", post(handlers::calves::add_vaccination))
        .route("/{id}/growth-milestones", post(handlers::calves::add_growth_milestone))
        .route("/{id}/notes", post(handlers::calves::add_note));

    let pregnancy_routes = Router::new()
        .route(
            "/",
            get(handlers::pregnancies::list_pregnancies).post(handlers::pregnancies::create_pregnancy),
        )
        .route("/undo", post(handlers::pregnancies::undo_delete_pregnancy))
        .route("/refresh", post(handlers::pregnancies::refresh_pregnancies))
        .route(
            "/{id}",
            put(handlers::pregnancies::update_pregnancy)
                .delete(handlers::pregnancies::delete_pregnancy),
        )
        .route("/{id}/notes", post(handlers::pregnancies::add_pregnancy_note))
        .route("/{id}/insights", get(handlers::pregnancies::get_pregnancy_insights));

    let reproduction_routes = Router::new()
        .route(
            "/inseminations",
            get(handlers::reproduction::list_inseminations)
                .post(handlers::reproduction::create_insemination),
        )
        .route("/inseminations/undo", post(handlers::reproduction::undo_delete_insemination))
        .route("/inseminations/refresh", post(handlers::reproduction::refresh_reproduction))
        .route(
            "/inseminations/{id}",
            put(handlers::reproduction::update_insemination)
                .delete(handlers::reproduction::delete_insemination),
        )
        .route("/inseminations/{id}/birthed", post(handlers::reproduction::mark_birthed))
        .route(
            "/inseminations/{id}/notes",
            put(handlers::reproduction::update_insemination_notes),
        )
        .route("/checks", get(handlers::reproduction::list_checks))
        .route("/checks/{id}/complete", post(handlers::reproduction::complete_check));

    let vaccine_routes = Router::new()
        .route(
            "/catalog",
            get(handlers::vaccines::list_vaccines).post(handlers::vaccines::create_vaccine),
        )
        .route("/catalog/undo", post(handlers::vaccines::undo_delete_vaccine))
        .route(
            "/catalog/{id}",
            put(handlers::vaccines::update_vaccine).delete(handlers::vaccines::delete_vaccine),
        )
        .route(
            "/records",
            get(handlers::vaccines::list_records).post(handlers::vaccines::create_record),
        )
        .route("/records/undo", post(handlers::vaccines::undo_delete_record))
        .route(
            "/records/{id}",
            put(handlers::vaccines::update_record).delete(handlers::vaccines::delete_record),
        )
        .route("/records/{id}/side-effects", put(handlers::vaccines::update_side_effects))
        .route("/schedule", get(handlers::vaccines::get_schedule))
        .route("/refresh", post(handlers::vaccines::refresh_vaccines));

    let milk_routes = Router::new()
        .route("/cows", get(handlers::milk::list_cows).post(handlers::milk::create_cow))
        .route("/cows/undo", post(handlers::milk::undo_delete_cow))
        .route(
            "/cows/{id}",
            put(handlers::milk::update_cow).delete(handlers::milk::delete_cow),
        )
        .route(
            "/productions",
            get(handlers::milk::list_productions).post(handlers::milk::create_production),
        )
        .route("/productions/undo", post(handlers::milk::undo_delete_production))
        .route(
            "/productions/{id}",
            put(handlers::milk::update_production).delete(handlers::milk::delete_production),
        )
        .route(
            "/incidents",
            get(handlers::milk::list_incidents).post(handlers::milk::create_incident),
        )
        .route("/incidents/undo", post(handlers::milk::undo_delete_incident))
        .route(
            "/incidents/{id}",
            put(handlers::milk::update_incident).delete(handlers::milk::delete_incident),
        )
        .route("/analytics", get(handlers::milk::get_analytics))
        .route("/analytics/{date}", get(handlers::milk::get_production_details))
        .route("/refresh", post(handlers::milk::refresh_milk));

    // Tudo abaixo de /api exige token de identidade; a sessão de armazenamento
    // é cobrada por handler, pelo extrator StorageSession
    let protected = Router::new()
        .nest("/auth", auth_routes)
        .nest("/cows", cow_routes)
        .nest("/calves", calf_routes)
        .nest("/pregnancies", pregnancy_routes)
        .nest("/reproduction", reproduction_routes)
        .nest("/vaccines", vaccine_routes)
        .nest("/milk", milk_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api", protected)
        .with_state(app_state)
}

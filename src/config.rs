// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{DocumentGateway, MemoryGateway, PgDocumentGateway},
    services::{auth::AuthService, workspace::WorkspaceRegistry},
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_SESSION_TTL_MINUTES: i64 = 60;
const DEFAULT_WORKSPACE_IDLE_MINUTES: u64 = 30;

#[derive(Clone)]
pub struct AppState {
    // Só existe com STORAGE_BACKEND=postgres; usado para as migrações
    pub db_pool: Option<PgPool>,
    pub registry: WorkspaceRegistry,
    pub auth_service: AuthService,
    pub bind_addr: String,
    // Quanto tempo o cache de um dono sobrevive sem requisições
    pub workspace_idle: Duration,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let identity_secret =
            env::var("IDENTITY_JWT_SECRET").context("IDENTITY_JWT_SECRET deve ser definido")?;
        let storage_secret =
            env::var("STORAGE_JWT_SECRET").context("STORAGE_JWT_SECRET deve ser definido")?;
        let session_ttl = match env::var("STORAGE_SESSION_TTL_MINUTES") {
            Ok(value) => value
                .parse::<i64>()
                .context("STORAGE_SESSION_TTL_MINUTES deve ser um número de minutos")?,
            Err(_) => DEFAULT_SESSION_TTL_MINUTES,
        };
        let workspace_idle_minutes = match env::var("WORKSPACE_IDLE_MINUTES") {
            Ok(value) => value
                .parse::<u64>()
                .context("WORKSPACE_IDLE_MINUTES deve ser um número de minutos")?,
            Err(_) => DEFAULT_WORKSPACE_IDLE_MINUTES,
        };
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let backend = env::var("STORAGE_BACKEND").unwrap_or_else(|_| "postgres".to_string());

        let (db_pool, gateway): (Option<PgPool>, Arc<dyn DocumentGateway>) = match backend.as_str() {
            "memory" => {
                tracing::warn!("⚠️ STORAGE_BACKEND=memory: os dados somem ao reiniciar");
                (None, Arc::new(MemoryGateway::new()))
            }
            "postgres" => {
                let database_url =
                    env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;

                let pool = PgPoolOptions::new()
                    .max_connections(5)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(&database_url)
                    .await
                    .context("Falha ao conectar ao banco de dados")?;

                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
                (Some(pool.clone()), Arc::new(PgDocumentGateway::new(pool)))
            }
            other => anyhow::bail!("STORAGE_BACKEND desconhecido: {}", other),
        };

        let auth_service = AuthService::new(identity_secret, storage_secret, session_ttl);
        let mut state = Self::with_gateway(gateway, auth_service);
        state.db_pool = db_pool;
        state.bind_addr = bind_addr;
        state.workspace_idle = Duration::from_secs(workspace_idle_minutes.max(1) * 60);
        Ok(state)
    }

    /// Monta o gráfico de dependências sobre um gateway já pronto.
    pub fn with_gateway(gateway: Arc<dyn DocumentGateway>, auth_service: AuthService) -> Self {
        Self {
            db_pool: None,
            registry: WorkspaceRegistry::new(gateway),
            auth_service,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            workspace_idle: Duration::from_secs(DEFAULT_WORKSPACE_IDLE_MINUTES * 60),
        }
    }
}

// src/services/workspace.rs

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::{
    common::error::AppError,
    db::DocumentGateway,
    services::{
        calf_service::CalfService, cow_service::CowService, milk_service::MilkService,
        pregnancy_service::PregnancyService, reproduction_service::ReproductionService,
        vaccine_service::VaccineService,
    },
};

/// Todos os caches de um dono. As rotas compartilham a mesma instância.
pub struct Workspace {
    pub cows: CowService,
    pub calves: CalfService,
    pub pregnancies: PregnancyService,
    pub reproduction: ReproductionService,
    pub vaccines: VaccineService,
    pub milk: MilkService,
    last_used: Instant,
}

impl Workspace {
    pub fn new(gateway: Arc<dyn DocumentGateway>, owner: &str) -> Self {
        Self {
            cows: CowService::new(gateway.clone(), owner),
            calves: CalfService::new(gateway.clone(), owner),
            pregnancies: PregnancyService::new(gateway.clone(), owner),
            reproduction: ReproductionService::new(gateway.clone(), owner),
            vaccines: VaccineService::new(gateway.clone(), owner),
            milk: MilkService::new(gateway, owner),
            last_used: Instant::now(),
        }
    }

    /// Carrega as famílias que ainda não foram lidas. Uma família que falhar
    /// é tentada de novo no próximo acesso.
    pub async fn ensure_loaded(&mut self) -> Result<(), AppError> {
        if !self.cows.is_loaded() {
            self.cows.load().await?;
        }
        if !self.calves.is_loaded() {
            self.calves.load().await?;
        }
        if !self.pregnancies.is_loaded() {
            self.pregnancies.load().await?;
        }
        if !self.reproduction.is_loaded() {
            self.reproduction.load().await?;
        }
        if !self.vaccines.is_loaded() {
            self.vaccines.load().await?;
        }
        if !self.milk.is_loaded() {
            self.milk.load().await?;
        }
        Ok(())
    }
}

/// Um `Workspace` por dono, criado no primeiro acesso.
#[derive(Clone)]
pub struct WorkspaceRegistry {
    gateway: Arc<dyn DocumentGateway>,
    workspaces: Arc<RwLock<HashMap<String, Arc<Mutex<Workspace>>>>>,
}

impl WorkspaceRegistry {
    pub fn new(gateway: Arc<dyn DocumentGateway>) -> Self {
        Self {
            gateway,
            workspaces: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Trava o workspace do dono pelo resto da requisição; ações do mesmo
    /// dono rodam uma de cada vez.
    pub async fn open(&self, owner: &str) -> Result<OwnedMutexGuard<Workspace>, AppError> {
        let existing = self.workspaces.read().await.get(owner).cloned();

        let workspace = match existing {
            Some(workspace) => workspace,
            None => {
                let mut workspaces = self.workspaces.write().await;
                workspaces
                    .entry(owner.to_string())
                    .or_insert_with(|| {
                        tracing::info!("Abrindo workspace para {}", owner);
                        Arc::new(Mutex::new(Workspace::new(self.gateway.clone(), owner)))
                    })
                    .clone()
            }
        };

        let mut guard = workspace.lock_owned().await;
        guard.last_used = Instant::now();
        guard.ensure_loaded().await?;
        Ok(guard)
    }

    /// Descarta os workspaces parados há mais de `max_idle`. Os dados já estão
    /// no armazenamento; só os slots de undo se perdem.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut workspaces = self.workspaces.write().await;
        let before = workspaces.len();

        workspaces.retain(|_, workspace| {
            // Outra referência viva significa requisição em andamento
            if Arc::strong_count(workspace) > 1 {
                return true;
            }
            match workspace.try_lock() {
                Ok(guard) => guard.last_used.elapsed() < max_idle,
                Err(_) => true,
            }
        });

        let evicted = before - workspaces.len();
        if evicted > 0 {
            tracing::info!("{} workspace(s) ocioso(s) descartado(s)", evicted);
        }
        evicted
    }
}

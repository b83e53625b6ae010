// src/services/undo.rs

use crate::{
    common::error::AppError,
    db::DocumentGateway,
    models::Record,
    services::entity_store::EntityStore,
};

/// Guarda só a última remoção. Uma nova remoção sobrescreve a anterior.
#[derive(Debug)]
pub struct UndoBuffer<S> {
    slot: Option<S>,
}

impl<S> Default for UndoBuffer<S> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<S> UndoBuffer<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remember(&mut self, snapshot: S) {
        self.slot = Some(snapshot);
    }

    pub fn pending(&self) -> Result<&S, AppError> {
        self.slot.as_ref().ok_or(AppError::NothingToRestore)
    }

    pub fn pending_mut(&mut self) -> Result<&mut S, AppError> {
        self.slot.as_mut().ok_or(AppError::NothingToRestore)
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}

/// Entidade removida junto com seus filhos. Numa restauração interrompida,
/// `restored_id` aponta para o pai já recriado e `entity` guarda só os filhos
/// que ainda faltam gravar.
#[derive(Debug, Clone)]
pub struct Removal<T> {
    pub entity: T,
    pub restored_id: Option<String>,
}

impl<T> Removal<T> {
    pub fn new(entity: T) -> Self {
        Self { entity, restored_id: None }
    }
}

/// Recria a última entidade removida com um id novo.
/// O slot só é esvaziado se o gateway aceitar a criação.
pub async fn restore<T: Record>(
    undo: &mut UndoBuffer<T>,
    store: &mut EntityStore<T>,
    gateway: &dyn DocumentGateway,
    owner: &str,
) -> Result<T, AppError> {
    let snapshot = undo.pending()?.clone();
    let restored = store.create(gateway, owner, snapshot).await?;
    undo.clear();
    Ok(restored)
}

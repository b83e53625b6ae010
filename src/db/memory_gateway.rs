// src/db/memory_gateway.rs

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::gateway::{CollectionPath, Document, DocumentGateway},
};

/// Gateway em memória (`STORAGE_BACKEND=memory` e testes).
///
/// Conta as escritas e pode ser colocado em modo de falha para simular
/// erros de rede.
#[derive(Default)]
pub struct MemoryGateway {
    collections: Mutex<BTreeMap<String, Vec<Document>>>,
    writes: AtomicUsize,
    failing: AtomicBool,
    // Contagem regressiva até o create que deve falhar; zero desliga
    failing_create: AtomicUsize,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    /// Enquanto ligado, toda operação devolve `AppError::Gateway`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    #[cfg(test)]
    /// Faz falhar só o `n`-ésimo create a partir de agora (1 = o próximo).
    pub fn fail_nth_create(&self, n: usize) {
        self.failing_create.store(n, Ordering::SeqCst);
    }

    #[cfg(test)]
    /// Quantas chamadas de escrita (create/update/delete) chegaram ao gateway.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::Gateway("armazenamento indisponível".into()));
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, Vec<Document>>>, AppError> {
        self.collections
            .lock()
            .map_err(|_| AppError::Gateway("estado do gateway envenenado".into()))
    }
}

#[async_trait]
impl DocumentGateway for MemoryGateway {
    async fn list(&self, path: &CollectionPath) -> Result<Vec<Document>, AppError> {
        self.check_available()?;
        let collections = self.lock()?;
        Ok(collections.get(&path.to_string()).cloned().unwrap_or_default())
    }

    async fn create(&self, path: &CollectionPath, data: Value) -> Result<String, AppError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let countdown = self.failing_create.load(Ordering::SeqCst);
        if countdown > 0 {
            self.failing_create.store(countdown - 1, Ordering::SeqCst);
            if countdown == 1 {
                return Err(AppError::Gateway("create rejeitado".into()));
            }
        }

        let id = Uuid::new_v4().to_string();
        let mut collections = self.lock()?;
        collections
            .entry(path.to_string())
            .or_default()
            .push(Document { id: id.clone(), data });
        Ok(id)
    }

    async fn update(&self, path: &CollectionPath, id: &str, patch: Value) -> Result<(), AppError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let mut collections = self.lock()?;
        let doc = collections
            .get_mut(&path.to_string())
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| AppError::not_found("documento", id))?;

        match (doc.data.as_object_mut(), patch) {
            (Some(fields), Value::Object(changes)) => {
                for (key, value) in changes {
                    fields.insert(key, value);
                }
            }
            (_, other) => doc.data = other,
        }
        Ok(())
    }

    async fn delete(&self, path: &CollectionPath, id: &str) -> Result<(), AppError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let mut collections = self.lock()?;
        let docs = collections
            .get_mut(&path.to_string())
            .ok_or_else(|| AppError::not_found("documento", id))?;
        let before = docs.len();
        docs.retain(|d| d.id != id);
        if docs.len() == before {
            return Err(AppError::not_found("documento", id));
        }

        let prefix = path.children_prefix(id);
        collections.retain(|key, _| !key.starts_with(&prefix));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_update_merges_top_level_fields() {
        let gateway = MemoryGateway::new();
        let path = CollectionPath::root("u1", "inseminations");
        let id = gateway
            .create(&path, json!({"cowId": "C1", "hasBirthed": false}))
            .await
            .unwrap();

        gateway.update(&path, &id, json!({"hasBirthed": true})).await.unwrap();

        let docs = gateway.list(&path).await.unwrap();
        assert_eq!(docs[0].data, json!({"cowId": "C1", "hasBirthed": true}));
    }

    #[tokio::test]
    async fn test_delete_removes_nested_collections() {
        let gateway = MemoryGateway::new();
        let calves = CollectionPath::root("u1", "calves");
        let id = gateway.create(&calves, json!({"name": "Pinta"})).await.unwrap();
        let feeding = CollectionPath::nested("u1", "calves", &id, "feedingRecords");
        gateway.create(&feeding, json!({"amount": 2.0})).await.unwrap();

        gateway.delete(&calves, &id).await.unwrap();

        assert!(gateway.list(&calves).await.unwrap().is_empty());
        assert!(gateway.list(&feeding).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let gateway = MemoryGateway::new();
        let path = CollectionPath::root("u1", "cows");
        let err = gateway.delete(&path, "nope").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_failing_mode_rejects_everything() {
        let gateway = MemoryGateway::new();
        gateway.set_failing(true);
        let path = CollectionPath::root("u1", "cows");
        assert!(matches!(gateway.list(&path).await, Err(AppError::Gateway(_))));
        assert!(matches!(gateway.create(&path, json!({})).await, Err(AppError::Gateway(_))));
        assert_eq!(gateway.write_count(), 1);
    }

    #[tokio::test]
    async fn test_fail_nth_create_rejects_only_that_call() {
        let gateway = MemoryGateway::new();
        let path = CollectionPath::root("u1", "cows");
        gateway.fail_nth_create(2);

        assert!(gateway.create(&path, json!({"n": 1})).await.is_ok());
        assert!(matches!(gateway.create(&path, json!({"n": 2})).await, Err(AppError::Gateway(_))));
        assert!(gateway.create(&path, json!({"n": 3})).await.is_ok());
        assert_eq!(gateway.list(&path).await.unwrap().len(), 2);
    }
}

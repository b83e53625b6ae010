// src/db/gateway.rs

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::common::error::AppError;

/// Endereço de uma coleção de documentos de um dono:
/// `users/{owner}/{collection}` ou `users/{owner}/{collection}/{parentId}/{sub}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath {
    owner: String,
    collection: String,
    parent: Option<(String, String)>,
}

impl CollectionPath {
    pub fn root(owner: &str, collection: &str) -> Self {
        Self {
            owner: owner.to_string(),
            collection: collection.to_string(),
            parent: None,
        }
    }

    pub fn nested(owner: &str, collection: &str, parent_id: &str, sub: &str) -> Self {
        Self {
            owner: owner.to_string(),
            collection: collection.to_string(),
            parent: Some((parent_id.to_string(), sub.to_string())),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Prefixo de todas as sub-coleções penduradas no documento `id`.
    pub fn children_prefix(&self, id: &str) -> String {
        format!("{}/{}/", self, id)
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "users/{}/{}", self.owner, self.collection)?;
        if let Some((parent_id, sub)) = &self.parent {
            write!(f, "/{}/{}", parent_id, sub)?;
        }
        Ok(())
    }
}

/// Um documento cru: o id atribuído pelo gateway e os campos em JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

/// Contrato do armazenamento de documentos por dono.
///
/// `update` faz merge raso dos campos de topo; `delete` remove também as
/// sub-coleções do documento. Ambos devolvem `NotFound` para ids inexistentes.
#[async_trait]
pub trait DocumentGateway: Send + Sync {
    async fn list(&self, path: &CollectionPath) -> Result<Vec<Document>, AppError>;

    async fn create(&self, path: &CollectionPath, data: Value) -> Result<String, AppError>;

    async fn update(&self, path: &CollectionPath, id: &str, patch: Value) -> Result<(), AppError>;

    async fn delete(&self, path: &CollectionPath, id: &str) -> Result<(), AppError>;
}

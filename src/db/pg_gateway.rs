// src/db/pg_gateway.rs

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::gateway::{CollectionPath, Document, DocumentGateway},
};

#[derive(FromRow)]
struct DocumentRow {
    id: String,
    data: Json<Value>,
}

// O gateway de documentos sobre Postgres (uma tabela JSONB para todas as coleções)
#[derive(Clone)]
pub struct PgDocumentGateway {
    pool: PgPool,
}

impl PgDocumentGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentGateway for PgDocumentGateway {
    async fn list(&self, path: &CollectionPath) -> Result<Vec<Document>, AppError> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, data
            FROM documents
            WHERE owner_id = $1 AND collection_path = $2
            ORDER BY seq ASC
            "#,
        )
        .bind(path.owner())
        .bind(path.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Document { id: row.id, data: row.data.0 })
            .collect())
    }

    async fn create(&self, path: &CollectionPath, data: Value) -> Result<String, AppError> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO documents (id, owner_id, collection_path, data)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&id)
        .bind(path.owner())
        .bind(path.to_string())
        .bind(Json(data))
        .execute(&self.pool)
        .await?;

        tracing::debug!("📄 Documento {} criado em {}", id, path);
        Ok(id)
    }

    async fn update(&self, path: &CollectionPath, id: &str, patch: Value) -> Result<(), AppError> {
        // `||` faz o merge raso dos campos de topo, como um updateDoc
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET data = data || $4, updated_at = NOW()
            WHERE owner_id = $1 AND collection_path = $2 AND id = $3
            "#,
        )
        .bind(path.owner())
        .bind(path.to_string())
        .bind(id)
        .bind(Json(patch))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("documento", id));
        }
        Ok(())
    }

    async fn delete(&self, path: &CollectionPath, id: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM documents WHERE owner_id = $1 AND collection_path = $2 AND id = $3",
        )
        .bind(path.owner())
        .bind(path.to_string())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("documento", id));
        }

        // Sub-coleções do documento removido
        sqlx::query("DELETE FROM documents WHERE owner_id = $1 AND starts_with(collection_path, $2)")
            .bind(path.owner())
            .bind(path.children_prefix(id))
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Quem está chamando, segundo o provedor de identidade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Caller {
    pub id: String,
}

// Estrutura de dados ("claims") do token de identidade emitido pelo provedor externo
#[derive(Debug, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String, // Subject (ID do usuário no provedor)
    pub exp: usize,  // Expiration time
    pub iat: usize,  // Issued At
}

// Claims da sessão de armazenamento trocada pela identidade
#[derive(Debug, Serialize, Deserialize)]
pub struct StorageClaims {
    pub sub: String,
    pub scope: String,
    pub exp: usize,
    pub iat: usize,
}

// Resposta da troca de identidade por sessão de armazenamento
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorageSessionResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

// src/services/auth.rs

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    models::auth::{Caller, IdentityClaims, StorageClaims, StorageSessionResponse},
};

const STORAGE_SCOPE: &str = "storage";

/// Valida tokens do provedor de identidade e emite a sessão de armazenamento
/// que os endpoints de dados exigem.
#[derive(Clone)]
pub struct AuthService {
    identity_secret: String,
    storage_secret: String,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(identity_secret: String, storage_secret: String, session_ttl_minutes: i64) -> Self {
        Self {
            identity_secret,
            storage_secret,
            session_ttl: Duration::minutes(session_ttl_minutes),
        }
    }

    pub fn validate_identity(&self, token: &str) -> Result<Caller, AppError> {
        let token_data = decode::<IdentityClaims>(
            token,
            &DecodingKey::from_secret(self.identity_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        if token_data.claims.sub.trim().is_empty() {
            return Err(AppError::InvalidToken);
        }

        Ok(Caller { id: token_data.claims.sub })
    }

    /// Troca a identidade já validada por um token de armazenamento curto.
    pub fn issue_storage_session(&self, caller: &Caller) -> Result<StorageSessionResponse, AppError> {
        let now = Utc::now();
        let expires_at = now + self.session_ttl;

        let claims = StorageClaims {
            sub: caller.id.clone(),
            scope: STORAGE_SCOPE.to_string(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.storage_secret.as_ref()),
        )?;

        tracing::debug!("Sessão de armazenamento emitida para {}", caller.id);
        Ok(StorageSessionResponse { token, expires_at })
    }

    /// Devolve o dono (`sub`) da sessão.
    pub fn validate_storage_session(&self, token: &str) -> Result<String, AppError> {
        let token_data = decode::<StorageClaims>(
            token,
            &DecodingKey::from_secret(self.storage_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidStorageSession)?;

        if token_data.claims.scope != STORAGE_SCOPE {
            return Err(AppError::InvalidStorageSession);
        }
        Ok(token_data.claims.sub)
    }

    #[cfg(test)]
    pub fn create_identity_token(&self, user_id: &str) -> String {
        let now = Utc::now();
        let claims = IdentityClaims {
            sub: user_id.to_string(),
            exp: (now + Duration::hours(1)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.identity_secret.as_ref()),
        )
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new("identity-secret".into(), "storage-secret".into(), 60)
    }

    #[test]
    fn test_identity_token_round_trip() {
        let auth = service();
        let token = auth.create_identity_token("rancher-1");
        assert_eq!(auth.validate_identity(&token).unwrap().id, "rancher-1");
    }

    #[test]
    fn test_storage_session_is_bound_to_caller() {
        let auth = service();
        let caller = Caller { id: "rancher-1".into() };
        let session = auth.issue_storage_session(&caller).unwrap();

        assert_eq!(auth.validate_storage_session(&session.token).unwrap(), "rancher-1");
        assert!(session.expires_at > Utc::now());
    }

    #[test]
    fn test_tokens_are_not_interchangeable() {
        let auth = service();
        let identity = auth.create_identity_token("rancher-1");
        assert!(matches!(
            auth.validate_storage_session(&identity),
            Err(AppError::InvalidStorageSession)
        ));

        let session = auth
            .issue_storage_session(&Caller { id: "rancher-1".into() })
            .unwrap();
        assert!(matches!(auth.validate_identity(&session.token), Err(AppError::InvalidToken)));
    }
}

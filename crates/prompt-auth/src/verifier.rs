//! Bearer token verification.
//!
//! [`KeycloakVerifier`] is what phase servers run with in production. It
//! loads the realm's signing keys once and refreshes them when a token names
//! a key id it has not seen yet. [`SecretVerifier`] checks HS256 tokens
//! signed with a shared secret and is meant for local development and tests.

use anyhow::anyhow;
use async_trait::async_trait;
use std::time::Instant;

use jsonwebtoken::jwk::{Jwk, JwkSet};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use prompt_config::KeycloakConfig;
use prompt_core::AppError;

use crate::claims::KeycloakClaims;
use crate::token_user::TokenUser;

#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("token header carries no key id")]
    MissingKeyId,

    #[error("no signing key with id {0}")]
    UnknownKey(String),

    #[error("token issued to {actual}, expected {expected}")]
    WrongAuthorizedParty { expected: String, actual: String },

    #[error("failed to load signing keys: {0}")]
    Jwks(#[from] reqwest::Error),
}

impl From<VerifierError> for AppError {
    fn from(err: VerifierError) -> Self {
        match err {
            VerifierError::Jwks(_) => AppError::internal(err),
            _ => AppError::unauthorized(anyhow!("{}", err)),
        }
    }
}

/// Verifies a bearer token and extracts the caller.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<TokenUser, VerifierError>;
}

pub struct KeycloakVerifier {
    config: KeycloakConfig,
    http: reqwest::Client,
    keys: RwLock<KeyCache>,
}

#[derive(Default)]
struct KeyCache {
    set: Option<JwkSet>,
    fetched_at: Option<Instant>,
}

impl KeyCache {
    fn find(&self, kid: &str) -> Option<&Jwk> {
        self.set.as_ref().and_then(|set| set.find(kid))
    }
}

impl KeycloakVerifier {
    /// Builds the verifier with an HTTP client bounded by the configured
    /// request timeout.
    pub fn new(config: KeycloakConfig) -> Result<Self, VerifierError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(config, http))
    }

    pub fn with_client(config: KeycloakConfig, http: reqwest::Client) -> Self {
        Self {
            config,
            http,
            keys: RwLock::new(KeyCache::default()),
        }
    }

    #[instrument(skip(self), fields(url = %self.config.jwks_url()))]
    async fn fetch_jwks(&self) -> Result<JwkSet, VerifierError> {
        let set = self
            .http
            .get(self.config.jwks_url())
            .send()
            .await?
            .error_for_status()?
            .json::<JwkSet>()
            .await?;
        debug!(keys = set.keys.len(), "Loaded realm signing keys");
        Ok(set)
    }

    /// Looks `kid` up in the cached key set. An unknown id triggers at most
    /// one refetch per `jwks_refresh_interval`; concurrent misses wait for
    /// the same refetch.
    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, VerifierError> {
        if let Some(jwk) = self.keys.read().await.find(kid) {
            return Ok(DecodingKey::from_jwk(jwk)?);
        }

        let mut cache = self.keys.write().await;
        if let Some(jwk) = cache.find(kid) {
            return Ok(DecodingKey::from_jwk(jwk)?);
        }

        let recently_fetched = cache
            .fetched_at
            .is_some_and(|at| at.elapsed() < self.config.jwks_refresh_interval);
        if !recently_fetched {
            cache.set = Some(self.fetch_jwks().await?);
            cache.fetched_at = Some(Instant::now());
        }

        match cache.find(kid) {
            Some(jwk) => Ok(DecodingKey::from_jwk(jwk)?),
            None => {
                warn!(kid = %kid, refetched = !recently_fetched, "Token signed with unknown key");
                Err(VerifierError::UnknownKey(kid.to_string()))
            }
        }
    }
}

#[async_trait]
impl TokenVerifier for KeycloakVerifier {
    async fn verify(&self, token: &str) -> Result<TokenUser, VerifierError> {
        let header = decode_header(token)?;
        let kid = header.kid.ok_or(VerifierError::MissingKeyId)?;
        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[self.config.issuer()]);
        // Keycloak puts "account" into aud; azp identifies the client instead.
        validation.validate_aud = false;

        let claims = decode::<KeycloakClaims>(token, &key, &validation)?.claims;
        if claims.azp != self.config.authorized_party {
            return Err(VerifierError::WrongAuthorizedParty {
                expected: self.config.authorized_party.clone(),
                actual: claims.azp,
            });
        }

        Ok(claims.into_token_user(&self.config.client_id))
    }
}

/// HS256 verifier for tokens signed with a shared secret.
pub struct SecretVerifier {
    secret: String,
    client_id: String,
}

impl SecretVerifier {
    pub fn new(secret: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            client_id: client_id.into(),
        }
    }
}

#[async_trait]
impl TokenVerifier for SecretVerifier {
    async fn verify(&self, token: &str) -> Result<TokenUser, VerifierError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;

        let claims = decode::<KeycloakClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )?
        .claims;

        Ok(claims.into_token_user(&self.client_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    const SECRET: &str = "test-secret";

    fn sign(claims: serde_json::Value, header: Header) -> String {
        encode(&header, &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
    }

    fn claims(exp_offset: i64) -> serde_json::Value {
        json!({
            "sub": "user-1",
            "exp": Utc::now().timestamp() + exp_offset,
            "azp": "prompt-client",
            "email": "alice@tum.de",
            "realm_access": {"roles": ["PROMPT_Admin"]},
        })
    }

    #[tokio::test]
    async fn test_secret_verifier_accepts_valid_token() {
        let verifier = SecretVerifier::new(SECRET, "prompt-server");
        let user = verifier
            .verify(&sign(claims(3600), Header::default()))
            .await
            .unwrap();
        assert_eq!(user.id, "user-1");
        assert!(user.has_role("PROMPT_Admin"));
    }

    #[tokio::test]
    async fn test_secret_verifier_rejects_expired_token() {
        let verifier = SecretVerifier::new(SECRET, "prompt-server");
        let err = verifier
            .verify(&sign(claims(-3600), Header::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, VerifierError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_secret_verifier_rejects_wrong_secret() {
        let verifier = SecretVerifier::new("another-secret", "prompt-server");
        let result = verifier.verify(&sign(claims(3600), Header::default())).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_secret_verifier_rejects_garbage() {
        let verifier = SecretVerifier::new(SECRET, "prompt-server");
        assert!(verifier.verify("not-a-jwt").await.is_err());
    }

    fn keycloak_config(host: String) -> KeycloakConfig {
        KeycloakConfig {
            host,
            ..KeycloakConfig::default()
        }
    }

    #[tokio::test]
    async fn test_keycloak_verifier_requires_key_id() {
        let verifier = KeycloakVerifier::new(keycloak_config("http://127.0.0.1:1".into())).unwrap();
        let err = verifier
            .verify(&sign(claims(3600), Header::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, VerifierError::MissingKeyId));
    }

    #[tokio::test]
    async fn test_keycloak_verifier_unknown_key() {
        let mut server = mockito::Server::new_async().await;
        let jwks = server
            .mock("GET", "/realms/prompt/protocol/openid-connect/certs")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"keys": []}"#)
            .expect(1)
            .create_async()
            .await;

        let verifier = KeycloakVerifier::new(keycloak_config(server.url())).unwrap();
        let mut header = Header::default();
        header.kid = Some("missing".to_string());

        let err = verifier.verify(&sign(claims(3600), header)).await.unwrap_err();
        assert!(matches!(err, VerifierError::UnknownKey(ref kid) if kid == "missing"));
        jwks.assert_async().await;

        let app: AppError = err.into();
        assert_eq!(app.status.as_u16(), 401);
    }

    #[tokio::test]
    async fn test_keycloak_verifier_jwks_unavailable_is_internal() {
        let mut server = mockito::Server::new_async().await;
        let _jwks = server
            .mock("GET", "/realms/prompt/protocol/openid-connect/certs")
            .with_status(503)
            .create_async()
            .await;

        let verifier = KeycloakVerifier::new(keycloak_config(server.url())).unwrap();
        let mut header = Header::default();
        header.kid = Some("k1".to_string());

        let err = verifier.verify(&sign(claims(3600), header)).await.unwrap_err();
        assert!(matches!(err, VerifierError::Jwks(_)));

        let app: AppError = err.into();
        assert_eq!(app.status.as_u16(), 500);
    }

    #[tokio::test]
    async fn test_unknown_keys_refetch_at_most_once_per_interval() {
        let mut server = mockito::Server::new_async().await;
        let jwks = server
            .mock("GET", "/realms/prompt/protocol/openid-connect/certs")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"keys": []}"#)
            .expect(1)
            .create_async()
            .await;

        let verifier = KeycloakVerifier::new(keycloak_config(server.url())).unwrap();
        for kid in ["forged-1", "forged-2", "forged-3"] {
            let mut header = Header::default();
            header.kid = Some(kid.to_string());
            let err = verifier.verify(&sign(claims(3600), header)).await.unwrap_err();
            assert!(matches!(err, VerifierError::UnknownKey(_)));
        }

        jwks.assert_async().await;
    }

    #[tokio::test]
    async fn test_unknown_key_refetches_after_interval() {
        let mut server = mockito::Server::new_async().await;
        let jwks = server
            .mock("GET", "/realms/prompt/protocol/openid-connect/certs")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"keys": []}"#)
            .expect(2)
            .create_async()
            .await;

        let config = KeycloakConfig {
            jwks_refresh_interval: std::time::Duration::ZERO,
            ..keycloak_config(server.url())
        };
        let verifier = KeycloakVerifier::new(config).unwrap();
        for _ in 0..2 {
            let mut header = Header::default();
            header.kid = Some("rotated".to_string());
            assert!(verifier.verify(&sign(claims(3600), header)).await.is_err());
        }

        jwks.assert_async().await;
    }

    #[tokio::test]
    async fn test_hanging_jwks_endpoint_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accepts connections but never answers.
        let _server = tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });

        let config = KeycloakConfig {
            request_timeout: std::time::Duration::from_millis(100),
            ..keycloak_config(format!("http://{addr}"))
        };
        let verifier = KeycloakVerifier::new(config).unwrap();
        let mut header = Header::default();
        header.kid = Some("k1".to_string());

        let result = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            verifier.verify(&sign(claims(3600), header)),
        )
        .await
        .expect("verification hung past the request timeout");
        assert!(matches!(result, Err(VerifierError::Jwks(_))));
    }
}

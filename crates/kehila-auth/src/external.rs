//! External identity provider token verification.
//!
//! Verifies provider-issued tokens (RS256) against the provider's
//! published JWKS, with key-set caching, refresh on key-id miss, and a
//! fail-closed fetch path. The verified subject still has to be mapped to
//! a local, tenant-scoped user record by the validator.

use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::AuthError;

/// JWKS cache TTL (1 hour).
const JWKS_TTL: Duration = Duration::from_secs(3600);

/// Claims extracted from a verified external token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalClaims {
    /// Provider-issued subject id.
    pub sub: String,
    /// Issuer.
    pub iss: String,
    /// Audience.
    pub aud: String,
    /// Expiration (seconds since epoch).
    pub exp: i64,
    /// Issued at (seconds since epoch).
    pub iat: i64,
}

/// A pluggable external-provider verification backend.
///
/// The JWKS implementation below is the production backend; tests swap in
/// a stub.
pub trait ExternalTokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> impl Future<Output = Result<ExternalClaims, AuthError>> + Send;
}

/// Configuration for a JWKS-backed provider.
#[derive(Debug, Clone)]
pub struct ExternalProviderConfig {
    /// Expected `iss` claim.
    pub issuer: String,
    /// Where the provider publishes its signing keys.
    pub jwks_url: String,
    /// Expected `aud` claim.
    pub audience: String,
}

struct JwksCache {
    keys: JwkSet,
    fetched_at: Instant,
}

impl JwksCache {
    fn is_expired(&self) -> bool {
        self.fetched_at.elapsed() > JWKS_TTL
    }

    fn find_key(&self, kid: &str) -> Option<&jsonwebtoken::jwk::Jwk> {
        self.keys
            .keys
            .iter()
            .find(|k| k.common.key_id.as_deref() == Some(kid))
    }
}

/// JWKS-backed external token verifier.
pub struct JwksVerifier {
    config: ExternalProviderConfig,
    jwks_cache: Arc<RwLock<Option<JwksCache>>>,
    http_client: reqwest::Client,
}

impl JwksVerifier {
    pub fn new(config: ExternalProviderConfig) -> Self {
        Self {
            config,
            jwks_cache: Arc::new(RwLock::new(None)),
            http_client: reqwest::Client::new(),
        }
    }

    /// Get JWKS from cache, or fetch when the cache is empty, expired, or
    /// missing the requested key id (possible key rotation).
    async fn get_jwks(&self, kid: &str) -> Result<JwkSet, AuthError> {
        {
            let cache = self.jwks_cache.read();
            if let Some(cached) = cache.as_ref() {
                if !cached.is_expired() && cached.find_key(kid).is_some() {
                    debug!(kid, "JWKS cache hit");
                    return Ok(cached.keys.clone());
                }
            }
        }

        if let Some(cached) = self.jwks_cache.read().as_ref() {
            if cached.find_key(kid).is_none() {
                info!(kid, "key id not in JWKS cache, refreshing");
            }
        }

        self.fetch_and_cache_jwks().await
    }

    /// Fetch JWKS from the provider and update the cache.
    pub async fn fetch_and_cache_jwks(&self) -> Result<JwkSet, AuthError> {
        debug!(url = %self.config.jwks_url, "fetching JWKS");

        let jwks: JwkSet = self
            .http_client
            .get(&self.config.jwks_url)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| AuthError::ExternalProvider(format!("JWKS fetch failed: {e}")))?
            .json()
            .await
            .map_err(|e| AuthError::ExternalProvider(format!("JWKS parse failed: {e}")))?;

        {
            let mut cache = self.jwks_cache.write();
            *cache = Some(JwksCache {
                keys: jwks.clone(),
                fetched_at: Instant::now(),
            });
        }

        info!(keys = jwks.keys.len(), "JWKS cache updated");
        Ok(jwks)
    }
}

impl ExternalTokenVerifier for JwksVerifier {
    async fn verify(&self, token: &str) -> Result<ExternalClaims, AuthError> {
        let header = decode_header(token)
            .map_err(|e| AuthError::TokenInvalid(format!("invalid token header: {e}")))?;

        let kid = header
            .kid
            .ok_or_else(|| AuthError::TokenInvalid("token missing key id".into()))?;

        let jwks = self.get_jwks(&kid).await?;

        let key = jwks
            .keys
            .iter()
            .find(|k| k.common.key_id.as_deref() == Some(kid.as_str()))
            .ok_or_else(|| AuthError::TokenInvalid(format!("key id '{kid}' not in JWKS")))?;

        let decoding_key = DecodingKey::from_jwk(key)
            .map_err(|e| AuthError::Crypto(format!("bad provider key: {e}")))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);

        let data =
            decode::<ExternalClaims>(token, &decoding_key, &validation).map_err(|e| {
                warn!("external token validation failed: {e}");
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::TokenInvalid(e.to_string()),
                }
            })?;

        if data.claims.sub.is_empty() {
            return Err(AuthError::TokenInvalid("token missing subject".into()));
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jwks_cache_expiration() {
        let cache = JwksCache {
            keys: JwkSet { keys: vec![] },
            fetched_at: Instant::now() - Duration::from_secs(3700),
        };
        assert!(cache.is_expired());

        let fresh = JwksCache {
            keys: JwkSet { keys: vec![] },
            fetched_at: Instant::now(),
        };
        assert!(!fresh.is_expired());
    }

    #[tokio::test]
    async fn malformed_token_rejected_before_any_fetch() {
        let verifier = JwksVerifier::new(ExternalProviderConfig {
            issuer: "https://securetoken.example.com/demo".into(),
            jwks_url: "https://example.invalid/jwks".into(),
            audience: "demo".into(),
        });
        let err = verifier.verify("not-a-jwt").await.unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid(_)));
    }
}

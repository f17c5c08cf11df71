//! Artifact validation — resolves an inbound credential artifact plus a
//! claimed tenant into a request-scoped [`Identity`].
//!
//! Three artifact kinds are supported behind one entry point: signed
//! bearer tokens (stateless), opaque session tokens (stateful, revocable),
//! and external-provider tokens (verified against the provider's key set,
//! then mapped to a local user). When a request carries more than one
//! artifact they are tried in that fixed order and the first one that
//! validates wins; identities are never merged across artifacts.

use chrono::{Duration as ChronoDuration, Utc};
use kehila_core::error::{KehilaError, KehilaResult};
use kehila_core::models::identity::Identity;
use kehila_core::models::user::UserStatus;
use kehila_core::repository::{SessionRepository, UserRepository};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::external::ExternalTokenVerifier;
use crate::store::with_deadline;
use crate::token;

/// The credential artifacts extracted from a single request. Any subset
/// may be present.
#[derive(Debug, Clone, Default)]
pub struct CredentialArtifacts {
    /// `Authorization: Bearer` access token.
    pub bearer: Option<String>,
    /// Opaque session token (header or cookie).
    pub session: Option<String>,
    /// External-provider-issued identity token.
    pub external: Option<String>,
}

impl CredentialArtifacts {
    pub fn is_empty(&self) -> bool {
        self.bearer.is_none() && self.session.is_none() && self.external.is_none()
    }
}

/// Validates credential artifacts against a claimed tenant.
pub struct Validator<U, S, X>
where
    U: UserRepository,
    S: SessionRepository,
    X: ExternalTokenVerifier,
{
    users: U,
    sessions: S,
    external: Option<X>,
    config: AuthConfig,
}

impl<U, S, X> Validator<U, S, X>
where
    U: UserRepository,
    S: SessionRepository,
    X: ExternalTokenVerifier,
{
    pub fn new(users: U, sessions: S, external: Option<X>, config: AuthConfig) -> Self {
        Self {
            users,
            sessions,
            external,
            config,
        }
    }

    /// Resolve the request's artifacts to an identity.
    ///
    /// Priority order: bearer token, then session token, then external
    /// token. The first artifact that validates wins; if every present
    /// artifact fails, the highest-priority failure is returned. A request
    /// with no artifact at all fails `MissingCredentials`.
    pub async fn resolve(
        &self,
        claimed_tenant_id: Uuid,
        artifacts: &CredentialArtifacts,
    ) -> KehilaResult<Identity> {
        if artifacts.is_empty() {
            return Err(KehilaError::MissingCredentials);
        }

        let mut first_err: Option<KehilaError> = None;

        if let Some(bearer) = &artifacts.bearer {
            match self.validate_token(bearer, claimed_tenant_id) {
                Ok(identity) => return Ok(identity),
                Err(e) => {
                    debug!("bearer token rejected: {e}");
                    first_err.get_or_insert(e);
                }
            }
        }

        if let Some(session) = &artifacts.session {
            match self.validate_session(session, claimed_tenant_id).await {
                Ok(identity) => return Ok(identity),
                Err(e) => {
                    debug!("session token rejected: {e}");
                    first_err.get_or_insert(e);
                }
            }
        }

        if let Some(external) = &artifacts.external {
            match self.validate_external(external, claimed_tenant_id).await {
                Ok(identity) => return Ok(identity),
                Err(e) => {
                    debug!("external token rejected: {e}");
                    first_err.get_or_insert(e);
                }
            }
        }

        Err(first_err.unwrap_or(KehilaError::MissingCredentials))
    }

    /// Validate a signed bearer token. Stateless — signature, expiry, and
    /// tenant binding only; no store lookup.
    pub fn validate_token(
        &self,
        raw_token: &str,
        claimed_tenant_id: Uuid,
    ) -> KehilaResult<Identity> {
        let claims = token::decode_access_token(raw_token, &self.config)?;

        let token_tenant_id: Uuid = claims
            .tenant_id
            .parse()
            .map_err(|_| KehilaError::TokenInvalid("malformed tenant claim".into()))?;
        if token_tenant_id != claimed_tenant_id {
            warn!(%claimed_tenant_id, "bearer token presented to a different tenant");
            return Err(KehilaError::TokenInvalid(
                "token not issued for this tenant".into(),
            ));
        }

        let user_id: Uuid = claims
            .sub
            .parse()
            .map_err(|_| KehilaError::TokenInvalid("malformed subject claim".into()))?;

        Ok(Identity {
            user_id,
            tenant_id: token_tenant_id,
            role: claims.role,
        })
    }

    /// Validate an opaque session token against the session store.
    ///
    /// A session validated close to its expiry (within the configured
    /// refresh threshold) is extended by a full lifetime. The refresh is
    /// opportunistic — a store hiccup during the extend does not fail an
    /// otherwise valid request.
    pub async fn validate_session(
        &self,
        raw_token: &str,
        claimed_tenant_id: Uuid,
    ) -> KehilaResult<Identity> {
        let token_hash = token::hash_session_token(raw_token);

        let session = with_deadline(
            self.config.store_timeout,
            self.sessions
                .get_by_token_hash(claimed_tenant_id, &token_hash),
        )
        .await
        .map_err(|e| match e {
            KehilaError::NotFound { .. } => KehilaError::SessionInvalid,
            other => other,
        })?;

        // The lookup is already tenant-scoped; this guards against a
        // store-layer regression handing back a foreign row.
        if session.tenant_id != claimed_tenant_id {
            warn!(%claimed_tenant_id, session_id = %session.id, "session tenant mismatch");
            return Err(KehilaError::SessionInvalid);
        }

        let now = Utc::now();
        if now >= session.expires_at {
            debug!(session_id = %session.id, "expired session presented, reaping");
            let _ = with_deadline(
                self.config.store_timeout,
                self.sessions
                    .invalidate_by_token_hash(claimed_tenant_id, &token_hash),
            )
            .await;
            return Err(KehilaError::SessionInvalid);
        }

        let remaining = (session.expires_at - now).num_seconds();
        if self.config.session_refresh_threshold_secs > 0
            && remaining < self.config.session_refresh_threshold_secs as i64
        {
            let new_expiry =
                now + ChronoDuration::seconds(self.config.session_lifetime_secs as i64);
            if let Err(e) = with_deadline(
                self.config.store_timeout,
                self.sessions
                    .extend(claimed_tenant_id, session.id, new_expiry),
            )
            .await
            {
                debug!(session_id = %session.id, "session refresh skipped: {e}");
            }
        }

        Ok(Identity {
            user_id: session.user_id,
            tenant_id: session.tenant_id,
            role: session.role,
        })
    }

    /// Validate an external-provider token and map its subject to a local
    /// user in the claimed tenant.
    pub async fn validate_external(
        &self,
        raw_token: &str,
        claimed_tenant_id: Uuid,
    ) -> KehilaResult<Identity> {
        let verifier = self.external.as_ref().ok_or_else(|| {
            KehilaError::TokenInvalid("no external identity provider configured".into())
        })?;

        let claims = verifier.verify(raw_token).await.map_err(KehilaError::from)?;

        let user = with_deadline(
            self.config.store_timeout,
            self.users
                .get_by_external_subject(claimed_tenant_id, &claims.sub),
        )
        .await
        .map_err(|e| match e {
            KehilaError::NotFound { .. } => KehilaError::UserNotProvisioned {
                subject: claims.sub.clone(),
            },
            other => other,
        })?;

        if user.status != UserStatus::Active {
            warn!(%claimed_tenant_id, user_id = %user.id, "external login by inactive user");
            return Err(KehilaError::UserNotProvisioned {
                subject: claims.sub,
            });
        }

        Ok(Identity {
            user_id: user.id,
            tenant_id: claimed_tenant_id,
            role: user.role,
        })
    }
}

//! Authentication service — login, logout, and session revocation.

use chrono::{Duration as ChronoDuration, Utc};
use kehila_core::error::{KehilaError, KehilaResult};
use kehila_core::models::role::Role;
use kehila_core::models::session::CreateSession;
use kehila_core::models::user::UserStatus;
use kehila_core::repository::{
    CredentialRepository, SessionRepository, TenantRepository, UserRepository,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::password;
use crate::registry::TenantRegistry;
use crate::store::with_deadline;
use crate::token;

/// Login request.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    /// Routable tenant slug.
    pub tenant_slug: String,
    /// Phone number or email address.
    pub identifier: String,
    /// Raw secret.
    pub secret: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Successful login result.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutput {
    /// Raw opaque session token. Only its hash is stored.
    pub session_token: String,
    pub session_id: Uuid,
    /// Short-lived signed access token.
    pub access_token: String,
    pub user_id: Uuid,
    pub role: Role,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// Authenticates login attempts and manages the session lifecycle.
///
/// All store calls go through the configured deadline and fail closed.
pub struct AuthService<T, C, U, S>
where
    T: TenantRepository,
    C: CredentialRepository,
    U: UserRepository,
    S: SessionRepository,
{
    registry: TenantRegistry<T>,
    credentials: C,
    users: U,
    sessions: S,
    config: AuthConfig,
}

impl<T, C, U, S> AuthService<T, C, U, S>
where
    T: TenantRepository,
    C: CredentialRepository,
    U: UserRepository,
    S: SessionRepository,
{
    pub fn new(
        registry: TenantRegistry<T>,
        credentials: C,
        users: U,
        sessions: S,
        config: AuthConfig,
    ) -> Self {
        Self {
            registry,
            credentials,
            users,
            sessions,
            config,
        }
    }

    /// Authenticate an identifier/secret pair scoped to a tenant.
    ///
    /// Unknown identifier, wrong secret, invalidated credential, and
    /// inactive user all fail with the same `InvalidCredentials` so
    /// callers cannot enumerate accounts. On the unknown-identifier path a
    /// dummy Argon2 verification keeps the timing in line with the real
    /// one.
    pub async fn login(&self, input: LoginInput) -> KehilaResult<LoginOutput> {
        let tenant = self.registry.resolve(&input.tenant_slug).await?;

        let credential = match with_deadline(
            self.config.store_timeout,
            self.credentials
                .get_by_identifier(tenant.id, &input.identifier),
        )
        .await
        {
            Ok(credential) => credential,
            Err(KehilaError::NotFound { .. }) => {
                let _ = password::verify_secret(
                    &input.secret,
                    password::dummy_hash(),
                    self.config.pepper.as_deref(),
                );
                warn!(tenant = %tenant.slug, "login attempt with unknown identifier");
                return Err(KehilaError::InvalidCredentials);
            }
            Err(other) => return Err(other),
        };

        let matches = password::verify_secret(
            &input.secret,
            &credential.secret_hash,
            self.config.pepper.as_deref(),
        )?;
        if !matches {
            warn!(tenant = %tenant.slug, user_id = %credential.user_id, "login attempt with wrong secret");
            return Err(KehilaError::InvalidCredentials);
        }

        if credential.invalidated {
            warn!(tenant = %tenant.slug, user_id = %credential.user_id, "login attempt on invalidated credential");
            return Err(KehilaError::InvalidCredentials);
        }

        let user = with_deadline(
            self.config.store_timeout,
            self.users.get_by_id(tenant.id, credential.user_id),
        )
        .await
        .map_err(|e| match e {
            KehilaError::NotFound { .. } => KehilaError::InvalidCredentials,
            other => other,
        })?;

        if user.status != UserStatus::Active {
            warn!(tenant = %tenant.slug, user_id = %user.id, "login attempt by inactive user");
            return Err(KehilaError::InvalidCredentials);
        }

        let raw_token = token::generate_session_token();
        let expires_at =
            Utc::now() + ChronoDuration::seconds(self.config.session_lifetime_secs as i64);

        let session = with_deadline(
            self.config.store_timeout,
            self.sessions.create(CreateSession {
                tenant_id: tenant.id,
                user_id: user.id,
                role: user.role,
                token_hash: token::hash_session_token(&raw_token),
                ip_address: input.ip_address,
                user_agent: input.user_agent,
                expires_at,
            }),
        )
        .await?;

        let access_token =
            token::issue_access_token(user.id, tenant.id, user.role, &self.config)
                .map_err(KehilaError::from)?;

        info!(
            tenant = %tenant.slug,
            user_id = %user.id,
            session_id = %session.id,
            role = %user.role,
            "login succeeded"
        );

        Ok(LoginOutput {
            session_token: raw_token,
            session_id: session.id,
            access_token,
            user_id: user.id,
            role: user.role,
            expires_at: session.expires_at,
        })
    }

    /// Invalidate the session identified by its raw token. Idempotent —
    /// logging out an absent or already-revoked session succeeds.
    pub async fn logout(&self, tenant_id: Uuid, raw_token: &str) -> KehilaResult<()> {
        let token_hash = token::hash_session_token(raw_token);
        with_deadline(
            self.config.store_timeout,
            self.sessions
                .invalidate_by_token_hash(tenant_id, &token_hash),
        )
        .await?;
        info!(%tenant_id, "session logged out");
        Ok(())
    }

    /// Forced logout: invalidate every session the user holds in this
    /// tenant. Password changes and account deactivation call this.
    pub async fn revoke_all_sessions(&self, tenant_id: Uuid, user_id: Uuid) -> KehilaResult<()> {
        with_deadline(
            self.config.store_timeout,
            self.sessions.invalidate_user_sessions(tenant_id, user_id),
        )
        .await?;
        info!(%tenant_id, %user_id, "all sessions revoked for user");
        Ok(())
    }

    pub fn registry(&self) -> &TenantRegistry<T> {
        &self.registry
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

//! Error types for the KEHILA system.
//!
//! Internal components return distinct variants so the HTTP layer can
//! choose the right external signal; handlers never surface store-level
//! detail to clients.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KehilaError {
    #[error("tenant not found: {slug}")]
    TenantNotFound { slug: String },

    #[error("tenant is suspended: {slug}")]
    TenantSuspended { slug: String },

    /// Login failed. Deliberately covers both "unknown identifier" and
    /// "wrong secret" so callers cannot enumerate accounts.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Session missing, expired, or bound to a different tenant.
    #[error("session invalid")]
    SessionInvalid,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    /// No credential artifact was present on the request.
    #[error("no credential artifact supplied")]
    MissingCredentials,

    /// External identity verified but no local user exists for the
    /// claimed tenant.
    #[error("user not provisioned for tenant: subject {subject}")]
    UserNotProvisioned { subject: String },

    #[error("access denied")]
    Forbidden,

    /// Backing store timed out or errored; validation fails closed.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("database error: {0}")]
    Database(String),

    #[error("cryptography error: {0}")]
    Crypto(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type KehilaResult<T> = Result<T, KehilaError>;

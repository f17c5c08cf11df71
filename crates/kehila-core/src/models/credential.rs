//! Credential domain model.
//!
//! Credentials hold the hashed login secret for a user. The raw secret is
//! never persisted. `(tenant_id, identifier)` is unique — no two users in
//! the same tenant share a phone number or email.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What kind of identifier the credential is keyed by: residents log in
/// with a phone number, administrators with an email address.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum IdentifierKind {
    Phone,
    Email,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub kind: IdentifierKind,
    pub identifier: String,
    /// Argon2id PHC-format hash.
    pub secret_hash: String,
    /// Soft invalidation preserves the audit trail; an invalidated
    /// credential never authenticates.
    pub invalidated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCredential {
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub kind: IdentifierKind,
    pub identifier: String,
    /// Raw secret (hashed with Argon2id before storage).
    pub secret: String,
}

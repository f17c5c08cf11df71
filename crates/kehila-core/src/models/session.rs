//! Session domain model.
//!
//! A session is the stateful, revocable proof of authentication. The
//! client holds the raw opaque token; only its SHA-256 hash is stored.
//! Lifecycle: Created, then Expired or Invalidated — terminal either way.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::role::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    /// Role captured at login time, scoped to this tenant.
    pub role: Role,
    pub token_hash: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub role: Role,
    pub token_hash: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub expires_at: DateTime<Utc>,
}

//! User domain model.
//!
//! The role is stored per `(tenant, user)` — a user provisioned in two
//! tenants holds an independent role in each.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::role::Role;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub display_name: String,
    pub role: Role,
    pub status: UserStatus,
    /// Subject id issued by an external identity provider, when the user
    /// authenticates through one. Mapped during external-token validation.
    pub external_subject: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub tenant_id: Uuid,
    pub display_name: String,
    pub role: Role,
    pub external_subject: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUser {
    pub display_name: Option<String>,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub external_subject: Option<Option<String>>,
}

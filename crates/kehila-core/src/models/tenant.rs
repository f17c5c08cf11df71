//! Tenant domain model.
//!
//! Tenants provide full data isolation: all domain entities (users,
//! credentials, sessions) are scoped to a tenant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TenantStatus {
    Active,
    Suspended,
}

/// A tenant is one isolated community namespace.
///
/// Tenants are created by an administrative provisioning action and are
/// soft-suspended rather than deleted while referencing data exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    /// Human-readable name.
    pub name: String,
    /// URL-safe unique identifier (e.g., `beresheet`), used as the
    /// routable tenant claim.
    pub slug: String,
    /// Data namespace identifier for tenant-scoped storage.
    pub schema_name: String,
    pub status: TenantStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    pub name: String,
    pub slug: String,
    pub schema_name: String,
}

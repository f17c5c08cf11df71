//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Tenant-scoped repositories
//! require a `tenant_id` parameter to enforce data isolation — there is
//! deliberately no way to look up a credential or session without naming
//! the tenant it belongs to.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::KehilaResult;
use crate::models::{
    credential::{CreateCredential, Credential},
    session::{CreateSession, Session},
    tenant::{CreateTenant, Tenant, TenantStatus},
    user::{CreateUser, UpdateUser, User},
};

// ---------------------------------------------------------------------------
// Tenant (global scope)
// ---------------------------------------------------------------------------

pub trait TenantRepository: Send + Sync {
    fn create(&self, input: CreateTenant) -> impl Future<Output = KehilaResult<Tenant>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = KehilaResult<Tenant>> + Send;
    fn get_by_slug(&self, slug: &str) -> impl Future<Output = KehilaResult<Tenant>> + Send;
    /// Soft-suspend or reactivate. Tenants are never deleted while
    /// referencing data exists.
    fn set_status(
        &self,
        id: Uuid,
        status: TenantStatus,
    ) -> impl Future<Output = KehilaResult<Tenant>> + Send;
}

// ---------------------------------------------------------------------------
// Tenant-scoped repositories
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = KehilaResult<User>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = KehilaResult<User>> + Send;
    /// Look up the local user record mapped to an external provider
    /// subject id.
    fn get_by_external_subject(
        &self,
        tenant_id: Uuid,
        subject: &str,
    ) -> impl Future<Output = KehilaResult<User>> + Send;
    fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = KehilaResult<User>> + Send;
}

pub trait CredentialRepository: Send + Sync {
    fn create(
        &self,
        input: CreateCredential,
    ) -> impl Future<Output = KehilaResult<Credential>> + Send;
    /// Look up a credential by its login identifier (phone or email).
    fn get_by_identifier(
        &self,
        tenant_id: Uuid,
        identifier: &str,
    ) -> impl Future<Output = KehilaResult<Credential>> + Send;
    /// Rotate the stored secret (password change). Takes the raw secret
    /// and hashes it before storage.
    fn update_secret(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        secret: &str,
    ) -> impl Future<Output = KehilaResult<Credential>> + Send;
    /// Soft-invalidate; the record is kept for the audit trail.
    fn invalidate(&self, tenant_id: Uuid, id: Uuid)
    -> impl Future<Output = KehilaResult<()>> + Send;
}

pub trait SessionRepository: Send + Sync {
    /// Insert a new session. The store's unique index on
    /// `(tenant_id, token_hash)` guarantees no two concurrent logins can
    /// share a token.
    fn create(&self, input: CreateSession) -> impl Future<Output = KehilaResult<Session>> + Send;
    fn get_by_token_hash(
        &self,
        tenant_id: Uuid,
        token_hash: &str,
    ) -> impl Future<Output = KehilaResult<Session>> + Send;
    /// Atomic compare-and-delete by token hash. Deleting an absent
    /// session is not an error (logout is idempotent).
    fn invalidate_by_token_hash(
        &self,
        tenant_id: Uuid,
        token_hash: &str,
    ) -> impl Future<Output = KehilaResult<()>> + Send;
    /// Invalidate all sessions for a user (forced logout, password change).
    fn invalidate_user_sessions(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = KehilaResult<()>> + Send;
    /// Push out the expiry of a live session (sliding refresh).
    fn extend(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> impl Future<Output = KehilaResult<Session>> + Send;
    /// Remove all expired sessions; returns how many were deleted.
    fn cleanup_expired(&self, tenant_id: Uuid) -> impl Future<Output = KehilaResult<u64>> + Send;
}

//! Integration tests for the repository implementations using in-memory
//! SurrealDB.

use chrono::{Duration, Utc};
use kehila_core::models::credential::{CreateCredential, IdentifierKind};
use kehila_core::models::role::Role;
use kehila_core::models::session::CreateSession;
use kehila_core::models::tenant::{CreateTenant, TenantStatus};
use kehila_core::models::user::{CreateUser, UpdateUser, UserStatus};
use kehila_core::repository::{
    CredentialRepository, SessionRepository, TenantRepository, UserRepository,
};
use kehila_db::repository::{
    SurrealCredentialRepository, SurrealSessionRepository, SurrealTenantRepository,
    SurrealUserRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    kehila_db::run_migrations(&db).await.unwrap();
    db
}

fn tenant_input(slug: &str) -> CreateTenant {
    CreateTenant {
        name: format!("Community {slug}"),
        slug: slug.into(),
        schema_name: format!("tenant_{}", slug.replace('-', "_")),
    }
}

fn user_input(tenant_id: Uuid, role: Role) -> CreateUser {
    CreateUser {
        tenant_id,
        display_name: "Dana Levi".into(),
        role,
        external_subject: None,
        metadata: None,
    }
}

// -----------------------------------------------------------------------
// Tenant tests
// -----------------------------------------------------------------------

#[tokio::test]
async fn create_and_get_tenant() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    let tenant = repo.create(tenant_input("beresheet")).await.unwrap();
    assert_eq!(tenant.slug, "beresheet");
    assert_eq!(tenant.status, TenantStatus::Active);

    let fetched = repo.get_by_id(tenant.id).await.unwrap();
    assert_eq!(fetched.id, tenant.id);
    assert_eq!(fetched.schema_name, "tenant_beresheet");
}

#[tokio::test]
async fn get_tenant_by_slug() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    let tenant = repo.create(tenant_input("slug-test")).await.unwrap();

    let fetched = repo.get_by_slug("slug-test").await.unwrap();
    assert_eq!(fetched.id, tenant.id);

    let missing = repo.get_by_slug("no-such-home").await;
    assert!(missing.is_err(), "unknown slug should not resolve");
}

#[tokio::test]
async fn tenant_slug_is_unique() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    repo.create(tenant_input("dup")).await.unwrap();
    let second = repo.create(tenant_input("dup")).await;
    assert!(second.is_err(), "duplicate slug should be rejected");
}

#[tokio::test]
async fn suspend_and_reactivate_tenant() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    let tenant = repo.create(tenant_input("suspend-me")).await.unwrap();

    let suspended = repo
        .set_status(tenant.id, TenantStatus::Suspended)
        .await
        .unwrap();
    assert_eq!(suspended.status, TenantStatus::Suspended);

    let reactivated = repo
        .set_status(tenant.id, TenantStatus::Active)
        .await
        .unwrap();
    assert_eq!(reactivated.status, TenantStatus::Active);
}

// -----------------------------------------------------------------------
// User tests
// -----------------------------------------------------------------------

#[tokio::test]
async fn create_and_get_user() {
    let db = setup().await;
    let tenants = SurrealTenantRepository::new(db.clone());
    let users = SurrealUserRepository::new(db);

    let tenant = tenants.create(tenant_input("users")).await.unwrap();
    let user = users
        .create(user_input(tenant.id, Role::Resident))
        .await
        .unwrap();

    assert_eq!(user.role, Role::Resident);
    assert_eq!(user.status, UserStatus::Active);

    let fetched = users.get_by_id(tenant.id, user.id).await.unwrap();
    assert_eq!(fetched.display_name, "Dana Levi");
}

#[tokio::test]
async fn user_lookup_is_tenant_scoped() {
    let db = setup().await;
    let tenants = SurrealTenantRepository::new(db.clone());
    let users = SurrealUserRepository::new(db);

    let home_a = tenants.create(tenant_input("home-a")).await.unwrap();
    let home_b = tenants.create(tenant_input("home-b")).await.unwrap();

    let user = users
        .create(user_input(home_a.id, Role::Staff))
        .await
        .unwrap();

    // A tenant-B scoped lookup of a tenant-A user must miss.
    let cross = users.get_by_id(home_b.id, user.id).await;
    assert!(cross.is_err());
}

#[tokio::test]
async fn get_user_by_external_subject() {
    let db = setup().await;
    let tenants = SurrealTenantRepository::new(db.clone());
    let users = SurrealUserRepository::new(db);

    let tenant = tenants.create(tenant_input("external")).await.unwrap();
    let user = users
        .create(CreateUser {
            external_subject: Some("provider-uid-123".into()),
            ..user_input(tenant.id, Role::Resident)
        })
        .await
        .unwrap();

    let fetched = users
        .get_by_external_subject(tenant.id, "provider-uid-123")
        .await
        .unwrap();
    assert_eq!(fetched.id, user.id);

    let missing = users
        .get_by_external_subject(tenant.id, "provider-uid-999")
        .await;
    assert!(missing.is_err());
}

#[tokio::test]
async fn update_user_role_and_status() {
    let db = setup().await;
    let tenants = SurrealTenantRepository::new(db.clone());
    let users = SurrealUserRepository::new(db);

    let tenant = tenants.create(tenant_input("promote")).await.unwrap();
    let user = users
        .create(user_input(tenant.id, Role::Resident))
        .await
        .unwrap();

    let updated = users
        .update(
            tenant.id,
            user.id,
            UpdateUser {
                role: Some(Role::Staff),
                status: Some(UserStatus::Inactive),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.role, Role::Staff);
    assert_eq!(updated.status, UserStatus::Inactive);
    assert_eq!(updated.display_name, "Dana Levi"); // unchanged
}

// -----------------------------------------------------------------------
// Credential tests
// -----------------------------------------------------------------------

#[tokio::test]
async fn create_credential_hashes_secret() {
    let db = setup().await;
    let tenants = SurrealTenantRepository::new(db.clone());
    let users = SurrealUserRepository::new(db.clone());
    let credentials = SurrealCredentialRepository::new(db);

    let tenant = tenants.create(tenant_input("creds")).await.unwrap();
    let user = users
        .create(user_input(tenant.id, Role::Resident))
        .await
        .unwrap();

    let credential = credentials
        .create(CreateCredential {
            tenant_id: tenant.id,
            user_id: user.id,
            kind: IdentifierKind::Phone,
            identifier: "+972501234567".into(),
            secret: "hunter2".into(),
        })
        .await
        .unwrap();

    assert_ne!(credential.secret_hash, "hunter2");
    assert!(credential.secret_hash.starts_with("$argon2id$"));
    assert!(!credential.invalidated);
}

#[tokio::test]
async fn credential_identifier_unique_per_tenant() {
    let db = setup().await;
    let tenants = SurrealTenantRepository::new(db.clone());
    let users = SurrealUserRepository::new(db.clone());
    let credentials = SurrealCredentialRepository::new(db);

    let home_a = tenants.create(tenant_input("cred-a")).await.unwrap();
    let home_b = tenants.create(tenant_input("cred-b")).await.unwrap();
    let user_a = users
        .create(user_input(home_a.id, Role::Resident))
        .await
        .unwrap();
    let user_b = users
        .create(user_input(home_b.id, Role::Resident))
        .await
        .unwrap();

    let input = |tenant_id, user_id| CreateCredential {
        tenant_id,
        user_id,
        kind: IdentifierKind::Phone,
        identifier: "+972501234567".into(),
        secret: "pw".into(),
    };

    credentials.create(input(home_a.id, user_a.id)).await.unwrap();

    // Same identifier in another tenant is fine.
    credentials.create(input(home_b.id, user_b.id)).await.unwrap();

    // Same identifier in the same tenant is not.
    let dup = credentials.create(input(home_a.id, user_a.id)).await;
    assert!(dup.is_err());
}

#[tokio::test]
async fn update_secret_clears_invalidation() {
    let db = setup().await;
    let tenants = SurrealTenantRepository::new(db.clone());
    let users = SurrealUserRepository::new(db.clone());
    let credentials = SurrealCredentialRepository::new(db);

    let tenant = tenants.create(tenant_input("rotate")).await.unwrap();
    let user = users
        .create(user_input(tenant.id, Role::Resident))
        .await
        .unwrap();

    let credential = credentials
        .create(CreateCredential {
            tenant_id: tenant.id,
            user_id: user.id,
            kind: IdentifierKind::Email,
            identifier: "dana@example.com".into(),
            secret: "old-secret".into(),
        })
        .await
        .unwrap();

    credentials.invalidate(tenant.id, credential.id).await.unwrap();
    let invalidated = credentials
        .get_by_identifier(tenant.id, "dana@example.com")
        .await
        .unwrap();
    assert!(invalidated.invalidated);

    let rotated = credentials
        .update_secret(tenant.id, credential.id, "new-secret")
        .await
        .unwrap();
    assert!(!rotated.invalidated);
    assert_ne!(rotated.secret_hash, credential.secret_hash);
}

// -----------------------------------------------------------------------
// Session tests
// -----------------------------------------------------------------------

fn session_input(tenant_id: Uuid, user_id: Uuid, token_hash: &str) -> CreateSession {
    CreateSession {
        tenant_id,
        user_id,
        role: Role::Resident,
        token_hash: token_hash.into(),
        ip_address: Some("10.0.0.1".into()),
        user_agent: None,
        expires_at: Utc::now() + Duration::hours(8),
    }
}

#[tokio::test]
async fn create_and_find_session_by_token_hash() {
    let db = setup().await;
    let sessions = SurrealSessionRepository::new(db);
    let tenant_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let session = sessions
        .create(session_input(tenant_id, user_id, "hash-1"))
        .await
        .unwrap();
    assert_eq!(session.role, Role::Resident);

    let fetched = sessions
        .get_by_token_hash(tenant_id, "hash-1")
        .await
        .unwrap();
    assert_eq!(fetched.id, session.id);
    assert_eq!(fetched.user_id, user_id);
}

#[tokio::test]
async fn session_lookup_is_tenant_scoped() {
    let db = setup().await;
    let sessions = SurrealSessionRepository::new(db);
    let tenant_a = Uuid::new_v4();
    let tenant_b = Uuid::new_v4();

    sessions
        .create(session_input(tenant_a, Uuid::new_v4(), "shared-hash"))
        .await
        .unwrap();

    let cross = sessions.get_by_token_hash(tenant_b, "shared-hash").await;
    assert!(cross.is_err(), "session must not resolve under another tenant");
}

#[tokio::test]
async fn invalidate_by_token_hash_is_idempotent() {
    let db = setup().await;
    let sessions = SurrealSessionRepository::new(db);
    let tenant_id = Uuid::new_v4();

    sessions
        .create(session_input(tenant_id, Uuid::new_v4(), "bye"))
        .await
        .unwrap();

    sessions
        .invalidate_by_token_hash(tenant_id, "bye")
        .await
        .unwrap();
    assert!(sessions.get_by_token_hash(tenant_id, "bye").await.is_err());

    // Second invalidation of the same hash is still Ok.
    sessions
        .invalidate_by_token_hash(tenant_id, "bye")
        .await
        .unwrap();
}

#[tokio::test]
async fn invalidate_user_sessions_removes_all() {
    let db = setup().await;
    let sessions = SurrealSessionRepository::new(db);
    let tenant_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    sessions
        .create(session_input(tenant_id, user_id, "h1"))
        .await
        .unwrap();
    sessions
        .create(session_input(tenant_id, user_id, "h2"))
        .await
        .unwrap();

    sessions
        .invalidate_user_sessions(tenant_id, user_id)
        .await
        .unwrap();

    assert!(sessions.get_by_token_hash(tenant_id, "h1").await.is_err());
    assert!(sessions.get_by_token_hash(tenant_id, "h2").await.is_err());
}

#[tokio::test]
async fn extend_pushes_out_expiry() {
    let db = setup().await;
    let sessions = SurrealSessionRepository::new(db);
    let tenant_id = Uuid::new_v4();

    let session = sessions
        .create(session_input(tenant_id, Uuid::new_v4(), "extend-me"))
        .await
        .unwrap();

    let new_expiry = Utc::now() + Duration::hours(16);
    let extended = sessions
        .extend(tenant_id, session.id, new_expiry)
        .await
        .unwrap();
    assert!(extended.expires_at > session.expires_at);
}

#[tokio::test]
async fn cleanup_expired_only_removes_stale_sessions() {
    let db = setup().await;
    let sessions = SurrealSessionRepository::new(db);
    let tenant_id = Uuid::new_v4();

    let mut stale = session_input(tenant_id, Uuid::new_v4(), "stale");
    stale.expires_at = Utc::now() - Duration::hours(1);
    sessions.create(stale).await.unwrap();
    sessions
        .create(session_input(tenant_id, Uuid::new_v4(), "fresh"))
        .await
        .unwrap();

    let removed = sessions.cleanup_expired(tenant_id).await.unwrap();
    assert_eq!(removed, 1);

    assert!(sessions.get_by_token_hash(tenant_id, "stale").await.is_err());
    assert!(sessions.get_by_token_hash(tenant_id, "fresh").await.is_ok());
}

#[tokio::test]
async fn cleanup_expired_count_reflects_deleted_rows() {
    let db = setup().await;
    let sessions = SurrealSessionRepository::new(db);
    let tenant_id = Uuid::new_v4();

    for hash in ["stale-1", "stale-2", "stale-3"] {
        let mut stale = session_input(tenant_id, Uuid::new_v4(), hash);
        stale.expires_at = Utc::now() - Duration::minutes(5);
        sessions.create(stale).await.unwrap();
    }

    assert_eq!(sessions.cleanup_expired(tenant_id).await.unwrap(), 3);

    // Nothing left to reap; the count comes from the delete itself.
    assert_eq!(sessions.cleanup_expired(tenant_id).await.unwrap(), 0);
}

//! SurrealDB implementation of [`CredentialRepository`].
//!
//! Secret hashing uses Argon2id with OWASP-recommended parameters
//! (memory: 19 MiB, iterations: 2, parallelism: 1). Salt is randomly
//! generated per hash. An optional pepper (server-side secret) can be
//! provided at construction time and must match the pepper the auth
//! layer verifies with.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use chrono::{DateTime, Utc};
use kehila_core::error::KehilaResult;
use kehila_core::models::credential::{CreateCredential, Credential, IdentifierKind};
use kehila_core::repository::CredentialRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct CredentialRow {
    tenant_id: String,
    user_id: String,
    kind: String,
    identifier: String,
    secret_hash: String,
    invalidated: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct CredentialRowWithId {
    record_id: String,
    tenant_id: String,
    user_id: String,
    kind: String,
    identifier: String,
    secret_hash: String,
    invalidated: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_kind(s: &str) -> Result<IdentifierKind, DbError> {
    match s {
        "Phone" => Ok(IdentifierKind::Phone),
        "Email" => Ok(IdentifierKind::Email),
        other => Err(DbError::Migration(format!(
            "unknown identifier kind: {other}"
        ))),
    }
}

fn kind_to_string(k: IdentifierKind) -> &'static str {
    match k {
        IdentifierKind::Phone => "Phone",
        IdentifierKind::Email => "Email",
    }
}

impl CredentialRow {
    fn into_credential(self, id: Uuid) -> Result<Credential, DbError> {
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Migration(format!("invalid tenant UUID: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Migration(format!("invalid user UUID: {e}")))?;
        Ok(Credential {
            id,
            tenant_id,
            user_id,
            kind: parse_kind(&self.kind)?,
            identifier: self.identifier,
            secret_hash: self.secret_hash,
            invalidated: self.invalidated,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl CredentialRowWithId {
    fn try_into_credential(self) -> Result<Credential, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Migration(format!("invalid tenant UUID: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Migration(format!("invalid user UUID: {e}")))?;
        Ok(Credential {
            id,
            tenant_id,
            user_id,
            kind: parse_kind(&self.kind)?,
            identifier: self.identifier,
            secret_hash: self.secret_hash,
            invalidated: self.invalidated,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Hash a secret with Argon2id using OWASP-recommended parameters.
///
/// If a pepper is provided, it is prepended to the secret before
/// hashing. The salt is randomly generated for each call.
fn hash_secret(secret: &str, pepper: Option<&str>) -> Result<String, DbError> {
    // OWASP ASVS recommended: m=19456 (19 MiB), t=2, p=1
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| DbError::Migration(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{secret}");
            peppered.as_bytes()
        }
        None => secret.as_bytes(),
    };

    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = argon2
        .hash_password(input, &salt)
        .map_err(|e| DbError::Migration(format!("secret hash error: {e}")))?;

    Ok(hash.to_string())
}

/// SurrealDB implementation of the Credential repository.
#[derive(Clone)]
pub struct SurrealCredentialRepository<C: Connection> {
    db: Surreal<C>,
    /// Optional server-side pepper for secret hashing.
    pepper: Option<String>,
}

impl<C: Connection> SurrealCredentialRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db, pepper: None }
    }

    pub fn with_pepper(db: Surreal<C>, pepper: String) -> Self {
        Self {
            db,
            pepper: Some(pepper),
        }
    }
}

impl<C: Connection> CredentialRepository for SurrealCredentialRepository<C> {
    async fn create(&self, input: CreateCredential) -> KehilaResult<Credential> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let secret_hash = hash_secret(&input.secret, self.pepper.as_deref())?;

        let result = self
            .db
            .query(
                "CREATE type::record('credential', $id) SET \
                 tenant_id = $tenant_id, \
                 user_id = $user_id, \
                 kind = $kind, \
                 identifier = $identifier, \
                 secret_hash = $secret_hash, \
                 invalidated = false",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("kind", kind_to_string(input.kind).to_string()))
            .bind(("identifier", input.identifier))
            .bind(("secret_hash", secret_hash))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<CredentialRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "credential".into(),
            id: id_str,
        })?;

        Ok(row.into_credential(id)?)
    }

    async fn get_by_identifier(&self, tenant_id: Uuid, identifier: &str) -> KehilaResult<Credential> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM credential \
                 WHERE tenant_id = $tenant_id \
                 AND identifier = $identifier",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("identifier", identifier.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CredentialRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "credential".into(),
            id: format!("identifier={identifier}"),
        })?;

        Ok(row.try_into_credential()?)
    }

    async fn update_secret(&self, tenant_id: Uuid, id: Uuid, secret: &str) -> KehilaResult<Credential> {
        let id_str = id.to_string();
        let secret_hash = hash_secret(secret, self.pepper.as_deref())?;

        let result = self
            .db
            .query(
                "UPDATE type::record('credential', $id) SET \
                 secret_hash = $secret_hash, \
                 invalidated = false, \
                 updated_at = time::now() \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("secret_hash", secret_hash))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<CredentialRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "credential".into(),
            id: id_str,
        })?;

        Ok(row.into_credential(id)?)
    }

    async fn invalidate(&self, tenant_id: Uuid, id: Uuid) -> KehilaResult<()> {
        self.db
            .query(
                "UPDATE type::record('credential', $id) SET \
                 invalidated = true, updated_at = time::now() \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}

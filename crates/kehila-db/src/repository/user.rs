//! SurrealDB implementation of [`UserRepository`].

use chrono::{DateTime, Utc};
use kehila_core::error::KehilaResult;
use kehila_core::models::role::Role;
use kehila_core::models::user::{CreateUser, UpdateUser, User, UserStatus};
use kehila_core::repository::UserRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct UserRow {
    tenant_id: String,
    display_name: String,
    role: String,
    status: String,
    external_subject: Option<String>,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct UserRowWithId {
    record_id: String,
    tenant_id: String,
    display_name: String,
    role: String,
    status: String,
    external_subject: Option<String>,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_status(s: &str) -> Result<UserStatus, DbError> {
    match s {
        "Active" => Ok(UserStatus::Active),
        "Inactive" => Ok(UserStatus::Inactive),
        other => Err(DbError::Migration(format!("unknown user status: {other}"))),
    }
}

fn status_to_string(s: UserStatus) -> &'static str {
    match s {
        UserStatus::Active => "Active",
        UserStatus::Inactive => "Inactive",
    }
}

fn parse_role(s: &str) -> Result<Role, DbError> {
    s.parse()
        .map_err(|_| DbError::Migration(format!("unknown role: {s}")))
}

impl UserRow {
    fn into_user(self, id: Uuid) -> Result<User, DbError> {
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Migration(format!("invalid tenant UUID: {e}")))?;
        Ok(User {
            id,
            tenant_id,
            display_name: self.display_name,
            role: parse_role(&self.role)?,
            status: parse_status(&self.status)?,
            external_subject: self.external_subject,
            metadata: self.metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl UserRowWithId {
    fn try_into_user(self) -> Result<User, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Migration(format!("invalid tenant UUID: {e}")))?;
        Ok(User {
            id,
            tenant_id,
            display_name: self.display_name,
            role: parse_role(&self.role)?,
            status: parse_status(&self.status)?,
            external_subject: self.external_subject,
            metadata: self.metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the User repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, input: CreateUser) -> KehilaResult<User> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let metadata = input
            .metadata
            .unwrap_or(serde_json::Value::Object(Default::default()));

        let result = self
            .db
            .query(
                "CREATE type::record('user', $id) SET \
                 tenant_id = $tenant_id, \
                 display_name = $display_name, \
                 role = $role, \
                 status = $status, \
                 external_subject = $external_subject, \
                 metadata = $metadata",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("display_name", input.display_name))
            .bind(("role", input.role.as_str().to_string()))
            .bind(("status", "Active".to_string()))
            .bind(("external_subject", input.external_subject))
            .bind(("metadata", metadata))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn get_by_id(&self, tenant_id: Uuid, id: Uuid) -> KehilaResult<User> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('user', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn get_by_external_subject(&self, tenant_id: Uuid, subject: &str) -> KehilaResult<User> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE tenant_id = $tenant_id \
                 AND external_subject = $subject",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("subject", subject.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: format!("external_subject={subject}"),
        })?;

        Ok(row.try_into_user()?)
    }

    async fn update(&self, tenant_id: Uuid, id: Uuid, input: UpdateUser) -> KehilaResult<User> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.display_name.is_some() {
            sets.push("display_name = $display_name");
        }
        if input.role.is_some() {
            sets.push("role = $role");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.external_subject.is_some() {
            sets.push("external_subject = $external_subject");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('user', $id) SET {} \
             WHERE tenant_id = $tenant_id",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()));

        if let Some(display_name) = input.display_name {
            builder = builder.bind(("display_name", display_name));
        }
        if let Some(role) = input.role {
            builder = builder.bind(("role", role.as_str().to_string()));
        }
        if let Some(status) = input.status {
            builder = builder.bind(("status", status_to_string(status).to_string()));
        }
        if let Some(external_subject) = input.external_subject {
            // external_subject is Option<Option<String>>:
            // Some(Some(v)) = set, Some(None) = clear
            builder = builder.bind(("external_subject", external_subject));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }
}

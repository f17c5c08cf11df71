//! SurrealDB connection management.

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::error::DbError;

/// Connection settings for the SurrealDB backing store.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// WebSocket endpoint, host and port only (e.g. `127.0.0.1:8000`).
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "kehila".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

/// Owns the database handle for the lifetime of the process.
///
/// Repositories hold their own clone of the client; `DbManager` exists
/// so startup has one place to connect, select the namespace, and probe
/// the store before serving traffic.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Connect and authenticate as root, then select the configured
    /// namespace and database.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        let db = Surreal::new::<Ws>(&config.url).await?;

        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "connected to SurrealDB"
        );

        Ok(Self { db })
    }

    /// Round-trip a trivial query. Used at startup to fail fast when the
    /// store is unreachable despite a successful handshake.
    pub async fn ping(&self) -> Result<(), DbError> {
        self.db.query("RETURN 1").await?.check()?;
        Ok(())
    }

    pub fn client(&self) -> &Surreal<Client> {
        &self.db
    }
}

//! Database-specific error types and conversions.

use kehila_core::error::KehilaError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for KehilaError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => KehilaError::NotFound { entity, id },
            other => KehilaError::Database(other.to_string()),
        }
    }
}

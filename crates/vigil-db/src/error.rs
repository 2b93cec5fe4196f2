//! Database-specific error types and conversions.

use vigil_core::error::VigilError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    /// A stored record failed to decode into its domain type.
    #[error("Corrupt record: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for VigilError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => VigilError::NotFound { entity, id },
            other => VigilError::Store(other.to_string()),
        }
    }
}

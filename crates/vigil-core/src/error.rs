//! Error types for the VIGIL system.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum VigilError {
    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("invalid status: {value}")]
    InvalidStatus { value: String },

    #[error("entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("incident {incident_id} is resolved and accepts no further updates")]
    TerminalState { incident_id: Uuid },

    /// Authorization denied. Deliberately carries no detail about the
    /// target, so a denial never reveals whether the entity exists.
    #[error("forbidden")]
    Forbidden,

    #[error("store error: {0}")]
    Store(String),
}

pub type VigilResult<T> = Result<T, VigilError>;

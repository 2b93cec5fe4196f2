//! Incident update domain model.
//!
//! One point on an incident's timeline. Updates are append-only:
//! immutable once created, never edited or reordered. The most recent
//! update's `status` is the incident's current status by construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::IncidentStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentUpdate {
    pub id: Uuid,
    pub incident_id: Uuid,
    pub message: String,
    pub status: IncidentStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields required to append a new incident update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIncidentUpdate {
    pub incident_id: Uuid,
    pub message: String,
    pub status: IncidentStatus,
}

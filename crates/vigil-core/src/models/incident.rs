//! Incident domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::{IncidentStatus, ServiceStatus};

/// A problem report against a single service.
///
/// `status` is the lifecycle position and is only ever changed by
/// appending an [`IncidentUpdate`](super::incident_update::IncidentUpdate)
/// carrying the new value. `impact` is the severity the incident
/// inflicts on its service while it remains open; the aggregator folds
/// it into the service's `current_status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    pub id: Uuid,
    pub service_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: IncidentStatus,
    pub impact: ServiceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new incident.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIncident {
    pub service_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: IncidentStatus,
    pub impact: ServiceStatus,
}

/// Fields that can be updated on an existing incident.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateIncident {
    pub status: Option<IncidentStatus>,
}

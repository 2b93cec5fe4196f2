//! Service domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::ServiceStatus;

/// A monitored service owned by exactly one organization.
///
/// `current_status` is normally derived from the service's open
/// incidents by the aggregator. An operator can override it manually;
/// `status_override` marks that state and is cleared by the next
/// incident-driven recomputation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub org_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub current_status: ServiceStatus,
    pub status_override: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateService {
    pub org_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub current_status: ServiceStatus,
}

/// Fields that can be updated on an existing service.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateService {
    pub name: Option<String>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub description: Option<Option<String>>,
    pub current_status: Option<ServiceStatus>,
    pub status_override: Option<bool>,
}

//! SurrealDB repository implementations.

mod incident;
mod incident_update;
mod organization;
mod service;
mod team_member;

pub use incident::SurrealIncidentRepository;
pub use incident_update::SurrealIncidentUpdateRepository;
pub use organization::SurrealOrganizationRepository;
pub use service::SurrealServiceRepository;
pub use team_member::SurrealTeamMemberRepository;

use uuid::Uuid;
use vigil_core::status::{IncidentStatus, ServiceStatus};

use crate::error::DbError;

pub(crate) fn parse_uuid(field: &str, s: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(s).map_err(|e| DbError::Decode(format!("invalid {field} UUID: {e}")))
}

pub(crate) fn parse_service_status(s: &str) -> Result<ServiceStatus, DbError> {
    s.parse()
        .map_err(|_| DbError::Decode(format!("unknown service status: {s}")))
}

pub(crate) fn parse_incident_status(s: &str) -> Result<IncidentStatus, DbError> {
    s.parse()
        .map_err(|_| DbError::Decode(format!("unknown incident status: {s}")))
}

//! Service status aggregation.
//!
//! Turns raw incident records into the status signal shown publicly:
//! a service is as unhealthy as the worst open incident against it,
//! and an organization is as unhealthy as its worst service.

use uuid::Uuid;

use crate::error::VigilResult;
use crate::models::service::{Service, UpdateService};
use crate::repository::{
    IncidentRepository, PaginatedResult, Pagination, ServiceRepository,
};
use crate::status::ServiceStatus;

/// Read-path aggregator.
///
/// Generic over repository implementations so the aggregation logic
/// has no dependency on the database crate.
pub struct StatusAggregator<S, I> {
    service_repo: S,
    incident_repo: I,
}

impl<S, I> StatusAggregator<S, I>
where
    S: ServiceRepository,
    I: IncidentRepository,
{
    pub fn new(service_repo: S, incident_repo: I) -> Self {
        Self {
            service_repo,
            incident_repo,
        }
    }

    /// Status derived from the service's open incidents:
    /// `Operational` with none open, otherwise the worst impact.
    pub async fn service_status(&self, service_id: Uuid) -> VigilResult<ServiceStatus> {
        self.service_repo.get_by_id(service_id).await?;
        derive_service_status(&self.incident_repo, service_id).await
    }

    /// Organization-wide rollup: worst `current_status` across the
    /// organization's services. Never persisted; an organization with
    /// no services is `Operational`.
    pub async fn org_status(&self, org_id: Uuid) -> VigilResult<ServiceStatus> {
        let services = self.service_repo.list_by_org(org_id).await?;
        Ok(ServiceStatus::worst_of(
            services.into_iter().map(|s| s.current_status),
        ))
    }

    /// Public status feed: services ordered newest first, optionally
    /// scoped to one organization. No authorization required.
    pub async fn list_services(
        &self,
        org_id: Option<Uuid>,
        pagination: Pagination,
    ) -> VigilResult<PaginatedResult<Service>> {
        self.service_repo.list(org_id, pagination).await
    }

    /// Recompute and persist the service's status from its open
    /// incidents, clearing any manual override.
    pub async fn recompute(&self, service_id: Uuid) -> VigilResult<Service> {
        recompute_service(&self.service_repo, &self.incident_repo, service_id).await
    }
}

/// Worst open-incident impact for a service, `Operational` when none
/// are open.
pub(crate) async fn derive_service_status<I>(
    incident_repo: &I,
    service_id: Uuid,
) -> VigilResult<ServiceStatus>
where
    I: IncidentRepository,
{
    let open = incident_repo.list_open_by_service(service_id).await?;
    Ok(ServiceStatus::worst_of(open.into_iter().map(|i| i.impact)))
}

/// Write the derived status back to the service record. Any manual
/// override is cleared: an incident event always wins over an
/// operator-set status.
pub(crate) async fn recompute_service<S, I>(
    service_repo: &S,
    incident_repo: &I,
    service_id: Uuid,
) -> VigilResult<Service>
where
    S: ServiceRepository,
    I: IncidentRepository,
{
    let status = derive_service_status(incident_repo, service_id).await?;
    service_repo
        .update(
            service_id,
            UpdateService {
                current_status: Some(status),
                status_override: Some(false),
                ..Default::default()
            },
        )
        .await
}

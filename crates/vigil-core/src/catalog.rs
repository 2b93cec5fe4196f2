//! Administrative service management.
//!
//! The write surface behind the admin dashboard: creating and editing
//! services, manual status overrides, and service deletion. All
//! operations pass the access policy gate.

use uuid::Uuid;

use crate::error::{VigilError, VigilResult};
use crate::models::service::{CreateService, Service, UpdateService};
use crate::policy::{Action, PolicyGate};
use crate::repository::{
    IncidentRepository, IncidentUpdateRepository, ServiceRepository, TeamMemberRepository,
};
use crate::status::ServiceStatus;

/// Input for creating a new service.
#[derive(Debug, Clone)]
pub struct CreateServiceInput {
    pub org_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Defaults to `Operational` when omitted.
    pub initial_status: Option<ServiceStatus>,
}

/// Editable fields of a service. Status changes go through
/// [`ServiceCatalog::set_service_status`] instead.
#[derive(Debug, Clone, Default)]
pub struct EditService {
    pub name: Option<String>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub description: Option<Option<String>>,
}

pub struct ServiceCatalog<S, I, U, M>
where
    M: TeamMemberRepository,
{
    service_repo: S,
    incident_repo: I,
    update_repo: U,
    gate: PolicyGate<M>,
}

impl<S, I, U, M> ServiceCatalog<S, I, U, M>
where
    S: ServiceRepository,
    I: IncidentRepository,
    U: IncidentUpdateRepository,
    M: TeamMemberRepository,
{
    pub fn new(service_repo: S, incident_repo: I, update_repo: U, member_repo: M) -> Self {
        Self {
            service_repo,
            incident_repo,
            update_repo,
            gate: PolicyGate::new(member_repo),
        }
    }

    pub async fn create_service(
        &self,
        actor: Option<Uuid>,
        input: CreateServiceInput,
    ) -> VigilResult<Service> {
        self.gate
            .authorize(actor, input.org_id, Action::CreateService)
            .await?;

        if input.name.trim().is_empty() {
            return Err(VigilError::Validation {
                message: "service name must not be empty".into(),
            });
        }

        self.service_repo
            .create(CreateService {
                org_id: input.org_id,
                name: input.name,
                description: input.description,
                current_status: input.initial_status.unwrap_or(ServiceStatus::Operational),
            })
            .await
    }

    pub async fn update_service(
        &self,
        actor: Option<Uuid>,
        service_id: Uuid,
        edit: EditService,
    ) -> VigilResult<Service> {
        let service = self.gated_service(actor, service_id, Action::UpdateService).await?;

        if let Some(name) = &edit.name
            && name.trim().is_empty()
        {
            return Err(VigilError::Validation {
                message: "service name must not be empty".into(),
            });
        }

        self.service_repo
            .update(
                service.id,
                UpdateService {
                    name: edit.name,
                    description: edit.description,
                    ..Default::default()
                },
            )
            .await
    }

    /// Manual status override.
    ///
    /// Writes `current_status` directly and marks the service as
    /// overridden. The override persists until the next incident event
    /// forces a recomputation, which clears it.
    pub async fn set_service_status(
        &self,
        actor: Option<Uuid>,
        service_id: Uuid,
        status: ServiceStatus,
    ) -> VigilResult<Service> {
        let service = self
            .gated_service(actor, service_id, Action::SetServiceStatus)
            .await?;

        self.service_repo
            .update(
                service.id,
                UpdateService {
                    current_status: Some(status),
                    status_override: Some(true),
                    ..Default::default()
                },
            )
            .await
    }

    /// Delete a service and everything referencing it.
    ///
    /// Cascades: each incident's timeline is removed first, then the
    /// incidents, then the service itself, so no orphaned rows remain
    /// at any step.
    pub async fn delete_service(&self, actor: Option<Uuid>, service_id: Uuid) -> VigilResult<()> {
        let service = self.gated_service(actor, service_id, Action::DeleteService).await?;

        let incidents = self.incident_repo.list_by_service(service.id).await?;
        for incident in incidents {
            self.update_repo.delete_by_incident(incident.id).await?;
            self.incident_repo.delete(incident.id).await?;
        }

        self.service_repo.delete(service.id).await
    }

    /// Resolve the service and authorize `action` against its
    /// organization. An absent actor is rejected before any store
    /// read.
    async fn gated_service(
        &self,
        actor: Option<Uuid>,
        service_id: Uuid,
        action: Action,
    ) -> VigilResult<Service> {
        if actor.is_none() {
            return Err(VigilError::Forbidden);
        }
        let service = self.service_repo.get_by_id(service_id).await?;
        self.gate.authorize(actor, service.org_id, action).await?;
        Ok(service)
    }
}

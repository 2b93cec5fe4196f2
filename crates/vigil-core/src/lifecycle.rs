//! Incident lifecycle engine.
//!
//! Enforces the incident state rules and keeps the append-only
//! timeline in lockstep with the incident record. Every mutation
//! passes the access policy gate first, and every mutation returns the
//! owning service's freshly recomputed state so callers never need a
//! follow-up read.

use uuid::Uuid;

use crate::aggregate::recompute_service;
use crate::error::{VigilError, VigilResult};
use crate::models::incident::{CreateIncident, Incident, UpdateIncident};
use crate::models::incident_update::{CreateIncidentUpdate, IncidentUpdate};
use crate::models::service::Service;
use crate::policy::{Action, PolicyGate};
use crate::repository::{
    IncidentRepository, IncidentUpdateRepository, ServiceRepository, TeamMemberRepository,
};
use crate::status::{IncidentStatus, ServiceStatus};

/// Input for reporting a new incident.
#[derive(Debug, Clone)]
pub struct ReportIncident {
    pub service_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Initial lifecycle state, conventionally `Investigating`.
    pub status: IncidentStatus,
    /// Severity the incident inflicts on the service while open.
    pub impact: ServiceStatus,
}

/// Input for appending an update to an existing incident.
#[derive(Debug, Clone)]
pub struct PostUpdate {
    pub incident_id: Uuid,
    pub message: String,
    pub new_status: IncidentStatus,
}

/// Result of a successful `report_incident`.
#[derive(Debug, Clone)]
pub struct IncidentReport {
    pub incident: Incident,
    pub first_update: IncidentUpdate,
    /// The owning service with its recomputed status.
    pub service: Service,
}

/// Result of a successful `post_update`.
#[derive(Debug, Clone)]
pub struct PostedUpdate {
    pub incident: Incident,
    pub update: IncidentUpdate,
    /// The owning service with its recomputed status.
    pub service: Service,
}

/// The write path for incidents.
///
/// Stateless between calls; all durable state lives behind the
/// repository traits, so concurrent operations need no in-core
/// locking. Two operators updating the same incident race on its
/// `status` field (last write wins) but both timeline entries are
/// always preserved.
pub struct IncidentEngine<S, I, U, M>
where
    M: TeamMemberRepository,
{
    service_repo: S,
    incident_repo: I,
    update_repo: U,
    gate: PolicyGate<M>,
}

impl<S, I, U, M> IncidentEngine<S, I, U, M>
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

    /// Report a new incident against a service.
    ///
    /// Creates the incident and appends the first timeline entry in
    /// one logical operation. If the append fails the incident row
    /// stays in place and the operation as a whole reports failure, so
    /// the caller can detect and retry.
    pub async fn report_incident(
        &self,
        actor: Option<Uuid>,
        input: ReportIncident,
    ) -> VigilResult<IncidentReport> {
        if actor.is_none() {
            return Err(VigilError::Forbidden);
        }
        if input.title.trim().is_empty() {
            return Err(VigilError::Validation {
                message: "incident title must not be empty".into(),
            });
        }

        let service = match self.service_repo.get_by_id(input.service_id).await {
            Ok(service) => service,
            Err(VigilError::NotFound { .. }) => {
                return Err(VigilError::Validation {
                    message: format!("service {} does not exist", input.service_id),
                });
            }
            Err(e) => return Err(e),
        };
        self.gate
            .authorize(actor, service.org_id, Action::ReportIncident)
            .await?;

        let message = format!(
            "Incident started: {}",
            input.description.as_deref().unwrap_or("")
        );
        let status = input.status;

        let incident = self
            .incident_repo
            .create(CreateIncident {
                service_id: input.service_id,
                title: input.title,
                description: input.description,
                status,
                impact: input.impact,
            })
            .await?;

        let first_update = self
            .update_repo
            .append(CreateIncidentUpdate {
                incident_id: incident.id,
                message,
                status,
            })
            .await?;

        let service =
            recompute_service(&self.service_repo, &self.incident_repo, incident.service_id).await?;

        Ok(IncidentReport {
            incident,
            first_update,
            service,
        })
    }

    /// Append an update to an incident's timeline and move its status.
    ///
    /// The timeline entry is written first; once it is durable the
    /// incident's `status` field must follow, so that write is retried
    /// once before a store failure is surfaced.
    pub async fn post_update(
        &self,
        actor: Option<Uuid>,
        input: PostUpdate,
    ) -> VigilResult<PostedUpdate> {
        if actor.is_none() {
            return Err(VigilError::Forbidden);
        }

        let incident = self.incident_repo.get_by_id(input.incident_id).await?;
        let service = self.service_repo.get_by_id(incident.service_id).await?;
        self.gate
            .authorize(actor, service.org_id, Action::PostUpdate)
            .await?;

        if incident.status.is_terminal() {
            return Err(VigilError::TerminalState {
                incident_id: incident.id,
            });
        }

        let update = self
            .update_repo
            .append(CreateIncidentUpdate {
                incident_id: incident.id,
                message: input.message,
                status: input.new_status,
            })
            .await?;

        let patch = UpdateIncident {
            status: Some(input.new_status),
        };
        let incident = match self.incident_repo.update(incident.id, patch.clone()).await {
            Ok(incident) => incident,
            Err(VigilError::Store(_)) => self.incident_repo.update(incident.id, patch).await?,
            Err(e) => return Err(e),
        };

        let service =
            recompute_service(&self.service_repo, &self.incident_repo, incident.service_id).await?;

        Ok(PostedUpdate {
            incident,
            update,
            service,
        })
    }

    /// Remove an incident and its entire timeline.
    ///
    /// Timeline rows are deleted before the incident so a partial
    /// failure can never orphan them. Returns the owning service with
    /// its recomputed status.
    pub async fn delete_incident(
        &self,
        actor: Option<Uuid>,
        incident_id: Uuid,
    ) -> VigilResult<Service> {
        if actor.is_none() {
            return Err(VigilError::Forbidden);
        }

        let incident = self.incident_repo.get_by_id(incident_id).await?;
        let service = self.service_repo.get_by_id(incident.service_id).await?;
        self.gate
            .authorize(actor, service.org_id, Action::DeleteIncident)
            .await?;

        self.update_repo.delete_by_incident(incident_id).await?;
        self.incident_repo.delete(incident_id).await?;

        recompute_service(&self.service_repo, &self.incident_repo, incident.service_id).await
    }
}

//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async and atomic at the
//! single-record level. The store offers no multi-statement
//! transactions to the core, so multi-record flows (incident plus
//! first timeline entry, cascade deletes) are explicit two-step
//! sequences owned by the engine, with the compensation rules
//! documented there.

use uuid::Uuid;

use crate::error::VigilResult;
use crate::models::{
    incident::{CreateIncident, Incident, UpdateIncident},
    incident_update::{CreateIncidentUpdate, IncidentUpdate},
    organization::{CreateOrganization, Organization},
    service::{CreateService, Service, UpdateService},
    team_member::{CreateTeamMember, TeamMember},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

pub trait OrganizationRepository: Send + Sync {
    fn create(
        &self,
        input: CreateOrganization,
    ) -> impl Future<Output = VigilResult<Organization>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = VigilResult<Organization>> + Send;
}

pub trait ServiceRepository: Send + Sync {
    fn create(&self, input: CreateService) -> impl Future<Output = VigilResult<Service>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = VigilResult<Service>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateService,
    ) -> impl Future<Output = VigilResult<Service>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = VigilResult<()>> + Send;

    /// List services, optionally filtered to one organization, ordered
    /// by `created_at` descending. This is the public status feed.
    fn list(
        &self,
        org_id: Option<Uuid>,
        pagination: Pagination,
    ) -> impl Future<Output = VigilResult<PaginatedResult<Service>>> + Send;

    /// All services owned by an organization, for the org-wide rollup.
    fn list_by_org(&self, org_id: Uuid) -> impl Future<Output = VigilResult<Vec<Service>>> + Send;
}

pub trait IncidentRepository: Send + Sync {
    fn create(&self, input: CreateIncident) -> impl Future<Output = VigilResult<Incident>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = VigilResult<Incident>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateIncident,
    ) -> impl Future<Output = VigilResult<Incident>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = VigilResult<()>> + Send;

    /// All incidents for a service, ordered by `created_at` descending.
    fn list_by_service(
        &self,
        service_id: Uuid,
    ) -> impl Future<Output = VigilResult<Vec<Incident>>> + Send;

    /// Incidents for a service whose status is not terminal.
    fn list_open_by_service(
        &self,
        service_id: Uuid,
    ) -> impl Future<Output = VigilResult<Vec<Incident>>> + Send;
}

/// Append-only: no update operation exists, and delete is only the
/// whole-timeline cascade used when the owning incident is removed.
pub trait IncidentUpdateRepository: Send + Sync {
    fn append(
        &self,
        input: CreateIncidentUpdate,
    ) -> impl Future<Output = VigilResult<IncidentUpdate>> + Send;

    /// The incident's timeline, ordered by `created_at` ascending
    /// (oldest entry first).
    fn list_by_incident(
        &self,
        incident_id: Uuid,
    ) -> impl Future<Output = VigilResult<Vec<IncidentUpdate>>> + Send;

    /// Remove every update belonging to an incident.
    fn delete_by_incident(
        &self,
        incident_id: Uuid,
    ) -> impl Future<Output = VigilResult<()>> + Send;
}

pub trait TeamMemberRepository: Send + Sync {
    fn create(
        &self,
        input: CreateTeamMember,
    ) -> impl Future<Output = VigilResult<TeamMember>> + Send;

    /// Membership of one identity in one organization. `NotFound` when
    /// the identity is not a member.
    fn get_by_user_and_org(
        &self,
        user_id: Uuid,
        org_id: Uuid,
    ) -> impl Future<Output = VigilResult<TeamMember>> + Send;

    fn list_by_org(
        &self,
        org_id: Uuid,
    ) -> impl Future<Output = VigilResult<Vec<TeamMember>>> + Send;
}

//! Access policy gate for write operations.
//!
//! Read operations (the public status feed) require no authorization
//! and never pass through here. Every write operation on services or
//! incidents is gated on an admin membership in the owning
//! organization.

use uuid::Uuid;

use crate::error::{VigilError, VigilResult};
use crate::models::team_member::MemberRole;
use crate::repository::TeamMemberRepository;

/// Write operations subject to authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateService,
    UpdateService,
    SetServiceStatus,
    DeleteService,
    ReportIncident,
    PostUpdate,
    DeleteIncident,
}

pub struct PolicyGate<M: TeamMemberRepository> {
    member_repo: M,
}

impl<M: TeamMemberRepository> PolicyGate<M> {
    pub fn new(member_repo: M) -> Self {
        Self { member_repo }
    }

    /// Allow the action iff `actor` holds an admin membership in
    /// `org_id`. Denials are always the bare [`VigilError::Forbidden`]
    /// so they reveal nothing about the target entity.
    pub async fn authorize(
        &self,
        actor: Option<Uuid>,
        org_id: Uuid,
        _action: Action,
    ) -> VigilResult<()> {
        let Some(user_id) = actor else {
            return Err(VigilError::Forbidden);
        };

        let member = match self.member_repo.get_by_user_and_org(user_id, org_id).await {
            Ok(member) => member,
            Err(VigilError::NotFound { .. }) => return Err(VigilError::Forbidden),
            Err(e) => return Err(e),
        };

        // Admin is currently the only role; every action requires it.
        match member.role {
            MemberRole::Admin => Ok(()),
        }
    }
}

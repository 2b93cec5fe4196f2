//! Organization sign-up flow.
//!
//! Registers an identity with the external provider, then creates the
//! organization and its first (admin) team member. Errors propagate to
//! the caller unmodified; there is no automatic compensation, so a
//! failure after sign-up leaves the identity in place and the caller
//! sees exactly which step failed.

use crate::error::{VigilError, VigilResult};
use crate::identity::{Identity, IdentityProvider};
use crate::models::organization::{CreateOrganization, Organization};
use crate::models::team_member::{CreateTeamMember, MemberRole, TeamMember};
use crate::repository::{OrganizationRepository, TeamMemberRepository};

/// Result of a successful registration.
#[derive(Debug, Clone)]
pub struct Registration {
    pub identity: Identity,
    pub organization: Organization,
    pub membership: TeamMember,
}

pub struct RegistrationService<P, O, M> {
    identity_provider: P,
    org_repo: O,
    member_repo: M,
}

impl<P, O, M> RegistrationService<P, O, M>
where
    P: IdentityProvider,
    O: OrganizationRepository,
    M: TeamMemberRepository,
{
    pub fn new(identity_provider: P, org_repo: O, member_repo: M) -> Self {
        Self {
            identity_provider,
            org_repo,
            member_repo,
        }
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        org_name: &str,
    ) -> VigilResult<Registration> {
        if org_name.trim().is_empty() {
            return Err(VigilError::Validation {
                message: "organization name must not be empty".into(),
            });
        }

        let identity = self.identity_provider.sign_up(email, password).await?;

        let organization = self
            .org_repo
            .create(CreateOrganization {
                name: org_name.to_string(),
            })
            .await?;

        let membership = self
            .member_repo
            .create(CreateTeamMember {
                user_id: identity.id,
                org_id: organization.id,
                role: MemberRole::Admin,
            })
            .await?;

        Ok(Registration {
            identity,
            organization,
            membership,
        })
    }
}

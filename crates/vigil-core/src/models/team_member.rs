//! Team member domain model.
//!
//! Associates an external identity with an organization and a role.
//! The first member is created at registration time alongside the
//! organization itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a member within an organization.
///
/// `Admin` is the only role defined: admins may invoke every write
/// operation on the organization's services and incidents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Admin,
}

impl MemberRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: Uuid,
    /// Identity id issued by the external identity provider.
    pub user_id: Uuid,
    pub org_id: Uuid,
    pub role: MemberRole,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a new team member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeamMember {
    pub user_id: Uuid,
    pub org_id: Uuid,
    pub role: MemberRole,
}

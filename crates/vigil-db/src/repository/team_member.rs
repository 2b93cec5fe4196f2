//! SurrealDB implementation of [`TeamMemberRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use vigil_core::error::VigilResult;
use vigil_core::models::team_member::{CreateTeamMember, MemberRole, TeamMember};
use vigil_core::repository::TeamMemberRepository;

use crate::error::DbError;
use crate::repository::parse_uuid;

fn parse_role(s: &str) -> Result<MemberRole, DbError> {
    match s {
        "admin" => Ok(MemberRole::Admin),
        other => Err(DbError::Decode(format!("unknown member role: {other}"))),
    }
}

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct TeamMemberRow {
    user_id: String,
    org_id: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TeamMemberRow {
    fn into_member(self, id: Uuid) -> Result<TeamMember, DbError> {
        Ok(TeamMember {
            id,
            user_id: parse_uuid("user", &self.user_id)?,
            org_id: parse_uuid("org", &self.org_id)?,
            role: parse_role(&self.role)?,
            created_at: self.created_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct TeamMemberRowWithId {
    record_id: String,
    user_id: String,
    org_id: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TeamMemberRowWithId {
    fn try_into_member(self) -> Result<TeamMember, DbError> {
        let id = parse_uuid("team_member", &self.record_id)?;
        Ok(TeamMember {
            id,
            user_id: parse_uuid("user", &self.user_id)?,
            org_id: parse_uuid("org", &self.org_id)?,
            role: parse_role(&self.role)?,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the TeamMember repository.
#[derive(Clone)]
pub struct SurrealTeamMemberRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTeamMemberRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> TeamMemberRepository for SurrealTeamMemberRepository<C> {
    async fn create(&self, input: CreateTeamMember) -> VigilResult<TeamMember> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('team_member', $id) SET \
                 user_id = $user_id, org_id = $org_id, role = $role",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("org_id", input.org_id.to_string()))
            .bind(("role", input.role.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<TeamMemberRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "team_member".into(),
            id: id_str,
        })?;

        Ok(row.into_member(id)?)
    }

    async fn get_by_user_and_org(&self, user_id: Uuid, org_id: Uuid) -> VigilResult<TeamMember> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM team_member \
                 WHERE user_id = $user_id AND org_id = $org_id",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("org_id", org_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TeamMemberRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "team_member".into(),
            id: format!("user={user_id} org={org_id}"),
        })?;

        Ok(row.try_into_member()?)
    }

    async fn list_by_org(&self, org_id: Uuid) -> VigilResult<Vec<TeamMember>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM team_member WHERE org_id = $org_id \
                 ORDER BY created_at DESC",
            )
            .bind(("org_id", org_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TeamMemberRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_member())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }
}

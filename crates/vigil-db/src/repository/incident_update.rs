//! SurrealDB implementation of [`IncidentUpdateRepository`].
//!
//! The timeline is append-only: no update operation exists, and the
//! only delete is the whole-timeline cascade used when the owning
//! incident is removed.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use vigil_core::error::VigilResult;
use vigil_core::models::incident_update::{CreateIncidentUpdate, IncidentUpdate};
use vigil_core::repository::IncidentUpdateRepository;

use crate::error::DbError;
use crate::repository::{parse_incident_status, parse_uuid};

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct IncidentUpdateRow {
    incident_id: String,
    message: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl IncidentUpdateRow {
    fn into_update(self, id: Uuid) -> Result<IncidentUpdate, DbError> {
        Ok(IncidentUpdate {
            id,
            incident_id: parse_uuid("incident", &self.incident_id)?,
            message: self.message,
            status: parse_incident_status(&self.status)?,
            created_at: self.created_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct IncidentUpdateRowWithId {
    record_id: String,
    incident_id: String,
    message: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl IncidentUpdateRowWithId {
    fn try_into_update(self) -> Result<IncidentUpdate, DbError> {
        let id = parse_uuid("incident_update", &self.record_id)?;
        Ok(IncidentUpdate {
            id,
            incident_id: parse_uuid("incident", &self.incident_id)?,
            message: self.message,
            status: parse_incident_status(&self.status)?,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the IncidentUpdate repository.
#[derive(Clone)]
pub struct SurrealIncidentUpdateRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealIncidentUpdateRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> IncidentUpdateRepository for SurrealIncidentUpdateRepository<C> {
    async fn append(&self, input: CreateIncidentUpdate) -> VigilResult<IncidentUpdate> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('incident_update', $id) SET \
                 incident_id = $incident_id, message = $message, \
                 status = $status",
            )
            .bind(("id", id_str.clone()))
            .bind(("incident_id", input.incident_id.to_string()))
            .bind(("message", input.message))
            .bind(("status", input.status.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<IncidentUpdateRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "incident_update".into(),
            id: id_str,
        })?;

        Ok(row.into_update(id)?)
    }

    async fn list_by_incident(&self, incident_id: Uuid) -> VigilResult<Vec<IncidentUpdate>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM incident_update WHERE incident_id = $incident_id \
                 ORDER BY created_at ASC",
            )
            .bind(("incident_id", incident_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<IncidentUpdateRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_update())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }

    async fn delete_by_incident(&self, incident_id: Uuid) -> VigilResult<()> {
        self.db
            .query("DELETE incident_update WHERE incident_id = $incident_id")
            .bind(("incident_id", incident_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}

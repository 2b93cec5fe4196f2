//! SurrealDB implementation of [`IncidentRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use vigil_core::error::VigilResult;
use vigil_core::models::incident::{CreateIncident, Incident, UpdateIncident};
use vigil_core::repository::IncidentRepository;
use vigil_core::status::IncidentStatus;

use crate::error::DbError;
use crate::repository::{parse_incident_status, parse_service_status, parse_uuid};

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct IncidentRow {
    service_id: String,
    title: String,
    description: Option<String>,
    status: String,
    impact: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl IncidentRow {
    fn into_incident(self, id: Uuid) -> Result<Incident, DbError> {
        Ok(Incident {
            id,
            service_id: parse_uuid("service", &self.service_id)?,
            title: self.title,
            description: self.description,
            status: parse_incident_status(&self.status)?,
            impact: parse_service_status(&self.impact)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct IncidentRowWithId {
    record_id: String,
    service_id: String,
    title: String,
    description: Option<String>,
    status: String,
    impact: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl IncidentRowWithId {
    fn try_into_incident(self) -> Result<Incident, DbError> {
        let id = parse_uuid("incident", &self.record_id)?;
        Ok(Incident {
            id,
            service_id: parse_uuid("service", &self.service_id)?,
            title: self.title,
            description: self.description,
            status: parse_incident_status(&self.status)?,
            impact: parse_service_status(&self.impact)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Incident repository.
#[derive(Clone)]
pub struct SurrealIncidentRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealIncidentRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> IncidentRepository for SurrealIncidentRepository<C> {
    async fn create(&self, input: CreateIncident) -> VigilResult<Incident> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('incident', $id) SET \
                 service_id = $service_id, title = $title, \
                 description = $description, status = $status, \
                 impact = $impact",
            )
            .bind(("id", id_str.clone()))
            .bind(("service_id", input.service_id.to_string()))
            .bind(("title", input.title))
            .bind(("description", input.description))
            .bind(("status", input.status.to_string()))
            .bind(("impact", input.impact.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<IncidentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "incident".into(),
            id: id_str,
        })?;

        Ok(row.into_incident(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> VigilResult<Incident> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('incident', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<IncidentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "incident".into(),
            id: id_str,
        })?;

        Ok(row.into_incident(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateIncident) -> VigilResult<Incident> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.status.is_some() {
            sets.push("status = $status");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('incident', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(status) = input.status {
            builder = builder.bind(("status", status.to_string()));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<IncidentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "incident".into(),
            id: id_str,
        })?;

        Ok(row.into_incident(id)?)
    }

    async fn delete(&self, id: Uuid) -> VigilResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("DELETE type::record('incident', $id) RETURN BEFORE")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<IncidentRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "incident".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }

    async fn list_by_service(&self, service_id: Uuid) -> VigilResult<Vec<Incident>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM incident WHERE service_id = $service_id \
                 ORDER BY created_at DESC",
            )
            .bind(("service_id", service_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<IncidentRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_incident())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }

    async fn list_open_by_service(&self, service_id: Uuid) -> VigilResult<Vec<Incident>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM incident WHERE service_id = $service_id \
                 AND status != $resolved \
                 ORDER BY created_at DESC",
            )
            .bind(("service_id", service_id.to_string()))
            .bind(("resolved", IncidentStatus::Resolved.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<IncidentRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_incident())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }
}

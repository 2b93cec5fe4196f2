//! SurrealDB implementation of [`ServiceRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use vigil_core::error::VigilResult;
use vigil_core::models::service::{CreateService, Service, UpdateService};
use vigil_core::repository::{PaginatedResult, Pagination, ServiceRepository};

use crate::error::DbError;
use crate::repository::{parse_service_status, parse_uuid};

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct ServiceRow {
    org_id: String,
    name: String,
    description: Option<String>,
    current_status: String,
    status_override: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ServiceRow {
    fn into_service(self, id: Uuid) -> Result<Service, DbError> {
        Ok(Service {
            id,
            org_id: parse_uuid("org", &self.org_id)?,
            name: self.name,
            description: self.description,
            current_status: parse_service_status(&self.current_status)?,
            status_override: self.status_override,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct ServiceRowWithId {
    record_id: String,
    org_id: String,
    name: String,
    description: Option<String>,
    current_status: String,
    status_override: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ServiceRowWithId {
    fn try_into_service(self) -> Result<Service, DbError> {
        let id = parse_uuid("service", &self.record_id)?;
        Ok(Service {
            id,
            org_id: parse_uuid("org", &self.org_id)?,
            name: self.name,
            description: self.description,
            current_status: parse_service_status(&self.current_status)?,
            status_override: self.status_override,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Service repository.
#[derive(Clone)]
pub struct SurrealServiceRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealServiceRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ServiceRepository for SurrealServiceRepository<C> {
    async fn create(&self, input: CreateService) -> VigilResult<Service> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('service', $id) SET \
                 org_id = $org_id, name = $name, description = $description, \
                 current_status = $current_status, status_override = false",
            )
            .bind(("id", id_str.clone()))
            .bind(("org_id", input.org_id.to_string()))
            .bind(("name", input.name))
            .bind(("description", input.description))
            .bind(("current_status", input.current_status.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ServiceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "service".into(),
            id: id_str,
        })?;

        Ok(row.into_service(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> VigilResult<Service> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('service', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ServiceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "service".into(),
            id: id_str,
        })?;

        Ok(row.into_service(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateService) -> VigilResult<Service> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        match &input.description {
            Some(Some(_)) => sets.push("description = $description"),
            Some(None) => sets.push("description = NONE"),
            None => {}
        }
        if input.current_status.is_some() {
            sets.push("current_status = $current_status");
        }
        if input.status_override.is_some() {
            sets.push("status_override = $status_override");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('service', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(Some(description)) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(status) = input.current_status {
            builder = builder.bind(("current_status", status.to_string()));
        }
        if let Some(flag) = input.status_override {
            builder = builder.bind(("status_override", flag));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ServiceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "service".into(),
            id: id_str,
        })?;

        Ok(row.into_service(id)?)
    }

    async fn delete(&self, id: Uuid) -> VigilResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("DELETE type::record('service', $id) RETURN BEFORE")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ServiceRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "service".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }

    async fn list(
        &self,
        org_id: Option<Uuid>,
        pagination: Pagination,
    ) -> VigilResult<PaginatedResult<Service>> {
        let (count_query, list_query) = match org_id {
            Some(_) => (
                "SELECT count() AS total FROM service \
                 WHERE org_id = $org_id GROUP ALL",
                "SELECT meta::id(id) AS record_id, * \
                 FROM service WHERE org_id = $org_id \
                 ORDER BY created_at DESC \
                 LIMIT $limit START $offset",
            ),
            None => (
                "SELECT count() AS total FROM service GROUP ALL",
                "SELECT meta::id(id) AS record_id, * \
                 FROM service \
                 ORDER BY created_at DESC \
                 LIMIT $limit START $offset",
            ),
        };

        let mut count_builder = self.db.query(count_query);
        if let Some(org) = org_id {
            count_builder = count_builder.bind(("org_id", org.to_string()));
        }
        let mut count_result = count_builder.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut builder = self
            .db
            .query(list_query)
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));
        if let Some(org) = org_id {
            builder = builder.bind(("org_id", org.to_string()));
        }
        let mut result = builder.await.map_err(DbError::from)?;

        let rows: Vec<ServiceRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_service())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn list_by_org(&self, org_id: Uuid) -> VigilResult<Vec<Service>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM service WHERE org_id = $org_id \
                 ORDER BY created_at DESC",
            )
            .bind(("org_id", org_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ServiceRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_service())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }
}

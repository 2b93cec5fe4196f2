//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Status enums are stored as their
//! snake_case wire strings with ASSERT constraints for validation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Organizations
-- =======================================================================
DEFINE TABLE organization SCHEMAFULL;
DEFINE FIELD name ON TABLE organization TYPE string;
DEFINE FIELD created_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Services (organization scope)
-- =======================================================================
DEFINE TABLE service SCHEMAFULL;
DEFINE FIELD org_id ON TABLE service TYPE string;
DEFINE FIELD name ON TABLE service TYPE string;
DEFINE FIELD description ON TABLE service TYPE option<string>;
DEFINE FIELD current_status ON TABLE service TYPE string \
    ASSERT $value IN ['operational', 'degraded_performance', \
    'partial_outage', 'major_outage'];
DEFINE FIELD status_override ON TABLE service TYPE bool DEFAULT false;
DEFINE FIELD created_at ON TABLE service TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE service TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_service_org ON TABLE service COLUMNS org_id;

-- =======================================================================
-- Incidents (service scope)
-- =======================================================================
DEFINE TABLE incident SCHEMAFULL;
DEFINE FIELD service_id ON TABLE incident TYPE string;
DEFINE FIELD title ON TABLE incident TYPE string;
DEFINE FIELD description ON TABLE incident TYPE option<string>;
DEFINE FIELD status ON TABLE incident TYPE string \
    ASSERT $value IN ['investigating', 'identified', 'monitoring', \
    'resolved'];
DEFINE FIELD impact ON TABLE incident TYPE string \
    ASSERT $value IN ['operational', 'degraded_performance', \
    'partial_outage', 'major_outage'];
DEFINE FIELD created_at ON TABLE incident TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE incident TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_incident_service ON TABLE incident COLUMNS service_id;

-- =======================================================================
-- Incident Updates (incident scope, append-only)
-- =======================================================================
DEFINE TABLE incident_update SCHEMAFULL
    PERMISSIONS
        FOR create FULL
        FOR select FULL
        FOR update NONE
        FOR delete FULL;
DEFINE FIELD incident_id ON TABLE incident_update TYPE string;
DEFINE FIELD message ON TABLE incident_update TYPE string;
DEFINE FIELD status ON TABLE incident_update TYPE string \
    ASSERT $value IN ['investigating', 'identified', 'monitoring', \
    'resolved'];
DEFINE FIELD created_at ON TABLE incident_update TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_update_incident ON TABLE incident_update \
    COLUMNS incident_id;

-- =======================================================================
-- Team Members (organization scope)
-- =======================================================================
DEFINE TABLE team_member SCHEMAFULL;
DEFINE FIELD user_id ON TABLE team_member TYPE string;
DEFINE FIELD org_id ON TABLE team_member TYPE string;
DEFINE FIELD role ON TABLE team_member TYPE string \
    ASSERT $value IN ['admin'];
DEFINE FIELD created_at ON TABLE team_member TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_member_user_org ON TABLE team_member \
    COLUMNS user_id, org_id UNIQUE;
";

/// Apply all pending migrations.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }
}

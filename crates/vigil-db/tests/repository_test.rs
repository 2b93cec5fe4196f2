//! Integration tests for Organization and Service repository
//! implementations using in-memory SurrealDB.

use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;
use vigil_core::models::organization::CreateOrganization;
use vigil_core::models::service::{CreateService, UpdateService};
use vigil_core::repository::{OrganizationRepository, Pagination, ServiceRepository};
use vigil_core::status::ServiceStatus;
use vigil_db::repository::{SurrealOrganizationRepository, SurrealServiceRepository};

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    vigil_db::run_migrations(&db).await.unwrap();
    db
}

// -----------------------------------------------------------------------
// Organization tests
// -----------------------------------------------------------------------

#[tokio::test]
async fn create_and_get_organization() {
    let db = setup().await;
    let repo = SurrealOrganizationRepository::new(db);

    let org = repo
        .create(CreateOrganization {
            name: "ACME Corp".into(),
        })
        .await
        .unwrap();

    assert_eq!(org.name, "ACME Corp");

    let fetched = repo.get_by_id(org.id).await.unwrap();
    assert_eq!(fetched.id, org.id);
    assert_eq!(fetched.name, org.name);
}

#[tokio::test]
async fn get_missing_organization_fails() {
    let db = setup().await;
    let repo = SurrealOrganizationRepository::new(db);

    let result = repo.get_by_id(Uuid::new_v4()).await;
    assert!(result.is_err(), "should not find absent organization");
}

// -----------------------------------------------------------------------
// Service tests
// -----------------------------------------------------------------------

#[tokio::test]
async fn create_and_get_service() {
    let db = setup().await;
    let org_repo = SurrealOrganizationRepository::new(db.clone());
    let repo = SurrealServiceRepository::new(db);

    let org = org_repo
        .create(CreateOrganization {
            name: "ACME Corp".into(),
        })
        .await
        .unwrap();

    let service = repo
        .create(CreateService {
            org_id: org.id,
            name: "API".into(),
            description: Some("Public API".into()),
            current_status: ServiceStatus::Operational,
        })
        .await
        .unwrap();

    assert_eq!(service.org_id, org.id);
    assert_eq!(service.name, "API");
    assert_eq!(service.description.as_deref(), Some("Public API"));
    assert_eq!(service.current_status, ServiceStatus::Operational);
    assert!(!service.status_override);

    let fetched = repo.get_by_id(service.id).await.unwrap();
    assert_eq!(fetched.id, service.id);
    assert_eq!(fetched.name, service.name);
}

#[tokio::test]
async fn update_service_fields() {
    let db = setup().await;
    let repo = SurrealServiceRepository::new(db);

    let service = repo
        .create(CreateService {
            org_id: Uuid::new_v4(),
            name: "Before".into(),
            description: Some("old".into()),
            current_status: ServiceStatus::Operational,
        })
        .await
        .unwrap();

    let updated = repo
        .update(
            service.id,
            UpdateService {
                name: Some("After".into()),
                current_status: Some(ServiceStatus::MajorOutage),
                status_override: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, service.id);
    assert_eq!(updated.name, "After");
    assert_eq!(updated.description.as_deref(), Some("old")); // unchanged
    assert_eq!(updated.current_status, ServiceStatus::MajorOutage);
    assert!(updated.status_override);
    assert!(updated.updated_at >= service.updated_at);
}

#[tokio::test]
async fn clear_service_description() {
    let db = setup().await;
    let repo = SurrealServiceRepository::new(db);

    let service = repo
        .create(CreateService {
            org_id: Uuid::new_v4(),
            name: "API".into(),
            description: Some("to clear".into()),
            current_status: ServiceStatus::Operational,
        })
        .await
        .unwrap();

    let updated = repo
        .update(
            service.id,
            UpdateService {
                description: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.description, None);
}

#[tokio::test]
async fn delete_service() {
    let db = setup().await;
    let repo = SurrealServiceRepository::new(db);

    let service = repo
        .create(CreateService {
            org_id: Uuid::new_v4(),
            name: "To Delete".into(),
            description: None,
            current_status: ServiceStatus::Operational,
        })
        .await
        .unwrap();

    repo.delete(service.id).await.unwrap();

    let result = repo.get_by_id(service.id).await;
    assert!(result.is_err(), "should not find deleted service");
}

#[tokio::test]
async fn delete_missing_service_fails() {
    let db = setup().await;
    let repo = SurrealServiceRepository::new(db);

    let result = repo.delete(Uuid::new_v4()).await;
    assert!(result.is_err(), "deleting absent service should fail");
}

#[tokio::test]
async fn list_services_with_pagination() {
    let db = setup().await;
    let repo = SurrealServiceRepository::new(db);
    let org_id = Uuid::new_v4();

    for i in 0..5 {
        repo.create(CreateService {
            org_id,
            name: format!("svc-{i}"),
            description: None,
            current_status: ServiceStatus::Operational,
        })
        .await
        .unwrap();
        // Distinct created_at values so ordering is deterministic.
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let page = repo
        .list(
            Some(org_id),
            Pagination {
                offset: 0,
                limit: 3,
            },
        )
        .await
        .unwrap();

    assert_eq!(page.total, 5);
    assert_eq!(page.items.len(), 3);
    // Newest first.
    assert_eq!(page.items[0].name, "svc-4");
    assert_eq!(page.items[2].name, "svc-2");

    let rest = repo
        .list(
            Some(org_id),
            Pagination {
                offset: 3,
                limit: 3,
            },
        )
        .await
        .unwrap();
    assert_eq!(rest.items.len(), 2);
    assert_eq!(rest.items[0].name, "svc-1");
}

#[tokio::test]
async fn list_services_filters_by_org() {
    let db = setup().await;
    let repo = SurrealServiceRepository::new(db);
    let org_a = Uuid::new_v4();
    let org_b = Uuid::new_v4();

    for org_id in [org_a, org_a, org_b] {
        repo.create(CreateService {
            org_id,
            name: "svc".into(),
            description: None,
            current_status: ServiceStatus::Operational,
        })
        .await
        .unwrap();
    }

    let scoped = repo.list(Some(org_a), Pagination::default()).await.unwrap();
    assert_eq!(scoped.total, 2);
    assert!(scoped.items.iter().all(|s| s.org_id == org_a));

    let all = repo.list(None, Pagination::default()).await.unwrap();
    assert_eq!(all.total, 3);

    let by_org = repo.list_by_org(org_b).await.unwrap();
    assert_eq!(by_org.len(), 1);
}

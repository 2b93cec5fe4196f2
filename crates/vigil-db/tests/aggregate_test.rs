//! Integration tests for status aggregation and the service catalog
//! running against in-memory SurrealDB repositories.

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;
use vigil_core::aggregate::StatusAggregator;
use vigil_core::catalog::{CreateServiceInput, EditService, ServiceCatalog};
use vigil_core::error::VigilError;
use vigil_core::models::incident::CreateIncident;
use vigil_core::models::organization::CreateOrganization;
use vigil_core::models::team_member::{CreateTeamMember, MemberRole};
use vigil_core::repository::{
    IncidentRepository, IncidentUpdateRepository, OrganizationRepository, Pagination,
    TeamMemberRepository,
};
use vigil_core::status::{IncidentStatus, ServiceStatus};
use vigil_db::repository::{
    SurrealIncidentRepository, SurrealIncidentUpdateRepository, SurrealOrganizationRepository,
    SurrealServiceRepository, SurrealTeamMemberRepository,
};

type Aggregator = StatusAggregator<SurrealServiceRepository<Db>, SurrealIncidentRepository<Db>>;
type Catalog = ServiceCatalog<
    SurrealServiceRepository<Db>,
    SurrealIncidentRepository<Db>,
    SurrealIncidentUpdateRepository<Db>,
    SurrealTeamMemberRepository<Db>,
>;

struct Ctx {
    db: Surreal<Db>,
    admin: Uuid,
    org_id: Uuid,
}

impl Ctx {
    fn aggregator(&self) -> Aggregator {
        StatusAggregator::new(
            SurrealServiceRepository::new(self.db.clone()),
            SurrealIncidentRepository::new(self.db.clone()),
        )
    }

    fn catalog(&self) -> Catalog {
        ServiceCatalog::new(
            SurrealServiceRepository::new(self.db.clone()),
            SurrealIncidentRepository::new(self.db.clone()),
            SurrealIncidentUpdateRepository::new(self.db.clone()),
            SurrealTeamMemberRepository::new(self.db.clone()),
        )
    }

    fn incidents(&self) -> SurrealIncidentRepository<Db> {
        SurrealIncidentRepository::new(self.db.clone())
    }
}

async fn setup() -> Ctx {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    vigil_db::run_migrations(&db).await.unwrap();

    let org = SurrealOrganizationRepository::new(db.clone())
        .create(CreateOrganization {
            name: "ACME Corp".into(),
        })
        .await
        .unwrap();

    let admin = Uuid::new_v4();
    SurrealTeamMemberRepository::new(db.clone())
        .create(CreateTeamMember {
            user_id: admin,
            org_id: org.id,
            role: MemberRole::Admin,
        })
        .await
        .unwrap();

    Ctx {
        db,
        admin,
        org_id: org.id,
    }
}

fn open_incident(service_id: Uuid, impact: ServiceStatus) -> CreateIncident {
    CreateIncident {
        service_id,
        title: "Incident".into(),
        description: None,
        status: IncidentStatus::Investigating,
        impact,
    }
}

// -----------------------------------------------------------------------
// Aggregation tests
// -----------------------------------------------------------------------

#[tokio::test]
async fn service_with_no_open_incidents_is_operational() {
    let ctx = setup().await;
    let catalog = ctx.catalog();

    let service = catalog
        .create_service(
            Some(ctx.admin),
            CreateServiceInput {
                org_id: ctx.org_id,
                name: "API".into(),
                description: None,
                initial_status: None,
            },
        )
        .await
        .unwrap();

    let status = ctx.aggregator().service_status(service.id).await.unwrap();
    assert_eq!(status, ServiceStatus::Operational);
}

#[tokio::test]
async fn derived_status_is_worst_open_impact() {
    let ctx = setup().await;
    let catalog = ctx.catalog();

    let service = catalog
        .create_service(
            Some(ctx.admin),
            CreateServiceInput {
                org_id: ctx.org_id,
                name: "API".into(),
                description: None,
                initial_status: None,
            },
        )
        .await
        .unwrap();

    let incidents = ctx.incidents();
    incidents
        .create(open_incident(service.id, ServiceStatus::DegradedPerformance))
        .await
        .unwrap();
    incidents
        .create(open_incident(service.id, ServiceStatus::PartialOutage))
        .await
        .unwrap();
    // Resolved incidents do not count.
    incidents
        .create(CreateIncident {
            status: IncidentStatus::Resolved,
            ..open_incident(service.id, ServiceStatus::MajorOutage)
        })
        .await
        .unwrap();

    let status = ctx.aggregator().service_status(service.id).await.unwrap();
    assert_eq!(status, ServiceStatus::PartialOutage);
}

#[tokio::test]
async fn org_status_rolls_up_worst_service() {
    let ctx = setup().await;
    let catalog = ctx.catalog();
    let aggregator = ctx.aggregator();

    // Empty org is operational.
    assert_eq!(
        aggregator.org_status(ctx.org_id).await.unwrap(),
        ServiceStatus::Operational
    );

    for (name, status) in [
        ("API", ServiceStatus::Operational),
        ("Web", ServiceStatus::MajorOutage),
        ("Jobs", ServiceStatus::DegradedPerformance),
    ] {
        catalog
            .create_service(
                Some(ctx.admin),
                CreateServiceInput {
                    org_id: ctx.org_id,
                    name: name.into(),
                    description: None,
                    initial_status: Some(status),
                },
            )
            .await
            .unwrap();
    }

    assert_eq!(
        aggregator.org_status(ctx.org_id).await.unwrap(),
        ServiceStatus::MajorOutage
    );
}

#[tokio::test]
async fn public_feed_needs_no_actor() {
    let ctx = setup().await;
    let catalog = ctx.catalog();

    catalog
        .create_service(
            Some(ctx.admin),
            CreateServiceInput {
                org_id: ctx.org_id,
                name: "API".into(),
                description: None,
                initial_status: None,
            },
        )
        .await
        .unwrap();

    let page = ctx
        .aggregator()
        .list_services(Some(ctx.org_id), Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
}

// -----------------------------------------------------------------------
// Catalog tests
// -----------------------------------------------------------------------

#[tokio::test]
async fn manual_override_is_cleared_by_recompute() {
    let ctx = setup().await;
    let catalog = ctx.catalog();

    let service = catalog
        .create_service(
            Some(ctx.admin),
            CreateServiceInput {
                org_id: ctx.org_id,
                name: "API".into(),
                description: None,
                initial_status: None,
            },
        )
        .await
        .unwrap();

    let overridden = catalog
        .set_service_status(Some(ctx.admin), service.id, ServiceStatus::MajorOutage)
        .await
        .unwrap();
    assert_eq!(overridden.current_status, ServiceStatus::MajorOutage);
    assert!(overridden.status_override);

    // The next recompute wins over the operator-set status.
    let recomputed = ctx.aggregator().recompute(service.id).await.unwrap();
    assert_eq!(recomputed.current_status, ServiceStatus::Operational);
    assert!(!recomputed.status_override);
}

#[tokio::test]
async fn update_service_rejects_empty_name() {
    let ctx = setup().await;
    let catalog = ctx.catalog();

    let service = catalog
        .create_service(
            Some(ctx.admin),
            CreateServiceInput {
                org_id: ctx.org_id,
                name: "API".into(),
                description: None,
                initial_status: None,
            },
        )
        .await
        .unwrap();

    let result = catalog
        .update_service(
            Some(ctx.admin),
            service.id,
            EditService {
                name: Some("  ".into()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(VigilError::Validation { .. })));
}

#[tokio::test]
async fn delete_service_cascades_to_incidents_and_timelines() {
    let ctx = setup().await;
    let catalog = ctx.catalog();

    let service = catalog
        .create_service(
            Some(ctx.admin),
            CreateServiceInput {
                org_id: ctx.org_id,
                name: "API".into(),
                description: None,
                initial_status: None,
            },
        )
        .await
        .unwrap();

    let incident = ctx
        .incidents()
        .create(open_incident(service.id, ServiceStatus::MajorOutage))
        .await
        .unwrap();
    let updates = SurrealIncidentUpdateRepository::new(ctx.db.clone());
    updates
        .append(vigil_core::models::incident_update::CreateIncidentUpdate {
            incident_id: incident.id,
            message: "entry".into(),
            status: IncidentStatus::Investigating,
        })
        .await
        .unwrap();

    catalog
        .delete_service(Some(ctx.admin), service.id)
        .await
        .unwrap();

    assert!(ctx.incidents().get_by_id(incident.id).await.is_err());
    assert!(updates.list_by_incident(incident.id).await.unwrap().is_empty());

    let page = ctx
        .aggregator()
        .list_services(Some(ctx.org_id), Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn catalog_rejects_non_member() {
    let ctx = setup().await;
    let catalog = ctx.catalog();

    let result = catalog
        .create_service(
            Some(Uuid::new_v4()),
            CreateServiceInput {
                org_id: ctx.org_id,
                name: "API".into(),
                description: None,
                initial_status: None,
            },
        )
        .await;
    assert!(matches!(result, Err(VigilError::Forbidden)));

    let result = catalog
        .create_service(
            None,
            CreateServiceInput {
                org_id: ctx.org_id,
                name: "API".into(),
                description: None,
                initial_status: None,
            },
        )
        .await;
    assert!(matches!(result, Err(VigilError::Forbidden)));
}

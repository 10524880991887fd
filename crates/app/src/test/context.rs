//! Test context for store and service integration tests.

use sqlx::{Connection, PgConnection, PgPool, query};

use crate::{
    database::{self, Db},
    domain::{
        shipments::{PgShipmentStore, StoreShipmentsService},
        tenants::{TenantContext, TenantId},
    },
};

use super::db::{SUPERUSER, SUPERUSER_PASSWORD, TestDb};

/// Name of the non-superuser app role used for RLS testing.
const APP_ROLE: &str = "shipments_app_test";
const APP_ROLE_PASSWORD: &str = "shipments_app_test_pass";

pub(crate) struct TestContext {
    pub(crate) db: TestDb,
    pub(crate) tenant: TenantContext,
    pub(crate) store: PgShipmentStore,
    pub(crate) shipments: StoreShipmentsService<PgShipmentStore>,
}

impl TestContext {
    pub(crate) async fn new() -> Self {
        let db = TestDb::new().await;

        // Superusers bypass RLS even with FORCE ROW LEVEL SECURITY, so the
        // store under test connects as a restricted role.
        let app_pool = Self::setup_app_pool(&db).await;

        database::ensure_rls_enforced_role(&app_pool)
            .await
            .expect("app role should be subject to RLS");

        let store = PgShipmentStore::new(Db::new(app_pool));

        Self {
            shipments: StoreShipmentsService::new(store.clone()),
            store,
            tenant: TenantContext::new(
                TenantId::new("test-tenant").expect("valid tenant id"),
            ),
            db,
        }
    }

    async fn setup_app_pool(db: &TestDb) -> PgPool {
        let server_url = db
            .superuser_url
            .rsplit_once('/')
            .map_or(db.superuser_url.as_str(), |(base, _)| base);

        let mut server_conn = PgConnection::connect(&format!("{server_url}/postgres"))
            .await
            .expect("Failed to connect to postgres database for role setup");

        // Parallel tests race to create the role; an existing role is fine.
        let created = query(&format!(
            "CREATE ROLE {APP_ROLE} WITH LOGIN PASSWORD '{APP_ROLE_PASSWORD}' \
               NOSUPERUSER NOCREATEDB NOCREATEROLE NOBYPASSRLS"
        ))
        .execute(&mut server_conn)
        .await;

        if let Err(sqlx::Error::Database(error)) = &created
            && !matches!(error.code().as_deref(), Some("42710" | "23505"))
        {
            panic!("Failed to create app role: {error}");
        }

        query(&format!(
            "GRANT CONNECT ON DATABASE \"{}\" TO {APP_ROLE}",
            db.name
        ))
        .execute(&mut server_conn)
        .await
        .expect("Failed to grant CONNECT on test database");

        server_conn
            .close()
            .await
            .expect("Failed to close server connection");

        for statement in [
            format!("GRANT USAGE ON SCHEMA public TO {APP_ROLE}"),
            format!("GRANT SELECT, INSERT, UPDATE ON shipments TO {APP_ROLE}"),
        ] {
            query(&statement)
                .execute(db.pool())
                .await
                .expect("Failed to grant table privileges to app role");
        }

        let app_url = db.superuser_url.replacen(
            &format!("{SUPERUSER}:{SUPERUSER_PASSWORD}"),
            &format!("{APP_ROLE}:{APP_ROLE_PASSWORD}"),
            1,
        );

        PgPool::connect(&app_url)
            .await
            .expect("Failed to create app pool")
    }
}

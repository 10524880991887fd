//! App Context

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::{
    database::{self, Db, RoleCheckError},
    domain::shipments::{
        InMemoryShipmentStore, PgShipmentStore, ShipmentsService, StoreShipmentsService,
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database: {0}")]
    Database(#[source] sqlx::Error),

    #[error("failed to run database migrations: {0}")]
    Migrate(#[source] sqlx::migrate::MigrateError),

    #[error("database role is not safe for tenant isolation: {0}")]
    Role(#[source] RoleCheckError),
}

#[derive(Clone)]
pub struct AppContext {
    pub shipments: Arc<dyn ShipmentsService>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

impl AppContext {
    #[must_use]
    pub fn new(shipments: Arc<dyn ShipmentsService>) -> Self {
        Self { shipments }
    }

    /// Build application context backed by a process-local store.
    #[must_use]
    pub fn in_memory() -> Self {
        info!("using in-memory shipment store");

        Self::new(Arc::new(StoreShipmentsService::new(
            InMemoryShipmentStore::new(),
        )))
    }

    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails, when
    /// requested migrations fail, or when the connected role bypasses
    /// row-level security.
    pub async fn from_database_url(url: &str, run_migrations: bool) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        if run_migrations {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrate)?;

            info!("database migrations applied");
        }

        database::ensure_rls_enforced_role(&pool)
            .await
            .map_err(AppInitError::Role)?;

        let store = PgShipmentStore::new(Db::new(pool));

        Ok(Self::new(Arc::new(StoreShipmentsService::new(store))))
    }
}

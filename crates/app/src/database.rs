//! Database connection management

use sqlx::{PgPool, Postgres, Transaction, migrate::MigrateError, query, query_as};
use thiserror::Error;

use crate::domain::tenants::TenantContext;

/// SQL used to set tenant context for row-level security.
pub const SET_TENANT_CONTEXT_SQL: &str = "SELECT set_config('app.current_tenant', $1, true)";

const ROLE_PRIVILEGES_SQL: &str =
    "SELECT rolname, rolsuper, rolbypassrls FROM pg_roles WHERE rolname = current_user";

#[derive(Debug, Error)]
pub enum RoleCheckError {
    #[error("failed to inspect the connected role")]
    Sql(#[from] sqlx::Error),

    #[error("role {0} bypasses row-level security, connect as a NOSUPERUSER NOBYPASSRLS role")]
    BypassesRls(String),
}

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begin a transaction and set tenant context for RLS policies.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction or setting tenant context fails.
    pub async fn begin_tenant_transaction(
        &self,
        tenant: &TenantContext,
    ) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        query(SET_TENANT_CONTEXT_SQL)
            .bind(tenant.current().as_str())
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Apply pending migrations from the workspace `migrations/` directory.
///
/// # Errors
///
/// Returns an error if a migration fails to apply.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// Refuse to run as a role that row-level security does not apply to.
///
/// # Errors
///
/// Returns [`RoleCheckError::BypassesRls`] for superuser or `BYPASSRLS` roles.
pub async fn ensure_rls_enforced_role(pool: &PgPool) -> Result<(), RoleCheckError> {
    let (role, is_superuser, bypasses_rls): (String, bool, bool) =
        query_as(ROLE_PRIVILEGES_SQL).fetch_one(pool).await?;

    if is_superuser || bypasses_rls {
        return Err(RoleCheckError::BypassesRls(role));
    }

    Ok(())
}

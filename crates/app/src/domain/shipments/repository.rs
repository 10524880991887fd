//! Shipments Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use tracing::{error, warn};
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{
        shipments::{
            errors::ShipmentStoreError,
            models::{
                ActorUuid, Page, Shipment, ShipmentDraft, ShipmentIdentity, ShipmentStatus,
                ShipmentUuid, ShipmentVersion,
            },
            store::ShipmentStore,
        },
        tenants::{TenantContext, TenantId},
    },
};

const GET_SHIPMENT_SQL: &str = include_str!("sql/get_shipment.sql");
const LIST_SHIPMENTS_SQL: &str = include_str!("sql/list_shipments.sql");
const LIST_SHIPMENTS_BY_STATUS_SQL: &str = include_str!("sql/list_shipments_by_status.sql");
const INSERT_SHIPMENT_SQL: &str = include_str!("sql/insert_shipment.sql");
const LOCK_SHIPMENT_VERSION_SQL: &str = include_str!("sql/lock_shipment_version.sql");
const UPDATE_SHIPMENT_SQL: &str = include_str!("sql/update_shipment.sql");
const SOFT_DELETE_SHIPMENT_SQL: &str = include_str!("sql/soft_delete_shipment.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgShipmentsRepository;

impl PgShipmentsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_shipment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: &TenantId,
        shipment: ShipmentUuid,
    ) -> Result<Option<Shipment>, sqlx::Error> {
        query_as::<Postgres, Shipment>(GET_SHIPMENT_SQL)
            .bind(shipment.into_uuid())
            .bind(tenant.as_str())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_shipments(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: &TenantId,
        page: Page,
    ) -> Result<Vec<Shipment>, sqlx::Error> {
        let offset =
            i64::try_from(page.offset()).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        query_as::<Postgres, Shipment>(LIST_SHIPMENTS_SQL)
            .bind(tenant.as_str())
            .bind(i64::from(page.size()))
            .bind(offset)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_shipments_by_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: &TenantId,
        status: ShipmentStatus,
    ) -> Result<Vec<Shipment>, sqlx::Error> {
        query_as::<Postgres, Shipment>(LIST_SHIPMENTS_BY_STATUS_SQL)
            .bind(tenant.as_str())
            .bind(status.as_str())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn insert_shipment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: &TenantId,
        draft: &ShipmentDraft,
    ) -> Result<ShipmentUuid, sqlx::Error> {
        let uuid = ShipmentUuid::new();

        query(INSERT_SHIPMENT_SQL)
            .bind(uuid.into_uuid())
            .bind(tenant.as_str())
            .bind(&draft.tracking_number)
            .bind(&draft.recipient_name)
            .bind(draft.status.as_str())
            .bind(ShipmentVersion::new().into_uuid())
            .bind(draft.created_by.map(ActorUuid::into_uuid))
            .execute(&mut **tx)
            .await?;

        Ok(uuid)
    }

    /// Lock the live row and return its stored version.
    pub(crate) async fn lock_shipment_version(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: &TenantId,
        shipment: ShipmentUuid,
    ) -> Result<Option<ShipmentVersion>, sqlx::Error> {
        let version: Option<Uuid> = query_scalar(LOCK_SHIPMENT_VERSION_SQL)
            .bind(shipment.into_uuid())
            .bind(tenant.as_str())
            .fetch_optional(&mut **tx)
            .await?;

        Ok(version.map(ShipmentVersion::from_uuid))
    }

    /// Apply the draft only if the stored version still matches, returning
    /// the number of rows changed.
    pub(crate) async fn update_shipment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: &TenantId,
        identity: ShipmentIdentity,
        draft: &ShipmentDraft,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_SHIPMENT_SQL)
            .bind(identity.uuid.into_uuid())
            .bind(tenant.as_str())
            .bind(identity.version.into_uuid())
            .bind(&draft.tracking_number)
            .bind(&draft.recipient_name)
            .bind(draft.status.as_str())
            .bind(draft.updated_by.map(ActorUuid::into_uuid))
            .bind(ShipmentVersion::new().into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn soft_delete_shipment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: &TenantId,
        shipment: ShipmentUuid,
        deleted_by: Option<ActorUuid>,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SOFT_DELETE_SHIPMENT_SQL)
            .bind(shipment.into_uuid())
            .bind(tenant.as_str())
            .bind(deleted_by.map(ActorUuid::into_uuid))
            .bind(ShipmentVersion::new().into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

/// Shipment store backed by `PostgreSQL`.
///
/// Every call runs in its own transaction with the tenant set for row-level
/// security, and every statement also filters on the tenant column.
#[derive(Debug, Clone)]
pub struct PgShipmentStore {
    db: Db,
    repository: PgShipmentsRepository,
}

impl PgShipmentStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgShipmentsRepository::new(),
        }
    }

    async fn find(
        &self,
        tenant: &TenantContext,
        shipment: ShipmentUuid,
    ) -> Result<Option<Shipment>, ShipmentStoreError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let shipment = self
            .repository
            .get_shipment(&mut tx, tenant.current(), shipment)
            .await?;

        tx.commit().await?;

        Ok(shipment)
    }

    async fn list(
        &self,
        tenant: &TenantContext,
        page: Page,
    ) -> Result<Vec<Shipment>, ShipmentStoreError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let shipments = self
            .repository
            .list_shipments(&mut tx, tenant.current(), page)
            .await?;

        tx.commit().await?;

        Ok(shipments)
    }

    async fn list_by_status(
        &self,
        tenant: &TenantContext,
        status: ShipmentStatus,
    ) -> Result<Vec<Shipment>, ShipmentStoreError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let shipments = self
            .repository
            .list_shipments_by_status(&mut tx, tenant.current(), status)
            .await?;

        tx.commit().await?;

        Ok(shipments)
    }

    async fn insert(
        &self,
        tenant: &TenantContext,
        draft: &ShipmentDraft,
    ) -> Result<ShipmentUuid, ShipmentStoreError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let uuid = self
            .repository
            .insert_shipment(&mut tx, tenant.current(), draft)
            .await?;

        tx.commit().await?;

        Ok(uuid)
    }

    async fn update(
        &self,
        tenant: &TenantContext,
        identity: ShipmentIdentity,
        draft: &ShipmentDraft,
    ) -> Result<ShipmentUuid, ShipmentStoreError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let stored_version = self
            .repository
            .lock_shipment_version(&mut tx, tenant.current(), identity.uuid)
            .await?
            .ok_or(ShipmentStoreError::NotFound(identity.uuid))?;

        if stored_version != identity.version {
            warn!(shipment_uuid = %identity.uuid, "concurrency conflict saving shipment");

            return Err(ShipmentStoreError::ConcurrencyConflict(identity.uuid));
        }

        let rows_affected = self
            .repository
            .update_shipment(&mut tx, tenant.current(), identity, draft)
            .await?;

        if rows_affected == 0 {
            warn!(shipment_uuid = %identity.uuid, "concurrency conflict saving shipment");

            return Err(ShipmentStoreError::ConcurrencyConflict(identity.uuid));
        }

        tx.commit().await?;

        Ok(identity.uuid)
    }

    async fn soft_delete(
        &self,
        tenant: &TenantContext,
        shipment: ShipmentUuid,
        deleted_by: Option<ActorUuid>,
    ) -> Result<(), ShipmentStoreError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        self.repository
            .soft_delete_shipment(&mut tx, tenant.current(), shipment, deleted_by)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}

fn log_failure(error: &ShipmentStoreError, operation: &'static str) {
    if let ShipmentStoreError::Sql(source) = error {
        error!(error = %source, operation, "shipment data access failed");
    }
}

#[async_trait]
impl ShipmentStore for PgShipmentStore {
    async fn get_by_id(
        &self,
        tenant: &TenantContext,
        shipment: ShipmentUuid,
    ) -> Result<Option<Shipment>, ShipmentStoreError> {
        self.find(tenant, shipment)
            .await
            .inspect_err(|error| log_failure(error, "get_by_id"))
    }

    async fn get_all(
        &self,
        tenant: &TenantContext,
        page: Page,
    ) -> Result<Vec<Shipment>, ShipmentStoreError> {
        self.list(tenant, page)
            .await
            .inspect_err(|error| log_failure(error, "get_all"))
    }

    async fn get_by_status(
        &self,
        tenant: &TenantContext,
        status: ShipmentStatus,
    ) -> Result<Vec<Shipment>, ShipmentStoreError> {
        self.list_by_status(tenant, status)
            .await
            .inspect_err(|error| log_failure(error, "get_by_status"))
    }

    async fn save(
        &self,
        tenant: &TenantContext,
        draft: ShipmentDraft,
    ) -> Result<ShipmentUuid, ShipmentStoreError> {
        let result = match draft.identity {
            Some(identity) => self.update(tenant, identity, &draft).await,
            None => self.insert(tenant, &draft).await,
        };

        result.inspect_err(|error| log_failure(error, "save"))
    }

    async fn delete(
        &self,
        tenant: &TenantContext,
        shipment: ShipmentUuid,
        deleted_by: Option<ActorUuid>,
    ) -> Result<(), ShipmentStoreError> {
        self.soft_delete(tenant, shipment, deleted_by)
            .await
            .inspect_err(|error| log_failure(error, "delete"))
    }
}

impl<'r> FromRow<'r, PgRow> for Shipment {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let tenant: String = row.try_get("tenant")?;
        let status: String = row.try_get("status")?;

        Ok(Self {
            uuid: ShipmentUuid::from_uuid(row.try_get("uuid")?),
            tenant: TenantId::new(tenant).map_err(|e| sqlx::Error::ColumnDecode {
                index: "tenant".to_string(),
                source: Box::new(e),
            })?,
            tracking_number: row.try_get("tracking_number")?,
            recipient_name: row.try_get("recipient_name")?,
            status: status
                .parse::<ShipmentStatus>()
                .map_err(|e| sqlx::Error::ColumnDecode {
                    index: "status".to_string(),
                    source: Box::new(e),
                })?,
            version: ShipmentVersion::from_uuid(row.try_get("version")?),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            created_by: row
                .try_get::<Option<Uuid>, _>("created_by")?
                .map(ActorUuid::from_uuid),
            updated_at: row
                .try_get::<Option<SqlxTimestamp>, _>("updated_at")?
                .map(SqlxTimestamp::to_jiff),
            updated_by: row
                .try_get::<Option<Uuid>, _>("updated_by")?
                .map(ActorUuid::from_uuid),
            is_deleted: row.try_get("is_deleted")?,
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
            deleted_by: row
                .try_get::<Option<Uuid>, _>("deleted_by")?
                .map(ActorUuid::from_uuid),
        })
    }
}

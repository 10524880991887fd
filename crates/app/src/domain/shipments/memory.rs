//! In-memory shipment store.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;
use tracing::warn;

use crate::domain::{
    shipments::{
        errors::ShipmentStoreError,
        models::{
            ActorUuid, Page, Shipment, ShipmentDraft, ShipmentStatus, ShipmentUuid,
            ShipmentVersion,
        },
        store::ShipmentStore,
    },
    tenants::TenantContext,
};

/// Shipment store backed by a process-local table.
///
/// Mirrors the Postgres store: tenant scoping, version compare-and-swap,
/// global tracking number uniqueness and soft deletes. Each operation holds
/// the table lock for its whole duration, so every write is atomic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryShipmentStore {
    rows: Arc<RwLock<FxHashMap<ShipmentUuid, Shipment>>>,
}

impl InMemoryShipmentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows, soft-deleted ones included.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    /// Fetch a row regardless of tenant or deletion state.
    pub async fn raw(&self, shipment: ShipmentUuid) -> Option<Shipment> {
        self.rows.read().await.get(&shipment).cloned()
    }
}

fn is_visible(row: &Shipment, tenant: &TenantContext) -> bool {
    !row.is_deleted && row.tenant == *tenant.current()
}

fn tracking_number_taken(
    rows: &FxHashMap<ShipmentUuid, Shipment>,
    tracking_number: &str,
    except: Option<ShipmentUuid>,
) -> bool {
    rows.values()
        .any(|row| row.tracking_number == tracking_number && Some(row.uuid) != except)
}

#[async_trait]
impl ShipmentStore for InMemoryShipmentStore {
    async fn get_by_id(
        &self,
        tenant: &TenantContext,
        shipment: ShipmentUuid,
    ) -> Result<Option<Shipment>, ShipmentStoreError> {
        let rows = self.rows.read().await;

        Ok(rows
            .get(&shipment)
            .filter(|row| is_visible(row, tenant))
            .cloned())
    }

    async fn get_all(
        &self,
        tenant: &TenantContext,
        page: Page,
    ) -> Result<Vec<Shipment>, ShipmentStoreError> {
        let rows = self.rows.read().await;

        let mut shipments: Vec<Shipment> = rows
            .values()
            .filter(|row| is_visible(row, tenant))
            .cloned()
            .collect();

        shipments.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.uuid.cmp(&a.uuid))
        });

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let size = usize::try_from(page.size()).unwrap_or(usize::MAX);

        Ok(shipments.into_iter().skip(offset).take(size).collect())
    }

    async fn get_by_status(
        &self,
        tenant: &TenantContext,
        status: ShipmentStatus,
    ) -> Result<Vec<Shipment>, ShipmentStoreError> {
        let rows = self.rows.read().await;

        let mut shipments: Vec<Shipment> = rows
            .values()
            .filter(|row| row.status == status && is_visible(row, tenant))
            .cloned()
            .collect();

        shipments.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.uuid.cmp(&b.uuid))
        });

        Ok(shipments)
    }

    async fn save(
        &self,
        tenant: &TenantContext,
        draft: ShipmentDraft,
    ) -> Result<ShipmentUuid, ShipmentStoreError> {
        let mut rows = self.rows.write().await;

        let Some(identity) = draft.identity else {
            if tracking_number_taken(&rows, &draft.tracking_number, None) {
                return Err(ShipmentStoreError::DuplicateTrackingNumber);
            }

            let uuid = ShipmentUuid::new();

            rows.insert(
                uuid,
                Shipment {
                    uuid,
                    tenant: tenant.current().clone(),
                    tracking_number: draft.tracking_number,
                    recipient_name: draft.recipient_name,
                    status: draft.status,
                    version: ShipmentVersion::new(),
                    created_at: Timestamp::now(),
                    created_by: draft.created_by,
                    updated_at: None,
                    updated_by: None,
                    is_deleted: false,
                    deleted_at: None,
                    deleted_by: None,
                },
            );

            return Ok(uuid);
        };

        let uuid = identity.uuid;

        let stored_version = rows
            .get(&uuid)
            .filter(|row| is_visible(row, tenant))
            .map(|row| row.version)
            .ok_or(ShipmentStoreError::NotFound(uuid))?;

        if stored_version != identity.version {
            warn!(shipment_uuid = %uuid, "concurrency conflict saving shipment");

            return Err(ShipmentStoreError::ConcurrencyConflict(uuid));
        }

        if tracking_number_taken(&rows, &draft.tracking_number, Some(uuid)) {
            return Err(ShipmentStoreError::DuplicateTrackingNumber);
        }

        let row = rows
            .get_mut(&uuid)
            .ok_or(ShipmentStoreError::NotFound(uuid))?;

        row.tracking_number = draft.tracking_number;
        row.recipient_name = draft.recipient_name;
        row.status = draft.status;
        row.updated_by = draft.updated_by;
        row.updated_at = Some(Timestamp::now());
        row.version = ShipmentVersion::new();

        Ok(uuid)
    }

    async fn delete(
        &self,
        tenant: &TenantContext,
        shipment: ShipmentUuid,
        deleted_by: Option<ActorUuid>,
    ) -> Result<(), ShipmentStoreError> {
        let mut rows = self.rows.write().await;

        if let Some(row) = rows
            .get_mut(&shipment)
            .filter(|row| is_visible(row, tenant))
        {
            row.is_deleted = true;
            row.deleted_at = Some(Timestamp::now());
            row.deleted_by = deleted_by;
            row.version = ShipmentVersion::new();
        }

        Ok(())
    }
}

//! Shipment storage contract.

use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    shipments::{
        errors::ShipmentStoreError,
        models::{ActorUuid, Page, Shipment, ShipmentDraft, ShipmentStatus, ShipmentUuid},
    },
    tenants::TenantContext,
};

/// Tenant-scoped shipment persistence with optimistic concurrency.
///
/// Every operation only sees rows belonging to `tenant.current()` and skips
/// soft-deleted rows.
#[automock]
#[async_trait]
pub trait ShipmentStore: Send + Sync {
    /// Fetch a live shipment by id.
    async fn get_by_id(
        &self,
        tenant: &TenantContext,
        shipment: ShipmentUuid,
    ) -> Result<Option<Shipment>, ShipmentStoreError>;

    /// Fetch a page of live shipments, newest first.
    async fn get_all(
        &self,
        tenant: &TenantContext,
        page: Page,
    ) -> Result<Vec<Shipment>, ShipmentStoreError>;

    /// Fetch every live shipment with the given status, oldest first.
    async fn get_by_status(
        &self,
        tenant: &TenantContext,
        status: ShipmentStatus,
    ) -> Result<Vec<Shipment>, ShipmentStoreError>;

    /// Insert a draft without identity, or compare-and-swap update one with.
    ///
    /// Updates fail with [`ShipmentStoreError::NotFound`] when no live row
    /// matches and [`ShipmentStoreError::ConcurrencyConflict`] when the stored
    /// version differs from the draft's. Each successful write assigns a
    /// fresh version.
    async fn save(
        &self,
        tenant: &TenantContext,
        draft: ShipmentDraft,
    ) -> Result<ShipmentUuid, ShipmentStoreError>;

    /// Soft-delete a live shipment. Deleting a missing shipment is a no-op.
    async fn delete(
        &self,
        tenant: &TenantContext,
        shipment: ShipmentUuid,
        deleted_by: Option<ActorUuid>,
    ) -> Result<(), ShipmentStoreError>;
}

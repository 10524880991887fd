//! Shipments Service

use async_trait::async_trait;
use mockall::automock;
use tracing::{Span, info, warn};

use crate::domain::{
    shipments::{
        errors::{ShipmentStoreError, ShipmentsServiceError},
        lifecycle::{validate_for_create, validate_for_update, validate_transition},
        models::{
            ActorUuid, NewShipment, Page, Shipment, ShipmentDraft, ShipmentIdentity,
            ShipmentReplacement, ShipmentStatus, ShipmentUuid, StatusChange,
        },
        store::ShipmentStore,
    },
    tenants::TenantContext,
};

/// Shipment lifecycle operations layered over a [`ShipmentStore`].
#[derive(Debug, Clone)]
pub struct StoreShipmentsService<S> {
    store: S,
}

impl<S: ShipmentStore> StoreShipmentsService<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    async fn reload(
        &self,
        tenant: &TenantContext,
        shipment: ShipmentUuid,
    ) -> Result<Option<Shipment>, ShipmentsServiceError> {
        self.store
            .get_by_id(tenant, shipment)
            .await
            .map_err(|source| ShipmentsServiceError::data_access("failed to load shipment", source))
    }
}

/// Translate store failures raised while writing an existing shipment.
fn write_error(context: &'static str, error: ShipmentStoreError) -> ShipmentsServiceError {
    match error {
        ShipmentStoreError::ConcurrencyConflict(shipment) => {
            warn!(shipment_uuid = %shipment, "rejected stale shipment write");

            ShipmentsServiceError::ConcurrencyConflict
        }
        ShipmentStoreError::NotFound(_) => ShipmentsServiceError::NotFound,
        other => ShipmentsServiceError::data_access(context, other),
    }
}

#[async_trait]
impl<S: ShipmentStore> ShipmentsService for StoreShipmentsService<S> {
    async fn get_by_id(
        &self,
        tenant: &TenantContext,
        shipment: ShipmentUuid,
    ) -> Result<Option<Shipment>, ShipmentsServiceError> {
        self.reload(tenant, shipment).await
    }

    async fn get_all(
        &self,
        tenant: &TenantContext,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Shipment>, ShipmentsServiceError> {
        let page = Page::new(page, page_size)?;

        self.store
            .get_all(tenant, page)
            .await
            .map_err(|source| ShipmentsServiceError::data_access("failed to list shipments", source))
    }

    async fn get_by_status(
        &self,
        tenant: &TenantContext,
        status: ShipmentStatus,
    ) -> Result<Vec<Shipment>, ShipmentsServiceError> {
        self.store.get_by_status(tenant, status).await.map_err(|source| {
            ShipmentsServiceError::data_access("failed to list shipments by status", source)
        })
    }

    #[tracing::instrument(
        name = "shipments.service.create",
        skip(self, tenant, shipment),
        fields(
            tenant = %tenant.current(),
            shipment_uuid = tracing::field::Empty
        ),
        err
    )]
    async fn create(
        &self,
        tenant: &TenantContext,
        shipment: NewShipment,
        created_by: Option<ActorUuid>,
    ) -> Result<Shipment, ShipmentsServiceError> {
        validate_for_create(&shipment)?;

        let draft = ShipmentDraft {
            identity: None,
            tracking_number: shipment.tracking_number,
            recipient_name: shipment.recipient_name,
            status: ShipmentStatus::Created,
            created_by,
            updated_by: None,
        };

        let uuid = self.store.save(tenant, draft).await.map_err(|source| {
            ShipmentsServiceError::data_access("failed to create shipment", source)
        })?;

        Span::current().record("shipment_uuid", tracing::field::display(uuid));

        let created = self.reload(tenant, uuid).await?.ok_or_else(|| {
            ShipmentsServiceError::data_access(
                "created shipment could not be read back",
                ShipmentStoreError::NotFound(uuid),
            )
        })?;

        info!("shipment created");

        Ok(created)
    }

    #[tracing::instrument(
        name = "shipments.service.update",
        skip(self, tenant, replacement),
        fields(tenant = %tenant.current(), shipment_uuid = %replacement.uuid),
        err
    )]
    async fn update(
        &self,
        tenant: &TenantContext,
        replacement: ShipmentReplacement,
        updated_by: Option<ActorUuid>,
    ) -> Result<Option<Shipment>, ShipmentsServiceError> {
        let Some(existing) = self.reload(tenant, replacement.uuid).await? else {
            warn!("update of missing shipment");

            return Ok(None);
        };

        validate_for_update(&replacement)?;

        let draft = ShipmentDraft {
            identity: Some(ShipmentIdentity {
                uuid: replacement.uuid,
                version: replacement.version,
            }),
            tracking_number: replacement.tracking_number,
            recipient_name: replacement.recipient_name,
            status: existing.status,
            created_by: existing.created_by,
            updated_by,
        };

        match self.store.save(tenant, draft).await {
            Ok(uuid) => self.reload(tenant, uuid).await,
            Err(ShipmentStoreError::NotFound(_)) => {
                warn!("shipment deleted before the update was applied");

                Ok(None)
            }
            Err(error) => Err(write_error("failed to update shipment", error)),
        }
    }

    #[tracing::instrument(
        name = "shipments.service.update_status",
        skip(self, tenant, change),
        fields(
            tenant = %tenant.current(),
            shipment_uuid = %shipment,
            status = %change.status
        ),
        err
    )]
    async fn update_status(
        &self,
        tenant: &TenantContext,
        shipment: ShipmentUuid,
        change: StatusChange,
        updated_by: Option<ActorUuid>,
    ) -> Result<Shipment, ShipmentsServiceError> {
        let existing = self
            .reload(tenant, shipment)
            .await?
            .ok_or(ShipmentsServiceError::NotFound)?;

        validate_transition(existing.status, change.status)?;

        let draft = ShipmentDraft {
            identity: Some(ShipmentIdentity {
                uuid: shipment,
                version: change.version,
            }),
            tracking_number: existing.tracking_number,
            recipient_name: existing.recipient_name,
            status: change.status,
            created_by: existing.created_by,
            updated_by,
        };

        let uuid = self
            .store
            .save(tenant, draft)
            .await
            .map_err(|error| write_error("failed to update shipment status", error))?;

        self.reload(tenant, uuid)
            .await?
            .ok_or(ShipmentsServiceError::NotFound)
    }

    #[tracing::instrument(
        name = "shipments.service.delete",
        skip(self, tenant),
        fields(tenant = %tenant.current(), shipment_uuid = %shipment),
        err
    )]
    async fn delete(
        &self,
        tenant: &TenantContext,
        shipment: ShipmentUuid,
        deleted_by: Option<ActorUuid>,
    ) -> Result<(), ShipmentsServiceError> {
        self.store
            .delete(tenant, shipment, deleted_by)
            .await
            .map_err(|source| ShipmentsServiceError::data_access("failed to delete shipment", source))
    }
}

#[automock]
#[async_trait]
pub trait ShipmentsService: Send + Sync {
    /// Retrieve a live shipment, or `None` when it is absent or deleted.
    async fn get_by_id(
        &self,
        tenant: &TenantContext,
        shipment: ShipmentUuid,
    ) -> Result<Option<Shipment>, ShipmentsServiceError>;

    /// Retrieve a 1-based page of live shipments, newest first.
    ///
    /// A page past the end is empty rather than an error.
    async fn get_all(
        &self,
        tenant: &TenantContext,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Shipment>, ShipmentsServiceError>;

    /// Retrieve every live shipment with the given status, oldest first.
    async fn get_by_status(
        &self,
        tenant: &TenantContext,
        status: ShipmentStatus,
    ) -> Result<Vec<Shipment>, ShipmentsServiceError>;

    /// Create a shipment in the `created` status.
    async fn create(
        &self,
        tenant: &TenantContext,
        shipment: NewShipment,
        created_by: Option<ActorUuid>,
    ) -> Result<Shipment, ShipmentsServiceError>;

    /// Replace the tracking number and recipient name of a shipment.
    ///
    /// Returns `None` when the shipment does not exist. The status is kept
    /// from the stored row.
    async fn update(
        &self,
        tenant: &TenantContext,
        replacement: ShipmentReplacement,
        updated_by: Option<ActorUuid>,
    ) -> Result<Option<Shipment>, ShipmentsServiceError>;

    /// Move a shipment to a new status.
    async fn update_status(
        &self,
        tenant: &TenantContext,
        shipment: ShipmentUuid,
        change: StatusChange,
        updated_by: Option<ActorUuid>,
    ) -> Result<Shipment, ShipmentsServiceError>;

    /// Soft-delete a shipment. Deleting an absent shipment succeeds.
    async fn delete(
        &self,
        tenant: &TenantContext,
        shipment: ShipmentUuid,
        deleted_by: Option<ActorUuid>,
    ) -> Result<(), ShipmentsServiceError>;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockall::predicate::always;
    use testresult::TestResult;
    use tokio::sync::Barrier;

    use crate::domain::{
        shipments::{
            lifecycle::LifecycleError, memory::InMemoryShipmentStore, models::ShipmentVersion,
            store::MockShipmentStore,
        },
        tenants::TenantId,
    };

    use super::*;

    fn service() -> (StoreShipmentsService<InMemoryShipmentStore>, InMemoryShipmentStore) {
        let store = InMemoryShipmentStore::new();

        (StoreShipmentsService::new(store.clone()), store)
    }

    fn tenant(name: &str) -> TestResult<TenantContext> {
        Ok(TenantContext::new(TenantId::new(name)?))
    }

    fn change(status: ShipmentStatus, version: ShipmentVersion) -> StatusChange {
        StatusChange { status, version }
    }

    #[tokio::test]
    async fn create_returns_persisted_shipment_in_created_status() -> TestResult {
        let (service, _) = service();
        let acme = tenant("acme")?;
        let actor = ActorUuid::new();

        let created = service
            .create(&acme, NewShipment::new("TRACK1", "Alice"), Some(actor))
            .await?;

        assert_eq!(created.status, ShipmentStatus::Created);
        assert_eq!(created.tracking_number, "TRACK1");
        assert_eq!(created.recipient_name, "Alice");
        assert_eq!(created.created_by, Some(actor));
        assert_eq!(created.tenant.as_str(), "acme");

        let fetched = service.get_by_id(&acme, created.uuid).await?;

        assert_eq!(fetched, Some(created));

        Ok(())
    }

    #[tokio::test]
    async fn created_shipments_have_distinct_versions() -> TestResult {
        let (service, _) = service();
        let acme = tenant("acme")?;

        let first = service
            .create(&acme, NewShipment::new("TRACK1", "Alice"), None)
            .await?;
        let second = service
            .create(&acme, NewShipment::new("TRACK2", "Bob"), None)
            .await?;

        assert_ne!(first.uuid, second.uuid);
        assert_ne!(first.version, second.version);

        Ok(())
    }

    #[tokio::test]
    async fn create_with_blank_tracking_number_persists_nothing() -> TestResult {
        let (service, store) = service();

        let result = service
            .create(&tenant("acme")?, NewShipment::new("", "Alice"), None)
            .await;

        assert!(
            matches!(
                result,
                Err(ShipmentsServiceError::InvalidData(
                    LifecycleError::MissingTrackingNumber
                ))
            ),
            "expected InvalidData, got {result:?}"
        );
        assert!(store.is_empty().await);

        Ok(())
    }

    #[tokio::test]
    async fn create_with_non_created_status_is_invalid() -> TestResult {
        let (service, store) = service();

        let mut shipment = NewShipment::new("TRACK1", "Alice");
        shipment.status = ShipmentStatus::Delivered;

        let result = service.create(&tenant("acme")?, shipment, None).await;

        assert!(
            matches!(result, Err(ShipmentsServiceError::InvalidData(_))),
            "expected InvalidData, got {result:?}"
        );
        assert!(store.is_empty().await);

        Ok(())
    }

    #[tokio::test]
    async fn create_with_duplicate_tracking_number_is_a_data_access_error() -> TestResult {
        let (service, _) = service();
        let acme = tenant("acme")?;

        service
            .create(&acme, NewShipment::new("TRACK1", "Alice"), None)
            .await?;

        let result = service
            .create(&acme, NewShipment::new("TRACK1", "Bob"), None)
            .await;

        assert!(
            matches!(
                result,
                Err(ShipmentsServiceError::DataAccess {
                    source: ShipmentStoreError::DuplicateTrackingNumber,
                    ..
                })
            ),
            "expected DataAccess, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn status_lifecycle_scenario() -> TestResult {
        let (service, _) = service();
        let acme = tenant("acme")?;

        let created = service
            .create(&acme, NewShipment::new("TRACK1", "Alice"), None)
            .await?;
        let v0 = created.version;

        let in_transit = service
            .update_status(
                &acme,
                created.uuid,
                change(ShipmentStatus::InTransit, v0),
                None,
            )
            .await?;
        let v1 = in_transit.version;

        assert_eq!(in_transit.status, ShipmentStatus::InTransit);
        assert_ne!(v1, v0);

        let stale = service
            .update_status(
                &acme,
                created.uuid,
                change(ShipmentStatus::InTransit, v0),
                None,
            )
            .await;

        assert!(
            matches!(stale, Err(ShipmentsServiceError::ConcurrencyConflict)),
            "expected ConcurrencyConflict, got {stale:?}"
        );

        let repeated = service
            .update_status(
                &acme,
                created.uuid,
                change(ShipmentStatus::InTransit, v1),
                None,
            )
            .await?;

        assert_eq!(repeated.status, ShipmentStatus::InTransit);
        assert_ne!(repeated.version, v1);

        let delivered = service
            .update_status(
                &acme,
                created.uuid,
                change(ShipmentStatus::Delivered, repeated.version),
                None,
            )
            .await?;

        assert_eq!(delivered.status, ShipmentStatus::Delivered);

        let reopened = service
            .update_status(
                &acme,
                created.uuid,
                change(ShipmentStatus::InTransit, delivered.version),
                None,
            )
            .await;

        assert!(
            matches!(
                reopened,
                Err(ShipmentsServiceError::InvalidTransition {
                    from: ShipmentStatus::Delivered,
                    to: ShipmentStatus::InTransit
                })
            ),
            "expected InvalidTransition, got {reopened:?}"
        );

        let unchanged = service
            .get_by_id(&acme, created.uuid)
            .await?
            .ok_or("shipment should still exist")?;

        assert_eq!(unchanged.status, ShipmentStatus::Delivered);
        assert_eq!(unchanged.version, delivered.version);

        Ok(())
    }

    #[tokio::test]
    async fn update_status_records_actor_and_timestamp() -> TestResult {
        let (service, _) = service();
        let acme = tenant("acme")?;
        let actor = ActorUuid::new();

        let created = service
            .create(&acme, NewShipment::new("TRACK1", "Alice"), None)
            .await?;

        let updated = service
            .update_status(
                &acme,
                created.uuid,
                change(ShipmentStatus::Cancelled, created.version),
                Some(actor),
            )
            .await?;

        assert_eq!(updated.updated_by, Some(actor));
        assert!(updated.updated_at.is_some());
        assert_eq!(updated.created_at, created.created_at);

        Ok(())
    }

    #[tokio::test]
    async fn update_status_of_missing_shipment_is_not_found() -> TestResult {
        let (service, _) = service();

        let result = service
            .update_status(
                &tenant("acme")?,
                ShipmentUuid::new(),
                change(ShipmentStatus::InTransit, ShipmentVersion::new()),
                None,
            )
            .await;

        assert!(
            matches!(result, Err(ShipmentsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_writers_with_same_version_exactly_one_wins() -> TestResult {
        let (service, _) = service();
        let acme = tenant("acme")?;

        let created = service
            .create(&acme, NewShipment::new("TRACK1", "Alice"), None)
            .await?;

        let (first, second) = tokio::join!(
            service.update_status(
                &acme,
                created.uuid,
                change(ShipmentStatus::InTransit, created.version),
                None,
            ),
            service.update_status(
                &acme,
                created.uuid,
                change(ShipmentStatus::Cancelled, created.version),
                None,
            ),
        );

        let results = [first, second];

        let successes = results.iter().filter(|result| result.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|result| matches!(result, Err(ShipmentsServiceError::ConcurrencyConflict)))
            .count();

        assert_eq!(successes, 1, "exactly one writer should win");
        assert_eq!(conflicts, 1, "the other writer should see a conflict");

        Ok(())
    }

    async fn load_then_save(
        store: InMemoryShipmentStore,
        tenant: TenantContext,
        barrier: Arc<Barrier>,
        uuid: ShipmentUuid,
        status: ShipmentStatus,
    ) -> Result<ShipmentUuid, ShipmentStoreError> {
        let loaded = store.get_by_id(&tenant, uuid).await?;

        barrier.wait().await;

        let mut draft = loaded.ok_or(ShipmentStoreError::NotFound(uuid))?.to_draft();
        draft.status = status;

        store.save(&tenant, draft).await
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn writers_that_loaded_the_same_version_race_and_one_conflicts() -> TestResult {
        let (service, store) = service();
        let acme = tenant("acme")?;

        let created = service
            .create(&acme, NewShipment::new("TRACK1", "Alice"), None)
            .await?;

        let barrier = Arc::new(Barrier::new(2));

        let first = tokio::spawn(load_then_save(
            store.clone(),
            acme.clone(),
            Arc::clone(&barrier),
            created.uuid,
            ShipmentStatus::InTransit,
        ));
        let second = tokio::spawn(load_then_save(
            store.clone(),
            acme.clone(),
            Arc::clone(&barrier),
            created.uuid,
            ShipmentStatus::Cancelled,
        ));

        let results = [first.await?, second.await?];

        let successes = results.iter().filter(|result| result.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|result| matches!(result, Err(ShipmentStoreError::ConcurrencyConflict(_))))
            .count();

        assert_eq!(successes, 1, "exactly one writer should win");
        assert_eq!(conflicts, 1, "the other writer should see a conflict, got {results:?}");

        let stored = store.raw(created.uuid).await.ok_or("shipment should exist")?;

        assert_ne!(stored.version, created.version);

        Ok(())
    }

    #[tokio::test]
    async fn update_replaces_fields_and_keeps_status() -> TestResult {
        let (service, _) = service();
        let acme = tenant("acme")?;
        let actor = ActorUuid::new();

        let created = service
            .create(&acme, NewShipment::new("TRACK1", "Alice"), None)
            .await?;

        let in_transit = service
            .update_status(
                &acme,
                created.uuid,
                change(ShipmentStatus::InTransit, created.version),
                None,
            )
            .await?;

        let updated = service
            .update(
                &acme,
                ShipmentReplacement {
                    uuid: created.uuid,
                    tracking_number: "TRACK2".to_string(),
                    recipient_name: "Bob".to_string(),
                    version: in_transit.version,
                },
                Some(actor),
            )
            .await?
            .ok_or("shipment should exist")?;

        assert_eq!(updated.tracking_number, "TRACK2");
        assert_eq!(updated.recipient_name, "Bob");
        assert_eq!(updated.status, ShipmentStatus::InTransit);
        assert_eq!(updated.updated_by, Some(actor));
        assert_ne!(updated.version, in_transit.version);

        Ok(())
    }

    #[tokio::test]
    async fn update_of_missing_shipment_returns_none() -> TestResult {
        let (service, _) = service();

        let result = service
            .update(
                &tenant("acme")?,
                ShipmentReplacement {
                    uuid: ShipmentUuid::new(),
                    tracking_number: "TRACK1".to_string(),
                    recipient_name: "Alice".to_string(),
                    version: ShipmentVersion::new(),
                },
                None,
            )
            .await?;

        assert!(result.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn update_with_stale_version_is_a_conflict() -> TestResult {
        let (service, _) = service();
        let acme = tenant("acme")?;

        let created = service
            .create(&acme, NewShipment::new("TRACK1", "Alice"), None)
            .await?;

        let replacement = ShipmentReplacement {
            uuid: created.uuid,
            tracking_number: "TRACK1".to_string(),
            recipient_name: "Bob".to_string(),
            version: created.version,
        };

        service.update(&acme, replacement.clone(), None).await?;

        let result = service.update(&acme, replacement, None).await;

        assert!(
            matches!(result, Err(ShipmentsServiceError::ConcurrencyConflict)),
            "expected ConcurrencyConflict, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_with_blank_recipient_is_invalid() -> TestResult {
        let (service, _) = service();
        let acme = tenant("acme")?;

        let created = service
            .create(&acme, NewShipment::new("TRACK1", "Alice"), None)
            .await?;

        let result = service
            .update(
                &acme,
                ShipmentReplacement {
                    uuid: created.uuid,
                    tracking_number: "TRACK1".to_string(),
                    recipient_name: "   ".to_string(),
                    version: created.version,
                },
                None,
            )
            .await;

        assert!(
            matches!(
                result,
                Err(ShipmentsServiceError::InvalidData(
                    LifecycleError::MissingRecipientName
                ))
            ),
            "expected InvalidData, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn delete_is_idempotent_and_hides_shipment() -> TestResult {
        let (service, store) = service();
        let acme = tenant("acme")?;

        let created = service
            .create(&acme, NewShipment::new("TRACK1", "Alice"), None)
            .await?;

        service.delete(&acme, created.uuid, None).await?;

        let after_first = store.raw(created.uuid).await.ok_or("row should remain")?;

        service.delete(&acme, created.uuid, None).await?;

        let after_second = store.raw(created.uuid).await.ok_or("row should remain")?;

        assert!(after_first.is_deleted);
        assert_eq!(after_first, after_second);
        assert!(service.get_by_id(&acme, created.uuid).await?.is_none());
        assert!(service.get_all(&acme, 1, 50).await?.is_empty());
        assert!(
            service
                .get_by_status(&acme, ShipmentStatus::Created)
                .await?
                .is_empty()
        );

        Ok(())
    }

    #[tokio::test]
    async fn deleted_shipment_cannot_be_updated() -> TestResult {
        let (service, _) = service();
        let acme = tenant("acme")?;

        let created = service
            .create(&acme, NewShipment::new("TRACK1", "Alice"), None)
            .await?;

        service.delete(&acme, created.uuid, None).await?;

        let result = service
            .update_status(
                &acme,
                created.uuid,
                change(ShipmentStatus::InTransit, created.version),
                None,
            )
            .await;

        assert!(
            matches!(result, Err(ShipmentsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn tenants_cannot_see_each_others_shipments() -> TestResult {
        let (service, _) = service();
        let acme = tenant("acme")?;
        let globex = tenant("globex")?;

        let created = service
            .create(&acme, NewShipment::new("TRACK1", "Alice"), None)
            .await?;

        assert!(service.get_by_id(&globex, created.uuid).await?.is_none());
        assert!(service.get_all(&globex, 1, 50).await?.is_empty());
        assert!(
            service
                .get_by_status(&globex, ShipmentStatus::Created)
                .await?
                .is_empty()
        );

        let result = service
            .update_status(
                &globex,
                created.uuid,
                change(ShipmentStatus::Cancelled, created.version),
                None,
            )
            .await;

        assert!(
            matches!(result, Err(ShipmentsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() -> TestResult {
        let (service, _) = service();
        let acme = tenant("acme")?;

        for n in 0..5 {
            service
                .create(&acme, NewShipment::new(format!("TRACK{n}"), "Alice"), None)
                .await?;
        }

        assert_eq!(service.get_all(&acme, 1, 10).await?.len(), 5);
        assert!(service.get_all(&acme, 2, 10).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn listings_are_ordered_by_creation_time() -> TestResult {
        let (service, _) = service();
        let acme = tenant("acme")?;

        let mut created = Vec::new();

        for n in 0..3 {
            let shipment = service
                .create(&acme, NewShipment::new(format!("TRACK{n}"), "Alice"), None)
                .await?;

            created.push(shipment.uuid);
        }

        let newest_first: Vec<ShipmentUuid> = service
            .get_all(&acme, 1, 2)
            .await?
            .into_iter()
            .map(|shipment| shipment.uuid)
            .collect();

        let oldest_first: Vec<ShipmentUuid> = service
            .get_by_status(&acme, ShipmentStatus::Created)
            .await?
            .into_iter()
            .map(|shipment| shipment.uuid)
            .collect();

        let expected: Vec<ShipmentUuid> = created.iter().rev().take(2).copied().collect();

        assert_eq!(newest_first, expected);
        assert_eq!(oldest_first, created);

        Ok(())
    }

    #[tokio::test]
    async fn invalid_page_is_rejected_before_storage() -> TestResult {
        let mut store = MockShipmentStore::new();

        store.expect_get_all().never();

        let service = StoreShipmentsService::new(store);

        let result = service.get_all(&tenant("acme")?, 0, 10).await;

        assert!(
            matches!(result, Err(ShipmentsServiceError::InvalidPage(_))),
            "expected InvalidPage, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn store_failures_are_wrapped_as_data_access() -> TestResult {
        let mut store = MockShipmentStore::new();

        store
            .expect_get_by_id()
            .with(always(), always())
            .returning(|_, _| Err(ShipmentStoreError::Sql(sqlx::Error::PoolTimedOut)));

        let service = StoreShipmentsService::new(store);

        let result = service.get_by_id(&tenant("acme")?, ShipmentUuid::new()).await;

        assert!(
            matches!(
                result,
                Err(ShipmentsServiceError::DataAccess {
                    context: "failed to load shipment",
                    source: ShipmentStoreError::Sql(_)
                })
            ),
            "expected DataAccess, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn delete_does_not_check_existence_first() -> TestResult {
        let mut store = MockShipmentStore::new();
        let shipment = ShipmentUuid::new();

        store.expect_get_by_id().never();
        store
            .expect_delete()
            .withf(move |_, uuid, deleted_by| *uuid == shipment && deleted_by.is_none())
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = StoreShipmentsService::new(store);

        service.delete(&tenant("acme")?, shipment, None).await?;

        Ok(())
    }
}

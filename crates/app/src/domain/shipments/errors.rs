//! Shipment store and service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::shipments::{
    lifecycle::LifecycleError,
    models::{PageError, ShipmentStatus, ShipmentUuid},
};

/// Failures raised by a [`ShipmentStore`](super::ShipmentStore).
#[derive(Debug, Error)]
pub enum ShipmentStoreError {
    #[error("shipment {0} not found")]
    NotFound(ShipmentUuid),

    #[error("shipment {0} was modified before the update could be applied")]
    ConcurrencyConflict(ShipmentUuid),

    #[error("tracking number is already in use")]
    DuplicateTrackingNumber,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for ShipmentStoreError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::DuplicateTrackingNumber,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

#[derive(Debug, Error)]
pub enum ShipmentsServiceError {
    #[error("invalid shipment data: {0}")]
    InvalidData(#[source] LifecycleError),

    #[error("invalid page: {0}")]
    InvalidPage(#[from] PageError),

    #[error("cannot change status from {from} to {to}")]
    InvalidTransition {
        from: ShipmentStatus,
        to: ShipmentStatus,
    },

    #[error("shipment not found")]
    NotFound,

    #[error("the shipment was modified by another user, refresh and try again")]
    ConcurrencyConflict,

    #[error("{context}")]
    DataAccess {
        context: &'static str,
        #[source]
        source: ShipmentStoreError,
    },
}

impl ShipmentsServiceError {
    pub(crate) fn data_access(context: &'static str, source: ShipmentStoreError) -> Self {
        Self::DataAccess { context, source }
    }
}

impl From<LifecycleError> for ShipmentsServiceError {
    fn from(error: LifecycleError) -> Self {
        match error {
            LifecycleError::InvalidTransition { from, to } => Self::InvalidTransition { from, to },
            other => Self::InvalidData(other),
        }
    }
}

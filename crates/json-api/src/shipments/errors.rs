//! Shipment Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use shipments_app::domain::shipments::{ShipmentStoreError, ShipmentsServiceError};

use crate::observability::{RejectedWrite, record_rejected_write};

pub(crate) fn into_status_error(error: ShipmentsServiceError) -> StatusError {
    match error {
        ShipmentsServiceError::InvalidData(source) => {
            record_rejected_write(RejectedWrite::InvalidData);

            StatusError::bad_request().brief(format!("Invalid shipment payload: {source}"))
        }
        ShipmentsServiceError::InvalidPage(source) => {
            StatusError::bad_request().brief(format!("Invalid page: {source}"))
        }
        error @ ShipmentsServiceError::InvalidTransition { .. } => {
            record_rejected_write(RejectedWrite::InvalidTransition);

            StatusError::unprocessable_entity().brief(error.to_string())
        }
        ShipmentsServiceError::NotFound => StatusError::not_found().brief("Shipment not found"),
        error @ ShipmentsServiceError::ConcurrencyConflict => {
            record_rejected_write(RejectedWrite::Conflict);

            StatusError::conflict().brief(error.to_string())
        }
        ShipmentsServiceError::DataAccess {
            source: ShipmentStoreError::DuplicateTrackingNumber,
            ..
        } => {
            record_rejected_write(RejectedWrite::DuplicateTrackingNumber);
            warn!("rejected duplicate tracking number");

            StatusError::conflict().brief("Tracking number already in use")
        }
        ShipmentsServiceError::DataAccess { context, source } => {
            error!("{context}: {source}");

            StatusError::internal_server_error()
        }
    }
}

//! Shipment lifecycle rules.
//!
//! Pure checks run before anything reaches storage.

use thiserror::Error;

use crate::domain::shipments::models::{NewShipment, ShipmentReplacement, ShipmentStatus};

/// Maximum length of the tracking number and recipient name columns.
pub const MAX_FIELD_LEN: usize = 255;

/// A shipment failed a lifecycle rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("tracking number is required")]
    MissingTrackingNumber,

    #[error("recipient name is required")]
    MissingRecipientName,

    #[error("{field} cannot exceed {} characters", MAX_FIELD_LEN)]
    FieldTooLong { field: &'static str },

    #[error("new shipments must have status '{}', got '{status}'", ShipmentStatus::Created)]
    InvalidInitialStatus { status: ShipmentStatus },

    #[error("cannot change status from {from} to {to}")]
    InvalidTransition {
        from: ShipmentStatus,
        to: ShipmentStatus,
    },
}

/// Check a shipment about to be created.
///
/// # Errors
///
/// Returns an error for a blank or over-long tracking number or recipient
/// name, or an initial status other than [`ShipmentStatus::Created`].
pub fn validate_for_create(shipment: &NewShipment) -> Result<(), LifecycleError> {
    validate_fields(&shipment.tracking_number, &shipment.recipient_name)?;

    if shipment.status != ShipmentStatus::Created {
        return Err(LifecycleError::InvalidInitialStatus {
            status: shipment.status,
        });
    }

    Ok(())
}

/// Check the caller-supplied fields of an update-by-replace.
///
/// # Errors
///
/// Returns an error for a blank or over-long tracking number or recipient name.
pub fn validate_for_update(replacement: &ShipmentReplacement) -> Result<(), LifecycleError> {
    validate_fields(&replacement.tracking_number, &replacement.recipient_name)
}

/// Check that a shipment may move from `current` to `requested`.
///
/// Terminal statuses only accept a transition to themselves.
///
/// # Errors
///
/// Returns [`LifecycleError::InvalidTransition`] when `current` is terminal and
/// `requested` differs from it.
pub fn validate_transition(
    current: ShipmentStatus,
    requested: ShipmentStatus,
) -> Result<(), LifecycleError> {
    if current.is_terminal() && requested != current {
        return Err(LifecycleError::InvalidTransition {
            from: current,
            to: requested,
        });
    }

    Ok(())
}

fn validate_fields(tracking_number: &str, recipient_name: &str) -> Result<(), LifecycleError> {
    if tracking_number.trim().is_empty() {
        return Err(LifecycleError::MissingTrackingNumber);
    }

    if recipient_name.trim().is_empty() {
        return Err(LifecycleError::MissingRecipientName);
    }

    if tracking_number.chars().count() > MAX_FIELD_LEN {
        return Err(LifecycleError::FieldTooLong {
            field: "tracking number",
        });
    }

    if recipient_name.chars().count() > MAX_FIELD_LEN {
        return Err(LifecycleError::FieldTooLong {
            field: "recipient name",
        });
    }

    Ok(())
}

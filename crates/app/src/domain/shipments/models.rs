//! Shipment Models

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use jiff::Timestamp;
use thiserror::Error;

use crate::{domain::tenants::TenantId, uuids::TypedUuid};

/// Shipment UUID
pub type ShipmentUuid = TypedUuid<Shipment>;

/// Shipment Version
pub struct ShipmentVersionToken;

/// Optimistic-concurrency token, reassigned on every successful write.
pub type ShipmentVersion = TypedUuid<ShipmentVersionToken>;

/// Acting User
pub struct Actor;

/// UUID of the user recorded in audit fields.
pub type ActorUuid = TypedUuid<Actor>;

/// Shipment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShipmentStatus {
    Created,
    InTransit,
    Delivered,
    Cancelled,
}

impl ShipmentStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Created,
        Self::InTransit,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Stable storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::InTransit => "in_transit",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether no further transition (other than to itself) is allowed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl Display for ShipmentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown shipment status \"{0}\"")]
pub struct UnknownStatus(pub String);

impl FromStr for ShipmentStatus {
    type Err = UnknownStatus;

    /// Accepts the snake case form (`in_transit`) as well as the
    /// case-insensitive variant name (`InTransit`, `intransit`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace(['_', '-'], "").to_ascii_lowercase();

        match normalized.as_str() {
            "created" => Ok(Self::Created),
            "intransit" => Ok(Self::InTransit),
            "delivered" => Ok(Self::Delivered),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// Shipment Model
#[derive(Debug, Clone, PartialEq)]
pub struct Shipment {
    pub uuid: ShipmentUuid,
    pub tenant: TenantId,
    pub tracking_number: String,
    pub recipient_name: String,
    pub status: ShipmentStatus,
    pub version: ShipmentVersion,
    pub created_at: Timestamp,
    pub created_by: Option<ActorUuid>,
    pub updated_at: Option<Timestamp>,
    pub updated_by: Option<ActorUuid>,
    pub is_deleted: bool,
    pub deleted_at: Option<Timestamp>,
    pub deleted_by: Option<ActorUuid>,
}

impl Shipment {
    /// Build an update draft carrying this shipment's current values and version.
    #[must_use]
    pub fn to_draft(&self) -> ShipmentDraft {
        ShipmentDraft {
            identity: Some(ShipmentIdentity {
                uuid: self.uuid,
                version: self.version,
            }),
            tracking_number: self.tracking_number.clone(),
            recipient_name: self.recipient_name.clone(),
            status: self.status,
            created_by: self.created_by,
            updated_by: self.updated_by,
        }
    }
}

/// New Shipment Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShipment {
    pub tracking_number: String,
    pub recipient_name: String,
    pub status: ShipmentStatus,
}

impl NewShipment {
    #[must_use]
    pub fn new(tracking_number: impl Into<String>, recipient_name: impl Into<String>) -> Self {
        Self {
            tracking_number: tracking_number.into(),
            recipient_name: recipient_name.into(),
            status: ShipmentStatus::Created,
        }
    }
}

/// Shipment Replacement Data
///
/// The caller-settable fields of an update-by-replace. Status and audit fields
/// are not part of it; status only changes through [`StatusChange`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentReplacement {
    pub uuid: ShipmentUuid,
    pub tracking_number: String,
    pub recipient_name: String,
    pub version: ShipmentVersion,
}

/// Shipment Status Change Data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub status: ShipmentStatus,
    pub version: ShipmentVersion,
}

/// Identity of an existing shipment row as last read by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipmentIdentity {
    pub uuid: ShipmentUuid,
    pub version: ShipmentVersion,
}

/// Store-level upsert input.
///
/// Without an identity the draft is inserted as a new shipment; with one it
/// replaces the live row if, and only if, the stored version still matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentDraft {
    pub identity: Option<ShipmentIdentity>,
    pub tracking_number: String,
    pub recipient_name: String,
    pub status: ShipmentStatus,
    pub created_by: Option<ActorUuid>,
    pub updated_by: Option<ActorUuid>,
}

/// Largest page a single listing may return.
pub const MAX_PAGE_SIZE: u32 = 1_000;

/// Default page size for listings.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("page numbers start at 1")]
    ZeroPage,

    #[error("page size must be between 1 and {}", MAX_PAGE_SIZE)]
    InvalidSize,
}

/// A 1-based page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    number: u32,
    size: u32,
}

impl Page {
    /// # Errors
    ///
    /// Returns an error for page `0` or a size outside `1..=MAX_PAGE_SIZE`.
    pub fn new(number: u32, size: u32) -> Result<Self, PageError> {
        if number == 0 {
            return Err(PageError::ZeroPage);
        }

        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(PageError::InvalidSize);
        }

        Ok(Self { number, size })
    }

    #[must_use]
    pub const fn number(self) -> u32 {
        self.number
    }

    #[must_use]
    pub const fn size(self) -> u32 {
        self.size
    }

    /// Rows to skip before this page starts.
    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.number - 1) * u64::from(self.size)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

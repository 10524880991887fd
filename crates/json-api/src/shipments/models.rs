//! Shipment wire types.

use std::string::ToString;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shipments_app::domain::shipments::models::{ActorUuid, Shipment};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ShipmentResponse {
    /// The unique identifier of the shipment
    pub uuid: Uuid,

    /// Carrier tracking number
    pub tracking_number: String,

    /// Name of the recipient
    pub recipient_name: String,

    /// Lifecycle status: `created`, `in_transit`, `delivered` or `cancelled`
    pub status: String,

    /// Version token to send back with the next update
    pub version: Uuid,

    /// The date and time the shipment was created
    pub created_at: String,

    /// The user who created the shipment
    pub created_by: Option<Uuid>,

    /// The date and time the shipment was last updated
    pub updated_at: Option<String>,

    /// The user who last updated the shipment
    pub updated_by: Option<Uuid>,
}

impl From<Shipment> for ShipmentResponse {
    fn from(shipment: Shipment) -> Self {
        ShipmentResponse {
            uuid: shipment.uuid.into(),
            tracking_number: shipment.tracking_number,
            recipient_name: shipment.recipient_name,
            status: shipment.status.to_string(),
            version: shipment.version.into(),
            created_at: shipment.created_at.to_string(),
            created_by: shipment.created_by.map(ActorUuid::into_uuid),
            updated_at: shipment.updated_at.as_ref().map(ToString::to_string),
            updated_by: shipment.updated_by.map(ActorUuid::into_uuid),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ShipmentsResponse {
    /// The list of shipments
    pub shipments: Vec<ShipmentResponse>,
}

impl FromIterator<Shipment> for ShipmentsResponse {
    fn from_iter<I: IntoIterator<Item = Shipment>>(iter: I) -> Self {
        Self {
            shipments: iter.into_iter().map(Into::into).collect(),
        }
    }
}

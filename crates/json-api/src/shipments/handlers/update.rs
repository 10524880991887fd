//! Update Shipment Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shipments_app::domain::shipments::models::{ShipmentReplacement, ShipmentUuid};

use crate::{
    extensions::*,
    shipments::{errors::into_status_error, models::ShipmentResponse},
    state::State,
};

/// Update Shipment Request
///
/// Replaces the tracking number and recipient name. Status changes go through
/// the status endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateShipmentRequest {
    pub tracking_number: String,
    pub recipient_name: String,

    /// Version token from the last read of the shipment
    pub version: Uuid,
}

impl UpdateShipmentRequest {
    fn into_replacement(self, uuid: ShipmentUuid) -> ShipmentReplacement {
        ShipmentReplacement {
            uuid,
            tracking_number: self.tracking_number,
            recipient_name: self.recipient_name,
            version: self.version.into(),
        }
    }
}

/// Update Shipment Handler
#[endpoint(
    tags("shipments"),
    summary = "Update Shipment",
    responses(
        (status_code = StatusCode::OK, description = "Shipment updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid shipment payload"),
        (status_code = StatusCode::NOT_FOUND, description = "Shipment not found"),
        (status_code = StatusCode::CONFLICT, description = "Stale version or duplicate tracking number"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "shipments.update",
    skip(shipment, json, depot),
    fields(tenant = tracing::field::Empty, shipment_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    shipment: PathParam<Uuid>,
    json: JsonBody<UpdateShipmentRequest>,
    depot: &mut Depot,
) -> Result<Json<ShipmentResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_context_or_500()?;
    let actor = depot.actor();
    let shipment = shipment.into_inner();

    let span = tracing::Span::current();
    span.record("tenant", tracing::field::display(tenant.current()));
    span.record("shipment_uuid", tracing::field::display(shipment));

    let replacement = json
        .into_inner()
        .into_replacement(shipment.into());

    let shipment = state
        .app
        .shipments
        .update(tenant, replacement, actor)
        .await
        .map_err(into_status_error)?
        .ok_or_else(|| StatusError::not_found().brief("Shipment not found"))?;

    Ok(Json(shipment.into()))
}

//! Update Shipment Status Handler

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

use shipments_app::domain::shipments::models::{ShipmentStatus, StatusChange};

use crate::{
    extensions::*,
    shipments::{errors::into_status_error, models::ShipmentResponse},
    state::State,
};

/// Update Shipment Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateShipmentStatusRequest {
    /// Target status
    pub status: String,

    /// Version token from the last read of the shipment
    pub version: Uuid,
}

impl TryFrom<UpdateShipmentStatusRequest> for StatusChange {
    type Error = StatusError;

    fn try_from(request: UpdateShipmentStatusRequest) -> Result<Self, Self::Error> {
        let status = request
            .status
            .parse::<ShipmentStatus>()
            .or_400()?;

        Ok(StatusChange {
            status,
            version: request.version.into(),
        })
    }
}

/// Update Shipment Status Handler
///
/// Sets a shipment's status. A shipment that is `created` or `in_transit` may
/// move to any status. One that is `delivered` or `cancelled` only accepts its
/// current status again.
#[endpoint(
    tags("shipments"),
    summary = "Update Shipment Status",
    responses(
        (status_code = StatusCode::OK, description = "Status updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown status"),
        (status_code = StatusCode::NOT_FOUND, description = "Shipment not found"),
        (status_code = StatusCode::CONFLICT, description = "Stale version"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Transition not allowed"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "shipments.update_status",
    skip(shipment, json, depot),
    fields(tenant = tracing::field::Empty, shipment_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    shipment: PathParam<Uuid>,
    json: JsonBody<UpdateShipmentStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<ShipmentResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_context_or_500()?;
    let actor = depot.actor();
    let shipment = shipment.into_inner();

    let span = tracing::Span::current();
    span.record("tenant", tracing::field::display(tenant.current()));
    span.record("shipment_uuid", tracing::field::display(shipment));

    let shipment = state
        .app
        .shipments
        .update_status(
            tenant,
            shipment.into(),
            json.into_inner().try_into()?,
            actor,
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(shipment.into()))
}

//! Create Shipment Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use shipments_app::domain::shipments::models::{NewShipment, ShipmentStatus};

use crate::{
    extensions::*,
    shipments::{errors::into_status_error, models::ShipmentResponse},
    state::State,
};

/// Create Shipment Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateShipmentRequest {
    pub tracking_number: String,
    pub recipient_name: String,

    /// Initial status; only `created` is accepted
    #[serde(default)]
    pub status: Option<String>,
}

impl TryFrom<CreateShipmentRequest> for NewShipment {
    type Error = StatusError;

    fn try_from(request: CreateShipmentRequest) -> Result<Self, Self::Error> {
        let status = match request.status {
            Some(status) => status
                .parse::<ShipmentStatus>()
                .or_400()?,
            None => ShipmentStatus::Created,
        };

        Ok(NewShipment {
            tracking_number: request.tracking_number,
            recipient_name: request.recipient_name,
            status,
        })
    }
}

/// Create Shipment Handler
#[endpoint(
    tags("shipments"),
    summary = "Create Shipment",
    responses(
        (status_code = StatusCode::CREATED, description = "Shipment created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid shipment payload"),
        (status_code = StatusCode::CONFLICT, description = "Tracking number already in use"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "shipments.create",
    skip(json, depot, res),
    fields(tenant = tracing::field::Empty, shipment_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateShipmentRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ShipmentResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_context_or_500()?;
    let actor = depot.actor();

    let span = tracing::Span::current();
    span.record("tenant", tracing::field::display(tenant.current()));

    let shipment = state
        .app
        .shipments
        .create(tenant, json.into_inner().try_into()?, actor)
        .await
        .map_err(into_status_error)?;

    span.record("shipment_uuid", tracing::field::display(shipment.uuid));

    res.add_header(LOCATION, format!("/shipments/{}", shipment.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(shipment.into()))
}

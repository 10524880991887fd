//! Shipments By Status Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use shipments_app::domain::shipments::models::ShipmentStatus;

use crate::{
    extensions::*,
    shipments::{errors::into_status_error, models::ShipmentsResponse},
    state::State,
};

/// Shipments By Status Handler
///
/// Returns every live shipment in the given status, oldest first.
#[endpoint(
    tags("shipments"),
    summary = "List Shipments By Status",
    responses(
        (status_code = StatusCode::OK, description = "Shipments in the status"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown status"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    status: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<ShipmentsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_context_or_500()?;

    let status = status
        .into_inner()
        .parse::<ShipmentStatus>()
        .or_400()?;

    let shipments = state
        .app
        .shipments
        .get_by_status(tenant, status)
        .await
        .map_err(into_status_error)?;

    Ok(Json(shipments.into_iter().collect()))
}

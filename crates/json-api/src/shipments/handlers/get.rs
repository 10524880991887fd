//! Get Shipment Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    shipments::{errors::into_status_error, models::ShipmentResponse},
    state::State,
};

/// Get Shipment Handler
#[endpoint(
    tags("shipments"),
    summary = "Get Shipment",
    responses(
        (status_code = StatusCode::OK, description = "Shipment found"),
        (status_code = StatusCode::NOT_FOUND, description = "Shipment not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    shipment: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ShipmentResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_context_or_500()?;

    let shipment = state
        .app
        .shipments
        .get_by_id(tenant, shipment.into_inner().into())
        .await
        .map_err(into_status_error)?
        .ok_or_else(|| StatusError::not_found().brief("Shipment not found"))?;

    Ok(Json(shipment.into()))
}

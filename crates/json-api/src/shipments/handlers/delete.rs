//! Delete Shipment Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, shipments::errors::into_status_error, state::State};

/// Delete Shipment Handler
///
/// Soft-deletes the shipment. Deleting a shipment that is already gone also
/// answers 204.
#[endpoint(
    tags("shipments"),
    summary = "Delete Shipment",
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Shipment deleted"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "shipments.delete",
    skip(shipment, depot),
    fields(tenant = tracing::field::Empty, shipment_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    shipment: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_context_or_500()?;
    let actor = depot.actor();
    let shipment = shipment.into_inner();

    let span = tracing::Span::current();
    span.record("tenant", tracing::field::display(tenant.current()));
    span.record("shipment_uuid", tracing::field::display(shipment));

    state
        .app
        .shipments
        .delete(tenant, shipment.into(), actor)
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}

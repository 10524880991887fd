//! Shipment Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use shipments_app::domain::shipments::models::DEFAULT_PAGE_SIZE;

use crate::{
    extensions::*,
    shipments::{errors::into_status_error, models::ShipmentsResponse},
    state::State,
};

/// Camel-case spelling of the `page_size` query parameter.
const PAGE_SIZE_ALIAS: &str = "pageSize";

/// Shipment Index Handler
///
/// Returns one page of the tenant's live shipments, newest first. Pages start
/// at 1; a page past the end is an empty list. The page size is also read from
/// `pageSize` when `page_size` is not given.
#[endpoint(
    tags("shipments"),
    summary = "List Shipments",
    responses(
        (status_code = StatusCode::OK, description = "Page of shipments"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid page or page size"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    page_size: QueryParam<u32, false>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<ShipmentsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_context_or_500()?;

    let page_size = match page_size.into_inner() {
        Some(page_size) => page_size,
        None => match req.query::<String>(PAGE_SIZE_ALIAS) {
            Some(value) => value.trim().parse::<u32>().or_400()?,
            None => DEFAULT_PAGE_SIZE,
        },
    };

    let shipments = state
        .app
        .shipments
        .get_all(tenant, page.into_inner().unwrap_or(1), page_size)
        .await
        .map_err(into_status_error)?;

    Ok(Json(shipments.into_iter().collect()))
}

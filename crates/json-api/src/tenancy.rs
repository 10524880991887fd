//! Tenant and actor resolution middleware.

use std::{
    str::{self, Utf8Error},
    sync::Arc,
};

use salvo::prelude::*;
use tracing::{Span, warn};
use uuid::Uuid;

use shipments_app::domain::{shipments::models::ActorUuid, tenants::TenantContext};

use crate::{extensions::*, state::State};

pub(crate) const DEFAULT_TENANT_HEADER: &str = "x-tenant-id";

/// Header carrying the UUID of the user acting on the request.
pub(crate) const ACTOR_HEADER: &str = "x-actor-id";

/// Resolve the request's tenant and actor before any handler runs.
///
/// A missing or blank tenant header selects the configured default tenant.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Ok(state) = depot.obtain_or_500::<Arc<State>>() else {
        res.render(StatusError::internal_server_error());

        return;
    };

    let Ok(selector) = header_text(req, state.tenancy.header.as_str()) else {
        warn!("rejected tenant selector that is not valid UTF-8");

        res.render(StatusError::bad_request().brief("Invalid tenant: not valid UTF-8"));

        return;
    };

    let tenant = match TenantContext::from_selector(selector, &state.tenancy.default_tenant) {
        Ok(tenant) => tenant,
        Err(source) => {
            warn!("rejected tenant selector: {source}");

            res.render(StatusError::bad_request().brief(format!("Invalid tenant: {source}")));

            return;
        }
    };

    let actor = match header_text(req, ACTOR_HEADER).map(|value| value.map(Uuid::parse_str)) {
        Ok(None) => None,
        Ok(Some(Ok(uuid))) => Some(ActorUuid::from_uuid(uuid)),
        Ok(Some(Err(_))) | Err(_) => {
            res.render(StatusError::bad_request().brief("Invalid actor id"));

            return;
        }
    };

    Span::current().record("tenant", tracing::field::display(tenant.current()));

    depot.insert_tenant_context(tenant);
    depot.insert_actor(actor);

    ctrl.call_next(req, depot, res).await;
}

/// Read a header as text.
///
/// Absent and blank values are `None`. Non-ASCII values are kept so they can be
/// validated instead of silently treated as missing.
fn header_text<'a>(req: &'a Request, name: &str) -> Result<Option<&'a str>, Utf8Error> {
    let Some(value) = req.headers().get(name) else {
        return Ok(None);
    };

    let text = str::from_utf8(value.as_bytes())?.trim();

    Ok((!text.is_empty()).then_some(text))
}

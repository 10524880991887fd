//! App Router

use salvo::Router;

use crate::{shipments, tenancy};

pub fn app_router() -> Router {
    Router::new().hoop(tenancy::handler).push(
        Router::with_path("shipments")
            .get(shipments::index::handler)
            .post(shipments::create::handler)
            .push(Router::with_path("by-status/{status}").get(shipments::by_status::handler))
            .push(
                Router::with_path("{shipment}")
                    .get(shipments::get::handler)
                    .put(shipments::update::handler)
                    .delete(shipments::delete::handler)
                    .push(Router::with_path("status").patch(shipments::update_status::handler)),
            ),
    )
}

//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};

use shipments_app::{
    context::AppContext,
    domain::{
        shipments::{
            MockShipmentsService,
            models::{Shipment, ShipmentStatus, ShipmentUuid, ShipmentVersion},
        },
        tenants::{TenantContext, TenantId},
    },
};

use crate::{
    extensions::*,
    state::{State, Tenancy},
};

pub(crate) const TEST_TENANT: &str = "test-tenant";

pub(crate) fn test_tenant() -> TenantContext {
    TenantId::new(TEST_TENANT)
        .map(TenantContext::new)
        .unwrap_or_default()
}

#[salvo::handler]
pub(crate) async fn inject_tenant(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_tenant_context(test_tenant());
    depot.insert_actor(None);
    ctrl.call_next(req, depot, res).await;
}

pub(crate) fn make_shipment(uuid: ShipmentUuid, status: ShipmentStatus) -> Shipment {
    Shipment {
        uuid,
        tenant: test_tenant().current().clone(),
        tracking_number: "TRACK1".to_string(),
        recipient_name: "Alice".to_string(),
        status,
        version: ShipmentVersion::new(),
        created_at: Timestamp::UNIX_EPOCH,
        created_by: None,
        updated_at: None,
        updated_by: None,
        is_deleted: false,
        deleted_at: None,
        deleted_by: None,
    }
}

pub(crate) fn state_with_shipments(shipments: MockShipmentsService) -> Arc<State> {
    State::from_app_context(AppContext::new(Arc::new(shipments)), Tenancy::default())
}

pub(crate) fn shipments_service(shipments: MockShipmentsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_shipments(shipments)))
            .hoop(inject_tenant)
            .push(route),
    )
}

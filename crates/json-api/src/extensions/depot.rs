//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use shipments_app::domain::{shipments::models::ActorUuid, tenants::TenantContext};

/// Per-request actor recorded in audit fields, absent for anonymous callers.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RequestActor(pub(crate) Option<ActorUuid>);

/// Helpers for request-scoped values and mapping depot failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_tenant_context(&mut self, tenant: TenantContext);

    fn tenant_context_or_500(&self) -> Result<&TenantContext, StatusError>;

    fn insert_actor(&mut self, actor: Option<ActorUuid>);

    fn actor(&self) -> Option<ActorUuid>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_tenant_context(&mut self, tenant: TenantContext) {
        self.inject(tenant);
    }

    fn tenant_context_or_500(&self) -> Result<&TenantContext, StatusError> {
        self.obtain_or_500::<TenantContext>()
    }

    fn insert_actor(&mut self, actor: Option<ActorUuid>) {
        self.inject(RequestActor(actor));
    }

    fn actor(&self) -> Option<ActorUuid> {
        self.obtain::<RequestActor>()
            .ok()
            .and_then(|actor| actor.0)
    }
}

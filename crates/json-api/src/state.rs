//! State

use std::sync::Arc;

use shipments_app::{context::AppContext, domain::tenants::TenantId};

/// How requests select their tenant.
#[derive(Debug, Clone)]
pub(crate) struct Tenancy {
    /// Header carrying the tenant selector.
    pub(crate) header: String,

    /// Tenant used when the header is missing or blank.
    pub(crate) default_tenant: TenantId,
}

impl Default for Tenancy {
    fn default() -> Self {
        Self {
            header: crate::tenancy::DEFAULT_TENANT_HEADER.to_string(),
            default_tenant: TenantId::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
    pub(crate) tenancy: Tenancy,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext, tenancy: Tenancy) -> Self {
        Self { app, tenancy }
    }

    #[must_use]
    pub(crate) fn from_app_context(app: AppContext, tenancy: Tenancy) -> Arc<Self> {
        Arc::new(Self::new(app, tenancy))
    }
}

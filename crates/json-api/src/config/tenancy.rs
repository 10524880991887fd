//! Tenancy Config

use clap::Args;

/// Tenant resolution settings.
#[derive(Debug, Args)]
pub struct TenancyConfig {
    /// Tenant used when a request does not select one
    #[arg(long, env = "DEFAULT_TENANT", default_value = "demo")]
    pub default_tenant: String,

    /// Request header carrying the tenant selector
    #[arg(long, env = "TENANT_HEADER", default_value = "x-tenant-id")]
    pub tenant_header: String,
}

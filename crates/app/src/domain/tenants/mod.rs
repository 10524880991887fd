//! Tenants

pub mod context;
pub mod errors;
pub mod models;

pub use context::TenantContext;
pub use errors::TenantIdError;
pub use models::TenantId;

//! Tenant errors.

use thiserror::Error;

/// Reasons a tenant selector cannot become a [`TenantId`](super::TenantId).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TenantIdError {
    /// The selector was empty or whitespace only.
    #[error("tenant id cannot be empty")]
    Empty,

    /// The selector exceeds the persisted column width.
    #[error("tenant id cannot exceed {max} characters")]
    TooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
}

//! Tenant Models

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use crate::domain::tenants::errors::TenantIdError;

/// Maximum tenant id length, matching the `shipments.tenant` column.
pub const MAX_TENANT_ID_LEN: usize = 255;

/// Tenant used when a request does not select one.
pub const DEFAULT_TENANT: &str = "demo";

/// Tenant Identifier
///
/// Tenants are plain, case-sensitive string keys. A value is always trimmed,
/// non-empty and at most [`MAX_TENANT_ID_LEN`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TenantId(String);

impl TenantId {
    /// Validate and wrap a tenant key.
    ///
    /// # Errors
    ///
    /// Returns an error when the key is blank or too long.
    pub fn new(value: impl AsRef<str>) -> Result<Self, TenantIdError> {
        let value = value.as_ref().trim();

        if value.is_empty() {
            return Err(TenantIdError::Empty);
        }

        if value.chars().count() > MAX_TENANT_ID_LEN {
            return Err(TenantIdError::TooLong {
                max: MAX_TENANT_ID_LEN,
            });
        }

        Ok(Self(value.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TenantId {
    fn default() -> Self {
        Self(DEFAULT_TENANT.to_string())
    }
}

impl Display for TenantId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl FromStr for TenantId {
    type Err = TenantIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

//! Per-request tenant context.

use crate::domain::tenants::{errors::TenantIdError, models::TenantId};

/// The tenant a unit of work runs under.
///
/// A context is built once when a request arrives and handed by reference to
/// every service and store call made on behalf of that request. It has no
/// setters: the tenant is fixed for the lifetime of the value, so concurrent
/// requests each carry their own context and cannot observe one another's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    tenant: TenantId,
}

impl TenantContext {
    #[must_use]
    pub fn new(tenant: TenantId) -> Self {
        Self { tenant }
    }

    /// Resolve the tenant for a request from an optional selector value.
    ///
    /// A missing or blank selector falls back to `default`.
    ///
    /// # Errors
    ///
    /// Returns an error when a non-blank selector is not a valid tenant id.
    pub fn from_selector(selector: Option<&str>, default: &TenantId) -> Result<Self, TenantIdError> {
        match selector.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => TenantId::new(value).map(Self::new),
            None => Ok(Self::new(default.clone())),
        }
    }

    /// The tenant every data access in this unit of work is scoped to.
    #[must_use]
    pub fn current(&self) -> &TenantId {
        &self.tenant
    }
}

impl Default for TenantContext {
    fn default() -> Self {
        Self::new(TenantId::default())
    }
}

impl From<TenantId> for TenantContext {
    fn from(tenant: TenantId) -> Self {
        Self::new(tenant)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn missing_selector_uses_default_tenant() -> TestResult {
        let default = TenantId::new("fallback")?;

        let context = TenantContext::from_selector(None, &default)?;

        assert_eq!(context.current(), &default);

        Ok(())
    }

    #[test]
    fn blank_selector_uses_default_tenant() -> TestResult {
        let context = TenantContext::from_selector(Some("  "), &TenantId::default())?;

        assert_eq!(context.current().as_str(), "demo");

        Ok(())
    }

    #[test]
    fn selector_overrides_default_tenant() -> TestResult {
        let context = TenantContext::from_selector(Some("acme"), &TenantId::default())?;

        assert_eq!(context.current().as_str(), "acme");

        Ok(())
    }

    #[test]
    fn invalid_selector_is_rejected() {
        let selector = "x".repeat(300);

        let result = TenantContext::from_selector(Some(&selector), &TenantId::default());

        assert!(
            matches!(result, Err(TenantIdError::TooLong { .. })),
            "expected TooLong, got {result:?}"
        );
    }
}

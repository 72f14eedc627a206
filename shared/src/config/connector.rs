//! Connector properties for identity event handlers
//!
//! Properties are plain strings keyed by connector property name
//! (e.g. `UserClaimUpdate.MobileNumber.EnableVerification`). A tenant
//! override always wins over the deployment-wide default.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Connector properties with per-tenant overrides
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConnectorSettings {
    /// Deployment-wide property values
    #[serde(default)]
    pub defaults: HashMap<String, String>,

    /// Tenant domain -> property overrides
    #[serde(default)]
    pub tenants: HashMap<String, HashMap<String, String>>,
}

impl ConnectorSettings {
    /// Create empty settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a deployment-wide default
    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }

    /// Set a property for a single tenant
    pub fn with_tenant_value(
        mut self,
        tenant_domain: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.tenants
            .entry(tenant_domain.into())
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    /// Resolve a property for a tenant
    pub fn lookup(&self, key: &str, tenant_domain: &str) -> Option<&str> {
        self.tenants
            .get(tenant_domain)
            .and_then(|props| props.get(key))
            .or_else(|| self.defaults.get(key))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "UserClaimUpdate.MobileNumber.EnableVerification";

    #[test]
    fn test_tenant_override_wins() {
        let settings = ConnectorSettings::new()
            .with_default(KEY, "false")
            .with_tenant_value("wso2.com", KEY, "true");

        assert_eq!(settings.lookup(KEY, "wso2.com"), Some("true"));
        assert_eq!(settings.lookup(KEY, "other.com"), Some("false"));
    }

    #[test]
    fn test_missing_key() {
        let settings = ConnectorSettings::new();
        assert_eq!(settings.lookup(KEY, "wso2.com"), None);
    }

    #[test]
    fn test_deserialize_from_toml_shape() {
        let json = serde_json::json!({
            "defaults": { KEY: "true" },
            "tenants": { "test.com": { "UserClaimUpdate.UseVerifyClaim": "true" } }
        });
        let settings: ConnectorSettings = serde_json::from_value(json).unwrap();
        assert_eq!(settings.lookup(KEY, "test.com"), Some("true"));
        assert_eq!(settings.lookup("UserClaimUpdate.UseVerifyClaim", "test.com"), Some("true"));
    }
}

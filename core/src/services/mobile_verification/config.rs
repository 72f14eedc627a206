//! Tenant verification policy configuration

use async_trait::async_trait;
use mv_shared::config::ConnectorSettings;

use crate::domain::entities::claims::DEFAULT_MULTI_ATTRIBUTE_SEPARATOR;
use crate::domain::entities::recovery::DEFAULT_CODE_EXPIRY_MINUTES;
use crate::errors::{ServerError, StoreError};

use super::traits::ConnectorConfigProvider;

/// Connector property keys
pub mod connector_keys {
    pub const ENABLE_MOBILE_VERIFICATION_ON_UPDATE: &str =
        "UserClaimUpdate.MobileNumber.EnableVerification";
    pub const ENABLE_MULTIPLE_MOBILE_NUMBERS: &str =
        "UserClaimUpdate.EnableMultipleEmailsAndMobileNumbers";
    pub const USE_VERIFY_CLAIM: &str = "UserClaimUpdate.UseVerifyClaim";
    pub const MOBILE_VERIFICATION_CODE_EXPIRY: &str =
        "UserClaimUpdate.MobileNumber.VerificationCode.ExpiryTime";
    pub const MULTI_ATTRIBUTE_SEPARATOR: &str = "MultiAttributeSeparator";
}

/// Verification flags for one tenant, read once per operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationPolicyConfig {
    /// Whether mobile number changes must be verified over SMS
    pub verification_on_update_enabled: bool,
    /// Whether users may hold several mobile numbers
    pub multi_attribute_enabled: bool,
    /// Whether verification only runs when `verifyMobile` is true
    pub use_explicit_verify_claim: bool,
    /// Separator for multi-valued claims
    pub multi_attribute_separator: String,
    /// Lifetime of issued verification codes
    pub code_expiry_minutes: i64,
}

impl Default for VerificationPolicyConfig {
    fn default() -> Self {
        Self {
            verification_on_update_enabled: false,
            multi_attribute_enabled: false,
            use_explicit_verify_claim: false,
            multi_attribute_separator: DEFAULT_MULTI_ATTRIBUTE_SEPARATOR.to_string(),
            code_expiry_minutes: DEFAULT_CODE_EXPIRY_MINUTES,
        }
    }
}

impl VerificationPolicyConfig {
    /// Read the tenant's configuration through the provider
    pub async fn resolve<C>(provider: &C, tenant_domain: &str) -> Result<Self, ServerError>
    where
        C: ConnectorConfigProvider + ?Sized,
    {
        let defaults = Self::default();

        let verification_on_update_enabled =
            read(provider, connector_keys::ENABLE_MOBILE_VERIFICATION_ON_UPDATE, tenant_domain)
                .await?
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.verification_on_update_enabled);
        let multi_attribute_enabled =
            read(provider, connector_keys::ENABLE_MULTIPLE_MOBILE_NUMBERS, tenant_domain)
                .await?
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.multi_attribute_enabled);
        let use_explicit_verify_claim = read(provider, connector_keys::USE_VERIFY_CLAIM, tenant_domain)
            .await?
            .map(|v| parse_flag(&v))
            .unwrap_or(defaults.use_explicit_verify_claim);
        let multi_attribute_separator =
            read(provider, connector_keys::MULTI_ATTRIBUTE_SEPARATOR, tenant_domain)
                .await?
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.multi_attribute_separator);
        let code_expiry_minutes =
            read(provider, connector_keys::MOBILE_VERIFICATION_CODE_EXPIRY, tenant_domain)
                .await?
                .and_then(|v| v.trim().parse::<i64>().ok())
                .filter(|minutes| *minutes > 0)
                .unwrap_or(defaults.code_expiry_minutes);

        Ok(Self {
            verification_on_update_enabled,
            multi_attribute_enabled,
            use_explicit_verify_claim,
            multi_attribute_separator,
            code_expiry_minutes,
        })
    }
}

async fn read<C>(provider: &C, key: &str, tenant_domain: &str) -> Result<Option<String>, ServerError>
where
    C: ConnectorConfigProvider + ?Sized,
{
    provider
        .get_connector_config(key, tenant_domain)
        .await
        .map_err(|source| ServerError::ConfigUnavailable {
            key: key.to_string(),
            tenant_domain: tenant_domain.to_string(),
            source,
        })
}

/// Connector flags are true only when spelled `true` (any case)
pub fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// Connector configuration served from static settings
#[derive(Debug, Clone, Default)]
pub struct StaticConnectorConfigProvider {
    settings: ConnectorSettings,
}

impl StaticConnectorConfigProvider {
    pub fn new(settings: ConnectorSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl ConnectorConfigProvider for StaticConnectorConfigProvider {
    async fn get_connector_config(
        &self,
        key: &str,
        tenant_domain: &str,
    ) -> Result<Option<String>, StoreError> {
        Ok(self.settings.lookup(key, tenant_domain).map(str::to_string))
    }
}

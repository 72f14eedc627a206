//! Mobile number verification on user claim update
//!
//! The handler runs twice per logical claim update:
//!
//! 1. Pre-persistence (`PRE_SET_USER_CLAIM(S)`): decides whether the new
//!    number needs SMS verification, rewrites the claim set accordingly and
//!    records a `SkipReason` for the operation.
//! 2. Post-persistence (`POST_SET_USER_CLAIMS`): consumes the recorded
//!    reason and, when verification was requested, replaces any stale
//!    pending verification and sends a fresh code.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::Instrument;

use mv_shared::phone::{mask_phone_number, mask_phone_numbers};

use crate::domain::entities::claims::{
    ClaimSet, MOBILE_NUMBERS_CLAIM, MOBILE_NUMBER_CLAIM, MOBILE_NUMBER_PENDING_VALUE_CLAIM,
    VERIFIED_MOBILE_NUMBERS_CLAIM, VERIFY_MOBILE_CLAIM,
};
use crate::domain::entities::event::{ClaimEvent, EventKind, UserIdentity};
use crate::domain::entities::notification::NotificationRequest;
use crate::domain::entities::recovery::RecoveryRecord;
use crate::domain::entities::skip_reason::SkipReason;
use crate::errors::{ClientError, HandlerResult, ServerError};
use crate::repositories::{RecoveryDataStore, UserClaimStore};

use super::accessor::ClaimAccessor;
use super::config::VerificationPolicyConfig;
use super::coordinator::CrossPhaseCoordinator;
use super::invalidator::RecoveryDataInvalidator;
use super::policy;
use super::traits::{ClaimEventHandler, ConnectorConfigProvider, NotificationDispatcher};

/// Registration name of the handler
pub const HANDLER_NAME: &str = "userMobileVerification";

/// Display name of the handler
pub const HANDLER_FRIENDLY_NAME: &str = "User Mobile Number Verification";

/// Event handler enforcing SMS verification of changed mobile numbers
pub struct MobileNumberVerificationHandler<S, R, C, N>
where
    S: UserClaimStore,
    R: RecoveryDataStore,
    C: ConnectorConfigProvider,
    N: NotificationDispatcher,
{
    accessor: ClaimAccessor<S>,
    invalidator: RecoveryDataInvalidator<R>,
    recovery_store: Arc<R>,
    config_provider: Arc<C>,
    dispatcher: Arc<N>,
    coordinator: Arc<CrossPhaseCoordinator>,
}

impl<S, R, C, N> MobileNumberVerificationHandler<S, R, C, N>
where
    S: UserClaimStore,
    R: RecoveryDataStore,
    C: ConnectorConfigProvider,
    N: NotificationDispatcher,
{
    /// Create a new handler
    ///
    /// # Arguments
    ///
    /// * `user_store` - Read access to persisted user claims
    /// * `recovery_store` - Pending verification records
    /// * `config_provider` - Tenant connector configuration
    /// * `dispatcher` - Outbound SMS notifications
    /// * `coordinator` - Shared with every handler instance that may see
    ///   the post-phase of an operation whose pre-phase this one handles
    pub fn new(
        user_store: Arc<S>,
        recovery_store: Arc<R>,
        config_provider: Arc<C>,
        dispatcher: Arc<N>,
        coordinator: Arc<CrossPhaseCoordinator>,
    ) -> Self {
        Self {
            accessor: ClaimAccessor::new(user_store),
            invalidator: RecoveryDataInvalidator::new(recovery_store.clone()),
            recovery_store,
            config_provider,
            dispatcher,
            coordinator,
        }
    }

    /// Coordinator shared with OTP components and the cleanup service
    pub fn coordinator(&self) -> &Arc<CrossPhaseCoordinator> {
        &self.coordinator
    }

    async fn dispatch_event(&self, event: &mut ClaimEvent) -> HandlerResult<()> {
        match event.kind {
            EventKind::PreSetUserClaim | EventKind::PreSetUserClaims => {
                let config = self.resolve_config(&event.user).await?;
                // Only an OTP component may hand a decision to the pre-phase.
                // Anything else left under this id is stale.
                let otp_flow = Some(self.coordinator.take_skip_reason(event.operation_id))
                    .filter(SkipReason::is_otp_flow);
                self.pre_set_user_claims(event, &config, otp_flow).await
            }
            EventKind::PostSetUserClaims => {
                let reason = self.coordinator.take_skip_reason(event.operation_id);
                let config = self.resolve_config(&event.user).await?;
                self.post_set_user_claims(&event.user, &config, reason).await
            }
        }
    }

    async fn resolve_config(&self, user: &UserIdentity) -> Result<VerificationPolicyConfig, ServerError> {
        VerificationPolicyConfig::resolve(self.config_provider.as_ref(), &user.tenant_domain).await
    }

    /// Pre-persistence phase. Works on a copy of the claims and commits it
    /// to the event only when every decision succeeded.
    async fn pre_set_user_claims(
        &self,
        event: &mut ClaimEvent,
        config: &VerificationPolicyConfig,
        otp_flow: Option<SkipReason>,
    ) -> HandlerResult<()> {
        let user = &event.user;
        let mut claims = event.claims.clone();

        if policy::is_multi_number_mode(config) {
            if let Some(number) = claims.non_blank(MOBILE_NUMBER_CLAIM).map(str::to_string) {
                self.ensure_listed(user, &mut claims, config, &[number]).await?;
            }
        }

        let reason = if policy::should_verify_on_update(config) {
            self.evaluate_update(user, &mut claims, config, otp_flow).await?
        } else {
            self.clear_pending_verification(user, &mut claims).await?;
            SkipReason::None
        };

        claims.remove(VERIFY_MOBILE_CLAIM);
        event.claims = claims;

        if reason.is_skip() {
            self.coordinator.set_skip_reason(event.operation_id, reason);
        }

        tracing::debug!(
            username = %event.user.username,
            tenant_domain = %event.user.tenant_domain,
            operation_id = %event.operation_id,
            skip_reason = %reason,
            event = "mobile_update_evaluated",
            "Evaluated mobile number claim update"
        );
        Ok(())
    }

    /// Verification disabled: any pending verification is void
    async fn clear_pending_verification(
        &self,
        user: &UserIdentity,
        claims: &mut ClaimSet,
    ) -> HandlerResult<()> {
        let pending = self.accessor.get_pending_value(user).await?;
        if pending.is_empty() {
            return Ok(());
        }

        self.invalidator.invalidate_pending_verification(user).await?;
        claims.set(MOBILE_NUMBER_PENDING_VALUE_CLAIM, "");
        tracing::info!(
            username = %user.username,
            pending = %mask_phone_number(&pending),
            event = "pending_verification_cleared",
            "Verification on update is disabled, cleared pending mobile number"
        );
        Ok(())
    }

    async fn evaluate_update(
        &self,
        user: &UserIdentity,
        claims: &mut ClaimSet,
        config: &VerificationPolicyConfig,
        otp_flow: Option<SkipReason>,
    ) -> HandlerResult<SkipReason> {
        if !policy::has_mobile_claims(claims) {
            return Ok(SkipReason::InapplicableClaims);
        }

        if let Some(reason) = otp_flow {
            claims.set(MOBILE_NUMBER_PENDING_VALUE_CLAIM, "");
            return Ok(reason);
        }

        if policy::requires_explicit_verify_flag(config)
            && !policy::verification_requested(config, claims)
        {
            let pending = self.accessor.get_pending_value(user).await?;
            if !pending.is_empty() {
                claims.set(MOBILE_NUMBER_PENDING_VALUE_CLAIM, "");
                return Ok(SkipReason::ConfirmedByOtpFlow);
            }
            // nothing to confirm, fall through to the regular checks
        }

        let multi = policy::is_multi_number_mode(config);
        if multi && claims.contains(VERIFIED_MOBILE_NUMBERS_CLAIM) {
            return self.evaluate_verified_numbers(user, claims, config).await;
        }

        if claims.contains(MOBILE_NUMBER_CLAIM) {
            return self.evaluate_primary_change(user, claims, config, None).await;
        }

        if multi && claims.contains(MOBILE_NUMBERS_CLAIM) {
            self.prune_verified_numbers(user, claims, config).await?;
        }
        Ok(SkipReason::InapplicableClaims)
    }

    /// A write of `verifiedMobileNumbers` in multi-attribute mode
    async fn evaluate_verified_numbers(
        &self,
        user: &UserIdentity,
        claims: &mut ClaimSet,
        config: &VerificationPolicyConfig,
    ) -> HandlerResult<SkipReason> {
        let separator = config.multi_attribute_separator.as_str();
        let existing_verified = self
            .accessor
            .get_multi_valued_claim(user, VERIFIED_MOBILE_NUMBERS_CLAIM, separator)
            .await?;
        let verified = claims.multi_values(VERIFIED_MOBILE_NUMBERS_CLAIM, separator);
        let newly_verified: Vec<String> = verified
            .iter()
            .filter(|n| !policy::is_already_verified(n, &existing_verified))
            .cloned()
            .collect();
        let new_primary = claims.non_blank(MOBILE_NUMBER_CLAIM).map(str::to_string);

        if !newly_verified.is_empty() {
            let mut known = self
                .accessor
                .get_multi_valued_claim(user, MOBILE_NUMBERS_CLAIM, separator)
                .await?;
            known.extend(claims.multi_values(MOBILE_NUMBERS_CLAIM, separator));
            match &new_primary {
                Some(primary) => known.push(primary.clone()),
                None => known.extend(self.accessor.get_existing_primary(user).await?),
            }

            if let Some(unknown) = newly_verified.iter().find(|n| !known.contains(n)) {
                tracing::warn!(
                    username = %user.username,
                    number = %mask_phone_number(unknown),
                    event = "invalid_verified_number",
                    "Rejected verified mobile number that is not associated with the user"
                );
                return Err(ClientError::InvalidVerifiedNumber {
                    number: unknown.clone(),
                }
                .into());
            }

            self.ensure_listed(user, claims, config, &newly_verified).await?;
            tracing::debug!(
                username = %user.username,
                numbers = ?mask_phone_numbers(&newly_verified),
                "Marked mobile numbers as verified"
            );
        }

        match new_primary {
            Some(primary) if policy::is_already_verified(&primary, &verified) => {
                claims.set(MOBILE_NUMBER_PENDING_VALUE_CLAIM, "");
                Ok(SkipReason::AlreadyVerifiedNumbers)
            }
            Some(_) => {
                self.evaluate_primary_change(user, claims, config, Some(&verified))
                    .await
            }
            None => Ok(SkipReason::AlreadyVerifiedNumbers),
        }
    }

    /// A change of the primary number. `verified` is the verified list
    /// written by the same operation, if any.
    async fn evaluate_primary_change(
        &self,
        user: &UserIdentity,
        claims: &mut ClaimSet,
        config: &VerificationPolicyConfig,
        verified: Option<&[String]>,
    ) -> HandlerResult<SkipReason> {
        let Some(new_number) = claims.non_blank(MOBILE_NUMBER_CLAIM).map(str::to_string) else {
            // primary number is being removed
            claims.set(MOBILE_NUMBER_PENDING_VALUE_CLAIM, "");
            return Ok(SkipReason::InapplicableClaims);
        };

        let existing = self.accessor.get_existing_primary(user).await?;
        if existing.as_deref() == Some(new_number.as_str()) {
            claims.set(MOBILE_NUMBER_PENDING_VALUE_CLAIM, "");
            return Ok(SkipReason::NumberUnchanged);
        }

        if policy::is_multi_number_mode(config) {
            let verified = match verified {
                Some(verified) => verified.to_vec(),
                None => {
                    self.accessor
                        .get_multi_valued_claim(
                            user,
                            VERIFIED_MOBILE_NUMBERS_CLAIM,
                            &config.multi_attribute_separator,
                        )
                        .await?
                }
            };
            if policy::is_already_verified(&new_number, &verified) {
                claims.set(MOBILE_NUMBER_PENDING_VALUE_CLAIM, "");
                return Ok(SkipReason::AlreadyVerifiedNumbers);
            }
        }

        if !policy::verification_requested(config, claims) {
            return Ok(SkipReason::InapplicableClaims);
        }

        // The primary claim is only written once the OTP is confirmed
        claims.remove(MOBILE_NUMBER_CLAIM);
        claims.set(MOBILE_NUMBER_PENDING_VALUE_CLAIM, new_number.clone());
        tracing::info!(
            username = %user.username,
            tenant_domain = %user.tenant_domain,
            pending = %mask_phone_number(&new_number),
            event = "mobile_verification_requested",
            "Mobile number change deferred until verification"
        );
        Ok(SkipReason::None)
    }

    /// Drop verified numbers that a `mobileNumbers` write no longer lists
    async fn prune_verified_numbers(
        &self,
        user: &UserIdentity,
        claims: &mut ClaimSet,
        config: &VerificationPolicyConfig,
    ) -> HandlerResult<()> {
        let separator = config.multi_attribute_separator.as_str();
        let listed = claims.multi_values(MOBILE_NUMBERS_CLAIM, separator);
        let verified = self
            .accessor
            .get_multi_valued_claim(user, VERIFIED_MOBILE_NUMBERS_CLAIM, separator)
            .await?;

        let retained: Vec<String> = verified
            .iter()
            .filter(|n| listed.contains(n))
            .cloned()
            .collect();
        if retained.len() != verified.len() {
            claims.set_multi_values(VERIFIED_MOBILE_NUMBERS_CLAIM, &retained, separator);
        }
        Ok(())
    }

    /// Make sure every number in `numbers` appears in `mobileNumbers`.
    /// The list written by this operation wins over the stored one.
    async fn ensure_listed(
        &self,
        user: &UserIdentity,
        claims: &mut ClaimSet,
        config: &VerificationPolicyConfig,
        numbers: &[String],
    ) -> HandlerResult<()> {
        let separator = config.multi_attribute_separator.as_str();
        let mut listed = if claims.contains(MOBILE_NUMBERS_CLAIM) {
            claims.multi_values(MOBILE_NUMBERS_CLAIM, separator)
        } else {
            self.accessor
                .get_multi_valued_claim(user, MOBILE_NUMBERS_CLAIM, separator)
                .await?
        };

        let before = listed.len();
        for number in numbers {
            if !listed.contains(number) {
                listed.push(number.clone());
            }
        }
        if listed.len() != before {
            claims.set_multi_values(MOBILE_NUMBERS_CLAIM, &listed, separator);
        }
        Ok(())
    }

    /// Post-persistence phase
    async fn post_set_user_claims(
        &self,
        user: &UserIdentity,
        config: &VerificationPolicyConfig,
        reason: SkipReason,
    ) -> HandlerResult<()> {
        if !policy::should_verify_on_update(config) {
            return Ok(());
        }

        if reason.is_skip() {
            tracing::debug!(
                username = %user.username,
                skip_reason = %reason,
                "Skipping mobile verification notification"
            );
            return Ok(());
        }

        let pending = self.accessor.get_pending_value(user).await?;
        if pending.is_empty() {
            return Ok(());
        }

        self.invalidator.invalidate_pending_verification(user).await?;
        self.send_verification_notification(user, &pending, config).await
    }

    async fn send_verification_notification(
        &self,
        user: &UserIdentity,
        pending: &str,
        config: &VerificationPolicyConfig,
    ) -> HandlerResult<()> {
        let record = RecoveryRecord::mobile_verification(user.clone(), pending, config.code_expiry_minutes);
        self.recovery_store
            .store(&record)
            .await
            .map_err(|source| ServerError::RecoveryData {
                username: user.username.clone(),
                source,
            })?;

        let request = NotificationRequest::verify_mobile_on_update(user.clone(), pending, record.code);
        self.dispatcher.dispatch(request).await.map_err(|message| {
            tracing::error!(
                username = %user.username,
                error = %message,
                event = "verification_notification_failed",
                "Failed to dispatch mobile verification notification"
            );
            ServerError::NotificationDispatch { message }
        })?;

        tracing::info!(
            username = %user.username,
            tenant_domain = %user.tenant_domain,
            send_to = %mask_phone_number(pending),
            expires_at = %record.expires_at,
            event = "verification_notification_sent",
            "Mobile verification code sent"
        );
        Ok(())
    }
}

#[async_trait]
impl<S, R, C, N> ClaimEventHandler for MobileNumberVerificationHandler<S, R, C, N>
where
    S: UserClaimStore,
    R: RecoveryDataStore,
    C: ConnectorConfigProvider,
    N: NotificationDispatcher,
{
    fn name(&self) -> &'static str {
        HANDLER_NAME
    }

    fn friendly_name(&self) -> &'static str {
        HANDLER_FRIENDLY_NAME
    }

    async fn handle_event(&self, event: &mut ClaimEvent) -> HandlerResult<()> {
        let span = tracing::info_span!(
            "mobile_verification",
            event_kind = %event.kind,
            operation_id = %event.operation_id,
            username = %event.user.username,
            tenant_domain = %event.user.tenant_domain,
        );
        self.dispatch_event(event).instrument(span).await
    }
}

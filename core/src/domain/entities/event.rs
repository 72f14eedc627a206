//! User claim update events delivered by the identity event source.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::claims::ClaimSet;

/// Kind of claim update event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// A single claim is about to be written
    PreSetUserClaim,
    /// A batch of claims is about to be written
    PreSetUserClaims,
    /// A batch of claims was durably written
    PostSetUserClaims,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreSetUserClaim => "PRE_SET_USER_CLAIM",
            Self::PreSetUserClaims => "PRE_SET_USER_CLAIMS",
            Self::PostSetUserClaims => "POST_SET_USER_CLAIMS",
        }
    }

    pub fn is_pre_phase(&self) -> bool {
        matches!(self, Self::PreSetUserClaim | Self::PreSetUserClaims)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PRE_SET_USER_CLAIM" => Ok(Self::PreSetUserClaim),
            "PRE_SET_USER_CLAIMS" => Ok(Self::PreSetUserClaims),
            "POST_SET_USER_CLAIMS" => Ok(Self::PostSetUserClaims),
            _ => Err(format!("Unsupported event: {}", s)),
        }
    }
}

/// User whose claims are being changed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserIdentity {
    pub username: String,
    pub tenant_domain: String,
    pub user_store_domain: String,
}

impl UserIdentity {
    pub fn new(
        username: impl Into<String>,
        tenant_domain: impl Into<String>,
        user_store_domain: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            tenant_domain: tenant_domain.into(),
            user_store_domain: user_store_domain.into(),
        }
    }
}

impl fmt::Display for UserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.user_store_domain, self.username, self.tenant_domain)
    }
}

/// Correlates the pre- and post-persistence events of one logical claim update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(Uuid);

impl OperationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OperationId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for OperationId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A claim update event.
///
/// Pre-phase handlers may mutate `claims`; the event source persists the
/// mutated set. Post-phase events may carry an empty claim set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimEvent {
    pub kind: EventKind,
    pub operation_id: OperationId,
    pub user: UserIdentity,
    pub claims: ClaimSet,
}

impl ClaimEvent {
    pub fn new(kind: EventKind, operation_id: OperationId, user: UserIdentity, claims: ClaimSet) -> Self {
        Self {
            kind,
            operation_id,
            user,
            claims,
        }
    }

    pub fn pre_set_user_claim(operation_id: OperationId, user: UserIdentity, claims: ClaimSet) -> Self {
        Self::new(EventKind::PreSetUserClaim, operation_id, user, claims)
    }

    pub fn pre_set_user_claims(operation_id: OperationId, user: UserIdentity, claims: ClaimSet) -> Self {
        Self::new(EventKind::PreSetUserClaims, operation_id, user, claims)
    }

    /// Post-persistence event for the same operation
    pub fn post_set_user_claims(operation_id: OperationId, user: UserIdentity) -> Self {
        Self::new(EventKind::PostSetUserClaims, operation_id, user, ClaimSet::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_round_trip_names() {
        for kind in [
            EventKind::PreSetUserClaim,
            EventKind::PreSetUserClaims,
            EventKind::PostSetUserClaims,
        ] {
            assert_eq!(kind.as_str().parse::<EventKind>().unwrap(), kind);
        }
        assert!("POST_SET_USER_CLAIM".parse::<EventKind>().is_err());
        assert!(!EventKind::PostSetUserClaims.is_pre_phase());
    }

    #[test]
    fn test_operation_ids_are_unique() {
        assert_ne!(OperationId::new(), OperationId::new());
    }
}

use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

use crate::{Identity, Role};

/// Which roles may enter a route.
///
/// `admin_superset` marks ADMIN as implicitly authorized even when it is not
/// listed; the portal sets it on the TRAINER- and STUDENT-scoped areas. It is
/// an explicit per-route flag so a route can opt out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePolicy {
    required: BTreeSet<Role>,
    admin_superset: bool,
}

impl RoutePolicy {
    /// Policy with ADMIN as universal superset.
    pub fn new(required: impl IntoIterator<Item = Role>) -> Self {
        Self {
            required: required.into_iter().collect(),
            admin_superset: true,
        }
    }

    /// Policy that admits exactly the listed roles.
    pub fn exact(required: impl IntoIterator<Item = Role>) -> Self {
        Self {
            required: required.into_iter().collect(),
            admin_superset: false,
        }
    }

    pub fn required_roles(&self) -> &BTreeSet<Role> {
        &self.required
    }

    pub fn admin_superset(&self) -> bool {
        self.admin_superset
    }

    fn admits(&self, role: Role) -> bool {
        self.required.contains(&role) || (self.admin_superset && role == Role::Admin)
    }
}

/// Outcome of a route authorization check.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "reason", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Allow,
    Deny(DenialKind),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    /// Nobody is logged in.
    Anonymous,
    /// Logged in, but the role is not admitted by the route.
    RoleNotPermitted(Role),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("unauthorized: not logged in")]
    Anonymous,

    #[error("unauthorized: role {0} may not access this route")]
    Forbidden(Role),
}

impl From<DenialKind> for AuthzError {
    fn from(kind: DenialKind) -> Self {
        match kind {
            DenialKind::Anonymous => AuthzError::Anonymous,
            DenialKind::RoleNotPermitted(role) => AuthzError::Forbidden(role),
        }
    }
}

/// Decide whether `identity` may enter a route guarded by `policy`.
///
/// - No IO
/// - No panics
/// - Deterministic: same inputs, same decision
pub fn decide(policy: &RoutePolicy, identity: Option<&Identity>) -> Decision {
    let Some(identity) = identity else {
        return Decision::Deny(DenialKind::Anonymous);
    };

    let role = identity.role();
    if policy.admits(role) {
        Decision::Allow
    } else {
        Decision::Deny(DenialKind::RoleNotPermitted(role))
    }
}

/// [`decide`] as a `Result`, for call sites that propagate with `?`.
pub fn authorize(policy: &RoutePolicy, identity: Option<&Identity>) -> Result<(), AuthzError> {
    match decide(policy, identity) {
        Decision::Allow => Ok(()),
        Decision::Deny(kind) => Err(kind.into()),
    }
}

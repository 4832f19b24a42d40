//! Privilege classification resolved from the backend user registry.
//!
//! A role is looked up by email through the request gateway and cached per
//! mounted session. Lookups are superseded, not cancelled: a response only
//! applies while its email still matches the latest lookup, so a stale
//! response for a previous principal can never grant access to the next one.

#[cfg(test)]
#[path = "role_test.rs"]
mod role_test;

use crate::net::types::UserRecord;

/// Coarse privilege classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Regular,
    Privileged,
}

impl Role {
    /// Map the registry's `role` field onto a classification. Anything other
    /// than the admin marker is a regular user.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("admin") {
            Self::Privileged
        } else {
            Self::Regular
        }
    }

    /// Resolve a role from a registry lookup response. The first record's
    /// role is consumed; an empty result is `None`, which access control
    /// treats as a denial rather than a default grant.
    #[must_use]
    pub fn from_records(records: &[UserRecord]) -> Option<Self> {
        records.first().map(|r| Self::parse(&r.role))
    }
}

/// Outcome of the registry lookup for the current principal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RoleStatus {
    /// No lookup has resolved yet.
    #[default]
    Unknown,
    /// A lookup is in flight.
    Pending,
    Resolved(Role),
    /// The lookup failed or matched no record.
    Failed,
}

/// Role lookup state keyed on the email of the latest request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoleState {
    pub email: Option<String>,
    pub status: RoleStatus,
}

impl RoleState {
    /// Start a lookup for `email`, superseding any in-flight one.
    pub fn begin_lookup(&mut self, email: &str) {
        self.email = Some(email.to_owned());
        self.status = RoleStatus::Pending;
    }

    /// Apply a lookup outcome. Returns false (state untouched) when the
    /// response is for an email that is no longer current.
    pub fn apply_lookup(&mut self, email: &str, outcome: Option<Role>) -> bool {
        if self.email.as_deref() != Some(email) {
            return false;
        }
        self.status = match outcome {
            Some(role) => RoleStatus::Resolved(role),
            None => RoleStatus::Failed,
        };
        true
    }

    /// Whether `email` is the key of the latest lookup.
    #[must_use]
    pub fn is_current(&self, email: &str) -> bool {
        self.email.as_deref() == Some(email)
    }

    /// Drop any cached role, e.g. when the session ends.
    pub fn reset(&mut self) {
        self.email = None;
        self.status = RoleStatus::Unknown;
    }
}

//! Authorization state of a merchant's web session.
//!
//! ```text
//! Unauthorized --begin--> Pending --authorize--> Authorized
//!      ^                     |
//!      +------fail-----------+
//! ```
//!
//! A failed callback returns the session to `Unauthorized` from any state.
//! Beginning again from `Authorized` is allowed, so a merchant can connect
//! another shop. There is no logout transition.

use serde::Serialize;

/// Where a web session is in the authorization flow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationState {
    /// No authorization has been started, or the last one failed.
    #[default]
    Unauthorized,
    /// The merchant was sent to the platform's consent page.
    Pending,
    /// A code was exchanged and credentials were stored.
    Authorized,
}

impl AuthorizationState {
    /// Returns the state after redirecting to the consent page.
    #[must_use]
    pub const fn begin(self) -> Self {
        Self::Pending
    }

    /// Returns the state after a successful code exchange.
    #[must_use]
    pub const fn authorize(self) -> Self {
        Self::Authorized
    }

    /// Returns the state after a failed callback.
    #[must_use]
    pub const fn fail(self) -> Self {
        Self::Unauthorized
    }

    /// Returns `true` once a shop has been connected in this session.
    #[must_use]
    pub const fn is_authorized(self) -> bool {
        matches!(self, Self::Authorized)
    }
}

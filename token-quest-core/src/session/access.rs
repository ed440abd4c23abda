//! Combined access decisions for protected resources.
//!
//! [`Role::can_access`] answers rank alone; a real resource gate also
//! needs a valid token. The combination lives here, on the snapshot,
//! so every caller gets the same rule and a structured refusal reason
//! to render.

use serde::{Deserialize, Serialize};

use crate::session::role::Role;
use crate::session::state::SessionSnapshot;

/// Outcome of an access attempt against a resource gated at some role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessDecision {
    /// Entry permitted.
    Granted,
    /// No complete token is held; authentication comes first.
    DeniedNoToken,
    /// Token is fine but the held role ranks below the requirement.
    DeniedRole {
        /// The tier the resource demands.
        required: Role,
    },
}

impl AccessDecision {
    /// Whether the attempt succeeded.
    pub fn is_granted(self) -> bool {
        matches!(self, AccessDecision::Granted)
    }
}

impl SessionSnapshot {
    /// Evaluate entry to a resource gated at `required`.
    ///
    /// Token first, rank second: a missing token is always reported as
    /// the missing piece, even when the rank would also fall short.
    pub fn evaluate_access(&self, required: Role) -> AccessDecision {
        if !self.has_valid_token() {
            return AccessDecision::DeniedNoToken;
        }
        if !self.role.can_access(required) {
            return AccessDecision::DeniedRole { required };
        }
        AccessDecision::Granted
    }

    /// Boolean form of [`SessionSnapshot::evaluate_access`].
    pub fn can_enter(&self, required: Role) -> bool {
        self.evaluate_access(required).is_granted()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::role::AuthRole;
    use crate::session::state::SessionState;

    #[test]
    fn test_guest_without_token_is_refused_everywhere() {
        let snap = SessionState::new().snapshot();

        // Even the lowest tier wants a token before the door opens.
        assert_eq!(snap.evaluate_access(Role::Guest), AccessDecision::DeniedNoToken);
        assert_eq!(snap.evaluate_access(Role::User), AccessDecision::DeniedNoToken);
        assert_eq!(snap.evaluate_access(Role::Admin), AccessDecision::DeniedNoToken);
    }

    #[test]
    fn test_user_reaches_user_tier_but_not_admin() {
        let mut session = SessionState::new();
        session.login("morgan", AuthRole::User);
        let snap = session.snapshot();

        assert_eq!(snap.evaluate_access(Role::Guest), AccessDecision::Granted);
        assert_eq!(snap.evaluate_access(Role::User), AccessDecision::Granted);
        assert_eq!(
            snap.evaluate_access(Role::Admin),
            AccessDecision::DeniedRole {
                required: Role::Admin
            }
        );
    }

    #[test]
    fn test_admin_reaches_everything() {
        let mut session = SessionState::new();
        session.login("robin", AuthRole::Admin);
        let snap = session.snapshot();

        for required in [Role::Guest, Role::User, Role::Admin] {
            assert!(snap.can_enter(required), "admin refused at {required}");
        }
    }

    #[test]
    fn test_logout_revokes_access() {
        let mut session = SessionState::new();
        session.login("robin", AuthRole::Admin);
        session.logout();

        let snap = session.snapshot();
        assert_eq!(snap.evaluate_access(Role::User), AccessDecision::DeniedNoToken);
        assert!(!snap.can_enter(Role::Guest));
    }

    #[test]
    fn test_missing_token_reported_before_rank() {
        let mut session = SessionState::new();
        session.login("morgan", AuthRole::User);
        session.logout();

        // Rank would also fall short for Admin, but the token is the
        // story the player should hear first.
        assert_eq!(
            session.snapshot().evaluate_access(Role::Admin),
            AccessDecision::DeniedNoToken
        );
    }
}

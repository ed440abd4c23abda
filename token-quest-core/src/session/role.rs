//! Roles and the rank-based access evaluator.
//!
//! `Role` is a closed three-value enum with a total privilege order.
//! The rank comparison is the pure half of every access decision; the
//! combined token-plus-rank gate lives in [`crate::session::access`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

// =============================================================================
// ROLE
// =============================================================================

/// Access tier, totally ordered by privilege: Guest < User < Admin.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Role {
    /// Unauthenticated visitor.
    #[default]
    Guest = 0,
    /// Regular authenticated user.
    User = 1,
    /// Administrator.
    Admin = 2,
}

impl Role {
    /// Privilege rank (Guest 0, User 1, Admin 2).
    #[inline]
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Rank-only access check: does this role meet `required`?
    ///
    /// Pure and total. Token presence is deliberately not part of this
    /// check; resource gates combine it with a token check through
    /// [`crate::SessionSnapshot::evaluate_access`].
    #[inline]
    pub fn can_access(self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    /// Lowercase display name.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "guest" => Ok(Role::Guest),
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(SessionError::UnknownRole(s.to_string())),
        }
    }
}

// =============================================================================
// AUTH ROLE
// =============================================================================

/// The closed role domain accepted by `login`.
///
/// Guests cannot authenticate, so login takes this type instead of
/// [`Role`] and stays total.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthRole {
    /// Log in as a regular user.
    #[default]
    User,
    /// Log in as an administrator.
    Admin,
}

impl From<AuthRole> for Role {
    fn from(auth: AuthRole) -> Self {
        match auth {
            AuthRole::User => Role::User,
            AuthRole::Admin => Role::Admin,
        }
    }
}

impl fmt::Display for AuthRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Role::from(*self).fmt(f)
    }
}

impl FromStr for AuthRole {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Role::from_str(s)? {
            Role::User => Ok(AuthRole::User),
            Role::Admin => Ok(AuthRole::Admin),
            Role::Guest => Err(SessionError::NotLoginRole(s.to_string())),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_role_ordering() {
        assert!(Role::Guest < Role::User);
        assert!(Role::User < Role::Admin);
        assert_eq!(Role::Guest.rank(), 0);
        assert_eq!(Role::User.rank(), 1);
        assert_eq!(Role::Admin.rank(), 2);
    }

    #[test]
    fn test_can_access_table() {
        // Each role reaches its own tier and everything below it.
        assert!(Role::Guest.can_access(Role::Guest));
        assert!(!Role::Guest.can_access(Role::User));
        assert!(!Role::Guest.can_access(Role::Admin));

        assert!(Role::User.can_access(Role::Guest));
        assert!(Role::User.can_access(Role::User));
        assert!(!Role::User.can_access(Role::Admin));

        assert!(Role::Admin.can_access(Role::Guest));
        assert!(Role::Admin.can_access(Role::User));
        assert!(Role::Admin.can_access(Role::Admin));
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("guest".parse::<Role>().unwrap(), Role::Guest);
        assert_eq!(" Admin ".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("USER".parse::<Role>().unwrap(), Role::User);

        let err = "root".parse::<Role>().unwrap_err();
        assert_eq!(err, SessionError::UnknownRole("root".into()));
    }

    #[test]
    fn test_auth_role_parsing() {
        assert_eq!("user".parse::<AuthRole>().unwrap(), AuthRole::User);
        assert_eq!("admin".parse::<AuthRole>().unwrap(), AuthRole::Admin);
        assert!(matches!(
            "guest".parse::<AuthRole>(),
            Err(SessionError::NotLoginRole(_))
        ));
        assert!(matches!(
            "sudo".parse::<AuthRole>(),
            Err(SessionError::UnknownRole(_))
        ));
    }

    #[test]
    fn test_display_roundtrip() {
        for role in [Role::Guest, Role::User, Role::Admin] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }

    fn arb_role() -> impl Strategy<Value = Role> {
        prop_oneof![Just(Role::Guest), Just(Role::User), Just(Role::Admin)]
    }

    proptest! {
        // If a role passes a gate, every role of equal or higher rank does too.
        #[test]
        fn prop_can_access_monotonic(r in arb_role(), r2 in arb_role(), q in arb_role()) {
            if r.can_access(q) && r2.rank() >= r.rank() {
                prop_assert!(r2.can_access(q));
            }
        }

        #[test]
        fn prop_can_access_matches_rank(r in arb_role(), q in arb_role()) {
            prop_assert_eq!(r.can_access(q), r.rank() >= q.rank());
        }
    }
}

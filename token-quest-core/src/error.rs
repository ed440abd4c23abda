//! Error types for the session core.
//!
//! Every mutator is total over its input domain; the only fallible
//! surface is parsing role names from untrusted strings.

use thiserror::Error;

/// Errors produced when translating external input into session types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The string did not name any known role.
    #[error("unknown role {0:?} (expected \"guest\", \"user\", or \"admin\")")]
    UnknownRole(String),

    /// The string named a role that cannot authenticate.
    #[error("role {0:?} cannot log in (expected \"user\" or \"admin\")")]
    NotLoginRole(String),
}

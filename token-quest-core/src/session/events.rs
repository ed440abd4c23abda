//! Session events.
//!
//! Mutators record what changed; the presentation layer drains the
//! queue to drive animations and log lines. Draining is the only
//! consuming read on a session; snapshots stay side-effect-free.

use serde::{Deserialize, Serialize};

use crate::session::role::Role;

/// A state change recorded by a session mutator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A login established (or overwrote) the session.
    LoggedIn {
        /// Subject of the freshly issued token.
        sub: String,
        /// Granted role.
        role: Role,
    },

    /// An active session ended.
    LoggedOut {
        /// Role held before the logout.
        previous_role: Role,
    },

    /// A stage was completed for the first time.
    StageCompleted {
        /// The completed stage number.
        stage: u32,
        /// Total distinct stages completed so far.
        total_completed: usize,
    },

    /// Everything returned to initial defaults.
    SessionReset,
}

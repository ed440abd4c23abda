//! Session state.
//!
//! The single shared record the scenes read and mutate. One instance
//! exists per running game, constructed explicitly and handed to the
//! presentation layer; there is no global. All reads go through
//! copy-on-read snapshots, all writes through the mutators here.
//!
//! Invariants upheld by every mutator:
//! - the token is present iff the session is authenticated, and is
//!   complete whenever present;
//! - the role is `Guest` whenever the session is unauthenticated;
//! - the completed-stage set only grows, except on [`SessionState::reset`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::session::events::SessionEvent;
use crate::session::role::{AuthRole, Role};
use crate::session::token::SimulatedToken;

// =============================================================================
// SESSION STATE
// =============================================================================

/// Mutable authentication/progress state for one running game.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    is_authenticated: bool,
    token: Option<SimulatedToken>,
    role: Role,
    completed_stages: BTreeSet<u32>,
    pending_events: Vec<SessionEvent>,
}

impl SessionState {
    /// Create a fresh, unauthenticated session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Authenticate as `role`, issuing a fresh complete token.
    ///
    /// Idempotent in the overwrite sense: logging in twice simply
    /// replaces the previous token and role.
    pub fn login(&mut self, username: impl Into<String>, role: AuthRole) {
        let role = Role::from(role);
        let token = SimulatedToken::issue(username, role);
        info!(
            sub = %token.claims.sub,
            subject = %hex::encode(token.claims.subject_id()),
            %role,
            "session login"
        );

        self.is_authenticated = true;
        self.role = role;
        self.pending_events.push(SessionEvent::LoggedIn {
            sub: token.claims.sub.clone(),
            role,
        });
        self.token = Some(token);
    }

    /// End the session: token destroyed, role back to `Guest`.
    ///
    /// Idempotent; a second logout changes nothing and records no event.
    pub fn logout(&mut self) {
        let was_authenticated = self.is_authenticated;
        let previous_role = self.role;

        self.is_authenticated = false;
        self.role = Role::Guest;
        self.token = None;

        if was_authenticated {
            info!(%previous_role, "session logout");
            self.pending_events
                .push(SessionEvent::LoggedOut { previous_role });
        }
    }

    /// Record stage `stage` as completed. Duplicate completions are a no-op.
    pub fn complete_stage(&mut self, stage: u32) {
        if self.completed_stages.insert(stage) {
            let total = self.completed_stages.len();
            info!(stage, total, "stage completed");
            self.pending_events.push(SessionEvent::StageCompleted {
                stage,
                total_completed: total,
            });
        }
    }

    /// Restore every field to its initial default, including progress.
    pub fn reset(&mut self) {
        info!("session reset");
        self.is_authenticated = false;
        self.role = Role::Guest;
        self.token = None;
        self.completed_stages.clear();
        self.pending_events.push(SessionEvent::SessionReset);
    }

    /// True iff a token is present and all three parts are set.
    pub fn has_valid_token(&self) -> bool {
        self.token.as_ref().is_some_and(SimulatedToken::is_complete)
    }

    /// Immutable copy-on-read view of the current state.
    ///
    /// The returned value owns its data; callers cannot reach the live
    /// state through it, and repeated calls are side-effect-free.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            is_authenticated: self.is_authenticated,
            token: self.token.clone(),
            role: self.role,
            completed_stages: self.completed_stages.clone(),
        }
    }

    /// Take the events recorded since the last drain.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Immutable copy of a session, taken by [`SessionState::snapshot`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Whether the most recent auth action was a login.
    pub is_authenticated: bool,
    /// The simulated token; present iff authenticated.
    pub token: Option<SimulatedToken>,
    /// Active role; `Guest` whenever unauthenticated.
    pub role: Role,
    /// Stages completed so far.
    pub completed_stages: BTreeSet<u32>,
}

impl SessionSnapshot {
    /// True iff a token is present and all three parts are set.
    pub fn has_valid_token(&self) -> bool {
        self.token.as_ref().is_some_and(SimulatedToken::is_complete)
    }

    /// Whether `stage` has been completed.
    pub fn stage_completed(&self, stage: u32) -> bool {
        self.completed_stages.contains(&stage)
    }

    /// Number of distinct stages completed.
    pub fn completed_count(&self) -> usize {
        self.completed_stages.len()
    }

    /// Whether every stage of the lesson has been completed.
    pub fn all_stages_complete(&self) -> bool {
        (1..=crate::STAGE_COUNT).all(|stage| self.stage_completed(stage))
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
    fn test_fresh_session_defaults() {
        let session = SessionState::new();
        let snap = session.snapshot();

        assert!(!snap.is_authenticated);
        assert!(snap.token.is_none());
        assert_eq!(snap.role, Role::Guest);
        assert!(snap.completed_stages.is_empty());
        assert!(!session.has_valid_token());
    }

    #[test]
    fn test_login_issues_complete_token() {
        let mut session = SessionState::new();
        session.login("morgan", AuthRole::User);

        assert!(session.has_valid_token());
        let snap = session.snapshot();
        assert!(snap.is_authenticated);
        assert_eq!(snap.role, Role::User);
        let token = snap.token.expect("token present after login");
        assert!(token.is_complete());
        assert_eq!(token.claims.sub, "morgan");
    }

    #[test]
    fn test_relogin_overwrites() {
        let mut session = SessionState::new();
        session.login("morgan", AuthRole::User);
        session.login("robin", AuthRole::Admin);

        let snap = session.snapshot();
        assert_eq!(snap.role, Role::Admin);
        assert_eq!(snap.token.unwrap().claims.sub, "robin");
    }

    #[test]
    fn test_logout_clears_session() {
        let mut session = SessionState::new();
        session.login("morgan", AuthRole::Admin);
        session.logout();

        let snap = session.snapshot();
        assert!(!snap.is_authenticated);
        assert!(snap.token.is_none());
        assert_eq!(snap.role, Role::Guest);
        assert!(!session.has_valid_token());

        // Second logout is a no-op and records nothing new.
        session.take_events();
        session.logout();
        assert!(session.take_events().is_empty());
    }

    #[test]
    fn test_complete_stage_is_idempotent() {
        let mut session = SessionState::new();
        session.complete_stage(2);
        session.complete_stage(2);
        session.complete_stage(2);

        let snap = session.snapshot();
        assert_eq!(snap.completed_count(), 1);
        assert!(snap.stage_completed(2));
    }

    #[test]
    fn test_progress_survives_logout() {
        let mut session = SessionState::new();
        session.login("morgan", AuthRole::User);
        session.complete_stage(1);
        session.logout();

        assert!(session.snapshot().stage_completed(1));
    }

    #[test]
    fn test_reset_restores_exact_defaults() {
        let mut session = SessionState::new();
        session.login("morgan", AuthRole::Admin);
        session.complete_stage(1);
        session.complete_stage(2);
        session.complete_stage(3);
        session.reset();

        assert_eq!(session.snapshot(), SessionState::new().snapshot());
    }

    #[test]
    fn test_snapshot_is_isolated_copy() {
        let mut session = SessionState::new();
        session.login("morgan", AuthRole::User);

        let mut snap = session.snapshot();
        snap.completed_stages.insert(7);
        snap.role = Role::Admin;
        if let Some(token) = snap.token.as_mut() {
            token.signature_present = false;
        }

        // Mutating the copy never reaches the live state.
        let live = session.snapshot();
        assert!(live.completed_stages.is_empty());
        assert_eq!(live.role, Role::User);
        assert!(session.has_valid_token());
    }

    #[test]
    fn test_events_recorded_and_drained() {
        let mut session = SessionState::new();
        session.login("morgan", AuthRole::User);
        session.complete_stage(1);
        session.complete_stage(1);
        session.logout();

        let events = session.take_events();
        assert_eq!(
            events,
            vec![
                SessionEvent::LoggedIn {
                    sub: "morgan".into(),
                    role: Role::User
                },
                SessionEvent::StageCompleted {
                    stage: 1,
                    total_completed: 1
                },
                SessionEvent::LoggedOut {
                    previous_role: Role::User
                },
            ]
        );

        // Drained queue stays drained.
        assert!(session.take_events().is_empty());
    }

    #[test]
    fn test_all_stages_complete() {
        let mut session = SessionState::new();
        session.complete_stage(1);
        session.complete_stage(3);
        assert!(!session.snapshot().all_stages_complete());

        session.complete_stage(2);
        assert!(session.snapshot().all_stages_complete());
    }

    #[test]
    fn test_lesson_walkthrough() {
        let mut session = SessionState::new();
        assert!(!session.has_valid_token());

        session.login("morgan", AuthRole::User);
        assert!(session.has_valid_token());
        assert_eq!(session.snapshot().role, Role::User);
        assert!(!Role::User.can_access(Role::Admin));

        session.login("morgan", AuthRole::Admin);
        assert!(Role::Admin.can_access(Role::Admin));

        session.logout();
        let snap = session.snapshot();
        assert!(!snap.has_valid_token());
        assert_eq!(snap.role, Role::Guest);
        assert!(!Role::Guest.can_access(Role::User));
    }

    /// One step of an arbitrary mutation sequence.
    #[derive(Clone, Debug)]
    enum Op {
        Login(AuthRole),
        Logout,
        CompleteStage(u32),
        Reset,
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Login(AuthRole::User)),
            Just(Op::Login(AuthRole::Admin)),
            Just(Op::Logout),
            (1u32..=6).prop_map(Op::CompleteStage),
            Just(Op::Reset),
        ]
    }

    proptest! {
        // Authentication always equals "the most recent auth action was
        // a login", and the invariants hold after any sequence.
        #[test]
        fn prop_invariants_hold_after_any_sequence(ops in proptest::collection::vec(arb_op(), 0..40)) {
            let mut session = SessionState::new();
            let mut expect_authenticated = false;

            for op in &ops {
                match op {
                    Op::Login(role) => {
                        session.login("prop", *role);
                        expect_authenticated = true;
                    }
                    Op::Logout | Op::Reset => {
                        match op {
                            Op::Logout => session.logout(),
                            _ => session.reset(),
                        }
                        expect_authenticated = false;
                    }
                    Op::CompleteStage(stage) => session.complete_stage(*stage),
                }

                let snap = session.snapshot();
                prop_assert_eq!(snap.is_authenticated, expect_authenticated);
                prop_assert_eq!(snap.token.is_some(), snap.is_authenticated);
                prop_assert_eq!(snap.has_valid_token(), snap.is_authenticated);
                if !snap.is_authenticated {
                    prop_assert_eq!(snap.role, Role::Guest);
                }
                if let Some(token) = &snap.token {
                    prop_assert!(token.is_complete());
                }
            }
        }

        // The stage set holds exactly the distinct stages completed
        // since the last reset.
        #[test]
        fn prop_stage_set_matches_history(ops in proptest::collection::vec(arb_op(), 0..40)) {
            let mut session = SessionState::new();
            let mut expected = std::collections::BTreeSet::new();

            for op in &ops {
                match op {
                    Op::Login(role) => session.login("prop", *role),
                    Op::Logout => session.logout(),
                    Op::CompleteStage(stage) => {
                        session.complete_stage(*stage);
                        expected.insert(*stage);
                    }
                    Op::Reset => {
                        session.reset();
                        expected.clear();
                    }
                }
            }

            prop_assert_eq!(session.snapshot().completed_stages, expected);
        }
    }
}

//! Shared session resource and the event pump.
//!
//! The one `SessionState` for the running game lives here as an
//! explicitly constructed resource; scenes take fresh snapshots for
//! every read and go through the core mutators for every write.

use bevy::prelude::*;
use token_quest::{SessionEvent, SessionSnapshot, SessionState};

/// Owns the session for the running game.
#[derive(Resource, Default)]
pub struct Session {
    pub state: SessionState,
}

impl Session {
    /// Fresh copy-on-read view; callers take one per decision and
    /// never cache across frames.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.snapshot()
    }
}

/// Bevy-side echo of a core session event.
#[derive(Event)]
pub struct SessionChanged(pub SessionEvent);

/// Drain core events into Bevy events once per frame.
pub fn pump_session_events(
    mut session: ResMut<Session>,
    mut writer: EventWriter<SessionChanged>,
) {
    for event in session.state.take_events() {
        info!(?event, "session event");
        writer.send(SessionChanged(event));
    }
}

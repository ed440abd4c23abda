//! # Token Quest Core
//!
//! Session and access-control logic for Token Quest, an educational
//! game that teaches JWT authentication concepts (login, protected
//! resources, logout) through a 2D game world.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    TOKEN QUEST CORE                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  session/                                                    │
//! │  ├── role.rs    - Roles and the rank-based evaluator         │
//! │  ├── token.rs   - Simulated token and display-only claims    │
//! │  ├── state.rs   - Session state, snapshots, mutators         │
//! │  ├── access.rs  - Combined token + rank access decisions     │
//! │  └── events.rs  - Events drained by the presentation layer   │
//! │                                                              │
//! │  error.rs       - Parse errors for untrusted role strings    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Simulation guarantee
//!
//! Everything here is pedagogical state toggling. No token is ever
//! signed, verified, encoded, or transmitted; the "JWT" is three
//! presence flags plus display-only claims, and the compact preview
//! shown in the game is a fixed sample string. Treating any of this
//! as real authentication would be a category error.
//!
//! The crate is single-threaded by design: one writer (the UI event
//! loop), reads via copy-on-read snapshots, no locks.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod error;
pub mod session;

pub use error::SessionError;
pub use session::access::AccessDecision;
pub use session::events::SessionEvent;
pub use session::role::{AuthRole, Role};
pub use session::state::{SessionSnapshot, SessionState};
pub use session::token::{SimulatedToken, TokenClaims};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of gameplay stages (login gateway, resource hall, logout portal).
pub const STAGE_COUNT: u32 = 3;

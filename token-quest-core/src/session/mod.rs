//! Session state, roles, simulated tokens, and access evaluation.

pub mod access;
pub mod events;
pub mod role;
pub mod state;
pub mod token;

pub use access::AccessDecision;
pub use events::SessionEvent;
pub use role::{AuthRole, Role};
pub use state::{SessionSnapshot, SessionState};
pub use token::{SimulatedToken, TokenClaims};

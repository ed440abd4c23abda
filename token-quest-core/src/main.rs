//! Token Quest session demo.
//!
//! Walks a scripted session through the full lesson: login, protected
//! resource checks, role elevation, logout, reset. Useful for seeing
//! the state transitions and events without launching the game client.

use anyhow::{Context, Result};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use token_quest::{AccessDecision, AuthRole, Role, SessionState, STAGE_COUNT, VERSION};

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Token Quest core v{}", VERSION);
    info!("Stages in the lesson: {}", STAGE_COUNT);

    demo_session()
}

/// Run the scripted lesson.
fn demo_session() -> Result<()> {
    let mut session = SessionState::new();

    info!("=== Fresh Session ===");
    info!("has_valid_token: {}", session.has_valid_token());
    probe_doors(&session);

    info!("=== Stage 1: Login ===");
    session.login("morgan", AuthRole::User);
    session.complete_stage(1);

    let snap = session.snapshot();
    let token = snap.token.as_ref().context("token present after login")?;
    info!("compact preview: {}", token.compact_preview());
    info!(
        "claims:\n{}",
        serde_json::to_string_pretty(&token.claims).context("claims serialize")?
    );

    info!("=== Stage 2: Protected Resources ===");
    probe_doors(&session);
    info!("Elevating to admin...");
    session.login("morgan", AuthRole::Admin);
    probe_doors(&session);
    session.complete_stage(2);

    info!("=== Stage 3: Logout ===");
    session.logout();
    session.complete_stage(3);
    probe_doors(&session);

    let snap = session.snapshot();
    info!(
        "lesson complete: {}/{} stages",
        snap.completed_count(),
        STAGE_COUNT
    );

    info!("=== Events ===");
    for event in session.take_events() {
        info!("event: {:?}", event);
    }

    info!("=== Reset ===");
    session.reset();
    let snap = session.snapshot();
    info!(
        "back to defaults: authenticated={}, role={}, stages={}",
        snap.is_authenticated,
        snap.role,
        snap.completed_count()
    );

    Ok(())
}

/// Try every door tier and report the decision, the way the resource
/// hall scene does.
fn probe_doors(session: &SessionState) {
    let snap = session.snapshot();
    for required in [Role::Guest, Role::User, Role::Admin] {
        match snap.evaluate_access(required) {
            AccessDecision::Granted => {
                info!("door [{required}]: ACCESS GRANTED");
            }
            AccessDecision::DeniedNoToken => {
                warn!("door [{required}]: denied, no token held");
            }
            AccessDecision::DeniedRole { required: needed } => {
                warn!("door [{required}]: denied, requires {needed} role");
            }
        }
    }
}

//! Game module - the three walkable stages and everything they share.
//!
//! Stage flow:
//! - Login Gateway: earn a token through the animated handshake
//! - Resource Hall: spend the token on gated doors
//! - Logout Portal: destroy the token and close the loop

use bevy::prelude::*;
use token_quest::SessionEvent;

use crate::AppState;

pub mod components;
pub mod doors;
pub mod login;
pub mod logout;
pub mod player;
pub mod session;
pub mod visuals;

pub use components::*;
pub use session::{Session, SessionChanged};

// ============================================================================
// SHARED CONSTANTS
// ============================================================================

/// Backdrop, same hue as the original art direction (#1a1f2e)
pub const COLOR_BACKDROP: Color = Color::srgb(0.10, 0.12, 0.18);
/// Primary accent (#7c3aed)
pub const COLOR_ACCENT: Color = Color::srgb(0.49, 0.23, 0.93);
/// Success green (#10b981)
pub const COLOR_SUCCESS: Color = Color::srgb(0.06, 0.72, 0.51);
/// Warning amber (#f59e0b)
pub const COLOR_WARN: Color = Color::srgb(0.96, 0.62, 0.04);
/// Danger red (#ef4444)
pub const COLOR_DANGER: Color = Color::srgb(0.94, 0.27, 0.27);
/// Muted gray-blue (#94a3b8)
pub const COLOR_MUTED: Color = Color::srgb(0.58, 0.64, 0.72);
/// Body text (#e2e8f0)
pub const COLOR_TEXT: Color = Color::srgb(0.89, 0.91, 0.94);
/// Credential packet amber (#fbbf24)
pub const COLOR_PACKET: Color = Color::srgb(0.98, 0.75, 0.14);

/// Walkable area of every stage
pub const PLAY_AREA_MIN: Vec2 = Vec2::new(-560.0, -250.0);
/// Walkable area of every stage
pub const PLAY_AREA_MAX: Vec2 = Vec2::new(560.0, 190.0);

// ============================================================================
// MESSAGE BOARD
// ============================================================================

/// Text shown in the bottom message bar, written by whichever stage is
/// active and rendered by the UI.
#[derive(Resource)]
pub struct MessageBoard {
    pub text: String,
    pub color: Color,
}

impl Default for MessageBoard {
    fn default() -> Self {
        Self {
            text: String::new(),
            color: COLOR_MUTED,
        }
    }
}

impl MessageBoard {
    pub fn set(&mut self, text: impl Into<String>, color: Color) {
        let text = text.into();
        if self.text != text || self.color != color {
            self.text = text;
            self.color = color;
        }
    }
}

// ============================================================================
// GAME PLUGIN
// ============================================================================

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app
            // Resources
            .init_resource::<Session>()
            .init_resource::<MessageBoard>()
            .init_resource::<login::LoginFlow>()
            .init_resource::<doors::NearDoor>()
            .init_resource::<logout::LogoutSequence>()
            // Events
            .add_event::<SessionChanged>()
            .add_event::<login::CredentialsSubmitted>()
            // Stage setup/teardown
            .add_systems(OnEnter(AppState::LoginGateway), login::setup_gateway)
            .add_systems(OnExit(AppState::LoginGateway), (cleanup_level, login::reset_login_flow))
            .add_systems(OnEnter(AppState::ResourceHall), doors::setup_hall)
            .add_systems(OnExit(AppState::ResourceHall), cleanup_level)
            .add_systems(OnEnter(AppState::LogoutPortal), logout::setup_portal_scene)
            .add_systems(OnExit(AppState::LogoutPortal), cleanup_level)
            // Session events flow regardless of stage
            .add_systems(Update, (session::pump_session_events, celebrate_stage_events))
            // Shared world systems
            .add_systems(
                Update,
                (
                    player::player_input,
                    player::apply_velocity,
                    player::clamp_to_play_area,
                    visuals::pulse_sprites,
                    visuals::scale_in,
                    visuals::update_particles,
                    visuals::update_floating_text,
                    escape_to_menu,
                )
                    .run_if(in_playable_state),
            )
            // Stage 1: login gateway
            .add_systems(
                Update,
                (
                    login::gateway_proximity,
                    login::handle_credentials,
                    login::advance_transmission,
                    login::advance_construction,
                    login::update_gateway_messages,
                    login::gateway_next,
                )
                    .run_if(in_state(AppState::LoginGateway)),
            )
            // Stage 2: resource hall
            .add_systems(
                Update,
                (
                    doors::hall_proximity,
                    doors::attempt_access,
                    doors::animate_doors,
                    doors::hall_next,
                )
                    .run_if(in_state(AppState::ResourceHall)),
            )
            // Stage 3: logout portal
            .add_systems(
                Update,
                (
                    logout::portal_interaction,
                    logout::animate_token_shatter,
                    logout::portal_restart,
                )
                    .run_if(in_state(AppState::LogoutPortal)),
            );
    }
}

/// Run condition: any of the three walkable stages
pub fn in_playable_state(state: Res<State<AppState>>) -> bool {
    !matches!(state.get(), AppState::MainMenu)
}

/// Despawn everything the departing stage spawned
fn cleanup_level(mut commands: Commands, query: Query<Entity, With<LevelEntity>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

/// ESC returns to the menu (unless the login form owns the keyboard)
fn escape_to_menu(
    keyboard: Res<ButtonInput<KeyCode>>,
    flow: Res<login::LoginFlow>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if flow.input_locked() {
        return;
    }
    if keyboard.just_pressed(KeyCode::Escape) {
        next_state.set(AppState::MainMenu);
    }
}

/// Floating cheer whenever a stage completes for the first time
fn celebrate_stage_events(
    mut commands: Commands,
    mut events: EventReader<SessionChanged>,
) {
    for SessionChanged(event) in events.read() {
        if let SessionEvent::StageCompleted { stage, .. } = event {
            visuals::spawn_floating_text(
                &mut commands,
                Vec2::new(0.0, 160.0),
                &format!("STAGE {stage} COMPLETE!"),
                COLOR_SUCCESS,
            );
        }
    }
}

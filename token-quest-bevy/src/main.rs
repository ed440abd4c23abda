//! Token Quest - a 2D walkthrough of JWT authentication
//!
//! Three stages: earn a token at the login gateway, spend it on the
//! doors of the resource hall, destroy it at the logout portal.

mod game;
mod ui;

use bevy::prelude::*;
use bevy::window::WindowMode;

use game::GamePlugin;
use ui::UiPlugin;

/// Top-level scenes.
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    #[default]
    MainMenu,
    LoginGateway,
    ResourceHall,
    LogoutPortal,
}

fn main() {
    App::new()
        // Bevy defaults with custom window
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Token Quest".into(),
                resolution: (1280., 720.).into(),
                mode: WindowMode::Windowed,
                ..default()
            }),
            ..default()
        }))
        // Scene state
        .init_state::<AppState>()
        // Our plugins
        .add_plugins((GamePlugin, UiPlugin))
        // Startup
        .add_systems(Startup, setup_camera)
        .run();
}

/// 2D camera over the dark classroom backdrop
fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Camera {
            clear_color: ClearColorConfig::Custom(game::COLOR_BACKDROP),
            ..default()
        },
    ));

    info!("Token Quest initialized");
}

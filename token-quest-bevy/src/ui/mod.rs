//! UI module - main menu, HUD overlays, and the login form.

use bevy::color::Mix;
use bevy::prelude::*;

use crate::game::{
    in_playable_state, Session, COLOR_ACCENT, COLOR_MUTED, COLOR_SUCCESS, COLOR_TEXT,
};
use crate::AppState;

pub mod form;
pub mod hud;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<form::FormInput>()
            .add_systems(OnEnter(AppState::MainMenu), setup_main_menu)
            .add_systems(OnExit(AppState::MainMenu), cleanup_main_menu)
            // Every stage shares the HUD; the hall adds the role switcher
            .add_systems(OnEnter(AppState::LoginGateway), hud::setup_hud)
            .add_systems(OnExit(AppState::LoginGateway), hud::cleanup_hud)
            .add_systems(
                OnEnter(AppState::ResourceHall),
                (hud::setup_hud, hud::setup_role_switcher),
            )
            .add_systems(OnExit(AppState::ResourceHall), hud::cleanup_hud)
            .add_systems(OnEnter(AppState::LogoutPortal), hud::setup_hud)
            .add_systems(OnExit(AppState::LogoutPortal), hud::cleanup_hud)
            .add_systems(
                Update,
                handle_menu_buttons.run_if(in_state(AppState::MainMenu)),
            )
            .add_systems(
                Update,
                (
                    hud::update_message_bar,
                    hud::update_token_panel,
                    hud::update_session_panel,
                )
                    .run_if(in_playable_state),
            )
            .add_systems(
                Update,
                hud::handle_role_buttons.run_if(in_state(AppState::ResourceHall)),
            )
            .add_systems(
                Update,
                (
                    form::sync_form_overlay,
                    form::capture_text,
                    form::submit_or_cancel,
                    form::update_form_display,
                )
                    .run_if(in_state(AppState::LoginGateway)),
            );
    }
}

// ============================================================================
// MAIN MENU
// ============================================================================

/// Marker for main menu UI
#[derive(Component)]
struct MainMenuUI;

/// Button actions
#[derive(Component)]
enum MenuButton {
    Gateway,
    Hall,
    Portal,
    Quit,
}

/// Resting background for hover restore
#[derive(Component)]
struct MenuButtonBase(Color);

/// Setup main menu UI
fn setup_main_menu(mut commands: Commands, session: Res<Session>) {
    let snapshot = session.snapshot();

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.06, 0.07, 0.11, 0.98)),
            MainMenuUI,
        ))
        .with_children(|parent| {
            // Title
            parent.spawn((
                Text::new("TOKEN QUEST"),
                TextFont {
                    font_size: 64.0,
                    ..default()
                },
                TextColor(COLOR_ACCENT),
                Node {
                    margin: UiRect::bottom(Val::Px(8.0)),
                    ..default()
                },
            ));

            // Subtitle
            parent.spawn((
                Text::new("Learn JWT authentication through interactive gameplay"),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(COLOR_TEXT),
                Node {
                    margin: UiRect::bottom(Val::Px(36.0)),
                    ..default()
                },
            ));

            // Stage buttons, green once completed
            parent
                .spawn(Node {
                    flex_direction: FlexDirection::Row,
                    column_gap: Val::Px(18.0),
                    margin: UiRect::bottom(Val::Px(36.0)),
                    ..default()
                })
                .with_children(|row| {
                    spawn_stage_button(
                        row,
                        "STAGE 1",
                        "Login Gateway",
                        MenuButton::Gateway,
                        snapshot.stage_completed(1),
                    );
                    spawn_stage_button(
                        row,
                        "STAGE 2",
                        "Resource Hall",
                        MenuButton::Hall,
                        snapshot.stage_completed(2),
                    );
                    spawn_stage_button(
                        row,
                        "STAGE 3",
                        "Logout Portal",
                        MenuButton::Portal,
                        snapshot.stage_completed(3),
                    );
                });

            // Quit
            spawn_stage_button(parent, "QUIT", "", MenuButton::Quit, false);

            // Instructions
            parent.spawn((
                Text::new(
                    "Navigate the stages to understand:\n\
                     how a login issues a token - how protected doors check it - how logout destroys it\n\n\
                     WASD or arrows to move | SPACE to interact | N next stage | ESC back here",
                ),
                TextFont {
                    font_size: 13.0,
                    ..default()
                },
                TextColor(COLOR_MUTED),
                Node {
                    margin: UiRect::top(Val::Px(32.0)),
                    ..default()
                },
            ));
        });
}

/// Spawn one menu button
fn spawn_stage_button(
    parent: &mut ChildBuilder,
    title: &str,
    subtitle: &str,
    action: MenuButton,
    completed: bool,
) {
    let base = if completed {
        COLOR_SUCCESS
    } else {
        Color::srgb(0.15, 0.20, 0.35)
    };

    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(200.0),
                height: Val::Px(72.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BorderColor(Color::srgb(0.30, 0.50, 0.80)),
            BackgroundColor(base),
            MenuButtonBase(base),
            action,
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(title),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            if !subtitle.is_empty() {
                button.spawn((
                    Text::new(subtitle),
                    TextFont {
                        font_size: 13.0,
                        ..default()
                    },
                    TextColor(COLOR_TEXT),
                ));
            }
        });
}

/// Handle menu button clicks
fn handle_menu_buttons(
    mut interaction_query: Query<
        (
            &Interaction,
            &MenuButton,
            &MenuButtonBase,
            &mut BackgroundColor,
            &mut BorderColor,
        ),
        Changed<Interaction>,
    >,
    mut app_state: ResMut<NextState<AppState>>,
) {
    for (interaction, button, base, mut bg_color, mut border_color) in interaction_query.iter_mut()
    {
        match *interaction {
            Interaction::Pressed => {
                match button {
                    MenuButton::Gateway => app_state.set(AppState::LoginGateway),
                    MenuButton::Hall => app_state.set(AppState::ResourceHall),
                    MenuButton::Portal => app_state.set(AppState::LogoutPortal),
                    MenuButton::Quit => std::process::exit(0),
                }
                *bg_color = BackgroundColor(base.0.mix(&Color::WHITE, 0.25));
            }
            Interaction::Hovered => {
                *bg_color = BackgroundColor(base.0.mix(&Color::WHITE, 0.12));
                *border_color = BorderColor(Color::srgb(0.50, 0.70, 1.00));
            }
            Interaction::None => {
                *bg_color = BackgroundColor(base.0);
                *border_color = BorderColor(Color::srgb(0.30, 0.50, 0.80));
            }
        }
    }
}

/// Cleanup main menu
fn cleanup_main_menu(mut commands: Commands, query: Query<Entity, With<MainMenuUI>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

//! Stage 3 - the logout portal.
//!
//! The token visualization shakes, shatters into part-colored bursts,
//! and the session ends. Finishing here with all stages complete earns
//! the celebration.

use bevy::prelude::*;

use super::components::{LevelEntity, Player, Portal, Pulse, TokenPart};
use super::player::spawn_player;
use super::session::Session;
use super::visuals::{spawn_burst, spawn_floating_text};
use super::{MessageBoard, COLOR_ACCENT, COLOR_DANGER, COLOR_MUTED, COLOR_SUCCESS, COLOR_TEXT, COLOR_WARN};
use crate::AppState;

/// How close the player must be to work the portal
const PORTAL_RANGE: f32 = 130.0;

/// Where the logout sequence stands in this visit
#[derive(Resource, Default)]
pub struct LogoutSequence {
    pub ran: bool,
    pub celebrated: bool,
}

/// Token blocks mid-destruction
#[derive(Component)]
pub struct TokenShatter {
    pub timer: f32,
    pub origin: Vec3,
}

/// Caption under the token visualization
#[derive(Component)]
pub struct TokenCaption;

// ============================================================================
// SETUP
// ============================================================================

/// Build the portal stage; show the held token if there is one
pub fn setup_portal_scene(
    mut commands: Commands,
    session: Res<Session>,
    mut sequence: ResMut<LogoutSequence>,
) {
    *sequence = LogoutSequence::default();

    spawn_player(&mut commands, Vec2::new(-520.0, -60.0));

    commands.spawn((
        Text2d::new("Stage 3: The Logout Portal"),
        TextFont {
            font_size: 26.0,
            ..default()
        },
        TextColor(COLOR_ACCENT),
        Transform::from_translation(Vec3::new(0.0, 310.0, 6.0)),
        LevelEntity,
    ));

    commands.spawn((
        Text2d::new("End your session by destroying the token at the portal"),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(COLOR_TEXT),
        Transform::from_translation(Vec3::new(0.0, 278.0, 6.0)),
        LevelEntity,
    ));

    // Glow behind the portal
    commands.spawn((
        Sprite {
            color: COLOR_DANGER.with_alpha(0.25),
            custom_size: Some(Vec2::splat(150.0)),
            ..default()
        },
        Transform::from_translation(Vec3::new(420.0, -40.0, 4.0)),
        Pulse {
            speed: 1.6,
            min_alpha: 0.08,
            phase: 0.7,
        },
        LevelEntity,
    ));

    commands.spawn((
        Portal::Logout,
        Sprite {
            color: COLOR_DANGER,
            custom_size: Some(Vec2::splat(96.0)),
            ..default()
        },
        Transform::from_translation(Vec3::new(420.0, -40.0, 5.0)),
        Pulse::default(),
        LevelEntity,
    ));

    commands.spawn((
        Text2d::new("LOGOUT\nPORTAL"),
        TextFont {
            font_size: 15.0,
            ..default()
        },
        TextColor(Color::WHITE),
        TextLayout::new_with_justify(JustifyText::Center),
        Transform::from_translation(Vec3::new(420.0, 55.0, 6.0)),
        LevelEntity,
    ));

    if session.snapshot().has_valid_token() {
        spawn_token_visualization(&mut commands);
    }

    info!("Logout portal ready");
}

/// The held token, floating mid-stage, waiting to be destroyed
fn spawn_token_visualization(commands: &mut Commands) {
    for (i, part) in TokenPart::ALL.into_iter().enumerate() {
        let position = Vec3::new(-70.0 + 70.0 * i as f32, -180.0, 25.0);

        commands
            .spawn((
                part,
                Sprite {
                    color: part.color(),
                    custom_size: Some(Vec2::new(52.0, 32.0)),
                    ..default()
                },
                Transform::from_translation(position),
                Pulse {
                    speed: 2.0,
                    min_alpha: 0.7,
                    phase: i as f32 * 0.5,
                },
                LevelEntity,
            ))
            .with_children(|parent| {
                parent.spawn((
                    Text2d::new(part.letter()),
                    TextFont {
                        font_size: 17.0,
                        ..default()
                    },
                    TextColor(Color::srgb(0.10, 0.12, 0.18)),
                    Transform::from_translation(Vec3::new(0.0, 0.0, 1.0)),
                ));
            });
    }

    commands.spawn((
        TokenCaption,
        Text2d::new("Active Session Token"),
        TextFont {
            font_size: 13.0,
            ..default()
        },
        TextColor(COLOR_TEXT),
        Transform::from_translation(Vec3::new(0.0, -225.0, 25.0)),
        LevelEntity,
    ));
}

// ============================================================================
// INTERACTION
// ============================================================================

/// SPACE near the portal ends the session and starts the destruction
pub fn portal_interaction(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut session: ResMut<Session>,
    mut sequence: ResMut<LogoutSequence>,
    mut board: ResMut<MessageBoard>,
    player_query: Query<&Transform, With<Player>>,
    portal_query: Query<&Transform, With<Portal>>,
    block_query: Query<(Entity, &Transform), With<TokenPart>>,
    caption_query: Query<Entity, With<TokenCaption>>,
) {
    let near = match (player_query.get_single(), portal_query.get_single()) {
        (Ok(player), Ok(portal)) => {
            player
                .translation
                .truncate()
                .distance(portal.translation.truncate())
                < PORTAL_RANGE
        }
        _ => false,
    };

    if sequence.ran {
        if sequence.celebrated {
            board.set(
                "Lesson complete! Press R to reset the session and return to the menu.",
                COLOR_SUCCESS,
            );
        } else {
            board.set(
                "Session ended, token destroyed. Press R to reset, or ESC for the menu.",
                COLOR_SUCCESS,
            );
        }
        return;
    }

    let has_token = session.snapshot().has_valid_token();

    if near {
        if has_token {
            board.set("Press SPACE to log out and destroy your token!", COLOR_DANGER);
        } else {
            board.set("No active session to end. The portal hums quietly.", COLOR_MUTED);
        }
    } else {
        board.set(
            "Move close to the logout portal to end your session.",
            COLOR_MUTED,
        );
    }

    if !(near && has_token && keyboard.just_pressed(KeyCode::Space)) {
        return;
    }

    sequence.ran = true;

    // Destruction is scenery; the state change is immediate
    session.state.logout();
    session.state.complete_stage(3);

    for (entity, transform) in block_query.iter() {
        commands.entity(entity).insert(TokenShatter {
            timer: 0.0,
            origin: transform.translation,
        });
    }
    for entity in caption_query.iter() {
        commands.entity(entity).despawn_recursive();
    }

    if session.snapshot().all_stages_complete() && !sequence.celebrated {
        sequence.celebrated = true;
        spawn_celebration(&mut commands);
    }
}

/// Shake the doomed blocks, then burst them into part-colored squares
pub fn animate_token_shatter(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &TokenPart, &mut TokenShatter, &mut Transform)>,
) {
    let dt = time.delta_secs();

    for (entity, part, mut shatter, mut transform) in query.iter_mut() {
        shatter.timer += dt;

        if shatter.timer >= 0.6 {
            spawn_burst(
                &mut commands,
                shatter.origin.truncate(),
                &[part.color()],
                10,
                140.0,
            );
            commands.entity(entity).despawn_recursive();
        } else {
            let jitter = Vec3::new(
                (rand::random::<f32>() - 0.5) * 12.0,
                (rand::random::<f32>() - 0.5) * 12.0,
                0.0,
            );
            transform.translation = shatter.origin + jitter;
        }
    }
}

fn spawn_celebration(commands: &mut Commands) {
    commands.spawn((
        Text2d::new("CONGRATULATIONS!\nYou finished the Token Quest lesson!"),
        TextFont {
            font_size: 28.0,
            ..default()
        },
        TextColor(COLOR_SUCCESS),
        TextLayout::new_with_justify(JustifyText::Center),
        Transform::from_translation(Vec3::new(0.0, 120.0, 40.0)),
        LevelEntity,
    ));

    spawn_burst(
        commands,
        Vec2::new(0.0, 40.0),
        &[COLOR_ACCENT, COLOR_SUCCESS, COLOR_WARN],
        50,
        260.0,
    );

    spawn_floating_text(
        commands,
        Vec2::new(0.0, 190.0),
        "SESSION LIFECYCLE MASTERED",
        COLOR_ACCENT,
    );
}

/// R resets everything and returns to the menu
pub fn portal_restart(
    keyboard: Res<ButtonInput<KeyCode>>,
    sequence: Res<LogoutSequence>,
    mut session: ResMut<Session>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if sequence.ran && keyboard.just_pressed(KeyCode::KeyR) {
        session.state.reset();
        next_state.set(AppState::MainMenu);
    }
}

//! Stage 2 - the hall of protected resources.
//!
//! Three doors gated at rising tiers. Every attempt takes a fresh
//! snapshot and runs the combined token-plus-rank check; the door
//! itself never holds an opinion.

use bevy::prelude::*;
use token_quest::{AccessDecision, Role};

use super::components::{Door, DoorShake, DoorSlide, LevelEntity, Player};
use super::player::spawn_player;
use super::session::Session;
use super::visuals::spawn_floating_text;
use super::{MessageBoard, COLOR_ACCENT, COLOR_DANGER, COLOR_MUTED, COLOR_SUCCESS, COLOR_TEXT, COLOR_WARN};
use crate::AppState;

/// How close the player must be to try a door
const DOOR_RANGE: f32 = 100.0;

/// The door the player is currently standing near, if any
#[derive(Resource, Default)]
pub struct NearDoor(pub Option<Entity>);

// ============================================================================
// SETUP
// ============================================================================

/// Build the hall: player, three gated doors, captions
pub fn setup_hall(mut commands: Commands, mut near: ResMut<NearDoor>) {
    near.0 = None;

    spawn_player(&mut commands, Vec2::new(-520.0, -60.0));

    commands.spawn((
        Text2d::new("Stage 2: The Hall of Protected Resources"),
        TextFont {
            font_size: 26.0,
            ..default()
        },
        TextColor(COLOR_ACCENT),
        Transform::from_translation(Vec3::new(0.0, 310.0, 6.0)),
        LevelEntity,
    ));

    commands.spawn((
        Text2d::new("Use your token to access the different resource tiers"),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(COLOR_TEXT),
        Transform::from_translation(Vec3::new(0.0, 278.0, 6.0)),
        LevelEntity,
    ));

    spawn_door(&mut commands, -240.0, "Public Archive", Role::Guest, COLOR_SUCCESS);
    spawn_door(&mut commands, 0.0, "Members Lounge", Role::User, COLOR_WARN);
    spawn_door(&mut commands, 240.0, "Admin Vault", Role::Admin, COLOR_DANGER);

    info!("Resource hall ready");
}

fn spawn_door(commands: &mut Commands, x: f32, label: &'static str, required: Role, color: Color) {
    let y = 60.0;

    commands
        .spawn((
            Door {
                label,
                required,
                home_x: x,
            },
            Sprite {
                color,
                custom_size: Some(Vec2::new(64.0, 110.0)),
                ..default()
            },
            Transform::from_translation(Vec3::new(x, y, 5.0)),
            LevelEntity,
        ))
        .with_children(|parent| {
            // Keyhole
            parent.spawn((
                Sprite {
                    color: Color::srgb(0.02, 0.02, 0.04),
                    custom_size: Some(Vec2::new(10.0, 16.0)),
                    ..default()
                },
                Transform::from_translation(Vec3::new(0.0, -4.0, 1.0)),
            ));
        });

    // Captions stay put while the door animates
    commands.spawn((
        Text2d::new(label),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::WHITE),
        TextLayout::new_with_justify(JustifyText::Center),
        Transform::from_translation(Vec3::new(x, y - 78.0, 6.0)),
        LevelEntity,
    ));
    commands.spawn((
        Text2d::new(format!("role: {required}")),
        TextFont {
            font_size: 11.0,
            ..default()
        },
        TextColor(COLOR_MUTED),
        Transform::from_translation(Vec3::new(x, y - 98.0, 6.0)),
        LevelEntity,
    ));
}

// ============================================================================
// PROXIMITY AND ACCESS
// ============================================================================

/// Track the nearest door and preview the access outcome in the bar
pub fn hall_proximity(
    session: Res<Session>,
    mut near: ResMut<NearDoor>,
    mut board: ResMut<MessageBoard>,
    player_query: Query<&Transform, With<Player>>,
    door_query: Query<(Entity, &Transform, &Door)>,
) {
    let Ok(player) = player_query.get_single() else {
        return;
    };
    let player_pos = player.translation.truncate();

    near.0 = None;
    let mut closest = f32::INFINITY;
    for (entity, transform, _) in door_query.iter() {
        let distance = player_pos.distance(transform.translation.truncate());
        if distance < DOOR_RANGE && distance < closest {
            near.0 = Some(entity);
            closest = distance;
        }
    }

    let Some(entity) = near.0 else {
        board.set(
            "Move near a door and press SPACE to test access. Use the role buttons to experiment.",
            COLOR_MUTED,
        );
        return;
    };
    let Ok((_, _, door)) = door_query.get(entity) else {
        return;
    };

    match session.snapshot().evaluate_access(door.required) {
        AccessDecision::Granted => {
            board.set(format!("Press SPACE to open the {}", door.label), COLOR_SUCCESS);
        }
        AccessDecision::DeniedNoToken => {
            board.set(
                "A valid token is required! Complete the Login Gateway first.",
                COLOR_DANGER,
            );
        }
        AccessDecision::DeniedRole { required } => {
            board.set(
                format!("Access denied! The {} requires the {required} role.", door.label),
                COLOR_DANGER,
            );
        }
    }
}

/// SPACE near a door: evaluate, animate, and record progress
pub fn attempt_access(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    near: Res<NearDoor>,
    mut session: ResMut<Session>,
    door_query: Query<(&Transform, &Door)>,
) {
    if !keyboard.just_pressed(KeyCode::Space) {
        return;
    }
    let Some(entity) = near.0 else {
        return;
    };
    let Ok((transform, door)) = door_query.get(entity) else {
        return;
    };

    let feedback_pos = transform.translation.truncate() + Vec2::new(0.0, 85.0);

    match session.snapshot().evaluate_access(door.required) {
        AccessDecision::Granted => {
            commands.entity(entity).insert(DoorSlide { timer: 0.0 });
            spawn_floating_text(&mut commands, feedback_pos, "ACCESS GRANTED", COLOR_SUCCESS);
            session.state.complete_stage(2);
        }
        AccessDecision::DeniedNoToken => {
            commands.entity(entity).insert(DoorShake { timer: 0.0 });
            spawn_floating_text(
                &mut commands,
                feedback_pos,
                "ACCESS DENIED\nNO TOKEN",
                COLOR_DANGER,
            );
        }
        AccessDecision::DeniedRole { required } => {
            commands.entity(entity).insert(DoorShake { timer: 0.0 });
            spawn_floating_text(
                &mut commands,
                feedback_pos,
                &format!(
                    "ACCESS DENIED\nREQUIRES {} ROLE",
                    required.as_str().to_uppercase()
                ),
                COLOR_DANGER,
            );
        }
    }
}

/// Slide granted doors open and rattle refused ones
pub fn animate_doors(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(
        Entity,
        &Door,
        &mut Transform,
        Option<&mut DoorSlide>,
        Option<&mut DoorShake>,
    )>,
) {
    let dt = time.delta_secs();

    for (entity, door, mut transform, slide, shake) in query.iter_mut() {
        if let Some(mut slide) = slide {
            slide.timer += dt;
            let t = slide.timer / 1.0;
            if t >= 1.0 {
                transform.translation.x = door.home_x;
                commands.entity(entity).remove::<DoorSlide>();
            } else {
                // Out and back
                transform.translation.x = door.home_x + (t * std::f32::consts::PI).sin() * 42.0;
            }
        }

        if let Some(mut shake) = shake {
            shake.timer += dt;
            if shake.timer >= 0.4 {
                transform.translation.x = door.home_x;
                commands.entity(entity).remove::<DoorShake>();
            } else {
                transform.translation.x = door.home_x + (shake.timer * 55.0).sin() * 6.0;
            }
        }
    }
}

/// N moves on to the logout portal
pub fn hall_next(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if keyboard.just_pressed(KeyCode::KeyN) {
        next_state.set(AppState::LogoutPortal);
    }
}

//! Player spawning and movement.

use bevy::prelude::*;

use super::components::{LevelEntity, MoveSpeed, Player, Velocity};
use super::login::LoginFlow;
use super::{PLAY_AREA_MAX, PLAY_AREA_MIN};

// ============================================================================
// PLAYER SPAWNING
// ============================================================================

/// Spawn the player square at the given position
pub fn spawn_player(commands: &mut Commands, position: Vec2) {
    commands.spawn((
        Player,
        Name::new("Player"),
        Sprite {
            color: Color::srgb(0.15, 0.95, 0.35),
            custom_size: Some(Vec2::splat(26.0)),
            ..default()
        },
        Transform::from_translation(position.extend(10.0)),
        Velocity::default(),
        MoveSpeed::default(),
        LevelEntity,
    ));
}

// ============================================================================
// INPUT AND PHYSICS
// ============================================================================

/// WASD/arrow movement with smooth velocity transitions
pub fn player_input(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    flow: Res<LoginFlow>,
    mut query: Query<(&mut Velocity, &MoveSpeed), With<Player>>,
) {
    let Ok((mut velocity, speed)) = query.get_single_mut() else {
        return;
    };

    // The login form owns the keyboard while it is open
    if flow.input_locked() {
        velocity.0 = Vec2::ZERO;
        return;
    }

    let mut direction = Vec2::ZERO;

    if keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp) {
        direction.y += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown) {
        direction.y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        direction.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        direction.x += 1.0;
    }

    if direction != Vec2::ZERO {
        direction = direction.normalize();
    }

    // Smooth velocity transition rather than instant snapping
    let target_velocity = direction * speed.0;
    let lerp_speed = 10.0;
    let dt = time.delta_secs();

    velocity.0 = velocity.0.lerp(target_velocity, lerp_speed * dt);
}

/// Apply velocity to transform
pub fn apply_velocity(time: Res<Time>, mut query: Query<(&mut Transform, &Velocity)>) {
    let dt = time.delta_secs();

    for (mut transform, velocity) in query.iter_mut() {
        transform.translation.x += velocity.0.x * dt;
        transform.translation.y += velocity.0.y * dt;
    }
}

/// Keep the player inside the walkable area (soft clamp)
pub fn clamp_to_play_area(mut query: Query<&mut Transform, With<Player>>) {
    for mut transform in query.iter_mut() {
        transform.translation.x = transform
            .translation
            .x
            .clamp(PLAY_AREA_MIN.x, PLAY_AREA_MAX.x);
        transform.translation.y = transform
            .translation
            .y
            .clamp(PLAY_AREA_MIN.y, PLAY_AREA_MAX.y);
    }
}

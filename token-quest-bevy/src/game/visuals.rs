//! Visual effects - pulses, tweens, particles, floating text.

use bevy::prelude::*;

use super::components::{FloatingText, LevelEntity, Particle, Pulse, ScaleIn};

// ============================================================================
// PULSING SPRITES
// ============================================================================

/// Oscillate sprite alpha for portals and glows
pub fn pulse_sprites(time: Res<Time>, mut query: Query<(&Pulse, &mut Sprite)>) {
    let t = time.elapsed_secs();

    for (pulse, mut sprite) in query.iter_mut() {
        let wave = ((t * pulse.speed + pulse.phase).sin() + 1.0) / 2.0;
        let alpha = pulse.min_alpha + (1.0 - pulse.min_alpha) * wave;
        sprite.color = sprite.color.with_alpha(alpha);
    }
}

// ============================================================================
// SCALE-IN TWEEN
// ============================================================================

/// Ease a freshly spawned entity from scale 0 to 1 with overshoot
pub fn scale_in(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut ScaleIn, &mut Transform)>,
) {
    let dt = time.delta_secs();

    for (entity, mut tween, mut transform) in query.iter_mut() {
        tween.timer += dt;
        let t = (tween.timer / tween.duration).min(1.0);
        transform.scale = Vec3::splat(back_ease_out(t).max(0.0));

        if t >= 1.0 {
            transform.scale = Vec3::ONE;
            commands.entity(entity).remove::<ScaleIn>();
        }
    }
}

fn back_ease_out(t: f32) -> f32 {
    const S: f32 = 1.70158;
    let u = t - 1.0;
    1.0 + (S + 1.0) * u * u * u + S * u * u
}

// ============================================================================
// PARTICLES
// ============================================================================

/// Spawn a burst of square particles at a position
pub fn spawn_burst(
    commands: &mut Commands,
    position: Vec2,
    colors: &[Color],
    count: usize,
    speed: f32,
) {
    for i in 0..count {
        let angle = (i as f32 / count as f32) * std::f32::consts::TAU;
        let burst_speed = speed * (0.6 + rand::random::<f32>() * 0.8);
        let velocity = Vec2::new(angle.cos(), angle.sin()) * burst_speed;

        commands.spawn((
            Particle {
                velocity,
                lifetime: 0.6 + rand::random::<f32>() * 0.5,
            },
            Sprite {
                color: colors[i % colors.len()],
                custom_size: Some(Vec2::splat(4.0 + rand::random::<f32>() * 5.0)),
                ..default()
            },
            Transform::from_translation(position.extend(30.0)),
            LevelEntity,
        ));
    }
}

/// Update particles (move, slow, fade, shrink)
pub fn update_particles(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Particle, &mut Transform, &mut Sprite)>,
) {
    let dt = time.delta_secs();

    for (entity, mut particle, mut transform, mut sprite) in query.iter_mut() {
        transform.translation.x += particle.velocity.x * dt;
        transform.translation.y += particle.velocity.y * dt;

        particle.velocity *= 0.95;
        particle.lifetime -= dt;

        if particle.lifetime <= 0.0 {
            commands.entity(entity).despawn();
            continue;
        }

        let progress = 1.0 - (particle.lifetime / 1.1).min(1.0);
        sprite.color = sprite.color.with_alpha(1.0 - progress);

        if let Some(size) = &mut sprite.custom_size {
            *size *= 0.98;
        }
    }
}

// ============================================================================
// FLOATING TEXT
// ============================================================================

/// Spawn feedback text that rises and fades out
pub fn spawn_floating_text(commands: &mut Commands, position: Vec2, text: &str, color: Color) {
    commands.spawn((
        FloatingText {
            velocity: Vec2::new(0.0, 40.0),
            lifetime: 2.0,
        },
        Text2d::new(text),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(color),
        TextLayout::new_with_justify(JustifyText::Center),
        Transform::from_translation(position.extend(40.0)),
        LevelEntity,
    ));
}

/// Update floating text (rise, fade, despawn)
pub fn update_floating_text(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut FloatingText, &mut Transform, &mut TextColor)>,
) {
    let dt = time.delta_secs();

    for (entity, mut floating, mut transform, mut color) in query.iter_mut() {
        transform.translation.x += floating.velocity.x * dt;
        transform.translation.y += floating.velocity.y * dt;

        floating.lifetime -= dt;

        if floating.lifetime <= 0.0 {
            commands.entity(entity).despawn_recursive();
            continue;
        }

        let alpha = (floating.lifetime / 1.2).min(1.0);
        color.0 = color.0.with_alpha(alpha);
    }
}

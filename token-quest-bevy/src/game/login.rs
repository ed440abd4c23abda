//! Stage 1 - the login gateway.
//!
//! Approach the portal, fill in the form, watch the credentials travel
//! to the server and the token get built part by part. Only when the
//! last part lands does the session actually log in.

use bevy::prelude::*;
use token_quest::AuthRole;

use super::components::{
    LevelEntity, PacketTween, Player, Portal, Pulse, ScaleIn, TokenPart, TransmissionProp,
};
use super::player::spawn_player;
use super::session::Session;
use super::{
    MessageBoard, COLOR_ACCENT, COLOR_MUTED, COLOR_PACKET, COLOR_SUCCESS, COLOR_TEXT,
};
use crate::AppState;

/// How close the player must be to work the portal
const PORTAL_RANGE: f32 = 95.0;

/// Seconds into construction at which each token part appears
const PART_TIMES: [f32; 3] = [0.5, 1.5, 2.5];

/// Construction wraps up shortly after the last part lands
const CONSTRUCTION_DONE: f32 = 3.4;

// ============================================================================
// FLOW STATE
// ============================================================================

/// Authentication walkthrough progress for the gateway stage.
#[derive(Resource, Default)]
pub struct LoginFlow {
    pub stage: FlowStage,
    pub username: String,
    pub timer: f32,
    pub parts_shown: usize,
}

impl LoginFlow {
    /// The form overlay owns the keyboard while it is open.
    pub fn input_locked(&self) -> bool {
        self.stage == FlowStage::Form
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowStage {
    #[default]
    Approach,
    Form,
    Transmitting,
    Constructing,
    Complete,
}

/// Fired by the login form overlay when credentials are submitted.
#[derive(Event)]
pub struct CredentialsSubmitted {
    pub username: String,
    pub password: String,
}

// ============================================================================
// SETUP
// ============================================================================

/// Build the gateway: grid backdrop, player, pulsing login portal
pub fn setup_gateway(mut commands: Commands, mut flow: ResMut<LoginFlow>) {
    *flow = LoginFlow::default();

    spawn_grid_backdrop(&mut commands);
    spawn_player(&mut commands, Vec2::new(-520.0, -40.0));

    // Login portal
    commands.spawn((
        Portal::Login,
        Sprite {
            color: COLOR_ACCENT,
            custom_size: Some(Vec2::splat(64.0)),
            ..default()
        },
        Transform::from_translation(Vec3::new(480.0, -40.0, 5.0)),
        Pulse::default(),
        LevelEntity,
    ));

    commands.spawn((
        Text2d::new("LOGIN\nPORTAL"),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::WHITE),
        TextLayout::new_with_justify(JustifyText::Center),
        Transform::from_translation(Vec3::new(480.0, 30.0, 6.0)),
        LevelEntity,
    ));

    // Title and instructions
    commands.spawn((
        Text2d::new("Stage 1: Authentication Gateway"),
        TextFont {
            font_size: 26.0,
            ..default()
        },
        TextColor(COLOR_ACCENT),
        Transform::from_translation(Vec3::new(0.0, 310.0, 6.0)),
        LevelEntity,
    ));

    commands.spawn((
        Text2d::new("Approach the login portal to begin authentication"),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(COLOR_TEXT),
        Transform::from_translation(Vec3::new(0.0, 278.0, 6.0)),
        LevelEntity,
    ));

    info!("Gateway ready");
}

/// Faint grid lines, like the original gateway backdrop
fn spawn_grid_backdrop(commands: &mut Commands) {
    let line_color = Color::srgba(0.16, 0.19, 0.28, 0.5);

    let mut x = -640.0f32;
    while x <= 640.0 {
        commands.spawn((
            Sprite {
                color: line_color,
                custom_size: Some(Vec2::new(1.0, 720.0)),
                ..default()
            },
            Transform::from_translation(Vec3::new(x, 0.0, -50.0)),
            LevelEntity,
        ));
        x += 80.0;
    }

    let mut y = -360.0f32;
    while y <= 360.0 {
        commands.spawn((
            Sprite {
                color: line_color,
                custom_size: Some(Vec2::new(1280.0, 1.0)),
                ..default()
            },
            Transform::from_translation(Vec3::new(0.0, y, -50.0)),
            LevelEntity,
        ));
        y += 80.0;
    }
}

/// Reset the flow so a stale form can never lock input in other stages
pub fn reset_login_flow(mut flow: ResMut<LoginFlow>) {
    *flow = LoginFlow::default();
}

// ============================================================================
// INTERACTION
// ============================================================================

/// SPACE near the portal opens the login form
pub fn gateway_proximity(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut flow: ResMut<LoginFlow>,
    player_query: Query<&Transform, With<Player>>,
    portal_query: Query<&Transform, With<Portal>>,
) {
    if flow.stage != FlowStage::Approach {
        return;
    }

    let (Ok(player), Ok(portal)) = (player_query.get_single(), portal_query.get_single()) else {
        return;
    };

    let near = player
        .translation
        .truncate()
        .distance(portal.translation.truncate())
        < PORTAL_RANGE;

    if near && keyboard.just_pressed(KeyCode::Space) {
        flow.stage = FlowStage::Form;
    }
}

/// Credentials arrived from the form: start the transmission animation
pub fn handle_credentials(
    mut commands: Commands,
    mut events: EventReader<CredentialsSubmitted>,
    mut flow: ResMut<LoginFlow>,
) {
    for submitted in events.read() {
        flow.username = submitted.username.clone();
        flow.stage = FlowStage::Transmitting;
        flow.timer = 0.0;

        let client_pos = Vec2::new(-350.0, -200.0);
        let server_pos = Vec2::new(350.0, -200.0);

        spawn_endpoint_box(&mut commands, client_pos, "CLIENT", Color::srgb(0.23, 0.51, 0.96));
        spawn_endpoint_box(&mut commands, server_pos, "SERVER", Color::srgb(0.94, 0.27, 0.27));

        // The credential packet, label riding along as a child
        let masked = format!(
            "{}:{}",
            submitted.username,
            "*".repeat(submitted.password.chars().count())
        );
        commands
            .spawn((
                PacketTween {
                    from: client_pos,
                    to: server_pos,
                    timer: 0.0,
                    duration: 2.0,
                },
                Sprite {
                    color: COLOR_PACKET,
                    custom_size: Some(Vec2::new(30.0, 20.0)),
                    ..default()
                },
                Transform::from_translation(client_pos.extend(22.0)),
                TransmissionProp,
                LevelEntity,
            ))
            .with_children(|parent| {
                parent.spawn((
                    Text2d::new(masked),
                    TextFont {
                        font_size: 11.0,
                        ..default()
                    },
                    TextColor(COLOR_PACKET),
                    Transform::from_translation(Vec3::new(0.0, 26.0, 0.0)),
                ));
            });
    }
}

fn spawn_endpoint_box(commands: &mut Commands, position: Vec2, label: &str, color: Color) {
    commands.spawn((
        Sprite {
            color,
            custom_size: Some(Vec2::new(90.0, 52.0)),
            ..default()
        },
        Transform::from_translation(position.extend(20.0)),
        TransmissionProp,
        LevelEntity,
    ));
    commands.spawn((
        Text2d::new(label),
        TextFont {
            font_size: 12.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Transform::from_translation(position.extend(21.0)),
        TransmissionProp,
        LevelEntity,
    ));
}

/// Ease the packet across; hand over to token construction on arrival
pub fn advance_transmission(
    mut commands: Commands,
    time: Res<Time>,
    mut flow: ResMut<LoginFlow>,
    mut packet_query: Query<(&mut PacketTween, &mut Transform)>,
    props: Query<Entity, With<TransmissionProp>>,
) {
    if flow.stage != FlowStage::Transmitting {
        return;
    }

    let Ok((mut tween, mut transform)) = packet_query.get_single_mut() else {
        return;
    };

    tween.timer += time.delta_secs();
    let t = (tween.timer / tween.duration).min(1.0);
    // Smoothstep, close to the original Power2 ease
    let eased = t * t * (3.0 - 2.0 * t);
    let pos = tween.from.lerp(tween.to, eased);
    transform.translation.x = pos.x;
    transform.translation.y = pos.y;

    if t >= 1.0 {
        for entity in props.iter() {
            commands.entity(entity).despawn_recursive();
        }
        flow.stage = FlowStage::Constructing;
        flow.timer = 0.0;
        flow.parts_shown = 0;
    }
}

/// Server-side token construction, one part at a time
pub fn advance_construction(
    mut commands: Commands,
    time: Res<Time>,
    mut flow: ResMut<LoginFlow>,
    mut session: ResMut<Session>,
    mut portal_query: Query<&mut Sprite, With<Portal>>,
) {
    if flow.stage != FlowStage::Constructing {
        return;
    }

    flow.timer += time.delta_secs();

    while flow.parts_shown < 3 && flow.timer >= PART_TIMES[flow.parts_shown] {
        spawn_token_block(&mut commands, TokenPart::ALL[flow.parts_shown]);
        flow.parts_shown += 1;
    }

    if flow.parts_shown == 3 && flow.timer >= CONSTRUCTION_DONE {
        // The actual state change happens only here, at the end of the
        // walkthrough; the blocks above were scenery
        session.state.login(flow.username.clone(), AuthRole::User);
        session.state.complete_stage(1);
        flow.stage = FlowStage::Complete;

        if let Ok(mut sprite) = portal_query.get_single_mut() {
            sprite.color = COLOR_SUCCESS;
        }
    }
}

fn spawn_token_block(commands: &mut Commands, part: TokenPart) {
    let x = -90.0 + 90.0 * TokenPart::ALL.iter().position(|p| *p == part).unwrap_or(0) as f32;
    let position = Vec2::new(x, -120.0);

    commands
        .spawn((
            part,
            Sprite {
                color: part.color(),
                custom_size: Some(Vec2::new(56.0, 36.0)),
                ..default()
            },
            Transform::from_translation(position.extend(25.0)).with_scale(Vec3::ZERO),
            ScaleIn::new(0.5),
            LevelEntity,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text2d::new(part.letter()),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgb(0.10, 0.12, 0.18)),
                Transform::from_translation(Vec3::new(0.0, 0.0, 1.0)),
            ));
        });

    commands.spawn((
        Text2d::new(part.caption()),
        TextFont {
            font_size: 11.0,
            ..default()
        },
        TextColor(part.color()),
        TextLayout::new_with_justify(JustifyText::Center),
        Transform::from_translation(Vec3::new(position.x, position.y - 42.0, 25.0)),
        LevelEntity,
    ));
}

/// N advances to the resource hall once authentication is complete
pub fn gateway_next(
    keyboard: Res<ButtonInput<KeyCode>>,
    flow: Res<LoginFlow>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if flow.stage == FlowStage::Complete && keyboard.just_pressed(KeyCode::KeyN) {
        next_state.set(AppState::ResourceHall);
    }
}

// ============================================================================
// MESSAGES
// ============================================================================

/// Narrate the flow in the bottom message bar
pub fn update_gateway_messages(
    flow: Res<LoginFlow>,
    mut board: ResMut<MessageBoard>,
    player_query: Query<&Transform, With<Player>>,
    portal_query: Query<&Transform, With<Portal>>,
) {
    match flow.stage {
        FlowStage::Approach => {
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

            if near {
                board.set("Press SPACE to begin the authentication handshake", COLOR_SUCCESS);
            } else {
                board.set(
                    "Move with WASD or arrows. Approach the login portal to authenticate.",
                    COLOR_MUTED,
                );
            }
        }
        FlowStage::Form => {
            board.set("Enter your credentials in the login form", COLOR_ACCENT);
        }
        FlowStage::Transmitting => {
            board.set("Transmitting credentials to the server...", COLOR_PACKET);
        }
        FlowStage::Constructing => {
            board.set(
                "Server constructing the token: header, payload, signature...",
                TokenPart::Payload.color(),
            );
        }
        FlowStage::Complete => {
            board.set(
                "Authentication successful! Token received - press N for the Resource Hall.",
                COLOR_SUCCESS,
            );
        }
    }
}

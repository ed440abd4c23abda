//! Core 2D components shared by the three stages.

use bevy::prelude::*;
use token_quest::Role;

// ============================================================================
// MOVEMENT
// ============================================================================

/// 2D velocity for all moving entities
#[derive(Component, Default)]
pub struct Velocity(pub Vec2);

/// Movement speed in world units per second
#[derive(Component)]
pub struct MoveSpeed(pub f32);

impl Default for MoveSpeed {
    fn default() -> Self {
        Self(220.0)
    }
}

// ============================================================================
// PLAYER
// ============================================================================

/// Player marker component
#[derive(Component)]
pub struct Player;

// ============================================================================
// SCENE LIFETIME
// ============================================================================

/// Everything spawned for the current stage; despawned on exit
#[derive(Component)]
pub struct LevelEntity;

// ============================================================================
// PORTALS AND DOORS
// ============================================================================

/// Interactive portal kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub enum Portal {
    Login,
    Logout,
}

/// A gated resource door in the hall
#[derive(Component)]
pub struct Door {
    pub label: &'static str,
    pub required: Role,
    /// Resting x position the animations return to
    pub home_x: f32,
}

/// Door slides open briefly after a granted attempt
#[derive(Component)]
pub struct DoorSlide {
    pub timer: f32,
}

/// Door rattles after a denied attempt
#[derive(Component)]
pub struct DoorShake {
    pub timer: f32,
}

// ============================================================================
// TOKEN VISUALS
// ============================================================================

/// The three parts of the simulated token, as shown in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub enum TokenPart {
    Header,
    Payload,
    Signature,
}

impl TokenPart {
    pub const ALL: [TokenPart; 3] = [TokenPart::Header, TokenPart::Payload, TokenPart::Signature];

    /// Single-letter block face
    pub fn letter(self) -> &'static str {
        match self {
            TokenPart::Header => "H",
            TokenPart::Payload => "P",
            TokenPart::Signature => "S",
        }
    }

    /// Caption shown under the block during construction
    pub fn caption(self) -> &'static str {
        match self {
            TokenPart::Header => "Header\n(Algorithm)",
            TokenPart::Payload => "Payload\n(Claims)",
            TokenPart::Signature => "Signature\n(Verification)",
        }
    }

    /// Part color, same hues as the details panel
    pub fn color(self) -> Color {
        match self {
            TokenPart::Header => Color::srgb(0.75, 0.52, 0.99),
            TokenPart::Payload => Color::srgb(0.38, 0.65, 0.98),
            TokenPart::Signature => Color::srgb(0.29, 0.87, 0.50),
        }
    }
}

// ============================================================================
// EFFECTS
// ============================================================================

/// Sprite alpha oscillates between `min_alpha` and 1
#[derive(Component)]
pub struct Pulse {
    pub speed: f32,
    pub min_alpha: f32,
    pub phase: f32,
}

impl Default for Pulse {
    fn default() -> Self {
        Self {
            speed: 2.4,
            min_alpha: 0.55,
            phase: 0.0,
        }
    }
}

/// Scale-in tween with a slight overshoot
#[derive(Component)]
pub struct ScaleIn {
    pub timer: f32,
    pub duration: f32,
}

impl ScaleIn {
    pub fn new(duration: f32) -> Self {
        Self {
            timer: 0.0,
            duration,
        }
    }
}

/// Burst particle
#[derive(Component)]
pub struct Particle {
    pub velocity: Vec2,
    pub lifetime: f32,
}

/// Feedback text that rises and fades out
#[derive(Component)]
pub struct FloatingText {
    pub velocity: Vec2,
    pub lifetime: f32,
}

// ============================================================================
// CREDENTIAL TRANSMISSION (gateway stage)
// ============================================================================

/// Credential packet tweening from the client box to the server box
#[derive(Component)]
pub struct PacketTween {
    pub from: Vec2,
    pub to: Vec2,
    pub timer: f32,
    pub duration: f32,
}

/// Client/server boxes and labels cleared when transmission finishes
#[derive(Component)]
pub struct TransmissionProp;

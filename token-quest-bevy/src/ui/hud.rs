//! HUD overlays shared by the three stages.
//!
//! Message bar, token details panel, session info panel, and the hall's
//! role switcher. Panels poll a fresh snapshot every frame; nothing here
//! caches session data across frames.

use bevy::prelude::*;
use token_quest::{AuthRole, STAGE_COUNT};

use crate::game::{
    components::TokenPart, MessageBoard, Session, COLOR_ACCENT, COLOR_DANGER, COLOR_MUTED,
    COLOR_SUCCESS, COLOR_TEXT, COLOR_WARN,
};

/// Marker for HUD UI
#[derive(Component)]
pub struct HudUI;

/// Marker for the message bar text
#[derive(Component)]
pub struct MessageText;

/// Root of the token details panel (hidden without a token)
#[derive(Component)]
pub struct TokenPanel;

/// Rows of the token details panel
#[derive(Component)]
pub enum TokenPanelText {
    Part(TokenPart),
    Status,
    Role,
    Sample,
    Claims,
}

/// Rows of the session info panel
#[derive(Component)]
pub enum SessionPanelText {
    Auth,
    Token,
    Role,
    Progress,
}

/// Role switcher buttons in the resource hall
#[derive(Component, Clone, Copy)]
pub enum RoleButton {
    Guest,
    User,
    Admin,
}

impl RoleButton {
    fn base_color(self) -> Color {
        match self {
            RoleButton::Guest => Color::srgb(0.42, 0.45, 0.50),
            RoleButton::User => COLOR_WARN,
            RoleButton::Admin => COLOR_DANGER,
        }
    }

    fn label(self) -> &'static str {
        match self {
            RoleButton::Guest => "GUEST",
            RoleButton::User => "USER",
            RoleButton::Admin => "ADMIN",
        }
    }
}

// ============================================================================
// SETUP
// ============================================================================

/// Build the message bar and the two status panels
pub fn setup_hud(mut commands: Commands) {
    // Bottom message bar
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Px(54.0),
                position_type: PositionType::Absolute,
                bottom: Val::Px(0.0),
                left: Val::Px(0.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
            HudUI,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(COLOR_MUTED),
                MessageText,
            ));
        });

    // Token details panel (top right)
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(12.0),
                right: Val::Px(12.0),
                width: Val::Px(250.0),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(12.0)),
                row_gap: Val::Px(3.0),
                border: UiRect::all(Val::Px(1.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.07, 0.09, 0.14, 0.92)),
            BorderColor(Color::srgb(0.22, 0.26, 0.36)),
            Visibility::Hidden,
            TokenPanel,
            HudUI,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Token Details"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(COLOR_ACCENT),
            ));

            for part in TokenPart::ALL {
                parent.spawn((
                    Text::new(""),
                    TextFont {
                        font_size: 13.0,
                        ..default()
                    },
                    TextColor(part.color()),
                    TokenPanelText::Part(part),
                ));
            }

            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(COLOR_TEXT),
                TokenPanelText::Status,
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(COLOR_TEXT),
                TokenPanelText::Role,
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 11.0,
                    ..default()
                },
                TextColor(COLOR_MUTED),
                TokenPanelText::Sample,
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 10.0,
                    ..default()
                },
                TextColor(COLOR_MUTED),
                TokenPanelText::Claims,
            ));
        });

    // Session info panel (top left)
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(12.0),
                left: Val::Px(12.0),
                width: Val::Px(215.0),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(12.0)),
                row_gap: Val::Px(3.0),
                border: UiRect::all(Val::Px(1.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.07, 0.09, 0.14, 0.92)),
            BorderColor(Color::srgb(0.22, 0.26, 0.36)),
            HudUI,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Session Info"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(COLOR_ACCENT),
            ));

            for row in [
                SessionPanelText::Auth,
                SessionPanelText::Token,
                SessionPanelText::Role,
                SessionPanelText::Progress,
            ] {
                parent.spawn((
                    Text::new(""),
                    TextFont {
                        font_size: 12.0,
                        ..default()
                    },
                    TextColor(COLOR_TEXT),
                    row,
                ));
            }
        });
}

/// Cleanup HUD
pub fn cleanup_hud(mut commands: Commands, query: Query<Entity, With<HudUI>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

// ============================================================================
// UPDATES
// ============================================================================

/// Mirror the message board into the bar
pub fn update_message_bar(
    board: Res<MessageBoard>,
    mut query: Query<(&mut Text, &mut TextColor), With<MessageText>>,
) {
    let Ok((mut text, mut color)) = query.get_single_mut() else {
        return;
    };
    **text = board.text.clone();
    color.0 = board.color;
}

/// Refresh the token details panel from a fresh snapshot
pub fn update_token_panel(
    session: Res<Session>,
    mut panel_query: Query<&mut Visibility, With<TokenPanel>>,
    mut text_query: Query<(&TokenPanelText, &mut Text, &mut TextColor)>,
) {
    let snapshot = session.snapshot();

    let Ok(mut visibility) = panel_query.get_single_mut() else {
        return;
    };

    let Some(token) = snapshot.token.as_ref() else {
        *visibility = Visibility::Hidden;
        return;
    };
    *visibility = Visibility::Visible;

    for (row, mut text, mut color) in text_query.iter_mut() {
        match row {
            TokenPanelText::Part(part) => {
                let present = match part {
                    TokenPart::Header => token.header_present,
                    TokenPart::Payload => token.payload_present,
                    TokenPart::Signature => token.signature_present,
                };
                let mark = if present { "+" } else { "x" };
                **text = format!("[{mark}] {}", match part {
                    TokenPart::Header => "Header",
                    TokenPart::Payload => "Payload",
                    TokenPart::Signature => "Signature",
                });
            }
            TokenPanelText::Status => {
                if token.is_complete() {
                    **text = "Status: Valid".to_string();
                    color.0 = COLOR_SUCCESS;
                } else {
                    **text = "Status: Incomplete".to_string();
                    color.0 = COLOR_DANGER;
                }
            }
            TokenPanelText::Role => {
                **text = format!("Role: {}", snapshot.role);
            }
            TokenPanelText::Sample => {
                **text = format!("Sample: {}", token.compact_preview());
            }
            TokenPanelText::Claims => {
                **text = serde_json::to_string_pretty(&token.claims)
                    .unwrap_or_else(|_| "{}".to_string());
            }
        }
    }
}

/// Refresh the session info panel from a fresh snapshot
pub fn update_session_panel(
    session: Res<Session>,
    mut text_query: Query<(&SessionPanelText, &mut Text, &mut TextColor)>,
) {
    let snapshot = session.snapshot();

    for (row, mut text, mut color) in text_query.iter_mut() {
        match row {
            SessionPanelText::Auth => {
                if snapshot.is_authenticated {
                    **text = "[+] Authenticated".to_string();
                    color.0 = COLOR_SUCCESS;
                } else {
                    **text = "[x] Not authenticated".to_string();
                    color.0 = COLOR_DANGER;
                }
            }
            SessionPanelText::Token => {
                if snapshot.has_valid_token() {
                    **text = "[+] Token present".to_string();
                    color.0 = COLOR_SUCCESS;
                } else {
                    **text = "[x] No token".to_string();
                    color.0 = COLOR_DANGER;
                }
            }
            SessionPanelText::Role => {
                **text = format!("Role: {}", snapshot.role.as_str().to_uppercase());
                color.0 = COLOR_TEXT;
            }
            SessionPanelText::Progress => {
                **text = format!("Completed: {}/{}", snapshot.completed_count(), STAGE_COUNT);
                color.0 = COLOR_TEXT;
            }
        }
    }
}

// ============================================================================
// ROLE SWITCHER (resource hall only)
// ============================================================================

/// Buttons for experimenting with roles, as the original hall offered
pub fn setup_role_switcher(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                bottom: Val::Px(62.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                row_gap: Val::Px(6.0),
                ..default()
            },
            HudUI,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Switch role (for experimenting):"),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(COLOR_MUTED),
            ));

            parent
                .spawn(Node {
                    flex_direction: FlexDirection::Row,
                    column_gap: Val::Px(12.0),
                    ..default()
                })
                .with_children(|row| {
                    for choice in [RoleButton::Guest, RoleButton::User, RoleButton::Admin] {
                        row.spawn((
                            Button,
                            Node {
                                width: Val::Px(92.0),
                                height: Val::Px(32.0),
                                justify_content: JustifyContent::Center,
                                align_items: AlignItems::Center,
                                ..default()
                            },
                            BackgroundColor(choice.base_color()),
                            choice,
                        ))
                        .with_children(|button| {
                            button.spawn((
                                Text::new(choice.label()),
                                TextFont {
                                    font_size: 13.0,
                                    ..default()
                                },
                                TextColor(Color::WHITE),
                            ));
                        });
                    }
                });
        });
}

/// Apply role switches through the core mutators
pub fn handle_role_buttons(
    mut interaction_query: Query<
        (&Interaction, &RoleButton, &mut BackgroundColor),
        Changed<Interaction>,
    >,
    mut session: ResMut<Session>,
) {
    for (interaction, button, mut bg_color) in interaction_query.iter_mut() {
        match *interaction {
            Interaction::Pressed => {
                match button {
                    RoleButton::Guest => session.state.logout(),
                    RoleButton::User => relogin(&mut session, AuthRole::User),
                    RoleButton::Admin => relogin(&mut session, AuthRole::Admin),
                }
                *bg_color = BackgroundColor(button.base_color().with_alpha(0.8));
            }
            Interaction::Hovered => {
                *bg_color = BackgroundColor(button.base_color().with_alpha(0.9));
            }
            Interaction::None => {
                *bg_color = BackgroundColor(button.base_color());
            }
        }
    }
}

/// Keep the subject across role switches when a token already exists
fn relogin(session: &mut Session, role: AuthRole) {
    let sub = session
        .snapshot()
        .token
        .map(|token| token.claims.sub)
        .unwrap_or_else(|| "demo".to_string());
    session.state.login(sub, role);
}

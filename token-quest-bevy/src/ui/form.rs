//! The login form overlay.
//!
//! Opens while the gateway flow is in its form step, captures keyboard
//! text for the two fields, and hands the credentials to the game on
//! ENTER. Any non-blank username/password pair is accepted; this is a
//! classroom, not a directory service.

use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::prelude::*;

use crate::game::login::{CredentialsSubmitted, FlowStage, LoginFlow};
use crate::game::{COLOR_ACCENT, COLOR_MUTED, COLOR_TEXT};

/// Longest accepted field value
const FIELD_LIMIT: usize = 24;

/// Keyboard-captured credentials while the overlay is open
#[derive(Resource, Default)]
pub struct FormInput {
    pub username: String,
    pub password: String,
    pub focus: FormField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Username,
    Password,
}

impl FormInput {
    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Username => &mut self.username,
            FormField::Password => &mut self.password,
        }
    }
}

/// Marker for the overlay root
#[derive(Component)]
pub struct LoginFormUI;

/// Marker for the username value text
#[derive(Component)]
pub struct UsernameText;

/// Marker for the password value text
#[derive(Component)]
pub struct PasswordText;

// ============================================================================
// OVERLAY LIFECYCLE
// ============================================================================

/// Spawn the overlay when the flow enters its form step, remove it when
/// the flow moves on
pub fn sync_form_overlay(
    mut commands: Commands,
    flow: Res<LoginFlow>,
    mut input: ResMut<FormInput>,
    existing: Query<Entity, With<LoginFormUI>>,
) {
    let open = flow.stage == FlowStage::Form;

    if open && existing.is_empty() {
        *input = FormInput::default();
        spawn_form(&mut commands);
    }

    if !open {
        for entity in existing.iter() {
            commands.entity(entity).despawn_recursive();
        }
    }
}

fn spawn_form(commands: &mut Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.55)),
            GlobalZIndex(10),
            LoginFormUI,
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    Node {
                        width: Val::Px(380.0),
                        flex_direction: FlexDirection::Column,
                        padding: UiRect::all(Val::Px(22.0)),
                        border: UiRect::all(Val::Px(2.0)),
                        row_gap: Val::Px(6.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.08, 0.09, 0.14)),
                    BorderColor(COLOR_ACCENT),
                ))
                .with_children(|card| {
                    card.spawn((
                        Text::new("Authentication Portal"),
                        TextFont {
                            font_size: 22.0,
                            ..default()
                        },
                        TextColor(COLOR_ACCENT),
                        Node {
                            margin: UiRect::bottom(Val::Px(10.0)),
                            ..default()
                        },
                    ));

                    card.spawn((
                        Text::new("Username"),
                        TextFont {
                            font_size: 13.0,
                            ..default()
                        },
                        TextColor(COLOR_MUTED),
                    ));
                    spawn_field(card, UsernameText);

                    card.spawn((
                        Text::new("Password"),
                        TextFont {
                            font_size: 13.0,
                            ..default()
                        },
                        TextColor(COLOR_MUTED),
                    ));
                    spawn_field(card, PasswordText);

                    card.spawn((
                        Text::new("TAB switches fields | ENTER submits | ESC cancels"),
                        TextFont {
                            font_size: 11.0,
                            ..default()
                        },
                        TextColor(COLOR_MUTED),
                        Node {
                            margin: UiRect::top(Val::Px(12.0)),
                            ..default()
                        },
                    ));
                    card.spawn((
                        Text::new("Demo credentials: any username and password work"),
                        TextFont {
                            font_size: 11.0,
                            ..default()
                        },
                        TextColor(COLOR_MUTED),
                    ));
                });
        });
}

fn spawn_field(card: &mut ChildBuilder, marker: impl Component) {
    card.spawn((
        Node {
            width: Val::Percent(100.0),
            height: Val::Px(32.0),
            align_items: AlignItems::Center,
            padding: UiRect::horizontal(Val::Px(8.0)),
            border: UiRect::all(Val::Px(1.0)),
            margin: UiRect::bottom(Val::Px(8.0)),
            ..default()
        },
        BackgroundColor(Color::srgb(0.05, 0.06, 0.09)),
        BorderColor(Color::srgb(0.25, 0.29, 0.40)),
    ))
    .with_children(|field| {
        field.spawn((
            Text::new(""),
            TextFont {
                font_size: 15.0,
                ..default()
            },
            TextColor(COLOR_TEXT),
            marker,
        ));
    });
}

// ============================================================================
// INPUT
// ============================================================================

/// Append typed characters to the focused field
pub fn capture_text(
    mut events: EventReader<KeyboardInput>,
    flow: Res<LoginFlow>,
    mut input: ResMut<FormInput>,
) {
    if flow.stage != FlowStage::Form {
        events.clear();
        return;
    }

    for event in events.read() {
        if !event.state.is_pressed() {
            continue;
        }

        match &event.logical_key {
            Key::Character(typed) => {
                for ch in typed.chars() {
                    let field = input.focused_mut();
                    if !ch.is_control() && field.chars().count() < FIELD_LIMIT {
                        field.push(ch);
                    }
                }
            }
            Key::Backspace => {
                input.focused_mut().pop();
            }
            Key::Tab => {
                input.focus = match input.focus {
                    FormField::Username => FormField::Password,
                    FormField::Password => FormField::Username,
                };
            }
            _ => {}
        }
    }
}

/// ENTER submits non-blank credentials, ESC cancels back to the portal
pub fn submit_or_cancel(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut flow: ResMut<LoginFlow>,
    input: Res<FormInput>,
    mut writer: EventWriter<CredentialsSubmitted>,
) {
    if flow.stage != FlowStage::Form {
        return;
    }

    if keyboard.just_pressed(KeyCode::Escape) {
        flow.stage = FlowStage::Approach;
        return;
    }

    if keyboard.just_pressed(KeyCode::Enter) {
        let username = input.username.trim();
        let password = input.password.trim();

        // Blank fields never submit; the gate is the lesson, not the
        // password strength
        if username.is_empty() || password.is_empty() {
            return;
        }

        writer.send(CredentialsSubmitted {
            username: username.to_string(),
            password: password.to_string(),
        });
    }
}

/// Render field values, cursor on the focused one, password masked
pub fn update_form_display(
    input: Res<FormInput>,
    mut username_query: Query<&mut Text, (With<UsernameText>, Without<PasswordText>)>,
    mut password_query: Query<&mut Text, (With<PasswordText>, Without<UsernameText>)>,
) {
    if let Ok(mut text) = username_query.get_single_mut() {
        let cursor = if input.focus == FormField::Username {
            "_"
        } else {
            ""
        };
        **text = format!("{}{}", input.username, cursor);
    }

    if let Ok(mut text) = password_query.get_single_mut() {
        let cursor = if input.focus == FormField::Password {
            "_"
        } else {
            ""
        };
        **text = format!("{}{}", "*".repeat(input.password.chars().count()), cursor);
    }
}

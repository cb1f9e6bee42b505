//! UI module - HUD, start prompt and game over banner
//!
//! Texts come from the simulation's display; this module only draws them.

use bevy::prelude::*;

use skyflap::game::display::MessageStyle;
use skyflap::game::state::Tint;

use crate::game::SimScene;
use crate::Phase;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app
            .add_systems(Startup, setup_hud)
            .add_systems(OnEnter(Phase::GameOver), setup_game_over)
            .add_systems(OnExit(Phase::GameOver), cleanup_game_over)
            .add_systems(Update, update_hud);
    }
}

/// Marker for score text
#[derive(Component)]
struct ScoreText;

/// Marker for the prompt container
#[derive(Component)]
struct PromptUI;

/// Marker for the prompt text
#[derive(Component)]
struct PromptText;

/// Marker for game over UI
#[derive(Component)]
struct GameOverUI;

fn color_of(tint: Tint) -> Color {
    let (r, g, b) = tint.rgb();
    Color::srgb_u8(r, g, b)
}

/// Setup score counter and start prompt
fn setup_hud(mut commands: Commands, scene: Res<SimScene>) {
    let display = scene.0.run().display();

    // Score (top left)
    commands.spawn((
        Text::new(display.score.clone()),
        TextFont {
            font_size: 32.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(20.0),
            left: Val::Px(20.0),
            ..default()
        },
        ScoreText,
    ));

    // Prompt (bottom centre)
    let style = MessageStyle::prompt();
    commands.spawn((
        Node {
            width: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            bottom: Val::Px(50.0),
            justify_content: JustifyContent::Center,
            ..default()
        },
        Visibility::Inherited,
        PromptUI,
    )).with_children(|parent| {
        parent.spawn((
            Text::new(display.message_text().unwrap_or_default()),
            TextFont {
                font_size: style.font_size as f32,
                ..default()
            },
            TextColor(color_of(style.color)),
            BackgroundColor(style.background.map(color_of).unwrap_or(Color::NONE)),
            PromptText,
        ));
    });
}

/// Redraw texts when the display changed
fn update_hud(
    scene: Res<SimScene>,
    mut seen_revision: Local<Option<u64>>,
    mut score_text: Query<&mut Text, (With<ScoreText>, Without<PromptText>)>,
    mut prompt_text: Query<(&mut Text, &mut TextFont, &mut TextColor, &mut BackgroundColor), (With<PromptText>, Without<ScoreText>)>,
    mut prompt_ui: Query<&mut Visibility, With<PromptUI>>,
) {
    let display = scene.0.run().display();
    if *seen_revision == Some(display.revision) {
        return;
    }
    *seen_revision = Some(display.revision);

    if let Ok(mut text) = score_text.get_single_mut() {
        **text = display.score.clone();
    }

    if let Ok(mut visibility) = prompt_ui.get_single_mut() {
        *visibility = if display.message.is_some() {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }

    if let (Some((message, style)), Ok((mut text, mut font, mut color, mut background))) =
        (&display.message, prompt_text.get_single_mut())
    {
        **text = message.clone();
        font.font_size = style.font_size as f32;
        *color = TextColor(color_of(style.color));
        *background = BackgroundColor(style.background.map(color_of).unwrap_or(Color::NONE));
    }
}

/// Show the end-of-run banner
fn setup_game_over(mut commands: Commands, scene: Res<SimScene>) {
    let Some(message) = scene.0.run().display().game_over.clone() else {
        return;
    };

    let style = MessageStyle::banner();
    commands.spawn((
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        GameOverUI,
    )).with_children(|parent| {
        parent.spawn((
            Text::new(message),
            TextFont {
                font_size: style.font_size as f32,
                ..default()
            },
            TextColor(color_of(style.color)),
            TextLayout::new_with_justify(JustifyText::Center),
            BackgroundColor(style.background.map(color_of).unwrap_or(Color::NONE)),
        ));
    });
}

fn cleanup_game_over(
    mut commands: Commands,
    query: Query<Entity, With<GameOverUI>>,
) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

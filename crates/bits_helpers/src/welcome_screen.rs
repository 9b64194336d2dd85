use bevy::prelude::*;

use crate::FONT;

#[derive(Component)]
pub struct WelcomeScreenElement;

/// Full screen overlay with a title, an instruction line and a start prompt.
pub fn spawn_welcome_screen(
    commands: &mut Commands,
    asset_server: &AssetServer,
    title: &str,
    instructions: &str,
) {
    let font = asset_server.load(FONT);

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::SpaceEvenly,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                ..default()
            },
            BackgroundColor(Color::BLACK.with_alpha(0.85)),
            WelcomeScreenElement,
        ))
        .with_children(|parent| {
            for (text, size) in [(title, 48.0), (instructions, 22.0), ("Tap to start", 30.0)] {
                parent.spawn((
                    Text::new(text),
                    TextFont {
                        font: font.clone(),
                        font_size: size,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                    TextLayout::new_with_justify(JustifyText::Center),
                ));
            }
        });
}

pub fn despawn_welcome_screen(
    mut commands: Commands,
    welcome_elements: Query<Entity, With<WelcomeScreenElement>>,
) {
    for entity in &welcome_elements {
        commands.entity(entity).despawn_recursive();
    }
}

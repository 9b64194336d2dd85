use core::time::Duration;

use bevy::prelude::*;

use crate::FONT;

const RISE: f32 = 50.0;

/// World-space text that drifts up and fades out, then despawns.
#[derive(Component)]
pub struct FloatingScore {
    timer: Timer,
    origin: Vec3,
    color: Color,
}

pub fn spawn_floating_score(
    commands: &mut Commands,
    position: Vec3,
    text: &str,
    color: Color,
    asset_server: &AssetServer,
) {
    commands.spawn((
        Text2d::new(text),
        TextFont {
            font: asset_server.load(FONT),
            font_size: 24.0,
            ..default()
        },
        TextColor(color),
        Transform::from_translation(position),
        FloatingScore {
            timer: Timer::new(Duration::from_secs(1), TimerMode::Once),
            origin: position,
            color,
        },
    ));
}

pub fn animate_floating_scores(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Transform, &mut TextColor, &mut FloatingScore)>,
) {
    for (entity, mut transform, mut text_color, mut floating_score) in &mut query {
        floating_score.timer.tick(time.delta());
        let progress = floating_score.timer.fraction();

        transform.translation.y = RISE.mul_add(progress, floating_score.origin.y);
        text_color.0 = floating_score.color.with_alpha(1.0 - progress);

        if floating_score.timer.finished() {
            commands.entity(entity).despawn();
        }
    }
}

pub struct FloatingScorePlugin;

impl Plugin for FloatingScorePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, animate_floating_scores);
    }
}

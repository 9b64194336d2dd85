use bevy::prelude::*;
use bits_helpers::FONT;
use bits_helpers::floating_score::{FloatingScorePlugin, spawn_floating_score};
use bits_helpers::input::pointer_just_pressed;
use bits_helpers::restart::{CleanupMarker, handle_restart, spawn_restart_button};
use bits_helpers::welcome_screen::{despawn_welcome_screen, spawn_welcome_screen};

use crate::config::{FONT_SIZE_LARGE, FONT_SIZE_MEDIUM, PuzzleConfig, layers};
use crate::game::VehiclePlaced;
use crate::model::GameState;
use crate::session::{Session, SessionSnapshot, SessionStatus};

const STAR_ON: Color = Color::srgb(1.0, 0.84, 0.0);
const STAR_OFF: Color = Color::srgb(0.25, 0.25, 0.25);
const STAR_SIZE: f32 = 48.0;
const MAX_STARS: u8 = 3;

#[derive(Component)]
struct ScoreText;

#[derive(Component)]
struct ClockText;

#[derive(Component)]
struct ProgressText;

pub struct ScreenPlugin;

impl Plugin for ScreenPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(FloatingScorePlugin)
            .add_systems(OnEnter(GameState::Welcome), show_welcome)
            .add_systems(OnExit(GameState::Welcome), despawn_welcome_screen)
            .add_systems(OnEnter(GameState::Playing), spawn_hud)
            .add_systems(OnEnter(GameState::Won), spawn_result_panel)
            .add_systems(OnEnter(GameState::Lost), spawn_result_panel)
            .add_systems(
                Update,
                (
                    start_on_tap
                        .run_if(in_state(GameState::Welcome))
                        .run_if(resource_exists::<Session>),
                    update_hud.run_if(in_state(GameState::Playing)),
                    spawn_score_popups,
                    handle_restart::<Session>
                        .run_if(in_state(GameState::Won).or(in_state(GameState::Lost))),
                ),
            );
    }
}

fn show_welcome(mut commands: Commands, asset_server: Res<AssetServer>) {
    spawn_welcome_screen(
        &mut commands,
        &asset_server,
        "Vehicle Parking",
        "Drag every vehicle onto its spot.\nZ / X rotate, arrow keys resize.\nKeep away from the planes!",
    );
}

fn start_on_tap(
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if pointer_just_pressed(&buttons, &touches) {
        next_state.set(GameState::Playing);
    }
}

fn hud_text(font: &Handle<Font>, size: f32) -> (TextFont, TextColor) {
    (
        TextFont {
            font: font.clone(),
            font_size: size,
            ..default()
        },
        TextColor(Color::WHITE),
    )
}

fn spawn_hud(mut commands: Commands, asset_server: Res<AssetServer>) {
    let font = asset_server.load(FONT);

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                top: Val::Px(8.0),
                justify_content: JustifyContent::SpaceAround,
                ..default()
            },
            CleanupMarker,
        ))
        .with_children(|parent| {
            parent.spawn((Text::new("Score: 0"), hud_text(&font, FONT_SIZE_MEDIUM), ScoreText));
            parent.spawn((Text::new("0 / 0"), hud_text(&font, FONT_SIZE_MEDIUM), ProgressText));
            parent.spawn((Text::new("0.0s"), hud_text(&font, FONT_SIZE_MEDIUM), ClockText));
        });
}

fn update_hud(
    session: Res<Session>,
    mut score: Query<&mut Text, (With<ScoreText>, Without<ClockText>, Without<ProgressText>)>,
    mut clock: Query<&mut Text, (With<ClockText>, Without<ScoreText>, Without<ProgressText>)>,
    mut progress: Query<&mut Text, (With<ProgressText>, Without<ScoreText>, Without<ClockText>)>,
) {
    let snapshot = session.snapshot();
    if let Ok(mut text) = score.get_single_mut() {
        text.0 = format!("Score: {}", snapshot.score);
    }
    if let Ok(mut text) = clock.get_single_mut() {
        text.0 = format!("{:.1}s", snapshot.elapsed);
    }
    if let Ok(mut text) = progress.get_single_mut() {
        text.0 = format!("{} / {}", snapshot.placed, snapshot.total);
    }
}

fn spawn_score_popups(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<PuzzleConfig>,
    mut placed: EventReader<VehiclePlaced>,
) {
    for event in placed.read() {
        spawn_floating_score(
            &mut commands,
            event.position.extend(layers::POPUP),
            &format!("+{}", config.points_per_placement),
            STAR_ON,
            &asset_server,
        );
    }
}

/// Headline of the result panel.
pub fn result_message(snapshot: &SessionSnapshot) -> &'static str {
    match snapshot.status {
        SessionStatus::Won => "All parked!",
        SessionStatus::Lost => "Crashed!",
        SessionStatus::Active => "Time's up!",
    }
}

fn spawn_result_panel(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    session: Res<Session>,
) {
    let snapshot = session.snapshot();
    let font = asset_server.load(FONT);

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(16.0),
                ..default()
            },
            BackgroundColor(Color::BLACK.with_alpha(0.7)),
            CleanupMarker,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(result_message(&snapshot)),
                hud_text(&font, FONT_SIZE_LARGE),
            ));
            parent.spawn((
                Text::new(format!(
                    "Score {}  ·  {} / {} parked  ·  {:.1}s",
                    snapshot.score, snapshot.placed, snapshot.total, snapshot.elapsed
                )),
                hud_text(&font, FONT_SIZE_MEDIUM),
            ));
            parent
                .spawn(Node {
                    column_gap: Val::Px(12.0),
                    ..default()
                })
                .with_children(|stars| {
                    for index in 0..MAX_STARS {
                        let color = if index < snapshot.stars { STAR_ON } else { STAR_OFF };
                        stars.spawn((
                            Node {
                                width: Val::Px(STAR_SIZE),
                                height: Val::Px(STAR_SIZE),
                                ..default()
                            },
                            BackgroundColor(color),
                        ));
                    }
                });
            spawn_restart_button(parent, &asset_server, "Play again");
        });
}

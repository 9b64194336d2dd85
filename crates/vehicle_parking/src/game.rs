use bevy::prelude::*;
use bits_helpers::restart::{Restartable, cleanup_marked_entities};
use bits_helpers::send_bit_message;
use ribbit_bits::{BitMessage, BitResult};

use crate::animation::AnimationPlugin;
use crate::assignment::OriginRegistry;
use crate::audio::PlaySfx;
use crate::config::PuzzleConfig;
use crate::error::PuzzleError;
use crate::input::PointerRoutingPlugin;
use crate::level::LevelLayout;
use crate::model::GameState;
use crate::obstacles::ObstaclesPlugin;
use crate::session::{Session, SessionStatus};
use crate::tags::{TagTable, VehicleTag};
use crate::vehicles::VehiclesPlugin;

/// A vehicle locked into its slot this frame.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct VehiclePlaced {
    pub entity: Entity,
    pub tag: VehicleTag,
    pub position: Vec2,
}

/// A dragged vehicle flew into an obstacle this frame.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleDestroyed {
    pub entity: Entity,
}

/// Frame order while playing.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayingSet {
    Clock,
    Pointer,
    Transform,
    Obstacles,
    Bookkeeping,
    FollowUp,
}

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .init_resource::<PuzzleConfig>()
            .init_resource::<LevelLayout>()
            .init_resource::<OriginRegistry>()
            .add_event::<VehiclePlaced>()
            .add_event::<VehicleDestroyed>()
            .add_event::<PlaySfx>()
            .configure_sets(
                Update,
                (
                    PlayingSet::Clock,
                    PlayingSet::Pointer,
                    PlayingSet::Transform,
                    PlayingSet::Obstacles,
                    PlayingSet::Bookkeeping,
                    PlayingSet::FollowUp,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            .add_plugins((
                AnimationPlugin,
                VehiclesPlugin,
                PointerRoutingPlugin,
                ObstaclesPlugin,
            ))
            .add_systems(Startup, (spawn_camera, configure_puzzle))
            .add_systems(OnEnter(GameState::Welcome), cleanup_marked_entities)
            .add_systems(OnEnter(GameState::Playing), start_session)
            .add_systems(
                Update,
                (
                    tick_session.in_set(PlayingSet::Clock),
                    record_outcomes.in_set(PlayingSet::Bookkeeping),
                    follow_session_status.in_set(PlayingSet::FollowUp),
                ),
            );
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Checks the tunables and the level, then builds the tag table and the session.
pub fn build_session(
    config: &PuzzleConfig,
    layout: &LevelLayout,
) -> Result<(TagTable, Session), PuzzleError> {
    config.validate()?;
    layout.validate()?;

    let tags = TagTable::from_roster(&layout.roster())?;
    let session = Session::new(layout.playable_vehicles())?
        .with_scoring(config.points_per_placement, config.stars);
    Ok((tags, session))
}

/// Without a session the welcome screen never lets the player start.
fn configure_puzzle(
    mut commands: Commands,
    config: Res<PuzzleConfig>,
    layout: Res<LevelLayout>,
) {
    match build_session(&config, &layout) {
        Ok((tags, session)) => {
            info!(
                "Puzzle ready: {} vehicles, {} slots",
                session.total(),
                layout.slots.len()
            );
            commands.insert_resource(tags);
            commands.insert_resource(session);
        }
        Err(err) => error!("{err}"),
    }
}

fn start_session(mut session: ResMut<Session>) {
    session.reset();
}

fn tick_session(time: Res<Time>, mut session: ResMut<Session>) {
    session.tick(time.delta_secs());
}

fn record_outcomes(
    mut session: ResMut<Session>,
    mut placed: EventReader<VehiclePlaced>,
    mut destroyed: EventReader<VehicleDestroyed>,
) {
    for event in placed.read() {
        let status = session.on_placed();
        debug!("{} parked, session {status:?}", event.tag);
    }
    for _ in destroyed.read() {
        let status = session.on_destroyed();
        debug!("Vehicle destroyed, session {status:?}");
    }
}

fn follow_session_status(session: Res<Session>, mut next_state: ResMut<NextState<GameState>>) {
    let snapshot = session.snapshot();
    match snapshot.status {
        SessionStatus::Active => {}
        SessionStatus::Won => {
            info!(
                "All {} vehicles parked in {:.1}s, {} stars",
                snapshot.total, snapshot.elapsed, snapshot.stars
            );
            send_bit_message(BitMessage::End(BitResult::HighestScore(
                u32::try_from(snapshot.score).unwrap_or_default().into(),
            )));
            next_state.set(GameState::Won);
        }
        SessionStatus::Lost => {
            info!("Vehicle destroyed after {} placements", snapshot.placed);
            send_bit_message(BitMessage::End(BitResult::Failure));
            next_state.set(GameState::Lost);
        }
    }
}

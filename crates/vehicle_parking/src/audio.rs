use bevy::prelude::*;
use bevy_asset_loader::prelude::*;
use bevy_kira_audio::prelude::*;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Default, States)]
enum AssetState {
    #[default]
    Loading,
    Loaded,
}

/// A sound the game asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sfx {
    Click,
    Wrong,
    /// Placement jingle of a vehicle, by tag sound index
    Vehicle(usize),
    ObstacleHit,
    Explosion,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaySfx(pub Sfx);

#[derive(AssetCollection, Resource)]
struct SfxAssets {
    #[asset(path = "audio/click.ogg")]
    click: Handle<bevy_kira_audio::prelude::AudioSource>,
    #[asset(path = "audio/wrong.ogg")]
    wrong: Handle<bevy_kira_audio::prelude::AudioSource>,
    #[asset(
        paths(
            "audio/vehicle_garbage.ogg",
            "audio/vehicle_ambulance.ogg",
            "audio/vehicle_fire.ogg",
            "audio/vehicle_bus.ogg",
            "audio/vehicle_e46.ogg",
            "audio/vehicle_e61.ogg",
            "audio/vehicle_b2.ogg",
            "audio/vehicle_cement.ogg",
            "audio/vehicle_excavator.ogg",
            "audio/vehicle_police.ogg",
            "audio/vehicle_tractor.ogg",
            "audio/vehicle_tractor_2.ogg",
        ),
        collection(typed)
    )]
    vehicles: Vec<Handle<bevy_kira_audio::prelude::AudioSource>>,
    #[asset(path = "audio/obstacle_hit.ogg")]
    obstacle_hit: Handle<bevy_kira_audio::prelude::AudioSource>,
    #[asset(path = "audio/explosion.ogg")]
    explosion: Handle<bevy_kira_audio::prelude::AudioSource>,
}

impl SfxAssets {
    fn handle(&self, sfx: Sfx) -> Option<&Handle<bevy_kira_audio::prelude::AudioSource>> {
        match sfx {
            Sfx::Click => Some(&self.click),
            Sfx::Wrong => Some(&self.wrong),
            Sfx::Vehicle(index) => self.vehicles.get(index),
            Sfx::ObstacleHit => Some(&self.obstacle_hit),
            Sfx::Explosion => Some(&self.explosion),
        }
    }
}

pub struct SfxPlugin;

impl Plugin for SfxPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(AudioPlugin)
            .add_event::<PlaySfx>()
            .init_state::<AssetState>()
            .add_loading_state(
                LoadingState::new(AssetState::Loading)
                    .continue_to_state(AssetState::Loaded)
                    .load_collection::<SfxAssets>(),
            )
            .add_systems(Update, play_sfx.run_if(in_state(AssetState::Loaded)));
    }
}

fn play_sfx(assets: Res<SfxAssets>, audio: Res<Audio>, mut requests: EventReader<PlaySfx>) {
    for PlaySfx(sfx) in requests.read() {
        match assets.handle(*sfx) {
            Some(handle) => {
                audio.play(handle.clone_weak());
            }
            None => warn!("No sound loaded for {sfx:?}"),
        }
    }
}

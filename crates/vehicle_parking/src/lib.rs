mod animation;
mod assignment;
mod audio;
mod config;
mod error;
mod game;
mod input;
mod level;
mod model;
mod obstacles;
mod placement;
mod ribbit;
mod screen;
mod session;
mod tags;
mod vehicles;

use bits_helpers::BitWindow;
use ribbit::VehicleParking;

pub use crate::assignment::{OriginRegistry, Pair, Pairing, shuffled_indices};
pub use crate::config::PuzzleConfig;
pub use crate::error::PuzzleError;
pub use crate::level::LevelLayout;
pub use crate::model::{GameState, Item, ItemStatus, Slot};
pub use crate::placement::{Placement, Rejection, Tolerance};
pub use crate::session::{Session, SessionSnapshot, SessionStatus, StarThresholds};
pub use crate::tags::{TagEffects, TagTable, VehicleTag};

pub fn run() {
    bits_helpers::get_default_app::<VehicleParking>(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        BitWindow::LANDSCAPE,
    )
    .add_plugins(game::GamePlugin)
    .add_plugins(screen::ScreenPlugin)
    .add_plugins(audio::SfxPlugin)
    .run();
}

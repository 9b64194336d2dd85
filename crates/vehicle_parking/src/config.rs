use bevy::prelude::*;

use crate::error::PuzzleError;
use crate::placement::Tolerance;
use crate::session::StarThresholds;

/// Landscape play field, matching the bit's window.
pub const PLAY_AREA: Vec2 = Vec2::new(960.0, 540.0);
/// Keeps dragged vehicles this far away from the window edges
pub const PLAY_AREA_MARGIN: f32 = 20.0;

pub const FONT_SIZE_LARGE: f32 = 48.0;
pub const FONT_SIZE_MEDIUM: f32 = 28.0;
pub const FONT_SIZE_SMALL: f32 = 14.0;

/// Draw order of the different entity kinds
pub mod layers {
    pub const SLOT: f32 = 0.0;
    pub const VEHICLE: f32 = 1.0;
    pub const PLACED_VEHICLE: f32 = 0.5;
    pub const DRAGGED_VEHICLE: f32 = 4.0;
    pub const OBSTACLE: f32 = 5.0;
    pub const POPUP: f32 = 8.0;
}

/// Keyboard transform of the selected vehicle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlConfig {
    /// Degrees per second
    pub rotate_speed: f32,
    /// Scale units per second, per axis
    pub scale_speed: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Opacity of a vehicle while it is dragged
    pub drag_alpha: f32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            rotate_speed: 15.0,
            scale_speed: 0.3,
            min_scale: 0.1,
            max_scale: 1.5,
            drag_alpha: 0.6,
        }
    }
}

/// Random pose given to vehicles when they spawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnConfig {
    pub min_scale: f32,
    pub max_scale: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.8,
            max_scale: 1.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleConfig {
    /// Seconds between two spawns
    pub spawn_interval: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub size: f32,
    /// Chance in `[0, 1]` that a spawned obstacle is a bomb
    pub bomb_chance: f32,
    pub fade_duration: f32,
    pub wave_amplitude: f32,
    pub wave_frequency: f32,
    /// Obstacles start fading out this far from the far edge
    pub edge_margin: f32,
    pub explosion_radius: f32,
    pub explosion_delay: f32,
    pub jitter_duration: f32,
    pub jitter_intensity: f32,
    /// How long a destroyed vehicle takes to shrink away
    pub shrink_duration: f32,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            spawn_interval: 2.5,
            min_speed: 90.0,
            max_speed: 180.0,
            size: 48.0,
            bomb_chance: 0.2,
            fade_duration: 1.5,
            wave_amplitude: 25.0,
            wave_frequency: 1.0,
            edge_margin: 80.0,
            explosion_radius: 120.0,
            explosion_delay: 1.0,
            jitter_duration: 0.3,
            jitter_intensity: 5.0,
            shrink_duration: 0.5,
        }
    }
}

/// Tunables of a play session.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PuzzleConfig {
    pub tolerance: Tolerance,
    pub stars: StarThresholds,
    pub points_per_placement: i32,
    pub controls: ControlConfig,
    pub spawn: SpawnConfig,
    pub obstacles: ObstacleConfig,
    /// Fixed seed for slot assignment, random when `None`
    pub seed: Option<u64>,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::default(),
            stars: StarThresholds::default(),
            points_per_placement: 100,
            controls: ControlConfig::default(),
            spawn: SpawnConfig::default(),
            obstacles: ObstacleConfig::default(),
            seed: None,
        }
    }
}

impl PuzzleConfig {
    pub fn rng(&self) -> fastrand::Rng {
        self.seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed)
    }

    pub fn validate(&self) -> Result<(), PuzzleError> {
        let invalid = |reason: &str| Err(PuzzleError::Configuration(reason.to_owned()));

        if !(0.0..180.0).contains(&self.tolerance.max_angle) {
            return invalid("angle tolerance must be in [0, 180)");
        }
        if self.tolerance.max_scale_delta < 0.0 {
            return invalid("scale tolerance must not be negative");
        }
        if self.stars.three_stars > self.stars.two_stars {
            return invalid("three star limit must not exceed the two star limit");
        }
        if self.controls.min_scale > self.controls.max_scale || self.controls.min_scale < 0.0 {
            return invalid("control scale clamp is inverted or negative");
        }
        if self.spawn.min_scale > self.spawn.max_scale || self.spawn.min_scale <= 0.0 {
            return invalid("spawn scale range is inverted or not positive");
        }
        if self.obstacles.spawn_interval <= 0.0 {
            return invalid("obstacle spawn interval must be positive");
        }
        if self.obstacles.min_speed > self.obstacles.max_speed {
            return invalid("obstacle speed range is inverted");
        }
        Ok(())
    }
}

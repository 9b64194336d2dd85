use core::f32::consts::TAU;
use core::time::Duration;

use bevy::prelude::*;
use bits_helpers::input::PointerPhase;
use bits_helpers::restart::CleanupMarker;

use crate::animation::{Tween, Tweens};
use crate::audio::{PlaySfx, Sfx};
use crate::config::{ObstacleConfig, PLAY_AREA, PuzzleConfig, layers};
use crate::game::{PlayingSet, VehicleDestroyed};
use crate::input::{CurrentPointer, InputRouter};
use crate::model::{GameState, Item};
use crate::vehicles::Footprint;

const PLANE_COLOR: Color = Color::srgb(0.85, 0.87, 0.92);
const BOMB_COLOR: Color = Color::srgb(0.2, 0.2, 0.22);
const HIT_HIGHLIGHT: Color = Color::srgb(0.0, 1.0, 1.0);
const EXPLOSION_HIGHLIGHT: Color = Color::srgb(1.0, 0.1, 0.05);
const HIT_FLASH_DURATION: f32 = 0.5;
const EXPLOSION_FLASH_DURATION: f32 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    /// Destroys a dragged vehicle it touches
    Plane,
    /// Explodes when the pointer hovers it, taking nearby obstacles along
    Bomb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flight {
    #[default]
    Flying,
    /// Fading out near the far edge
    Leaving,
    /// Running its destroy sequence; harmless
    Wrecked,
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    /// Horizontal speed in pixels per second, signed by direction
    pub velocity: f32,
    pub base_y: f32,
    pub spawned_at: f32,
    pub flight: Flight,
}

impl Obstacle {
    pub fn is_live(&self) -> bool {
        self.flight != Flight::Wrecked
    }
}

#[derive(Resource)]
pub struct ObstacleSpawner {
    timer: Timer,
    rng: fastrand::Rng,
}

impl Default for ObstacleSpawner {
    fn default() -> Self {
        Self::new(&PuzzleConfig::default())
    }
}

impl ObstacleSpawner {
    pub fn new(config: &PuzzleConfig) -> Self {
        Self {
            timer: Timer::new(
                Duration::from_secs_f32(config.obstacles.spawn_interval),
                TimerMode::Repeating,
            ),
            rng: config.rng(),
        }
    }
}

/// Second sweep of a bomb's blast radius once its fuse runs out.
#[derive(Component, Debug, Clone)]
pub struct Blast {
    pub center: Vec2,
    pub fuse: Timer,
}

type ObstacleParts = (
    Entity,
    &'static mut Obstacle,
    &'static Transform,
    &'static Footprint,
    &'static mut Sprite,
    &'static mut Tweens,
);

pub struct ObstaclesPlugin;

impl Plugin for ObstaclesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ObstacleSpawner>()
            .add_systems(OnEnter(GameState::Playing), reset_spawner)
            .add_systems(
                Update,
                (
                    spawn_obstacles,
                    move_obstacles,
                    detonate_bombs,
                    sweep_blasts,
                    check_obstacle_hits,
                )
                    .chain()
                    .in_set(PlayingSet::Obstacles),
            );
    }
}

fn reset_spawner(mut commands: Commands, config: Res<PuzzleConfig>) {
    commands.insert_resource(ObstacleSpawner::new(&config));
}

/// Vertical wobble of an obstacle `age` seconds after it spawned.
pub fn wave_offset(config: &ObstacleConfig, age: f32) -> f32 {
    config.wave_amplitude * (TAU * config.wave_frequency * age).sin()
}

/// Whether an obstacle at `x` heading along `velocity` is close to the edge it flies towards.
pub fn near_far_edge(x: f32, velocity: f32, margin: f32) -> bool {
    let far_edge = PLAY_AREA.x * 0.5 * velocity.signum();
    (far_edge - x) * velocity.signum() <= margin
}

fn spawn_obstacles(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<PuzzleConfig>,
    mut spawner: ResMut<ObstacleSpawner>,
) {
    spawner.timer.tick(time.delta());
    if !spawner.timer.just_finished() {
        return;
    }

    let settings = &config.obstacles;
    let rng = &mut spawner.rng;
    let kind = if rng.f32() < settings.bomb_chance {
        ObstacleKind::Bomb
    } else {
        ObstacleKind::Plane
    };
    let (color, size) = match kind {
        ObstacleKind::Plane => (PLANE_COLOR, Vec2::new(settings.size, settings.size * 0.5)),
        ObstacleKind::Bomb => (BOMB_COLOR, Vec2::splat(settings.size * 0.6)),
    };

    let direction = if rng.bool() { 1.0 } else { -1.0 };
    let speed = (settings.max_speed - settings.min_speed).mul_add(rng.f32(), settings.min_speed);
    let half_height = PLAY_AREA.y * 0.5 - settings.size - settings.wave_amplitude;
    let base_y = (2.0 * half_height).mul_add(rng.f32(), -half_height);
    let start_x = -direction * (PLAY_AREA.x * 0.5 + settings.size * 0.5);
    let now = time.elapsed_secs();

    debug!("Spawning {kind:?} at y {base_y:.0}");
    commands.spawn((
        Sprite::from_color(color.with_alpha(0.0), size),
        Transform::from_xyz(start_x, base_y, layers::OBSTACLE),
        Footprint(size),
        Obstacle {
            kind,
            velocity: direction * speed,
            base_y,
            spawned_at: now,
            flight: Flight::Flying,
        },
        Tweens::one(Tween::fade(0.0, 1.0, now, settings.fade_duration)),
        CleanupMarker,
    ));
}

fn move_obstacles(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<PuzzleConfig>,
    mut obstacles: Query<(Entity, &mut Obstacle, &mut Transform, &Sprite, &mut Tweens)>,
) {
    let settings = &config.obstacles;
    let now = time.elapsed_secs();
    let limit = PLAY_AREA.x * 0.5 + settings.size * 2.0;

    for (entity, mut obstacle, mut transform, sprite, mut tweens) in &mut obstacles {
        if !obstacle.is_live() {
            continue;
        }

        transform.translation.x += obstacle.velocity * time.delta_secs();
        transform.translation.y =
            obstacle.base_y + wave_offset(settings, now - obstacle.spawned_at);

        if transform.translation.x.abs() > limit {
            commands.entity(entity).despawn_recursive();
            continue;
        }

        if obstacle.flight == Flight::Flying
            && near_far_edge(transform.translation.x, obstacle.velocity, settings.edge_margin)
        {
            obstacle.flight = Flight::Leaving;
            let alpha = sprite.color.alpha();
            tweens.push(Tween::fade(alpha, 0.0, now, settings.fade_duration).despawning());
        }
    }
}

/// Flash, shake and fade an obstacle out of the game.
fn wreck(
    obstacle: &mut Obstacle,
    sprite: &mut Sprite,
    tweens: &mut Tweens,
    highlight: Color,
    flash_duration: f32,
    fade_duration: f32,
    settings: &ObstacleConfig,
    now: f32,
) {
    obstacle.flight = Flight::Wrecked;

    let alpha = sprite.color.alpha();
    let restore = sprite.color;
    sprite.color = highlight.with_alpha(alpha);

    tweens.push(Tween::flash(restore, now, flash_duration));
    tweens.push(Tween::jitter(settings.jitter_intensity, now, settings.jitter_duration));
    tweens.push(Tween::fade(alpha, 0.0, now, fade_duration).despawning());
}

/// Wrecks every live obstacle within the blast radius of `center`.
fn catch_in_blast(
    obstacles: &mut Query<ObstacleParts>,
    center: Vec2,
    settings: &ObstacleConfig,
    now: f32,
) -> usize {
    let mut caught = 0;
    for (_, mut obstacle, transform, _, mut sprite, mut tweens) in obstacles.iter_mut() {
        if obstacle.is_live()
            && transform.translation.truncate().distance(center) <= settings.explosion_radius
        {
            wreck(
                &mut obstacle,
                &mut sprite,
                &mut tweens,
                HIT_HIGHLIGHT,
                HIT_FLASH_DURATION,
                HIT_FLASH_DURATION,
                settings,
                now,
            );
            caught += 1;
        }
    }
    caught
}

fn detonate_bombs(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<PuzzleConfig>,
    pointer: Res<CurrentPointer>,
    mut obstacles: Query<ObstacleParts>,
    mut sfx: EventWriter<PlaySfx>,
) {
    let Some(position) = pointer.0.world_position else {
        return;
    };
    let settings = &config.obstacles;
    let now = time.elapsed_secs();

    let bomb = obstacles
        .iter()
        .find(|(_, obstacle, transform, footprint, _, _)| {
            obstacle.kind == ObstacleKind::Bomb
                && obstacle.is_live()
                && footprint.contains(transform, position)
        })
        .map(|(entity, _, transform, _, _, _)| (entity, transform.translation.truncate()));
    let Some((bomb, center)) = bomb else {
        return;
    };

    info!("Bomb exploded at {center:.0}");
    sfx.send(PlaySfx(Sfx::Explosion));

    if let Ok((_, mut obstacle, _, _, mut sprite, mut tweens)) = obstacles.get_mut(bomb) {
        wreck(
            &mut obstacle,
            &mut sprite,
            &mut tweens,
            EXPLOSION_HIGHLIGHT,
            EXPLOSION_FLASH_DURATION,
            settings.explosion_delay,
            settings,
            now,
        );
    }
    catch_in_blast(&mut obstacles, center, settings, now);

    commands.spawn((
        Blast {
            center,
            fuse: Timer::from_seconds(settings.explosion_delay, TimerMode::Once),
        },
        CleanupMarker,
    ));
}

fn sweep_blasts(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<PuzzleConfig>,
    mut blasts: Query<(Entity, &mut Blast)>,
    mut obstacles: Query<ObstacleParts>,
) {
    let now = time.elapsed_secs();
    for (entity, mut blast) in &mut blasts {
        if !blast.fuse.tick(time.delta()).finished() {
            continue;
        }
        let caught = catch_in_blast(&mut obstacles, blast.center, &config.obstacles, now);
        debug!("Blast at {:.0} caught {caught} late obstacles", blast.center);
        commands.entity(entity).despawn();
    }
}

/// A dragged vehicle is lost when the pointer or the vehicle's body meets a plane.
fn check_obstacle_hits(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<PuzzleConfig>,
    pointer: Res<CurrentPointer>,
    mut router: ResMut<InputRouter>,
    mut obstacles: Query<(&mut Obstacle, &Transform, &Footprint, &mut Sprite, &mut Tweens)>,
    mut vehicles: Query<(&mut Item, &Transform, &Footprint), Without<Obstacle>>,
    mut destroyed: EventWriter<VehicleDestroyed>,
    mut sfx: EventWriter<PlaySfx>,
) {
    if !pointer.0.is(PointerPhase::Held) {
        return;
    }
    let Some(vehicle) = router.dragged() else {
        return;
    };
    let Ok((mut item, body, body_footprint)) = vehicles.get_mut(vehicle) else {
        return;
    };
    if !item.is_free() {
        return;
    }

    let Some((mut obstacle, _, _, mut sprite, mut tweens)) =
        obstacles
            .iter_mut()
            .find(|(obstacle, transform, footprint, _, _)| {
                obstacle.kind == ObstacleKind::Plane
                    && obstacle.is_live()
                    && (pointer
                        .0
                        .world_position
                        .is_some_and(|position| footprint.contains(transform, position))
                        || body_footprint.overlaps(body, footprint, transform))
            })
    else {
        return;
    };

    let settings = &config.obstacles;
    let now = time.elapsed_secs();
    info!("{} flew into an obstacle", item.tag());

    item.destroy();
    commands.entity(vehicle).insert(Tweens::one(Tween::shrink(
        item.scale().max_element(),
        now,
        settings.shrink_duration,
    )));
    router.clear();

    wreck(
        &mut obstacle,
        &mut sprite,
        &mut tweens,
        HIT_HIGHLIGHT,
        HIT_FLASH_DURATION,
        HIT_FLASH_DURATION,
        settings,
        now,
    );

    destroyed.send(VehicleDestroyed { entity: vehicle });
    sfx.send(PlaySfx(Sfx::ObstacleHit));
}

#[cfg(test)]
mod tests {
    use bits_helpers::input::{PointerPhase, PointerState};

    use super::*;
    use crate::model::ItemStatus;
    use crate::tags::VehicleTag;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<PuzzleConfig>()
            .init_resource::<InputRouter>()
            .init_resource::<CurrentPointer>()
            .add_event::<VehicleDestroyed>()
            .add_event::<PlaySfx>()
            .add_systems(
                Update,
                (detonate_bombs, sweep_blasts, check_obstacle_hits).chain(),
            );
        app
    }

    fn spawn_dragged_vehicle(app: &mut App, at: Vec2, size: Vec2) -> Entity {
        let vehicle = app
            .world_mut()
            .spawn((
                Item::new(VehicleTag::Police, 0.0, Vec2::ONE),
                Transform::from_translation(at.extend(layers::DRAGGED_VEHICLE)),
                Footprint(size),
            ))
            .id();
        app.world_mut()
            .resource_mut::<InputRouter>()
            .grab(vehicle, Vec2::ZERO);
        vehicle
    }

    fn status(app: &App, entity: Entity) -> Option<ItemStatus> {
        app.world().get::<Item>(entity).map(Item::status)
    }

    fn spawn_obstacle(app: &mut App, kind: ObstacleKind, at: Vec2) -> Entity {
        let size = Vec2::splat(40.0);
        app.world_mut()
            .spawn((
                Sprite::from_color(PLANE_COLOR, size),
                Transform::from_translation(at.extend(layers::OBSTACLE)),
                Footprint(size),
                Obstacle {
                    kind,
                    velocity: 100.0,
                    base_y: at.y,
                    spawned_at: 0.0,
                    flight: Flight::Flying,
                },
                Tweens::default(),
            ))
            .id()
    }

    fn hover(app: &mut App, phase: Option<PointerPhase>, position: Vec2) {
        app.insert_resource(CurrentPointer(PointerState {
            phase,
            world_position: Some(position),
        }));
        app.update();
    }

    fn flight(app: &App, entity: Entity) -> Option<Flight> {
        app.world().get::<Obstacle>(entity).map(|obstacle| obstacle.flight)
    }

    #[test]
    fn wave_wobbles_around_the_base_line() {
        let config = ObstacleConfig::default();
        assert!(wave_offset(&config, 0.0).abs() < 1e-5, "starts on the base line");
        assert!(
            (wave_offset(&config, 0.25) - config.wave_amplitude).abs() < 1e-3,
            "peaks a quarter period later"
        );
        assert!(
            (wave_offset(&config, 0.75) + config.wave_amplitude).abs() < 1e-3,
            "dips three quarters in"
        );
    }

    #[test]
    fn far_edge_depends_on_direction() {
        let edge = PLAY_AREA.x * 0.5;
        assert!(near_far_edge(edge - 50.0, 120.0, 80.0), "close to the right edge");
        assert!(!near_far_edge(edge - 50.0, -120.0, 80.0), "heading away from it");
        assert!(near_far_edge(-edge + 10.0, -120.0, 80.0), "close to the left edge");
        assert!(!near_far_edge(0.0, 120.0, 80.0), "middle of the field");
    }

    #[test]
    fn dragging_into_a_plane_destroys_the_vehicle() {
        let mut app = test_app();
        let plane = spawn_obstacle(&mut app, ObstacleKind::Plane, Vec2::new(100.0, 100.0));
        let vehicle = spawn_dragged_vehicle(&mut app, Vec2::new(-300.0, -200.0), Vec2::splat(10.0));

        hover(&mut app, Some(PointerPhase::Held), Vec2::new(110.0, 95.0));

        assert_eq!(status(&app, vehicle), Some(ItemStatus::Destroyed), "vehicle wrecked");
        assert!(app.world().get::<Tweens>(vehicle).is_some(), "vehicle shrinks away");
        assert_eq!(app.world().resource::<InputRouter>().selected, None, "drag ended");
        assert_eq!(flight(&app, plane), Some(Flight::Wrecked), "plane destroyed too");
        assert_eq!(
            app.world().resource::<Events<VehicleDestroyed>>().len(),
            1,
            "session is told"
        );
    }

    #[test]
    fn vehicle_body_hits_a_plane_beside_the_pointer() {
        let mut app = test_app();
        let plane = spawn_obstacle(&mut app, ObstacleKind::Plane, Vec2::new(100.0, 0.0));
        let vehicle = spawn_dragged_vehicle(&mut app, Vec2::new(50.0, 0.0), Vec2::new(110.0, 40.0));

        hover(&mut app, Some(PointerPhase::Held), Vec2::new(40.0, 0.0));

        assert_eq!(status(&app, vehicle), Some(ItemStatus::Destroyed), "front bumper hit it");
        assert_eq!(flight(&app, plane), Some(Flight::Wrecked), "plane destroyed too");
    }

    #[test]
    fn planes_ignore_a_vehicle_once_the_pointer_is_up() {
        let mut app = test_app();
        let plane = spawn_obstacle(&mut app, ObstacleKind::Plane, Vec2::ZERO);
        let vehicle = spawn_dragged_vehicle(&mut app, Vec2::ZERO, Vec2::splat(40.0));

        hover(&mut app, None, Vec2::ZERO);
        hover(&mut app, Some(PointerPhase::Released), Vec2::ZERO);

        assert_eq!(status(&app, vehicle), Some(ItemStatus::Free), "vehicle untouched");
        assert_eq!(flight(&app, plane), Some(Flight::Flying), "plane keeps flying");
    }

    #[test]
    fn hovering_a_plane_without_a_drag_is_harmless() {
        let mut app = test_app();
        let plane = spawn_obstacle(&mut app, ObstacleKind::Plane, Vec2::ZERO);
        hover(&mut app, None, Vec2::ZERO);
        assert_eq!(flight(&app, plane), Some(Flight::Flying), "plane keeps flying");
        assert!(
            app.world().resource::<Events<VehicleDestroyed>>().is_empty(),
            "nothing destroyed"
        );
    }

    #[test]
    fn bomb_takes_nearby_obstacles_with_it() {
        let mut app = test_app();
        let bomb = spawn_obstacle(&mut app, ObstacleKind::Bomb, Vec2::ZERO);
        let near = spawn_obstacle(&mut app, ObstacleKind::Plane, Vec2::new(80.0, 0.0));
        let far = spawn_obstacle(&mut app, ObstacleKind::Plane, Vec2::new(400.0, 0.0));

        hover(&mut app, None, Vec2::new(5.0, 5.0));

        assert_eq!(flight(&app, bomb), Some(Flight::Wrecked), "bomb went off");
        assert_eq!(flight(&app, near), Some(Flight::Wrecked), "neighbour caught in the blast");
        assert_eq!(flight(&app, far), Some(Flight::Flying), "far plane untouched");
        assert!(
            app.world().get::<Tweens>(bomb).is_some_and(|tweens| tweens.0.len() == 3),
            "flash, jitter and fade queued"
        );
        assert_eq!(
            app.world_mut().query::<&Blast>().iter(app.world()).count(),
            1,
            "fuse left burning for a second sweep"
        );
    }

    #[test]
    fn burnt_out_fuse_catches_late_arrivals() {
        let mut app = test_app();
        let late = spawn_obstacle(&mut app, ObstacleKind::Plane, Vec2::new(60.0, 0.0));
        let far = spawn_obstacle(&mut app, ObstacleKind::Plane, Vec2::new(400.0, 0.0));
        let blast = app
            .world_mut()
            .spawn(Blast {
                center: Vec2::ZERO,
                fuse: Timer::from_seconds(0.0, TimerMode::Once),
            })
            .id();

        hover(&mut app, None, Vec2::new(-400.0, 200.0));

        assert_eq!(flight(&app, late), Some(Flight::Wrecked), "flew into the blast");
        assert_eq!(flight(&app, far), Some(Flight::Flying), "out of reach");
        assert!(app.world().get::<Blast>(blast).is_none(), "fuse removed after its sweep");
    }
}

use bevy::prelude::*;
use bits_helpers::FONT;
use bits_helpers::restart::CleanupMarker;

use crate::animation::Tweens;
use crate::assignment::{OriginRegistry, Pairing};
use crate::config::{FONT_SIZE_SMALL, PuzzleConfig, SpawnConfig, layers};
use crate::level::{LevelLayout, TagReport};
use crate::model::{GameState, Item, Slot};

const SLOT_ALPHA: f32 = 0.35;
const DEFAULT_FOOTPRINT: Vec2 = Vec2::new(80.0, 40.0);

/// Unscaled size of a vehicle or slot sprite.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Footprint(pub Vec2);

impl Footprint {
    /// Whether `point` lies inside the footprint once `transform` is applied.
    pub fn contains(&self, transform: &Transform, point: Vec2) -> bool {
        let local = transform.rotation.inverse()
            * (point.extend(transform.translation.z) - transform.translation);
        let half = self.0 * transform.scale.truncate() * 0.5;
        local.x.abs() <= half.x.abs() && local.y.abs() <= half.y.abs()
    }

    /// World-space corners once `transform` is applied.
    pub fn corners(&self, transform: &Transform) -> [Vec2; 4] {
        let half = self.0 * transform.scale.truncate() * 0.5;
        [
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(half.x, half.y),
            Vec2::new(-half.x, half.y),
        ]
        .map(|corner| (transform.rotation * corner.extend(0.0) + transform.translation).truncate())
    }

    /// Separating-axis test between two rotated rectangles.
    pub fn overlaps(&self, transform: &Transform, other: &Self, other_transform: &Transform) -> bool {
        let ours = self.corners(transform);
        let theirs = other.corners(other_transform);
        [transform.rotation, other_transform.rotation]
            .into_iter()
            .flat_map(|rotation| [(rotation * Vec3::X).truncate(), (rotation * Vec3::Y).truncate()])
            .all(|axis| {
                let (our_min, our_max) = project(&ours, axis);
                let (their_min, their_max) = project(&theirs, axis);
                our_min <= their_max && their_min <= our_max
            })
    }
}

fn project(corners: &[Vec2; 4], axis: Vec2) -> (f32, f32) {
    corners
        .iter()
        .map(|corner| corner.dot(axis))
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), distance| {
            (min.min(distance), max.max(distance))
        })
}

pub struct VehiclesPlugin;

impl Plugin for VehiclesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Playing), spawn_level)
            .add_systems(Update, sync_item_transforms);
    }
}

/// Random starting pose: any orientation and a uniform scale.
pub fn random_pose(spawn: &SpawnConfig, rng: &mut fastrand::Rng) -> (f32, Vec2) {
    let angle = rng.f32() * 360.0;
    let scale = (spawn.max_scale - spawn.min_scale).mul_add(rng.f32(), spawn.min_scale);
    (angle, Vec2::splat(scale))
}

fn spawn_level(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<PuzzleConfig>,
    layout: Res<LevelLayout>,
    mut origins: ResMut<OriginRegistry>,
) {
    let mut rng = config.rng();
    let font = asset_server.load(FONT);
    log_tag_report(&layout.tag_report(), &layout);

    let vehicles = Pairing::assign(&layout.vehicles, &layout.vehicle_anchors, &mut rng);
    origins.record(&vehicles, layout.vehicles.len(), &layout.vehicle_anchors);

    for (order, pair) in vehicles.pairs().iter().enumerate() {
        let (Some(spec), Some(anchor)) = (
            layout.vehicles.get(pair.item),
            layout.vehicle_anchors.get(pair.slot),
        ) else {
            continue;
        };
        let (angle, scale) = random_pose(&config.spawn, &mut rng);
        let item = Item::new(spec.tag, angle, scale);
        let z = (order as f32).mul_add(0.01, layers::VEHICLE);

        commands
            .spawn((
                Sprite::from_color(spec.color, spec.size),
                Transform {
                    translation: anchor.extend(z),
                    rotation: item.rotation(),
                    scale: item.scale().extend(1.0),
                },
                Footprint(spec.size),
                item,
                CleanupMarker,
            ))
            .with_children(|parent| {
                parent.spawn(label(spec.tag.to_string(), font.clone(), Color::BLACK));
            });
    }

    let slots = Pairing::assign(&layout.slots, &layout.slot_anchors, &mut rng);
    for pair in slots.pairs() {
        let (Some(spec), Some(anchor)) = (
            layout.slots.get(pair.item),
            layout.slot_anchors.get(pair.slot),
        ) else {
            continue;
        };
        let (color, size) = layout
            .vehicle_spec(spec.tag)
            .map_or((Color::WHITE, DEFAULT_FOOTPRINT), |vehicle| {
                (vehicle.color, vehicle.size)
            });
        let slot = Slot::new(spec.tag, spec.angle, spec.scale);

        commands
            .spawn((
                Sprite::from_color(color.with_alpha(SLOT_ALPHA), size),
                Transform {
                    translation: anchor.extend(layers::SLOT),
                    rotation: slot.rotation(),
                    scale: slot.scale().extend(1.0),
                },
                Footprint(size),
                slot,
                CleanupMarker,
            ))
            .with_children(|parent| {
                parent.spawn(label(spec.tag.to_string(), font.clone(), Color::WHITE));
            });
    }

    info!(
        "Spawned {} vehicles and {} slots",
        vehicles.len(),
        slots.len()
    );
}

fn label(text: String, font: Handle<Font>, color: Color) -> impl Bundle {
    (
        Text2d::new(text),
        TextFont {
            font,
            font_size: FONT_SIZE_SMALL,
            ..default()
        },
        TextColor(color),
        Transform::from_xyz(0.0, 0.0, 0.1),
    )
}

fn log_tag_report(report: &TagReport, layout: &LevelLayout) {
    if report.is_clean() {
        info!("Tag check: all {} vehicle tags have a slot", layout.vehicles.len());
        return;
    }
    for tag in &report.slots_without_vehicle {
        warn!("Slot tag {tag} has no vehicle");
    }
    for tag in &report.vehicles_without_slot {
        warn!("Vehicle tag {tag} has no slot");
    }
    info!(
        "Tag check: {} vehicles, {} slots, {} unmatched",
        layout.vehicles.len(),
        layout.slots.len(),
        report.slots_without_vehicle.len() + report.vehicles_without_slot.len()
    );
}

/// Vehicles own their orientation and scale; tweened ones are left to the animation.
fn sync_item_transforms(
    mut query: Query<(&Item, &mut Transform), (Changed<Item>, Without<Tweens>)>,
) {
    for (item, mut transform) in &mut query {
        transform.rotation = item.rotation();
        transform.scale = item.scale().extend(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footprint_follows_rotation_and_scale() {
        let footprint = Footprint(Vec2::new(100.0, 20.0));
        let upright = Transform::from_xyz(50.0, 0.0, 1.0);
        assert!(footprint.contains(&upright, Vec2::new(95.0, 5.0)), "inside the long side");
        assert!(!footprint.contains(&upright, Vec2::new(50.0, 15.0)), "above the short side");

        let turned = upright.with_rotation(Quat::from_rotation_z(90.0_f32.to_radians()));
        assert!(footprint.contains(&turned, Vec2::new(50.0, 45.0)), "long side now vertical");
        assert!(!footprint.contains(&turned, Vec2::new(95.0, 0.0)), "no longer wide");

        let doubled = upright.with_scale(Vec3::new(2.0, 2.0, 1.0));
        assert!(footprint.contains(&doubled, Vec2::new(140.0, 15.0)), "scaled footprint");
    }

    #[test]
    fn rotated_footprints_overlap_only_when_they_touch() {
        let square = Footprint(Vec2::splat(40.0));
        let origin = Transform::default();

        let truck = Footprint(Vec2::new(110.0, 40.0));
        let beside = Transform::from_xyz(50.0, 0.0, 1.0);
        let plane_ahead = Transform::from_xyz(100.0, 0.0, 5.0);
        assert!(truck.overlaps(&beside, &square, &plane_ahead), "front of the truck covers it");
        assert!(square.overlaps(&plane_ahead, &truck, &beside), "either way round");

        let diamond = Transform::from_xyz(45.0, 45.0, 0.0)
            .with_rotation(Quat::from_rotation_z(45.0_f32.to_radians()));
        assert!(
            !square.overlaps(&origin, &square, &diamond),
            "bounding boxes meet but the shapes do not"
        );

        let nearer = diamond.with_translation(Vec3::new(35.0, 35.0, 0.0));
        assert!(square.overlaps(&origin, &square, &nearer), "diamond tip reaches the corner");
        assert!(
            !square.overlaps(&origin, &square, &Transform::from_xyz(200.0, 0.0, 0.0)),
            "far apart"
        );
    }

    #[test]
    fn random_pose_stays_in_range() {
        let spawn = SpawnConfig::default();
        let mut rng = fastrand::Rng::with_seed(3);
        for _ in 0..200 {
            let (angle, scale) = random_pose(&spawn, &mut rng);
            assert!((0.0..360.0).contains(&angle), "angle {angle} out of range");
            assert!(
                (spawn.min_scale..spawn.max_scale).contains(&scale.x),
                "scale {scale} out of range"
            );
            assert!((scale.x - scale.y).abs() < f32::EPSILON, "uniform scale");
        }
    }
}

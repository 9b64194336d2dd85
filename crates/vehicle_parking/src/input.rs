use bevy::prelude::*;
use bits_helpers::input::{PointerPhase, PointerState, read_pointer};

use crate::assignment::OriginRegistry;
use crate::audio::{PlaySfx, Sfx};
use crate::config::{ControlConfig, PLAY_AREA, PLAY_AREA_MARGIN, PuzzleConfig, layers};
use crate::game::{PlayingSet, VehiclePlaced};
use crate::model::{GameState, Item, Slot};
use crate::placement::{Placement, Rejection};
use crate::tags::TagTable;
use crate::vehicles::Footprint;

/// Owner of the single selected vehicle and of the drag in progress.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct InputRouter {
    pub selected: Option<Entity>,
    pub dragging: bool,
    /// Vehicle centre minus pointer position when the drag started
    pub grab_offset: Vec2,
}

impl InputRouter {
    pub fn grab(&mut self, entity: Entity, grab_offset: Vec2) {
        self.selected = Some(entity);
        self.dragging = true;
        self.grab_offset = grab_offset;
    }

    pub fn dragged(&self) -> Option<Entity> {
        self.selected.filter(|_| self.dragging)
    }

    pub const fn end_drag(&mut self) {
        self.dragging = false;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Pointer sampled once per frame for every gameplay system.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct CurrentPointer(pub PointerState);

pub struct PointerRoutingPlugin;

impl Plugin for PointerRoutingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputRouter>()
            .init_resource::<CurrentPointer>()
            .add_systems(OnEnter(GameState::Playing), reset_router)
            .add_systems(
                Update,
                (
                    (sample_pointer, route_pointer)
                        .chain()
                        .in_set(PlayingSet::Pointer),
                    transform_selected.in_set(PlayingSet::Transform),
                ),
            );
    }
}

fn reset_router(mut router: ResMut<InputRouter>) {
    router.clear();
}

fn sample_pointer(
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    mut pointer: ResMut<CurrentPointer>,
) {
    pointer.0 = read_pointer(&buttons, &touches, &windows, &cameras);
}

/// Keeps a dragged vehicle inside the visible field.
pub fn clamp_to_play_area(position: Vec2) -> Vec2 {
    let half = PLAY_AREA * 0.5 - Vec2::splat(PLAY_AREA_MARGIN);
    position.clamp(-half, half)
}

pub fn route_pointer(
    pointer: Res<CurrentPointer>,
    mut router: ResMut<InputRouter>,
    config: Res<PuzzleConfig>,
    tags: Res<TagTable>,
    origins: Res<OriginRegistry>,
    mut vehicles: Query<(Entity, &mut Item, &mut Transform, &Footprint, &mut Sprite), Without<Slot>>,
    slots: Query<(&Slot, &Transform, &Footprint), Without<Item>>,
    mut placed: EventWriter<VehiclePlaced>,
    mut sfx: EventWriter<PlaySfx>,
) {
    let PointerState {
        phase: Some(phase),
        world_position,
    } = pointer.0
    else {
        return;
    };

    match phase {
        PointerPhase::Pressed => {
            let Some(position) = world_position else {
                return;
            };
            let hit = vehicles
                .iter()
                .filter(|(_, item, transform, footprint, _)| {
                    item.is_free() && footprint.contains(transform, position)
                })
                .max_by(|a, b| a.2.translation.z.total_cmp(&b.2.translation.z))
                .map(|(entity, _, transform, _, _)| (entity, transform.translation.truncate()));

            let Some((entity, center)) = hit else {
                router.clear();
                return;
            };

            router.grab(entity, center - position);
            if let Ok((_, _, mut transform, _, mut sprite)) = vehicles.get_mut(entity) {
                transform.translation.z = layers::DRAGGED_VEHICLE;
                sprite.color.set_alpha(config.controls.drag_alpha);
            }
            sfx.send(PlaySfx(Sfx::Click));
        }
        PointerPhase::Held => {
            let (Some(entity), Some(position)) = (router.dragged(), world_position) else {
                return;
            };
            if let Ok((_, item, mut transform, _, _)) = vehicles.get_mut(entity) {
                if item.is_free() {
                    let target = clamp_to_play_area(position + router.grab_offset);
                    transform.translation = target.extend(transform.translation.z);
                }
            }
        }
        // Judged on the vehicle centre; the pointer may have left the window.
        PointerPhase::Released => {
            let Some(entity) = router.dragged() else {
                return;
            };
            router.end_drag();

            let Ok((_, mut item, mut transform, _, mut sprite)) = vehicles.get_mut(entity) else {
                return;
            };
            if !item.is_free() {
                return;
            }
            sprite.color.set_alpha(1.0);
            transform.translation.z = layers::VEHICLE;

            let center = transform.translation.truncate();
            let Some((slot, slot_transform)) = slots
                .iter()
                .find(|(_, slot_transform, footprint)| footprint.contains(slot_transform, center))
                .map(|(slot, slot_transform, _)| (slot, slot_transform))
            else {
                return;
            };

            match config.tolerance.evaluate(&item, slot) {
                Placement::Accepted => {
                    item.lock_into(slot);
                    let snapped = slot_transform.translation.truncate();
                    transform.translation = snapped.extend(layers::PLACED_VEHICLE);
                    router.clear();

                    placed.send(VehiclePlaced {
                        entity,
                        tag: item.tag(),
                        position: snapped,
                    });
                    match tags.effects(item.tag()) {
                        Ok(effects) => {
                            sfx.send(PlaySfx(Sfx::Vehicle(effects.sfx_index)));
                        }
                        Err(err) => warn!("{err}, no placement sound"),
                    }
                }
                Placement::Rejected(Rejection::TagMismatch) => {
                    match origins.origin_of(&tags, item.tag()) {
                        Ok(origin) => {
                            transform.translation = origin.extend(transform.translation.z);
                        }
                        Err(err) => warn!("{err}, leaving it where it was dropped"),
                    }
                    sfx.send(PlaySfx(Sfx::Wrong));
                }
                Placement::Rejected(Rejection::OutOfTolerance) => {
                    sfx.send(PlaySfx(Sfx::Wrong));
                }
            }
        }
    }
}

/// Applies one frame of keyboard rotation and scaling to `item`.
pub fn apply_keyboard(
    item: &mut Item,
    keys: &ButtonInput<KeyCode>,
    controls: &ControlConfig,
    dt: f32,
) {
    let axis = |positive: KeyCode, negative: KeyCode| {
        f32::from(u8::from(keys.pressed(positive))) - f32::from(u8::from(keys.pressed(negative)))
    };

    let turn = axis(KeyCode::KeyZ, KeyCode::KeyX);
    if turn != 0.0 {
        item.rotate(turn * controls.rotate_speed * dt);
    }

    let grow = Vec2::new(
        axis(KeyCode::ArrowRight, KeyCode::ArrowLeft),
        axis(KeyCode::ArrowUp, KeyCode::ArrowDown),
    );
    if grow != Vec2::ZERO {
        item.set_scale(
            (item.scale() + grow * controls.scale_speed * dt)
                .clamp(Vec2::splat(controls.min_scale), Vec2::splat(controls.max_scale)),
        );
    }
}

fn transform_selected(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    config: Res<PuzzleConfig>,
    router: Res<InputRouter>,
    mut items: Query<&mut Item>,
) {
    let Some(entity) = router.selected.filter(|_| !router.dragging) else {
        return;
    };
    let Ok(mut item) = items.get_mut(entity) else {
        return;
    };
    if item.is_free() {
        apply_keyboard(&mut item, &keys, &config.controls, time.delta_secs());
    }
}

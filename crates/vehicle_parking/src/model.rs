use bevy::prelude::*;

use crate::tags::VehicleTag;

/// Game states that control the flow of the bit
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash, Default, States)]
pub enum GameState {
    #[default]
    Welcome,
    Playing,
    Won,
    Lost,
}

/// Placement status of a vehicle
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub enum ItemStatus {
    #[default]
    Free,
    Placed,
    Destroyed,
}

/// A draggable vehicle.
///
/// The orientation and scale stored here are authoritative; the entity's
/// `Transform` is synced from them every frame.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct Item {
    tag: VehicleTag,
    /// Degrees, always in `[0, 360)`
    angle: f32,
    scale: Vec2,
    status: ItemStatus,
}

impl Item {
    pub fn new(tag: VehicleTag, angle: f32, scale: Vec2) -> Self {
        Self {
            tag,
            angle: normalize_angle(angle),
            scale: scale.max(Vec2::ZERO),
            status: ItemStatus::Free,
        }
    }

    pub const fn tag(&self) -> VehicleTag {
        self.tag
    }

    pub const fn angle(&self) -> f32 {
        self.angle
    }

    pub fn set_angle(&mut self, degrees: f32) {
        self.angle = normalize_angle(degrees);
    }

    pub fn rotate(&mut self, degrees: f32) {
        self.set_angle(self.angle + degrees);
    }

    pub const fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale.max(Vec2::ZERO);
    }

    pub const fn status(&self) -> ItemStatus {
        self.status
    }

    pub fn is_free(&self) -> bool {
        self.status == ItemStatus::Free
    }

    /// Takes on the slot's pose and stops being interactive.
    pub fn lock_into(&mut self, slot: &Slot) {
        self.angle = slot.angle;
        self.scale = slot.scale;
        self.status = ItemStatus::Placed;
    }

    pub fn destroy(&mut self) {
        self.status = ItemStatus::Destroyed;
    }

    /// Transform rotation matching the item's orientation.
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_z(self.angle.to_radians())
    }
}

/// A stationary placeholder a vehicle must be dropped on.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Slot {
    tag: VehicleTag,
    /// Degrees, always in `[0, 360)`
    angle: f32,
    scale: Vec2,
}

impl Slot {
    pub fn new(tag: VehicleTag, angle: f32, scale: Vec2) -> Self {
        Self {
            tag,
            angle: normalize_angle(angle),
            scale: scale.max(Vec2::ZERO),
        }
    }

    pub const fn tag(&self) -> VehicleTag {
        self.tag
    }

    pub const fn angle(&self) -> f32 {
        self.angle
    }

    pub const fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_z(self.angle.to_radians())
    }
}

/// Wraps any angle in degrees into `[0, 360)`.
pub fn normalize_angle(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angles_are_normalized() {
        assert!((normalize_angle(370.0) - 10.0).abs() < 1e-4, "370 wraps to 10");
        assert!((normalize_angle(-90.0) - 270.0).abs() < 1e-4, "-90 wraps to 270");
        assert!(normalize_angle(360.0).abs() < 1e-4, "360 wraps to 0");
        assert!(normalize_angle(-1e-9) < 360.0, "tiny negatives stay in range");
    }

    #[test]
    fn rotating_an_item_keeps_it_in_range() {
        let mut item = Item::new(VehicleTag::Bus, 350.0, Vec2::ONE);
        item.rotate(15.0);
        assert!((item.angle() - 5.0).abs() < 1e-4, "350 + 15 wraps to 5");
        item.rotate(-10.0);
        assert!((item.angle() - 355.0).abs() < 1e-4, "5 - 10 wraps to 355");
    }

    #[test]
    fn negative_scale_is_clamped() {
        let item = Item::new(VehicleTag::Bus, 0.0, Vec2::new(-1.0, 0.5));
        assert_eq!(item.scale(), Vec2::new(0.0, 0.5), "scale is never negative");
        assert!(item.is_free(), "new items start free");
    }

    #[test]
    fn locking_copies_the_slot_pose() {
        let slot = Slot::new(VehicleTag::Bus, 90.0, Vec2::new(1.1, 0.9));
        let mut item = Item::new(VehicleTag::Bus, 93.0, Vec2::new(1.08, 0.93));
        item.lock_into(&slot);
        assert_eq!(item.status(), ItemStatus::Placed, "placed after locking");
        assert!((item.angle() - 90.0).abs() < 1e-4, "angle snapped");
        assert_eq!(item.scale(), slot.scale(), "scale snapped");
        assert!(!item.is_free(), "no longer draggable");
    }
}

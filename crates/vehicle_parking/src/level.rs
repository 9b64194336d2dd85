use std::collections::BTreeSet;

use bevy::prelude::*;

use crate::error::PuzzleError;
use crate::tags::VehicleTag;

/// A vehicle on the roster: its tag, paint and unscaled footprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleSpec {
    pub tag: VehicleTag,
    pub color: Color,
    pub size: Vec2,
}

/// The pose a vehicle must match to lock into its placeholder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotSpec {
    pub tag: VehicleTag,
    pub angle: f32,
    pub scale: Vec2,
}

const fn vehicle(tag: VehicleTag, color: Color, width: f32, height: f32) -> VehicleSpec {
    VehicleSpec {
        tag,
        color,
        size: Vec2::new(width, height),
    }
}

const fn slot(tag: VehicleTag, angle: f32, scale_x: f32, scale_y: f32) -> SlotSpec {
    SlotSpec {
        tag,
        angle,
        scale: Vec2::new(scale_x, scale_y),
    }
}

const CITY_VEHICLES: [VehicleSpec; 12] = [
    vehicle(VehicleTag::Garbage, Color::srgb(0.25, 0.55, 0.25), 90.0, 45.0),
    vehicle(VehicleTag::Ambulance, Color::srgb(0.92, 0.92, 0.88), 80.0, 40.0),
    vehicle(VehicleTag::FireTruck, Color::srgb(0.85, 0.15, 0.1), 95.0, 42.0),
    vehicle(VehicleTag::Bus, Color::srgb(0.95, 0.8, 0.15), 110.0, 40.0),
    vehicle(VehicleTag::E46, Color::srgb(0.2, 0.4, 0.85), 70.0, 35.0),
    vehicle(VehicleTag::E61, Color::srgb(0.1, 0.15, 0.45), 75.0, 35.0),
    vehicle(VehicleTag::B2, Color::srgb(0.55, 0.25, 0.7), 70.0, 38.0),
    vehicle(VehicleTag::Cement, Color::srgb(0.6, 0.6, 0.62), 90.0, 45.0),
    vehicle(VehicleTag::Excavator, Color::srgb(0.95, 0.55, 0.1), 85.0, 50.0),
    vehicle(VehicleTag::Police, Color::srgb(0.15, 0.25, 0.6), 75.0, 36.0),
    vehicle(VehicleTag::Tractor, Color::srgb(0.5, 0.8, 0.2), 70.0, 50.0),
    vehicle(VehicleTag::TractorTrailer, Color::srgb(0.45, 0.5, 0.2), 100.0, 45.0),
];

const CITY_SLOTS: [SlotSpec; 12] = [
    slot(VehicleTag::Garbage, 0.0, 1.0, 1.0),
    slot(VehicleTag::Ambulance, 90.0, 1.0, 1.0),
    slot(VehicleTag::FireTruck, 0.0, 1.1, 1.1),
    slot(VehicleTag::Bus, 180.0, 1.0, 0.9),
    slot(VehicleTag::E46, 45.0, 0.9, 0.9),
    slot(VehicleTag::E61, 0.0, 1.0, 1.0),
    slot(VehicleTag::B2, 270.0, 1.2, 1.0),
    slot(VehicleTag::Cement, 0.0, 1.0, 1.0),
    slot(VehicleTag::Excavator, 30.0, 1.0, 1.1),
    slot(VehicleTag::Police, 0.0, 0.9, 0.9),
    slot(VehicleTag::Tractor, 315.0, 1.0, 1.0),
    slot(VehicleTag::TractorTrailer, 0.0, 1.0, 1.0),
];

/// Where placeholders may appear: three rows of six in the upper half.
const CITY_SLOT_ANCHORS: [Vec2; 18] = [
    Vec2::new(-400.0, 190.0),
    Vec2::new(-240.0, 190.0),
    Vec2::new(-80.0, 190.0),
    Vec2::new(80.0, 190.0),
    Vec2::new(240.0, 190.0),
    Vec2::new(400.0, 190.0),
    Vec2::new(-400.0, 100.0),
    Vec2::new(-240.0, 100.0),
    Vec2::new(-80.0, 100.0),
    Vec2::new(80.0, 100.0),
    Vec2::new(240.0, 100.0),
    Vec2::new(400.0, 100.0),
    Vec2::new(-400.0, 10.0),
    Vec2::new(-240.0, 10.0),
    Vec2::new(-80.0, 10.0),
    Vec2::new(80.0, 10.0),
    Vec2::new(240.0, 10.0),
    Vec2::new(400.0, 10.0),
];

/// Where vehicles may start: the parking strip along the bottom.
const CITY_VEHICLE_ANCHORS: [Vec2; 13] = [
    Vec2::new(-420.0, -110.0),
    Vec2::new(-280.0, -110.0),
    Vec2::new(-140.0, -110.0),
    Vec2::new(0.0, -110.0),
    Vec2::new(140.0, -110.0),
    Vec2::new(280.0, -110.0),
    Vec2::new(420.0, -110.0),
    Vec2::new(-350.0, -210.0),
    Vec2::new(-210.0, -210.0),
    Vec2::new(-70.0, -210.0),
    Vec2::new(70.0, -210.0),
    Vec2::new(210.0, -210.0),
    Vec2::new(350.0, -210.0),
];

/// Vehicles, placeholders and the anchor points they get shuffled onto.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct LevelLayout {
    pub vehicles: Vec<VehicleSpec>,
    pub slots: Vec<SlotSpec>,
    pub vehicle_anchors: Vec<Vec2>,
    pub slot_anchors: Vec<Vec2>,
}

impl Default for LevelLayout {
    fn default() -> Self {
        Self::city()
    }
}

/// Tags present on only one side of a layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagReport {
    pub slots_without_vehicle: Vec<VehicleTag>,
    pub vehicles_without_slot: Vec<VehicleTag>,
}

impl TagReport {
    pub fn is_clean(&self) -> bool {
        self.slots_without_vehicle.is_empty() && self.vehicles_without_slot.is_empty()
    }
}

impl LevelLayout {
    pub fn city() -> Self {
        Self {
            vehicles: CITY_VEHICLES.to_vec(),
            slots: CITY_SLOTS.to_vec(),
            vehicle_anchors: CITY_VEHICLE_ANCHORS.to_vec(),
            slot_anchors: CITY_SLOT_ANCHORS.to_vec(),
        }
    }

    pub fn roster(&self) -> Vec<VehicleTag> {
        self.vehicles.iter().map(|spec| spec.tag).collect()
    }

    pub fn vehicle_spec(&self, tag: VehicleTag) -> Option<&VehicleSpec> {
        self.vehicles.iter().find(|spec| spec.tag == tag)
    }

    /// Number of vehicles that actually get a starting anchor.
    pub fn playable_vehicles(&self) -> usize {
        self.vehicles.len().min(self.vehicle_anchors.len())
    }

    pub fn validate(&self) -> Result<(), PuzzleError> {
        if self.vehicles.is_empty() {
            return Err(PuzzleError::Configuration("no vehicles assigned".to_owned()));
        }
        if self.vehicle_anchors.is_empty() {
            return Err(PuzzleError::Configuration(
                "no starting anchors for vehicles".to_owned(),
            ));
        }
        if self.slots.is_empty() || self.slot_anchors.is_empty() {
            return Err(PuzzleError::Configuration(
                "no placeholders to drop vehicles on".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn tag_report(&self) -> TagReport {
        let vehicle_tags: BTreeSet<_> = self.vehicles.iter().map(|spec| spec.tag).collect();
        let slot_tags: BTreeSet<_> = self.slots.iter().map(|spec| spec.tag).collect();

        TagReport {
            slots_without_vehicle: slot_tags.difference(&vehicle_tags).copied().collect(),
            vehicles_without_slot: vehicle_tags.difference(&slot_tags).copied().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_layout_is_complete() {
        let layout = LevelLayout::city();
        assert_eq!(layout.validate(), Ok(()), "city layout validates");
        assert!(layout.tag_report().is_clean(), "every vehicle has a placeholder");
        assert_eq!(layout.playable_vehicles(), 12, "twelve vehicles to park");
        assert!(
            layout.slot_anchors.len() >= layout.slots.len(),
            "enough room for every placeholder"
        );
    }

    #[test]
    fn empty_roster_is_a_configuration_error() {
        let layout = LevelLayout {
            vehicles: Vec::new(),
            ..LevelLayout::city()
        };
        assert!(
            matches!(layout.validate(), Err(PuzzleError::Configuration(_))),
            "no vehicles, no game"
        );
    }

    #[test]
    fn report_lists_one_sided_tags() {
        let mut layout = LevelLayout::city();
        layout.vehicles.retain(|spec| spec.tag != VehicleTag::Bus);
        layout.slots.retain(|spec| spec.tag != VehicleTag::Police);

        let report = layout.tag_report();
        assert_eq!(report.slots_without_vehicle, vec![VehicleTag::Bus], "bus slot is orphaned");
        assert_eq!(
            report.vehicles_without_slot,
            vec![VehicleTag::Police],
            "police car has nowhere to go"
        );
    }
}

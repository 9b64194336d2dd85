use crate::model::{Item, Slot};

/// Angular and size window within which a drop is accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Maximum orientation difference in degrees, measured across the 0/360 seam
    pub max_angle: f32,
    /// Maximum per-axis scale difference
    pub max_scale_delta: f32,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            max_angle: 5.0,
            max_scale_delta: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Dropped on a slot of another vehicle; the vehicle goes back to its origin.
    TagMismatch,
    /// Right slot, wrong orientation or size; the vehicle stays where it was released.
    OutOfTolerance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Accepted,
    Rejected(Rejection),
}

impl Placement {
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl Tolerance {
    pub fn angle_matches(&self, item_angle: f32, slot_angle: f32) -> bool {
        let diff = (item_angle - slot_angle).abs();
        diff <= self.max_angle || diff >= 360.0 - self.max_angle
    }

    pub fn scale_matches(&self, item: &Item, slot: &Slot) -> bool {
        let delta = (item.scale() - slot.scale()).abs();
        delta.x <= self.max_scale_delta && delta.y <= self.max_scale_delta
    }

    /// Decides whether `item` may lock into `slot`.
    pub fn evaluate(&self, item: &Item, slot: &Slot) -> Placement {
        if item.tag() != slot.tag() {
            return Placement::Rejected(Rejection::TagMismatch);
        }

        if self.angle_matches(item.angle(), slot.angle()) && self.scale_matches(item, slot) {
            Placement::Accepted
        } else {
            Placement::Rejected(Rejection::OutOfTolerance)
        }
    }
}

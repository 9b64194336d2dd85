use std::collections::HashMap;

use bevy::prelude::*;
use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator};

use crate::error::PuzzleError;

/// Tag class shared by a vehicle and the slot it belongs in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter, EnumCount,
)]
pub enum VehicleTag {
    #[strum(to_string = "Garbage")]
    Garbage,
    #[strum(to_string = "Ambulance")]
    Ambulance,
    #[strum(to_string = "Fire")]
    FireTruck,
    #[strum(to_string = "Bus")]
    Bus,
    #[strum(to_string = "E46")]
    E46,
    #[strum(to_string = "E61")]
    E61,
    #[strum(to_string = "B2")]
    B2,
    #[strum(to_string = "Cement")]
    Cement,
    #[strum(to_string = "Excavator")]
    Excavator,
    #[strum(to_string = "Police")]
    Police,
    #[strum(to_string = "Tractor")]
    Tractor,
    #[strum(to_string = "Tractor 2")]
    TractorTrailer,
}

impl VehicleTag {
    /// Position of the tag in declaration order, used to pick its placement sound.
    pub fn ordinal(self) -> usize {
        Self::iter().position(|tag| tag == self).unwrap_or_default()
    }
}

/// Per-tag lookup data resolved once at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagEffects {
    /// Index into the origin registry used to reset a misplaced vehicle.
    pub reset_index: usize,
    /// Index into the vehicle placement sounds.
    pub sfx_index: usize,
}

#[derive(Resource, Debug, Default, Clone)]
pub struct TagTable {
    entries: HashMap<VehicleTag, TagEffects>,
}

impl TagTable {
    /// Builds the table from the ordered vehicle roster of a level.
    /// The reset index of a tag is the roster position of its vehicle.
    pub fn from_roster(roster: &[VehicleTag]) -> Result<Self, PuzzleError> {
        let mut entries = HashMap::with_capacity(roster.len());
        for (reset_index, &tag) in roster.iter().enumerate() {
            let effects = TagEffects {
                reset_index,
                sfx_index: tag.ordinal(),
            };
            if entries.insert(tag, effects).is_some() {
                return Err(PuzzleError::Configuration(format!(
                    "vehicle tag {tag} appears more than once in the roster"
                )));
            }
        }
        Ok(Self { entries })
    }

    pub fn effects(&self, tag: VehicleTag) -> Result<TagEffects, PuzzleError> {
        self.entries
            .get(&tag)
            .copied()
            .ok_or(PuzzleError::UnknownTag(tag))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

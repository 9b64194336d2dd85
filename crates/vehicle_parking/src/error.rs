use thiserror::Error;

use crate::tags::VehicleTag;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("Invalid puzzle configuration: {0}")]
    Configuration(String),

    #[error("No origin recorded for vehicle {0}")]
    LookupMiss(VehicleTag),

    #[error("Tag {0} is not registered for this level")]
    UnknownTag(VehicleTag),
}

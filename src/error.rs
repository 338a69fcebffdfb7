use crate::model::NatureTarget;
use thiserror::Error;

/// Rejected input. Nothing here is clamped or repaired; callers fix the config.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Species with no {0} not found")]
    UnknownSpeciesId(u32),

    #[error("Species with name {0} not found")]
    UnknownSpeciesName(String),

    #[error("Level {0} is outside 1..=100")]
    LevelOutOfRange(u8),

    #[error("{stat} EV {value} exceeds the per-stat cap of {cap}")]
    EffortOverCap { stat: &'static str, value: u16, cap: u16 },

    #[error("EV total {total} exceeds the cap of {cap}")]
    EffortTotalOverCap { total: u32, cap: u16 },

    #[error("{stat} IV {value} exceeds the cap of {cap}")]
    IndividualOverCap { stat: &'static str, value: u8, cap: u8 },

    #[error("Nature raises and lowers the same stat ({0:?})")]
    NatureConflict(NatureTarget),
}

use crate::ids::ColonyId;
use crate::stock::Stock;
use thiserror::Error;

/// Error types for the colony simulation
#[derive(Error, Debug)]
pub enum SimError {
    /// No colony with this id exists
    #[error("unknown colony: {0}")]
    UnknownColony(ColonyId),

    /// Colony already holds its maximum number of ants
    #[error("colony {colony} is at its ant limit ({max})")]
    PopulationCap { colony: ColonyId, max: u32 },

    /// Colony stock does not cover a cost
    #[error("colony {colony} needs {needed} but holds {available}")]
    InsufficientStock {
        colony: ColonyId,
        needed: Stock,
        available: Stock,
    },

    /// Only the primary colony may found new colonies
    #[error("colony {0} is not the primary colony")]
    NotPrimary(ColonyId),

    /// A command needs the primary colony but none was placed yet
    #[error("no colony has been placed yet")]
    NoPrimaryColony,

    /// A placement was issued while not in placing mode
    #[error("not in colony placing mode")]
    NotPlacing,

    /// Position string could not be parsed
    #[error("invalid position: {0}")]
    InvalidPosition(String),

    /// Configuration value out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid TOML
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, SimError>;

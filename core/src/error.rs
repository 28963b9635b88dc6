//! Recoverable failures reported by the engine and their player-facing tags.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Map carving failed; callers retry with a new seed.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenerationError {
    /// The requested dimensions cannot hold a spawn and a core.
    #[error("a {columns}x{rows} map cannot hold a route")]
    InvalidDimensions {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// No route satisfying the constraints was carved within the attempt budget.
    #[error("no valid route found after {attempts} attempts")]
    RouteNotFound {
        /// Number of carving attempts made.
        attempts: u32,
    },
    /// An explicitly provided route is not a simple connected path.
    #[error("route is not a simple connected path inside the map")]
    InvalidRoute,
}

/// Reasons a tower build request may be rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildError {
    /// The tile is outside the map, not empty ground, or already holds a tower.
    #[error("tile is not buildable")]
    InvalidPosition,
    /// The pool cannot cover the tower's cost.
    #[error("insufficient resources")]
    InsufficientResources,
}

/// Reasons a tower upgrade request may be rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeError {
    /// No tower stands on the tile.
    #[error("no tower at this position")]
    NoTower,
    /// The tower already reached the highest level.
    #[error("tower is already at the highest level")]
    MaxLevel,
    /// The pool cannot cover the upgrade's cost.
    #[error("insufficient resources")]
    InsufficientResources,
}

/// Reasons a trade may be rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeError {
    /// The faction does not trade.
    #[error("faction refuses to trade")]
    NoTradeAvailable,
    /// The offer index does not name a current offer.
    #[error("no such offer")]
    InvalidIndex,
    /// The pool cannot cover the give side of the offer.
    #[error("insufficient resources")]
    InsufficientResources,
}

/// In-game result tag reported for every player command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultTag {
    /// The command took effect.
    Success,
    /// The pool could not cover the cost.
    InsufficientResources,
    /// The addressed tile cannot serve the command.
    InvalidPosition,
    /// The addressed offer or catalog entry does not exist.
    InvalidIndex,
    /// The addressed faction does not trade.
    NoTradeAvailable,
    /// The addressed tower cannot be upgraded further.
    MaxLevel,
    /// The command is not available in the current phase or mode.
    Unavailable,
}

impl From<BuildError> for ResultTag {
    fn from(error: BuildError) -> Self {
        match error {
            BuildError::InvalidPosition => Self::InvalidPosition,
            BuildError::InsufficientResources => Self::InsufficientResources,
        }
    }
}

impl From<UpgradeError> for ResultTag {
    fn from(error: UpgradeError) -> Self {
        match error {
            UpgradeError::NoTower => Self::InvalidPosition,
            UpgradeError::MaxLevel => Self::MaxLevel,
            UpgradeError::InsufficientResources => Self::InsufficientResources,
        }
    }
}

impl From<TradeError> for ResultTag {
    fn from(error: TradeError) -> Self {
        match error {
            TradeError::NoTradeAvailable => Self::NoTradeAvailable,
            TradeError::InvalidIndex => Self::InvalidIndex,
            TradeError::InsufficientResources => Self::InsufficientResources,
        }
    }
}

//! Error types for the session layer.

use robodino_core::{ActorId, Coordinates, StepRejection};

/// Broad classification of a [`SessionError`], stable across message changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request needs state that does not exist yet.
    Unprocessable,
    /// The request carried a value outside its allowed range.
    Invalid,
    /// Coordinates fall outside the grid.
    OutOfRange,
    /// The request collides with an existing occupant.
    Conflict,
    /// The addressed actor is not registered.
    NotFound,
}

impl ErrorKind {
    /// Short label for the classification.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unprocessable => "unprocessable",
            Self::Invalid => "invalid",
            Self::OutOfRange => "out-of-range",
            Self::Conflict => "conflict",
            Self::NotFound => "not-found",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during session operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// No grid has been created yet.
    #[error("a grid must be created first")]
    NoGrid,

    /// Grid dimensions must both be at least one.
    #[error("grid dimensions {width}x{height} are invalid: both must be at least 1")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// Placement coordinates fall outside the grid.
    #[error(
        "({x}, {y}) is out of bounds: x must be in [0; {}] and y in [0; {}]",
        .width.saturating_sub(1),
        .height.saturating_sub(1)
    )]
    OutOfBounds {
        /// Requested column.
        x: i64,
        /// Requested row.
        y: i64,
        /// Width of the active grid.
        width: u32,
        /// Height of the active grid.
        height: u32,
    },

    /// The target tile already holds an actor.
    #[error("tile {0} is not empty")]
    TileOccupied(Coordinates),

    /// Vessel health must be positive and within the configured maximum.
    #[error("health {health} is invalid: must be in [1; {max}]")]
    InvalidHealth {
        /// Requested health.
        health: u32,
        /// Configured maximum.
        max: u32,
    },

    /// No mover is registered under the identifier.
    #[error("mover {0} not found")]
    MoverNotFound(ActorId),

    /// No vessel is registered under the identifier.
    #[error("vessel {0} not found")]
    VesselNotFound(ActorId),

    /// The grid refused to move the mover; nothing changed.
    #[error("mover {id} cannot move: {reason}")]
    StepRejected {
        /// Mover that attempted to move.
        id: ActorId,
        /// Why the grid refused.
        reason: StepRejection,
    },
}

impl SessionError {
    /// Classifies the error for callers that map failures onto their own codes.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NoGrid => ErrorKind::Unprocessable,
            Self::InvalidDimensions { .. } | Self::InvalidHealth { .. } => ErrorKind::Invalid,
            Self::OutOfBounds { .. } => ErrorKind::OutOfRange,
            Self::StepRejected {
                reason: StepRejection::OutOfBounds,
                ..
            } => ErrorKind::OutOfRange,
            Self::TileOccupied(_)
            | Self::StepRejected {
                reason: StepRejection::Occupied,
                ..
            } => ErrorKind::Conflict,
            Self::MoverNotFound(_) | Self::VesselNotFound(_) => ErrorKind::NotFound,
        }
    }
}

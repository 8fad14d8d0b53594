#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Robodino simulation.
//!
//! This crate defines the vocabulary that connects adapters, the
//! authoritative grid, and the session layer. Callers submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values that the
//! session reacts to when maintaining its actor registries.

use std::{borrow::Borrow, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Commands that express all permissible grid mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Places a new mover on the grid.
    ///
    /// The caller must have verified that `at` lies within the grid and that
    /// the tile is empty.
    SpawnMover {
        /// Opaque identifier supplied by the caller.
        id: ActorId,
        /// Tile the mover occupies after spawning.
        at: Coordinates,
        /// Direction the mover initially faces.
        facing: Direction,
    },
    /// Places a new vessel on the grid with a full health pool.
    ///
    /// Same preconditions as [`Command::SpawnMover`].
    SpawnVessel {
        /// Opaque identifier supplied by the caller.
        id: ActorId,
        /// Tile the vessel occupies after spawning.
        at: Coordinates,
        /// Starting and maximum health of the vessel.
        health: u32,
    },
    /// Rotates a mover by ninety degrees.
    TurnMover {
        /// Mover that should turn.
        mover: MoverKey,
        /// Rotation to apply.
        turn: Turn,
    },
    /// Moves a mover one tile relative to its facing.
    StepMover {
        /// Mover that should move.
        mover: MoverKey,
        /// Whether to move with or against the current facing.
        step: Step,
    },
    /// Makes a mover strike every vessel cardinally adjacent to it.
    Attack {
        /// Mover performing the attack.
        mover: MoverKey,
    },
    /// Deals a single point of damage to a vessel.
    HitVessel {
        /// Vessel receiving the damage.
        vessel: VesselKey,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a mover was placed on the grid.
    MoverSpawned {
        /// Handle allocated by the grid.
        mover: MoverKey,
        /// Identifier supplied by the caller.
        id: ActorId,
        /// Tile the mover occupies.
        at: Coordinates,
        /// Direction the mover faces.
        facing: Direction,
    },
    /// Confirms that a vessel was placed on the grid.
    VesselSpawned {
        /// Handle allocated by the grid.
        vessel: VesselKey,
        /// Identifier supplied by the caller.
        id: ActorId,
        /// Tile the vessel occupies.
        at: Coordinates,
        /// Starting and maximum health of the vessel.
        health: u32,
    },
    /// Reports that a mover changed its facing.
    MoverTurned {
        /// Mover that turned.
        mover: MoverKey,
        /// Facing before the turn.
        from: Direction,
        /// Facing after the turn.
        to: Direction,
    },
    /// Confirms that a mover moved between two adjacent tiles.
    MoverStepped {
        /// Mover that moved.
        mover: MoverKey,
        /// Tile the mover occupied before moving.
        from: Coordinates,
        /// Tile the mover occupies after moving.
        to: Coordinates,
    },
    /// Reports that a step request was refused and nothing changed.
    StepRejected {
        /// Mover whose step was refused.
        mover: MoverKey,
        /// Step that was requested.
        step: Step,
        /// Specific reason the step failed.
        reason: StepRejection,
    },
    /// Reports that a vessel lost a point of health.
    VesselHit {
        /// Vessel that was hit.
        vessel: VesselKey,
        /// Health remaining after the hit.
        health: u32,
    },
    /// Reports that a vessel ran out of health and left the grid.
    VesselDestroyed {
        /// Vessel that was destroyed.
        vessel: VesselKey,
        /// Identifier the vessel was created with.
        id: ActorId,
        /// Tile the vessel occupied before it was cleared.
        at: Coordinates,
    },
}

/// Cardinal directions used both for facing and for neighbour slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// Toward decreasing row indices.
    Up,
    /// Toward increasing row indices.
    Down,
    /// Toward decreasing column indices.
    Left,
    /// Toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in neighbour-slot order.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Returns the facing obtained by rotating ninety degrees.
    ///
    /// Right turns walk the cycle `Up → Right → Down → Left → Up`, left
    /// turns walk it in reverse.
    #[must_use]
    pub const fn turned(self, turn: Turn) -> Self {
        match (self, turn) {
            (Self::Up, Turn::Left) => Self::Left,
            (Self::Up, Turn::Right) => Self::Right,
            (Self::Left, Turn::Left) => Self::Down,
            (Self::Left, Turn::Right) => Self::Up,
            (Self::Down, Turn::Left) => Self::Right,
            (Self::Down, Turn::Right) => Self::Left,
            (Self::Right, Turn::Left) => Self::Up,
            (Self::Right, Turn::Right) => Self::Down,
        }
    }

    /// Direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Resolves a step relative to this facing into an absolute direction.
    #[must_use]
    pub const fn resolve(self, step: Step) -> Self {
        match step {
            Step::Forward => self,
            Step::Backward => self.opposite(),
        }
    }

    /// Arrow used when rendering a mover facing this direction.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Up => '↑',
            Self::Down => '↓',
            Self::Left => '←',
            Self::Right => '→',
        }
    }

    /// Canonical upper-case token for the direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ParseTokenError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.to_ascii_uppercase().as_str() {
            "UP" | "U" => Ok(Self::Up),
            "DOWN" | "D" => Ok(Self::Down),
            "LEFT" | "L" => Ok(Self::Left),
            "RIGHT" | "R" => Ok(Self::Right),
            _ => Err(ParseTokenError::new("direction", token)),
        }
    }
}

/// Ninety-degree rotations available to movers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Turn {
    /// Counter-clockwise rotation.
    Left,
    /// Clockwise rotation.
    Right,
}

impl Turn {
    /// Rotation that undoes this one.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
        })
    }
}

impl FromStr for Turn {
    type Err = ParseTokenError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.to_ascii_uppercase().as_str() {
            "LEFT" | "L" => Ok(Self::Left),
            "RIGHT" | "R" => Ok(Self::Right),
            _ => Err(ParseTokenError::new("turn", token)),
        }
    }
}

/// Movement relative to a mover's facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Step {
    /// One tile in the facing direction.
    Forward,
    /// One tile against the facing direction.
    Backward,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Forward => "FORWARD",
            Self::Backward => "BACKWARD",
        })
    }
}

impl FromStr for Step {
    type Err = ParseTokenError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.to_ascii_uppercase().as_str() {
            "FORWARD" | "F" => Ok(Self::Forward),
            "BACKWARD" | "B" => Ok(Self::Backward),
            _ => Err(ParseTokenError::new("step", token)),
        }
    }
}

/// Error produced when a textual direction, turn, or step token is unknown.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} token '{token}'")]
pub struct ParseTokenError {
    kind: &'static str,
    token: String,
}

impl ParseTokenError {
    fn new(kind: &'static str, token: &str) -> Self {
        Self {
            kind,
            token: token.to_owned(),
        }
    }

    /// Name of the token family that failed to parse.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.kind
    }

    /// The token exactly as it was supplied.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Result of asking a mover to step onto a neighbouring tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// The mover now occupies the neighbouring tile.
    Moved,
    /// The neighbouring tile lies outside the grid.
    OutOfBounds,
    /// The neighbouring tile already holds an occupant.
    Occupied,
}

impl MoveOutcome {
    /// Returns the rejection reason, or `None` when the mover moved.
    #[must_use]
    pub const fn rejection(self) -> Option<StepRejection> {
        match self {
            Self::Moved => None,
            Self::OutOfBounds => Some(StepRejection::OutOfBounds),
            Self::Occupied => Some(StepRejection::Occupied),
        }
    }
}

impl fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Moved => "OK",
            Self::OutOfBounds => "OUT OF BOUNDS",
            Self::Occupied => "OCCUPIED",
        })
    }
}

/// Reasons a step request may be refused by the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepRejection {
    /// The destination lies outside the grid.
    OutOfBounds,
    /// The destination tile is occupied.
    Occupied,
}

impl fmt::Display for StepRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OutOfBounds => "destination is out of bounds",
            Self::Occupied => "destination tile is not empty",
        })
    }
}

/// Location of a single tile expressed as column and row.
///
/// Serializes as a `[x, y]` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct Coordinates {
    x: u32,
    y: u32,
}

impl Coordinates {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Coordinate one tile away in `direction`.
    ///
    /// Returns `None` when the result would be negative or overflow; the
    /// upper grid bound is the caller's concern.
    #[must_use]
    pub fn neighbor(self, direction: Direction) -> Option<Self> {
        match direction {
            Direction::Up => self.y.checked_sub(1).map(|y| Self::new(self.x, y)),
            Direction::Down => self.y.checked_add(1).map(|y| Self::new(self.x, y)),
            Direction::Left => self.x.checked_sub(1).map(|x| Self::new(x, self.y)),
            Direction::Right => self.x.checked_add(1).map(|x| Self::new(x, self.y)),
        }
    }
}

impl From<[u32; 2]> for Coordinates {
    fn from([x, y]: [u32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Coordinates> for [u32; 2] {
    fn from(coordinates: Coordinates) -> Self {
        [coordinates.x, coordinates.y]
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Opaque identifier supplied by whoever creates an actor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    /// Wraps the provided string as an identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrows the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ActorId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActorId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ActorId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Handle to a mover allocated by a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MoverKey(u32);

impl MoverKey {
    /// Creates a new mover handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Handle to a vessel allocated by a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VesselKey(u32);

impl VesselKey {
    /// Creates a new vessel handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Immutable representation of a single mover's state used for queries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoverSnapshot {
    /// Identifier supplied when the mover was created.
    pub id: ActorId,
    /// Tile currently occupied by the mover.
    pub coordinates: Coordinates,
    /// Direction the mover faces.
    pub facing: Direction,
}

/// Immutable representation of a single vessel's state used for queries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VesselSnapshot {
    /// Identifier supplied when the vessel was created.
    pub id: ActorId,
    /// Tile currently (or, once destroyed, last) occupied by the vessel.
    pub coordinates: Coordinates,
    /// Remaining health.
    pub health: u32,
    /// Health the vessel was created with.
    pub max_health: u32,
}

/// Read-only snapshot of every registered actor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Movers in creation order.
    pub movers: Vec<MoverSnapshot>,
    /// Vessels in creation order.
    pub vessels: Vec<VesselSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_table_matches_rotation_cycle() {
        assert_eq!(Direction::Up.turned(Turn::Left), Direction::Left);
        assert_eq!(Direction::Up.turned(Turn::Right), Direction::Right);
        assert_eq!(Direction::Left.turned(Turn::Left), Direction::Down);
        assert_eq!(Direction::Left.turned(Turn::Right), Direction::Up);
        assert_eq!(Direction::Down.turned(Turn::Left), Direction::Right);
        assert_eq!(Direction::Down.turned(Turn::Right), Direction::Left);
        assert_eq!(Direction::Right.turned(Turn::Left), Direction::Up);
        assert_eq!(Direction::Right.turned(Turn::Right), Direction::Down);
    }

    #[test]
    fn four_turns_in_one_direction_are_identity() {
        for facing in Direction::ALL {
            for turn in [Turn::Left, Turn::Right] {
                let mut current = facing;
                for _ in 0..4 {
                    current = current.turned(turn);
                }
                assert_eq!(current, facing, "four {turn} turns from {facing}");
            }
        }
    }

    #[test]
    fn opposite_turns_cancel_out() {
        for facing in Direction::ALL {
            for turn in [Turn::Left, Turn::Right] {
                assert_eq!(facing.turned(turn).turned(turn.inverse()), facing);
            }
        }
    }

    #[test]
    fn two_turns_face_the_opposite_way() {
        for facing in Direction::ALL {
            assert_eq!(
                facing.turned(Turn::Right).turned(Turn::Right),
                facing.opposite()
            );
        }
    }

    #[test]
    fn backward_resolves_against_facing() {
        assert_eq!(Direction::Up.resolve(Step::Forward), Direction::Up);
        assert_eq!(Direction::Up.resolve(Step::Backward), Direction::Down);
        assert_eq!(Direction::Left.resolve(Step::Backward), Direction::Right);
    }

    #[test]
    fn neighbor_refuses_negative_coordinates() {
        let origin = Coordinates::new(0, 0);
        assert_eq!(origin.neighbor(Direction::Left), None);
        assert_eq!(origin.neighbor(Direction::Up), None);
        assert_eq!(
            origin.neighbor(Direction::Right),
            Some(Coordinates::new(1, 0))
        );
        assert_eq!(
            origin.neighbor(Direction::Down),
            Some(Coordinates::new(0, 1))
        );
    }

    #[test]
    fn tokens_parse_case_insensitively() {
        assert_eq!("up".parse::<Direction>(), Ok(Direction::Up));
        assert_eq!("R".parse::<Direction>(), Ok(Direction::Right));
        assert_eq!("Left".parse::<Turn>(), Ok(Turn::Left));
        assert_eq!("backward".parse::<Step>(), Ok(Step::Backward));
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        let error = "SIDEWAYS".parse::<Step>().expect_err("token must be rejected");
        assert_eq!(error.kind(), "step");
        assert_eq!(error.token(), "SIDEWAYS");
        assert_eq!(error.to_string(), "unknown step token 'SIDEWAYS'");
    }

    #[test]
    fn move_outcome_reports_rejections() {
        assert_eq!(MoveOutcome::Moved.rejection(), None);
        assert_eq!(
            MoveOutcome::OutOfBounds.rejection(),
            Some(StepRejection::OutOfBounds)
        );
        assert_eq!(MoveOutcome::Occupied.to_string(), "OCCUPIED");
        assert_eq!(MoveOutcome::OutOfBounds.to_string(), "OUT OF BOUNDS");
    }

    #[test]
    fn simulation_state_round_trips_through_bincode() {
        let state = SimulationState {
            movers: vec![MoverSnapshot {
                id: ActorId::new("0"),
                coordinates: Coordinates::new(3, 2),
                facing: Direction::Down,
            }],
            vessels: vec![VesselSnapshot {
                id: ActorId::new("0"),
                coordinates: Coordinates::new(3, 3),
                health: 1,
                max_health: 2,
            }],
        };
        let bytes = bincode::serialize(&state).expect("serialize");
        let restored: SimulationState = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, state);
    }

    #[test]
    fn directions_serialize_as_upper_case_tokens() {
        let json = serde_json::to_string(&Direction::Left).expect("serialize");
        assert_eq!(json, "\"LEFT\"");
        let id = serde_json::to_string(&ActorId::new("7")).expect("serialize");
        assert_eq!(id, "\"7\"");
    }

    #[test]
    fn coordinates_serialize_as_pairs() {
        let json = serde_json::to_string(&Coordinates::new(3, 2)).expect("serialize");
        assert_eq!(json, "[3,2]");
        let parsed: Coordinates = serde_json::from_str("[4,5]").expect("deserialize");
        assert_eq!(parsed, Coordinates::new(4, 5));
    }
}

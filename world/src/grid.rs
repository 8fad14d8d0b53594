//! Tile storage, neighbour links, and occupancy for the authoritative grid.

use robodino_core::{ActorId, Coordinates, Direction, MoverKey, VesselKey};

use crate::actors::{MoverRecord, VesselRecord};

/// Actor currently standing on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Occupant {
    /// A directional mover.
    Mover(MoverKey),
    /// A health-bearing vessel.
    Vessel(VesselKey),
}

/// Cached links from a tile to its four cardinal neighbours.
///
/// A slot is empty when the neighbour would fall outside the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Neighbors {
    left: Option<Coordinates>,
    right: Option<Coordinates>,
    up: Option<Coordinates>,
    down: Option<Coordinates>,
}

impl Neighbors {
    /// Link in the provided direction, if the neighbour exists.
    #[must_use]
    pub const fn get(&self, direction: Direction) -> Option<Coordinates> {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }

    /// Iterates over the present links in neighbour-slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, Coordinates)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(|direction| self.get(direction).map(|link| (direction, link)))
    }

    fn set(&mut self, direction: Direction, link: Option<Coordinates>) {
        let slot = match direction {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
        };
        *slot = link;
    }
}

/// A single addressable cell of the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    coordinates: Coordinates,
    occupant: Option<Occupant>,
    neighbors: Neighbors,
}

impl Tile {
    fn new(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            occupant: None,
            neighbors: Neighbors::default(),
        }
    }

    /// Location of the tile.
    #[must_use]
    pub const fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    /// Actor standing on the tile, if any.
    #[must_use]
    pub const fn occupant(&self) -> Option<Occupant> {
        self.occupant
    }

    /// Reports whether the tile holds no actor.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    /// Links to the four cardinal neighbours.
    #[must_use]
    pub const fn neighbors(&self) -> &Neighbors {
        &self.neighbors
    }

    /// Overwrites the occupant without checking whether the tile was empty.
    fn place(&mut self, occupant: Occupant) {
        self.occupant = Some(occupant);
    }

    fn clear(&mut self) {
        self.occupant = None;
    }
}

/// Rectangular board that owns every tile and actor record.
///
/// Tiles are stored in row-major order. Actors never own a reference back to
/// the grid; they are addressed through [`MoverKey`] and [`VesselKey`]
/// handles that index the grid's own records.
#[derive(Clone, Debug)]
pub struct Grid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
    pub(crate) movers: Vec<MoverRecord>,
    pub(crate) vessels: Vec<VesselRecord>,
}

impl Grid {
    /// Builds a `width` × `height` grid of empty tiles.
    ///
    /// Dimensions are expected to be at least one; a zero dimension yields a
    /// grid without tiles.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let capacity_u64 = u64::from(width) * u64::from(height);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        let mut tiles = Vec::with_capacity(capacity);
        for y in 0..height {
            for x in 0..width {
                tiles.push(Tile::new(Coordinates::new(x, y)));
            }
        }

        let mut grid = Self {
            width,
            height,
            tiles,
            movers: Vec::new(),
            vessels: Vec::new(),
        };
        grid.link_neighbors();
        grid
    }

    // Runs once every tile exists, so each link can be validated against the
    // finished layout.
    fn link_neighbors(&mut self) {
        for index in 0..self.tiles.len() {
            let origin = self.tiles[index].coordinates;
            let mut neighbors = Neighbors::default();
            for direction in Direction::ALL {
                let link = origin
                    .neighbor(direction)
                    .filter(|candidate| self.contains(*candidate));
                neighbors.set(direction, link);
            }
            self.tiles[index].neighbors = neighbors;
        }
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the coordinate addresses a tile of this grid.
    #[must_use]
    pub const fn contains(&self, at: Coordinates) -> bool {
        at.x() < self.width && at.y() < self.height
    }

    /// Tile at `(x, y)`, or `None` when out of range.
    #[must_use]
    pub fn tile(&self, x: u32, y: u32) -> Option<&Tile> {
        self.tile_at(Coordinates::new(x, y))
    }

    /// Tile at the provided coordinate, or `None` when out of range.
    #[must_use]
    pub fn tile_at(&self, at: Coordinates) -> Option<&Tile> {
        self.index(at).and_then(|index| self.tiles.get(index))
    }

    /// Follows the cached link of the tile at `from` in `direction`.
    #[must_use]
    pub fn neighbor(&self, from: Coordinates, direction: Direction) -> Option<&Tile> {
        self.tile_at(from)
            .and_then(|tile| tile.neighbors.get(direction))
            .and_then(|link| self.tile_at(link))
    }

    /// Iterates over every tile in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Actor standing at the provided coordinate, if any.
    #[must_use]
    pub fn occupant_at(&self, at: Coordinates) -> Option<Occupant> {
        self.tile_at(at).and_then(Tile::occupant)
    }

    /// Places `occupant` on the tile at `at`, replacing whatever stood there.
    ///
    /// Callers are responsible for checking bounds and emptiness first.
    /// Out-of-range coordinates are ignored.
    pub fn place(&mut self, at: Coordinates, occupant: Occupant) {
        let Some(tile) = self.tile_at_mut(at) else {
            tracing::warn!(%at, ?occupant, "placement outside the grid ignored");
            return;
        };
        if let Some(previous) = tile.occupant {
            tracing::warn!(%at, ?previous, ?occupant, "placement overwrote an occupied tile");
        }
        tile.place(occupant);
    }

    /// Empties the tile at `at`. Out-of-range coordinates are ignored.
    pub fn clear(&mut self, at: Coordinates) {
        if let Some(tile) = self.tile_at_mut(at) {
            tile.clear();
        }
    }

    /// Creates a mover and places it on the tile at `at`.
    ///
    /// The grid trusts the caller to supply an in-range, empty tile.
    pub fn spawn_mover(
        &mut self,
        id: impl Into<ActorId>,
        at: Coordinates,
        facing: Direction,
    ) -> MoverKey {
        let key = MoverKey::new(next_key(self.movers.len()));
        self.movers.push(MoverRecord {
            id: id.into(),
            position: at,
            facing,
        });
        self.place(at, Occupant::Mover(key));
        key
    }

    /// Creates a vessel with `health` as both current and maximum health and
    /// places it on the tile at `at`.
    ///
    /// The grid trusts the caller to supply an in-range, empty tile.
    pub fn spawn_vessel(
        &mut self,
        id: impl Into<ActorId>,
        at: Coordinates,
        health: u32,
    ) -> VesselKey {
        let key = VesselKey::new(next_key(self.vessels.len()));
        self.vessels.push(VesselRecord {
            id: id.into(),
            position: at,
            health,
            max_health: health,
        });
        self.place(at, Occupant::Vessel(key));
        key
    }

    fn tile_at_mut(&mut self, at: Coordinates) -> Option<&mut Tile> {
        self.index(at).and_then(|index| self.tiles.get_mut(index))
    }

    fn index(&self, at: Coordinates) -> Option<usize> {
        if self.contains(at) {
            let row = usize::try_from(at.y()).ok()?;
            let column = usize::try_from(at.x()).ok()?;
            let width = usize::try_from(self.width).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

fn next_key(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

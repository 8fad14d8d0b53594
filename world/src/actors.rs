//! Mover and vessel state plus the borrowed views that operate on them.

use robodino_core::{ActorId, Coordinates, Direction, MoveOutcome, MoverKey, Step, Turn, VesselKey};

use crate::{
    grid::{Grid, Occupant},
    render,
};

#[derive(Clone, Debug)]
pub(crate) struct MoverRecord {
    pub(crate) id: ActorId,
    pub(crate) position: Coordinates,
    pub(crate) facing: Direction,
}

#[derive(Clone, Debug)]
pub(crate) struct VesselRecord {
    pub(crate) id: ActorId,
    pub(crate) position: Coordinates,
    pub(crate) health: u32,
    pub(crate) max_health: u32,
}

/// Capability shared by every kind of actor placed on a grid.
pub trait Actor {
    /// Identifier supplied when the actor was created.
    fn id(&self) -> &ActorId;

    /// Tile the actor occupies (or last occupied, once removed).
    fn coordinates(&self) -> Coordinates;

    /// Tag the grid stores on the actor's tile.
    fn occupant(&self) -> Occupant;
}

impl Grid {
    /// Read-only view of a mover, or `None` for a handle this grid did not issue.
    #[must_use]
    pub fn mover(&self, key: MoverKey) -> Option<MoverRef<'_>> {
        let record = self.movers.get(slot(key.get())?)?;
        Some(MoverRef { key, record })
    }

    /// Mutable view of a mover, or `None` for a handle this grid did not issue.
    #[must_use]
    pub fn mover_mut(&mut self, key: MoverKey) -> Option<MoverMut<'_>> {
        let index = slot(key.get()).filter(|index| *index < self.movers.len())?;
        Some(MoverMut {
            grid: self,
            key,
            index,
        })
    }

    /// Read-only view of a vessel, or `None` for a handle this grid did not issue.
    #[must_use]
    pub fn vessel(&self, key: VesselKey) -> Option<VesselRef<'_>> {
        let record = self.vessels.get(slot(key.get())?)?;
        Some(VesselRef { key, record })
    }

    /// Mutable view of a vessel, or `None` for a handle this grid did not issue.
    #[must_use]
    pub fn vessel_mut(&mut self, key: VesselKey) -> Option<VesselMut<'_>> {
        let index = slot(key.get()).filter(|index| *index < self.vessels.len())?;
        Some(VesselMut {
            grid: self,
            key,
            index,
        })
    }
}

fn slot(value: u32) -> Option<usize> {
    usize::try_from(value).ok()
}

/// Read-only view of a mover.
#[derive(Clone, Copy, Debug)]
pub struct MoverRef<'g> {
    key: MoverKey,
    record: &'g MoverRecord,
}

impl MoverRef<'_> {
    /// Direction the mover faces.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.record.facing
    }
}

impl Actor for MoverRef<'_> {
    fn id(&self) -> &ActorId {
        &self.record.id
    }

    fn coordinates(&self) -> Coordinates {
        self.record.position
    }

    fn occupant(&self) -> Occupant {
        Occupant::Mover(self.key)
    }
}

/// Mutable view of a mover together with the grid it lives on.
#[derive(Debug)]
pub struct MoverMut<'g> {
    grid: &'g mut Grid,
    key: MoverKey,
    index: usize,
}

impl MoverMut<'_> {
    fn record(&self) -> &MoverRecord {
        &self.grid.movers[self.index]
    }

    /// Direction the mover faces.
    #[must_use]
    pub fn facing(&self) -> Direction {
        self.record().facing
    }

    /// Rotates the mover ninety degrees and returns the new facing.
    pub fn turn(&mut self, turn: Turn) -> Direction {
        let record = &mut self.grid.movers[self.index];
        record.facing = record.facing.turned(turn);
        record.facing
    }

    /// Moves the mover onto the neighbouring tile selected by `step`.
    ///
    /// The destination comes from the current tile's cached links. Nothing
    /// changes unless the outcome is [`MoveOutcome::Moved`].
    pub fn step(&mut self, step: Step) -> MoveOutcome {
        let from = self.record().position;
        let direction = self.record().facing.resolve(step);

        let Some(destination) = self.grid.neighbor(from, direction) else {
            tracing::debug!(mover = self.key.get(), %from, %direction, "step out of bounds");
            return MoveOutcome::OutOfBounds;
        };
        let to = destination.coordinates();
        if !destination.is_empty() {
            tracing::debug!(mover = self.key.get(), %from, %to, "step onto occupied tile");
            return MoveOutcome::Occupied;
        }

        self.grid.clear(from);
        self.grid.place(to, Occupant::Mover(self.key));
        self.grid.movers[self.index].position = to;
        MoveOutcome::Moved
    }

    /// Hits every vessel on the four tiles orthogonally adjacent to the mover.
    ///
    /// Facing plays no part. Returns the vessels that were struck, in
    /// left, right, up, down order.
    pub fn attack(&mut self) -> Vec<VesselKey> {
        let origin = self.record().position;
        let mut struck = Vec::new();
        for direction in Direction::ALL {
            let Some(target) = origin.neighbor(direction) else {
                continue;
            };
            let Some(Occupant::Vessel(vessel)) = self.grid.occupant_at(target) else {
                continue;
            };
            if let Some(mut victim) = self.grid.vessel_mut(vessel) {
                let _ = victim.hit();
                struck.push(vessel);
            }
        }
        struck
    }
}

impl Actor for MoverMut<'_> {
    fn id(&self) -> &ActorId {
        &self.record().id
    }

    fn coordinates(&self) -> Coordinates {
        self.record().position
    }

    fn occupant(&self) -> Occupant {
        Occupant::Mover(self.key)
    }
}

/// Read-only view of a vessel.
#[derive(Clone, Copy, Debug)]
pub struct VesselRef<'g> {
    key: VesselKey,
    record: &'g VesselRecord,
}

impl VesselRef<'_> {
    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.record.health
    }

    /// Health the vessel was created with.
    #[must_use]
    pub const fn max_health(&self) -> u32 {
        self.record.max_health
    }

    /// Reports whether the vessel ran out of health.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.record.health == 0
    }

    /// Ten-segment health bar followed by the literal `health / max` count.
    #[must_use]
    pub fn healthbar(&self) -> String {
        render::healthbar(self.record.health, self.record.max_health)
    }
}

impl Actor for VesselRef<'_> {
    fn id(&self) -> &ActorId {
        &self.record.id
    }

    fn coordinates(&self) -> Coordinates {
        self.record.position
    }

    fn occupant(&self) -> Occupant {
        Occupant::Vessel(self.key)
    }
}

/// Mutable view of a vessel together with the grid it lives on.
#[derive(Debug)]
pub struct VesselMut<'g> {
    grid: &'g mut Grid,
    key: VesselKey,
    index: usize,
}

impl VesselMut<'_> {
    fn record(&self) -> &VesselRecord {
        &self.grid.vessels[self.index]
    }

    /// Remaining health.
    #[must_use]
    pub fn health(&self) -> u32 {
        self.record().health
    }

    /// Removes one point of health and returns what is left.
    ///
    /// Reaching zero clears the vessel's tile; the record stays readable.
    /// Hits on a vessel that is already at zero change nothing.
    pub fn hit(&mut self) -> u32 {
        let record = &mut self.grid.vessels[self.index];
        if record.health == 0 {
            tracing::debug!(vessel = self.key.get(), "hit on destroyed vessel ignored");
            return 0;
        }
        record.health -= 1;
        let (health, position) = (record.health, record.position);

        if health == 0 {
            if self.grid.occupant_at(position) == Some(Occupant::Vessel(self.key)) {
                self.grid.clear(position);
            }
            tracing::debug!(vessel = self.key.get(), at = %position, "vessel destroyed");
        }
        health
    }
}

impl Actor for VesselMut<'_> {
    fn id(&self) -> &ActorId {
        &self.record().id
    }

    fn coordinates(&self) -> Coordinates {
        self.record().position
    }

    fn occupant(&self) -> Occupant {
        Occupant::Vessel(self.key)
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session layer that owns the active grid and the registries of live actors.
//!
//! A [`Session`] validates every request before it reaches the grid, so the
//! world only ever sees placements it can honour. Mutations are submitted as
//! [`Command`] values and the resulting [`Event`] values keep the registries
//! in step with the board: a destroyed vessel is unregistered the moment the
//! world reports it.

mod config;
mod error;

pub use config::SessionConfig;
pub use error::{ErrorKind, SessionError};

use std::collections::BTreeMap;

use robodino_core::{
    ActorId, Command, Coordinates, Direction, Event, MoverKey, MoverSnapshot, SimulationState,
    Step, Turn, VesselKey, VesselSnapshot,
};
use robodino_world::{self as world, query, Grid};

/// Simulation context holding at most one grid at a time.
#[derive(Debug, Default)]
pub struct Session {
    config: SessionConfig,
    active: Option<ActiveGrid>,
}

/// Grid together with the actors created on it.
#[derive(Debug)]
struct ActiveGrid {
    grid: Grid,
    movers: BTreeMap<ActorId, MoverKey>,
    vessels: BTreeMap<ActorId, VesselKey>,
    next_mover_id: u64,
    next_vessel_id: u64,
}

impl ActiveGrid {
    fn new(width: u32, height: u32) -> Self {
        Self {
            grid: Grid::new(width, height),
            movers: BTreeMap::new(),
            vessels: BTreeMap::new(),
            next_mover_id: 0,
            next_vessel_id: 0,
        }
    }

    fn mover_key(&self, id: &str) -> Result<MoverKey, SessionError> {
        self.movers
            .get(id)
            .copied()
            .ok_or_else(|| SessionError::MoverNotFound(ActorId::new(id)))
    }

    fn vessel_key(&self, id: &str) -> Result<VesselKey, SessionError> {
        self.vessels
            .get(id)
            .copied()
            .ok_or_else(|| SessionError::VesselNotFound(ActorId::new(id)))
    }

    /// Resolves signed request coordinates to an empty tile on the grid.
    fn vacant_tile(&self, x: i64, y: i64) -> Result<Coordinates, SessionError> {
        let out_of_bounds = || SessionError::OutOfBounds {
            x,
            y,
            width: self.grid.width(),
            height: self.grid.height(),
        };
        let column = u32::try_from(x).map_err(|_| out_of_bounds())?;
        let row = u32::try_from(y).map_err(|_| out_of_bounds())?;
        let tile = self.grid.tile(column, row).ok_or_else(out_of_bounds)?;
        if !tile.is_empty() {
            return Err(SessionError::TileOccupied(tile.coordinates()));
        }
        Ok(tile.coordinates())
    }

    fn execute(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.grid, command, &mut events);
        for event in &events {
            self.absorb(event);
        }
        events
    }

    fn absorb(&mut self, event: &Event) {
        match event {
            Event::MoverSpawned {
                mover,
                id,
                at,
                facing,
            } => {
                tracing::info!(%id, %at, %facing, "mover created");
                let _ = self.movers.insert(id.clone(), *mover);
            }
            Event::VesselSpawned {
                vessel,
                id,
                at,
                health,
            } => {
                tracing::info!(%id, %at, health, "vessel created");
                let _ = self.vessels.insert(id.clone(), *vessel);
            }
            Event::VesselDestroyed { id, at, .. } => {
                tracing::info!(%id, %at, "vessel destroyed");
                let _ = self.vessels.remove(id);
            }
            Event::MoverTurned { .. }
            | Event::MoverStepped { .. }
            | Event::StepRejected { .. }
            | Event::VesselHit { .. } => {}
        }
    }

    fn mover_snapshot(&self, mover: MoverKey) -> Option<MoverSnapshot> {
        query::mover_snapshot(&self.grid, mover)
    }

    fn vessel_snapshot(&self, vessel: VesselKey) -> Option<VesselSnapshot> {
        query::vessel_snapshot(&self.grid, vessel)
    }

    fn movers(&self) -> Vec<MoverSnapshot> {
        let mut keys: Vec<MoverKey> = self.movers.values().copied().collect();
        keys.sort_unstable();
        keys.into_iter()
            .filter_map(|mover| self.mover_snapshot(mover))
            .collect()
    }

    fn vessels(&self) -> Vec<VesselSnapshot> {
        let mut keys: Vec<VesselKey> = self.vessels.values().copied().collect();
        keys.sort_unstable();
        keys.into_iter()
            .filter_map(|vessel| self.vessel_snapshot(vessel))
            .collect()
    }

    fn state(&self) -> SimulationState {
        SimulationState {
            movers: self.movers(),
            vessels: self.vessels(),
        }
    }
}

impl Session {
    /// Creates a session without a grid.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    /// Active grid, if one has been created.
    #[must_use]
    pub fn grid(&self) -> Option<&Grid> {
        self.active.as_ref().map(|active| &active.grid)
    }

    fn active(&self) -> Result<&ActiveGrid, SessionError> {
        self.active.as_ref().ok_or(SessionError::NoGrid)
    }

    fn active_mut(&mut self) -> Result<&mut ActiveGrid, SessionError> {
        self.active.as_mut().ok_or(SessionError::NoGrid)
    }

    /// Replaces the active grid with an empty one of the requested size.
    ///
    /// Every mover and vessel of the previous grid is discarded and identifier
    /// allocation starts over.
    pub fn create_grid(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<SimulationState, SessionError> {
        if width == 0 || height == 0 {
            return Err(SessionError::InvalidDimensions { width, height });
        }
        if self.active.is_some() {
            tracing::info!("discarding previous grid");
        }
        tracing::info!(width, height, "grid created");
        let active = ActiveGrid::new(width, height);
        let state = active.state();
        self.active = Some(active);
        Ok(state)
    }

    /// Replaces the active grid with one of the configured default size.
    pub fn create_default_grid(&mut self) -> Result<SimulationState, SessionError> {
        self.create_grid(self.config.grid_width, self.config.grid_height)
    }

    /// Drops the active grid together with all of its actors.
    pub fn close(&mut self) {
        if self.active.take().is_some() {
            tracing::info!("grid closed");
        }
    }

    /// Snapshot of every registered actor in creation order.
    pub fn state(&self) -> Result<SimulationState, SessionError> {
        Ok(self.active()?.state())
    }

    /// Places a new mover on an empty tile.
    pub fn create_mover(
        &mut self,
        x: i64,
        y: i64,
        facing: Direction,
    ) -> Result<SimulationState, SessionError> {
        let active = self.active_mut()?;
        let at = active.vacant_tile(x, y)?;
        let id = ActorId::new(active.next_mover_id.to_string());
        active.next_mover_id += 1;
        let _ = active.execute(Command::SpawnMover { id, at, facing });
        Ok(active.state())
    }

    /// Places a new vessel on an empty tile.
    ///
    /// `health` defaults to the configured value and must lie in
    /// `1..=max_health`.
    pub fn create_vessel(
        &mut self,
        x: i64,
        y: i64,
        health: Option<u32>,
    ) -> Result<SimulationState, SessionError> {
        let health = health.unwrap_or(self.config.default_health);
        let max = self.config.max_health;
        let active = self.active_mut()?;
        if health == 0 || health > max {
            return Err(SessionError::InvalidHealth { health, max });
        }
        let at = active.vacant_tile(x, y)?;
        let id = ActorId::new(active.next_vessel_id.to_string());
        active.next_vessel_id += 1;
        let _ = active.execute(Command::SpawnVessel { id, at, health });
        Ok(active.state())
    }

    /// Snapshot of a single mover.
    pub fn mover(&self, id: &str) -> Result<MoverSnapshot, SessionError> {
        let active = self.active()?;
        let key = active.mover_key(id)?;
        active
            .mover_snapshot(key)
            .ok_or_else(|| SessionError::MoverNotFound(ActorId::new(id)))
    }

    /// Snapshots of every mover in creation order.
    pub fn movers(&self) -> Result<Vec<MoverSnapshot>, SessionError> {
        Ok(self.active()?.movers())
    }

    /// Snapshot of a single live vessel.
    pub fn vessel(&self, id: &str) -> Result<VesselSnapshot, SessionError> {
        let active = self.active()?;
        let key = active.vessel_key(id)?;
        active
            .vessel_snapshot(key)
            .ok_or_else(|| SessionError::VesselNotFound(ActorId::new(id)))
    }

    /// Snapshots of every live vessel in creation order.
    pub fn vessels(&self) -> Result<Vec<VesselSnapshot>, SessionError> {
        Ok(self.active()?.vessels())
    }

    /// Rotates a mover by ninety degrees.
    pub fn turn(&mut self, id: &str, turn: Turn) -> Result<SimulationState, SessionError> {
        let active = self.active_mut()?;
        let mover = active.mover_key(id)?;
        let _ = active.execute(Command::TurnMover { mover, turn });
        Ok(active.state())
    }

    /// Moves a mover one tile forward or backward.
    ///
    /// A refused step leaves the grid untouched and is reported as
    /// [`SessionError::StepRejected`].
    pub fn step(&mut self, id: &str, step: Step) -> Result<SimulationState, SessionError> {
        let active = self.active_mut()?;
        let mover = active.mover_key(id)?;
        let events = active.execute(Command::StepMover { mover, step });
        if let Some(reason) = events.iter().find_map(|event| match event {
            Event::StepRejected { reason, .. } => Some(*reason),
            _ => None,
        }) {
            tracing::debug!(%id, %step, %reason, "step rejected");
            return Err(SessionError::StepRejected {
                id: ActorId::new(id),
                reason,
            });
        }
        Ok(active.state())
    }

    /// Makes a mover strike every adjacent vessel.
    ///
    /// Vessels whose health reaches zero leave the registry.
    pub fn attack(&mut self, id: &str) -> Result<SimulationState, SessionError> {
        let active = self.active_mut()?;
        let mover = active.mover_key(id)?;
        let events = active.execute(Command::Attack { mover });
        let hits = events
            .iter()
            .filter(|event| matches!(event, Event::VesselHit { .. }))
            .count();
        tracing::debug!(%id, hits, "attack resolved");
        Ok(active.state())
    }

    /// Health bar of a single live vessel.
    pub fn healthbar(&self, id: &str) -> Result<String, SessionError> {
        let active = self.active()?;
        let key = active.vessel_key(id)?;
        query::healthbar(&active.grid, key)
            .ok_or_else(|| SessionError::VesselNotFound(ActorId::new(id)))
    }

    /// Health bars of every live vessel in creation order.
    pub fn healthbars(&self) -> Result<Vec<(ActorId, String)>, SessionError> {
        let active = self.active()?;
        let mut keys: Vec<VesselKey> = active.vessels.values().copied().collect();
        keys.sort_unstable();
        Ok(keys
            .into_iter()
            .filter_map(|key| {
                let snapshot = active.vessel_snapshot(key)?;
                let bar = query::healthbar(&active.grid, key)?;
                Some((snapshot.id, bar))
            })
            .collect())
    }

    /// Bordered text rendering of the active grid.
    pub fn visualize(&self) -> Result<String, SessionError> {
        Ok(query::visualization(&self.active()?.grid))
    }
}

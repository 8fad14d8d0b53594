#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid state management for Robodino.
//!
//! The [`Grid`] owns every tile and every actor record. Movers and vessels
//! are reached through typed handles and borrowed views, so an actor never
//! holds an owning pointer back into the grid. Callers either use the views
//! directly or submit [`Command`] values through [`apply`], which reports
//! what happened as [`Event`] values.

mod actors;
mod grid;
mod render;

pub use actors::{Actor, MoverMut, MoverRef, VesselMut, VesselRef};
pub use grid::{Grid, Neighbors, Occupant, Tile};

use robodino_core::{Command, Event, VesselKey};

/// Applies the provided command to the grid and records the resulting events.
///
/// Commands addressed to handles the grid did not issue are ignored.
pub fn apply(grid: &mut Grid, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SpawnMover { id, at, facing } => {
            let mover = grid.spawn_mover(id.clone(), at, facing);
            out_events.push(Event::MoverSpawned {
                mover,
                id,
                at,
                facing,
            });
        }
        Command::SpawnVessel { id, at, health } => {
            let vessel = grid.spawn_vessel(id.clone(), at, health);
            out_events.push(Event::VesselSpawned {
                vessel,
                id,
                at,
                health,
            });
        }
        Command::TurnMover { mover, turn } => {
            if let Some(mut handle) = grid.mover_mut(mover) {
                let from = handle.facing();
                let to = handle.turn(turn);
                out_events.push(Event::MoverTurned { mover, from, to });
            }
        }
        Command::StepMover { mover, step } => {
            let Some(mut handle) = grid.mover_mut(mover) else {
                return;
            };
            let from = handle.coordinates();
            match handle.step(step).rejection() {
                None => out_events.push(Event::MoverStepped {
                    mover,
                    from,
                    to: handle.coordinates(),
                }),
                Some(reason) => out_events.push(Event::StepRejected {
                    mover,
                    step,
                    reason,
                }),
            }
        }
        Command::Attack { mover } => {
            let Some(mut handle) = grid.mover_mut(mover) else {
                return;
            };
            for vessel in handle.attack() {
                report_hit(grid, vessel, out_events);
            }
        }
        Command::HitVessel { vessel } => {
            let Some(mut handle) = grid.vessel_mut(vessel) else {
                return;
            };
            if handle.health() == 0 {
                return;
            }
            let _ = handle.hit();
            report_hit(grid, vessel, out_events);
        }
    }
}

fn report_hit(grid: &Grid, vessel: VesselKey, out_events: &mut Vec<Event>) {
    let Some(view) = grid.vessel(vessel) else {
        return;
    };
    out_events.push(Event::VesselHit {
        vessel,
        health: view.health(),
    });
    if view.is_destroyed() {
        out_events.push(Event::VesselDestroyed {
            vessel,
            id: view.id().clone(),
            at: view.coordinates(),
        });
    }
}

/// Query functions that provide read-only access to the grid state.
pub mod query {
    use super::{Actor, Grid, Occupant};
    use robodino_core::{Coordinates, MoverKey, MoverSnapshot, VesselKey, VesselSnapshot};

    /// Width and height of the grid in tiles.
    #[must_use]
    pub fn dimensions(grid: &Grid) -> (u32, u32) {
        (grid.width(), grid.height())
    }

    /// Actor standing at the provided coordinate, if any.
    #[must_use]
    pub fn occupant_at(grid: &Grid, at: Coordinates) -> Option<Occupant> {
        grid.occupant_at(at)
    }

    /// Captures the state of a single mover.
    #[must_use]
    pub fn mover_snapshot(grid: &Grid, mover: MoverKey) -> Option<MoverSnapshot> {
        grid.mover(mover).map(|view| MoverSnapshot {
            id: view.id().clone(),
            coordinates: view.coordinates(),
            facing: view.facing(),
        })
    }

    /// Captures the state of a single vessel.
    #[must_use]
    pub fn vessel_snapshot(grid: &Grid, vessel: VesselKey) -> Option<VesselSnapshot> {
        grid.vessel(vessel).map(|view| VesselSnapshot {
            id: view.id().clone(),
            coordinates: view.coordinates(),
            health: view.health(),
            max_health: view.max_health(),
        })
    }

    /// Health bar of a single vessel.
    #[must_use]
    pub fn healthbar(grid: &Grid, vessel: VesselKey) -> Option<String> {
        grid.vessel(vessel).map(|view| view.healthbar())
    }

    /// Bordered text rendering of the whole board.
    #[must_use]
    pub fn visualization(grid: &Grid) -> String {
        grid.visualize()
    }
}

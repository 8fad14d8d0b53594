use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use robodino_core::{MoverSnapshot, SimulationState, VesselSnapshot};
use robodino_system_session::{Session, SessionError};
use serde::Serialize;

use crate::script::{parse_line, ScriptCommand};

/// Outcome counts of a finished script.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Summary {
    /// Commands that ran, successfully or not.
    pub(crate) executed: usize,
    /// Commands that reported an error.
    pub(crate) failed: usize,
}

/// Drives a [`Session`] from script lines, writing results to `out` and
/// failures to `err`.
pub(crate) struct Runner<O, E> {
    session: Session,
    json: bool,
    out: O,
    err: E,
}

impl<O: Write, E: Write> Runner<O, E> {
    pub(crate) fn new(session: Session, json: bool, out: O, err: E) -> Self {
        Self {
            session,
            json,
            out,
            err,
        }
    }

    /// Runs every line of `input`, continuing past failing commands.
    ///
    /// Only I/O failures on the input or output streams abort the run.
    pub(crate) fn run<R: BufRead>(&mut self, input: R) -> Result<Summary> {
        let mut summary = Summary::default();
        for (index, line) in input.lines().enumerate() {
            let number = index + 1;
            let line = line.with_context(|| format!("failed to read script line {number}"))?;
            let command = match parse_line(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(error) => {
                    summary.executed += 1;
                    summary.failed += 1;
                    writeln!(self.err, "line {number} [syntax]: {error}")
                        .context("failed to write error report")?;
                    continue;
                }
            };

            summary.executed += 1;
            tracing::debug!(line = number, ?command, "executing");
            if let Err(error) = self.execute(command) {
                summary.failed += 1;
                self.report(number, &error)?;
            }
        }
        self.out.flush().context("failed to flush output")?;
        Ok(summary)
    }

    /// Writes a failed command to `err`, tagged with the session's error
    /// classification when there is one.
    fn report(&mut self, number: usize, error: &anyhow::Error) -> Result<()> {
        let label = match error.downcast_ref::<SessionError>() {
            Some(session_error) => session_error.kind().as_str(),
            None => "error",
        };
        writeln!(self.err, "line {number} [{label}]: {error:#}")
            .context("failed to write error report")
    }

    fn execute(&mut self, command: ScriptCommand) -> Result<()> {
        let state = match command {
            ScriptCommand::Grid { size: None } => self.session.create_default_grid()?,
            ScriptCommand::Grid {
                size: Some((width, height)),
            } => self.session.create_grid(width, height)?,
            ScriptCommand::Mover { x, y, facing } => self.session.create_mover(x, y, facing)?,
            ScriptCommand::Vessel { x, y, health } => self.session.create_vessel(x, y, health)?,
            ScriptCommand::Turn { id, turn } => self.session.turn(&id, turn)?,
            ScriptCommand::Move { id, step } => self.session.step(&id, step)?,
            ScriptCommand::Attack { id } => self.session.attack(&id)?,
            ScriptCommand::MoverInfo { id } => {
                let mover = self.session.mover(&id)?;
                if self.json {
                    self.write_json(&mover)?;
                } else {
                    self.write_mover(&mover)?;
                }
                return Ok(());
            }
            ScriptCommand::VesselInfo { id } => {
                let vessel = self.session.vessel(&id)?;
                if self.json {
                    self.write_json(&vessel)?;
                } else {
                    self.write_vessel(&vessel)?;
                }
                return Ok(());
            }
            ScriptCommand::Show => {
                let board = self.session.visualize()?;
                writeln!(self.out, "{board}")?;
                return Ok(());
            }
            ScriptCommand::State => {
                let state = self.session.state()?;
                if self.json {
                    self.write_json(&state)?;
                } else {
                    self.write_state(&state)?;
                }
                return Ok(());
            }
            ScriptCommand::Health { id: Some(id) } => {
                let bar = self.session.healthbar(&id)?;
                writeln!(self.out, "{bar}")?;
                return Ok(());
            }
            ScriptCommand::Health { id: None } => {
                for (id, bar) in self.session.healthbars()? {
                    writeln!(self.out, "{id} {bar}")?;
                }
                return Ok(());
            }
        };

        if self.json {
            self.write_json(&state)?;
        }
        Ok(())
    }

    fn write_json<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let encoded = serde_json::to_string(value).context("failed to encode json")?;
        writeln!(self.out, "{encoded}")?;
        Ok(())
    }

    fn write_state(&mut self, state: &SimulationState) -> Result<()> {
        for mover in &state.movers {
            self.write_mover(mover)?;
        }
        for vessel in &state.vessels {
            self.write_vessel(vessel)?;
        }
        Ok(())
    }

    fn write_mover(&mut self, mover: &MoverSnapshot) -> Result<()> {
        writeln!(
            self.out,
            "mover {} at {} facing {}",
            mover.id, mover.coordinates, mover.facing
        )?;
        Ok(())
    }

    fn write_vessel(&mut self, vessel: &VesselSnapshot) -> Result<()> {
        writeln!(
            self.out,
            "vessel {} at {} health {} / {}",
            vessel.id, vessel.coordinates, vessel.health, vessel.max_health
        )?;
        Ok(())
    }
}

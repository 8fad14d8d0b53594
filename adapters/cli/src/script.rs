use std::{num::ParseIntError, str::FromStr};

use robodino_core::{Direction, ParseTokenError, Step, Turn};

/// Marker that starts a comment running to the end of the line.
const COMMENT: char = '#';

/// Single instruction of the simulation script language.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ScriptCommand {
    /// Creates a grid, using the configured size when none is given.
    Grid {
        /// Explicit `(width, height)`, if supplied.
        size: Option<(u32, u32)>,
    },
    /// Places a mover.
    Mover {
        /// Requested column.
        x: i64,
        /// Requested row.
        y: i64,
        /// Initial facing.
        facing: Direction,
    },
    /// Places a vessel.
    Vessel {
        /// Requested column.
        x: i64,
        /// Requested row.
        y: i64,
        /// Explicit health, if supplied.
        health: Option<u32>,
    },
    /// Rotates a mover.
    Turn {
        /// Mover identifier.
        id: String,
        /// Rotation to apply.
        turn: Turn,
    },
    /// Steps a mover.
    Move {
        /// Mover identifier.
        id: String,
        /// Step to take.
        step: Step,
    },
    /// Makes a mover attack its neighbours.
    Attack {
        /// Mover identifier.
        id: String,
    },
    /// Prints a single mover.
    MoverInfo {
        /// Mover identifier.
        id: String,
    },
    /// Prints a single vessel.
    VesselInfo {
        /// Vessel identifier.
        id: String,
    },
    /// Prints the board.
    Show,
    /// Prints every registered actor.
    State,
    /// Prints one or all health bars.
    Health {
        /// Vessel identifier, or `None` for every vessel.
        id: Option<String>,
    },
}

/// Errors that can occur while parsing a script line.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ScriptError {
    /// The first word is not a known command.
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    /// A required argument was not supplied.
    #[error("'{command}' is missing its {argument} argument")]
    MissingArgument {
        /// Command being parsed.
        command: &'static str,
        /// Name of the absent argument.
        argument: &'static str,
    },
    /// More arguments were supplied than the command accepts.
    #[error("'{command}' does not accept the extra argument '{token}'")]
    UnexpectedArgument {
        /// Command being parsed.
        command: &'static str,
        /// First surplus token.
        token: String,
    },
    /// A numeric argument could not be parsed.
    #[error("{argument} '{token}' is not a valid number")]
    InvalidNumber {
        /// Name of the argument.
        argument: &'static str,
        /// Token exactly as supplied.
        token: String,
        /// Underlying parse failure.
        #[source]
        source: ParseIntError,
    },
    /// A direction, turn, or step token was not recognised.
    #[error(transparent)]
    InvalidToken(#[from] ParseTokenError),
}

/// Parses one script line, returning `None` for blank and comment-only lines.
pub(crate) fn parse_line(line: &str) -> Result<Option<ScriptCommand>, ScriptError> {
    let content = match line.split_once(COMMENT) {
        Some((before, _)) => before,
        None => line,
    };
    let mut words = content.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };

    let arity = words.clone().count();
    let mut args = Arguments { words };
    let command = match name.to_ascii_lowercase().as_str() {
        "mover" if arity == 1 => ScriptCommand::MoverInfo {
            id: args.identifier("mover")?,
        },
        "vessel" if arity == 1 => ScriptCommand::VesselInfo {
            id: args.identifier("vessel")?,
        },
        "grid" => {
            let size = match args.optional::<u32>("width")? {
                None => None,
                Some(width) => Some((width, args.required::<u32>("grid", "height")?)),
            };
            args.finish("grid")?;
            ScriptCommand::Grid { size }
        }
        "mover" => {
            let x = args.required("mover", "x")?;
            let y = args.required("mover", "y")?;
            let facing = args.required_token("mover", "facing")?;
            args.finish("mover")?;
            ScriptCommand::Mover { x, y, facing }
        }
        "vessel" => {
            let x = args.required("vessel", "x")?;
            let y = args.required("vessel", "y")?;
            let health = args.optional("health")?;
            args.finish("vessel")?;
            ScriptCommand::Vessel { x, y, health }
        }
        "turn" => {
            let id = args.identifier("turn")?;
            let turn = args.required_token("turn", "rotation")?;
            args.finish("turn")?;
            ScriptCommand::Turn { id, turn }
        }
        "move" => {
            let id = args.identifier("move")?;
            let step = args.required_token("move", "step")?;
            args.finish("move")?;
            ScriptCommand::Move { id, step }
        }
        "attack" => {
            let id = args.identifier("attack")?;
            args.finish("attack")?;
            ScriptCommand::Attack { id }
        }
        "show" => {
            args.finish("show")?;
            ScriptCommand::Show
        }
        "state" => {
            args.finish("state")?;
            ScriptCommand::State
        }
        "health" => {
            let id = args.words.next().map(str::to_owned);
            args.finish("health")?;
            ScriptCommand::Health { id }
        }
        _ => return Err(ScriptError::UnknownCommand(name.to_owned())),
    };
    Ok(Some(command))
}

struct Arguments<'a> {
    words: std::str::SplitWhitespace<'a>,
}

impl Arguments<'_> {
    fn required<T>(
        &mut self,
        command: &'static str,
        argument: &'static str,
    ) -> Result<T, ScriptError>
    where
        T: FromStr<Err = ParseIntError>,
    {
        self.optional(argument)?
            .ok_or(ScriptError::MissingArgument { command, argument })
    }

    fn optional<T>(&mut self, argument: &'static str) -> Result<Option<T>, ScriptError>
    where
        T: FromStr<Err = ParseIntError>,
    {
        self.words
            .next()
            .map(|token| {
                token.parse().map_err(|source| ScriptError::InvalidNumber {
                    argument,
                    token: token.to_owned(),
                    source,
                })
            })
            .transpose()
    }

    fn required_token<T>(
        &mut self,
        command: &'static str,
        argument: &'static str,
    ) -> Result<T, ScriptError>
    where
        T: FromStr<Err = ParseTokenError>,
    {
        let token = self
            .words
            .next()
            .ok_or(ScriptError::MissingArgument { command, argument })?;
        Ok(token.parse::<T>()?)
    }

    fn identifier(&mut self, command: &'static str) -> Result<String, ScriptError> {
        self.words
            .next()
            .map(str::to_owned)
            .ok_or(ScriptError::MissingArgument {
                command,
                argument: "id",
            })
    }

    fn finish(&mut self, command: &'static str) -> Result<(), ScriptError> {
        match self.words.next() {
            None => Ok(()),
            Some(token) => Err(ScriptError::UnexpectedArgument {
                command,
                token: token.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("   "), Ok(None));
        assert_eq!(parse_line("# set up the board"), Ok(None));
    }

    #[test]
    fn parses_every_command() {
        assert_eq!(
            parse_line("grid"),
            Ok(Some(ScriptCommand::Grid { size: None }))
        );
        assert_eq!(
            parse_line("grid 10 4"),
            Ok(Some(ScriptCommand::Grid {
                size: Some((10, 4))
            }))
        );
        assert_eq!(
            parse_line("mover 3 2 down"),
            Ok(Some(ScriptCommand::Mover {
                x: 3,
                y: 2,
                facing: Direction::Down,
            }))
        );
        assert_eq!(
            parse_line("vessel 3 3 # default health"),
            Ok(Some(ScriptCommand::Vessel {
                x: 3,
                y: 3,
                health: None,
            }))
        );
        assert_eq!(
            parse_line("turn 0 LEFT"),
            Ok(Some(ScriptCommand::Turn {
                id: "0".to_owned(),
                turn: Turn::Left,
            }))
        );
        assert_eq!(
            parse_line("move 0 backward"),
            Ok(Some(ScriptCommand::Move {
                id: "0".to_owned(),
                step: Step::Backward,
            }))
        );
        assert_eq!(
            parse_line("ATTACK 0"),
            Ok(Some(ScriptCommand::Attack { id: "0".to_owned() }))
        );
        assert_eq!(
            parse_line("mover 0"),
            Ok(Some(ScriptCommand::MoverInfo { id: "0".to_owned() }))
        );
        assert_eq!(
            parse_line("vessel 3"),
            Ok(Some(ScriptCommand::VesselInfo { id: "3".to_owned() }))
        );
        assert_eq!(parse_line("show"), Ok(Some(ScriptCommand::Show)));
        assert_eq!(parse_line("state"), Ok(Some(ScriptCommand::State)));
        assert_eq!(
            parse_line("health"),
            Ok(Some(ScriptCommand::Health { id: None }))
        );
    }

    #[test]
    fn negative_coordinates_reach_the_session() {
        assert_eq!(
            parse_line("mover -1 0 up"),
            Ok(Some(ScriptCommand::Mover {
                x: -1,
                y: 0,
                facing: Direction::Up,
            }))
        );
    }

    #[test]
    fn malformed_lines_are_described() {
        assert_eq!(
            parse_line("jump 0"),
            Err(ScriptError::UnknownCommand("jump".to_owned()))
        );
        assert_eq!(
            parse_line("grid 10"),
            Err(ScriptError::MissingArgument {
                command: "grid",
                argument: "height",
            })
        );
        assert_eq!(
            parse_line("attack 0 1"),
            Err(ScriptError::UnexpectedArgument {
                command: "attack",
                token: "1".to_owned(),
            })
        );

        let error = parse_line("mover 1 2 sideways").expect_err("bad facing");
        assert_eq!(error.to_string(), "unknown direction token 'sideways'");

        assert_eq!(
            parse_line("mover 1 2"),
            Err(ScriptError::MissingArgument {
                command: "mover",
                argument: "facing",
            })
        );

        let error = parse_line("vessel 1 2 lots").expect_err("bad health");
        assert_eq!(error.to_string(), "health 'lots' is not a valid number");
    }
}

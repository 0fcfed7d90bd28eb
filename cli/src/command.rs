use sweeper_core::{Action, Coord, snap_point};
use thiserror::Error;

pub const USAGE: &str = "commands: r ROW COL | f ROW COL | restart | quit";

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Command {
    Act(Action),
    /// Coordinates that do not land on the board
    Outside,
    Quit,
    Empty,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("unknown command {0:?}")]
    Unknown(String),
    #[error("expected ROW and COL")]
    MissingCoords,
    #[error("not a number: {0:?}")]
    BadNumber(String),
    #[error("unexpected trailing input {0:?}")]
    Trailing(String),
}

/// Parses one input line. Coordinates may be fractional, like a pointer position, and are
/// snapped to the cell under them.
pub fn parse_command(line: &str, size: Coord) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(Command::Empty);
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "r" | "reveal" => parse_coords(&mut words, size)?.map_or(Command::Outside, |coords| {
            Command::Act(Action::Reveal(coords))
        }),
        "f" | "flag" => parse_coords(&mut words, size)?.map_or(Command::Outside, |coords| {
            Command::Act(Action::ToggleFlag(coords))
        }),
        "restart" => Command::Act(Action::Restart),
        "q" | "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    if let Some(extra) = words.next() {
        return Err(CommandError::Trailing(extra.to_string()));
    }
    Ok(command)
}

fn parse_coords<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    size: Coord,
) -> Result<Option<(Coord, Coord)>, CommandError> {
    let mut number = || -> Result<f64, CommandError> {
        let word = words.next().ok_or(CommandError::MissingCoords)?;
        word.parse()
            .map_err(|_| CommandError::BadNumber(word.to_string()))
    };
    let row = number()?;
    let col = number()?;
    Ok(snap_point(row, col, size))
}

//! Line protocol spoken with the game referee on stdin.

use std::io::{self, BufRead, Lines};

use pellet_rush_core::{
    CellCoord, ItemSighting, Owner, Scores, TurnObservation, UnitId, UnitKind, UnitSighting,
};
use pellet_rush_world::{Grid, GridError};
use thiserror::Error;

/// Kind token the referee reports for units that died this turn.
const DEAD_TOKEN: &str = "DEAD";

/// Errors raised while decoding referee input.
#[derive(Debug, Error)]
pub(crate) enum ProtocolError {
    /// Reading from the input stream failed.
    #[error("failed to read referee input")]
    Io(#[from] io::Error),
    /// The stream ended in the middle of a block.
    #[error("input ended while reading {0}")]
    UnexpectedEnd(&'static str),
    /// A line held fewer fields than expected.
    #[error("line {line}: missing {field}")]
    MissingField { line: usize, field: &'static str },
    /// A numeric field could not be parsed.
    #[error("line {line}: {field} is not a number: {value:?}")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },
    /// The ownership flag was neither `0` nor `1`.
    #[error("line {line}: ownership flag must be 0 or 1, got {value:?}")]
    InvalidOwner { line: usize, value: String },
    /// The unit kind token was not recognised.
    #[error("line {line}: unknown unit kind {value:?}")]
    UnknownKind { line: usize, value: String },
    /// The map drawing was rejected.
    #[error("invalid map drawing")]
    Grid(#[from] GridError),
}

/// Pulls typed records out of the referee's line protocol.
#[derive(Debug)]
pub(crate) struct ProtocolReader<R> {
    lines: Lines<R>,
    line: usize,
}

impl<R: BufRead> ProtocolReader<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }

    /// Reads the startup block: dimensions, then one drawing row per grid row.
    pub(crate) fn read_grid(&mut self) -> Result<Grid, ProtocolError> {
        let header = self.expect_line("grid dimensions")?;
        let mut fields = Fields::new(&header, self.line);
        let width: u32 = fields.number("width")?;
        let height: u32 = fields.number("height")?;

        let mut rows = Vec::with_capacity(height as usize);
        for _ in 0..height {
            rows.push(self.expect_line("map rows")?);
        }
        Ok(Grid::from_drawing(width, height, &rows)?)
    }

    /// Reads the next turn block, or `None` once the referee closes the stream.
    pub(crate) fn next_turn(&mut self) -> Result<Option<TurnObservation>, ProtocolError> {
        let Some(header) = self.next_line()? else {
            return Ok(None);
        };
        let mut fields = Fields::new(&header, self.line);
        let scores = Scores {
            mine: fields.number("my score")?,
            opponent: fields.number("opponent score")?,
        };

        let unit_count = self.count("visible unit count")?;
        let mut units = Vec::with_capacity(unit_count);
        for _ in 0..unit_count {
            let line = self.expect_line("unit sightings")?;
            if let Some(sighting) = parse_unit(&line, self.line)? {
                units.push(sighting);
            }
        }

        let item_count = self.count("visible item count")?;
        let mut items = Vec::with_capacity(item_count);
        for _ in 0..item_count {
            let line = self.expect_line("item sightings")?;
            let mut fields = Fields::new(&line, self.line);
            let column = fields.number("item x")?;
            let row = fields.number("item y")?;
            items.push(ItemSighting {
                cell: CellCoord::new(column, row),
                value: fields.number("item value")?,
            });
        }

        Ok(Some(TurnObservation {
            scores,
            units,
            items,
        }))
    }

    fn count(&mut self, what: &'static str) -> Result<usize, ProtocolError> {
        let line = self.expect_line(what)?;
        Fields::new(&line, self.line).number(what)
    }

    fn expect_line(&mut self, what: &'static str) -> Result<String, ProtocolError> {
        self.next_line()?.ok_or(ProtocolError::UnexpectedEnd(what))
    }

    fn next_line(&mut self) -> Result<Option<String>, ProtocolError> {
        match self.lines.next() {
            Some(line) => {
                self.line += 1;
                Ok(Some(line?))
            }
            None => Ok(None),
        }
    }
}

/// Parses `id mine x y kind speed cooldown`. Dead units yield `None`.
fn parse_unit(line: &str, line_number: usize) -> Result<Option<UnitSighting>, ProtocolError> {
    let mut fields = Fields::new(line, line_number);
    let id = UnitId::new(fields.number("unit id")?);
    let owner = match fields.next("ownership flag")? {
        "1" => Owner::Mine,
        "0" => Owner::Opponent,
        other => {
            return Err(ProtocolError::InvalidOwner {
                line: line_number,
                value: other.to_owned(),
            })
        }
    };
    let column = fields.number("unit x")?;
    let row = fields.number("unit y")?;
    let kind = match fields.next("unit kind")? {
        "ROCK" => UnitKind::Rock,
        "PAPER" => UnitKind::Paper,
        "SCISSORS" => UnitKind::Scissors,
        DEAD_TOKEN => return Ok(None),
        other => {
            return Err(ProtocolError::UnknownKind {
                line: line_number,
                value: other.to_owned(),
            })
        }
    };

    Ok(Some(UnitSighting {
        id,
        owner,
        cell: CellCoord::new(column, row),
        kind,
        speed_turns_left: fields.number("speed turns left")?,
        ability_cooldown: fields.number("ability cooldown")?,
    }))
}

struct Fields<'a> {
    tokens: std::str::SplitWhitespace<'a>,
    line: usize,
}

impl<'a> Fields<'a> {
    fn new(text: &'a str, line: usize) -> Self {
        Self {
            tokens: text.split_whitespace(),
            line,
        }
    }

    fn next(&mut self, field: &'static str) -> Result<&'a str, ProtocolError> {
        self.tokens.next().ok_or(ProtocolError::MissingField {
            line: self.line,
            field,
        })
    }

    fn number<T: std::str::FromStr>(&mut self, field: &'static str) -> Result<T, ProtocolError> {
        let value = self.next(field)?;
        value.parse().map_err(|_| ProtocolError::InvalidNumber {
            line: self.line,
            field,
            value: value.to_owned(),
        })
    }
}

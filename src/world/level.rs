//! Level loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable maze files. Each row
//! is a string of whitespace separated cell tokens:
//!
//! - `.` no walls
//! - `_` wall on the low-y edge
//! - `I` wall on the low-x edge
//! - `L` both
//!
//! A trailing `*` (e.g. `I*`) marks the cell's walls as decorated.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::maze::{CellFlags, MazeGrid};
use super::solver::Facing;

/// Error type for level loading
#[derive(Debug)]
pub enum LevelError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
    Empty,
    BadToken { row: usize, column: usize, token: String },
    RaggedRow { row: usize, expected: usize, found: usize },
    OpenBoundary { x: i32, y: i32 },
    StartOutOfBounds { x: i32, y: i32 },
}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        LevelError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for LevelError {
    fn from(e: ron::error::SpannedError) -> Self {
        LevelError::ParseError(e)
    }
}

impl From<ron::Error> for LevelError {
    fn from(e: ron::Error) -> Self {
        LevelError::SerializeError(e)
    }
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::IoError(e) => write!(f, "IO error: {}", e),
            LevelError::ParseError(e) => write!(f, "Parse error: {}", e),
            LevelError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            LevelError::Empty => write!(f, "Level has no cells"),
            LevelError::BadToken { row, column, token } => {
                write!(f, "Unknown cell token '{}' at row {}, column {}", token, row, column)
            }
            LevelError::RaggedRow { row, expected, found } => {
                write!(f, "Row {} has {} cells, expected {}", row, found, expected)
            }
            LevelError::OpenBoundary { x, y } => {
                write!(f, "Border cell ({}, {}) is missing its outer wall", x, y)
            }
            LevelError::StartOutOfBounds { x, y } => {
                write!(f, "Start cell ({}, {}) is outside the maze", x, y)
            }
        }
    }
}

impl std::error::Error for LevelError {}

/// Where the camera begins its tour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartPose {
    /// Cell index, y counted from the bottom row
    pub cell: (i32, i32),
    pub facing: Facing,
}

/// A maze as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    /// Rows top first, as they read on screen
    pub rows: Vec<String>,
    pub start: StartPose,
}

impl Level {
    /// The reference 8x8 maze and its starting pose
    pub fn classic() -> Self {
        let rows = [
            "I  _  _  _  I  .  L  .",
            "L  _  _  .  .  L  .  _",
            "I  .  _  _  I  I  .  I*",
            "I  I* L  _  _  I  L  _",
            "I  L  .  L  _  .  I  _",
            "I  I  L  .  I  _  I  .",
            "I  L  .  I  L  _  _  I",
            "L  _  _  L  _  L  _  _",
        ];
        Self {
            name: "classic".to_string(),
            rows: rows.iter().map(|r| r.to_string()).collect(),
            start: StartPose { cell: (4, 0), facing: Facing::Left },
        }
    }

    /// Parse the rows into a grid and validate it
    pub fn to_grid(&self) -> Result<MazeGrid, LevelError> {
        let mut parsed = Vec::with_capacity(self.rows.len());
        for (row, line) in self.rows.iter().enumerate() {
            let cells = line
                .split_whitespace()
                .enumerate()
                .map(|(column, token)| {
                    parse_token(token).ok_or_else(|| LevelError::BadToken {
                        row,
                        column,
                        token: token.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            parsed.push(cells);
        }

        let grid = MazeGrid::from_rows(&parsed)?;
        grid.check_enclosed()?;

        let (x, y) = self.start.cell;
        if !grid.in_bounds(x, y) {
            return Err(LevelError::StartOutOfBounds { x, y });
        }

        Ok(grid)
    }
}

fn parse_token(token: &str) -> Option<CellFlags> {
    let (walls, feature) = match token.strip_suffix('*') {
        Some(rest) => (rest, true),
        None => (token, false),
    };
    let mut flags = match walls {
        "." => CellFlags::EMPTY,
        "_" => CellFlags::WALL_X,
        "I" => CellFlags::WALL_Y,
        "L" => CellFlags::WALL_X | CellFlags::WALL_Y,
        _ => return None,
    };
    if feature {
        flags |= CellFlags::FEATURE;
    }
    Some(flags)
}

/// Load a level from a RON file
pub fn load_level<P: AsRef<Path>>(path: P) -> Result<Level, LevelError> {
    let contents = fs::read_to_string(path)?;
    load_level_from_str(&contents)
}

/// Load a level from a RON string (for embedded levels or testing)
pub fn load_level_from_str(s: &str) -> Result<Level, LevelError> {
    let level: Level = ron::from_str(s)?;
    // Surface layout problems at load time rather than at first render
    level.to_grid()?;
    Ok(level)
}

/// Write a level as RON, one row string per line.
///
/// The level is validated first so a file that `load_level` would reject
/// is never written.
pub fn save_level<P: AsRef<Path>>(level: &Level, path: P) -> Result<(), LevelError> {
    level.to_grid()?;

    let pretty = ron::ser::PrettyConfig::new()
        .indentor("  ".to_string())
        .separate_tuple_members(false);
    fs::write(path, ron::ser::to_string_pretty(level, pretty)?)?;
    Ok(())
}

//! Fixed-size room grids and the entrance/exit columns derived from them.
//!
//! A room's entrances are the open cells of its first row and its exits are
//! the open cells of its last row. Both sets are computed once when the room
//! is built; two rooms compare equal only when their whole grids match.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    Blocked,
    Open,
}

impl Cell {
    pub fn glyph(self) -> char {
        match self {
            Self::Blocked => '#',
            Self::Open => '.',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '#' => Some(Self::Blocked),
            '.' => Some(Self::Open),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RoomParseError {
    #[error("room template has no rows")]
    Empty,
    #[error("unknown cell glyph {glyph:?} at row {row}, column {column}")]
    UnknownGlyph { glyph: char, row: usize, column: usize },
    #[error("row {row} has width {found}, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
}

#[derive(Clone, Debug)]
pub struct Room {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    entrances: BTreeSet<usize>,
    exits: BTreeSet<usize>,
}

impl Room {
    /// Builds a room from its rows. Rows are expected to share one width.
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.first().map_or(0, Vec::len);
        debug_assert!(rows.iter().all(|row| row.len() == width), "room rows must be rectangular");
        Self::from_cells(width, rows.into_iter().flatten().collect())
    }

    /// Builds a room from a row-major cell buffer.
    pub fn from_cells(width: usize, cells: Vec<Cell>) -> Self {
        let height = if width == 0 { 0 } else { cells.len() / width };
        debug_assert!(width == 0 || cells.len() % width == 0, "cell buffer must fill whole rows");

        let entrances = open_columns(&cells, width, 0);
        let exits =
            if height == 0 { BTreeSet::new() } else { open_columns(&cells, width, height - 1) };

        Self { width, height, cells, entrances, exits }
    }

    /// Parses a room literal: one row per non-blank line, `.` open, `#` blocked.
    /// Leading and trailing whitespace on each line is ignored.
    pub fn from_ascii(template: &str) -> Result<Self, RoomParseError> {
        let mut width = None;
        let mut cells = Vec::new();

        let lines = template.lines().map(str::trim).filter(|line| !line.is_empty());
        for (row, line) in lines.enumerate() {
            let row_start = cells.len();
            for (column, glyph) in line.chars().enumerate() {
                let cell = Cell::from_glyph(glyph)
                    .ok_or(RoomParseError::UnknownGlyph { glyph, row, column })?;
                cells.push(cell);
            }

            let found = cells.len() - row_start;
            match width {
                None => width = Some(found),
                Some(expected) if expected != found => {
                    return Err(RoomParseError::RaggedRow { row, expected, found });
                }
                Some(_) => {}
            }
        }

        let width = width.ok_or(RoomParseError::Empty)?;
        Ok(Self::from_cells(width, cells))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major view of every cell.
    pub fn grid(&self) -> &[Cell] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1))
    }

    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        if row >= self.height {
            return None;
        }
        let start = row * self.width;
        Some(&self.cells[start..start + self.width])
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<Cell> {
        if column >= self.width {
            return None;
        }
        self.row(row).map(|cells| cells[column])
    }

    pub fn entrances(&self) -> &BTreeSet<usize> {
        &self.entrances
    }

    pub fn exits(&self) -> &BTreeSet<usize> {
        &self.exits
    }

    pub fn is_traversable(&self) -> bool {
        !self.entrances.is_empty() && !self.exits.is_empty()
    }

    /// True when some exit of `self` lines up with an entrance of `next`.
    pub fn leads_into(&self, next: &Room) -> bool {
        self.exits.iter().any(|column| next.entrances.contains(column))
    }

    /// Width and height as little-endian `u64`, then one byte per cell.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(16 + self.cells.len());
        bytes.extend((self.width as u64).to_le_bytes());
        bytes.extend((self.height as u64).to_le_bytes());
        for cell in &self.cells {
            bytes.push(match cell {
                Cell::Blocked => 0,
                Cell::Open => 1,
            });
        }
        bytes
    }
}

fn open_columns(cells: &[Cell], width: usize, row: usize) -> BTreeSet<usize> {
    let start = row * width;
    cells
        .get(start..start + width)
        .map(|row_cells| {
            row_cells
                .iter()
                .enumerate()
                .filter(|(_, cell)| **cell == Cell::Open)
                .map(|(column, _)| column)
                .collect()
        })
        .unwrap_or_default()
}

// Entrances and exits are functions of the grid, so comparing the grid is enough.
impl PartialEq for Room {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.cells == other.cells
    }
}

impl Eq for Room {}

impl Hash for Room {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.width.hash(state);
        self.height.hash(state);
        self.cells.hash(state);
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, row) in self.rows().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.glyph())?;
            }
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct RoomView<'a> {
    rows: Vec<String>,
    entrances: &'a BTreeSet<usize>,
    exits: &'a BTreeSet<usize>,
}

impl Serialize for Room {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let rows = self.rows().map(|row| row.iter().map(|cell| cell.glyph()).collect()).collect();
        RoomView { rows, entrances: &self.entrances, exits: &self.exits }.serialize(serializer)
    }
}

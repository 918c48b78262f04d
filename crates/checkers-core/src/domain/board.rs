//! The board grid as the server sends it.
//!
//! A [`Board`] is a square N×N grid of [`Cell`] values indexed `[x][y]`: the
//! outer vector holds columns, the inner vectors hold the cells of one column
//! from top to bottom.  The client never edits a cell; it swaps the whole
//! board whenever the server pushes a new one.
//!
//! # Wire encoding
//!
//! On the wire a board is a JSON array of N arrays of N integers:
//!
//! | Code | Cell          |
//! |------|---------------|
//! | 0    | `EmptyDark`   |
//! | 1    | `EmptyLight`  |
//! | 2    | `PieceWhite`  |
//! | 3    | `PieceBlack`  |
//! | 4    | `KingWhite`   |
//! | 5    | `KingBlack`   |
//!
//! The dark/light distinction is cosmetic; it only changes the square colour.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::session::Side;

/// Side length of the board the client shows before any game has started.
///
/// The classic client draws a 400 px canvas with 40 px cells.
pub const DEFAULT_BOARD_SIZE: usize = 10;

/// Errors produced when a grid received from the wire is not a valid board.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// A cell code outside `0..=5`.
    #[error("unknown cell code: {0}")]
    UnknownCellCode(i64),

    /// The grid has no columns.
    #[error("board is empty")]
    Empty,

    /// A column is shorter or longer than the number of columns.
    #[error("board is not square: column {column} has {found} cells, expected {expected}")]
    NotSquare {
        column: usize,
        expected: usize,
        found: usize,
    },
}

/// The content of one square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "i64", into = "i64")]
pub enum Cell {
    /// Empty dark (playable) square.
    #[default]
    EmptyDark,
    /// Empty light square.
    EmptyLight,
    PieceWhite,
    PieceBlack,
    KingWhite,
    KingBlack,
}

impl Cell {
    /// Decodes a wire cell code.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownCellCode`] for codes outside `0..=5`.
    pub fn from_wire(code: i64) -> Result<Self, BoardError> {
        match code {
            0 => Ok(Cell::EmptyDark),
            1 => Ok(Cell::EmptyLight),
            2 => Ok(Cell::PieceWhite),
            3 => Ok(Cell::PieceBlack),
            4 => Ok(Cell::KingWhite),
            5 => Ok(Cell::KingBlack),
            other => Err(BoardError::UnknownCellCode(other)),
        }
    }

    /// Returns the wire code for this cell.
    pub fn to_wire(self) -> i64 {
        match self {
            Cell::EmptyDark => 0,
            Cell::EmptyLight => 1,
            Cell::PieceWhite => 2,
            Cell::PieceBlack => 3,
            Cell::KingWhite => 4,
            Cell::KingBlack => 5,
        }
    }

    /// `true` for both empty square kinds.
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::EmptyDark | Cell::EmptyLight)
    }

    /// The side owning the piece on this square, if any.
    pub fn owner(self) -> Option<Side> {
        match self {
            Cell::PieceWhite | Cell::KingWhite => Some(Side::White),
            Cell::PieceBlack | Cell::KingBlack => Some(Side::Black),
            Cell::EmptyDark | Cell::EmptyLight => None,
        }
    }

    /// `true` if the square holds a man or king belonging to `side`.
    pub fn is_owned_by(self, side: Side) -> bool {
        self.owner() == Some(side)
    }
}

impl TryFrom<i64> for Cell {
    type Error = BoardError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Cell::from_wire(code)
    }
}

impl From<Cell> for i64 {
    fn from(cell: Cell) -> Self {
        cell.to_wire()
    }
}

/// A validated in-bounds board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Column index (left to right).
    pub x: usize,
    /// Row index (top to bottom).
    pub y: usize,
}

impl Coord {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// A square grid of cells, replaced wholesale on every server update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Cell>>", into = "Vec<Vec<Cell>>")]
pub struct Board {
    columns: Vec<Vec<Cell>>,
}

impl Board {
    /// Creates a `size`×`size` board where every square is `EmptyDark`.
    ///
    /// This is the board the client shows before a game starts and after
    /// `reset_game`.  A `size` of zero is clamped to one.
    pub fn empty(size: usize) -> Self {
        let size = size.max(1);
        Self {
            columns: vec![vec![Cell::EmptyDark; size]; size],
        }
    }

    /// Builds a board from columns, validating that the grid is square.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Empty`] for a grid with no columns and
    /// [`BoardError::NotSquare`] if any column length differs from the number
    /// of columns.
    pub fn from_columns(columns: Vec<Vec<Cell>>) -> Result<Self, BoardError> {
        let size = columns.len();
        if size == 0 {
            return Err(BoardError::Empty);
        }
        if let Some((column, col)) = columns.iter().enumerate().find(|(_, c)| c.len() != size) {
            return Err(BoardError::NotSquare {
                column,
                expected: size,
                found: col.len(),
            });
        }
        Ok(Self { columns })
    }

    /// Builds a board from raw wire codes.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] for unknown codes or a non-square grid.
    pub fn from_codes(codes: &[Vec<i64>]) -> Result<Self, BoardError> {
        let columns = codes
            .iter()
            .map(|col| col.iter().map(|&c| Cell::from_wire(c)).collect())
            .collect::<Result<Vec<Vec<Cell>>, BoardError>>()?;
        Self::from_columns(columns)
    }

    /// Number of cells along each side.
    pub fn size(&self) -> usize {
        self.columns.len()
    }

    /// Returns the cell at `coord`, or `None` if it lies outside the grid.
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        self.columns.get(coord.x).and_then(|col| col.get(coord.y)).copied()
    }

    /// Bounds-checks signed cell indices.
    ///
    /// Returns the coordinate only when both `x` and `y` lie in `[0, size)`.
    pub fn coord(&self, x: i64, y: i64) -> Option<Coord> {
        let size = self.size() as i64;
        if (0..size).contains(&x) && (0..size).contains(&y) {
            Some(Coord::new(x as usize, y as usize))
        } else {
            None
        }
    }

    /// `true` if no square holds a piece.
    pub fn is_all_empty(&self) -> bool {
        self.columns.iter().flatten().all(|c| c.is_empty())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty(DEFAULT_BOARD_SIZE)
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Board {
    type Error = BoardError;

    fn try_from(columns: Vec<Vec<Cell>>) -> Result<Self, Self::Error> {
        Board::from_columns(columns)
    }
}

impl From<Board> for Vec<Vec<Cell>> {
    fn from(board: Board) -> Self {
        board.columns
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

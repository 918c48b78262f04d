//! Domain types shared by every layer of the client.
//!
//! Nothing in here performs I/O.  The board is only ever *replaced*, never
//! patched, so these types are mostly constructors, accessors, and the
//! validation that runs when a board arrives from the wire.

pub mod board;
pub mod geometry;
pub mod session;

pub use board::{Board, Cell, Coord, DEFAULT_BOARD_SIZE};
pub use geometry::{BoardGeometry, CellRect, DEFAULT_CELL_SIZE};
pub use session::{Phase, Side};

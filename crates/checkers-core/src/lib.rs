//! # checkers-core
//!
//! Shared library for the networked checkers client containing the board
//! model, the grid-to-pixel geometry, and the named-event wire protocol.
//!
//! This crate has zero dependencies on sockets, async runtimes, or UI
//! toolkits.  Everything in it is plain data plus pure functions, which keeps
//! the protocol rules testable without a server.
//!
//! # Architecture overview (for beginners)
//!
//! The checkers *server* owns the real game: it knows the rules, whose turn it
//! is, and who won.  The *client* is a thin relay: it shows the board the
//! server sent last, turns two mouse clicks into a `move` request, and
//! replaces its whole board whenever the server pushes a new one.
//!
//! This crate defines the vocabulary both sides share:
//!
//! - **`domain`** – The board grid (`Board`, `Cell`, `Coord`), the player side
//!   assigned by the server (`Side`), the client's connection phase (`Phase`),
//!   and `BoardGeometry`, which maps pixels to cells and back.
//!
//! - **`protocol`** – How messages travel over the socket.  Every message is a
//!   JSON object `{"event": name, "payload": value}` wrapped in a 4-byte
//!   length-prefixed frame.

pub mod domain;
pub mod protocol;

pub use domain::board::{Board, Cell, Coord, DEFAULT_BOARD_SIZE};
pub use domain::geometry::{BoardGeometry, CellRect, DEFAULT_CELL_SIZE};
pub use domain::session::{Phase, Side};
pub use protocol::codec::{decode_frame, encode_frame, FrameDecoder, ProtocolError, MAX_FRAME_LEN};
pub use protocol::messages::{events, ClientCall, Envelope};

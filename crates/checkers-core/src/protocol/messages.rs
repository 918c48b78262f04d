//! Named-event messages exchanged with the checkers server.
//!
//! Every message, in both directions, is an [`Envelope`]: a JSON object with
//! an `event` name and an arbitrary `payload`.
//!
//! ```json
//! {"event":"move","payload":[2,3,3,4]}
//! {"event":"move_response","payload":[[0,1,0],[1,0,1],[0,1,0]]}
//! {"event":"error","payload":"Invalid move"}
//! ```
//!
//! # No request/response correlation
//!
//! The protocol has no message ids.  A "response" is just another named event
//! that the client subscribed to, and server pushes arrive on the same path.
//! A caller can therefore never wait for the outcome of one particular
//! `move`; it can only react to whatever board or error arrives next.
//!
//! # Payload shapes
//!
//! | Event              | Direction       | Payload                       |
//! |--------------------|-----------------|-------------------------------|
//! | `connect_response` | server → client | integer side (0 black, 1 white) |
//! | `start_game`       | server → client | board                         |
//! | `board_response`   | server → client | board                         |
//! | `move_response`    | server → client | board                         |
//! | `reset_game`       | server → client | ignored                       |
//! | `error`            | server → client | message string                |
//! | `show_winner`      | server → client | message string                |
//! | `move`             | client → server | `[fromX, fromY, toX, toY]`    |
//! | `leave`            | client → server | `[]`                          |
//! | `socket_close`     | client → server | `[]`                          |

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::board::{Board, Coord};
use crate::domain::session::Side;
use crate::protocol::codec::ProtocolError;

/// Event names used on the wire.
pub mod events {
    /// Server assigns this client a side.
    pub const CONNECT_RESPONSE: &str = "connect_response";
    /// Server starts a game and sends the initial board.
    pub const START_GAME: &str = "start_game";
    /// Server pushes the current board.
    pub const BOARD_RESPONSE: &str = "board_response";
    /// Server sends the board after a move was applied.
    pub const MOVE_RESPONSE: &str = "move_response";
    /// Server abandons the current game (e.g. the opponent left).
    pub const RESET_GAME: &str = "reset_game";
    /// Server reports a recoverable problem, usually a rejected move.
    pub const ERROR: &str = "error";
    /// Server announces the end of the game.
    pub const SHOW_WINNER: &str = "show_winner";

    /// Client asks the server to move a piece.
    pub const MOVE: &str = "move";
    /// Client leaves the game.
    pub const LEAVE: &str = "leave";
    /// Client asks the server to tear down the socket.
    pub const SOCKET_CLOSE: &str = "socket_close";

    /// Local-only event dispatched once when the receive loop ends.
    ///
    /// Never sent on the wire.
    pub const DISCONNECT: &str = "disconnect";
}

/// One named-event message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Event name used for dispatch.
    pub event: String,
    /// Event-specific data; `null` when the sender omitted it.
    #[serde(default)]
    pub payload: Value,
}

impl Envelope {
    pub fn new(event: impl Into<String>, payload: Value) -> Self {
        Self {
            event: event.into(),
            payload,
        }
    }

    /// Envelope with a `null` payload.
    pub fn bare(event: impl Into<String>) -> Self {
        Self::new(event, Value::Null)
    }
}

// ── Client → server calls ─────────────────────────────────────────────────────

/// Calls the client issues to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCall {
    /// Move the piece at `from` to `to`.  The server decides legality.
    Move { from: Coord, to: Coord },
    /// Leave the current game.
    Leave,
    /// Request a graceful socket teardown.
    Close,
}

impl ClientCall {
    /// Event name for this call.
    pub fn event_name(&self) -> &'static str {
        match self {
            ClientCall::Move { .. } => events::MOVE,
            ClientCall::Leave => events::LEAVE,
            ClientCall::Close => events::SOCKET_CLOSE,
        }
    }

    /// JSON payload for this call.
    pub fn payload(&self) -> Value {
        match self {
            ClientCall::Move { from, to } => json!([from.x, from.y, to.x, to.y]),
            ClientCall::Leave | ClientCall::Close => json!([]),
        }
    }

    pub fn to_envelope(&self) -> Envelope {
        Envelope::new(self.event_name(), self.payload())
    }
}

// ── Server → client payload decoding ──────────────────────────────────────────

/// Decodes a board payload (`start_game`, `board_response`, `move_response`).
///
/// # Errors
///
/// Returns [`ProtocolError::InvalidPayload`] if the payload is not a square
/// grid of known cell codes.
pub fn decode_board(event: &str, payload: &Value) -> Result<Board, ProtocolError> {
    Board::deserialize(payload).map_err(|e| ProtocolError::InvalidPayload {
        event: event.to_string(),
        reason: e.to_string(),
    })
}

/// Decodes the side carried by `connect_response`.
///
/// # Errors
///
/// Returns [`ProtocolError::InvalidPayload`] if the payload is not `0` or `1`.
pub fn decode_side(event: &str, payload: &Value) -> Result<Side, ProtocolError> {
    payload
        .as_i64()
        .and_then(Side::from_wire)
        .ok_or_else(|| ProtocolError::InvalidPayload {
            event: event.to_string(),
            reason: format!("expected side 0 or 1, got {payload}"),
        })
}

/// Decodes a human-readable message (`error`, `show_winner`).
///
/// Strings are taken as-is; `null` becomes an empty string and any other
/// JSON value is rendered as compact JSON so the user still sees something.
pub fn decode_text(payload: &Value) -> String {
    match payload {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Session identity and connection phase.
//!
//! Both values describe the client's *local belief* about the session.  The
//! server is authoritative for turn order and game outcome; the client only
//! uses [`Side`] to label the window and to decide which pieces a click may
//! pick up, and [`Phase`] to decide what to draw.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The side the server assigned to this client in `connect_response`.
///
/// On the wire the side is a small integer: `0` is the first mover (black),
/// `1` is the second mover (white).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// First mover, wire value `0`.
    Black,
    /// Second mover, wire value `1`.
    White,
}

impl Side {
    /// Converts the integer color indicator sent by the server.
    ///
    /// Returns `None` for any value other than `0` or `1`.
    pub fn from_wire(value: i64) -> Option<Self> {
        match value {
            0 => Some(Side::Black),
            1 => Some(Side::White),
            _ => None,
        }
    }

    /// Returns the integer the server uses for this side.
    pub fn to_wire(self) -> i64 {
        match self {
            Side::Black => 0,
            Side::White => 1,
        }
    }

    /// Plural label used in the window title ("BLACKS" / "WHITES").
    pub fn title_label(self) -> &'static str {
        match self {
            Side::Black => "BLACKS",
            Side::White => "WHITES",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title_label())
    }
}

/// The client's connection lifecycle.
///
/// ```text
/// Disconnected ─connect ok─> Connecting ─connect_response─> WaitingForOpponent
///                                                 ▲                │ start_game
///                                     reset_game  │                ▼
///                                                 └──────────── InGame ─show_winner─> GameOver
/// ```
///
/// `reset_game` returns to `WaitingForOpponent` from any phase, and the end
/// of the receive loop returns to `Disconnected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Phase {
    /// No socket.
    #[default]
    Disconnected,
    /// Socket open, waiting for the server to assign a side.
    Connecting,
    /// Side assigned, no opponent yet (or the previous game was reset).
    WaitingForOpponent,
    /// A game is running and boards are being exchanged.
    InGame,
    /// The server announced a winner.
    GameOver,
}

impl Phase {
    /// `true` while the socket is believed to be open.
    pub fn is_connected(self) -> bool {
        !matches!(self, Phase::Disconnected)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Disconnected => "disconnected",
            Phase::Connecting => "connecting",
            Phase::WaitingForOpponent => "waiting for opponent",
            Phase::InGame => "in game",
            Phase::GameOver => "game over",
        };
        f.write_str(label)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_from_wire_zero_is_black() {
        assert_eq!(Side::from_wire(0), Some(Side::Black));
    }

    #[test]
    fn test_side_from_wire_one_is_white() {
        assert_eq!(Side::from_wire(1), Some(Side::White));
    }

    #[test]
    fn test_side_from_wire_rejects_other_values() {
        assert_eq!(Side::from_wire(2), None);
        assert_eq!(Side::from_wire(-1), None);
    }

    #[test]
    fn test_side_title_labels() {
        assert_eq!(Side::Black.title_label(), "BLACKS");
        assert_eq!(Side::White.title_label(), "WHITES");
    }

    #[test]
    fn test_phase_default_is_disconnected() {
        assert_eq!(Phase::default(), Phase::Disconnected);
        assert!(!Phase::default().is_connected());
    }

    #[test]
    fn test_phase_in_game_is_connected() {
        assert!(Phase::InGame.is_connected());
        assert!(Phase::GameOver.is_connected());
    }
}

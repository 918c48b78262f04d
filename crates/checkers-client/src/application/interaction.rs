//! Interaction Translator: pointer clicks → `move` calls.
//!
//! The client is a dumb input relay.  It does not know the rules of checkers;
//! it only knows the two-click gesture:
//!
//! 1. **First click** on one of the player's own pieces selects it.
//! 2. **Second click** anywhere on the board clears the selection and sends
//!    `move [fromX, fromY, toX, toY]`, whether or not the target looks legal.
//!    The server answers with a new board or an `error`.
//!
//! Clicks outside the board are absorbed and logged; they never touch the
//! selection and never reach the server.
//!
//! # Race avoidance
//!
//! Reading the clicked cell, reading the selection and clearing it happen in
//! one critical section of the [`GameStore`].  The call itself is issued after
//! the lock is released, so a slow socket can never hold up the receive task.

use std::sync::Arc;

use checkers_core::{BoardGeometry, ClientCall, Coord};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::application::game_state::GameStore;

/// Error type for issuing a call to the server.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CallError {
    /// The connection is closed; nothing can be sent anymore.
    #[error("connection closed")]
    Closed,
    /// The call could not be serialized.
    #[error("failed to encode call: {0}")]
    Encode(String),
}

/// Fire-and-forget access to the server.
///
/// Implemented by the network channel.  `call` must not block and must not
/// wait for a reply; replies arrive later as ordinary named events.
#[cfg_attr(test, mockall::automock)]
pub trait EventCaller: Send + Sync {
    /// Sends `{event, payload}` to the server.
    fn call(&self, event: &str, payload: Value) -> Result<(), CallError>;
}

/// Sends a typed [`ClientCall`] through any [`EventCaller`].
pub fn send_call(caller: &dyn EventCaller, call: &ClientCall) -> Result<(), CallError> {
    caller.call(call.event_name(), call.payload())
}

/// What a click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click fell outside the board.
    Ignored,
    /// The click selected one of the player's pieces.
    Selected(Coord),
    /// The click completed a gesture and a `move` call was sent.
    MoveRequested { from: Coord, to: Coord },
    /// The click completed a gesture but the call could not be sent.
    CallFailed { from: Coord, to: Coord },
    /// Nothing was selected and the square holds no piece of the player's.
    NoOp,
}

/// Translates clicks into selection changes and `move` calls.
pub struct InteractionTranslator {
    store: Arc<GameStore>,
    caller: Arc<dyn EventCaller>,
    geometry: BoardGeometry,
}

impl InteractionTranslator {
    pub fn new(store: Arc<GameStore>, caller: Arc<dyn EventCaller>, geometry: BoardGeometry) -> Self {
        Self {
            store,
            caller,
            geometry,
        }
    }

    pub fn geometry(&self) -> BoardGeometry {
        self.geometry
    }

    /// Handles a click at pixel `(pixel_x, pixel_y)`.
    pub fn on_click(&self, pixel_x: i64, pixel_y: i64) -> ClickOutcome {
        let (cell_x, cell_y) = self.geometry.cell_at(pixel_x, pixel_y);

        let decision = self.store.update_selection(|board, side, selection| {
            let Some(target) = board.coord(cell_x, cell_y) else {
                return Decision::OutOfBounds;
            };
            if let Some(from) = selection.take() {
                return Decision::Move { from, to: target };
            }
            let is_mine = match (board.get(target), side) {
                (Some(cell), Some(side)) => cell.is_owned_by(side),
                _ => false,
            };
            if is_mine {
                *selection = Some(target);
                Decision::Select(target)
            } else {
                Decision::Nothing
            }
        });

        match decision {
            Decision::OutOfBounds => {
                debug!(pixel_x, pixel_y, cell_x, cell_y, "click outside the board ignored");
                ClickOutcome::Ignored
            }
            Decision::Select(coord) => {
                debug!(x = coord.x, y = coord.y, "piece selected");
                ClickOutcome::Selected(coord)
            }
            Decision::Nothing => ClickOutcome::NoOp,
            Decision::Move { from, to } => {
                let call = ClientCall::Move { from, to };
                match send_call(self.caller.as_ref(), &call) {
                    Ok(()) => {
                        debug!(?from, ?to, "move requested");
                        ClickOutcome::MoveRequested { from, to }
                    }
                    Err(e) => {
                        warn!(?from, ?to, "failed to send move: {e}");
                        ClickOutcome::CallFailed { from, to }
                    }
                }
            }
        }
    }
}

/// Decision taken under the store lock.
enum Decision {
    OutOfBounds,
    Select(Coord),
    Move { from: Coord, to: Coord },
    Nothing,
}

// ── Tests ─────────────────────────────────────────────────────────────────────

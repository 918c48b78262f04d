//! Game State Store: the single owner of board, selection, side and phase.
//!
//! # Single-writer discipline
//!
//! Two tasks touch game state: the channel's receive task (server events) and
//! the UI task (clicks).  Both go through [`GameStore`], which keeps all state
//! behind one `std::sync::Mutex`.  Critical sections never `.await` and never
//! do I/O, so the lock is held for microseconds.
//!
//! Rendering never reads the live state.  Every mutation publishes a
//! [`UiEvent`] carrying an owned [`GameSnapshot`] on an unbounded channel, and
//! the UI task draws from those snapshots.  A redraw therefore always sees a
//! complete board, never one that is half replaced.
//!
//! # Phase transitions
//!
//! | From               | Trigger                           | To                 |
//! |--------------------|-----------------------------------|--------------------|
//! | Disconnected       | connection attempt started        | Connecting         |
//! | Connecting         | `connect_response`                | WaitingForOpponent |
//! | any                | `start_game`                      | InGame             |
//! | any                | `board_response` / `move_response`| unchanged          |
//! | any                | `reset_game`                      | WaitingForOpponent |
//! | any                | `error`                           | unchanged          |
//! | InGame             | `show_winner`                     | GameOver           |
//! | any                | receive loop ended                | Disconnected       |

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use checkers_core::{Board, Coord, Phase, Side, DEFAULT_BOARD_SIZE};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Window title before a side is assigned.
pub const BASE_TITLE: &str = "Checkers";

// ── UI-facing types ───────────────────────────────────────────────────────────

/// What kind of message is being shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// The server reported a problem (usually a rejected move).
    Error,
    /// The server announced the end of the game.
    Winner,
    /// The connection to the server ended.
    ConnectionLost,
    /// The connection could not be established.
    ConnectionFailed,
}

/// A message the player must see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// An immutable copy of the game state, safe to hand to a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub board: Board,
    pub selection: Option<Coord>,
    pub side: Option<Side>,
    pub phase: Phase,
}

/// State changes published to the UI task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The board or the selection changed; draw this snapshot.
    Redraw(GameSnapshot),
    /// No game is running; show the "waiting for opponent" screen.
    Waiting,
    /// The window title changed.
    Title(String),
    /// Show a message to the player.
    Notice(Notice),
}

// ── Store ─────────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct GameState {
    board: Board,
    selection: Option<Coord>,
    side: Option<Side>,
    phase: Phase,
}

impl GameState {
    fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.clone(),
            selection: self.selection,
            side: self.side,
            phase: self.phase,
        }
    }
}

/// Mutex-guarded owner of all client game state.
pub struct GameStore {
    state: Mutex<GameState>,
    empty_size: usize,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
}

impl GameStore {
    /// Creates a store with a `DEFAULT_BOARD_SIZE` empty board.
    ///
    /// Returns the store and the receiver the UI task reads [`UiEvent`]s from.
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<UiEvent>) {
        Self::with_board_size(DEFAULT_BOARD_SIZE)
    }

    /// Creates a store whose empty (initial and reset) board is `size`×`size`.
    pub fn with_board_size(size: usize) -> (Arc<Self>, mpsc::UnboundedReceiver<UiEvent>) {
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let store = Arc::new(Self {
            state: Mutex::new(GameState {
                board: Board::empty(size),
                selection: None,
                side: None,
                phase: Phase::Disconnected,
            }),
            empty_size: size,
            ui_tx,
        });
        (store, ui_rx)
    }

    fn lock(&self) -> MutexGuard<'_, GameState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publishes a UI event.  A closed UI channel means the UI is shutting
    /// down, which is not an error for the store.
    fn publish(&self, event: UiEvent) {
        if self.ui_tx.send(event).is_err() {
            debug!("UI channel closed; dropping UI event");
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> GameSnapshot {
        self.lock().snapshot()
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    pub fn side(&self) -> Option<Side> {
        self.lock().side
    }

    pub fn selection(&self) -> Option<Coord> {
        self.lock().selection
    }

    pub fn board(&self) -> Board {
        self.lock().board.clone()
    }

    // ── Local connection facts ────────────────────────────────────────────────

    /// A connection attempt is starting: `Disconnected → Connecting`.
    ///
    /// Called before the channel's receive task exists, so that an early
    /// `connect_response` always finds the store in `Connecting`.
    pub fn mark_connecting(&self) {
        let mut state = self.lock();
        if state.phase == Phase::Disconnected {
            state.phase = Phase::Connecting;
            info!("connecting; waiting for side assignment");
        } else {
            warn!(phase = %state.phase, "connect reported while already connected");
        }
    }

    /// The receive loop ended: the session is over.
    pub fn connection_lost(&self) {
        let mut state = self.lock();
        if state.phase == Phase::Disconnected {
            return;
        }
        state.phase = Phase::Disconnected;
        state.selection = None;
        info!("connection to server lost");
        self.publish(UiEvent::Notice(Notice::new(
            NoticeKind::ConnectionLost,
            "Connection to the server was lost",
        )));
    }

    /// The connection could not be established.  Surfaced to the player
    /// before the client tears down.
    pub fn connection_failed(&self, message: impl Into<String>) {
        let mut state = self.lock();
        state.phase = Phase::Disconnected;
        self.publish(UiEvent::Notice(Notice::new(
            NoticeKind::ConnectionFailed,
            message,
        )));
    }

    // ── Server events ─────────────────────────────────────────────────────────

    /// `connect_response`: record the assigned side.
    ///
    /// The side is learned once; a later, different assignment is ignored.
    pub fn assign_side(&self, side: Side) {
        let mut state = self.lock();
        match state.side {
            None => {
                state.side = Some(side);
                info!(side = %side, "server assigned side");
                self.publish(UiEvent::Title(format!("{BASE_TITLE} - {}", side.title_label())));
            }
            Some(existing) if existing != side => {
                warn!(assigned = %existing, received = %side, "ignoring side reassignment");
            }
            Some(_) => {}
        }
        if state.phase == Phase::Connecting {
            state.phase = Phase::WaitingForOpponent;
        } else {
            debug!(phase = %state.phase, "connect_response outside Connecting; phase unchanged");
        }
    }

    /// `start_game`: install the opening board and enter `InGame`.
    pub fn start_game(&self, board: Board) {
        let mut state = self.lock();
        if state.phase != Phase::WaitingForOpponent {
            debug!(phase = %state.phase, "start_game outside WaitingForOpponent");
        }
        state.board = board;
        state.phase = Phase::InGame;
        info!(size = state.board.size(), "game started");
        self.publish(UiEvent::Redraw(state.snapshot()));
    }

    /// `board_response` / `move_response`: replace the board wholesale.
    pub fn replace_board(&self, board: Board) {
        let mut state = self.lock();
        state.board = board;
        debug!(phase = %state.phase, "board replaced");
        self.publish(UiEvent::Redraw(state.snapshot()));
    }

    /// `reset_game`: empty board, no selection, back to waiting.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.board = Board::empty(self.empty_size);
        state.selection = None;
        state.phase = Phase::WaitingForOpponent;
        info!("game reset; waiting for opponent");
        self.publish(UiEvent::Waiting);
    }

    /// `error`: show the message, change nothing else.
    pub fn report_error(&self, message: impl Into<String>) {
        let message = message.into();
        info!(%message, "server reported error");
        self.publish(UiEvent::Notice(Notice::new(NoticeKind::Error, message)));
    }

    /// `show_winner`: show the message and, if a game was running, end it.
    pub fn announce_winner(&self, message: impl Into<String>) {
        let message = message.into();
        let mut state = self.lock();
        if state.phase == Phase::InGame {
            state.phase = Phase::GameOver;
        } else {
            debug!(phase = %state.phase, "show_winner outside InGame; phase unchanged");
        }
        info!(%message, "winner announced");
        self.publish(UiEvent::Notice(Notice::new(NoticeKind::Winner, message)));
    }

    // ── Selection ─────────────────────────────────────────────────────────────

    /// Runs `f` on the board, side and selection under the store lock.
    ///
    /// This is how the interaction translator reads a cell and updates the
    /// selection in one atomic step.  A redraw is published if the selection
    /// changed.
    pub fn update_selection<R>(
        &self,
        f: impl FnOnce(&Board, Option<Side>, &mut Option<Coord>) -> R,
    ) -> R {
        let mut state = self.lock();
        let before = state.selection;
        let GameState {
            board,
            side,
            selection,
            ..
        } = &mut *state;
        let result = f(board, *side, selection);
        if state.selection != before {
            self.publish(UiEvent::Redraw(state.snapshot()));
        }
        result
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

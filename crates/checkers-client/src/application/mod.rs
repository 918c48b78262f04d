//! Application layer use cases for the client.
//!
//! # What lives here?
//!
//! - **`dispatcher`** – Routes each inbound named event to the one handler
//!   registered for that name.  Unknown names are dropped.
//!
//! - **`game_state`** – The `GameStore`: the only owner of the board, the
//!   selection, the assigned side, and the connection phase.  Every mutation
//!   happens under one mutex and is announced to the UI as a `UiEvent`.
//!
//! - **`interaction`** – Turns a pointer position into a board square and
//!   applies the two-click select-then-move gesture.
//!
//! - **`bootstrap`** – Wires the server's event names to store operations.
//!
//! **Dependency rule**: this layer depends on `checkers_core` only.  The
//! network channel reaches it through the [`EventCaller`] trait.

pub mod bootstrap;
pub mod dispatcher;
pub mod game_state;
pub mod interaction;

pub use bootstrap::register_handlers;
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use game_state::{GameSnapshot, GameStore, Notice, NoticeKind, UiEvent};
pub use interaction::{CallError, ClickOutcome, EventCaller, InteractionTranslator};

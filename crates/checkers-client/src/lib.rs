//! checkers-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does checkers-client do? (for beginners)
//!
//! The client is the player's window onto a game that lives on the server.
//! It never decides whether a move is legal.  Instead it:
//!
//! 1. Connects to the server over TCP and waits for `connect_response`, which
//!    tells it whether it plays black or white.
//! 2. Replaces its whole board every time the server pushes one
//!    (`start_game`, `board_response`, `move_response`).
//! 3. Turns two clicks into one `move` call: the first click picks up one of
//!    the player's pieces, the second click names the target square.
//! 4. Shows `error` and `show_winner` messages to the player.
//! 5. On exit, tells the server it is leaving and closes the socket.
//!
//! # Threads of control
//!
//! ```text
//!  UI task (main)                          receive task (Channel)
//!  ──────────────                          ──────────────────────
//!  click ─> InteractionTranslator          socket ─> FrameDecoder
//!             │  call("move")                            │
//!             ▼                                          ▼
//!        Channel writer ──── TCP ──── server ──────> Dispatcher
//!                                                        │
//!  RenderAdapter <── UiEvent (mpsc) <──────────── GameStore (Mutex)
//! ```

/// Application layer: dispatcher, game state store, click translation.
pub mod application;

/// Infrastructure layer: TCP channel and render adapters.
pub mod infrastructure;

//! Wires the server's named events to [`GameStore`] operations.
//!
//! Each handler decodes its payload with the typed helpers in
//! `checkers_core::protocol::messages` and calls exactly one store method.
//! A payload that fails to decode is logged and dropped; the store is left
//! untouched.

use std::sync::Arc;

use checkers_core::{
    events,
    protocol::messages::{decode_board, decode_side, decode_text},
};
use tracing::warn;

use crate::application::dispatcher::Dispatcher;
use crate::application::game_state::GameStore;

/// Registers one handler per server event (plus the local `disconnect`).
pub fn register_handlers(dispatcher: &Dispatcher, store: Arc<GameStore>) {
    let s = Arc::clone(&store);
    dispatcher.on(events::CONNECT_RESPONSE, move |payload, raw| {
        match decode_side(&raw.event, payload) {
            Ok(side) => s.assign_side(side),
            Err(e) => warn!("dropping connect_response: {e}"),
        }
    });

    let s = Arc::clone(&store);
    dispatcher.on(events::START_GAME, move |payload, raw| {
        match decode_board(&raw.event, payload) {
            Ok(board) => s.start_game(board),
            Err(e) => warn!("dropping start_game: {e}"),
        }
    });

    for event in [events::BOARD_RESPONSE, events::MOVE_RESPONSE] {
        let s = Arc::clone(&store);
        dispatcher.on(event, move |payload, raw| {
            match decode_board(&raw.event, payload) {
                Ok(board) => s.replace_board(board),
                Err(e) => warn!("dropping {}: {e}", raw.event),
            }
        });
    }

    let s = Arc::clone(&store);
    dispatcher.on(events::RESET_GAME, move |_, _| s.reset());

    let s = Arc::clone(&store);
    dispatcher.on(events::ERROR, move |payload, _| s.report_error(decode_text(payload)));

    let s = Arc::clone(&store);
    dispatcher.on(events::SHOW_WINNER, move |payload, _| {
        s.announce_winner(decode_text(payload))
    });

    dispatcher.on(events::DISCONNECT, move |_, _| store.connection_lost());
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dispatcher::DispatchOutcome;
    use crate::application::game_state::{Notice, NoticeKind, UiEvent};
    use checkers_core::{Board, Cell, Coord, Envelope, Phase, Side};
    use serde_json::json;

    fn wired() -> (
        Dispatcher,
        Arc<GameStore>,
        tokio::sync::mpsc::UnboundedReceiver<UiEvent>,
    ) {
        let dispatcher = Dispatcher::new();
        let (store, rx) = GameStore::new();
        register_handlers(&dispatcher, Arc::clone(&store));
        store.mark_connecting();
        (dispatcher, store, rx)
    }

    #[test]
    fn test_all_server_events_are_registered() {
        let (dispatcher, _store, _rx) = wired();
        for event in [
            events::CONNECT_RESPONSE,
            events::START_GAME,
            events::BOARD_RESPONSE,
            events::MOVE_RESPONSE,
            events::RESET_GAME,
            events::ERROR,
            events::SHOW_WINNER,
            events::DISCONNECT,
        ] {
            assert!(dispatcher.is_registered(event), "{event} must be wired");
        }
    }

    #[test]
    fn test_connect_response_then_5x5_start_game_is_in_game() {
        // Arrange
        let (dispatcher, store, _rx) = wired();
        let grid = vec![vec![0i64; 5]; 5];

        // Act
        dispatcher.dispatch(&Envelope::new(events::CONNECT_RESPONSE, json!(0)));
        dispatcher.dispatch(&Envelope::new(events::START_GAME, json!(grid)));

        // Assert
        assert_eq!(store.phase(), Phase::InGame);
        assert_eq!(store.side(), Some(Side::Black));
        assert_eq!(store.board(), Board::from_codes(&grid).unwrap());
    }

    #[test]
    fn test_every_board_event_installs_exact_grid() {
        let (dispatcher, store, _rx) = wired();
        for (i, event) in [events::START_GAME, events::BOARD_RESPONSE, events::MOVE_RESPONSE]
            .into_iter()
            .enumerate()
        {
            // Arrange: a distinct board per event
            let size = 6 + i;
            let mut grid = vec![vec![1i64; size]; size];
            grid[i][i] = Cell::KingWhite.to_wire();

            // Act
            dispatcher.dispatch(&Envelope::new(event, json!(grid)));

            // Assert
            assert_eq!(store.board(), Board::from_codes(&grid).unwrap(), "{event}");
        }
    }

    #[test]
    fn test_error_while_in_game_leaves_state_and_notifies_once() {
        // Arrange
        let (dispatcher, store, mut rx) = wired();
        let mut grid = vec![vec![0i64; 8]; 8];
        grid[2][5] = Cell::PieceBlack.to_wire();
        dispatcher.dispatch(&Envelope::new(events::CONNECT_RESPONSE, json!(0)));
        dispatcher.dispatch(&Envelope::new(events::START_GAME, json!(grid)));
        store.update_selection(|_, _, sel| *sel = Some(Coord::new(2, 5)));
        let before = store.snapshot();
        while rx.try_recv().is_ok() {}

        // Act
        dispatcher.dispatch(&Envelope::new(events::ERROR, json!("Invalid move")));

        // Assert
        assert_eq!(store.snapshot(), before);
        assert_eq!(
            rx.try_recv().ok(),
            Some(UiEvent::Notice(Notice::new(NoticeKind::Error, "Invalid move")))
        );
        assert!(rx.try_recv().is_err(), "notice must be surfaced exactly once");
    }

    #[test]
    fn test_malformed_board_payload_leaves_board_unchanged() {
        let (dispatcher, store, _rx) = wired();
        let before = store.board();

        dispatcher.dispatch(&Envelope::new(events::MOVE_RESPONSE, json!([[0, 0], [0]])));
        dispatcher.dispatch(&Envelope::new(events::BOARD_RESPONSE, json!("garbage")));

        assert_eq!(store.board(), before);
    }

    #[test]
    fn test_unknown_event_never_mutates_store() {
        let (dispatcher, store, mut rx) = wired();
        let before = store.snapshot();
        while rx.try_recv().is_ok() {}

        let outcome = dispatcher.dispatch(&Envelope::new("spectator_joined", json!({"n": 1})));

        assert_eq!(outcome, DispatchOutcome::Unhandled);
        assert_eq!(store.snapshot(), before);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_reset_game_without_payload_resets() {
        let (dispatcher, store, _rx) = wired();
        dispatcher.dispatch(&Envelope::new(events::START_GAME, json!([[3]])));

        dispatcher.dispatch(&Envelope::bare(events::RESET_GAME));

        assert!(store.board().is_all_empty());
        assert_eq!(store.phase(), Phase::WaitingForOpponent);
    }

    #[test]
    fn test_show_winner_ends_game() {
        let (dispatcher, store, _rx) = wired();
        dispatcher.dispatch(&Envelope::new(events::START_GAME, json!([[0]])));
        dispatcher.dispatch(&Envelope::new(events::SHOW_WINNER, json!("WHITES win")));
        assert_eq!(store.phase(), Phase::GameOver);
    }

    #[test]
    fn test_local_disconnect_marks_store_disconnected() {
        let (dispatcher, store, _rx) = wired();
        dispatcher.dispatch(&Envelope::bare(events::DISCONNECT));
        assert_eq!(store.phase(), Phase::Disconnected);
    }
}

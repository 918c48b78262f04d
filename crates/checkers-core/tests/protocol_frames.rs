//! Integration tests for the checkers-core wire protocol.
//!
//! These tests go through the public API only: build a server message the way
//! the server would, frame it, stream it through a [`FrameDecoder`] in
//! awkward chunk sizes, and decode the typed payload on the other side.

use checkers_core::{
    encode_frame, events,
    protocol::messages::{decode_board, decode_side, decode_text},
    Board, Cell, ClientCall, Coord, Envelope, FrameDecoder, Side,
};
use serde_json::json;

/// Feeds `bytes` to a fresh decoder in chunks of `chunk` bytes and collects
/// every envelope produced.
fn stream_through_decoder(bytes: &[u8], chunk: usize) -> Vec<Envelope> {
    let mut decoder = FrameDecoder::new();
    let mut out = Vec::new();
    for piece in bytes.chunks(chunk) {
        decoder.extend(piece);
        while let Some(env) = decoder.next_frame().expect("frames are well formed") {
            out.push(env);
        }
    }
    out
}

#[test]
fn test_server_session_script_decodes_in_order_for_any_chunking() {
    // Arrange: the messages a server sends at the start of a game
    let mut start_board = vec![vec![0i64; 5]; 5];
    start_board[0][0] = 3;
    start_board[4][4] = 2;
    let script = [
        Envelope::new(events::CONNECT_RESPONSE, json!(0)),
        Envelope::new(events::START_GAME, json!(start_board)),
        Envelope::new(events::ERROR, json!("Invalid move")),
        Envelope::bare(events::RESET_GAME),
    ];
    let bytes: Vec<u8> = script
        .iter()
        .flat_map(|env| encode_frame(env).expect("encode"))
        .collect();

    for chunk in [1, 3, 7, 64, bytes.len()] {
        // Act
        let decoded = stream_through_decoder(&bytes, chunk);

        // Assert
        assert_eq!(decoded, script, "chunk size {chunk} must not change the result");
    }
}

#[test]
fn test_start_game_payload_decodes_to_exact_board() {
    // Arrange
    let mut codes = vec![vec![0i64; 5]; 5];
    codes[1][2] = 5;
    let env = Envelope::new(events::START_GAME, json!(codes));
    let bytes = encode_frame(&env).unwrap();

    // Act
    let decoded = stream_through_decoder(&bytes, 4).remove(0);
    let board = decode_board(&decoded.event, &decoded.payload).unwrap();

    // Assert
    assert_eq!(board, Board::from_codes(&codes).unwrap());
    assert_eq!(board.get(Coord::new(1, 2)), Some(Cell::KingBlack));
}

#[test]
fn test_connect_response_payload_decodes_to_side() {
    let env = Envelope::new(events::CONNECT_RESPONSE, json!(1));
    assert_eq!(decode_side(&env.event, &env.payload).unwrap(), Side::White);
}

#[test]
fn test_show_winner_text_survives_framing() {
    let env = Envelope::new(events::SHOW_WINNER, json!("BLACKS win!"));
    let decoded = stream_through_decoder(&encode_frame(&env).unwrap(), 2).remove(0);
    assert_eq!(decode_text(&decoded.payload), "BLACKS win!");
}

#[test]
fn test_client_move_call_frame_matches_wire_shape() {
    // Arrange
    let call = ClientCall::Move {
        from: Coord::new(0, 0),
        to: Coord::new(1, 1),
    };

    // Act
    let bytes = encode_frame(&call.to_envelope()).unwrap();

    // Assert: the JSON body is exactly what the server expects
    let body: serde_json::Value = serde_json::from_slice(&bytes[4..]).unwrap();
    assert_eq!(body, json!({"event": "move", "payload": [0, 0, 1, 1]}));
}

//! Recording render adapter for unit and integration tests.
//!
//! `RecordingRenderer` draws nothing.  Each call is pushed onto `calls` so a
//! test can assert exactly what the player would have seen, and in what order.
//!
//! # `should_fail` flag
//!
//! Set `should_fail = true` to make every method return an I/O error, which
//! exercises the UI loop's error path without a broken terminal.

use std::io;

use super::RenderAdapter;
use crate::application::game_state::{GameSnapshot, Notice};

/// One recorded renderer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCall {
    Board(GameSnapshot),
    Waiting,
    Title(String),
    Notice(Notice),
}

/// A renderer that records every call.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    /// Calls in the order they were made.
    pub calls: Vec<RenderCall>,
    /// When `true`, every method returns an error instead of recording.
    pub should_fail: bool,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently drawn board, if any.
    pub fn last_board(&self) -> Option<&GameSnapshot> {
        self.calls.iter().rev().find_map(|call| match call {
            RenderCall::Board(snapshot) => Some(snapshot),
            _ => None,
        })
    }

    /// Every notice shown so far.
    pub fn notices(&self) -> Vec<&Notice> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RenderCall::Notice(notice) => Some(notice),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, call: RenderCall) -> io::Result<()> {
        if self.should_fail {
            return Err(io::Error::new(io::ErrorKind::Other, "mock renderer failure"));
        }
        self.calls.push(call);
        Ok(())
    }
}

impl RenderAdapter for RecordingRenderer {
    fn draw_board(&mut self, snapshot: &GameSnapshot) -> io::Result<()> {
        self.record(RenderCall::Board(snapshot.clone()))
    }

    fn draw_waiting(&mut self) -> io::Result<()> {
        self.record(RenderCall::Waiting)
    }

    fn set_title(&mut self, title: &str) -> io::Result<()> {
        self.record(RenderCall::Title(title.to_string()))
    }

    fn show_notice(&mut self, notice: &Notice) -> io::Result<()> {
        self.record(RenderCall::Notice(notice.clone()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Render adapters: turn [`UiEvent`]s into something the player can see.
//!
//! The UI task owns exactly one [`RenderAdapter`] and feeds it every event
//! published by the `GameStore`.  Adapters never read live game state; each
//! redraw receives its own [`GameSnapshot`].
//!
//! # Implementations
//!
//! - [`TerminalRenderer`] draws an ASCII board to any `io::Write`.
//! - [`mock::RecordingRenderer`] records calls for tests.

pub mod mock;

use std::io::{self, Write};

use checkers_core::{BoardGeometry, Cell, Coord};

use crate::application::game_state::{GameSnapshot, Notice, NoticeKind, UiEvent, BASE_TITLE};

/// Something that can present the game to the player.
pub trait RenderAdapter {
    /// Draws the board, marking the selected square if there is one.
    fn draw_board(&mut self, snapshot: &GameSnapshot) -> io::Result<()>;

    /// Shows the "waiting for opponent" screen.
    fn draw_waiting(&mut self) -> io::Result<()>;

    /// Changes the title shown by later frames.
    fn set_title(&mut self, title: &str) -> io::Result<()>;

    /// Shows a message the player must acknowledge.
    fn show_notice(&mut self, notice: &Notice) -> io::Result<()>;

    /// Routes one store event to the matching method.
    fn apply(&mut self, event: UiEvent) -> io::Result<()> {
        match event {
            UiEvent::Redraw(snapshot) => self.draw_board(&snapshot),
            UiEvent::Waiting => self.draw_waiting(),
            UiEvent::Title(title) => self.set_title(&title),
            UiEvent::Notice(notice) => self.show_notice(&notice),
        }
    }
}

/// What the UI loop does after presenting one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presented {
    /// Keep reading events.
    Continue,
    /// The connection-lost notice has been shown; the session is over.
    SessionEnded,
}

/// Presents one store event and reports whether the session has ended.
///
/// The connection-lost notice is the last event the store publishes for a
/// session, so every board and notice queued before it has been drawn by the
/// time this returns [`Presented::SessionEnded`].
pub fn present<R>(renderer: &mut R, event: UiEvent) -> io::Result<Presented>
where
    R: RenderAdapter + ?Sized,
{
    let ends_session =
        matches!(&event, UiEvent::Notice(notice) if notice.kind == NoticeKind::ConnectionLost);
    renderer.apply(event)?;
    Ok(if ends_session {
        Presented::SessionEnded
    } else {
        Presented::Continue
    })
}

// ── Terminal renderer ─────────────────────────────────────────────────────────

/// ASCII renderer.
///
/// ```text
/// == Checkers - BLACKS ==
/// in game | you: BLACKS | 120x120 px canvas, 40 px squares
///     0 1 2
///  0  . b .
///  1 *b   w
///  2  . B .
/// ```
///
/// `.` is a dark square, a blank is a light square, `b`/`w` are men and
/// `B`/`W` kings.  `*` precedes the selected square.
pub struct TerminalRenderer<W: Write> {
    out: W,
    geometry: BoardGeometry,
    title: String,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, geometry: BoardGeometry) -> Self {
        Self {
            out,
            geometry,
            title: BASE_TITLE.to_string(),
        }
    }

    /// Current window title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_title(&mut self) -> io::Result<()> {
        writeln!(self.out, "== {} ==", self.title)
    }
}

/// Character used for one square.
fn glyph(cell: Cell) -> char {
    match cell {
        Cell::EmptyDark => '.',
        Cell::EmptyLight => ' ',
        Cell::PieceBlack => 'b',
        Cell::PieceWhite => 'w',
        Cell::KingBlack => 'B',
        Cell::KingWhite => 'W',
    }
}

impl<W: Write> RenderAdapter for TerminalRenderer<W> {
    fn draw_board(&mut self, snapshot: &GameSnapshot) -> io::Result<()> {
        let board = &snapshot.board;
        let size = board.size();
        let canvas = self.geometry.canvas_size(size);
        let side = snapshot.side.map_or("unassigned", |s| s.title_label());

        self.write_title()?;
        writeln!(
            self.out,
            "{} | you: {} | {canvas}x{canvas} px canvas, {} px squares",
            snapshot.phase,
            side,
            self.geometry.cell_size()
        )?;

        let mut header = String::from("   ");
        for x in 0..size {
            header.push_str(&format!("{x:>2}"));
        }
        writeln!(self.out, "{header}")?;

        for y in 0..size {
            let mut row = format!("{y:>2} ");
            for x in 0..size {
                let coord = Coord::new(x, y);
                row.push(if snapshot.selection == Some(coord) { '*' } else { ' ' });
                row.push(board.get(coord).map_or('?', glyph));
            }
            writeln!(self.out, "{}", row.trim_end())?;
        }
        self.out.flush()
    }

    fn draw_waiting(&mut self) -> io::Result<()> {
        self.write_title()?;
        writeln!(self.out, "Waiting for opponent...")?;
        self.out.flush()
    }

    fn set_title(&mut self, title: &str) -> io::Result<()> {
        self.title = title.to_string();
        Ok(())
    }

    fn show_notice(&mut self, notice: &Notice) -> io::Result<()> {
        let tag = match notice.kind {
            NoticeKind::Error => "error",
            NoticeKind::Winner => "winner",
            NoticeKind::ConnectionLost => "disconnected",
            NoticeKind::ConnectionFailed => "connection failed",
        };
        writeln!(self.out, "[{tag}] {}", notice.message)?;
        self.out.flush()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::GameStore;
    use checkers_core::{Board, Phase, Side};

    fn render(f: impl FnOnce(&mut TerminalRenderer<Vec<u8>>) -> io::Result<()>) -> String {
        let mut renderer = TerminalRenderer::new(Vec::new(), BoardGeometry::new(40));
        f(&mut renderer).unwrap();
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_draw_board_marks_pieces_kings_and_selection() {
        // Arrange: column-major, so codes[x][y]
        let board = Board::from_codes(&[vec![0, 3], vec![1, 4]]).unwrap();
        let snapshot = GameSnapshot {
            board,
            selection: Some(Coord::new(0, 1)),
            side: Some(Side::Black),
            phase: Phase::InGame,
        };

        // Act
        let out = render(|r| r.draw_board(&snapshot));

        // Assert
        assert_eq!(
            out,
            "== Checkers ==\n\
             in game | you: BLACKS | 80x80 px canvas, 40 px squares\n    \
             0 1\n \
             0  .\n \
             1 *b W\n"
        );
    }

    #[test]
    fn test_draw_board_before_side_assignment_says_unassigned() {
        let snapshot = GameSnapshot {
            board: Board::empty(1),
            selection: None,
            side: None,
            phase: Phase::Connecting,
        };

        let out = render(|r| r.draw_board(&snapshot));

        assert!(out.contains("connecting | you: unassigned"));
    }

    #[test]
    fn test_set_title_is_used_by_later_frames() {
        let out = render(|r| {
            r.set_title("Checkers - WHITES")?;
            r.draw_waiting()
        });

        assert_eq!(
            out,
            "== Checkers - WHITES ==\nWaiting for opponent...\n"
        );
    }

    #[test]
    fn test_show_notice_tags_by_kind() {
        let out = render(|r| {
            r.show_notice(&Notice::new(NoticeKind::Error, "Invalid move"))?;
            r.show_notice(&Notice::new(NoticeKind::Winner, "BLACKS win"))
        });

        assert_eq!(out, "[error] Invalid move\n[winner] BLACKS win\n");
    }

    #[test]
    fn test_set_title_alone_prints_nothing() {
        let out = render(|r| r.set_title("Checkers - BLACKS"));
        assert_eq!(out, "");
    }

    #[test]
    fn test_present_draws_everything_queued_before_connection_lost() {
        // Arrange: the server pushed a board, announced a winner and closed
        // before the UI task drew anything
        let (store, mut rx) = GameStore::new();
        store.mark_connecting();
        store.start_game(Board::empty(3));
        store.replace_board(Board::empty(4));
        store.announce_winner("BLACKS win");
        store.connection_lost();
        assert_eq!(store.phase(), Phase::Disconnected);
        let mut renderer = mock::RecordingRenderer::new();

        // Act
        let mut outcomes = Vec::new();
        while let Ok(event) = rx.try_recv() {
            outcomes.push(present(&mut renderer, event).unwrap());
        }

        // Assert: only the final notice ends the session, and nothing was skipped
        assert_eq!(outcomes.last(), Some(&Presented::SessionEnded));
        assert!(outcomes[..outcomes.len() - 1]
            .iter()
            .all(|o| *o == Presented::Continue));
        assert_eq!(renderer.last_board().map(|s| s.board.size()), Some(4));
        let kinds: Vec<NoticeKind> = renderer.notices().iter().map(|n| n.kind).collect();
        assert_eq!(kinds, vec![NoticeKind::Winner, NoticeKind::ConnectionLost]);
    }

    #[test]
    fn test_present_propagates_render_failure() {
        let mut renderer = mock::RecordingRenderer {
            should_fail: true,
            ..Default::default()
        };
        assert!(present(&mut renderer, UiEvent::Waiting).is_err());
    }

    #[test]
    fn test_apply_routes_each_event() {
        let mut renderer = mock::RecordingRenderer::new();

        renderer.apply(UiEvent::Waiting).unwrap();
        renderer.apply(UiEvent::Title("Checkers - BLACKS".into())).unwrap();

        assert_eq!(
            renderer.calls,
            vec![
                mock::RenderCall::Waiting,
                mock::RenderCall::Title("Checkers - BLACKS".into())
            ]
        );
    }
}

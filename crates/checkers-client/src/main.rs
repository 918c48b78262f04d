//! Checkers network client: entry point.
//!
//! Connects to a checkers server, mirrors the board it pushes, and turns
//! clicks into `move` calls.  The terminal front-end draws the board as ASCII
//! and reads clicks from stdin.
//!
//! # Usage
//!
//! ```text
//! checkers-client [HOST] [PORT] [OPTIONS]
//!
//! Arguments:
//!   [HOST]  Server host name or IP [default: 127.0.0.1]
//!   [PORT]  Server TCP port [default: 5555]
//!
//! Options:
//!   --cell-size <PX>          Square size in pixels [default: 40]
//!   --connect-timeout <SECS>  Connection timeout [default: 10]
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable                   | Default     | Description                |
//! |----------------------------|-------------|----------------------------|
//! | `CHECKERS_HOST`            | `127.0.0.1` | Server host                |
//! | `CHECKERS_PORT`            | `5555`      | Server port                |
//! | `CHECKERS_CELL_SIZE`       | `40`        | Square size in pixels      |
//! | `CHECKERS_CONNECT_TIMEOUT` | `10`        | Connect timeout in seconds |
//!
//! # Input
//!
//! Each stdin line `<pixel_x> <pixel_y>` is one click on the board canvas,
//! where square `(x, y)` covers pixels `x*cell..(x+1)*cell` horizontally and
//! `y*cell..(y+1)*cell` vertically.  `quit` or end of input exits.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use checkers_client::application::{
    interaction::send_call, register_handlers, Dispatcher, EventCaller,
    GameStore, InteractionTranslator, UiEvent,
};
use checkers_client::infrastructure::{
    network::{Channel, ChannelConfig, DEFAULT_HOST, DEFAULT_PORT},
    render::{present, Presented, RenderAdapter, TerminalRenderer},
};
use checkers_core::{BoardGeometry, ClientCall, DEFAULT_CELL_SIZE};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Networked checkers client.
#[derive(Debug, Parser)]
#[command(
    name = "checkers-client",
    about = "Terminal client for a networked checkers server",
    version
)]
struct Cli {
    /// Server host name or IP address.
    #[arg(default_value = DEFAULT_HOST, env = "CHECKERS_HOST")]
    host: String,

    /// Server TCP port.
    #[arg(default_value_t = DEFAULT_PORT, env = "CHECKERS_PORT")]
    port: u16,

    /// Side length of one board square in pixels.
    #[arg(long, default_value_t = DEFAULT_CELL_SIZE, env = "CHECKERS_CELL_SIZE")]
    cell_size: u32,

    /// Seconds to wait for the server to accept the connection.
    #[arg(long, default_value_t = 10, env = "CHECKERS_CONNECT_TIMEOUT")]
    connect_timeout: u64,
}

/// Settings for one client run.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ClientConfig {
    channel: ChannelConfig,
    geometry: BoardGeometry,
}

impl Cli {
    /// Converts the parsed CLI arguments into a [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error for an empty host, a zero cell size, or a zero
    /// connect timeout.
    fn into_config(self) -> anyhow::Result<ClientConfig> {
        let host = self.host.trim().to_string();
        anyhow::ensure!(!host.is_empty(), "server host must not be empty");
        anyhow::ensure!(self.cell_size > 0, "--cell-size must be at least 1 pixel");
        anyhow::ensure!(
            self.connect_timeout > 0,
            "--connect-timeout must be at least 1 second"
        );

        Ok(ClientConfig {
            channel: ChannelConfig {
                host,
                port: self.port,
                connect_timeout: Duration::from_secs(self.connect_timeout),
                ..ChannelConfig::default()
            },
            geometry: BoardGeometry::new(self.cell_size),
        })
    }
}

/// One parsed stdin line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Click { x: i64, y: i64 },
    Quit,
    Blank,
    Invalid,
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Blank;
    }
    if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
        return Command::Quit;
    }
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(x), Some(y), None) => match (x.parse(), y.parse()) {
            (Ok(x), Ok(y)) => Command::Click { x, y },
            _ => Command::Invalid,
        },
        _ => Command::Invalid,
    }
}

/// Renders every UI event already queued.
fn drain_ui(
    ui_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    renderer: &mut impl RenderAdapter,
) -> std::io::Result<()> {
    while let Ok(event) = ui_rx.try_recv() {
        renderer.apply(event)?;
    }
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// # What happens at startup
///
/// 1. Logging goes to stderr so it does not interleave with the board on
///    stdout.  `RUST_LOG` sets the level (default `info`).
/// 2. CLI arguments become a [`ClientConfig`].
/// 3. The store, dispatcher and handlers are wired before connecting, so no
///    server event can arrive unhandled.
/// 4. A failed connection is shown to the player and ends the process.
/// 5. Otherwise the UI loop runs until `quit`, end of input, Ctrl+C, or the
///    server closing the connection.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_config()?;
    let addr = config.channel.addr();
    info!("checkers client starting; server={addr}");

    // ── Wiring ────────────────────────────────────────────────────────────────
    let (store, mut ui_rx) = GameStore::new();
    let dispatcher = Arc::new(Dispatcher::new());
    register_handlers(&dispatcher, Arc::clone(&store));

    let mut renderer = TerminalRenderer::new(std::io::stdout(), config.geometry);
    renderer.draw_waiting().context("failed to draw")?;

    // ── Connect ───────────────────────────────────────────────────────────────
    store.mark_connecting();
    let channel = match Channel::connect(&config.channel, Arc::clone(&dispatcher)).await {
        Ok(channel) => Arc::new(channel),
        Err(e) => {
            error!("{e}");
            store.connection_failed(e.to_string());
            drain_ui(&mut ui_rx, &mut renderer).context("failed to draw")?;
            return Err(e).with_context(|| format!("could not connect to {addr}"));
        }
    };

    let caller: Arc<dyn EventCaller> = channel.clone();
    let translator = InteractionTranslator::new(Arc::clone(&store), caller, config.geometry);
    info!(
        "enter clicks as '<pixel_x> <pixel_y>' ({} px squares), or 'quit'",
        config.geometry.cell_size()
    );

    // ── UI loop ───────────────────────────────────────────────────────────────
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(event) = ui_rx.recv() => match present(&mut renderer, event) {
                Ok(Presented::Continue) => {}
                Ok(Presented::SessionEnded) => break,
                Err(e) => {
                    error!("failed to draw: {e}");
                    break;
                }
            },
            line = lines.next_line() => match line {
                Ok(Some(line)) => match parse_command(&line) {
                    Command::Click { x, y } => {
                        translator.on_click(x, y);
                    }
                    Command::Quit => break,
                    Command::Blank => {}
                    Command::Invalid => warn!("expected '<pixel_x> <pixel_y>' or 'quit', got '{line}'"),
                },
                Ok(None) => break,
                Err(e) => {
                    error!("failed to read stdin: {e}");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("received Ctrl+C; shutting down");
                break;
            }
        }
    }

    // ── Shutdown ──────────────────────────────────────────────────────────────
    drop(translator);
    if store.phase().is_connected() {
        for call in [ClientCall::Leave, ClientCall::Close] {
            if let Err(e) = send_call(channel.as_ref(), &call) {
                warn!("could not send {}: {e}", call.event_name());
            }
        }
    }
    match Arc::try_unwrap(channel) {
        Ok(channel) => channel.close().await,
        Err(_) => warn!("channel still shared at shutdown; dropping it"),
    }

    info!("checkers client stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

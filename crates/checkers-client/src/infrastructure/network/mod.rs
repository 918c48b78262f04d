//! Network infrastructure: the named-event connection channel.
//!
//! Architecture:
//! - [`Channel::connect`] opens one TCP stream to the server and splits it.
//! - A **receive task** reads bytes, reassembles length-prefixed frames with
//!   [`FrameDecoder`] and hands every [`Envelope`] to the [`Dispatcher`].
//!   When the stream ends it dispatches the local `disconnect` event once.
//! - A **writer task** drains an unbounded queue of encoded frames into the
//!   write half.  [`Channel::call`] only pushes onto that queue, so it never
//!   blocks and never waits for a reply.
//!
//! # Teardown (for beginners)
//!
//! [`Channel::close`] drops the queue sender.  The writer task sees the queue
//! end, finishes writing what was already queued, shuts down the write half
//! and exits.  The receive task is then aborted.  If `close` is never called
//! (an early `?`, a panic elsewhere) the `Drop` impl aborts both tasks so the
//! socket is still released.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use checkers_core::{encode_frame, events, Envelope, FrameDecoder, ProtocolError};
use serde_json::Value;
use thiserror::Error;
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    net::TcpStream,
    sync::mpsc,
    task::JoinHandle,
    time,
};
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::application::dispatcher::Dispatcher;
use crate::application::interaction::{CallError, EventCaller};

/// Default server host.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default server port.
pub const DEFAULT_PORT: u16 = 5555;

/// Size of one socket read.
const READ_CHUNK: usize = 4096;

/// Errors that can occur in the client network layer.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// TCP connection to the server failed.
    #[error("failed to connect to server at {addr}: {source}")]
    ConnectFailed {
        addr: String,
        #[source]
        source: io::Error,
    },
    /// The server did not accept the connection in time.
    #[error("timed out after {timeout:?} connecting to server at {addr}")]
    ConnectTimeout { addr: String, timeout: Duration },
    /// An I/O error occurred on the established connection.
    #[error("connection I/O error: {0}")]
    Io(#[from] io::Error),
    /// A message could not be encoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    /// The connection is closed; no more calls can be sent.
    #[error("connection closed")]
    Closed,
}

/// Configuration for the client's connection to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Server host name or IP address.
    pub host: String,
    /// Server TCP port.
    pub port: u16,
    /// Upper bound on establishing the TCP connection.
    pub connect_timeout: Duration,
    /// Upper bound on flushing queued calls during [`Channel::close`].
    pub close_timeout: Duration,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            connect_timeout: Duration::from_secs(10),
            close_timeout: Duration::from_secs(2),
        }
    }
}

impl ChannelConfig {
    /// `host:port`, as used in logs and errors.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// A live connection to the server.
pub struct Channel {
    session_id: Uuid,
    outbound: Option<mpsc::UnboundedSender<Vec<u8>>>,
    reader: Option<JoinHandle<()>>,
    writer: Option<JoinHandle<()>>,
    close_timeout: Duration,
}

impl Channel {
    /// Connects to `config.host:config.port` and starts the receive and
    /// writer tasks.
    ///
    /// Failure is final: the caller is expected to report it and exit.  There
    /// is no reconnect.
    ///
    /// # Errors
    ///
    /// - [`ChannelError::ConnectFailed`] if the server is unreachable or
    ///   refuses the connection.
    /// - [`ChannelError::ConnectTimeout`] if `config.connect_timeout` elapses.
    pub async fn connect(
        config: &ChannelConfig,
        dispatcher: Arc<Dispatcher>,
    ) -> Result<Self, ChannelError> {
        let addr = config.addr();
        let connecting = TcpStream::connect((config.host.as_str(), config.port));
        let stream = match time::timeout(config.connect_timeout, connecting).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => return Err(ChannelError::ConnectFailed { addr, source }),
            Err(_) => {
                return Err(ChannelError::ConnectTimeout {
                    addr,
                    timeout: config.connect_timeout,
                })
            }
        };
        if let Err(e) = stream.set_nodelay(true) {
            debug!("could not set TCP_NODELAY: {e}");
        }

        let (read_half, write_half) = stream.into_split();
        let channel = Self::from_split(read_half, write_half, dispatcher, config.close_timeout);
        info!(session = %channel.session_id, %addr, "connected to server");
        Ok(channel)
    }

    /// Starts a channel over an already-open byte stream.
    ///
    /// `connect` uses this with the two halves of a `TcpStream`; tests use
    /// in-memory streams.
    pub fn from_split<R, W>(
        reader: R,
        writer: W,
        dispatcher: Arc<Dispatcher>,
        close_timeout: Duration,
    ) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let session_id = Uuid::new_v4();
        let (outbound, queue) = mpsc::unbounded_channel();

        let reader = tokio::spawn(
            read_loop(reader, dispatcher).instrument(info_span!("recv", session = %session_id)),
        );
        let writer = tokio::spawn(
            write_loop(writer, queue).instrument(info_span!("send", session = %session_id)),
        );

        Self {
            session_id,
            outbound: Some(outbound),
            reader: Some(reader),
            writer: Some(writer),
            close_timeout,
        }
    }

    /// Identifier of this connection, attached to every log line it emits.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Queues `{event, payload}` for sending.  Never waits for a reply.
    ///
    /// # Errors
    ///
    /// - [`ChannelError::Protocol`] if the envelope cannot be encoded.
    /// - [`ChannelError::Closed`] if the writer task has stopped.
    pub fn call(&self, event: &str, payload: Value) -> Result<(), ChannelError> {
        let frame = encode_frame(&Envelope::new(event, payload))?;
        let outbound = self.outbound.as_ref().ok_or(ChannelError::Closed)?;
        outbound.send(frame).map_err(|_| ChannelError::Closed)?;
        debug!(session = %self.session_id, event, "call queued");
        Ok(())
    }

    /// Flushes queued calls, shuts down the socket and stops the receive task.
    ///
    /// Bounded by the configured close timeout; a writer that does not finish
    /// in time is aborted.
    pub async fn close(mut self) {
        drop(self.outbound.take());

        if let Some(writer) = self.writer.take() {
            let abort = writer.abort_handle();
            if time::timeout(self.close_timeout, writer).await.is_err() {
                warn!(session = %self.session_id, "writer did not finish within {:?}; aborting", self.close_timeout);
                abort.abort();
            }
        }
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        info!(session = %self.session_id, "connection closed");
    }
}

impl Drop for Channel {
    fn drop(&mut self) {
        for task in [self.reader.take(), self.writer.take()].into_iter().flatten() {
            task.abort();
        }
    }
}

impl EventCaller for Channel {
    fn call(&self, event: &str, payload: Value) -> Result<(), CallError> {
        Channel::call(self, event, payload).map_err(|e| match e {
            ChannelError::Protocol(e) => CallError::Encode(e.to_string()),
            _ => CallError::Closed,
        })
    }
}

// ── Background tasks ──────────────────────────────────────────────────────────

/// Reads frames from `reader` and dispatches them until the stream ends.
///
/// Malformed frames are logged and skipped.  The loop ends on EOF, on an I/O
/// error, or on a frame whose declared length is over the limit (the stream
/// cannot be resynchronized after that).  In every case the local
/// `disconnect` event is dispatched exactly once before returning.
pub async fn read_loop<R>(mut reader: R, dispatcher: Arc<Dispatcher>)
where
    R: AsyncRead + Unpin,
{
    let mut decoder = FrameDecoder::new();
    let mut chunk = vec![0u8; READ_CHUNK];

    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => {
                info!("server closed the connection");
                break;
            }
            Ok(n) => {
                decoder.extend(&chunk[..n]);
                if !dispatch_buffered(&mut decoder, &dispatcher) {
                    break;
                }
            }
            Err(e) => {
                error!("read error on connection: {e}");
                break;
            }
        }
    }

    if decoder.buffered() > 0 {
        debug!(bytes = decoder.buffered(), "discarding partial frame");
    }
    dispatcher.dispatch(&Envelope::bare(events::DISCONNECT));
}

/// Dispatches every complete frame in `decoder`.
///
/// Returns `false` if the stream is no longer usable.
fn dispatch_buffered(decoder: &mut FrameDecoder, dispatcher: &Dispatcher) -> bool {
    loop {
        match decoder.next_frame() {
            Ok(Some(envelope)) => {
                debug!(event = %envelope.event, "received");
                dispatcher.dispatch(&envelope);
            }
            Ok(None) => return true,
            Err(e) if e.is_recoverable() => warn!("dropping inbound frame: {e}"),
            Err(e) => {
                error!("unrecoverable framing error: {e}");
                return false;
            }
        }
    }
}

/// Writes queued frames to `writer` until the queue closes, then shuts the
/// writer down.
async fn write_loop<W>(mut writer: W, mut queue: mpsc::UnboundedReceiver<Vec<u8>>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(frame) = queue.recv().await {
        if let Err(e) = writer.write_all(&frame).await {
            error!("failed to send frame: {e}");
            return;
        }
    }
    if let Err(e) = writer.shutdown().await {
        debug!("shutdown of write half failed: {e}");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

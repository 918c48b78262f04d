//! Length-prefixed JSON frame codec.
//!
//! Wire format:
//! ```text
//! [payload_len:4][payload:N]
//! ```
//! `payload_len` is a big-endian `u32` and the payload is one UTF-8 JSON
//! [`Envelope`].  Frames larger than [`MAX_FRAME_LEN`] are refused.
//!
//! # Why framing? (for beginners)
//!
//! TCP delivers a byte *stream*, not messages.  One `read()` may return half a
//! message or three messages glued together.  The length prefix tells the
//! receiver exactly where each message ends so it can buffer until a frame is
//! complete.

use thiserror::Error;

use crate::protocol::messages::Envelope;

/// Size of the length prefix in bytes.
pub const HEADER_SIZE: usize = 4;

/// Largest accepted JSON payload, in bytes.
pub const MAX_FRAME_LEN: usize = 1024 * 1024;

/// Errors that can occur while encoding or decoding frames and payloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The buffer does not hold a complete frame yet.
    #[error("insufficient data: need at least {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    /// The length prefix exceeds [`MAX_FRAME_LEN`].
    #[error("frame too large: declared {declared} bytes, maximum is {max}")]
    FrameTooLarge { declared: usize, max: usize },

    /// A complete frame whose payload is not a valid JSON envelope.
    ///
    /// `frame_len` is the total size of the bad frame (header included) so the
    /// reader can skip it and stay in sync.
    #[error("malformed JSON frame ({frame_len} bytes): {reason}")]
    MalformedJson { frame_len: usize, reason: String },

    /// A well-formed envelope whose payload has the wrong shape for its event.
    #[error("invalid payload for '{event}': {reason}")]
    InvalidPayload { event: String, reason: String },

    /// The envelope could not be serialized.
    #[error("failed to encode envelope: {0}")]
    Encode(String),
}

impl ProtocolError {
    /// `true` if the stream is still in sync after this error and reading may
    /// continue with the next frame.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ProtocolError::MalformedJson { .. } | ProtocolError::InvalidPayload { .. }
        )
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes an [`Envelope`] as one length-prefixed frame.
///
/// # Errors
///
/// Returns [`ProtocolError::Encode`] if serialization fails and
/// [`ProtocolError::FrameTooLarge`] if the JSON exceeds [`MAX_FRAME_LEN`].
///
/// # Examples
///
/// ```rust
/// use checkers_core::protocol::{decode_frame, encode_frame, Envelope};
///
/// let env = Envelope::new("leave", serde_json::json!([]));
/// let bytes = encode_frame(&env).unwrap();
/// let (decoded, consumed) = decode_frame(&bytes).unwrap();
/// assert_eq!(decoded, env);
/// assert_eq!(consumed, bytes.len());
/// ```
pub fn encode_frame(envelope: &Envelope) -> Result<Vec<u8>, ProtocolError> {
    let payload = serde_json::to_vec(envelope).map_err(|e| ProtocolError::Encode(e.to_string()))?;
    if payload.len() > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge {
            declared: payload.len(),
            max: MAX_FRAME_LEN,
        });
    }

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    buf.extend_from_slice(&payload);
    Ok(buf)
}

/// Decodes one [`Envelope`] from the beginning of `bytes`.
///
/// Returns the envelope and the total number of bytes consumed (header +
/// payload), so the caller can advance their read cursor.
///
/// # Errors
///
/// - [`ProtocolError::InsufficientData`] when the frame is incomplete.
/// - [`ProtocolError::FrameTooLarge`] when the length prefix is over the limit.
/// - [`ProtocolError::MalformedJson`] when the frame is complete but the
///   payload is not a JSON envelope.
pub fn decode_frame(bytes: &[u8]) -> Result<(Envelope, usize), ProtocolError> {
    let payload_len = peek_frame_len(bytes)?;
    let frame_len = HEADER_SIZE + payload_len;
    if bytes.len() < frame_len {
        return Err(ProtocolError::InsufficientData {
            needed: frame_len,
            available: bytes.len(),
        });
    }

    let envelope = serde_json::from_slice::<Envelope>(&bytes[HEADER_SIZE..frame_len]).map_err(
        |e| ProtocolError::MalformedJson {
            frame_len,
            reason: e.to_string(),
        },
    )?;
    Ok((envelope, frame_len))
}

/// Reads and validates the length prefix.
fn peek_frame_len(bytes: &[u8]) -> Result<usize, ProtocolError> {
    let header: [u8; HEADER_SIZE] = bytes
        .get(..HEADER_SIZE)
        .and_then(|h| h.try_into().ok())
        .ok_or(ProtocolError::InsufficientData {
            needed: HEADER_SIZE,
            available: bytes.len(),
        })?;
    let declared = u32::from_be_bytes(header) as usize;
    if declared > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge {
            declared,
            max: MAX_FRAME_LEN,
        });
    }
    Ok(declared)
}

// ── Streaming decoder ─────────────────────────────────────────────────────────

/// Accumulates stream bytes and yields complete envelopes.
///
/// Malformed frames are removed from the buffer before the error is returned,
/// so the caller can log the error and keep calling [`FrameDecoder::next_frame`].
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(4096),
        }
    }

    /// Appends freshly read bytes.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Number of buffered bytes not yet consumed.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Returns the next complete envelope, or `Ok(None)` if more bytes are
    /// needed.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::MalformedJson`] (recoverable): the bad frame has
    ///   already been dropped from the buffer.
    /// - [`ProtocolError::FrameTooLarge`] (fatal): the stream cannot be
    ///   resynchronized; the caller should close the connection.
    pub fn next_frame(&mut self) -> Result<Option<Envelope>, ProtocolError> {
        match decode_frame(&self.buf) {
            Ok((envelope, consumed)) => {
                self.buf.drain(..consumed);
                Ok(Some(envelope))
            }
            Err(ProtocolError::InsufficientData { .. }) => Ok(None),
            Err(ProtocolError::MalformedJson { frame_len, reason }) => {
                self.buf.drain(..frame_len);
                Err(ProtocolError::MalformedJson { frame_len, reason })
            }
            Err(e) => Err(e),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Protocol module containing the named-event envelope and the frame codec.

pub mod codec;
pub mod messages;

pub use codec::{decode_frame, encode_frame, FrameDecoder, ProtocolError, HEADER_SIZE, MAX_FRAME_LEN};
pub use messages::{events, ClientCall, Envelope};

//! Peer-to-peer frame protocol for hive nodes.
//!
//! Nodes exchange [`Frame`]s. A frame carries either a [`Request`] or a
//! [`ResponseWriter`], plus the addressing needed to route a response back:
//! - `id`: fresh UUIDv4 per frame
//! - `inbox`: where the requester wants its answer (empty: none wanted)
//! - `node`: the sending node
//! - `timestamp`: UTC creation time
//!
//! Frames are protobuf messages. Reliable-send payloads carry the raw
//! encoding ([`encode_frame`]); stream transports add a 4-byte big-endian
//! length prefix ([`FrameReader`], [`FrameWriter`]).
//!
//! # Example
//!
//! ```rust
//! use hive_protocol::{Frame, Request, decode_frame, encode_frame};
//!
//! let frame = Frame::request("node-a", "inbox-1", Request::ping());
//! let bytes = encode_frame(&frame).unwrap();
//! let decoded = decode_frame(&bytes).unwrap();
//! assert_eq!(decoded.inbox, "inbox-1");
//! ```

mod codec;
mod convert;
mod error;
mod framing;
pub mod messages;
mod status;

pub use codec::{PONG, decode_frame, encode_frame, from_timestamp, to_timestamp};
pub use error::{ProtocolError, ProtocolResult};
pub use framing::{FrameReader, FrameWriter, length_prefixed};
pub use messages::{
    Envelope, Frame, Request, ResponseWriter, frame, request, response_writer,
};
pub use status::{Code, Status};

/// Maximum encoded frame size (4 MiB).
pub const MAX_FRAME_SIZE: usize = 4 * 1024 * 1024;

//! Frame construction and the binary codec.

use chrono::{DateTime, Utc};
use prost::Message;
use prost_types::Timestamp;
use uuid::Uuid;

use crate::MAX_FRAME_SIZE;
use crate::error::{ProtocolError, ProtocolResult};
use crate::messages::{
    Envelope, Frame, Request, ResponseWriter, frame, request, response_writer,
};

/// Literal carried by every pong.
pub const PONG: &str = "PONG";

impl Frame {
    fn new(node: impl Into<String>, inbox: impl Into<String>, payload: frame::Payload) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            inbox: inbox.into(),
            node: node.into(),
            timestamp: Some(to_timestamp(Utc::now())),
            payload: Some(payload),
        }
    }

    /// Creates a request frame sent by `node`. An empty `inbox` asks for no
    /// response.
    pub fn request(node: impl Into<String>, inbox: impl Into<String>, request: Request) -> Self {
        Self::new(node, inbox, frame::Payload::Request(request))
    }

    /// Creates a response frame produced by `node` for `inbox`.
    pub fn response(
        node: impl Into<String>,
        inbox: impl Into<String>,
        response: ResponseWriter,
    ) -> Self {
        Self::new(node, inbox, frame::Payload::ResponseWriter(response))
    }

    /// True when the sender wants no response.
    pub fn is_fire_and_forget(&self) -> bool {
        self.inbox.is_empty()
    }

    /// Creation time, if the sender stamped one.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_ref().and_then(from_timestamp)
    }
}

impl Request {
    pub fn new(payload: request::Payload) -> Self {
        Self {
            payload: Some(payload),
        }
    }

    pub fn ping() -> Self {
        Self::new(request::Payload::Ping(String::new()))
    }

    /// Short name of the request kind, for logs.
    pub fn kind(&self) -> &'static str {
        use request::Payload::*;
        match &self.payload {
            Some(Ping(_)) => "ping",
            Some(Out(_)) => "out",
            Some(SingleSocket(_)) => "single_socket",
            Some(Disconnect(_)) => "disconnect",
            Some(PartyJoinRequest(_)) => "party_join_request",
            Some(PartyPromote(_)) => "party_promote",
            Some(PartyAccept(_)) => "party_accept",
            Some(PartyRemove(_)) => "party_remove",
            Some(PartyClose(_)) => "party_close",
            Some(PartyJoinRequestList(_)) => "party_join_request_list",
            Some(PartyMatchmakerAdd(_)) => "party_matchmaker_add",
            Some(PartyMatchmakerRemove(_)) => "party_matchmaker_remove",
            Some(PartyDataSend(_)) => "party_data_send",
            Some(MatchId(_)) => "match_id",
            Some(MatchJoinAttempt(_)) => "match_join_attempt",
            Some(MatchSendData(_)) => "match_send_data",
            Some(MatchSignal(_)) => "match_signal",
            Some(MatchState(_)) => "match_state",
            None => "unknown",
        }
    }
}

impl ResponseWriter {
    pub fn new(payload: response_writer::Payload) -> Self {
        Self {
            payload: Some(payload),
        }
    }

    /// Bare acknowledgement with no payload.
    pub fn ack() -> Self {
        Self { payload: None }
    }

    pub fn pong() -> Self {
        Self::new(response_writer::Payload::Pong(PONG.to_string()))
    }

    /// Renders `err` into an error envelope response.
    pub fn error(err: &(dyn std::error::Error + 'static)) -> Self {
        Self::new(response_writer::Payload::Envelope(Envelope::error(err)))
    }

    /// Returns the error envelope, if this response carries one.
    pub fn as_error(&self) -> Option<&Envelope> {
        match &self.payload {
            Some(response_writer::Payload::Envelope(envelope)) if envelope.as_status().is_some() => {
                Some(envelope)
            }
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.as_error().is_some()
    }
}

/// Encodes a frame into its protobuf bytes.
///
/// Fails with [`ProtocolError::FrameTooLarge`] above [`MAX_FRAME_SIZE`].
pub fn encode_frame(frame: &Frame) -> ProtocolResult<Vec<u8>> {
    let size = frame.encoded_len();
    if size > MAX_FRAME_SIZE {
        return Err(ProtocolError::FrameTooLarge {
            size,
            max: MAX_FRAME_SIZE,
        });
    }
    Ok(frame.encode_to_vec())
}

/// Decodes a frame from its protobuf bytes.
pub fn decode_frame(data: &[u8]) -> ProtocolResult<Frame> {
    if data.len() > MAX_FRAME_SIZE {
        return Err(ProtocolError::FrameTooLarge {
            size: data.len(),
            max: MAX_FRAME_SIZE,
        });
    }
    Ok(Frame::decode(data)?)
}

pub fn to_timestamp(time: DateTime<Utc>) -> Timestamp {
    Timestamp {
        seconds: time.timestamp(),
        nanos: time.timestamp_subsec_nanos() as i32,
    }
}

pub fn from_timestamp(timestamp: &Timestamp) -> Option<DateTime<Utc>> {
    let nanos = u32::try_from(timestamp.nanos).ok()?;
    DateTime::from_timestamp(timestamp.seconds, nanos)
}

//! Peer wire schema.
//!
//! Every message is a field-numbered protobuf message. Tags are stable:
//! a field may be added under a fresh tag but an existing tag is never
//! renumbered or reused. Unknown tags are skipped on decode, so a request
//! kind added by a newer peer decodes here as a `Request` with no payload.

use std::collections::HashMap;

/// The addressed envelope exchanged between nodes.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Frame {
    /// Fresh UUIDv4 per frame, responses included.
    #[prost(string, tag = "1")]
    pub id: String,
    /// Where the requester wants its response delivered. Empty means
    /// fire-and-forget.
    #[prost(string, tag = "2")]
    pub inbox: String,
    /// Sender of a request, or producer of a response.
    #[prost(string, tag = "3")]
    pub node: String,
    #[prost(message, optional, tag = "4")]
    pub timestamp: Option<::prost_types::Timestamp>,
    #[prost(oneof = "frame::Payload", tags = "5, 6")]
    pub payload: Option<frame::Payload>,
}

pub mod frame {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Payload {
        #[prost(message, tag = "5")]
        Request(super::Request),
        #[prost(message, tag = "6")]
        ResponseWriter(super::ResponseWriter),
    }
}

/// An operation addressed to a peer.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Request {
    /// `None` when the sender used a kind this node does not know.
    #[prost(
        oneof = "request::Payload",
        tags = "1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18"
    )]
    pub payload: Option<request::Payload>,
}

pub mod request {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Payload {
        #[prost(string, tag = "1")]
        Ping(String),
        /// A realtime message to hand to the local inbound handler.
        #[prost(message, tag = "2")]
        Out(super::Envelope),
        #[prost(message, tag = "3")]
        SingleSocket(super::SingleSocket),
        #[prost(message, tag = "4")]
        Disconnect(super::Disconnect),
        #[prost(message, tag = "5")]
        PartyJoinRequest(super::PartyJoinRequest),
        #[prost(message, tag = "6")]
        PartyPromote(super::PartyMemberUpdate),
        #[prost(message, tag = "7")]
        PartyAccept(super::PartyMemberUpdate),
        #[prost(message, tag = "8")]
        PartyRemove(super::PartyMemberUpdate),
        #[prost(message, tag = "9")]
        PartyClose(super::PartyLookup),
        #[prost(message, tag = "10")]
        PartyJoinRequestList(super::PartyLookup),
        #[prost(message, tag = "11")]
        PartyMatchmakerAdd(super::PartyMatchmakerAdd),
        #[prost(message, tag = "12")]
        PartyMatchmakerRemove(super::PartyMatchmakerRemove),
        #[prost(message, tag = "13")]
        PartyDataSend(super::PartyDataSend),
        /// Namespaced match identifier, `<uuid>.<node>`.
        #[prost(string, tag = "14")]
        MatchId(String),
        #[prost(message, tag = "15")]
        MatchJoinAttempt(super::MatchJoinAttempt),
        #[prost(message, tag = "16")]
        MatchSendData(super::MatchSendData),
        #[prost(message, tag = "17")]
        MatchSignal(super::MatchSignal),
        #[prost(string, tag = "18")]
        MatchState(String),
    }
}

/// The result of a request. An absent payload is a bare acknowledgement.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ResponseWriter {
    #[prost(oneof = "response_writer::Payload", tags = "1, 2, 3, 4, 5, 6, 7, 8, 9")]
    pub payload: Option<response_writer::Payload>,
}

pub mod response_writer {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Payload {
        #[prost(string, tag = "1")]
        Pong(String),
        #[prost(message, tag = "2")]
        Envelope(super::Envelope),
        /// Whether the join was accepted without owner approval.
        #[prost(bool, tag = "3")]
        PartyJoinRequest(bool),
        #[prost(message, tag = "4")]
        PartyJoinRequestList(super::PartyJoinRequestListReply),
        #[prost(message, tag = "5")]
        PartyMatchmakerAdd(super::PartyMatchmakerAddReply),
        #[prost(message, tag = "6")]
        Match(super::Match),
        #[prost(message, tag = "7")]
        MatchJoinAttempt(super::MatchJoinAttemptReply),
        #[prost(message, tag = "8")]
        MatchState(super::MatchStateReply),
        #[prost(string, tag = "9")]
        MatchSignal(String),
    }
}

/// Generic realtime message. Carries either a rendered error or an opaque
/// application payload.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Envelope {
    #[prost(string, tag = "1")]
    pub cid: String,
    #[prost(oneof = "envelope::Message", tags = "2, 3")]
    pub message: Option<envelope::Message>,
}

pub mod envelope {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Message {
        #[prost(message, tag = "2")]
        Error(super::Error),
        #[prost(bytes = "vec", tag = "3")]
        Payload(Vec<u8>),
    }
}

/// A renderable error. `code` holds a [`crate::Code`] value.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Error {
    #[prost(int32, tag = "1")]
    pub code: i32,
    #[prost(string, tag = "2")]
    pub message: String,
    #[prost(map = "string, string", tag = "3")]
    pub context: HashMap<String, String>,
}

// --- presences -------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PresenceId {
    #[prost(string, tag = "1")]
    pub node: String,
    #[prost(string, tag = "2")]
    pub session_id: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PresenceStream {
    #[prost(uint32, tag = "1")]
    pub mode: u32,
    #[prost(string, tag = "2")]
    pub subject: String,
    #[prost(string, tag = "3")]
    pub subcontext: String,
    #[prost(string, tag = "4")]
    pub label: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PresenceMeta {
    #[prost(uint32, tag = "1")]
    pub format: u32,
    #[prost(bool, tag = "2")]
    pub hidden: bool,
    #[prost(bool, tag = "3")]
    pub persistence: bool,
    #[prost(string, tag = "4")]
    pub username: String,
    #[prost(string, tag = "5")]
    pub status: String,
    #[prost(uint32, tag = "6")]
    pub reason: u32,
}

/// A presence as sent by a peer. `stream` and `meta` are repeated on the
/// wire but only their first entries are meaningful.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Presence {
    #[prost(string, tag = "1")]
    pub node: String,
    #[prost(string, tag = "2")]
    pub user_id: String,
    #[prost(string, tag = "3")]
    pub session_id: String,
    #[prost(message, repeated, tag = "4")]
    pub stream: Vec<PresenceStream>,
    #[prost(message, repeated, tag = "5")]
    pub meta: Vec<PresenceMeta>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UserPresence {
    #[prost(string, tag = "1")]
    pub user_id: String,
    #[prost(string, tag = "2")]
    pub session_id: String,
    #[prost(string, tag = "3")]
    pub username: String,
    #[prost(bool, tag = "4")]
    pub persistence: bool,
    #[prost(string, optional, tag = "5")]
    pub status: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MatchPresence {
    #[prost(string, tag = "1")]
    pub user_id: String,
    #[prost(string, tag = "2")]
    pub session_id: String,
    #[prost(string, tag = "3")]
    pub username: String,
    #[prost(string, tag = "4")]
    pub node: String,
    #[prost(uint32, tag = "5")]
    pub reason: u32,
}

// --- session control -------------------------------------------------------

/// Close every session of `user_id` other than `session_id`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SingleSocket {
    #[prost(string, tag = "1")]
    pub user_id: String,
    #[prost(string, tag = "2")]
    pub session_id: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Disconnect {
    #[prost(string, tag = "1")]
    pub session_id: String,
    #[prost(uint32, tag = "2")]
    pub reason: u32,
    #[prost(string, tag = "3")]
    pub message: String,
}

// --- parties ---------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PartyJoinRequest {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(message, optional, tag = "2")]
    pub presence: Option<Presence>,
}

/// Shared shape of promote, accept and remove.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PartyMemberUpdate {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub session_id: String,
    #[prost(string, tag = "3")]
    pub from_node: String,
    #[prost(message, optional, tag = "4")]
    pub user_presence: Option<UserPresence>,
}

/// Shared shape of close and join-request-list.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PartyLookup {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub session_id: String,
    #[prost(string, tag = "3")]
    pub from_node: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PartyJoinRequestListReply {
    #[prost(message, repeated, tag = "1")]
    pub user_presence: Vec<UserPresence>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PartyMatchmakerAdd {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub session_id: String,
    #[prost(string, tag = "3")]
    pub from_node: String,
    #[prost(string, tag = "4")]
    pub query: String,
    #[prost(int32, tag = "5")]
    pub min_count: i32,
    #[prost(int32, tag = "6")]
    pub max_count: i32,
    #[prost(int32, tag = "7")]
    pub count_multiple: i32,
    #[prost(map = "string, string", tag = "8")]
    pub string_properties: HashMap<String, String>,
    #[prost(map = "string, double", tag = "9")]
    pub numeric_properties: HashMap<String, f64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PartyMatchmakerAddReply {
    #[prost(string, tag = "1")]
    pub ticket: String,
    #[prost(message, repeated, tag = "2")]
    pub presence_id: Vec<PresenceId>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PartyMatchmakerRemove {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub session_id: String,
    #[prost(string, tag = "3")]
    pub from_node: String,
    #[prost(string, tag = "4")]
    pub ticket: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PartyDataSend {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub session_id: String,
    #[prost(string, tag = "3")]
    pub from_node: String,
    #[prost(int64, tag = "4")]
    pub op_code: i64,
    #[prost(bytes = "vec", tag = "5")]
    pub data: Vec<u8>,
}

// --- matches ---------------------------------------------------------------

/// Match descriptor returned by a lookup.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Match {
    #[prost(string, tag = "1")]
    pub match_id: String,
    #[prost(bool, tag = "2")]
    pub authoritative: bool,
    #[prost(string, optional, tag = "3")]
    pub label: Option<String>,
    #[prost(int32, tag = "4")]
    pub size: i32,
    #[prost(int32, tag = "5")]
    pub tick_rate: i32,
    #[prost(string, tag = "6")]
    pub handler_name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MatchJoinAttempt {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub user_id: String,
    #[prost(string, tag = "3")]
    pub session_id: String,
    #[prost(string, tag = "4")]
    pub username: String,
    #[prost(int64, tag = "5")]
    pub session_expiry: i64,
    #[prost(map = "string, string", tag = "6")]
    pub vars: HashMap<String, String>,
    #[prost(string, tag = "7")]
    pub client_ip: String,
    #[prost(string, tag = "8")]
    pub client_port: String,
    #[prost(map = "string, string", tag = "9")]
    pub metadata: HashMap<String, String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MatchJoinAttemptReply {
    #[prost(bool, tag = "1")]
    pub found: bool,
    #[prost(bool, tag = "2")]
    pub allow: bool,
    #[prost(bool, tag = "3")]
    pub is_new: bool,
    #[prost(string, tag = "4")]
    pub reason: String,
    #[prost(string, tag = "5")]
    pub label: String,
    #[prost(message, repeated, tag = "6")]
    pub presences: Vec<MatchPresence>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MatchSendData {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub user_id: String,
    #[prost(string, tag = "3")]
    pub session_id: String,
    #[prost(string, tag = "4")]
    pub username: String,
    #[prost(string, tag = "5")]
    pub from_node: String,
    #[prost(int64, tag = "6")]
    pub op_code: i64,
    #[prost(bytes = "vec", tag = "7")]
    pub data: Vec<u8>,
    #[prost(bool, tag = "8")]
    pub reliable: bool,
    #[prost(int64, tag = "9")]
    pub receive_time: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MatchSignal {
    /// Namespaced match identifier, `<uuid>.<node>`.
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub data: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MatchStateReply {
    #[prost(message, repeated, tag = "1")]
    pub user_presence: Vec<UserPresence>,
    #[prost(int64, tag = "2")]
    pub tick: i64,
    #[prost(bytes = "vec", tag = "3")]
    pub state: Vec<u8>,
}

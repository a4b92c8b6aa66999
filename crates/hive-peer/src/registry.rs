//! Interfaces of the registries that own party and match state.
//!
//! The peer never mutates session state itself. It translates wire requests
//! into these calls and the results back into responses. Implementations
//! serialize their own mutations; calls arrive concurrently.

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use hive_core::{MatchPresence, Presence, PresenceId, UserPresence};
use hive_protocol::messages;

use crate::error::BoxError;

/// Matchmaking criteria submitted on behalf of a whole party.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchmakerParams {
    pub query: String,
    pub min_count: i32,
    pub max_count: i32,
    pub count_multiple: i32,
    pub string_properties: HashMap<String, String>,
    pub numeric_properties: HashMap<String, f64>,
}

impl From<&messages::PartyMatchmakerAdd> for MatchmakerParams {
    fn from(add: &messages::PartyMatchmakerAdd) -> Self {
        Self {
            query: add.query.clone(),
            min_count: add.min_count,
            max_count: add.max_count,
            count_multiple: add.count_multiple,
            string_properties: add.string_properties.clone(),
            numeric_properties: add.numeric_properties.clone(),
        }
    }
}

/// A matchmaker ticket and the party members it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchmakerTicket {
    pub ticket: String,
    pub presence_ids: Vec<PresenceId>,
}

/// Owner of party membership, join flows and party matchmaking.
///
/// Every call names the party, the local node, the acting session and the
/// node that session is connected to.
#[async_trait]
pub trait PartyRegistry: Send + Sync {
    /// Asks to join a party. Returns true when the join completed without
    /// needing the leader's approval.
    async fn join_request(
        &self,
        party_id: Uuid,
        node: &str,
        presence: Presence,
    ) -> Result<bool, BoxError>;

    async fn promote(
        &self,
        party_id: Uuid,
        node: &str,
        session_id: &str,
        from_node: &str,
        presence: Option<UserPresence>,
    ) -> Result<(), BoxError>;

    async fn accept(
        &self,
        party_id: Uuid,
        node: &str,
        session_id: &str,
        from_node: &str,
        presence: Option<UserPresence>,
    ) -> Result<(), BoxError>;

    async fn remove(
        &self,
        party_id: Uuid,
        node: &str,
        session_id: &str,
        from_node: &str,
        presence: Option<UserPresence>,
    ) -> Result<(), BoxError>;

    async fn close(
        &self,
        party_id: Uuid,
        node: &str,
        session_id: &str,
        from_node: &str,
    ) -> Result<(), BoxError>;

    /// Pending join requests awaiting the leader's decision.
    async fn join_request_list(
        &self,
        party_id: Uuid,
        node: &str,
        session_id: &str,
        from_node: &str,
    ) -> Result<Vec<UserPresence>, BoxError>;

    async fn matchmaker_add(
        &self,
        party_id: Uuid,
        node: &str,
        session_id: &str,
        from_node: &str,
        params: MatchmakerParams,
    ) -> Result<MatchmakerTicket, BoxError>;

    async fn matchmaker_remove(
        &self,
        party_id: Uuid,
        node: &str,
        session_id: &str,
        from_node: &str,
        ticket: &str,
    ) -> Result<(), BoxError>;

    async fn data_send(
        &self,
        party_id: Uuid,
        node: &str,
        session_id: &str,
        from_node: &str,
        op_code: i64,
        data: &[u8],
    ) -> Result<(), BoxError>;
}

/// Match descriptor returned by a lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchDescriptor {
    pub match_id: String,
    pub authoritative: bool,
    pub label: Option<String>,
    pub size: i32,
    pub tick_rate: i32,
    pub handler_name: String,
}

impl From<MatchDescriptor> for messages::Match {
    fn from(descriptor: MatchDescriptor) -> Self {
        Self {
            match_id: descriptor.match_id,
            authoritative: descriptor.authoritative,
            label: descriptor.label,
            size: descriptor.size,
            tick_rate: descriptor.tick_rate,
            handler_name: descriptor.handler_name,
        }
    }
}

/// A user asking to join an authoritative match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinAttempt {
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub username: String,
    pub session_expiry: i64,
    pub vars: HashMap<String, String>,
    pub client_ip: String,
    pub client_port: String,
    /// Node the joining session is connected to.
    pub from_node: String,
    pub metadata: HashMap<String, String>,
}

/// The match handler's verdict on a join attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinAttemptResult {
    pub found: bool,
    pub allow: bool,
    pub is_new: bool,
    pub reason: String,
    pub label: String,
    pub presences: Vec<MatchPresence>,
}

/// Realtime data from a participant to a match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchData {
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub username: String,
    pub from_node: String,
    pub op_code: i64,
    pub data: Vec<u8>,
    pub reliable: bool,
    pub receive_time: i64,
}

/// Snapshot of a running match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchState {
    pub presences: Vec<UserPresence>,
    pub tick: i64,
    /// Opaque handler state, passed through unchanged.
    pub state: Vec<u8>,
}

/// Owner of match lifecycle, joins, signals and tick state.
///
/// `get_match` and `signal` take the full `<uuid>.<node>` identifier; the
/// remaining calls take the bare match UUID and the local node name.
#[async_trait]
pub trait MatchRegistry: Send + Sync {
    /// Looks up a match. `None` when this node does not run it.
    async fn get_match(&self, match_id: &str) -> Result<Option<MatchDescriptor>, BoxError>;

    /// Asks the match handler to admit a user. Never fails: a missing match
    /// is reported as `found == false`.
    async fn join_attempt(&self, match_id: Uuid, node: &str, attempt: JoinAttempt)
    -> JoinAttemptResult;

    /// Queues data for the match loop. Undeliverable data is dropped.
    async fn send_data(&self, match_id: Uuid, node: &str, data: MatchData);

    async fn signal(&self, match_id: &str, data: &str) -> Result<String, BoxError>;

    async fn get_state(&self, match_id: Uuid, node: &str) -> Result<MatchState, BoxError>;
}

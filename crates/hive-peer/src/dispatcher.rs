//! Routes decoded peer requests to the local owner of the target state.
//!
//! One case per request kind. Each case makes at most one collaborator call
//! and yields at most one response. The dispatcher itself holds no mutable
//! state, so any number of frames can be dispatched concurrently.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use hive_core::{MatchId, Presence, UserPresence, namespace_of, uuid_or_nil};
use hive_protocol::{
    Request, ResponseWriter, Status,
    messages::{self, request, response_writer},
};

use crate::error::BoxError;
use crate::local::{InboundHandler, SessionControl};
use crate::registry::{JoinAttempt, MatchData, MatchRegistry, MatchmakerParams, PartyRegistry};

/// Message of the error returned for matches owned by another node.
pub const NOT_FOUND_MESSAGE: &str = "Not Found";

/// The local subsystems a dispatcher calls into.
#[derive(Clone)]
pub struct Collaborators {
    pub parties: Arc<dyn PartyRegistry>,
    pub matches: Arc<dyn MatchRegistry>,
    pub inbound: Arc<dyn InboundHandler>,
    pub sessions: Arc<dyn SessionControl>,
}

/// Translates requests into registry calls and results into responses.
pub struct Dispatcher {
    node: String,
    collaborators: Collaborators,
}

impl Dispatcher {
    /// Creates a dispatcher for the node named `node`.
    pub fn new(node: impl Into<String>, collaborators: Collaborators) -> Self {
        Self {
            node: node.into(),
            collaborators,
        }
    }

    pub fn node(&self) -> &str {
        &self.node
    }

    /// Handles one request from `from_node`.
    ///
    /// Returns the response to send back, or `None` for kinds that never
    /// answer (forwarded messages, session control, match data, unknown
    /// kinds). Whether a returned response is actually sent depends on the
    /// originating frame's inbox.
    #[tracing::instrument(skip(self, request), fields(kind = request.kind(), from = %from_node))]
    pub async fn dispatch(&self, from_node: &str, request: Request) -> Option<ResponseWriter> {
        let Collaborators {
            parties,
            matches,
            inbound,
            sessions,
        } = &self.collaborators;
        let node = self.node.as_str();

        let Some(payload) = request.payload else {
            debug!("Ignoring request of unknown kind");
            return None;
        };
        debug!("Dispatching request");

        match payload {
            request::Payload::Ping(_) => Some(ResponseWriter::pong()),

            request::Payload::Out(envelope) => {
                inbound.handle(envelope).await;
                None
            }

            request::Payload::SingleSocket(single) => {
                sessions
                    .single_socket(uuid_or_nil(&single.user_id), uuid_or_nil(&single.session_id))
                    .await;
                None
            }

            request::Payload::Disconnect(disconnect) => {
                sessions
                    .disconnect(
                        uuid_or_nil(&disconnect.session_id),
                        disconnect.reason,
                        &disconnect.message,
                    )
                    .await;
                None
            }

            request::Payload::PartyJoinRequest(join) => {
                let presence = join
                    .presence
                    .as_ref()
                    .map(Presence::from)
                    .unwrap_or_else(|| Presence::from(&messages::Presence::default()));
                let result = parties
                    .join_request(uuid_or_nil(&join.id), node, presence)
                    .await;
                Some(respond(result, |joined| {
                    ResponseWriter::new(response_writer::Payload::PartyJoinRequest(joined))
                }))
            }

            request::Payload::PartyPromote(update) => {
                let result = parties
                    .promote(
                        uuid_or_nil(&update.id),
                        node,
                        &update.session_id,
                        &update.from_node,
                        user_presence(&update),
                    )
                    .await;
                Some(respond(result, |()| ResponseWriter::ack()))
            }

            request::Payload::PartyAccept(update) => {
                let result = parties
                    .accept(
                        uuid_or_nil(&update.id),
                        node,
                        &update.session_id,
                        &update.from_node,
                        user_presence(&update),
                    )
                    .await;
                Some(respond(result, |()| ResponseWriter::ack()))
            }

            request::Payload::PartyRemove(update) => {
                let result = parties
                    .remove(
                        uuid_or_nil(&update.id),
                        node,
                        &update.session_id,
                        &update.from_node,
                        user_presence(&update),
                    )
                    .await;
                Some(respond(result, |()| ResponseWriter::ack()))
            }

            request::Payload::PartyClose(lookup) => {
                let result = parties
                    .close(
                        uuid_or_nil(&lookup.id),
                        node,
                        &lookup.session_id,
                        &lookup.from_node,
                    )
                    .await;
                Some(respond(result, |()| ResponseWriter::ack()))
            }

            request::Payload::PartyJoinRequestList(lookup) => {
                let result = parties
                    .join_request_list(
                        uuid_or_nil(&lookup.id),
                        node,
                        &lookup.session_id,
                        &lookup.from_node,
                    )
                    .await;
                Some(respond(result, |presences| {
                    let reply = messages::PartyJoinRequestListReply {
                        user_presence: presences.iter().map(messages::UserPresence::from).collect(),
                    };
                    ResponseWriter::new(response_writer::Payload::PartyJoinRequestList(reply))
                }))
            }

            request::Payload::PartyMatchmakerAdd(add) => {
                let result = parties
                    .matchmaker_add(
                        uuid_or_nil(&add.id),
                        node,
                        &add.session_id,
                        &add.from_node,
                        MatchmakerParams::from(&add),
                    )
                    .await;
                Some(respond(result, |ticket| {
                    let reply = messages::PartyMatchmakerAddReply {
                        ticket: ticket.ticket,
                        presence_id: ticket
                            .presence_ids
                            .iter()
                            .map(messages::PresenceId::from)
                            .collect(),
                    };
                    ResponseWriter::new(response_writer::Payload::PartyMatchmakerAdd(reply))
                }))
            }

            request::Payload::PartyMatchmakerRemove(remove) => {
                let result = parties
                    .matchmaker_remove(
                        uuid_or_nil(&remove.id),
                        node,
                        &remove.session_id,
                        &remove.from_node,
                        &remove.ticket,
                    )
                    .await;
                Some(respond(result, |()| ResponseWriter::ack()))
            }

            request::Payload::PartyDataSend(send) => {
                let result = parties
                    .data_send(
                        uuid_or_nil(&send.id),
                        node,
                        &send.session_id,
                        &send.from_node,
                        send.op_code,
                        &send.data,
                    )
                    .await;
                Some(respond(result, |()| ResponseWriter::ack()))
            }

            request::Payload::MatchId(match_id) => {
                if let Err(status) = self.check_namespace(&match_id) {
                    return Some(ResponseWriter::error(&status));
                }
                let result = matches.get_match(&match_id).await;
                Some(respond(result, |descriptor| {
                    let wire = descriptor.map(messages::Match::from).unwrap_or_default();
                    ResponseWriter::new(response_writer::Payload::Match(wire))
                }))
            }

            request::Payload::MatchJoinAttempt(attempt) => {
                let match_id = match_uuid(&attempt.id);
                let attempt = JoinAttempt {
                    user_id: uuid_or_nil(&attempt.user_id),
                    session_id: uuid_or_nil(&attempt.session_id),
                    username: attempt.username,
                    session_expiry: attempt.session_expiry,
                    vars: attempt.vars,
                    client_ip: attempt.client_ip,
                    client_port: attempt.client_port,
                    from_node: from_node.to_string(),
                    metadata: attempt.metadata,
                };
                let verdict = matches.join_attempt(match_id, node, attempt).await;
                let reply = messages::MatchJoinAttemptReply {
                    found: verdict.found,
                    allow: verdict.allow,
                    is_new: verdict.is_new,
                    reason: verdict.reason,
                    label: verdict.label,
                    presences: verdict
                        .presences
                        .iter()
                        .map(messages::MatchPresence::from)
                        .collect(),
                };
                Some(ResponseWriter::new(
                    response_writer::Payload::MatchJoinAttempt(reply),
                ))
            }

            request::Payload::MatchSendData(send) => {
                let match_id = match_uuid(&send.id);
                let data = MatchData {
                    user_id: uuid_or_nil(&send.user_id),
                    session_id: uuid_or_nil(&send.session_id),
                    username: send.username,
                    from_node: send.from_node,
                    op_code: send.op_code,
                    data: send.data,
                    reliable: send.reliable,
                    receive_time: send.receive_time,
                };
                matches.send_data(match_id, node, data).await;
                None
            }

            request::Payload::MatchSignal(signal) => {
                if let Err(status) = self.check_namespace(&signal.id) {
                    return Some(ResponseWriter::error(&status));
                }
                let result = matches.signal(&signal.id, &signal.data).await;
                Some(respond(result, |answer| {
                    ResponseWriter::new(response_writer::Payload::MatchSignal(answer))
                }))
            }

            request::Payload::MatchState(match_id) => {
                let result = matches.get_state(match_uuid(&match_id), node).await;
                Some(respond(result, |state| {
                    let reply = messages::MatchStateReply {
                        user_presence: state
                            .presences
                            .iter()
                            .map(messages::UserPresence::from)
                            .collect(),
                        tick: state.tick,
                        state: state.state,
                    };
                    ResponseWriter::new(response_writer::Payload::MatchState(reply))
                }))
            }
        }
    }

    /// Rejects match identifiers this node does not own.
    fn check_namespace(&self, match_id: &str) -> Result<(), Status> {
        match namespace_of(match_id) {
            Some(owner) if owner == self.node => Ok(()),
            owner => {
                debug!(match_id, owner, "Match is not owned by this node");
                Err(Status::not_found(NOT_FOUND_MESSAGE))
            }
        }
    }
}

/// Maps a registry result to a response; errors become error envelopes.
fn respond<T>(
    result: Result<T, BoxError>,
    on_success: impl FnOnce(T) -> ResponseWriter,
) -> ResponseWriter {
    match result {
        Ok(value) => on_success(value),
        Err(err) => {
            warn!(error = %err, "Registry call failed");
            ResponseWriter::error(err.as_ref())
        }
    }
}

fn user_presence(update: &messages::PartyMemberUpdate) -> Option<UserPresence> {
    update.user_presence.as_ref().map(UserPresence::from)
}

/// Match UUID from either a namespaced `<uuid>.<node>` or a bare `<uuid>`.
fn match_uuid(raw: &str) -> Uuid {
    raw.parse::<MatchId>()
        .map_or_else(|_| uuid_or_nil(raw), |match_id| match_id.id)
}

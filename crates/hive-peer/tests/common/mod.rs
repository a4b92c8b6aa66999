//! In-memory collaborators and network shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use hive_core::{Presence, UserPresence};
use hive_peer::{
    BoxError, Collaborators, Endpoint, InboundHandler, JoinAttempt, JoinAttemptResult,
    LocalPeer, MatchData, MatchDescriptor, MatchRegistry, MatchState, MatchmakerParams,
    MatchmakerTicket, MembershipDirectory, PartyRegistry, PeerConfig, ReliableTransport,
    SessionControl, TransportError,
};
use hive_protocol::{Envelope, Frame, Status, decode_frame};

/// One collaborator call, as observed by the fakes.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    JoinRequest {
        party_id: Uuid,
        node: String,
        presence: Presence,
    },
    Promote {
        party_id: Uuid,
        session_id: String,
        from_node: String,
        presence: Option<UserPresence>,
    },
    Accept {
        party_id: Uuid,
        session_id: String,
    },
    Remove {
        party_id: Uuid,
        session_id: String,
    },
    Close {
        party_id: Uuid,
        session_id: String,
        from_node: String,
    },
    JoinRequestList {
        party_id: Uuid,
    },
    MatchmakerAdd {
        party_id: Uuid,
        params: MatchmakerParams,
    },
    MatchmakerRemove {
        party_id: Uuid,
        ticket: String,
    },
    DataSend {
        party_id: Uuid,
        op_code: i64,
        data: Vec<u8>,
    },
    GetMatch {
        match_id: String,
    },
    JoinAttempt {
        match_id: Uuid,
        node: String,
        attempt: JoinAttempt,
    },
    SendData {
        match_id: Uuid,
        node: String,
        data: MatchData,
    },
    Signal {
        match_id: String,
        data: String,
    },
    GetState {
        match_id: Uuid,
        node: String,
    },
    Inbound {
        envelope: Envelope,
    },
    SingleSocket {
        user_id: Uuid,
        keep_session_id: Uuid,
    },
    Disconnect {
        session_id: Uuid,
        reason: u32,
        message: String,
    },
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

/// Canned registry answers. `failure` makes every fallible call fail.
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub joined: bool,
    pub join_requests: Vec<UserPresence>,
    pub ticket: Option<MatchmakerTicket>,
    pub descriptor: Option<MatchDescriptor>,
    pub verdict: JoinAttemptResult,
    pub signal_answer: String,
    pub state: MatchState,
    pub failure: Option<Status>,
}

impl Script {
    fn check(&self) -> Result<(), BoxError> {
        match &self.failure {
            Some(status) => Err(Box::new(status.clone())),
            None => Ok(()),
        }
    }
}

pub struct FakeParties {
    calls: CallLog,
    script: Script,
}

#[async_trait]
impl PartyRegistry for FakeParties {
    async fn join_request(
        &self,
        party_id: Uuid,
        node: &str,
        presence: Presence,
    ) -> Result<bool, BoxError> {
        self.calls.lock().await.push(Call::JoinRequest {
            party_id,
            node: node.to_string(),
            presence,
        });
        self.script.check()?;
        Ok(self.script.joined)
    }

    async fn promote(
        &self,
        party_id: Uuid,
        _node: &str,
        session_id: &str,
        from_node: &str,
        presence: Option<UserPresence>,
    ) -> Result<(), BoxError> {
        self.calls.lock().await.push(Call::Promote {
            party_id,
            session_id: session_id.to_string(),
            from_node: from_node.to_string(),
            presence,
        });
        self.script.check()
    }

    async fn accept(
        &self,
        party_id: Uuid,
        _node: &str,
        session_id: &str,
        _from_node: &str,
        _presence: Option<UserPresence>,
    ) -> Result<(), BoxError> {
        self.calls.lock().await.push(Call::Accept {
            party_id,
            session_id: session_id.to_string(),
        });
        self.script.check()
    }

    async fn remove(
        &self,
        party_id: Uuid,
        _node: &str,
        session_id: &str,
        _from_node: &str,
        _presence: Option<UserPresence>,
    ) -> Result<(), BoxError> {
        self.calls.lock().await.push(Call::Remove {
            party_id,
            session_id: session_id.to_string(),
        });
        self.script.check()
    }

    async fn close(
        &self,
        party_id: Uuid,
        _node: &str,
        session_id: &str,
        from_node: &str,
    ) -> Result<(), BoxError> {
        self.calls.lock().await.push(Call::Close {
            party_id,
            session_id: session_id.to_string(),
            from_node: from_node.to_string(),
        });
        self.script.check()
    }

    async fn join_request_list(
        &self,
        party_id: Uuid,
        _node: &str,
        _session_id: &str,
        _from_node: &str,
    ) -> Result<Vec<UserPresence>, BoxError> {
        self.calls
            .lock()
            .await
            .push(Call::JoinRequestList { party_id });
        self.script.check()?;
        Ok(self.script.join_requests.clone())
    }

    async fn matchmaker_add(
        &self,
        party_id: Uuid,
        _node: &str,
        _session_id: &str,
        _from_node: &str,
        params: MatchmakerParams,
    ) -> Result<MatchmakerTicket, BoxError> {
        self.calls
            .lock()
            .await
            .push(Call::MatchmakerAdd { party_id, params });
        self.script.check()?;
        self.script
            .ticket
            .clone()
            .ok_or_else(|| Box::new(Status::internal("no ticket scripted")) as BoxError)
    }

    async fn matchmaker_remove(
        &self,
        party_id: Uuid,
        _node: &str,
        _session_id: &str,
        _from_node: &str,
        ticket: &str,
    ) -> Result<(), BoxError> {
        self.calls.lock().await.push(Call::MatchmakerRemove {
            party_id,
            ticket: ticket.to_string(),
        });
        self.script.check()
    }

    async fn data_send(
        &self,
        party_id: Uuid,
        _node: &str,
        _session_id: &str,
        _from_node: &str,
        op_code: i64,
        data: &[u8],
    ) -> Result<(), BoxError> {
        self.calls.lock().await.push(Call::DataSend {
            party_id,
            op_code,
            data: data.to_vec(),
        });
        self.script.check()
    }
}

pub struct FakeMatches {
    calls: CallLog,
    script: Script,
}

#[async_trait]
impl MatchRegistry for FakeMatches {
    async fn get_match(&self, match_id: &str) -> Result<Option<MatchDescriptor>, BoxError> {
        self.calls.lock().await.push(Call::GetMatch {
            match_id: match_id.to_string(),
        });
        self.script.check()?;
        Ok(self.script.descriptor.clone())
    }

    async fn join_attempt(
        &self,
        match_id: Uuid,
        node: &str,
        attempt: JoinAttempt,
    ) -> JoinAttemptResult {
        self.calls.lock().await.push(Call::JoinAttempt {
            match_id,
            node: node.to_string(),
            attempt,
        });
        self.script.verdict.clone()
    }

    async fn send_data(&self, match_id: Uuid, node: &str, data: MatchData) {
        self.calls.lock().await.push(Call::SendData {
            match_id,
            node: node.to_string(),
            data,
        });
    }

    async fn signal(&self, match_id: &str, data: &str) -> Result<String, BoxError> {
        self.calls.lock().await.push(Call::Signal {
            match_id: match_id.to_string(),
            data: data.to_string(),
        });
        self.script.check()?;
        Ok(self.script.signal_answer.clone())
    }

    async fn get_state(&self, match_id: Uuid, node: &str) -> Result<MatchState, BoxError> {
        self.calls.lock().await.push(Call::GetState {
            match_id,
            node: node.to_string(),
        });
        self.script.check()?;
        Ok(self.script.state.clone())
    }
}

pub struct FakeLocal {
    calls: CallLog,
}

#[async_trait]
impl InboundHandler for FakeLocal {
    async fn handle(&self, envelope: Envelope) {
        self.calls.lock().await.push(Call::Inbound { envelope });
    }
}

#[async_trait]
impl SessionControl for FakeLocal {
    async fn single_socket(&self, user_id: Uuid, keep_session_id: Uuid) {
        self.calls.lock().await.push(Call::SingleSocket {
            user_id,
            keep_session_id,
        });
    }

    async fn disconnect(&self, session_id: Uuid, reason: u32, message: &str) {
        self.calls.lock().await.push(Call::Disconnect {
            session_id,
            reason,
            message: message.to_string(),
        });
    }
}

/// Collaborators backed by `script`, all recording into one log.
pub fn fakes(script: Script) -> (Collaborators, CallLog) {
    let calls = CallLog::default();
    let local = Arc::new(FakeLocal {
        calls: calls.clone(),
    });
    let collaborators = Collaborators {
        parties: Arc::new(FakeParties {
            calls: calls.clone(),
            script: script.clone(),
        }),
        matches: Arc::new(FakeMatches {
            calls: calls.clone(),
            script,
        }),
        inbound: local.clone(),
        sessions: local,
    };
    (collaborators, calls)
}

/// A cluster whose nodes talk through memory.
///
/// Sends are acknowledged as soon as the target is found; the target
/// handles the frame on its own task, as the TCP listener does.
#[derive(Clone, Default)]
pub struct MemoryNetwork {
    members: MembershipDirectory,
    peers: Arc<RwLock<HashMap<String, Arc<LocalPeer>>>>,
    sent: Arc<Mutex<Vec<(String, Frame)>>>,
}

impl MemoryNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn members(&self) -> &MembershipDirectory {
        &self.members
    }

    /// Starts a node and makes it reachable.
    pub async fn join(&self, config: PeerConfig, collaborators: Collaborators) -> Arc<LocalPeer> {
        let name = config.node_name.clone();
        let port = 7000 + self.members.len().await as u16;
        let peer = Arc::new(LocalPeer::new(
            config,
            self.members.clone(),
            Arc::new(self.clone()),
            collaborators,
        ));
        self.members
            .upsert(Endpoint::new(
                name.clone(),
                SocketAddr::from(([127, 0, 0, 1], port)),
            ))
            .await;
        self.peers.write().await.insert(name, peer.clone());
        peer
    }

    /// Every frame sent so far, with the node it was sent to.
    pub async fn sent(&self) -> Vec<(String, Frame)> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl ReliableTransport for MemoryNetwork {
    async fn send_reliable(
        &self,
        endpoint: &Endpoint,
        payload: Vec<u8>,
    ) -> Result<(), TransportError> {
        let frame = decode_frame(&payload)?;
        let Some(peer) = self.peers.read().await.get(&endpoint.name).cloned() else {
            return Err(TransportError::MissingAck {
                address: endpoint.address.to_string(),
            });
        };
        self.sent.lock().await.push((endpoint.name.clone(), frame));
        tokio::spawn(async move {
            let _ = peer.on_bytes(&payload).await;
        });
        Ok(())
    }
}

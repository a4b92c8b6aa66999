//! Request/response correlation between nodes over an in-memory network.

mod common;

use std::time::Duration;

use uuid::Uuid;

use common::{Call, MemoryNetwork, Script, fakes};
use hive_peer::{PeerConfig, PeerError, UNKNOWN_NODE_MESSAGE};
use hive_protocol::{
    Code, Frame, PONG, Request, ResponseWriter, Status, frame,
    messages::{self, request, response_writer},
};

fn config(name: &str) -> PeerConfig {
    PeerConfig::new(name).with_request_timeout(Duration::from_millis(200))
}

/// Waits for fire-and-forget processing on spawned tasks.
async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
    tokio::time::sleep(Duration::from_millis(20)).await;
}

#[tokio::test]
async fn request_round_trip() {
    let network = MemoryNetwork::new();
    let (a_collaborators, _) = fakes(Script::default());
    let (b_collaborators, _) = fakes(Script::default());
    let _a = network.join(config("node-a"), a_collaborators).await;
    let b = network.join(config("node-b"), b_collaborators).await;

    let response = b.request("node-a", Request::ping()).await.unwrap();

    assert_eq!(
        response.payload,
        Some(response_writer::Payload::Pong(PONG.to_string()))
    );
    assert_eq!(b.inboxes().pending(), 0);

    let sent = network.sent().await;
    assert_eq!(sent.len(), 2);
    let (to, request_frame) = &sent[0];
    let (back, response_frame) = &sent[1];
    assert_eq!(to, "node-a");
    assert_eq!(back, "node-b");
    assert_eq!(request_frame.node, "node-b");
    assert_eq!(response_frame.node, "node-a");
    assert_eq!(response_frame.inbox, request_frame.inbox);
    assert_ne!(response_frame.id, request_frame.id);
}

#[tokio::test]
async fn empty_inbox_gets_no_response() {
    let network = MemoryNetwork::new();
    let (a_collaborators, _) = fakes(Script::default());
    let (b_collaborators, _) = fakes(Script::default());
    let a = network.join(config("node-a"), a_collaborators).await;
    let _b = network.join(config("node-b"), b_collaborators).await;

    a.on_frame(Frame::request("node-b", "", Request::ping()))
        .await
        .unwrap();

    assert!(network.sent().await.is_empty());
}

#[tokio::test]
async fn side_effect_survives_unknown_origin() {
    let network = MemoryNetwork::new();
    let (collaborators, calls) = fakes(Script::default());
    let a = network.join(config("node-a"), collaborators).await;
    let party_id = Uuid::new_v4();

    let err = a
        .on_frame(Frame::request(
            "node-z",
            "inbox-1",
            Request::new(request::Payload::PartyClose(messages::PartyLookup {
                id: party_id.to_string(),
                session_id: "s-1".to_string(),
                from_node: "node-z".to_string(),
            })),
        ))
        .await
        .unwrap_err();

    let status = err.as_status().unwrap();
    assert_eq!(status.code, Code::Aborted);
    assert_eq!(status.message, UNKNOWN_NODE_MESSAGE);
    assert!(network.sent().await.is_empty());
    assert_eq!(
        *calls.lock().await,
        vec![Call::Close {
            party_id,
            session_id: "s-1".to_string(),
            from_node: "node-z".to_string(),
        }]
    );
}

#[tokio::test]
async fn request_to_unknown_node_aborts() {
    let network = MemoryNetwork::new();
    let (collaborators, _) = fakes(Script::default());
    let b = network.join(config("node-b"), collaborators).await;

    let err = b.request("node-z", Request::ping()).await.unwrap_err();

    assert_eq!(err.as_status().map(|s| s.code), Some(Code::Aborted));
    assert_eq!(b.inboxes().pending(), 0);
}

#[tokio::test]
async fn request_without_answer_times_out() {
    let network = MemoryNetwork::new();
    let (a_collaborators, a_calls) = fakes(Script::default());
    let (b_collaborators, _) = fakes(Script::default());
    let _a = network.join(config("node-a"), a_collaborators).await;
    let b = network.join(config("node-b"), b_collaborators).await;

    // Match data never produces a response.
    let request = Request::new(request::Payload::MatchSendData(messages::MatchSendData {
        id: Uuid::new_v4().to_string(),
        ..Default::default()
    }));
    let err = b.request("node-a", request).await.unwrap_err();

    assert!(matches!(err, PeerError::Timeout { ref node, .. } if node == "node-a"));
    assert_eq!(b.inboxes().pending(), 0);
    assert!(matches!(a_calls.lock().await[0], Call::SendData { .. }));
}

#[tokio::test]
async fn send_is_fire_and_forget() {
    let network = MemoryNetwork::new();
    let (a_collaborators, a_calls) = fakes(Script::default());
    let (b_collaborators, _) = fakes(Script::default());
    let _a = network.join(config("node-a"), a_collaborators).await;
    let b = network.join(config("node-b"), b_collaborators).await;
    let user_id = Uuid::new_v4();
    let keep = Uuid::new_v4();

    b.send(
        "node-a",
        Request::new(request::Payload::SingleSocket(messages::SingleSocket {
            user_id: user_id.to_string(),
            session_id: keep.to_string(),
        })),
    )
    .await
    .unwrap();
    settle().await;

    let sent = network.sent().await;
    assert_eq!(sent.len(), 1);
    assert!(sent[0].1.is_fire_and_forget());
    assert_eq!(
        *a_calls.lock().await,
        vec![Call::SingleSocket {
            user_id,
            keep_session_id: keep,
        }]
    );
}

#[tokio::test]
async fn error_response_reaches_requester() {
    let network = MemoryNetwork::new();
    let (a_collaborators, a_calls) = fakes(Script::default());
    let (b_collaborators, _) = fakes(Script::default());
    let _a = network.join(config("node-a"), a_collaborators).await;
    let b = network.join(config("node-b"), b_collaborators).await;

    let response = b
        .request(
            "node-a",
            Request::new(request::Payload::MatchId(format!(
                "{}.node-c",
                Uuid::new_v4()
            ))),
        )
        .await
        .unwrap();

    let status = response.as_error().and_then(|e| e.as_status()).unwrap();
    assert_eq!(status.code, Code::NotFound);
    assert!(a_calls.lock().await.is_empty());
}

#[tokio::test]
async fn late_response_is_dropped() {
    let network = MemoryNetwork::new();
    let (collaborators, _) = fakes(Script::default());
    let b = network.join(config("node-b"), collaborators).await;

    b.on_frame(Frame::response("node-a", "no-such-inbox", ResponseWriter::pong()))
        .await
        .unwrap();

    assert_eq!(b.inboxes().pending(), 0);
}

#[tokio::test]
async fn frame_without_payload_is_ignored() {
    let network = MemoryNetwork::new();
    let (collaborators, calls) = fakes(Script::default());
    let a = network.join(config("node-a"), collaborators).await;

    let mut empty = Frame::request("node-b", "inbox-1", Request::ping());
    empty.payload = None;
    a.on_frame(empty).await.unwrap();

    // An unknown request kind decodes as a request without payload.
    let mut unknown = Frame::request("node-b", "inbox-1", Request::ping());
    unknown.payload = Some(frame::Payload::Request(Request { payload: None }));
    a.on_frame(unknown).await.unwrap();

    assert!(network.sent().await.is_empty());
    assert!(calls.lock().await.is_empty());
}

#[tokio::test]
async fn undecodable_bytes_are_rejected() {
    let network = MemoryNetwork::new();
    let (collaborators, _) = fakes(Script::default());
    let a = network.join(config("node-a"), collaborators).await;

    let err = a.on_bytes(&[0xff, 0xff, 0xff]).await.unwrap_err();

    assert!(matches!(err, PeerError::Protocol(_)));
}

#[tokio::test]
async fn abandoned_request_closes_its_inbox() {
    let network = MemoryNetwork::new();
    let (a_collaborators, _) = fakes(Script::default());
    let (b_collaborators, _) = fakes(Script::default());
    let _a = network.join(config("node-a"), a_collaborators).await;
    let b = network.join(config("node-b"), b_collaborators).await;

    // Match data never answers; the caller gives up before the peer does.
    let request = Request::new(request::Payload::MatchSendData(messages::MatchSendData {
        id: Uuid::new_v4().to_string(),
        ..Default::default()
    }));
    let outcome = tokio::time::timeout(
        Duration::from_millis(50),
        b.request("node-a", request),
    )
    .await;

    assert!(outcome.is_err());
    assert_eq!(b.inboxes().pending(), 0);
}

/// Every request kind that produces a response, against local and foreign
/// match namespaces.
fn answering_requests() -> Vec<Request> {
    let party = || Uuid::new_v4().to_string();
    let lookup = || messages::PartyLookup {
        id: party(),
        session_id: "s-1".to_string(),
        from_node: "node-b".to_string(),
    };
    let update = || messages::PartyMemberUpdate {
        id: party(),
        session_id: "s-1".to_string(),
        from_node: "node-b".to_string(),
        user_presence: None,
    };
    let local_match = format!("{}.node-a", Uuid::new_v4());
    let foreign_match = format!("{}.node-c", Uuid::new_v4());

    [
        request::Payload::Ping(String::new()),
        request::Payload::PartyJoinRequest(messages::PartyJoinRequest {
            id: party(),
            presence: Some(messages::Presence::default()),
        }),
        request::Payload::PartyPromote(update()),
        request::Payload::PartyAccept(update()),
        request::Payload::PartyRemove(update()),
        request::Payload::PartyClose(lookup()),
        request::Payload::PartyJoinRequestList(lookup()),
        request::Payload::PartyMatchmakerAdd(messages::PartyMatchmakerAdd {
            id: party(),
            min_count: 2,
            max_count: 4,
            count_multiple: 1,
            ..Default::default()
        }),
        request::Payload::PartyMatchmakerRemove(messages::PartyMatchmakerRemove {
            id: party(),
            ticket: "T1".to_string(),
            ..Default::default()
        }),
        request::Payload::PartyDataSend(messages::PartyDataSend {
            id: party(),
            op_code: 1,
            data: vec![1],
            ..Default::default()
        }),
        request::Payload::MatchId(local_match.clone()),
        request::Payload::MatchId(foreign_match.clone()),
        request::Payload::MatchJoinAttempt(messages::MatchJoinAttempt {
            id: local_match.clone(),
            ..Default::default()
        }),
        request::Payload::MatchSignal(messages::MatchSignal {
            id: local_match.clone(),
            data: "pause".to_string(),
        }),
        request::Payload::MatchSignal(messages::MatchSignal {
            id: foreign_match,
            data: "pause".to_string(),
        }),
        request::Payload::MatchState(local_match),
    ]
    .into_iter()
    .map(Request::new)
    .collect()
}

#[tokio::test]
async fn empty_inbox_silences_every_kind_and_outcome() {
    let scripts = [
        Script::default(),
        Script {
            failure: Some(Status::new(Code::FailedPrecondition, "party is full")),
            ..Default::default()
        },
    ];

    for script in scripts {
        let network = MemoryNetwork::new();
        let (collaborators, calls) = fakes(script.clone());
        let a = network.join(config("node-a"), collaborators).await;
        let (b_collaborators, _) = fakes(Script::default());
        let _b = network.join(config("node-b"), b_collaborators).await;

        for request in answering_requests() {
            let kind = request.kind();
            a.on_frame(Frame::request("node-b", "", request))
                .await
                .unwrap_or_else(|e| panic!("{} failed: {}", kind, e));
            assert!(
                network.sent().await.is_empty(),
                "{} answered an empty inbox (failure: {:?})",
                kind,
                script.failure
            );
        }

        // Ping and the two foreign-match requests never reach a registry.
        assert_eq!(calls.lock().await.len(), 13);
    }
}

//! Conversions between wire presences and the domain values registries use.

use hive_core::{self as domain, uuid_or_nil};

use crate::messages;

/// Builds a domain presence from its wire form.
///
/// Only the first entry of the repeated `stream` and `meta` fields is read;
/// further entries are ignored. An empty collection leaves the field unset.
impl From<&messages::Presence> for domain::Presence {
    fn from(wire: &messages::Presence) -> Self {
        let id = domain::PresenceId::new(wire.node.clone(), uuid_or_nil(&wire.session_id));
        Self {
            id,
            user_id: uuid_or_nil(&wire.user_id),
            stream: wire.stream.first().map(domain::PresenceStream::from),
            meta: wire.meta.first().map(domain::PresenceMeta::from),
        }
    }
}

impl From<&domain::Presence> for messages::Presence {
    fn from(presence: &domain::Presence) -> Self {
        Self {
            node: presence.id.node.clone(),
            user_id: presence.user_id.to_string(),
            session_id: presence.id.session_id.to_string(),
            stream: presence
                .stream
                .iter()
                .map(messages::PresenceStream::from)
                .collect(),
            meta: presence.meta.iter().map(messages::PresenceMeta::from).collect(),
        }
    }
}

impl From<&messages::PresenceStream> for domain::PresenceStream {
    fn from(wire: &messages::PresenceStream) -> Self {
        Self {
            mode: wire.mode,
            subject: uuid_or_nil(&wire.subject),
            subcontext: uuid_or_nil(&wire.subcontext),
            label: wire.label.clone(),
        }
    }
}

impl From<&domain::PresenceStream> for messages::PresenceStream {
    fn from(stream: &domain::PresenceStream) -> Self {
        Self {
            mode: stream.mode,
            subject: stream.subject.to_string(),
            subcontext: stream.subcontext.to_string(),
            label: stream.label.clone(),
        }
    }
}

impl From<&messages::PresenceMeta> for domain::PresenceMeta {
    fn from(wire: &messages::PresenceMeta) -> Self {
        Self {
            format: wire.format,
            hidden: wire.hidden,
            persistence: wire.persistence,
            username: wire.username.clone(),
            status: wire.status.clone(),
            reason: wire.reason,
        }
    }
}

impl From<&domain::PresenceMeta> for messages::PresenceMeta {
    fn from(meta: &domain::PresenceMeta) -> Self {
        Self {
            format: meta.format,
            hidden: meta.hidden,
            persistence: meta.persistence,
            username: meta.username.clone(),
            status: meta.status.clone(),
            reason: meta.reason,
        }
    }
}

impl From<&domain::PresenceId> for messages::PresenceId {
    fn from(id: &domain::PresenceId) -> Self {
        Self {
            node: id.node.clone(),
            session_id: id.session_id.to_string(),
        }
    }
}

impl From<&messages::UserPresence> for domain::UserPresence {
    fn from(wire: &messages::UserPresence) -> Self {
        Self {
            user_id: wire.user_id.clone(),
            session_id: wire.session_id.clone(),
            username: wire.username.clone(),
            persistence: wire.persistence,
            status: wire.status.clone(),
        }
    }
}

impl From<&domain::UserPresence> for messages::UserPresence {
    fn from(presence: &domain::UserPresence) -> Self {
        Self {
            user_id: presence.user_id.clone(),
            session_id: presence.session_id.clone(),
            username: presence.username.clone(),
            persistence: presence.persistence,
            status: presence.status.clone(),
        }
    }
}

impl From<&domain::MatchPresence> for messages::MatchPresence {
    fn from(presence: &domain::MatchPresence) -> Self {
        Self {
            user_id: presence.user_id.to_string(),
            session_id: presence.session_id.to_string(),
            username: presence.username.clone(),
            node: presence.node.clone(),
            reason: presence.reason,
        }
    }
}

//! Core types shared by every hive crate: presences, namespaced match
//! identifiers and tracing setup.

pub mod match_id;
pub mod presence;
pub mod tracing;

pub use match_id::{MatchId, MatchIdError, namespace_of};
pub use presence::{
    MatchPresence, Presence, PresenceId, PresenceMeta, PresenceStream, UserPresence, uuid_or_nil,
};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};

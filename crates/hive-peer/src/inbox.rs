//! Requester-side response correlation.
//!
//! Each outstanding request owns a freshly named inbox. The response frame
//! carries that name back, and the registry hands the response to whoever
//! is waiting on it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;
use uuid::Uuid;

use hive_protocol::ResponseWriter;

type Pending = HashMap<String, oneshot::Sender<ResponseWriter>>;

/// Outstanding inboxes, keyed by inbox name. Cloning shares the same map.
///
/// The map is only touched for an insert or a remove, never across an
/// await, so a plain mutex is enough and lets an [`InboxGuard`] close its
/// inbox from `Drop`.
#[derive(Debug, Clone, Default)]
pub struct InboxRegistry {
    pending: Arc<Mutex<Pending>>,
}

impl InboxRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Pending> {
        // Critical sections are single map operations.
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens a new inbox and returns its name with the receiving end.
    pub fn register(&self) -> (String, oneshot::Receiver<ResponseWriter>) {
        let inbox = Uuid::new_v4().to_string();
        let (tx, rx) = oneshot::channel();
        self.lock().insert(inbox.clone(), tx);
        (inbox, rx)
    }

    /// Opens a new inbox that closes itself when the returned guard drops.
    pub fn open(&self) -> (InboxGuard, oneshot::Receiver<ResponseWriter>) {
        let (inbox, rx) = self.register();
        let guard = InboxGuard {
            registry: self.clone(),
            inbox,
        };
        (guard, rx)
    }

    /// Hands a response to its inbox and closes it.
    ///
    /// Returns false when no one is waiting: the inbox is unknown, was
    /// cancelled, or already answered.
    pub fn deliver(&self, inbox: &str, response: ResponseWriter) -> bool {
        let Some(tx) = self.lock().remove(inbox) else {
            return false;
        };
        tx.send(response).is_ok()
    }

    /// Closes an inbox without a response.
    pub fn cancel(&self, inbox: &str) {
        self.lock().remove(inbox);
    }

    /// Number of inboxes still waiting.
    pub fn pending(&self) -> usize {
        self.lock().len()
    }
}

/// An open inbox. Dropping it closes the inbox, so a request abandoned by
/// its caller leaves nothing behind.
#[derive(Debug)]
pub struct InboxGuard {
    registry: InboxRegistry,
    inbox: String,
}

impl InboxGuard {
    pub fn name(&self) -> &str {
        &self.inbox
    }
}

impl Drop for InboxGuard {
    fn drop(&mut self) {
        self.registry.cancel(&self.inbox);
    }
}

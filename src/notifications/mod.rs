//! Publish/subscribe registry behind the notification stream.
//!
//! Each subscriber owns a bounded channel. Publishing never waits: an event
//! that does not fit in a subscriber's buffer is dropped for that subscriber
//! alone. Late joiners get no replay.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use futures_util::Stream;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::ids::TimeTokens;
use crate::models::NotificationEvent;

/// Serialized event line, shared between subscribers.
pub type Payload = Arc<str>;

/// Registry of open notification streams.
pub struct Notifier {
    subscribers: Mutex<HashMap<u64, mpsc::Sender<Payload>>>,
    tokens: TimeTokens,
    buffer: usize,
}

impl Notifier {
    /// Create a registry whose subscribers buffer up to `buffer` events each.
    pub fn new(buffer: usize) -> Arc<Self> {
        Arc::new(Self {
            subscribers: Mutex::new(HashMap::new()),
            tokens: TimeTokens::new(),
            buffer: buffer.max(1),
        })
    }

    fn subscribers(&self) -> MutexGuard<'_, HashMap<u64, mpsc::Sender<Payload>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new stream. `CONNECTED` is queued before registration, so it
    /// is always the first event the subscriber sees.
    pub fn subscribe(self: &Arc<Self>) -> Subscription {
        let (tx, rx) = mpsc::channel(self.buffer);
        if let Some(payload) = serialize(&NotificationEvent::Connected) {
            // Fresh channel with at least one free slot
            let _ = tx.try_send(payload);
        }

        let id = self.tokens.next();
        let total = {
            let mut subscribers = self.subscribers();
            subscribers.insert(id, tx);
            subscribers.len()
        };
        tracing::info!(
            subscriber = id,
            "Notification client connected. Total subscribers: {}",
            total
        );

        Subscription {
            id,
            rx,
            notifier: Arc::clone(self),
        }
    }

    /// Drop a stream from the registry. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: u64) {
        let remaining = {
            let mut subscribers = self.subscribers();
            if subscribers.remove(&id).is_none() {
                return;
            }
            subscribers.len()
        };
        tracing::info!(
            subscriber = id,
            "Notification client disconnected. Remaining subscribers: {}",
            remaining
        );
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers().len()
    }

    /// Push `event` to every registered stream, returning how many accepted it.
    pub fn publish(&self, event: &NotificationEvent) -> usize {
        let Some(payload) = serialize(event) else {
            return 0;
        };

        let subscribers = self.subscribers();
        tracing::info!(
            event = event.kind(),
            "Sending notification to {} subscribers",
            subscribers.len()
        );

        let mut delivered = 0;
        for (id, tx) in subscribers.iter() {
            match tx.try_send(Arc::clone(&payload)) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(
                        subscriber = *id,
                        event = event.kind(),
                        "Notification buffer full, dropping event for this client"
                    );
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(subscriber = *id, "Notification client already gone");
                }
            }
        }
        delivered
    }
}

fn serialize(event: &NotificationEvent) -> Option<Payload> {
    match serde_json::to_string(event) {
        Ok(json) => Some(Arc::from(json)),
        Err(e) => {
            tracing::error!(event = event.kind(), "Failed to serialize notification: {}", e);
            None
        }
    }
}

/// One open notification stream. Dropping it unregisters the subscriber.
pub struct Subscription {
    id: u64,
    rx: mpsc::Receiver<Payload>,
    notifier: Arc<Notifier>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Stream for Subscription {
    type Item = Payload;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.notifier.unsubscribe(self.id);
    }
}

//! Per-project publish/subscribe fan-out.
//!
//! A [`Broadcast`] holds the sinks registered against one project. Publishing
//! never awaits: each sink gets one non-blocking delivery attempt, and a sink
//! whose delivery fails is removed without affecting the others.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tf_protocol::Event;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;
use uuid::Uuid;

/// Identifier handed out when a sink is registered.
pub type SubscriberId = Uuid;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("subscriber disconnected")]
    Closed,
    #[error("subscriber queue is full")]
    Full,
}

/// A delivery target for project events.
///
/// `deliver` must not block; it is called while the project's state is
/// being updated.
pub trait EventSink: Send + Sync {
    fn deliver(&self, event: &Event) -> Result<(), DeliveryError>;
}

impl EventSink for mpsc::Sender<Event> {
    fn deliver(&self, event: &Event) -> Result<(), DeliveryError> {
        self.try_send(event.clone()).map_err(|err| match err {
            TrySendError::Full(_) => DeliveryError::Full,
            TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }
}

struct Subscriber {
    id: SubscriberId,
    sink: Arc<dyn EventSink>,
}

/// The sink registry of a single project.
pub struct Broadcast {
    project_id: Uuid,
    subscribers: Mutex<Vec<Subscriber>>,
}

impl Broadcast {
    pub fn new(project_id: Uuid) -> Self {
        Self {
            project_id,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Subscriber>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deliver `initial` to `sink` and, if that succeeds, register it.
    ///
    /// When `retain` is false the sink only receives the initial event; this
    /// is used for projects that will never publish again.
    pub fn subscribe(
        &self,
        sink: Arc<dyn EventSink>,
        initial: &Event,
        retain: bool,
    ) -> Result<SubscriberId, DeliveryError> {
        sink.deliver(initial)?;
        let id = Uuid::new_v4();
        if retain {
            self.lock().push(Subscriber { id, sink });
        }
        debug!(project_id = %self.project_id, subscriber = %id, retain, "subscriber registered");
        Ok(id)
    }

    /// Remove a sink. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut subscribers = self.lock();
        let before = subscribers.len();
        subscribers.retain(|subscriber| subscriber.id != id);
        before != subscribers.len()
    }

    /// Deliver `event` to every registered sink.
    ///
    /// Iterates a snapshot of the registry so sinks are never called with the
    /// registry locked. Returns the number of successful deliveries.
    pub fn publish(&self, event: &Event) -> usize {
        let targets: Vec<(SubscriberId, Arc<dyn EventSink>)> = self
            .lock()
            .iter()
            .map(|subscriber| (subscriber.id, Arc::clone(&subscriber.sink)))
            .collect();

        let mut delivered = 0;
        let mut failed = Vec::new();
        for (id, sink) in targets {
            match sink.deliver(event) {
                Ok(()) => delivered += 1,
                Err(err) => {
                    debug!(project_id = %self.project_id, subscriber = %id, error = %err, "dropping subscriber");
                    failed.push(id);
                }
            }
        }

        if !failed.is_empty() {
            self.lock().retain(|subscriber| !failed.contains(&subscriber.id));
        }
        delivered
    }

    /// Drop every sink. Channel-backed subscribers see their stream end once
    /// they drain what was already queued.
    pub fn close(&self) {
        self.lock().clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }
}

/// A channel-backed subscription to one project's events.
///
/// The first event received is always [`Event::StatusUpdate`].
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    project_id: Uuid,
    receiver: mpsc::Receiver<Event>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriberId, project_id: Uuid, receiver: mpsc::Receiver<Event>) -> Self {
        Self {
            id,
            project_id,
            receiver,
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn project_id(&self) -> Uuid {
        self.project_id
    }

    /// Wait for the next event. `None` once the project stops publishing and
    /// the queue is drained.
    pub async fn recv(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    pub fn into_stream(self) -> ReceiverStream<Event> {
        ReceiverStream::new(self.receiver)
    }
}

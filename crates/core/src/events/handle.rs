use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};

use super::{DispatchOutcome, InboundEvent};

/// Error type for submitting events.
#[derive(Debug, thiserror::Error)]
pub enum EventLoopError {
    #[error("Event loop is not running")]
    Closed,
}

/// Envelope wrapping an inbound event with metadata and a reply channel
#[derive(Debug)]
pub struct EventEnvelope {
    pub received_at: DateTime<Utc>,
    pub event: InboundEvent,
    pub reply: oneshot::Sender<DispatchOutcome>,
}

/// Handle for submitting events to the event loop
///
/// This is cheaply cloneable and can be shared across tasks. Events are
/// handled one at a time, in the order they were submitted.
#[derive(Clone)]
pub struct EventHandle {
    tx: mpsc::Sender<EventEnvelope>,
}

impl EventHandle {
    /// Create a new event handle from a channel sender
    pub fn new(tx: mpsc::Sender<EventEnvelope>) -> Self {
        Self { tx }
    }

    /// Submit an event and wait for its outcome
    ///
    /// Waits for buffer space when the loop is busy.
    pub async fn submit(&self, event: InboundEvent) -> Result<DispatchOutcome, EventLoopError> {
        let (reply, outcome) = oneshot::channel();
        let envelope = EventEnvelope {
            received_at: Utc::now(),
            event,
            reply,
        };
        self.tx
            .send(envelope)
            .await
            .map_err(|_| EventLoopError::Closed)?;
        outcome.await.map_err(|_| EventLoopError::Closed)
    }

    /// Whether the event loop has stopped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

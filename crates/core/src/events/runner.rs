use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use super::{EventEnvelope, EventHandle};
use crate::dispatcher::Dispatcher;

/// Background task that owns the dispatcher and handles events in order
pub struct EventLoop {
    rx: mpsc::Receiver<EventEnvelope>,
    dispatcher: Dispatcher,
    sweep_interval: Duration,
}

impl EventLoop {
    /// Create a new event loop
    pub fn new(
        rx: mpsc::Receiver<EventEnvelope>,
        dispatcher: Dispatcher,
        sweep_interval: Duration,
    ) -> Self {
        Self {
            rx,
            dispatcher,
            sweep_interval,
        }
    }

    /// Run the loop until every handle is dropped
    ///
    /// Idle wizard sessions are swept on a fixed interval between events.
    /// This should be spawned as a background task.
    pub async fn run(mut self) {
        tracing::info!("Event loop started");

        let mut sweep = tokio::time::interval(self.sweep_interval);
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        sweep.tick().await;

        loop {
            tokio::select! {
                envelope = self.rx.recv() => {
                    let Some(envelope) = envelope else { break };
                    let kind = envelope.event.kind();
                    let outcome = self.dispatcher.dispatch(envelope.event).await;
                    let latency_ms = (chrono::Utc::now() - envelope.received_at).num_milliseconds();
                    tracing::debug!(kind, latency_ms, "Event handled");
                    if envelope.reply.send(outcome).is_err() {
                        tracing::debug!(kind, "Event submitter went away before the reply");
                    }
                }
                _ = sweep.tick() => {
                    self.dispatcher.sweep_sessions();
                }
            }
        }

        tracing::info!("Event loop shutting down");
    }
}

/// Create a complete event system
///
/// Returns:
/// - `EventHandle` - for submitting events (clone this to share across tasks)
/// - `EventLoop` - spawn this as a background task with `tokio::spawn(event_loop.run())`
pub fn create_event_loop(
    dispatcher: Dispatcher,
    buffer_size: usize,
    sweep_interval: Duration,
) -> (EventHandle, EventLoop) {
    let (tx, rx) = mpsc::channel(buffer_size);
    let handle = EventHandle::new(tx);
    let event_loop = EventLoop::new(rx, dispatcher, sweep_interval);
    (handle, event_loop)
}

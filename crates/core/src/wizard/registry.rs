//! Per-operator session registry with idle eviction.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use super::types::WizardSession;
use crate::events::OperatorId;
use crate::metrics::SESSIONS_EVICTED;

struct Slot {
    session: WizardSession,
    last_active: Instant,
}

/// At most one open session per operator. Sessions idle for longer than
/// the timeout are treated as gone.
pub struct SessionRegistry {
    sessions: HashMap<OperatorId, Slot>,
    idle_timeout: Duration,
}

impl SessionRegistry {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            idle_timeout,
        }
    }

    /// Store `session` for `operator`, replacing any open one.
    pub fn put(&mut self, operator: OperatorId, session: WizardSession) {
        self.put_at(operator, session, Instant::now());
    }

    pub fn put_at(&mut self, operator: OperatorId, session: WizardSession, now: Instant) {
        self.sessions.insert(
            operator,
            Slot {
                session,
                last_active: now,
            },
        );
    }

    /// Remove and return the operator's live session.
    pub fn take(&mut self, operator: OperatorId) -> Option<WizardSession> {
        self.take_at(operator, Instant::now())
    }

    pub fn take_at(&mut self, operator: OperatorId, now: Instant) -> Option<WizardSession> {
        let slot = self.sessions.remove(&operator)?;
        if self.is_expired(&slot, now) {
            debug!(operator, "Dropping expired wizard session");
            SESSIONS_EVICTED.inc();
            return None;
        }
        Some(slot.session)
    }

    /// Drop the operator's session, returning whether one was open.
    pub fn remove(&mut self, operator: OperatorId) -> bool {
        self.sessions.remove(&operator).is_some()
    }

    pub fn contains(&self, operator: OperatorId) -> bool {
        self.sessions.contains_key(&operator)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop every session idle past the timeout. Returns how many went.
    pub fn evict_expired(&mut self) -> usize {
        self.evict_expired_at(Instant::now())
    }

    pub fn evict_expired_at(&mut self, now: Instant) -> usize {
        let timeout = self.idle_timeout;
        let before = self.sessions.len();
        self.sessions
            .retain(|_, slot| now.saturating_duration_since(slot.last_active) <= timeout);
        let evicted = before - self.sessions.len();
        if evicted > 0 {
            debug!(evicted, "Evicted idle wizard sessions");
            SESSIONS_EVICTED.inc_by(evicted as u64);
        }
        evicted
    }

    fn is_expired(&self, slot: &Slot, now: Instant) -> bool {
        now.saturating_duration_since(slot.last_active) > self.idle_timeout
    }
}

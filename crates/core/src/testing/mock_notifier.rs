//! Mock notifier for testing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::notify::{Notifier, NotifyError};

/// A delivered notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedNotification {
    pub recipient: i64,
    pub text: String,
}

/// Notifier that records every notice instead of sending it.
///
/// # Example
///
/// ```rust,ignore
/// use anihub_core::testing::RecordingNotifier;
///
/// let notifier = Arc::new(RecordingNotifier::new());
/// // ... hand it to a Dispatcher, run events ...
/// assert_eq!(notifier.recorded().await.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notifications: Arc<RwLock<Vec<RecordedNotification>>>,
    fail: Arc<RwLock<bool>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far.
    pub async fn recorded(&self) -> Vec<RecordedNotification> {
        self.notifications.read().await.clone()
    }

    /// Texts delivered so far.
    pub async fn texts(&self) -> Vec<String> {
        self.notifications
            .read()
            .await
            .iter()
            .map(|n| n.text.clone())
            .collect()
    }

    /// Make subsequent deliveries fail.
    pub async fn set_failing(&self, fail: bool) {
        *self.fail.write().await = fail;
    }

    pub async fn clear(&self) {
        self.notifications.write().await.clear();
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn notify(&self, recipient: i64, text: &str) -> Result<(), NotifyError> {
        if *self.fail.read().await {
            return Err(NotifyError::Http("simulated failure".to_string()));
        }
        self.notifications.write().await.push(RecordedNotification {
            recipient,
            text: text.to_string(),
        });
        Ok(())
    }
}

//! Operator notifications.
//!
//! The dispatcher tells the operator about every catalog change. Delivery is
//! best effort: a failed notification is logged and never fails the event
//! that caused it.

mod log;
mod webhook;

pub use log::LogNotifier;
pub use webhook::WebhookNotifier;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::NotifyConfig;

/// Error type for notification delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Webhook responded with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid notifier configuration: {0}")]
    Config(String),
}

/// Delivers a text notice to a chat user.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    async fn notify(&self, recipient: i64, text: &str) -> Result<(), NotifyError>;
}

/// Pick the notifier for `config`: a webhook when configured, logging otherwise.
pub fn create_notifier(config: &NotifyConfig) -> Result<Arc<dyn Notifier>, NotifyError> {
    match config.webhook_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => Ok(Arc::new(WebhookNotifier::new(
            url,
            std::time::Duration::from_secs(config.timeout_secs),
        )?)),
        _ => Ok(Arc::new(LogNotifier)),
    }
}

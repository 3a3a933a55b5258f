use async_trait::async_trait;
use tracing::info;

use super::{Notifier, NotifyError};

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn notify(&self, recipient: i64, text: &str) -> Result<(), NotifyError> {
        info!(recipient, text, "Operator notification");
        Ok(())
    }
}

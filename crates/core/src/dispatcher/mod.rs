//! Routes inbound events to feed ingestion, the wizard and search.
//!
//! The dispatcher is owned by the event loop and handles one event at a
//! time. Nothing here fails the loop: storage errors are logged, reported
//! to the operator and turned into an ordinary outcome.

mod commands;
mod notices;

pub use commands::Command;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::catalog::{Catalog, CatalogError};
use crate::config::{Config, FeedConfig};
use crate::events::{
    DispatchOutcome, InboundEvent, OperatorId, OperatorMessage, Prompt, SearchRequest,
};
use crate::extractor::{ExtractorError, FeedPost, FieldExtractor};
use crate::metrics::{FEED_POSTS, SEARCH_REQUESTS};
use crate::notify::Notifier;
use crate::search::search;
use crate::wizard::{self, CatalogChange, SessionRegistry, Step, Wizard};

/// Event handler state: catalog, extractor, open wizard sessions.
pub struct Dispatcher {
    operator_id: OperatorId,
    feed: FeedConfig,
    search_limit: usize,
    extractor: FieldExtractor,
    catalog: Arc<Catalog>,
    wizard: Wizard,
    sessions: SessionRegistry,
    notifier: Arc<dyn Notifier>,
}

impl Dispatcher {
    pub fn new(
        config: &Config,
        catalog: Arc<Catalog>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ExtractorError> {
        Ok(Self {
            operator_id: config.operator.id,
            feed: config.feed.clone(),
            search_limit: config.search.max_results,
            extractor: FieldExtractor::new(config.extractor.clone())?,
            wizard: Wizard::new(Arc::clone(&catalog)),
            catalog,
            sessions: SessionRegistry::new(Duration::from_secs(config.wizard.idle_timeout_secs)),
            notifier,
        })
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Number of open wizard sessions.
    pub fn open_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Drop idle wizard sessions.
    pub fn sweep_sessions(&mut self) -> usize {
        self.sessions.evict_expired()
    }

    /// Handle one event.
    pub async fn dispatch(&mut self, event: InboundEvent) -> DispatchOutcome {
        debug!(kind = event.kind(), "Dispatching event");
        match event {
            InboundEvent::FeedPost(post) => self.handle_feed_post(post).await,
            InboundEvent::OperatorMessage(message) => self.handle_message(message).await,
            InboundEvent::SearchRequest(request) => self.handle_search(request),
        }
    }

    // ------------------------------------------------------------------
    // Feed ingestion
    // ------------------------------------------------------------------

    async fn handle_feed_post(&mut self, post: FeedPost) -> DispatchOutcome {
        if let Some(expected) = self.feed.channel_id {
            if post.channel_id != expected {
                FEED_POSTS.with_label_values(&["foreign_channel"]).inc();
                debug!(channel_id = post.channel_id, "Ignoring post from another channel");
                return DispatchOutcome::Ignored;
            }
        }

        let Some(extracted) = self
            .extractor
            .extract_post(&post, self.feed.channel_username.as_deref())
        else {
            FEED_POSTS.with_label_values(&["gated"]).inc();
            debug!(message_id = post.message_id, "Post has no catalog markers");
            return DispatchOutcome::Ignored;
        };

        let entry = extracted.into_entry(&self.extractor.config().untitled);
        match self.catalog.upsert(entry.clone()) {
            Ok(replaced) => {
                FEED_POSTS.with_label_values(&["ingested"]).inc();
                info!(
                    title = %entry.title,
                    message_id = post.message_id,
                    replaced,
                    "Feed post stored"
                );
                self.notify(notices::ingested(&entry, replaced)).await;
            }
            Err(e) => {
                FEED_POSTS.with_label_values(&["failed"]).inc();
                error!(message_id = post.message_id, error = %e, "Failed to store feed post");
                let action = format!("сохранить пост {}", entry.link);
                self.notify(notices::storage_failure(&action, &e)).await;
            }
        }
        DispatchOutcome::Ignored
    }

    // ------------------------------------------------------------------
    // Operator messages
    // ------------------------------------------------------------------

    async fn handle_message(&mut self, message: OperatorMessage) -> DispatchOutcome {
        let sender = message.sender_id;
        let chat = message.reply_chat();
        let is_operator = sender == self.operator_id;

        let command = Command::parse(&message.text);
        if let Some(command) = &command {
            debug!(sender, command = command.name(), "Operator command");
        }

        match command {
            Some(Command::Start) => DispatchOutcome::reply(notices::welcome().to(chat)),
            Some(Command::Add) if !is_operator => {
                warn!(sender, "Refused /add from non-operator");
                DispatchOutcome::reply(notices::add_refused().to(chat))
            }
            Some(Command::Add) => {
                let step = self.wizard.start_add();
                self.finish_step(sender, chat, step).await
            }
            Some(Command::Edit(_)) if !is_operator => {
                warn!(sender, "Refused /edit from non-operator");
                DispatchOutcome::reply(notices::edit_refused().to(chat))
            }
            Some(Command::Edit(title)) => {
                let step = self.wizard.start_edit(title.as_deref());
                self.finish_step(sender, chat, step).await
            }
            Some(Command::Delete(_)) if !is_operator => DispatchOutcome::Ignored,
            Some(Command::Delete(None)) => {
                DispatchOutcome::reply(notices::delete_usage().to(chat))
            }
            Some(Command::Delete(Some(title))) => self.delete(sender, chat, &title).await,
            Some(Command::Cancel) => {
                let prompt = if self.sessions.remove(sender) {
                    notices::cancelled()
                } else {
                    notices::nothing_to_cancel()
                };
                DispatchOutcome::reply(prompt.to(chat))
            }
            Some(Command::Unknown(name)) => {
                debug!(sender, command = %name, "Ignoring unknown command");
                DispatchOutcome::Ignored
            }
            None if !is_operator => DispatchOutcome::Ignored,
            None => match self.sessions.take(sender) {
                Some(session) => {
                    let step = self.wizard.advance(session, &message.text);
                    self.finish_step(sender, chat, step).await
                }
                None => DispatchOutcome::Ignored,
            },
        }
    }

    async fn finish_step(&mut self, operator: OperatorId, chat: i64, step: Step) -> DispatchOutcome {
        let Step {
            session,
            reply,
            change,
        } = step;
        match session {
            Some(session) => {
                debug!(operator, mode = session.mode().as_str(), "Wizard session kept");
                self.sessions.put(operator, session);
            }
            None => {
                self.sessions.remove(operator);
            }
        }
        if let Some(change) = &change {
            info!(operator, title = %change.entry().title, "Catalog changed by wizard");
            self.notify(notices::change(change)).await;
        }
        DispatchOutcome::reply(reply.to(chat))
    }

    async fn delete(&mut self, operator: OperatorId, chat: i64, title: &str) -> DispatchOutcome {
        let prompt = match self.catalog.remove(title) {
            Ok(entry) => {
                info!(title = %entry.title, "Catalog entry deleted by command");
                self.drop_session_for(operator, &entry.title);
                let prompt = wizard::deleted(&entry.title);
                self.notify(notices::change(&CatalogChange::Deleted(entry)))
                    .await;
                prompt
            }
            Err(CatalogError::EntryNotFound(missing)) => wizard::not_found(&missing),
            Err(e) => {
                error!(title, error = %e, "Failed to delete catalog entry");
                Prompt::text(notices::storage_failure("удалить", &e))
            }
        };
        DispatchOutcome::reply(prompt.to(chat))
    }

    /// Close the operator's edit session if it targets `title`.
    fn drop_session_for(&mut self, operator: OperatorId, title: &str) {
        if let Some(session) = self.sessions.take(operator) {
            let targets_title = session
                .target_title
                .as_deref()
                .is_some_and(|t| t.to_lowercase() == title.to_lowercase());
            if !targets_title {
                self.sessions.put(operator, session);
            }
        }
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    fn handle_search(&self, request: SearchRequest) -> DispatchOutcome {
        let results = match self.catalog.entries() {
            Ok(entries) => search(&entries, &request.query, self.search_limit),
            Err(e) => {
                SEARCH_REQUESTS.with_label_values(&["failed"]).inc();
                error!(error = %e, "Failed to load catalog for search");
                // Nothing to match against: a non-empty query still gets the placeholder.
                search(&[], &request.query, self.search_limit)
            }
        };
        DispatchOutcome::SearchResults { results }
    }

    async fn notify(&self, text: String) {
        if let Err(e) = self.notifier.notify(self.operator_id, &text).await {
            warn!(
                notifier = self.notifier.name(),
                error = %e,
                "Failed to deliver operator notification"
            );
        }
    }
}

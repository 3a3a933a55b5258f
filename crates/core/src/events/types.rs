//! Inbound events and outbound messages exchanged with the transport.

use serde::{Deserialize, Serialize};

use crate::extractor::FeedPost;
use crate::search::SearchResult;

/// Chat user id.
pub type OperatorId = i64;

/// Something delivered by the transport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    /// A post on the source channel.
    FeedPost(FeedPost),
    /// A direct message or button press from a user.
    OperatorMessage(OperatorMessage),
    /// An inline search query.
    SearchRequest(SearchRequest),
}

impl InboundEvent {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            InboundEvent::FeedPost(_) => "feed_post",
            InboundEvent::OperatorMessage(_) => "operator_message",
            InboundEvent::SearchRequest(_) => "search_request",
        }
    }
}

/// A chat message. Button presses arrive as their callback data in `text`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperatorMessage {
    pub sender_id: OperatorId,
    /// Chat to reply in; the sender's private chat when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<i64>,
    pub text: String,
}

impl OperatorMessage {
    pub fn new(sender_id: OperatorId, text: impl Into<String>) -> Self {
        Self {
            sender_id,
            chat_id: None,
            text: text.into(),
        }
    }

    pub fn reply_chat(&self) -> i64 {
        self.chat_id.unwrap_or(self.sender_id)
    }
}

/// An inline search query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchRequest {
    pub sender_id: OperatorId,
    #[serde(default)]
    pub query: String,
}

/// What a button does when pressed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ButtonAction {
    /// Sends `data` back as an operator message.
    Callback(String),
    /// Opens inline search in the current chat, prefilled with the query.
    SwitchInlineQuery(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Button {
    pub text: String,
    pub action: ButtonAction,
}

impl Button {
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: ButtonAction::Callback(data.into()),
        }
    }

    pub fn search(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: ButtonAction::SwitchInlineQuery(String::new()),
        }
    }
}

/// Reply text plus an optional button grid, not yet bound to a chat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub buttons: Vec<Vec<Button>>,
}

impl Prompt {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    pub fn with_buttons(mut self, buttons: Vec<Vec<Button>>) -> Self {
        self.buttons = buttons;
        self
    }

    /// Bind to a chat.
    pub fn to(self, chat_id: i64) -> OutboundMessage {
        OutboundMessage {
            chat_id,
            text: self.text,
            buttons: self.buttons,
        }
    }
}

/// A message for the transport to deliver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutboundMessage {
    pub chat_id: i64,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Vec<Button>>,
}

/// Result of handling one event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// Messages to send back.
    Replies { messages: Vec<OutboundMessage> },
    /// Answer to a search request.
    SearchResults { results: Vec<SearchResult> },
    /// Nothing to send.
    Ignored,
}

impl DispatchOutcome {
    pub fn reply(message: OutboundMessage) -> Self {
        DispatchOutcome::Replies {
            messages: vec![message],
        }
    }

    /// Reply texts, for logging and tests.
    pub fn reply_texts(&self) -> Vec<&str> {
        match self {
            DispatchOutcome::Replies { messages } => {
                messages.iter().map(|m| m.text.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

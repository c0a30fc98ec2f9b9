//! Conversation Event Logger
//!
//! Structured events (prompt, reply, failure) emitted through `tracing`
//! under the `chat_events` target, so the NDJSON file layer captures them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    Prompt {
        message_id: String,
        text: String,
    },
    Reply {
        message_id: String,
        raw_len: usize,
        markup_len: usize,
    },
    Failure {
        message_id: String,
        detail: String,
    },
}

impl ChatEvent {
    fn redacted(self) -> Self {
        match self {
            ChatEvent::Prompt { message_id, text } => ChatEvent::Prompt {
                message_id,
                text: redact_sensitive_data(&text),
            },
            ChatEvent::Failure { message_id, detail } => ChatEvent::Failure {
                message_id,
                detail: redact_sensitive_data(&detail),
            },
            reply @ ChatEvent::Reply { .. } => reply,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub conversation_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: ChatEvent,
}

impl EventLogEntry {
    pub fn new(conversation_id: &str, event: ChatEvent) -> Self {
        Self {
            conversation_id: conversation_id.to_string(),
            timestamp: Utc::now(),
            event: event.redacted(),
        }
    }
}

pub struct EventLogger;

impl EventLogger {
    /// Redacts and emits one conversation event.
    pub fn log_event(conversation_id: &str, event: ChatEvent) {
        let entry = EventLogEntry::new(conversation_id, event);
        let json = serde_json::to_string(&entry).unwrap_or_default();

        match entry.event {
            ChatEvent::Failure { .. } => warn!(target: "chat_events", event = %json, "Chat event"),
            _ => info!(target: "chat_events", event = %json, "Chat event"),
        }
    }
}

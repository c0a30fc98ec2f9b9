//! Conversation controller: one prompt in, one revealed reply out.
//!
//! For each prompt it records the user stripe, shows the loader on the reply
//! surface, asks the backend, then either reveals the rendered reply or
//! shows a static failure message.

use std::sync::Arc;

use chatwidget_core::{ChatBackend, DisplaySurface};
use chatwidget_logging::{ChatEvent, EventLogger};
use chatwidget_markdown::{render_with, TransformOptions};
use chatwidget_reveal::{RevealHandle, SurfaceDriver};
use tracing::{info, warn};

use crate::transcript::{generate_unique_id, ChatStripe, Transcript};

/// Shown in place of the reply when the exchange fails.
pub const FAILURE_MESSAGE: &str = "Something went wrong";

pub enum ExchangeOutcome {
    /// The reply is being revealed; await the handle to wait for the end.
    Revealing(RevealHandle),
    /// The backend failed; `detail` is what it said (or why it was unreachable).
    Failed { detail: String },
}

pub struct Exchange {
    /// Id of the bot message bubble.
    pub message_id: String,
    pub outcome: ExchangeOutcome,
}

pub struct ConversationController<S: DisplaySurface + 'static> {
    conversation_id: String,
    backend: Arc<dyn ChatBackend>,
    driver: SurfaceDriver<S>,
    options: TransformOptions,
    transcript: Transcript,
}

impl<S: DisplaySurface + 'static> ConversationController<S> {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        driver: SurfaceDriver<S>,
        options: TransformOptions,
    ) -> Self {
        Self {
            conversation_id: generate_unique_id(),
            backend,
            driver,
            options,
            transcript: Transcript::new(),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[cfg(test)]
    pub fn driver(&self) -> &SurfaceDriver<S> {
        &self.driver
    }

    /// Runs one exchange. A reveal still in flight from the previous prompt
    /// is superseded by the loader.
    pub async fn submit(&mut self, prompt: &str) -> Exchange {
        self.transcript
            .push(ChatStripe::user(prompt, generate_unique_id()));
        let message_id = generate_unique_id();

        EventLogger::log_event(
            &self.conversation_id,
            ChatEvent::Prompt {
                message_id: message_id.clone(),
                text: prompt.to_string(),
            },
        );

        self.driver.start_loader().await;
        let result = self.backend.ask(prompt).await;
        self.driver.clear().await;

        match result {
            Ok(reply) => {
                let raw = reply.raw_text();
                let markup = render_with(raw, self.options);
                EventLogger::log_event(
                    &self.conversation_id,
                    ChatEvent::Reply {
                        message_id: message_id.clone(),
                        raw_len: raw.len(),
                        markup_len: markup.len(),
                    },
                );
                info!(backend = self.backend.name(), message_id = %message_id, "Revealing reply");

                let mut stripe = ChatStripe::bot(markup.clone(), message_id.clone());
                if let Some(emotion) = reply.emotion.as_deref() {
                    stripe = stripe.with_emotion(emotion);
                }
                self.transcript.push(stripe);
                let handle = self.driver.reveal(markup);
                Exchange {
                    message_id,
                    outcome: ExchangeOutcome::Revealing(handle),
                }
            }
            Err(err) => {
                warn!(backend = self.backend.name(), error = %err, "Chat exchange failed");
                self.driver.show_text(FAILURE_MESSAGE).await;
                EventLogger::log_event(
                    &self.conversation_id,
                    ChatEvent::Failure {
                        message_id: message_id.clone(),
                        detail: err.to_string(),
                    },
                );

                self.transcript
                    .push(ChatStripe::bot(FAILURE_MESSAGE, message_id.clone()));
                Exchange {
                    message_id,
                    outcome: ExchangeOutcome::Failed {
                        detail: err.user_detail().to_string(),
                    },
                }
            }
        }
    }
}

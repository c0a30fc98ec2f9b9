use async_trait::async_trait;

use crate::error::WidgetError;
use crate::message::ChatReply;

/// A chat backend that turns one user prompt into one bot reply.
///
/// The widget never streams from the backend; the whole reply arrives at
/// once and the typing effect is produced locally.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Backend name for logs (e.g., "http").
    fn name(&self) -> &str;

    /// Send the prompt and wait for the full reply.
    async fn ask(&self, prompt: &str) -> Result<ChatReply, WidgetError>;
}

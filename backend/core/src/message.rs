use serde::{Deserialize, Serialize};

/// Body POSTed to the chat backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    pub prompt: String,
}

/// Successful reply from the chat backend. Fields other than `bot` and
/// `emotion` are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    pub bot: String,
    /// Mood label shown next to the bubble, e.g. "Happy".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
}

impl ChatReply {
    /// The raw text handed to the markdown transform: `bot` with surrounding
    /// whitespace removed.
    pub fn raw_text(&self) -> &str {
        self.bot.trim()
    }
}

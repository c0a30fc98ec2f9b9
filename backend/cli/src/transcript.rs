//! Conversation transcript rendered as chat-stripe HTML.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use uuid::Uuid;

pub const BOT_AVATAR: &str = "assets/bot.svg";
pub const USER_AVATAR: &str = "assets/user.svg";

/// `id-<unix millis>-<random hex>`, unique per message bubble.
pub fn generate_unique_id() -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("id-{}-{}", Utc::now().timestamp_millis(), &random[..13])
}

/// One message bubble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatStripe {
    pub is_ai: bool,
    /// Interpreted as markup, not escaped.
    pub value: String,
    pub id: String,
    pub emotion: Option<String>,
}

impl ChatStripe {
    pub fn user(value: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            is_ai: false,
            value: value.into(),
            id: id.into(),
            emotion: None,
        }
    }

    pub fn bot(value: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            is_ai: true,
            ..Self::user(value, id)
        }
    }

    pub fn with_emotion(mut self, emotion: impl Into<String>) -> Self {
        self.emotion = Some(emotion.into());
        self
    }

    fn emotion_indicator(&self) -> String {
        let Some(emotion) = self.emotion.as_deref().filter(|e| !e.is_empty()) else {
            return String::new();
        };
        let initial: String = emotion.chars().take(1).collect();
        format!(
            "<div class=\"emotion-indicator emotion-{}\">{initial}</div>",
            emotion.to_lowercase()
        )
    }

    pub fn to_html(&self) -> String {
        let (wrapper, avatar, alt) = if self.is_ai {
            ("wrapper ai", BOT_AVATAR, "bot")
        } else {
            ("wrapper", USER_AVATAR, "user")
        };
        format!(
            "<div class=\"{wrapper}\">\n  <div class=\"chat\">\n    {}\n    <div class=\"profile\">\n      <img src=\"{avatar}\" alt=\"{alt}\" />\n    </div>\n    <div class=\"message\" id=\"{}\">{}</div>\n  </div>\n</div>\n",
            self.emotion_indicator(),
            self.id,
            self.value
        )
    }
}

/// Every stripe of one conversation, oldest first.
#[derive(Debug, Default)]
pub struct Transcript {
    stripes: Vec<ChatStripe>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stripe: ChatStripe) {
        self.stripes.push(stripe);
    }

    #[cfg(test)]
    pub fn stripes(&self) -> &[ChatStripe] {
        &self.stripes
    }

    pub fn to_html(&self) -> String {
        let body: String = self.stripes.iter().map(ChatStripe::to_html).collect();
        format!("<div id=\"chat_container\">\n{body}</div>\n")
    }

    pub async fn write_html(&self, path: &Path) -> Result<()> {
        tokio::fs::write(path, self.to_html())
            .await
            .with_context(|| format!("Failed to write transcript: {}", path.display()))
    }
}

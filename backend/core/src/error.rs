use thiserror::Error;

/// Top-level error type for the chat widget.
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("backend unreachable: {0}")]
    Transport(String),

    #[error("malformed backend reply: {0}")]
    MalformedReply(String),
}

impl WidgetError {
    /// Text shown to the user when the exchange fails, mirroring what the
    /// backend said when it said anything at all.
    pub fn user_detail(&self) -> &str {
        match self {
            WidgetError::Backend { body, .. } => body,
            WidgetError::Transport(msg) | WidgetError::MalformedReply(msg) => msg,
        }
    }
}

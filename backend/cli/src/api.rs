//! HTTP chat backend.
//!
//! POSTs `{"prompt": ...}` as JSON and expects `{"bot": ...}` back. A non-2xx
//! status is a failure carrying the response body as its detail.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use chatwidget_core::{ChatBackend, ChatReply, ChatRequest, WidgetError};

pub struct HttpChatBackend {
    client: Client,
    url: String,
}

impl HttpChatBackend {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn ask(&self, prompt: &str) -> Result<ChatReply, WidgetError> {
        let start = Instant::now();
        let body = ChatRequest {
            prompt: prompt.to_string(),
        };

        debug!(url = %self.url, prompt_len = prompt.len(), "Sending chat request");

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| WidgetError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WidgetError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatReply = response
            .json()
            .await
            .map_err(|e| WidgetError::MalformedReply(e.to_string()))?;

        debug!(
            latency_ms = start.elapsed().as_millis() as u64,
            reply_len = reply.bot.len(),
            "Chat reply received"
        );
        Ok(reply)
    }
}

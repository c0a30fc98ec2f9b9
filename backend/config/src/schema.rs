//! Chat widget configuration schema.
//!
//! Every field is optional in the file; [`crate::defaults`] fills the gaps
//! and the accessors on [`WidgetConfig`] fall back to the same defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::defaults::{
    DEFAULT_BACKEND_TIMEOUT_SECS, DEFAULT_BACKEND_URL, DEFAULT_LOADER_TICK_MILLIS,
    DEFAULT_LOG_LEVEL, DEFAULT_REVEAL_TICK_MILLIS,
};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    /// Chat backend endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<BackendConfig>,

    /// Typing effect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reveal: Option<RevealConfig>,

    /// "Thinking" dots while waiting for a reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loader: Option<LoaderConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<MarkdownConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BackendConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RevealConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_millis: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoaderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_millis: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarkdownConfig {
    /// Escape `&`, `<`, `>` in replies before rendering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escape_input: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for the rolling NDJSON log
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

// ---------------------------------------------------------------------------
// Effective values
// ---------------------------------------------------------------------------

impl WidgetConfig {
    pub fn backend_url(&self) -> &str {
        self.backend
            .as_ref()
            .and_then(|b| b.url.as_deref())
            .unwrap_or(DEFAULT_BACKEND_URL)
    }

    pub fn backend_timeout(&self) -> Duration {
        let secs = self
            .backend
            .as_ref()
            .and_then(|b| b.timeout_secs)
            .unwrap_or(DEFAULT_BACKEND_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    pub fn reveal_tick(&self) -> Duration {
        let millis = self
            .reveal
            .as_ref()
            .and_then(|r| r.tick_millis)
            .unwrap_or(DEFAULT_REVEAL_TICK_MILLIS);
        Duration::from_millis(millis)
    }

    pub fn loader_tick(&self) -> Duration {
        let millis = self
            .loader
            .as_ref()
            .and_then(|l| l.tick_millis)
            .unwrap_or(DEFAULT_LOADER_TICK_MILLIS);
        Duration::from_millis(millis)
    }

    pub fn escape_input(&self) -> bool {
        self.markdown
            .as_ref()
            .and_then(|m| m.escape_input)
            .unwrap_or(false)
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Option<PathBuf> {
        self.logging
            .as_ref()
            .and_then(|l| l.dir.as_ref())
            .map(PathBuf::from)
    }

    pub fn log_json(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_yaml() {
        let yaml = "backend:\n  url: https://chat.example.com/api/chat\n  timeoutSecs: 5\nreveal:\n  tickMillis: 10\nmarkdown:\n  escapeInput: true\n";
        let cfg: WidgetConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.backend_url(), "https://chat.example.com/api/chat");
        assert_eq!(cfg.backend_timeout(), Duration::from_secs(5));
        assert_eq!(cfg.reveal_tick(), Duration::from_millis(10));
        assert!(cfg.escape_input());
    }

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = WidgetConfig::default();
        assert_eq!(cfg.reveal_tick(), Duration::from_millis(20));
        assert_eq!(cfg.loader_tick(), Duration::from_millis(300));
        assert_eq!(cfg.log_level(), "info");
        assert!(cfg.log_dir().is_none());
        assert!(!cfg.escape_input());
    }

    #[test]
    fn omits_unset_sections_when_serialized() {
        let yaml = serde_yaml::to_string(&WidgetConfig::default()).unwrap();
        assert_eq!(yaml.trim(), "{}");
    }
}

//! Config defaults: applies default values to a parsed config.

use crate::schema::{
    BackendConfig, LoaderConfig, LoggingConfig, MarkdownConfig, RevealConfig, WidgetConfig,
};

/// Chat endpoint used when none is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000/api/chat";

pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 30;

/// Delay between two revealed characters.
pub const DEFAULT_REVEAL_TICK_MILLIS: u64 = 20;

/// Delay between two loader frames.
pub const DEFAULT_LOADER_TICK_MILLIS: u64 = 300;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: WidgetConfig) -> WidgetConfig {
    let config = apply_backend_defaults(config);
    let config = apply_timing_defaults(config);
    let config = apply_markdown_defaults(config);
    apply_logging_defaults(config)
}

fn apply_backend_defaults(mut config: WidgetConfig) -> WidgetConfig {
    let backend = config.backend.get_or_insert_with(BackendConfig::default);
    if backend.url.is_none() {
        backend.url = Some(DEFAULT_BACKEND_URL.to_string());
    }
    if backend.timeout_secs.is_none() {
        backend.timeout_secs = Some(DEFAULT_BACKEND_TIMEOUT_SECS);
    }
    config
}

fn apply_timing_defaults(mut config: WidgetConfig) -> WidgetConfig {
    let reveal = config.reveal.get_or_insert_with(RevealConfig::default);
    if reveal.tick_millis.is_none() {
        reveal.tick_millis = Some(DEFAULT_REVEAL_TICK_MILLIS);
    }
    let loader = config.loader.get_or_insert_with(LoaderConfig::default);
    if loader.tick_millis.is_none() {
        loader.tick_millis = Some(DEFAULT_LOADER_TICK_MILLIS);
    }
    config
}

/// Replies are rendered unescaped unless asked otherwise.
fn apply_markdown_defaults(mut config: WidgetConfig) -> WidgetConfig {
    let markdown = config.markdown.get_or_insert_with(MarkdownConfig::default);
    if markdown.escape_input.is_none() {
        markdown.escape_input = Some(false);
    }
    config
}

fn apply_logging_defaults(mut config: WidgetConfig) -> WidgetConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    if logging.json.is_none() {
        logging.json = Some(false);
    }
    config
}

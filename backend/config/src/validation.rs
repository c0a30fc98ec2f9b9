//! Config validation with field paths and readable messages.

use crate::schema::WidgetConfig;
use thiserror::Error;

/// Reveal ticks above this make replies crawl; allowed but flagged.
const SLOW_REVEAL_TICK_MILLIS: u64 = 1_000;

const KNOWN_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// All errors and warnings found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &WidgetConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_backend(config, &mut report);
    validate_timing(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_backend(config: &WidgetConfig, report: &mut ValidationReport) {
    let Some(backend) = &config.backend else { return };
    if let Some(url) = &backend.url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            report.error("backend.url", format!("Expected an http(s) URL, got '{url}'"));
        }
    }
    if backend.timeout_secs == Some(0) {
        report.error("backend.timeoutSecs", "Timeout must be at least one second");
    }
}

fn validate_timing(config: &WidgetConfig, report: &mut ValidationReport) {
    if let Some(tick) = config.reveal.as_ref().and_then(|r| r.tick_millis) {
        if tick == 0 {
            report.error("reveal.tickMillis", "Tick interval must be positive");
        } else if tick > SLOW_REVEAL_TICK_MILLIS {
            report.warn(
                "reveal.tickMillis",
                format!("{tick}ms per character will make replies very slow"),
            );
        }
    }
    if config.loader.as_ref().and_then(|l| l.tick_millis) == Some(0) {
        report.error("loader.tickMillis", "Tick interval must be positive");
    }
}

fn validate_logging(config: &WidgetConfig, report: &mut ValidationReport) {
    let Some(level) = config.logging.as_ref().and_then(|l| l.level.as_deref()) else {
        return;
    };
    // Full filter directives (e.g. "chatwidget=debug") are accepted as-is.
    if !level.contains('=') && !KNOWN_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        report.warn("logging.level", format!("Unknown log level '{level}'"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::apply_all_defaults;
    use crate::schema::{BackendConfig, LoggingConfig, RevealConfig};

    #[test]
    fn defaults_are_valid() {
        let report = validate(&apply_all_defaults(WidgetConfig::default()));
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn rejects_non_http_url_and_zero_tick() {
        let cfg = WidgetConfig {
            backend: Some(BackendConfig {
                url: Some("ftp://example.com".to_string()),
                timeout_secs: None,
            }),
            reveal: Some(RevealConfig {
                tick_millis: Some(0),
            }),
            ..Default::default()
        };
        let report = validate(&cfg);
        let paths: Vec<_> = report.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["backend.url", "reveal.tickMillis"]);
    }

    #[test]
    fn warns_on_slow_tick_and_unknown_level() {
        let cfg = WidgetConfig {
            reveal: Some(RevealConfig {
                tick_millis: Some(5_000),
            }),
            logging: Some(LoggingConfig {
                level: Some("chatty".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let report = validate(&cfg);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 2);
    }
}

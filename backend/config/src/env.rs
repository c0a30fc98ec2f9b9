//! Environment handling for config values.
//!
//! Two mechanisms:
//! - `${VAR_NAME}` references inside string values, resolved at load time.
//!   Only uppercase `[A-Z_][A-Z0-9_]*` names match; `$${VAR}` is kept as the
//!   literal text `${VAR}`.
//! - `CHATWIDGET_*` variables that override individual settings after
//!   defaults have been applied.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

use crate::schema::{BackendConfig, LoggingConfig, MarkdownConfig, RevealConfig, WidgetConfig};

/// `${VAR}` with an optional extra leading `$` marking an escape.
static ENV_REF_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$?\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

pub const ENV_BACKEND_URL: &str = "CHATWIDGET_BACKEND_URL";
pub const ENV_REVEAL_TICK_MS: &str = "CHATWIDGET_REVEAL_TICK_MS";
pub const ENV_ESCAPE_INPUT: &str = "CHATWIDGET_ESCAPE_INPUT";
pub const ENV_LOG_LEVEL: &str = "CHATWIDGET_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "CHATWIDGET_LOG_DIR";

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references using the process environment.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    resolve_env_vars_with(value, &std::env::vars().collect())
}

/// Substitute `${VAR}` references using a provided map.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for (key, v) in map {
                let child = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                out.insert(key.clone(), substitute_value(v, env, &child)?);
            }
            Ok(Value::Object(out))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let substituted = ENV_REF_PATTERN.replace_all(s, |caps: &regex::Captures| {
        let var_name = &caps[1];
        if caps[0].starts_with("$$") {
            return format!("${{{var_name}}}");
        }
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: var_name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(substituted.into_owned())
}

/// Apply `CHATWIDGET_*` overrides from the process environment.
pub fn apply_env_overrides(config: WidgetConfig) -> WidgetConfig {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

/// Apply `CHATWIDGET_*` overrides from a provided map. Unparseable values are
/// ignored with a warning.
pub fn apply_env_overrides_with(
    mut config: WidgetConfig,
    env: &HashMap<String, String>,
) -> WidgetConfig {
    if let Some(url) = env.get(ENV_BACKEND_URL) {
        config.backend.get_or_insert_with(BackendConfig::default).url = Some(url.clone());
    }
    if let Some(raw) = env.get(ENV_REVEAL_TICK_MS) {
        match raw.parse::<u64>() {
            Ok(ms) => {
                config.reveal.get_or_insert_with(RevealConfig::default).tick_millis = Some(ms)
            }
            Err(_) => warn!(var = ENV_REVEAL_TICK_MS, value = %raw, "Ignoring non-numeric override"),
        }
    }
    if let Some(raw) = env.get(ENV_ESCAPE_INPUT) {
        match raw.parse::<bool>() {
            Ok(flag) => {
                config.markdown.get_or_insert_with(MarkdownConfig::default).escape_input =
                    Some(flag)
            }
            Err(_) => warn!(var = ENV_ESCAPE_INPUT, value = %raw, "Ignoring non-boolean override"),
        }
    }
    if let Some(level) = env.get(ENV_LOG_LEVEL) {
        config.logging.get_or_insert_with(LoggingConfig::default).level = Some(level.clone());
    }
    if let Some(dir) = env.get(ENV_LOG_DIR) {
        config.logging.get_or_insert_with(LoggingConfig::default).dir = Some(dir.clone());
    }
    config
}

//! `chatwidget-config`: chat widget configuration management.
//!
//! Provides:
//! - Typed config schema (backend, reveal/loader timing, markdown, logging)
//! - YAML read/write with atomic backup rotation
//! - `${ENV_VAR}` substitution and `CHATWIDGET_*` overrides
//! - Default value application
//! - Validation with field paths

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{
    apply_env_overrides, apply_env_overrides_with, resolve_env_vars, resolve_env_vars_with,
    MissingEnvVarError,
};
pub use io::{config_dir, config_file_path, load_config, write_config};
pub use schema::WidgetConfig;
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::path::Path;

/// Load a config file and run the full preparation pipeline: `${VAR}`
/// substitution, defaults, `CHATWIDGET_*` overrides, validation.
///
/// Validation warnings are logged; any validation error fails the load.
pub async fn load_and_prepare(path: &Path) -> Result<WidgetConfig> {
    let raw_config = load_config(path).await?;

    let value: Value =
        serde_json::to_value(&raw_config).context("Failed to serialize config for processing")?;
    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;
    let config: WidgetConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_env_overrides(apply_all_defaults(config));
    check(&config)?;
    Ok(config)
}

/// Log warnings and turn errors into a single failure.
fn check(config: &WidgetConfig) -> Result<()> {
    let report = validate(config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    if report.is_valid() {
        return Ok(());
    }
    let messages: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
    bail!(messages.join("; "))
}

//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;
mod sections;

use std::str::FromStr;

use clap::Parser;
use config::{Config, Environment, File};
use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::application::sections::SectionSettings;

pub use cli::{BlueprintsArgs, CliArgs, Command, ContentArgs, LoggingOverrides, PreviewArgs};
use sections::{RawSectionSettings, build_sections};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "panel-sections";
const ENV_PREFIX: &str = "PANEL_SECTIONS";
const DEFAULT_PANEL_SLUG: &str = "panel";
const DEFAULT_API_SLUG: &str = "api";
const DEFAULT_LOCALE: &str = "en";

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub panel: PanelSettings,
    pub sections: IndexMap<String, SectionSettings>,
}

impl Settings {
    pub fn section(&self, name: &str) -> Option<&SectionSettings> {
        self.sections.get(name)
    }
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

/// Where the panel and its API live, and which locale it speaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSettings {
    pub base_url: String,
    pub panel_slug: String,
    pub api_slug: String,
    pub locale: String,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: String, reason: String },
}

impl LoadError {
    fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    let content = cli.command.content();
    raw.apply_logging_overrides(&content.logging);
    if let Some(locale) = content.locale.as_ref() {
        raw.panel.locale = Some(locale.clone());
    }

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    panel: RawPanelSettings,
    sections: IndexMap<String, RawSectionSettings>,
}

impl RawSettings {
    fn apply_logging_overrides(&mut self, overrides: &LoggingOverrides) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            logging,
            panel,
            sections,
        } = raw;

        let logging = build_logging_settings(logging)?;
        let panel = build_panel_settings(panel)?;
        let sections = build_sections(sections)?;

        Ok(Self {
            logging,
            panel,
            sections,
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_panel_settings(panel: RawPanelSettings) -> Result<PanelSettings, LoadError> {
    let base_url = panel
        .base_url
        .map(|url| url.trim().trim_end_matches('/').to_string())
        .unwrap_or_default();
    if !base_url.is_empty() && !base_url.contains("://") {
        return Err(LoadError::invalid(
            "panel.base_url",
            format!("`{base_url}` is not an absolute URL"),
        ));
    }

    let slug = |value: Option<String>, default: &str, key: &'static str| {
        let value = value.unwrap_or_else(|| default.to_string());
        let trimmed = value.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Err(LoadError::invalid(key, "must not be empty"));
        }
        Ok(trimmed.to_string())
    };

    let locale = panel
        .locale
        .map(|locale| locale.trim().to_string())
        .filter(|locale| !locale.is_empty())
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string());

    Ok(PanelSettings {
        base_url,
        panel_slug: slug(panel.panel_slug, DEFAULT_PANEL_SLUG, "panel.panel_slug")?,
        api_slug: slug(panel.api_slug, DEFAULT_API_SLUG, "panel.api_slug")?,
        locale,
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawPanelSettings {
    base_url: Option<String>,
    panel_slug: Option<String>,
    api_slug: Option<String>,
    locale: Option<String>,
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[cfg(test)]
mod tests;

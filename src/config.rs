use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::controller::ControllerSettings;
use crate::languages;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
    #[serde(default)]
    pub widget: WidgetConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `*` or a comma separated list of origins
    pub cors_origins: String,
    pub log_level: String,
    /// Directory with the widget's static files, served as a fallback
    pub static_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_origins: "*".to_string(),
            log_level: "info".to_string(),
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// Upstream engine: `google` or `relay`
    pub service: String,
    pub upstream_url: String,
    pub max_text_length: usize,
    pub timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            service: "google".to_string(),
            upstream_url: crate::translate::google::DEFAULT_BASE_URL.to_string(),
            max_text_length: 5000,
            timeout_secs: 10,
        }
    }
}

/// Settings for the interactive front-end and its request controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub endpoint: String,
    pub debounce_ms: u64,
    pub language_change_delay_ms: u64,
    pub min_text_length: usize,
    pub stale_output_threshold: usize,
    pub default_source_lang: String,
    pub default_target_lang: String,
    pub state_file: String,
    pub autosave_interval_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5000/translate".to_string(),
            debounce_ms: 1500,
            language_change_delay_ms: 500,
            min_text_length: 3,
            stale_output_threshold: 10,
            default_source_lang: languages::AUTO.to_string(),
            default_target_lang: "en".to_string(),
            state_file: "translator_state.json".to_string(),
            autosave_interval_ms: 5000,
            request_timeout_secs: 15,
        }
    }
}

impl WidgetConfig {
    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            debounce_delay: Duration::from_millis(self.debounce_ms),
            language_change_delay: Duration::from_millis(self.language_change_delay_ms),
            min_text_length: self.min_text_length,
            stale_output_threshold: self.stale_output_threshold,
        }
    }
}

/// Replace `${VAR_NAME}` occurrences using `lookup`; unknown variables are left as-is
pub fn substitute_env_vars(content: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
    let pattern = Regex::new(r"\$\{(\w+)\}")?;
    let replaced = pattern.replace_all(content, |caps: &regex::Captures| {
        lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    });
    Ok(replaced.into_owned())
}

impl Config {
    /// Load a YAML or JSON file, chosen by extension
    pub fn load(path: &str) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path))?;
        let content = substitute_env_vars(&raw, |key| std::env::var(key).ok())?;

        let path_lower = path.to_lowercase();
        let config: Config = if path_lower.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON configuration: {}", path))?
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid YAML configuration: {}", path))?
        };
        Ok(config)
    }

    /// Find a configuration file, fall back to defaults, then apply env overrides
    pub fn discover() -> Result<Self> {
        let candidates: Vec<String> = [
            std::env::var("CONFIG_PATH").ok(),
            Some("conf.yaml".to_string()),
            Some("conf.json".to_string()),
        ]
        .into_iter()
        .flatten()
        .collect();

        let mut config = None;
        for path in &candidates {
            if !Path::new(path).exists() {
                debug!("No configuration at {}", path);
                continue;
            }
            config = Some(Self::load(path)?);
            debug!("Loaded configuration from {}", path);
            break;
        }

        let mut config = config.unwrap_or_default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Environment overrides for deployment: HOST, PORT, CORS_ORIGINS, LOG_LEVEL,
    /// TRANSLATION_SERVICE, MAX_TEXT_LENGTH
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("PORT must be a valid number: {}", port))?;
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            self.server.cors_origins = origins;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.server.log_level = level.to_lowercase();
        }
        if let Some(service) = lookup("TRANSLATION_SERVICE") {
            self.translation.service = service;
        }
        if let Some(max) = lookup("MAX_TEXT_LENGTH") {
            self.translation.max_text_length = max
                .parse()
                .with_context(|| format!("MAX_TEXT_LENGTH must be a valid number: {}", max))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.translation.max_text_length == 0 {
            anyhow::bail!("translation.max_text_length must be greater than zero");
        }
        if self.widget.min_text_length == 0 {
            anyhow::bail!("widget.min_text_length must be greater than zero");
        }
        if !languages::is_supported_source(&self.widget.default_source_lang) {
            anyhow::bail!(
                "Unsupported widget.default_source_lang: {}",
                self.widget.default_source_lang
            );
        }
        if !languages::is_supported_target(&self.widget.default_target_lang) {
            anyhow::bail!(
                "Unsupported widget.default_target_lang: {}",
                self.widget.default_target_lang
            );
        }
        Ok(())
    }
}

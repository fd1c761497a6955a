use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use super::client::HttpTranslator;
use super::google::GoogleTranslator;
use super::interface::Translator;
use crate::config::TranslationConfig;

/// Factory for the upstream engine used by the backend
pub struct TranslatorFactory;

impl TranslatorFactory {
    /// Create a translator based on `translation.service`
    ///
    /// * `google` - public Google Translate endpoint at `upstream_url`
    /// * `relay` - another quick-translate backend; `upstream_url` is its `/translate` URL
    pub fn create(config: &TranslationConfig) -> Result<Arc<dyn Translator>> {
        info!("Initializing translation engine: {}", config.service);
        let timeout = Duration::from_secs(config.timeout_secs);

        match config.service.as_str() {
            "google" => Ok(Arc::new(GoogleTranslator::new(&config.upstream_url, timeout)?)),
            "relay" => Ok(Arc::new(HttpTranslator::new(&config.upstream_url, timeout)?)),
            other => anyhow::bail!("Unknown translation service: {}", other),
        }
    }
}

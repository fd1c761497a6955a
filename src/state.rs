use std::sync::Arc;

use crate::config::Config;
use crate::translate::{Translator, TranslatorFactory};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub translator: Arc<dyn Translator>,
}

impl AppState {
    /// Build the state with the engine selected in `config.translation`
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let translator = TranslatorFactory::create(&config.translation)?;
        Ok(Self::with_translator(config, translator))
    }

    pub fn with_translator(config: Config, translator: Arc<dyn Translator>) -> Self {
        Self {
            config: Arc::new(config),
            translator,
        }
    }
}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TranslateError;
use crate::languages::AUTO;

/// Body of `POST /translate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
}

fn default_source_lang() -> String {
    AUTO.to_string()
}

fn default_target_lang() -> String {
    "en".to_string()
}

/// Response of `POST /translate`: either `translation` or `error` is set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslateResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TranslateResponse {
    pub fn success(translation: Translation) -> Self {
        Self {
            translation: Some(translation.translated_text),
            detected_language: translation.detected_lang,
            error: None,
        }
    }
}

/// A successful translation as returned by a collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub translated_text: String,
    pub detected_lang: Option<String>,
}

impl Translation {
    pub fn new(translated_text: impl Into<String>, detected_lang: Option<String>) -> Self {
        Self {
            translated_text: translated_text.into(),
            detected_lang,
        }
    }
}

/// Anything that can translate a single text between one language pair
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `source_lang` (may be `auto`) to `target_lang`
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Translation, TranslateError>;

    /// Short name reported by the health endpoint
    fn name(&self) -> &str;
}

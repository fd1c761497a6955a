use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Input and language pair captured when a translation is scheduled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

impl InputSnapshot {
    /// Surrounding whitespace is not part of the text
    pub fn new(
        text: impl AsRef<str>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            text: text.as_ref().trim().to_string(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
        }
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn with_text(&self, text: impl AsRef<str>) -> Self {
        Self::new(text, self.source_lang.clone(), self.target_lang.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub source_text: String,
    pub translated_text: String,
    pub detected_lang: Option<String>,
    pub completed_at: DateTime<Utc>,
}

/// Observable request bookkeeping of a controller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerState {
    pub is_in_flight: bool,
    pub last_requested_snapshot: Option<InputSnapshot>,
    pub last_completed_text: String,
}

/// What survives a restart: the input text and the translation shown for it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    pub text: String,
    #[serde(default)]
    pub translation: Option<TranslationResult>,
}

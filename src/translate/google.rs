use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::interface::{Translation, Translator};
use crate::error::TranslateError;

pub const DEFAULT_BASE_URL: &str = "https://translate.googleapis.com";

/// Upstream engine backed by the public Google Translate endpoint
#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    client: Client,
    base_url: String,
}

impl GoogleTranslator {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) quick-translate")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

/// Google wants region-qualified codes for a few languages
fn upstream_code(code: &str) -> &str {
    match code {
        "zh" => "zh-CN",
        other => other,
    }
}

fn local_code(code: &str) -> String {
    match code {
        "zh-CN" | "zh-TW" => "zh".to_string(),
        other => other.to_lowercase(),
    }
}

/// Extract the translation from a `translate_a/single` response.
///
/// The payload is a nested array: segments live at `[0][*][0]`
/// and the detected source language at `[2]`.
pub fn parse_response(json: &Value) -> Result<Translation, TranslateError> {
    let segments = json
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| TranslateError::Payload("missing translation segments".to_string()))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(|v| v.as_str()))
        .collect();

    if translated.is_empty() {
        return Err(TranslateError::Payload("empty translation received".to_string()));
    }

    let detected = json.get(2).and_then(|v| v.as_str()).map(local_code);

    Ok(Translation::new(translated, detected))
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Translation, TranslateError> {
        let url = format!("{}/translate_a/single", self.base_url);
        let params = [
            ("client", "gtx"),
            ("sl", upstream_code(source_lang)),
            ("tl", upstream_code(target_lang)),
            ("dt", "t"),
            ("q", text),
        ];

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(TranslateError::from_transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Google Translate error: {} - {}", status, body);
            return Err(TranslateError::Server {
                status: status.as_u16(),
                message: format!("translation service returned {}", status),
            });
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| TranslateError::Unknown(format!("failed to parse response: {}", e)))?;

        let translation = parse_response(&json)?;
        debug!(
            "Translated {} chars, detected {:?}",
            text.chars().count(),
            translation.detected_lang
        );
        Ok(translation)
    }

    fn name(&self) -> &str {
        "google"
    }
}

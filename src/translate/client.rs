use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::interface::{TranslateRequest, TranslateResponse, Translation, Translator};
use crate::error::TranslateError;

/// Translator that talks to a `/translate` backend over HTTP
#[derive(Debug, Clone)]
pub struct HttpTranslator {
    client: Client,
    endpoint: String,
}

impl HttpTranslator {
    /// Create a client for the given endpoint URL (the full `/translate` URL)
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Translation, TranslateError> {
        let request = TranslateRequest {
            text: text.to_string(),
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
        };

        debug!("POST {} ({} -> {})", self.endpoint, source_lang, target_lang);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(TranslateError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            // The backend usually explains itself in an `error` field
            let reported = response
                .json::<TranslateResponse>()
                .await
                .ok()
                .and_then(|body| body.error);
            warn!(
                "Translation backend returned {}: {}",
                status,
                reported.as_deref().unwrap_or("no error message")
            );
            return Err(match reported {
                // A rejected request, reported in the body
                Some(error) if status.is_client_error() => TranslateError::Payload(error),
                reported => TranslateError::Server {
                    status: status.as_u16(),
                    message: reported.unwrap_or_else(|| {
                        status.canonical_reason().unwrap_or("").to_string()
                    }),
                },
            });
        }

        let body: TranslateResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::Unknown(format!("invalid response body: {}", e)))?;

        if let Some(error) = body.error {
            return Err(TranslateError::Payload(error));
        }

        let translated_text = body
            .translation
            .ok_or_else(|| TranslateError::Unknown("response has no translation".to_string()))?;

        Ok(Translation::new(translated_text, body.detected_language))
    }

    fn name(&self) -> &str {
        "relay"
    }
}

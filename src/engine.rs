//! The OCR engine seam: one page in, extracted text out.
//!
//! [`OcrEngine`] is the only trait in the crate. It exists so the
//! aggregator's sequencing, retry, and report logic can be exercised
//! against a scripted fake without a pdfium binding or a live API; the
//! production implementation is [`AzureOcrEngine`].

use crate::config::{AzureCredentials, OcrConfig};
use crate::error::OcrError;
use crate::pipeline::{encode, render};
use crate::prompts::DEFAULT_SYSTEM_PROMPT;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Extracts the text of a single page of a PDF.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// OCR one page. `page` is a 1-based page selector.
    async fn ocr_page(&self, pdf_path: &Path, page: usize) -> Result<String, OcrError>;
}

/// OCR engine backed by an Azure OpenAI vision deployment.
///
/// Per call: rasterise the page via pdfium, PNG/base64-encode it, and POST
/// it to the chat-completions endpoint as an image data URL. The response's
/// message content is the page text.
pub struct AzureOcrEngine {
    client: reqwest::Client,
    credentials: AzureCredentials,
    model: String,
    temperature: f32,
    max_tokens: usize,
    max_rendered_pixels: u32,
    system_prompt: Option<String>,
}

// Manual impl: `credentials` already redacts the key, and the reqwest
// client is noise.
impl std::fmt::Debug for AzureOcrEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureOcrEngine")
            .field("credentials", &self.credentials)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .finish_non_exhaustive()
    }
}

impl AzureOcrEngine {
    /// Build the engine from a config.
    ///
    /// Fails with [`OcrError::MissingCredentials`] before any call is made
    /// if the config carries no credentials.
    pub fn from_config(config: &OcrConfig) -> Result<Self, OcrError> {
        let credentials = config
            .credentials
            .clone()
            .ok_or(OcrError::MissingCredentials)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| OcrError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            credentials,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            max_rendered_pixels: config.max_rendered_pixels,
            system_prompt: config.system_prompt.clone(),
        })
    }

    /// Deployment-scoped chat-completions URL.
    fn endpoint_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.credentials.api_base.trim_end_matches('/'),
            self.model,
            self.credentials.api_version,
        )
    }

    /// Chat-completions request body for one page image.
    ///
    /// The user turn carries no text — the image is the content. `detail:
    /// "high"` makes GPT-4-class models tile the image at full resolution;
    /// without it small print is lost.
    fn request_body(&self, image_data_url: &str) -> Value {
        let prompt = self
            .system_prompt
            .as_deref()
            .unwrap_or(DEFAULT_SYSTEM_PROMPT);

        json!({
            "messages": [
                { "role": "system", "content": prompt },
                {
                    "role": "user",
                    "content": [{
                        "type": "image_url",
                        "image_url": { "url": image_data_url, "detail": "high" }
                    }]
                }
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        })
    }
}

#[async_trait]
impl OcrEngine for AzureOcrEngine {
    async fn ocr_page(&self, pdf_path: &Path, page: usize) -> Result<String, OcrError> {
        let image = render::render_page(pdf_path, page, self.max_rendered_pixels).await?;
        let data_url = encode::encode_page(&image).map_err(|e| OcrError::RenderFailed {
            page,
            detail: format!("image encoding failed: {e}"),
        })?;

        let response = self
            .client
            .post(self.endpoint_url())
            .header("api-key", &self.credentials.api_key)
            .json(&self.request_body(&data_url))
            .send()
            .await
            .map_err(|e| OcrError::OcrRequest {
                page,
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            return Err(OcrError::OcrRequest {
                page,
                detail: format!("HTTP {status}: {snippet}"),
            });
        }

        let value: Value = response.json().await.map_err(|e| OcrError::OcrRequest {
            page,
            detail: format!("invalid JSON response: {e}"),
        })?;

        let content = value
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| OcrError::OcrRequest {
                page,
                detail: "response has no message content".to_string(),
            })?;

        debug!("Page {page}: received {} chars", content.chars().count());
        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_engine() -> AzureOcrEngine {
        let config = OcrConfig::builder()
            .credentials("key", "https://res.openai.azure.com/", "2024-02-15-preview")
            .model("gpt-4o")
            .build()
            .unwrap();
        AzureOcrEngine::from_config(&config).unwrap()
    }

    #[test]
    fn from_config_requires_credentials() {
        let config = OcrConfig::default();
        let err = AzureOcrEngine::from_config(&config).unwrap_err();
        assert!(matches!(err, OcrError::MissingCredentials));
    }

    #[test]
    fn debug_output_never_leaks_the_api_key() {
        let config = OcrConfig::builder()
            .credentials("sk-secret-123", "https://res.openai.azure.com", "v1")
            .build()
            .unwrap();
        let engine = AzureOcrEngine::from_config(&config).unwrap();
        let rendered = format!("{engine:?}");
        assert!(!rendered.contains("sk-secret-123"), "got: {rendered}");
        assert!(rendered.contains("gpt-4o"));
    }

    #[test]
    fn endpoint_url_shape() {
        let engine = test_engine();
        assert_eq!(
            engine.endpoint_url(),
            "https://res.openai.azure.com/openai/deployments/gpt-4o/chat/completions\
             ?api-version=2024-02-15-preview"
        );
    }

    #[test]
    fn request_body_carries_image_and_prompt() {
        let engine = test_engine();
        let body = engine.request_body("data:image/png;base64,AAAA");

        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(
            body["messages"][1]["content"][0]["image_url"]["url"],
            "data:image/png;base64,AAAA"
        );
        assert_eq!(body["messages"][1]["content"][0]["image_url"]["detail"], "high");
        assert_eq!(body["max_tokens"], 4096);
    }

    #[test]
    fn custom_system_prompt_overrides_default() {
        let config = OcrConfig::builder()
            .credentials("key", "https://res.openai.azure.com", "v1")
            .system_prompt("transcribe verbatim")
            .build()
            .unwrap();
        let engine = AzureOcrEngine::from_config(&config).unwrap();
        let body = engine.request_body("data:image/png;base64,AAAA");
        assert_eq!(body["messages"][0]["content"], "transcribe verbatim");
    }
}

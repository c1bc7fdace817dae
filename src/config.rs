//! Configuration for a document OCR run.
//!
//! Everything is controlled through [`OcrConfig`], built via its
//! [`OcrConfigBuilder`]. Credentials are an explicit field rather than
//! process-wide environment state: a config value can be constructed once,
//! shared across runs, and inspected in logs without mutating the
//! environment under concurrent callers' feet.

use crate::engine::OcrEngine;
use crate::error::OcrError;
use crate::progress::ProgressHook;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Azure OpenAI connection details. All three parts are required before any
/// OCR call is made.
#[derive(Clone, PartialEq, Eq)]
pub struct AzureCredentials {
    /// API key, sent as the `api-key` header.
    pub api_key: String,
    /// Resource base URL, e.g. `https://myresource.openai.azure.com`.
    pub api_base: String,
    /// API version query parameter, e.g. `2024-02-15-preview`.
    pub api_version: String,
}

impl fmt::Debug for AzureCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureCredentials")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("api_version", &self.api_version)
            .finish()
    }
}

/// Configuration for OCR-ing a document into a JSON report.
///
/// Built via [`OcrConfig::builder()`] or [`OcrConfig::default()`].
///
/// # Example
/// ```rust
/// use pdfocr::OcrConfig;
///
/// let config = OcrConfig::builder()
///     .credentials("key", "https://myresource.openai.azure.com", "2024-02-15-preview")
///     .model("gpt-4o")
///     .max_attempts(3)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct OcrConfig {
    /// Azure credentials. Required unless a pre-built `engine` is supplied.
    pub credentials: Option<AzureCredentials>,

    /// Azure deployment (model) identifier. Default: "gpt-4o".
    pub model: String,

    /// Total OCR attempts per page (first try included). Default: 3.
    ///
    /// Every failure is retried up to this bound; there is no transient/
    /// permanent classification. A page that fails all attempts aborts the
    /// whole run.
    pub max_attempts: u32,

    /// Fixed delay between attempts. Default: 2 s. No jitter, no backoff.
    pub retry_delay: Duration,

    /// Maximum rendered page dimension (width or height) in pixels. Default: 2000.
    ///
    /// Caps pdfium's output so an oversized page cannot produce a
    /// multi-hundred-megabyte bitmap; either dimension is capped and the
    /// other scales proportionally.
    pub max_rendered_pixels: u32,

    /// Maximum tokens the model may generate per page. Default: 4096.
    pub max_tokens: usize,

    /// Sampling temperature. Default: 0.0 — transcription wants determinism.
    pub temperature: f32,

    /// Custom system prompt. If None, uses [`crate::prompts::DEFAULT_SYSTEM_PROMPT`].
    pub system_prompt: Option<String>,

    /// Pre-constructed OCR engine. Takes precedence over `credentials`;
    /// mainly used to inject a fake engine in tests.
    pub engine: Option<Arc<dyn OcrEngine>>,

    /// Progress callback for per-page events. Default: none.
    pub progress: Option<ProgressHook>,

    /// Download timeout for URL inputs, in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Per-OCR-request HTTP timeout, in seconds. Default: 60.
    pub api_timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            model: "gpt-4o".to_string(),
            max_attempts: 3,
            retry_delay: Duration::from_secs(2),
            max_rendered_pixels: 2000,
            max_tokens: 4096,
            temperature: 0.0,
            system_prompt: None,
            engine: None,
            progress: None,
            download_timeout_secs: 120,
            api_timeout_secs: 60,
        }
    }
}

impl fmt::Debug for OcrConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OcrConfig")
            .field("credentials", &self.credentials)
            .field("model", &self.model)
            .field("max_attempts", &self.max_attempts)
            .field("retry_delay", &self.retry_delay)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("engine", &self.engine.as_ref().map(|_| "<dyn OcrEngine>"))
            .finish()
    }
}

impl OcrConfig {
    /// Create a new builder for `OcrConfig`.
    pub fn builder() -> OcrConfigBuilder {
        OcrConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`OcrConfig`].
#[derive(Debug)]
pub struct OcrConfigBuilder {
    config: OcrConfig,
}

impl OcrConfigBuilder {
    pub fn credentials(
        mut self,
        api_key: impl Into<String>,
        api_base: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        self.config.credentials = Some(AzureCredentials {
            api_key: api_key.into(),
            api_base: api_base.into(),
            api_version: api_version.into(),
        });
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn max_attempts(mut self, n: u32) -> Self {
        self.config.max_attempts = n.max(1);
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.config.retry_delay = delay;
        self
    }

    pub fn retry_delay_secs(mut self, secs: u64) -> Self {
        self.config.retry_delay = Duration::from_secs(secs);
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn engine(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.config.engine = Some(engine);
        self
    }

    pub fn progress(mut self, hook: ProgressHook) -> Self {
        self.config.progress = Some(hook);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<OcrConfig, OcrError> {
        let c = &self.config;
        if c.max_attempts == 0 {
            return Err(OcrError::InvalidConfig("max_attempts must be ≥ 1".into()));
        }
        if c.model.trim().is_empty() {
            return Err(OcrError::InvalidConfig("model must not be empty".into()));
        }
        if let Some(ref creds) = c.credentials {
            if creds.api_key.is_empty() || creds.api_base.is_empty() || creds.api_version.is_empty()
            {
                return Err(OcrError::InvalidConfig(
                    "credentials must include api_key, api_base, and api_version".into(),
                ));
            }
        }
        Ok(self.config)
    }
}

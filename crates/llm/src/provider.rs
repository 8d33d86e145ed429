use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 2000;
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_TOP_P: f32 = 0.95;

/// One prompt plus the sampling parameters to send with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_output_tokens: u32,
    /// Passed through to the backend unmodified.
    pub temperature: f32,
    /// Only sent by backends that accept nucleus sampling.
    pub top_p: f32,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    /// Checked by every provider before anything goes on the wire.
    pub fn validate(&self) -> Result<(), LlmError> {
        if self.prompt.trim().is_empty() {
            return Err(LlmError::InvalidRequest("prompt is empty".into()));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(LlmError::InvalidRequest(format!(
                "temperature {} is outside [0, 1]",
                self.temperature
            )));
        }
        if self.max_output_tokens == 0 {
            return Err(LlmError::InvalidRequest("max_output_tokens must be positive".into()));
        }
        Ok(())
    }
}

/// Trait for text-generation backends. Exactly one is active per process.
///
/// Implementations make one outbound call per `generate` and never retry.
/// Every failure comes back as an `LlmError`; nothing panics past this boundary.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short backend name for logs and the health endpoint.
    fn name(&self) -> &str;

    /// Send the prompt and return the first candidate's text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),
    #[error("API error (status {status}): {body}")]
    ApiError { status: u16, body: String },
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),
    #[error("invalid generation request: {0}")]
    InvalidRequest(String),
    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

// The request URL is stripped so a key carried in it never reaches error text.
impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        LlmError::Http(e.without_url())
    }
}

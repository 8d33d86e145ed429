use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::read_success_json;
use crate::provider::{GenerationRequest, LlmError, LlmProvider};

pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(client: reqwest::Client, api_key: String, model: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the request body for the Gemini generateContent API.
    fn build_request_body(request: &GenerationRequest) -> Value {
        json!({
            "contents": [{
                "parts": [{ "text": request.prompt }],
            }],
            "generationConfig": {
                "maxOutputTokens": request.max_output_tokens,
                "temperature": request.temperature,
                "topP": request.top_p,
            },
        })
    }

    fn extract_text(resp: &Value) -> Result<String, LlmError> {
        resp["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                LlmError::UnexpectedFormat("missing candidates[0].content.parts[0].text".into())
            })
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        request.validate()?;

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = Self::build_request_body(request);

        debug!("Gemini request to model={}", self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let resp = read_success_json(response).await?;
        Self::extract_text(&resp)
    }
}

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::read_success_json;
use crate::provider::{GenerationRequest, LlmError, LlmProvider};

pub struct ClaudeProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl ClaudeProvider {
    pub fn new(client: reqwest::Client, api_key: String, model: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn build_request_body(&self, request: &GenerationRequest) -> Value {
        // The Messages API rejects temperature and top_p together on newer models.
        json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": request.prompt }],
            "temperature": request.temperature,
            "max_tokens": request.max_output_tokens,
        })
    }
}

#[async_trait]
impl LlmProvider for ClaudeProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        request.validate()?;

        let url = format!("{}/v1/messages", self.base_url);
        let body = self.build_request_body(request);

        debug!("Claude request to {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let resp = read_success_json(response).await?;
        resp["content"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| LlmError::UnexpectedFormat("missing content[0].text".into()))
    }
}

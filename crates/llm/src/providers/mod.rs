pub mod claude;
pub mod gemini;
pub mod ollama;
pub mod openai;

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use studio_core::config::{LlmConfig, OllamaConfig};
use tracing::info;

use crate::provider::{LlmError, LlmProvider};

/// Create the LLM provider selected by `LLM_PROVIDER`.
///
/// Called once at startup. A provider whose credentials are missing is an
/// error here rather than at the first request.
pub fn create_provider(
    llm_config: &LlmConfig,
    ollama_config: &OllamaConfig,
) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = llm_config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    let client = builder.build()?;

    let provider: Arc<dyn LlmProvider> = match llm_config.provider.as_str() {
        "gemini" => {
            let api_key = llm_config
                .gemini_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("GEMINI_API_KEY not set".into()))?;
            Arc::new(gemini::GeminiProvider::new(
                client,
                api_key.clone(),
                llm_config.gemini_model.clone(),
                llm_config.gemini_base_url.clone(),
            ))
        }
        "openai" => {
            let api_key = llm_config
                .openai_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            Arc::new(openai::OpenAiProvider::new(
                client,
                api_key.clone(),
                llm_config.openai_model.clone(),
                llm_config.openai_base_url.clone(),
            ))
        }
        "anthropic" | "claude" => {
            let api_key = llm_config
                .anthropic_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("ANTHROPIC_API_KEY not set".into()))?;
            Arc::new(claude::ClaudeProvider::new(
                client,
                api_key.clone(),
                llm_config.anthropic_model.clone(),
                llm_config.anthropic_base_url.clone(),
            ))
        }
        "ollama" => Arc::new(ollama::OllamaProvider::new(
            client,
            ollama_config.url.clone(),
            ollama_config.model.clone(),
        )),
        other => {
            return Err(LlmError::NotConfigured(format!(
                "unknown LLM provider: '{}'",
                other
            )))
        }
    };

    info!("LLM provider: {}", provider.name());
    Ok(provider)
}

/// Turn a non-200 reply into `ApiError`, otherwise decode the JSON body.
pub(crate) async fn read_success_json(response: reqwest::Response) -> Result<Value, LlmError> {
    let status = response.status().as_u16();
    if status != 200 {
        let body = response.text().await.unwrap_or_default();
        return Err(LlmError::ApiError { status, body });
    }
    Ok(response.json().await?)
}

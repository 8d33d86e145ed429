use std::sync::Arc;

use studio_core::config::LlmConfig;
use studio_core::{Flashcard, InfographicDocument, SourceDocument};
use tracing::{debug, info, warn};

use crate::prompts::{PromptError, PromptSet};
use crate::provider::{
    GenerationRequest, LlmProvider, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_P,
};
use crate::structured::{self, Structured};

/// Sampling parameters applied to every request a generator sends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            top_p: DEFAULT_TOP_P,
        }
    }
}

impl From<&LlmConfig> for GenerationSettings {
    fn from(config: &LlmConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_output_tokens: config.max_tokens,
            top_p: config.top_p,
        }
    }
}

/// Turns source documents into flashcards and infographics via an LLM.
///
/// Generation never fails from the caller's point of view: backend errors and
/// unparseable replies both degrade to the heuristic output.
pub struct StudyGenerator {
    provider: Arc<dyn LlmProvider>,
    settings: GenerationSettings,
    prompts: PromptSet,
}

impl StudyGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: GenerationSettings) -> Result<Self, PromptError> {
        Ok(Self {
            provider,
            settings,
            prompts: PromptSet::builtin()?,
        })
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub async fn flashcards(&self, source: &SourceDocument) -> Vec<Flashcard> {
        let prompt = self.prompts.flashcards(source);
        let cards: Vec<Flashcard> = self.run(prompt, source).await;
        info!("Generated {} flashcards for '{}'", cards.len(), source.name);
        cards
    }

    /// `instruction` replaces the default infographic brief when non-blank.
    pub async fn infographic(
        &self,
        source: &SourceDocument,
        instruction: Option<&str>,
    ) -> InfographicDocument {
        let prompt = self.prompts.infographic(source, instruction);
        let doc: InfographicDocument = self.run(prompt, source).await;
        info!(
            "Generated infographic '{}' ({} sections) for '{}'",
            doc.title,
            doc.sections.len(),
            source.name
        );
        doc
    }

    async fn run<T: Structured>(&self, prompt: String, source: &SourceDocument) -> T {
        let request = GenerationRequest::new(prompt)
            .with_temperature(self.settings.temperature)
            .with_max_output_tokens(self.settings.max_output_tokens)
            .with_top_p(self.settings.top_p);

        info!(
            "Requesting {} from {} ({} source chars)",
            T::KIND,
            self.provider.name(),
            source.char_count()
        );

        match self.provider.generate(&request).await {
            Ok(raw) => {
                debug!("LLM response: {}", raw);
                structured::extract(&raw, source)
            }
            Err(e) => {
                warn!("Generation failed for '{}', using heuristic {}: {}", source.name, T::KIND, e);
                T::fallback(source)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::provider::LlmError;

    /// Replays a canned result and records the last request.
    struct ScriptedProvider {
        reply: Result<String, (u16, String)>,
        seen: Mutex<Option<GenerationRequest>>,
    }

    impl ScriptedProvider {
        fn ok(text: &str) -> Arc<Self> {
            Arc::new(Self { reply: Ok(text.into()), seen: Mutex::new(None) })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self { reply: Err((status, "boom".into())), seen: Mutex::new(None) })
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
            *self.seen.lock().unwrap() = Some(request.clone());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err((status, body)) => Err(LlmError::ApiError { status: *status, body: body.clone() }),
            }
        }
    }

    const PARIS: &str =
        "Paris is the capital of France. It has a population of over two million people.";

    #[tokio::test]
    async fn prose_reply_degrades_to_sentence_cards() {
        let provider = ScriptedProvider::ok("Paris is lovely in spring, I think you will enjoy it");
        let generator = StudyGenerator::new(provider, GenerationSettings::default()).unwrap();

        let cards = generator.flashcards(&SourceDocument::new("paris.txt", PARIS)).await;
        assert!(cards.iter().any(|c| {
            c.answer == "Paris is the capital of France."
                || c.answer == "It has a population of over two million people."
        }));
    }

    #[tokio::test]
    async fn backend_error_degrades_to_fallback_infographic() {
        let provider = ScriptedProvider::failing(500);
        let generator = StudyGenerator::new(provider, GenerationSettings::default()).unwrap();

        let doc = generator.infographic(&SourceDocument::new("paris.txt", PARIS), None).await;
        assert_eq!(doc.title, "Summary of paris.txt");
        assert_eq!(doc.sections.len(), 1);
    }

    #[tokio::test]
    async fn settings_are_applied_to_each_request() {
        let provider = ScriptedProvider::ok(r#"[{"question": "Q", "answer": "A"}]"#);
        let settings = GenerationSettings { temperature: 0.7, max_output_tokens: 512, top_p: 0.5 };
        let generator = StudyGenerator::new(provider.clone(), settings).unwrap();

        let cards = generator.flashcards(&SourceDocument::new("a.txt", "Some text.")).await;
        assert_eq!(cards, vec![Flashcard::new("Q", "A")]);

        let seen = provider.seen.lock().unwrap().clone().unwrap();
        assert!((seen.temperature - 0.7).abs() < 1e-6);
        assert_eq!(seen.max_output_tokens, 512);
        assert!((seen.top_p - 0.5).abs() < 1e-6);
        assert!(seen.prompt.contains("Some text."));
    }

    #[tokio::test]
    async fn infographic_instruction_reaches_the_prompt() {
        let provider = ScriptedProvider::ok(r#"{"title": "Revenue", "sections": []}"#);
        let generator = StudyGenerator::new(provider.clone(), GenerationSettings::default()).unwrap();

        let doc = generator
            .infographic(&SourceDocument::new("q3.txt", "Revenue grew."), Some("Use a playful tone."))
            .await;
        assert_eq!(doc.title, "Revenue");

        let seen = provider.seen.lock().unwrap().clone().unwrap();
        assert!(seen.prompt.starts_with("Use a playful tone."));
    }

    #[test]
    fn default_settings_match_request_defaults() {
        let settings = GenerationSettings::default();
        assert_eq!(settings.max_output_tokens, 2000);
        assert!((settings.temperature - 0.2).abs() < 1e-6);
    }
}

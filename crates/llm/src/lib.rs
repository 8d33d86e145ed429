pub mod generator;
pub mod prompts;
pub mod provider;
pub mod providers;
pub mod structured;

pub use generator::{GenerationSettings, StudyGenerator};
pub use provider::{GenerationRequest, LlmError, LlmProvider};
pub use providers::create_provider;

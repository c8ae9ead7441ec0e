use crate::actors::messages::AppError;
use async_trait::async_trait;

/// Defines the public interface for an LLM (Large Language Model) actor.
///
/// This trait abstracts the language-model backend so the classification core can be
/// driven by the OpenAI actor in production and by canned fakes in tests.
#[async_trait]
pub trait LlmActor: Send + Sync + 'static {
    /// Requests a completion constrained to a JSON object and returns the raw text.
    ///
    /// The returned text is not assumed to be well-formed; callers run it through
    /// `brain::json_repair`.
    async fn complete_json(&self, prompt: String, temperature: f32) -> Result<String, AppError>;
}
